use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ClothError {
    /// Both segment counts must be at least 1.
    InvalidSegments { segments_w: usize, segments_h: usize },
    /// Cloth width and height must be positive and finite.
    InvalidDimensions { width: f32, height: f32 },
    /// Particle mass must be positive and finite.
    InvalidMass(f32),
    /// Time step must be positive and finite.
    InvalidTimeStep(f32),
    /// At least one relaxation pass is needed per step.
    NoRelaxIterations,
    /// Settling needs at least one stable check.
    NoStableChecks,
}

impl fmt::Display for ClothError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClothError::InvalidSegments {
                segments_w,
                segments_h,
            } => write!(
                f,
                "cloth needs at least one segment per axis (got {}x{})",
                segments_w, segments_h
            ),
            ClothError::InvalidDimensions { width, height } => write!(
                f,
                "cloth dimensions must be positive and finite (got {} x {})",
                width, height
            ),
            ClothError::InvalidMass(m) => {
                write!(f, "particle mass must be positive and finite (got {})", m)
            }
            ClothError::InvalidTimeStep(dt) => {
                write!(f, "time step must be positive and finite (got {})", dt)
            }
            ClothError::NoRelaxIterations => {
                write!(f, "constraint relaxation needs at least one iteration")
            }
            ClothError::NoStableChecks => {
                write!(f, "settling needs at least one stable check")
            }
        }
    }
}

impl std::error::Error for ClothError {}
