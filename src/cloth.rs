//! Scroll-driven cloth banner: a Verlet particle grid hung from its top
//! edge, relaxed with structural distance constraints and pushed out of its
//! plane by wind derived from scroll velocity.
//!
//! Nothing here depends on the ECS or on rendering. The caller feeds scroll
//! samples and clock readings and receives vertex positions through a
//! [`VertexSink`].

pub mod constraint;
pub mod error;
pub mod params;
pub mod particle;
pub mod projection;
pub mod stepper;
pub mod vertex;
pub mod wind;

pub use constraint::{Constraint, ConstraintSet};
pub use error::ClothError;
pub use params::ClothParams;
pub use particle::{Particle, ParticleGrid};
pub use projection::{PerspectiveCamera, PixelRect, Viewport, WorldPlacement};
pub use stepper::{ClothSim, SimMode, StepOutcome, Tick};
pub use vertex::{VertexBuffer, VertexSink};
pub use wind::Wind;
