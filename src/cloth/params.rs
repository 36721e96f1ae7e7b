use bevy::math::Vec3;

use super::error::ClothError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClothParams {
    pub cloth_width: f32,
    pub cloth_height: f32,
    pub segments_w: usize,
    pub segments_h: usize,
    pub mass: f32,

    pub gravity: Vec3,
    pub damping: f32,   // drag = 1 - damping
    pub time_step: f32, // fixed, independent of frame rate
    pub max_displacement: f32,
    pub explosion_limit: f32,
    pub relax_iterations: usize,
    pub rest_factor: f32, // rest distance as a fraction of grid spacing
    pub flatten_strength: f32,

    pub wind_scale: f32,
    pub max_scroll_velocity: f32,
    pub scroll_threshold: f32,
    pub wind_rise_secs: f64,
    pub wind_fall_secs: f64,

    pub scroll_idle_secs: f64,
    pub settle_delay_secs: f64,
    pub recheck_secs: f64,
    pub stable_velocity: f32,
    pub stable_z_velocity: f32,
    pub stable_checks_required: u32,
}

impl Default for ClothParams {
    fn default() -> Self {
        ClothParams {
            cloth_width: 4.0,
            cloth_height: 3.0,
            segments_w: 20,
            segments_h: 15,
            mass: 1.0,

            gravity: Vec3::new(0.0, -0.2, 0.0),
            damping: 0.02,
            time_step: 1.0 / 60.0,
            max_displacement: 5.0,
            explosion_limit: 1000.0,
            relax_iterations: 5,
            rest_factor: 0.9,
            flatten_strength: 0.02,

            wind_scale: 0.15,
            max_scroll_velocity: 15.0,
            scroll_threshold: 1.0,
            wind_rise_secs: 0.2,
            wind_fall_secs: 1.2,

            scroll_idle_secs: 0.5,
            settle_delay_secs: 1.5,
            recheck_secs: 0.5,
            stable_velocity: 0.01,
            stable_z_velocity: 0.05,
            stable_checks_required: 1,
        }
    }
}

impl ClothParams {
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.cloth_width = width;
        self.cloth_height = height;
        self
    }

    pub fn with_segments(mut self, segments_w: usize, segments_h: usize) -> Self {
        self.segments_w = segments_w;
        self.segments_h = segments_h;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_stable_checks(mut self, checks: u32) -> Self {
        self.stable_checks_required = checks.max(1);
        self
    }

    /// Velocity damping applied by the Verlet step.
    pub fn drag(&self) -> f32 {
        1.0 - self.damping
    }

    /// Target separation of neighbouring particles. Kept below the grid
    /// spacing so the banner stays taut.
    pub fn rest_distance(&self) -> f32 {
        (self.cloth_width / self.segments_w as f32) * self.rest_factor
    }

    /// Number of floats in the renderer's position buffer.
    pub fn vertex_buffer_len(&self) -> usize {
        3 * (self.segments_w + 1) * (self.segments_h + 1)
    }

    pub fn validate(&self) -> Result<(), ClothError> {
        if self.segments_w == 0 || self.segments_h == 0 {
            return Err(ClothError::InvalidSegments {
                segments_w: self.segments_w,
                segments_h: self.segments_h,
            });
        }

        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.cloth_width) || !positive(self.cloth_height) {
            return Err(ClothError::InvalidDimensions {
                width: self.cloth_width,
                height: self.cloth_height,
            });
        }
        if !positive(self.mass) {
            return Err(ClothError::InvalidMass(self.mass));
        }
        if !positive(self.time_step) {
            return Err(ClothError::InvalidTimeStep(self.time_step));
        }
        if self.relax_iterations == 0 {
            return Err(ClothError::NoRelaxIterations);
        }
        if self.stable_checks_required == 0 {
            return Err(ClothError::NoStableChecks);
        }

        Ok(())
    }
}
