use bevy::math::Vec3;

use super::error::ClothError;
use super::params::ClothParams;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    // Current position
    pub position: Vec3,

    // Position one step ago, velocity is implicit
    pub previous_position: Vec3,

    // Accumulated this step, cleared by integrate()
    pub acceleration: Vec3,

    pub mass: f32,
    pub pinned: bool,
}

impl Particle {
    pub fn new(position: Vec3, mass: f32, pinned: bool) -> Particle {
        Particle {
            position,
            previous_position: position,
            acceleration: Vec3::ZERO,
            mass,
            pinned,
        }
    }

    pub fn apply_force(&mut self, force: Vec3) {
        if self.pinned {
            return;
        }
        self.acceleration += force / self.mass;
    }

    /// Advances the particle one Verlet step and returns the displacement
    /// that was applied. The displacement never exceeds `max_displacement`.
    pub fn integrate(&mut self, dt: f32, drag: f32, max_displacement: f32) -> Vec3 {
        if self.pinned {
            return Vec3::ZERO;
        }

        let next = self.position
            + (self.position - self.previous_position) * drag
            + self.acceleration * dt * dt;

        let mut displacement = next - self.position;
        let distance = displacement.length();
        if distance > max_displacement {
            displacement *= max_displacement / distance;
        }

        self.previous_position = self.position;
        self.position += displacement;
        self.acceleration = Vec3::ZERO;

        displacement
    }

    /// Frame-to-frame displacement.
    pub fn velocity(&self) -> Vec3 {
        self.position - self.previous_position
    }

    /// Whether any coordinate is NaN, infinite or beyond `limit`.
    pub fn has_diverged(&self, limit: f32) -> bool {
        !self.position.is_finite() || self.position.abs().max_element() > limit
    }
}

/// Particles of a `(segments_w + 1) x (segments_h + 1)` plane.
///
/// Particle `(u, v)` lives at `u + v * (segments_w + 1)`. Row `v = 0` is the
/// top edge and is always pinned.
#[derive(Debug, Clone)]
pub struct ParticleGrid {
    particles: Vec<Particle>,
    rest_positions: Vec<Vec3>,
    segments_w: usize,
    segments_h: usize,
}

impl ParticleGrid {
    /// Lays out the flat plane described by `params`.
    pub fn from_params(params: &ClothParams) -> Result<ParticleGrid, ClothError> {
        params.validate()?;
        Ok(ParticleGrid::build(
            params.cloth_width,
            params.cloth_height,
            params.segments_w,
            params.segments_h,
            params.mass,
        ))
    }

    // Both segment counts must be non-zero.
    pub(crate) fn build(
        width: f32,
        height: f32,
        segments_w: usize,
        segments_h: usize,
        mass: f32,
    ) -> ParticleGrid {
        let count = (segments_w + 1) * (segments_h + 1);
        let mut particles = Vec::with_capacity(count);
        let mut rest_positions = Vec::with_capacity(count);

        for v in 0..=segments_h {
            for u in 0..=segments_w {
                let position = plane(u, v, width, height, segments_w, segments_h);
                rest_positions.push(position);
                particles.push(Particle::new(position, mass, v == 0));
            }
        }

        ParticleGrid {
            particles,
            rest_positions,
            segments_w,
            segments_h,
        }
    }

    pub fn index(&self, u: usize, v: usize) -> usize {
        u + v * (self.segments_w + 1)
    }

    pub fn columns(&self) -> usize {
        self.segments_w + 1
    }

    pub fn rows(&self) -> usize {
        self.segments_h + 1
    }

    pub fn segments(&self) -> (usize, usize) {
        (self.segments_w, self.segments_h)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particle(&self, index: usize) -> &Particle {
        &self.particles[index]
    }

    pub fn particle_mut(&mut self, index: usize) -> &mut Particle {
        &mut self.particles[index]
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn rest_position(&self, index: usize) -> Vec3 {
        self.rest_positions[index]
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest_positions
    }
}

fn plane(u: usize, v: usize, width: f32, height: f32, segments_w: usize, segments_h: usize) -> Vec3 {
    let x = (u as f32 / segments_w as f32 - 0.5) * width;
    // y grows upwards, so row 0 sits on the top edge.
    let y = (0.5 - v as f32 / segments_h as f32) * height;
    Vec3::new(x, y, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_one_particle_per_vertex() {
        let grid = ParticleGrid::build(4.0, 3.0, 4, 3, 1.0);
        assert_eq!(grid.len(), 5 * 4);
        assert_eq!(grid.columns(), 5);
        assert_eq!(grid.rows(), 4);
    }

    #[test]
    fn only_top_row_is_pinned() {
        let grid = ParticleGrid::build(4.0, 3.0, 4, 3, 1.0);
        for v in 0..grid.rows() {
            for u in 0..grid.columns() {
                assert_eq!(grid.particle(grid.index(u, v)).pinned, v == 0);
            }
        }
    }

    #[test]
    fn lays_out_a_centered_flat_plane() {
        let grid = ParticleGrid::build(4.0, 3.0, 4, 3, 1.0);

        let top_left = grid.particle(grid.index(0, 0)).position;
        let bottom_right = grid.particle(grid.index(4, 3)).position;

        assert_eq!(top_left, Vec3::new(-2.0, 1.5, 0.0));
        assert_eq!(bottom_right, Vec3::new(2.0, -1.5, 0.0));
        assert!(grid.particles().iter().all(|p| p.position.z == 0.0));
    }

    #[test]
    fn from_params_rejects_empty_grids() {
        let params = ClothParams::default().with_segments(0, 3);
        assert!(matches!(
            ParticleGrid::from_params(&params),
            Err(ClothError::InvalidSegments { .. })
        ));

        let grid = ParticleGrid::from_params(&ClothParams::default().with_segments(4, 3)).unwrap();
        assert_eq!(grid.len(), 20);
        assert!(grid.particles().iter().all(|p| p.position.is_finite()));
    }

    #[test]
    fn pinned_particle_ignores_forces() {
        let mut p = Particle::new(Vec3::new(1.0, 2.0, 0.0), 1.0, true);
        p.apply_force(Vec3::new(100.0, 100.0, 100.0));
        assert_eq!(p.integrate(1.0 / 60.0, 0.98, 5.0), Vec3::ZERO);
        assert_eq!(p.position, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn integrate_clamps_large_displacements() {
        let dt = 1.0 / 60.0;
        let mut p = Particle::new(Vec3::ZERO, 2.0, false);
        // Unclamped this would travel 50 units in one step.
        p.apply_force(Vec3::new(50.0 * 2.0 / (dt * dt), 0.0, 0.0));

        let moved = p.integrate(dt, 0.98, 5.0);

        assert!((moved.length() - 5.0).abs() < 1e-4);
        assert!((p.position.x - 5.0).abs() < 1e-4);
        assert_eq!(p.previous_position, Vec3::ZERO);
        assert_eq!(p.acceleration, Vec3::ZERO);
    }

    #[test]
    fn integrate_carries_damped_velocity() {
        let mut p = Particle::new(Vec3::new(1.0, 0.0, 0.0), 1.0, false);
        p.previous_position = Vec3::ZERO;

        p.integrate(1.0 / 60.0, 0.5, 5.0);

        assert!((p.position.x - 1.5).abs() < 1e-6);
        assert_eq!(p.previous_position.x, 1.0);
    }

    #[test]
    fn divergence_detection() {
        let mut p = Particle::new(Vec3::ZERO, 1.0, false);
        assert!(!p.has_diverged(1000.0));

        p.position.y = 2000.0;
        assert!(p.has_diverged(1000.0));

        p.position.y = f32::NAN;
        assert!(p.has_diverged(1000.0));
    }
}
