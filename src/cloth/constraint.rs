use super::particle::{Particle, ParticleGrid};

/// Link between particles `a` and `b`. Indices point into the grid, the
/// constraint does not own the particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub a: usize,
    pub b: usize,
    pub rest_distance: f32,
}

impl Constraint {
    /// Moves both endpoints towards the rest distance. Each free endpoint
    /// takes half of the correction, pinned endpoints stay put.
    pub fn solve(&self, particles: &mut [Particle]) {
        let diff = particles[self.b].position - particles[self.a].position;
        let distance = diff.length();
        if distance == 0.0 || !distance.is_finite() {
            return;
        }

        let half = diff * (1.0 - self.rest_distance / distance) * 0.5;

        if !particles[self.a].pinned {
            particles[self.a].position += half;
        }
        if !particles[self.b].pinned {
            particles[self.b].position -= half;
        }
    }

    pub fn current_distance(&self, particles: &[Particle]) -> f32 {
        particles[self.a].position.distance(particles[self.b].position)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    /// Links every particle to its right and lower neighbour. Horizontal
    /// links come first (row-major), vertical links after. `rest_distance`
    /// is taken as given.
    pub fn build(grid: &ParticleGrid, rest_distance: f32) -> ConstraintSet {
        let (columns, rows) = (grid.columns(), grid.rows());
        let mut constraints =
            Vec::with_capacity((columns - 1) * rows + columns * (rows - 1));

        // Horizontal
        for v in 0..rows {
            for u in 0..columns - 1 {
                constraints.push(Constraint {
                    a: grid.index(u, v),
                    b: grid.index(u + 1, v),
                    rest_distance,
                });
            }
        }

        // Vertical
        for v in 0..rows - 1 {
            for u in 0..columns {
                constraints.push(Constraint {
                    a: grid.index(u, v),
                    b: grid.index(u, v + 1),
                    rest_distance,
                });
            }
        }

        ConstraintSet { constraints }
    }

    /// Gauss-Seidel relaxation: constraints are solved in place, in
    /// insertion order, so later ones see earlier corrections.
    pub fn relax(&self, particles: &mut [Particle], iterations: usize) {
        for _ in 0..iterations {
            for constraint in &self.constraints {
                constraint.solve(particles);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}
