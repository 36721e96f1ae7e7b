use super::particle::Particle;

/// Receives particle positions after each successful step. The simulation
/// only writes to a sink, it never reads renderer state back.
pub trait VertexSink {
    fn upload(&mut self, particles: &[Particle]);
}

/// Flat `[x0, y0, z0, x1, ...]` position buffer with a dirty flag.
#[derive(Debug, Clone, Default)]
pub struct VertexBuffer {
    positions: Vec<f32>,
    needs_update: bool,
}

impl VertexBuffer {
    pub fn new(len: usize) -> VertexBuffer {
        VertexBuffer {
            positions: vec![0.0; len],
            needs_update: false,
        }
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Called by the renderer once it has consumed the buffer.
    pub fn mark_clean(&mut self) {
        self.needs_update = false;
    }
}

impl VertexSink for VertexBuffer {
    fn upload(&mut self, particles: &[Particle]) {
        self.positions.resize(particles.len() * 3, 0.0);
        for (chunk, particle) in self.positions.chunks_exact_mut(3).zip(particles) {
            chunk.copy_from_slice(&particle.position.to_array());
        }
        self.needs_update = true;
    }
}
