use crate::constants::{FIREFLY_HEIGHT, FIREFLY_SPREAD_XZ};
use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Per-point GPU instance: position plus a size multiplier.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FireflyInstance {
    pub position: [f32; 3],
    pub scale: f32,
}

/// Static point cloud drifting above the scene. Motion is done in the shader.
#[derive(Clone, Debug)]
pub struct FireflyField {
    pub positions: Vec<Vec3>,
    pub scales: Vec<f32>,
}

impl FireflyField {
    /// Points are spread over a 4×4 footprint centred on the origin and up
    /// to [`FIREFLY_HEIGHT`] above the ground; scales are in \[0, 1).
    pub fn generate(count: usize, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let mut positions = Vec::with_capacity(count);
        let mut scales = Vec::with_capacity(count);
        for _ in 0..count {
            positions.push(Vec3::new(
                (rng.gen::<f32>() - 0.5) * FIREFLY_SPREAD_XZ,
                rng.gen::<f32>() * FIREFLY_HEIGHT,
                (rng.gen::<f32>() - 0.5) * FIREFLY_SPREAD_XZ,
            ));
            scales.push(rng.gen::<f32>());
        }
        Self { positions, scales }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn instances(&self) -> Vec<FireflyInstance> {
        self.positions
            .iter()
            .zip(&self.scales)
            .map(|(p, s)| FireflyInstance {
                position: p.to_array(),
                scale: *s,
            })
            .collect()
    }
}
