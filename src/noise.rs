//! Seeded Gaussian noise grid for spectrum synthesis.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SimulationError;
use crate::field::Field;

/// One independent unit Gaussian pair `(re, im)` per grid cell.
///
/// Generated once per seed and reused across frames, so the sea keeps its
/// identity while time animates phases. Cells are filled in row-major order
/// from a single `StdRng` stream; the layout is part of the determinism
/// contract (same seed and resolution always give the same grid).
pub type NoiseField = Field<[f32; 2]>;

/// Fills a fresh noise grid from `seed`.
pub fn generate(resolution: usize, seed: u64) -> Result<NoiseField, SimulationError> {
    let mut field = NoiseField::allocate(resolution)?;
    let mut rng = StdRng::seed_from_u64(seed);
    for cell in field.data.iter_mut() {
        *cell = gaussian_pair(&mut rng);
    }
    Ok(field)
}

/// Pair of independent unit Gaussians via the Box-Muller transform.
fn gaussian_pair(rng: &mut StdRng) -> [f32; 2] {
    let u1 = rng.gen::<f32>().max(1e-12);
    let u2 = rng.gen::<f32>();

    let r = (-2.0 * u1.ln()).sqrt();
    let theta = std::f32::consts::TAU * u2;

    [r * theta.cos(), r * theta.sin()]
}
