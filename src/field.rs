//! Owned square 2D buffers shared by every pipeline stage.

use num_complex::Complex32;

use crate::error::SimulationError;

/// Largest grid edge the controller will allocate. Past this point a single
/// frame needs gigabytes of working memory and the request is treated as an
/// allocation failure rather than a tuning knob.
pub const MAX_RESOLUTION: usize = 2048;

/// Row-major square grid of `T`, `resolution * resolution` cells.
///
/// Cell `(x, z)` lives at index `z * resolution + x`. Every stage of the
/// pipeline indexes this way; the convention is fixed here and nowhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<T> {
    resolution: usize,
    pub data: Vec<T>,
}

/// Frequency-domain or intermediate complex grid.
pub type ComplexField = Field<Complex32>;
/// Real-valued grid (heights, slopes, raw displacements).
pub type ScalarField = Field<f32>;
/// Two-component grid (horizontal displacement).
pub type Vec2Field = Field<[f32; 2]>;
/// Three-component grid (unit surface normals).
pub type Vec3Field = Field<[f32; 3]>;

impl<T> Field<T> {
    /// Grid edge length in cells.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Flat index of cell `(x, z)`.
    #[inline]
    pub fn idx(&self, x: usize, z: usize) -> usize {
        z * self.resolution + x
    }
}

impl<T: Clone + Default> Field<T> {
    /// Allocates a zeroed `resolution x resolution` grid.
    ///
    /// Fails with `ResourceAllocation` when the edge exceeds
    /// [`MAX_RESOLUTION`]; the caller is expected to surface that verbatim.
    pub fn allocate(resolution: usize) -> Result<Self, SimulationError> {
        if resolution > MAX_RESOLUTION {
            return Err(SimulationError::ResourceAllocation {
                reason: format!(
                    "grid edge {} exceeds the supported maximum of {}",
                    resolution, MAX_RESOLUTION
                ),
            });
        }
        let cells = resolution * resolution;
        Ok(Self {
            resolution,
            data: vec![T::default(); cells],
        })
    }

    /// Resets every cell to `T::default()`.
    pub fn clear(&mut self) {
        self.data.fill(T::default());
    }
}

impl<T: Copy> Field<T> {
    #[inline]
    pub fn get(&self, x: usize, z: usize) -> T {
        self.data[self.idx(x, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, z: usize, value: T) {
        let i = self.idx(x, z);
        self.data[i] = value;
    }
}
