//! Spatial assembly of the transformed fields.
//!
//! The only place that applies the inverse-FFT normalization and the
//! checkerboard sign, and the only producer of the user-facing height,
//! displacement, and normal grids.

use glam::Vec3;
use rayon::prelude::*;

use crate::error::SimulationError;
use crate::fft;
use crate::field::{ScalarField, Vec2Field, Vec3Field};
use crate::params::OceanParameters;

/// Slopes with magnitude at or below this are treated as exactly flat when
/// reconstructing normals. Numeric safety never depends on it (the normal
/// vector has a fixed y component of 1), it just pins a dead calm to +Y.
const FLAT_SLOPE: f32 = 1e-8;

/// Assembled per-frame surface description, resolution-matched grids.
#[derive(Debug, Clone)]
pub struct AssembledFields {
    /// Vertical displacement in meters.
    pub height: ScalarField,
    /// Horizontal displacement (x, z) in meters.
    pub displacement: Vec2Field,
    /// Unit surface normals, +Y up.
    pub normal: Vec3Field,
}

impl AssembledFields {
    pub fn allocate(resolution: usize) -> Result<Self, SimulationError> {
        let mut fields = Self {
            height: ScalarField::allocate(resolution)?,
            displacement: Vec2Field::allocate(resolution)?,
            normal: Vec3Field::allocate(resolution)?,
        };
        fields.reset();
        Ok(fields)
    }

    /// Returns every output to the calm-water state. A surface nobody has
    /// stepped yet reads as flat water, not as degenerate zero normals.
    pub fn reset(&mut self) {
        self.height.clear();
        self.displacement.clear();
        self.normal.data.fill([0.0, 1.0, 0.0]);
    }
}

/// Combines the five raw inverse-transform outputs into the output fields.
///
/// Per cell: multiply by the checkerboard sign `(-1)^(x+z)` (the spectrum
/// is stored with the zero mode centered, which shifts the spatial result
/// by half the grid in both axes), by the `1/N^2` normalization, and by the
/// amplitude multiplier. Choppiness additionally scales displacement.
/// Normals come from the scaled slopes, so the multiplier steepens them
/// consistently with the heights it exaggerates.
pub fn assemble(
    raw_height: &ScalarField,
    raw_slope_x: &ScalarField,
    raw_slope_z: &ScalarField,
    raw_disp_x: &ScalarField,
    raw_disp_z: &ScalarField,
    params: &OceanParameters,
    out: &mut AssembledFields,
) {
    let n = raw_height.resolution();
    assert_eq!(raw_slope_x.resolution(), n, "slope-x grid mismatch");
    assert_eq!(raw_slope_z.resolution(), n, "slope-z grid mismatch");
    assert_eq!(raw_disp_x.resolution(), n, "displacement-x grid mismatch");
    assert_eq!(raw_disp_z.resolution(), n, "displacement-z grid mismatch");
    assert_eq!(out.height.resolution(), n, "output grid mismatch");

    // The single application of the inverse-transform scale, fused with
    // the user amplitude multiplier.
    let scale = fft::inverse_scale(n) * params.amplitude_multiplier;
    let chop = params.choppiness;

    out.height
        .data
        .par_chunks_mut(n)
        .zip(out.displacement.data.par_chunks_mut(n))
        .zip(out.normal.data.par_chunks_mut(n))
        .enumerate()
        .for_each(|(z, ((height_row, disp_row), normal_row))| {
            for x in 0..n {
                let idx = z * n + x;
                let sign = if (x + z) & 1 == 0 { 1.0f32 } else { -1.0f32 };
                let s = sign * scale;

                height_row[x] = raw_height.data[idx] * s;
                disp_row[x] = [
                    raw_disp_x.data[idx] * s * chop,
                    raw_disp_z.data[idx] * s * chop,
                ];

                let slope_x = raw_slope_x.data[idx] * s;
                let slope_z = raw_slope_z.data[idx] * s;
                normal_row[x] = surface_normal(slope_x, slope_z);
            }
        });
}

/// Unit normal from surface slopes; exactly flat cells snap to +Y.
#[inline]
fn surface_normal(slope_x: f32, slope_z: f32) -> [f32; 3] {
    if slope_x.abs() <= FLAT_SLOPE && slope_z.abs() <= FLAT_SLOPE {
        return [0.0, 1.0, 0.0];
    }
    let n = Vec3::new(-slope_x, 1.0, -slope_z).normalize();
    [n.x, n.y, n.z]
}
