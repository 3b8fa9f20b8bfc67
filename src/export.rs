//! Field export: raw byte snapshots and PNG diagnostics.

use std::str::FromStr;

use crate::error::SimulationError;
use crate::field::{ComplexField, ScalarField, Vec2Field, Vec3Field};

/// Addressable simulation buffers for snapshot export.
///
/// The assembled fields (`Height`, `Displacement`, `Normal`) are what a
/// renderer consumes; the rest are pre-normalization internals kept
/// reachable for debugging spectrum problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldName {
    Height,
    Displacement,
    Normal,
    SlopeX,
    SlopeZ,
    BaseSpectrum,
}

impl FieldName {
    /// Stable lowercase label, used in filenames and CLI flags.
    pub fn label(&self) -> &'static str {
        match self {
            FieldName::Height => "height",
            FieldName::Displacement => "displacement",
            FieldName::Normal => "normal",
            FieldName::SlopeX => "slope-x",
            FieldName::SlopeZ => "slope-z",
            FieldName::BaseSpectrum => "spectrum",
        }
    }
}

impl FromStr for FieldName {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "height" => Ok(FieldName::Height),
            "displacement" => Ok(FieldName::Displacement),
            "normal" => Ok(FieldName::Normal),
            "slope-x" => Ok(FieldName::SlopeX),
            "slope-z" => Ok(FieldName::SlopeZ),
            "spectrum" => Ok(FieldName::BaseSpectrum),
            other => Err(SimulationError::invalid(format!(
                "unknown field name '{}'",
                other
            ))),
        }
    }
}

/// Raw little-endian f32 bytes of a scalar grid.
pub fn scalar_bytes(field: &ScalarField) -> Vec<u8> {
    bytemuck::cast_slice(&field.data).to_vec()
}

/// Raw bytes of a two-component grid, cell-interleaved `[x, z]`.
pub fn vec2_bytes(field: &Vec2Field) -> Vec<u8> {
    bytemuck::cast_slice(&field.data).to_vec()
}

/// Raw bytes of a three-component grid, cell-interleaved `[x, y, z]`.
pub fn vec3_bytes(field: &Vec3Field) -> Vec<u8> {
    bytemuck::cast_slice(&field.data).to_vec()
}

/// Raw bytes of a complex grid, cell-interleaved `[re, im]`.
pub fn complex_bytes(field: &ComplexField) -> Vec<u8> {
    let floats: Vec<f32> = field.data.iter().flat_map(|c| [c.re, c.im]).collect();
    bytemuck::cast_slice(&floats).to_vec()
}

/// Saves a scalar grid as grayscale PNG, zero mapped to mid-gray and the
/// range scaled to the field's own peak.
pub fn save_height_png(field: &ScalarField, path: &str) -> image::ImageResult<()> {
    let n = field.resolution() as u32;
    let peak = field
        .data
        .iter()
        .fold(0.0f32, |m, v| m.max(v.abs()))
        .max(1e-12);
    let pixels: Vec<u8> = field
        .data
        .iter()
        .map(|v| (((v / peak) * 0.5 + 0.5) * 255.0) as u8)
        .collect();
    image::save_buffer(path, &pixels, n, n, image::ColorType::L8)
}

/// Saves a normal grid as RGB PNG with components mapped from [-1, 1].
pub fn save_normal_png(field: &Vec3Field, path: &str) -> image::ImageResult<()> {
    let n = field.resolution() as u32;
    let pixels: Vec<u8> = field
        .data
        .iter()
        .flat_map(|v| v.map(|c| ((c * 0.5 + 0.5) * 255.0) as u8))
        .collect();
    image::save_buffer(path, &pixels, n, n, image::ColorType::Rgb8)
}

/// Saves a displacement grid as RGB PNG, x in red, z in green, scaled to
/// the field's own peak.
pub fn save_displacement_png(field: &Vec2Field, path: &str) -> image::ImageResult<()> {
    let n = field.resolution() as u32;
    let peak = field
        .data
        .iter()
        .fold(0.0f32, |m, &[x, z]| m.max(x.abs()).max(z.abs()))
        .max(1e-12);
    let pixels: Vec<u8> = field
        .data
        .iter()
        .flat_map(|&[x, z]| {
            [
                (((x / peak) * 0.5 + 0.5) * 255.0) as u8,
                (((z / peak) * 0.5 + 0.5) * 255.0) as u8,
                128,
            ]
        })
        .collect();
    image::save_buffer(path, &pixels, n, n, image::ColorType::Rgb8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_name_labels_round_trip() {
        for name in [
            FieldName::Height,
            FieldName::Displacement,
            FieldName::Normal,
            FieldName::SlopeX,
            FieldName::SlopeZ,
            FieldName::BaseSpectrum,
        ] {
            assert_eq!(name.label().parse::<FieldName>().unwrap(), name);
        }
        assert!("bogus".parse::<FieldName>().is_err());
    }

    #[test]
    fn test_scalar_bytes_length_and_content() {
        let mut field = ScalarField::allocate(4).unwrap();
        field.set(0, 0, 1.5);
        let bytes = scalar_bytes(&field);
        assert_eq!(bytes.len(), 16 * 4);
        assert_eq!(&bytes[0..4], &1.5f32.to_le_bytes());
    }

    #[test]
    fn test_complex_bytes_interleave() {
        let mut field = ComplexField::allocate(2).unwrap();
        field.set(0, 0, num_complex::Complex32::new(1.0, -2.0));
        let bytes = complex_bytes(&field);
        assert_eq!(bytes.len(), 4 * 2 * 4);
        assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[4..8], &(-2.0f32).to_le_bytes());
    }
}
