//! Spectrum evolution under deep-water dispersion.
//!
//! Stateless in time: every call rebuilds the frequency grid for the
//! requested instant straight from the base amplitudes, so time can jump
//! forward, backward, or repeat without drift.

use glam::Vec2;
use num_complex::Complex32;
use rayon::prelude::*;

use crate::field::ComplexField;
use crate::params::OceanParameters;
use crate::spectrum::{mirror_index, wavevector, MIN_WAVE_NUMBER};

/// Which output field a frequency grid is being prepared for.
///
/// All five share the same evolved height spectrum; they differ only in a
/// per-cell complex factor (derivative or displacement kernel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumComponent {
    Height,
    SlopeX,
    SlopeZ,
    DisplacementX,
    DisplacementZ,
}

/// Writes the evolved spectrum for `component` at `time` into `out`:
///
/// `h(k, t) = h0(k) exp(i w t) + conj(h0(-k)) exp(-i w t)`, `w = sqrt(g |k|)`,
///
/// then multiplied by the component kernel. The conjugate-mirror term keeps
/// the grid Hermitian-symmetric, which is what guarantees the inverse
/// transform comes out real.
pub fn evolve(
    base: &ComplexField,
    params: &OceanParameters,
    time: f32,
    component: SpectrumComponent,
    out: &mut ComplexField,
) {
    let n = base.resolution();
    assert_eq!(out.resolution(), n, "output grid does not match spectrum");
    let domain_size = params.domain_size;
    let gravity = params.gravity;

    out.data.par_chunks_mut(n).enumerate().for_each(|(z, out_row)| {
        let mz = mirror_index(z, n);
        for (x, out) in out_row.iter_mut().enumerate() {
            let k = wavevector(x, z, n, domain_size);
            let k_len = k.length();

            let h0 = base.get(x, z);
            let h0_mirror = base.get(mirror_index(x, n), mz);

            // Deep-water dispersion; the mirror mode travels the other way.
            let omega_t = (gravity * k_len).sqrt() * time;
            let phase = Complex32::new(omega_t.cos(), omega_t.sin());
            let height = h0 * phase + h0_mirror.conj() * phase.conj();

            *out = height * component_kernel(component, k, k_len);
        }
    });
}

/// Per-cell kernel: identity for height, `i k` for slopes, `-i k / |k|`
/// for horizontal displacement, with the `|k| -> 0` cases pinned to zero.
#[inline]
fn component_kernel(component: SpectrumComponent, k: Vec2, k_len: f32) -> Complex32 {
    match component {
        SpectrumComponent::Height => Complex32::new(1.0, 0.0),
        SpectrumComponent::SlopeX => Complex32::new(0.0, k.x),
        SpectrumComponent::SlopeZ => Complex32::new(0.0, k.y),
        _ if k_len <= MIN_WAVE_NUMBER => Complex32::new(0.0, 0.0),
        SpectrumComponent::DisplacementX => Complex32::new(0.0, -k.x / k_len),
        SpectrumComponent::DisplacementZ => Complex32::new(0.0, -k.y / k_len),
    }
}
