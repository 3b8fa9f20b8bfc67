//! Phillips spectrum and base amplitude generation.
//!
//! Produces the time-independent `h0(k)` grid that the evolution stage
//! rephases every frame. All wavevector indexing conventions live here;
//! other stages import them rather than re-deriving.

use std::f32::consts::TAU;

use glam::Vec2;
use num_complex::Complex32;
use rayon::prelude::*;

use crate::field::ComplexField;
use crate::noise::NoiseField;
use crate::params::OceanParameters;

/// Wavenumbers at or below this are treated as the zero mode. The smallest
/// physical wavenumber is 2*pi/domain_size, orders of magnitude above this
/// for any sane domain.
pub const MIN_WAVE_NUMBER: f32 = 1e-6;

/// Wavevector for grid cell `(x, z)`, centered so the zero mode sits at
/// `(n/2, n/2)`: `k = 2*pi * (x - n/2, z - n/2) / domain_size`.
#[inline]
pub fn wavevector(x: usize, z: usize, n: usize, domain_size: f32) -> Vec2 {
    let half = (n / 2) as f32;
    Vec2::new(
        TAU * (x as f32 - half) / domain_size,
        TAU * (z as f32 - half) / domain_size,
    )
}

/// Index of the cell holding `-k` along one axis: `(n - i) % n`.
///
/// Index 0 (the negative Nyquist bin) is its own mirror; index `n/2`
/// (the zero mode) likewise maps to itself.
#[inline]
pub fn mirror_index(i: usize, n: usize) -> usize {
    (n - i) % n
}

/// Phillips spectrum `P(k)` for a single wavevector.
///
/// `A * exp(-1/(|k| L_w)^2) / |k|^4 * |k_hat . w_hat|^p * exp(-|k|^2 l^2)`
/// where `L_w = V^2 / g` is the largest wave the wind can sustain and `l`
/// suppresses ripples shorter than the cutoff. Returns 0 for the zero mode
/// and for zero wind (a dead calm has no spectrum).
pub fn phillips(k: Vec2, params: &OceanParameters) -> f32 {
    let k_len = k.length();
    if k_len <= MIN_WAVE_NUMBER {
        return 0.0;
    }
    if params.wind_speed <= 0.0 {
        return 0.0;
    }
    let k_len_sq = k_len * k_len;

    // Largest possible waves arising from wind of speed V
    let l_wind = params.wind_speed * params.wind_speed / params.gravity;
    let k_hat = k / k_len;

    let alignment = k_hat.dot(params.wind_unit()).abs();
    let directional = alignment.powf(params.directional_power);

    let base =
        params.amplitude * (-1.0 / (k_len_sq * l_wind * l_wind)).exp() / (k_len_sq * k_len_sq);

    // Suppression of waves shorter than the cutoff length
    let cutoff = (-k_len_sq * params.small_wave_cutoff * params.small_wave_cutoff).exp();

    base * directional * cutoff
}

/// Fills `out` with the base amplitudes `h0(k)` for every cell:
/// `h0 = (xi_re + i xi_im) * sqrt(P(k) / 2)`.
///
/// Pure given the noise grid: regenerating with the same noise and
/// parameters writes an identical spectrum. `out` and `noise` must share
/// the grid resolution.
pub fn generate_h0(noise: &NoiseField, params: &OceanParameters, out: &mut ComplexField) {
    let n = out.resolution();
    assert_eq!(noise.resolution(), n, "noise grid does not match spectrum grid");

    out.data.par_chunks_mut(n).enumerate().for_each(|(z, out_row)| {
        for (x, out) in out_row.iter_mut().enumerate() {
            let k = wavevector(x, z, n, params.domain_size);
            let amp = (0.5 * phillips(k, params)).sqrt();
            let [xi_re, xi_im] = noise.get(x, z);
            *out = Complex32::new(xi_re * amp, xi_im * amp);
        }
    });
}
