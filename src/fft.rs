//! Separable 2D FFT passes driven by the butterfly tables.
//!
//! A 2D transform is `log2(N)` horizontal stages followed by `log2(N)`
//! vertical stages. Every stage reads one whole grid and writes the other
//! (ping-pong); since `2 * log2(N)` is always even, the finished transform
//! lands back in the caller's field and no copy-back is needed.
//!
//! Nothing here normalizes. The inverse transform is the raw synthesis sum;
//! [`inverse_scale`] must be applied exactly once downstream, which the
//! field assembler does when it builds output fields.

use num_complex::Complex32;
use rayon::prelude::*;

use crate::butterfly::{ButterflyEntry, ButterflyTable};
use crate::field::{ComplexField, ScalarField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Inverse,
    Forward,
}

/// In-place unnormalized inverse transform (frequency to space).
pub fn inverse(field: &mut ComplexField, scratch: &mut ComplexField, table: &ButterflyTable) {
    run(field, scratch, table, Direction::Inverse);
}

/// In-place unnormalized forward transform (space to frequency).
///
/// Same stage tables as [`inverse`] with conjugated twiddles; mainly used
/// to round-trip fields in diagnostics and tests.
pub fn forward(field: &mut ComplexField, scratch: &mut ComplexField, table: &ButterflyTable) {
    run(field, scratch, table, Direction::Forward);
}

/// Normalization constant `1 / N^2` for the inverse transform. Applied
/// exactly once per pipeline pass, by the assembler.
pub fn inverse_scale(resolution: usize) -> f32 {
    1.0 / (resolution * resolution) as f32
}

/// Copies the real component of `src` into `out`.
///
/// For Hermitian-symmetric spectra the imaginary residue is numeric dust;
/// dropping it here is where the pipeline commits to real-valued output.
pub fn real_part(src: &ComplexField, out: &mut ScalarField) {
    assert_eq!(
        src.resolution(),
        out.resolution(),
        "real_part grids must match"
    );
    out.data
        .par_iter_mut()
        .zip(src.data.par_iter())
        .for_each(|(dst, c)| *dst = c.re);
}

fn run(
    field: &mut ComplexField,
    scratch: &mut ComplexField,
    table: &ButterflyTable,
    direction: Direction,
) {
    let n = table.resolution();
    assert_eq!(
        field.resolution(),
        n,
        "field resolution does not match butterfly table"
    );
    assert_eq!(
        scratch.resolution(),
        n,
        "scratch resolution does not match butterfly table"
    );

    let mut src = &mut field.data;
    let mut dst = &mut scratch.data;

    for stage in 0..table.stages() {
        horizontal_stage(&src[..], &mut dst[..], table.stage_entries(stage), n, direction);
        std::mem::swap(&mut src, &mut dst);
    }
    for stage in 0..table.stages() {
        vertical_stage(&src[..], &mut dst[..], table.stage_entries(stage), n, direction);
        std::mem::swap(&mut src, &mut dst);
    }
    // An even number of swaps, so the result is already in `field`.
}

#[inline]
fn stage_twiddle(entry: &ButterflyEntry, direction: Direction) -> Complex32 {
    match direction {
        Direction::Inverse => entry.twiddle,
        Direction::Forward => entry.twiddle.conj(),
    }
}

/// One butterfly stage along x, every row independently.
fn horizontal_stage(
    src: &[Complex32],
    dst: &mut [Complex32],
    entries: &[ButterflyEntry],
    n: usize,
    direction: Direction,
) {
    dst.par_chunks_mut(n).enumerate().for_each(|(z, out_row)| {
        let in_row = &src[z * n..(z + 1) * n];
        for (x, out) in out_row.iter_mut().enumerate() {
            let e = &entries[x];
            let twiddle = stage_twiddle(e, direction);
            *out = in_row[e.source_a as usize] + twiddle * in_row[e.source_b as usize];
        }
    });
}

/// One butterfly stage along z. Lane index selects source rows, so each
/// output row streams two input rows and the access stays row-major.
fn vertical_stage(
    src: &[Complex32],
    dst: &mut [Complex32],
    entries: &[ButterflyEntry],
    n: usize,
    direction: Direction,
) {
    dst.par_chunks_mut(n).enumerate().for_each(|(z, out_row)| {
        let e = &entries[z];
        let twiddle = stage_twiddle(e, direction);
        let row_a = &src[e.source_a as usize * n..][..n];
        let row_b = &src[e.source_b as usize * n..][..n];
        for (out, (a, b)) in out_row.iter_mut().zip(row_a.iter().zip(row_b.iter())) {
            *out = a + twiddle * b;
        }
    });
}
