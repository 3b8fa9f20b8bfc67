//! Precomputed butterfly stage tables for the radix-2 FFT.
//!
//! Every stage of the transform is a uniform gather: each output lane reads
//! two source lanes and applies one twiddle. Precomputing (source_a,
//! source_b, twiddle) per lane per stage turns the FFT inner loop into
//! straight-line arithmetic with no branching on wing position, which is the
//! same shape a GPU dispatch would want.

use num_complex::Complex32;

use crate::error::SimulationError;

/// One butterfly operation: `out[lane] = src[source_a] + twiddle * src[source_b]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButterflyEntry {
    pub source_a: u32,
    pub source_b: u32,
    /// Twiddle for the inverse (synthesis) direction, `exp(+2*pi*i*k/span)`.
    /// The forward transform conjugates this on the fly.
    pub twiddle: Complex32,
}

/// All `log2(N)` stages of butterfly entries for a transform of length `N`,
/// plus the bit-reversal permutation.
///
/// The input permutation is folded into stage 0's source indices, so callers
/// never reorder data themselves. A table is valid only for the resolution
/// it was built for; the pipeline asserts the match on every pass.
#[derive(Debug, Clone)]
pub struct ButterflyTable {
    resolution: usize,
    stages: usize,
    /// Stage-major: `entries[stage * resolution + lane]`.
    entries: Vec<ButterflyEntry>,
    bit_reverse: Vec<u32>,
}

impl ButterflyTable {
    /// Builds the stage tables for a transform of length `resolution`.
    ///
    /// Deterministic and a pure function of `resolution`. Fails with
    /// `InvalidParameter` when the length is not a power of two >= 2.
    pub fn build(resolution: usize) -> Result<Self, SimulationError> {
        if resolution < 2 || !resolution.is_power_of_two() {
            return Err(SimulationError::invalid(format!(
                "transform length must be a power of two >= 2, got {}",
                resolution
            )));
        }
        let stages = resolution.trailing_zeros() as usize;

        let bit_reverse: Vec<u32> = (0..resolution as u32)
            .map(|i| i.reverse_bits() >> (32 - stages))
            .collect();

        let mut entries = Vec::with_capacity(stages * resolution);
        for stage in 0..stages {
            let half = 1usize << stage;
            let span = half << 1;
            for lane in 0..resolution {
                let offset = lane & (span - 1);
                let (mut a, mut b) = if offset < half {
                    (lane, lane + half)
                } else {
                    (lane - half, lane)
                };
                // Stage 0 reads the raw input, which the decimation ordering
                // expects in bit-reversed positions.
                if stage == 0 {
                    a = bit_reverse[a] as usize;
                    b = bit_reverse[b] as usize;
                }
                let angle = std::f32::consts::TAU * offset as f32 / span as f32;
                entries.push(ButterflyEntry {
                    source_a: a as u32,
                    source_b: b as u32,
                    twiddle: Complex32::new(angle.cos(), angle.sin()),
                });
            }
        }

        Ok(Self {
            resolution,
            stages,
            entries,
            bit_reverse,
        })
    }

    /// Transform length this table was built for.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Number of butterfly stages, `log2(resolution)`.
    pub fn stages(&self) -> usize {
        self.stages
    }

    /// All entries for one stage, indexed by lane.
    #[inline]
    pub fn stage_entries(&self, stage: usize) -> &[ButterflyEntry] {
        let start = stage * self.resolution;
        &self.entries[start..start + self.resolution]
    }

    /// Single entry lookup (tests and diagnostics; the pipeline walks
    /// whole stages).
    #[inline]
    pub fn entry(&self, stage: usize, lane: usize) -> &ButterflyEntry {
        &self.entries[stage * self.resolution + lane]
    }

    /// Bit-reversed counterpart of `lane`.
    #[inline]
    pub fn bit_reversed(&self, lane: usize) -> usize {
        self.bit_reverse[lane] as usize
    }
}
