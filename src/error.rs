//! Error taxonomy for the simulation pipeline.

use thiserror::Error;

/// Everything that can go wrong between `initialize` and `teardown`.
///
/// Numeric trouble inside a frame (NaN/Inf escaping the spectrum math) is not
/// represented here: the spectrum generator zeroes the degenerate wavenumbers
/// at the source, so downstream stages never see non-finite input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("simulation is not initialized (call initialize first)")]
    NotInitialized,

    #[error("resource allocation failed: {reason}")]
    ResourceAllocation { reason: String },
}

impl SimulationError {
    /// Shorthand for the common rejection path in parameter validation.
    pub fn invalid(reason: impl Into<String>) -> Self {
        SimulationError::InvalidParameter {
            reason: reason.into(),
        }
    }
}
