//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (meters, seconds, etc.)
//! - Documented ranges and meanings
//! - Validation before any buffer is allocated

mod export;
mod ocean;

// Re-export all types
pub use export::SnapshotConfig;
pub use ocean::OceanParameters;
