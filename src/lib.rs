//! Spindrift library - spectral FFT ocean surface simulation

pub mod assemble;
pub mod butterfly;
pub mod cli;
pub mod controller;
pub mod error;
pub mod evolve;
pub mod export;
pub mod fft;
pub mod field;
pub mod mesh;
pub mod noise;
pub mod params;
pub mod spectrum;

pub use controller::{OceanSimulation, SimulationState};
pub use error::SimulationError;
pub use params::OceanParameters;
