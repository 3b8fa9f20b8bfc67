//! Command-line argument parsing.

use clap::Parser;

use crate::export::FieldName;
use crate::params::{OceanParameters, SnapshotConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "spindrift")]
#[command(about = "Spectral FFT ocean surface simulator", long_about = None)]
pub struct Args {
    /// Grid resolution per side (power of two)
    #[arg(long, value_name = "CELLS", default_value = "256")]
    pub resolution: usize,

    /// Physical patch size (meters)
    #[arg(long, value_name = "METERS", default_value = "1000")]
    pub domain_size: f32,

    /// Wind speed (m/s)
    #[arg(long, value_name = "MPS", default_value = "6")]
    pub wind_speed: f32,

    /// Wind direction x component
    #[arg(long, value_name = "X", default_value = "1", allow_negative_numbers = true)]
    pub wind_x: f32,

    /// Wind direction z component
    #[arg(long, value_name = "Z", default_value = "0", allow_negative_numbers = true)]
    pub wind_z: f32,

    /// Phillips spectrum energy constant
    #[arg(long, value_name = "A", default_value = "5e-4")]
    pub amplitude: f32,

    /// Horizontal displacement scale
    #[arg(long, value_name = "FACTOR", default_value = "1")]
    pub choppiness: f32,

    /// Uniform output scale
    #[arg(long, value_name = "FACTOR", default_value = "1")]
    pub amplitude_multiplier: f32,

    /// Noise seed
    #[arg(long, value_name = "SEED", default_value = "42")]
    pub seed: u64,

    /// Number of frames to capture
    #[arg(long, value_name = "COUNT", default_value = "1")]
    pub frames: usize,

    /// Simulated time between frames (seconds)
    #[arg(long, value_name = "SECONDS", default_value = "0.1")]
    pub time_step: f32,

    /// Output directory for snapshots
    #[arg(long, value_name = "DIR", default_value = "snapshots")]
    pub output_dir: String,

    /// Fields to save per frame: height, displacement, normal
    #[arg(long, value_name = "NAME", default_values = ["height", "normal"])]
    pub fields: Vec<String>,

    /// Also write the displaced surface mesh as OBJ per frame
    #[arg(long)]
    pub obj: bool,
}

impl Args {
    /// Ocean parameters from command-line arguments
    pub fn ocean_parameters(&self) -> OceanParameters {
        OceanParameters {
            resolution: self.resolution,
            domain_size: self.domain_size,
            wind_direction: [self.wind_x, self.wind_z],
            wind_speed: self.wind_speed,
            amplitude: self.amplitude,
            choppiness: self.choppiness,
            amplitude_multiplier: self.amplitude_multiplier,
            seed: self.seed,
            ..Default::default()
        }
    }

    /// Parse requested snapshot fields, warning on unknown names
    pub fn parse_fields(&self) -> Vec<FieldName> {
        let mut fields = Vec::new();
        for name in &self.fields {
            match name.to_lowercase().parse::<FieldName>() {
                Ok(field) => fields.push(field),
                Err(_) => {
                    eprintln!("Warning: Unknown field '{}', skipping", name);
                }
            }
        }
        fields
    }

    /// Create snapshot configuration and its output directory
    pub fn snapshot_config(&self) -> SnapshotConfig {
        let mut config = SnapshotConfig::new(self.frames, self.time_step);
        config.output_dir = self.output_dir.clone();

        std::fs::create_dir_all(&config.output_dir).expect("Failed to create output directory");

        config
    }
}
