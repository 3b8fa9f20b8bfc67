//! Snapshot/export run configuration.

/// Configuration for a headless capture run.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Number of frames to simulate and capture.
    pub frames: usize,

    /// Simulation time step between captured frames (seconds).
    pub time_step: f32,

    /// Output directory for field images and meshes.
    pub output_dir: String,
}

impl SnapshotConfig {
    pub fn new(frames: usize, time_step: f32) -> Self {
        Self {
            frames,
            time_step,
            output_dir: "snapshots".to_string(),
        }
    }

    /// Total simulated duration (seconds).
    pub fn duration_secs(&self) -> f32 {
        self.frames as f32 * self.time_step
    }

    /// Path for a field image at a given frame.
    pub fn frame_path(&self, field: &str, frame: usize) -> String {
        format!("{}/{}_{:05}.png", self.output_dir, field, frame)
    }

    /// Path for a displaced surface mesh at a given frame.
    pub fn mesh_path(&self, frame: usize) -> String {
        format!("{}/surface_{:05}.obj", self.output_dir, frame)
    }
}
