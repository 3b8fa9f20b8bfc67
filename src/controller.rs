//! Simulation lifecycle: owns every buffer and runs the per-frame pipeline.
//!
//! The controller is the only holder of working memory. Pipeline stages
//! borrow what they need per call and retain nothing, so reinitialization
//! is one drop plus one rebuild and stale-table bugs have nowhere to live.

use log::{debug, info};

use crate::assemble::{self, AssembledFields};
use crate::butterfly::ButterflyTable;
use crate::error::SimulationError;
use crate::evolve::{self, SpectrumComponent};
use crate::export::{self, FieldName};
use crate::fft;
use crate::field::{ComplexField, ScalarField, Vec2Field, Vec3Field};
use crate::noise::{self, NoiseField};
use crate::params::OceanParameters;
use crate::spectrum;

/// Lifecycle phase of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    /// No buffers allocated. Only `initialize` leaves this state.
    Uninitialized,
    /// Buffers allocated and spectrum generated; no frame stepped yet.
    Ready,
    /// At least one frame has been produced since the last (re)build.
    Running,
}

/// Working memory for one simulation generation.
struct SimulationBuffers {
    /// Per-seed Gaussian draws, kept so the sea's identity survives until
    /// an explicit reseed.
    noise: NoiseField,
    base_spectrum: ComplexField,
    butterfly: ButterflyTable,
    /// Frequency-domain working grid, reused for every component.
    work: ComplexField,
    /// Ping-pong partner for the FFT stages.
    scratch: ComplexField,
    raw_height: ScalarField,
    raw_slope_x: ScalarField,
    raw_slope_z: ScalarField,
    raw_disp_x: ScalarField,
    raw_disp_z: ScalarField,
    output: AssembledFields,
}

impl SimulationBuffers {
    fn build(params: &OceanParameters) -> Result<Self, SimulationError> {
        let n = params.resolution;
        let noise = noise::generate(n, params.seed)?;
        let mut base_spectrum = ComplexField::allocate(n)?;
        spectrum::generate_h0(&noise, params, &mut base_spectrum);
        let butterfly = ButterflyTable::build(n)?;
        Ok(Self {
            noise,
            base_spectrum,
            butterfly,
            work: ComplexField::allocate(n)?,
            scratch: ComplexField::allocate(n)?,
            raw_height: ScalarField::allocate(n)?,
            raw_slope_x: ScalarField::allocate(n)?,
            raw_slope_z: ScalarField::allocate(n)?,
            raw_disp_x: ScalarField::allocate(n)?,
            raw_disp_z: ScalarField::allocate(n)?,
            output: AssembledFields::allocate(n)?,
        })
    }

    fn reseed(&mut self, params: &OceanParameters) -> Result<(), SimulationError> {
        self.noise = noise::generate(params.resolution, params.seed)?;
        spectrum::generate_h0(&self.noise, params, &mut self.base_spectrum);
        // No frame of the new sea exists yet; the old one must not leak out.
        self.output.reset();
        Ok(())
    }

    /// Evolves one component and transforms it back to the spatial domain.
    fn transform(&mut self, params: &OceanParameters, time: f32, component: SpectrumComponent) {
        evolve::evolve(&self.base_spectrum, params, time, component, &mut self.work);
        fft::inverse(&mut self.work, &mut self.scratch, &self.butterfly);
    }

    /// Full frame: five spectra through the inverse transform, then one
    /// assembly pass. Each stage finishes before the next reads from it.
    fn process_frame(&mut self, params: &OceanParameters, time: f32) {
        self.transform(params, time, SpectrumComponent::Height);
        fft::real_part(&self.work, &mut self.raw_height);
        self.transform(params, time, SpectrumComponent::SlopeX);
        fft::real_part(&self.work, &mut self.raw_slope_x);
        self.transform(params, time, SpectrumComponent::SlopeZ);
        fft::real_part(&self.work, &mut self.raw_slope_z);
        self.transform(params, time, SpectrumComponent::DisplacementX);
        fft::real_part(&self.work, &mut self.raw_disp_x);
        self.transform(params, time, SpectrumComponent::DisplacementZ);
        fft::real_part(&self.work, &mut self.raw_disp_z);

        assemble::assemble(
            &self.raw_height,
            &self.raw_slope_x,
            &self.raw_slope_z,
            &self.raw_disp_x,
            &self.raw_disp_z,
            params,
            &mut self.output,
        );
    }
}

struct Active {
    params: OceanParameters,
    buffers: SimulationBuffers,
}

/// Spectral ocean simulation with an explicit lifecycle.
///
/// ```no_run
/// use spindrift::controller::OceanSimulation;
/// use spindrift::params::OceanParameters;
///
/// let mut sim = OceanSimulation::new();
/// sim.initialize(OceanParameters::default())?;
/// sim.step(0.0)?;
/// let heights = sim.height_field()?;
/// # Ok::<(), spindrift::error::SimulationError>(())
/// ```
pub struct OceanSimulation {
    state: SimulationState,
    // Invariant: `active.is_some()` exactly when state is not Uninitialized.
    active: Option<Active>,
}

impl Default for OceanSimulation {
    fn default() -> Self {
        Self::new()
    }
}

impl OceanSimulation {
    pub fn new() -> Self {
        Self {
            state: SimulationState::Uninitialized,
            active: None,
        }
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Validates parameters, allocates every buffer, and generates the base
    /// spectrum. On failure the controller is left uninitialized with
    /// nothing allocated, never half-built.
    ///
    /// Calling this on a live controller releases the previous generation
    /// first, so it doubles as a full reconfigure.
    pub fn initialize(&mut self, params: OceanParameters) -> Result<(), SimulationError> {
        params.validate()?;

        // Release the old generation before allocating the new one.
        self.active = None;
        self.state = SimulationState::Uninitialized;

        let buffers = SimulationBuffers::build(&params)?;
        info!(
            "ocean initialized: {0}x{0} cells over {1} m, wind {2} m/s, seed {3}",
            params.resolution, params.domain_size, params.wind_speed, params.seed
        );
        self.active = Some(Active { params, buffers });
        self.state = SimulationState::Ready;
        Ok(())
    }

    /// Rebuilds with new parameters. Same contract as [`initialize`];
    /// callers reach for this on resolution or domain changes.
    ///
    /// [`initialize`]: OceanSimulation::initialize
    pub fn reset(&mut self, params: OceanParameters) -> Result<(), SimulationError> {
        self.initialize(params)
    }

    /// Replaces the Gaussian noise and regenerates the base spectrum under
    /// a new seed, keeping every allocation. The controller drops back to
    /// `Ready` and the outputs read as calm water until the new sea is
    /// stepped.
    pub fn reseed(&mut self, seed: u64) -> Result<(), SimulationError> {
        let active = self
            .active
            .as_mut()
            .ok_or(SimulationError::NotInitialized)?;
        active.params.seed = seed;
        active.buffers.reseed(&active.params)?;
        self.state = SimulationState::Ready;
        info!("ocean reseeded with {}", seed);
        Ok(())
    }

    /// Produces the surface for absolute time `time` (seconds).
    ///
    /// Stateless in time: any order of times is valid and a repeated time
    /// reproduces its frame exactly.
    pub fn step(&mut self, time: f32) -> Result<(), SimulationError> {
        let active = self
            .active
            .as_mut()
            .ok_or(SimulationError::NotInitialized)?;
        debug!("stepping ocean to t = {:.3} s", time);
        active.buffers.process_frame(&active.params, time);
        self.state = SimulationState::Running;
        Ok(())
    }

    /// Releases all buffers and returns to `Uninitialized`. Idempotent.
    pub fn teardown(&mut self) {
        if self.active.take().is_some() {
            info!("ocean simulation torn down");
        }
        self.state = SimulationState::Uninitialized;
    }

    fn active(&self) -> Result<&Active, SimulationError> {
        self.active.as_ref().ok_or(SimulationError::NotInitialized)
    }

    /// Parameters of the live simulation.
    pub fn parameters(&self) -> Result<&OceanParameters, SimulationError> {
        Ok(&self.active()?.params)
    }

    pub fn resolution(&self) -> Result<usize, SimulationError> {
        Ok(self.active()?.params.resolution)
    }

    pub fn domain_size(&self) -> Result<f32, SimulationError> {
        Ok(self.active()?.params.domain_size)
    }

    pub fn amplitude_multiplier(&self) -> Result<f32, SimulationError> {
        Ok(self.active()?.params.amplitude_multiplier)
    }

    /// Vertical displacement per cell (meters). Zero until the first step.
    pub fn height_field(&self) -> Result<&ScalarField, SimulationError> {
        Ok(&self.active()?.buffers.output.height)
    }

    /// Horizontal displacement per cell (meters).
    pub fn displacement_field(&self) -> Result<&Vec2Field, SimulationError> {
        Ok(&self.active()?.buffers.output.displacement)
    }

    /// Unit surface normals per cell.
    pub fn normal_field(&self) -> Result<&Vec3Field, SimulationError> {
        Ok(&self.active()?.buffers.output.normal)
    }

    /// Bilinear height probe at a world position, world origin at the patch
    /// center. The patch tiles, so any coordinate is in range.
    pub fn sample_height(&self, world_x: f32, world_z: f32) -> Result<f32, SimulationError> {
        let active = self.active()?;
        let n = active.params.resolution;
        let height = &active.buffers.output.height;

        let half = active.params.domain_size * 0.5;
        let gx = (world_x + half) / active.params.cell_size();
        let gz = (world_z + half) / active.params.cell_size();

        let fx = gx - gx.floor();
        let fz = gz - gz.floor();
        let wrap = |cell: f32, offset: i64| -> usize {
            (cell.floor() as i64 + offset).rem_euclid(n as i64) as usize
        };
        let (x0, x1) = (wrap(gx, 0), wrap(gx, 1));
        let (z0, z1) = (wrap(gz, 0), wrap(gz, 1));

        let bottom = height.get(x0, z0) * (1.0 - fx) + height.get(x1, z0) * fx;
        let top = height.get(x0, z1) * (1.0 - fx) + height.get(x1, z1) * fx;
        Ok(bottom * (1.0 - fz) + top * fz)
    }

    /// Serializes a named buffer to little-endian bytes (debug hook).
    pub fn export_field(&self, field: FieldName) -> Result<Vec<u8>, SimulationError> {
        let buffers = &self.active()?.buffers;
        Ok(match field {
            FieldName::Height => export::scalar_bytes(&buffers.output.height),
            FieldName::Displacement => export::vec2_bytes(&buffers.output.displacement),
            FieldName::Normal => export::vec3_bytes(&buffers.output.normal),
            FieldName::SlopeX => export::scalar_bytes(&buffers.raw_slope_x),
            FieldName::SlopeZ => export::scalar_bytes(&buffers.raw_slope_z),
            FieldName::BaseSpectrum => export::complex_bytes(&buffers.base_spectrum),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> OceanParameters {
        OceanParameters {
            resolution: 16,
            domain_size: 100.0,
            wind_speed: 5.0,
            amplitude: 1e-3,
            ..Default::default()
        }
    }

    #[test]
    fn test_step_before_initialize_fails() {
        let mut sim = OceanSimulation::new();
        assert_eq!(sim.state(), SimulationState::Uninitialized);
        assert_eq!(sim.step(0.0), Err(SimulationError::NotInitialized));
        // Still uninitialized; the failed call must not change state.
        assert_eq!(sim.state(), SimulationState::Uninitialized);
        assert_eq!(sim.step(1.0), Err(SimulationError::NotInitialized));
    }

    #[test]
    fn test_initialize_reaches_ready() {
        let mut sim = OceanSimulation::new();
        sim.initialize(small_params()).unwrap();
        assert_eq!(sim.state(), SimulationState::Ready);
        assert_eq!(sim.resolution().unwrap(), 16);
        assert_eq!(sim.domain_size().unwrap(), 100.0);

        // Outputs exist and read as calm water before the first step.
        assert!(sim.height_field().unwrap().data.iter().all(|&h| h == 0.0));
        assert!(sim
            .normal_field()
            .unwrap()
            .data
            .iter()
            .all(|&v| v == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_initialize_rejects_bad_resolution() {
        let mut sim = OceanSimulation::new();
        let mut params = small_params();
        params.resolution = 37;
        assert!(matches!(
            sim.initialize(params),
            Err(SimulationError::InvalidParameter { .. })
        ));
        assert_eq!(sim.state(), SimulationState::Uninitialized);
    }

    #[test]
    fn test_oversized_resolution_is_allocation_failure() {
        let mut sim = OceanSimulation::new();
        let mut params = small_params();
        params.resolution = 4096;
        assert!(matches!(
            sim.initialize(params),
            Err(SimulationError::ResourceAllocation { .. })
        ));
        assert_eq!(sim.state(), SimulationState::Uninitialized);
        assert!(sim.height_field().is_err());
    }

    #[test]
    fn test_step_reaches_running() {
        let mut sim = OceanSimulation::new();
        sim.initialize(small_params()).unwrap();
        sim.step(0.0).unwrap();
        assert_eq!(sim.state(), SimulationState::Running);

        let max = sim
            .height_field()
            .unwrap()
            .data
            .iter()
            .fold(0.0f32, |m, h| m.max(h.abs()));
        assert!(max > 0.0, "a windy sea should not be perfectly flat");
        assert!(max.is_finite());
    }

    #[test]
    fn test_identical_runs_are_identical() {
        let mut a = OceanSimulation::new();
        let mut b = OceanSimulation::new();
        a.initialize(small_params()).unwrap();
        b.initialize(small_params()).unwrap();

        for t in [0.0, 0.3, 0.7] {
            a.step(t).unwrap();
            b.step(t).unwrap();
        }
        assert_eq!(
            a.height_field().unwrap().data,
            b.height_field().unwrap().data
        );
        assert_eq!(
            a.displacement_field().unwrap().data,
            b.displacement_field().unwrap().data
        );
    }

    #[test]
    fn test_repeated_time_reproduces_frame() {
        let mut sim = OceanSimulation::new();
        sim.initialize(small_params()).unwrap();
        sim.step(1.25).unwrap();
        let first = sim.height_field().unwrap().data.clone();
        sim.step(4.0).unwrap();
        sim.step(1.25).unwrap();
        assert_eq!(sim.height_field().unwrap().data, first);
    }

    #[test]
    fn test_reseed_changes_the_sea_and_state() {
        let mut sim = OceanSimulation::new();
        sim.initialize(small_params()).unwrap();
        sim.step(0.5).unwrap();
        let before = sim.height_field().unwrap().data.clone();

        sim.reseed(777).unwrap();
        assert_eq!(sim.state(), SimulationState::Ready);
        // The old sea's frame is gone until the new one is stepped.
        assert!(sim.height_field().unwrap().data.iter().all(|&h| h == 0.0));

        sim.step(0.5).unwrap();
        let after = sim.height_field().unwrap().data.clone();
        assert_ne!(before, after);

        // Reseeding back reproduces the original sea exactly.
        sim.reseed(small_params().seed).unwrap();
        sim.step(0.5).unwrap();
        assert_eq!(sim.height_field().unwrap().data, before);
    }

    #[test]
    fn test_reset_changes_resolution() {
        let mut sim = OceanSimulation::new();
        sim.initialize(small_params()).unwrap();
        sim.step(0.1).unwrap();

        let mut params = small_params();
        params.resolution = 32;
        sim.reset(params).unwrap();
        assert_eq!(sim.state(), SimulationState::Ready);
        assert_eq!(sim.resolution().unwrap(), 32);
        sim.step(0.1).unwrap();
        assert_eq!(sim.height_field().unwrap().data.len(), 32 * 32);
    }

    #[test]
    fn test_teardown_releases_everything() {
        let mut sim = OceanSimulation::new();
        sim.initialize(small_params()).unwrap();
        sim.step(0.0).unwrap();
        sim.teardown();
        assert_eq!(sim.state(), SimulationState::Uninitialized);
        assert_eq!(sim.step(0.0), Err(SimulationError::NotInitialized));
        sim.teardown(); // idempotent
    }

    #[test]
    fn test_zero_wind_means_flat_sea() {
        let mut params = small_params();
        params.wind_speed = 0.0;
        let mut sim = OceanSimulation::new();
        sim.initialize(params).unwrap();
        sim.step(1.0).unwrap();

        assert!(sim
            .height_field()
            .unwrap()
            .data
            .iter()
            .all(|h| h.abs() < 1e-6));
        assert!(sim
            .normal_field()
            .unwrap()
            .data
            .iter()
            .all(|&v| v == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_sample_height_hits_cell_centers() {
        let mut sim = OceanSimulation::new();
        sim.initialize(small_params()).unwrap();
        sim.step(0.9).unwrap();

        let n = sim.resolution().unwrap();
        let cell = 100.0 / n as f32;
        let height = sim.height_field().unwrap().clone();
        for (x, z) in [(0, 0), (3, 7), (15, 15)] {
            let world_x = x as f32 * cell - 50.0;
            let world_z = z as f32 * cell - 50.0;
            let sampled = sim.sample_height(world_x, world_z).unwrap();
            assert!((sampled - height.get(x, z)).abs() < 1e-5);
        }

        // One full period away lands on the same cell.
        let wrapped = sim.sample_height(-50.0 + 100.0, -50.0).unwrap();
        assert!((wrapped - height.get(0, 0)).abs() < 1e-5);
    }

    #[test]
    fn test_export_field_byte_sizes() {
        let mut sim = OceanSimulation::new();
        sim.initialize(small_params()).unwrap();
        sim.step(0.0).unwrap();
        let cells = 16 * 16;
        assert_eq!(
            sim.export_field(FieldName::Height).unwrap().len(),
            cells * 4
        );
        assert_eq!(
            sim.export_field(FieldName::Displacement).unwrap().len(),
            cells * 8
        );
        assert_eq!(
            sim.export_field(FieldName::Normal).unwrap().len(),
            cells * 12
        );
        assert_eq!(
            sim.export_field(FieldName::BaseSpectrum).unwrap().len(),
            cells * 8
        );
    }
}
