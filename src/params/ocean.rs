//! Ocean spectrum and simulation parameters.

use glam::Vec2;

use crate::error::SimulationError;

/// Everything the spectral ocean pipeline needs to know about the sea state.
///
/// Frozen at `initialize`; changing resolution or seed afterwards requires an
/// explicit `reset`/`reseed` so buffer lifetimes stay obvious.
#[derive(Debug, Clone)]
pub struct OceanParameters {
    /// Grid resolution per side (cells). Must be a power of two, >= 8.
    pub resolution: usize,

    /// Physical patch size in meters (the surface tiles with this period).
    pub domain_size: f32,

    /// Wind direction in the horizontal plane (need not be normalized).
    pub wind_direction: [f32; 2],

    /// Wind speed at reference height (m/s). Zero wind means a flat sea.
    pub wind_speed: f32,

    /// Phillips spectrum energy constant (dimensionless overall scale).
    pub amplitude: f32,

    /// Directional sharpness exponent; higher values narrow the wave
    /// spread around the wind direction.
    pub directional_power: f32,

    /// Suppression length for waves shorter than this (meters). Kills
    /// high-frequency ripples that alias on coarse grids.
    pub small_wave_cutoff: f32,

    /// Horizontal displacement scale (dimensionless). Negative values
    /// exaggerate crest sharpening.
    pub choppiness: f32,

    /// Uniform scale applied to the assembled output fields.
    pub amplitude_multiplier: f32,

    /// Gravitational acceleration (m/s^2), drives the dispersion relation.
    pub gravity: f32,

    /// Seed for the Gaussian spectrum noise. Same seed, same ocean.
    pub seed: u64,
}

impl Default for OceanParameters {
    fn default() -> Self {
        Self {
            resolution: 256,     // Plenty of detail, interactive even in debug
            domain_size: 1000.0, // 1 km tile, long swell fits
            wind_direction: [1.0, 0.0],
            wind_speed: 6.0,
            amplitude: 5e-4,
            directional_power: 2.0,
            small_wave_cutoff: 0.1, // Suppress sub-10cm chop
            choppiness: 1.0,
            amplitude_multiplier: 1.0,
            gravity: 9.81,
            seed: 42,
        }
    }
}

impl OceanParameters {
    /// Checks every parameter against its documented range.
    ///
    /// Upper bounds on memory are not checked here; allocation reports
    /// those as `ResourceAllocation` when buffers are actually built.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.resolution < 8 || !self.resolution.is_power_of_two() {
            return Err(SimulationError::invalid(format!(
                "resolution must be a power of two >= 8, got {}",
                self.resolution
            )));
        }
        if !self.domain_size.is_finite() || self.domain_size <= 0.0 {
            return Err(SimulationError::invalid(format!(
                "domain size must be positive and finite, got {}",
                self.domain_size
            )));
        }
        if !self.wind_speed.is_finite() || self.wind_speed < 0.0 {
            return Err(SimulationError::invalid(format!(
                "wind speed must be non-negative, got {}",
                self.wind_speed
            )));
        }
        let wind = Vec2::from(self.wind_direction);
        if !wind.is_finite() {
            return Err(SimulationError::invalid(
                "wind direction must be finite".to_string(),
            ));
        }
        if self.wind_speed > 0.0 && wind.length_squared() == 0.0 {
            return Err(SimulationError::invalid(
                "wind direction must be non-zero when wind speed is non-zero".to_string(),
            ));
        }
        if !self.amplitude.is_finite() || self.amplitude < 0.0 {
            return Err(SimulationError::invalid(format!(
                "amplitude must be non-negative, got {}",
                self.amplitude
            )));
        }
        if !self.directional_power.is_finite() || self.directional_power < 0.0 {
            return Err(SimulationError::invalid(format!(
                "directional power must be non-negative, got {}",
                self.directional_power
            )));
        }
        if !self.small_wave_cutoff.is_finite() || self.small_wave_cutoff < 0.0 {
            return Err(SimulationError::invalid(format!(
                "small-wave cutoff must be non-negative, got {}",
                self.small_wave_cutoff
            )));
        }
        if !self.choppiness.is_finite() {
            return Err(SimulationError::invalid(
                "choppiness must be finite".to_string(),
            ));
        }
        if !self.amplitude_multiplier.is_finite() {
            return Err(SimulationError::invalid(
                "amplitude multiplier must be finite".to_string(),
            ));
        }
        if !self.gravity.is_finite() || self.gravity <= 0.0 {
            return Err(SimulationError::invalid(format!(
                "gravity must be positive, got {}",
                self.gravity
            )));
        }
        Ok(())
    }

    /// Unit wind direction, or zero if the configured vector is degenerate
    /// (only reachable when wind speed is zero and the spectrum is flat).
    pub fn wind_unit(&self) -> Vec2 {
        Vec2::from(self.wind_direction).normalize_or_zero()
    }

    /// Grid spacing in meters between adjacent cells.
    pub fn cell_size(&self) -> f32 {
        self.domain_size / self.resolution as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_validate() {
        assert!(OceanParameters::default().validate().is_ok());
    }

    #[test]
    fn test_all_supported_resolutions_validate() {
        let mut params = OceanParameters::default();
        let mut n = 8;
        while n <= 2048 {
            params.resolution = n;
            assert!(params.validate().is_ok(), "N = {} should validate", n);
            n *= 2;
        }
    }

    #[test]
    fn test_rejects_non_power_of_two_resolution() {
        let mut params = OceanParameters::default();
        for bad in [0, 1, 4, 7, 12, 100, 255] {
            params.resolution = bad;
            assert!(
                matches!(
                    params.validate(),
                    Err(SimulationError::InvalidParameter { .. })
                ),
                "N = {} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_rejects_degenerate_domain() {
        let mut params = OceanParameters::default();
        params.domain_size = 0.0;
        assert!(params.validate().is_err());
        params.domain_size = -10.0;
        assert!(params.validate().is_err());
        params.domain_size = f32::NAN;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_wind_vector_with_wind_speed() {
        let mut params = OceanParameters::default();
        params.wind_direction = [0.0, 0.0];
        assert!(params.validate().is_err());

        // With no wind the direction is irrelevant and may be zero.
        params.wind_speed = 0.0;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_amplitude_and_wind() {
        let mut params = OceanParameters::default();
        params.amplitude = -1.0;
        assert!(params.validate().is_err());

        let mut params = OceanParameters::default();
        params.wind_speed = -3.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_wind_unit_is_normalized() {
        let mut params = OceanParameters::default();
        params.wind_direction = [3.0, 4.0];
        let unit = params.wind_unit();
        assert!((unit.length() - 1.0).abs() < 1e-6);
        assert!((unit.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_cell_size() {
        let params = OceanParameters {
            resolution: 8,
            domain_size: 100.0,
            ..Default::default()
        };
        assert!((params.cell_size() - 12.5).abs() < 1e-6);
    }
}
