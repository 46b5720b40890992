//! Log-distance path-loss ranging.
//!
//! ```text
//! distance = 10 ^ ((reference_power - rssi) / (10 * n))
//! ```
//!
//! The result is clamped to `[min_distance_m, max_distance_m]`. Samples that
//! cannot be real (at or above 0 dBm) and samples at or below the floor are
//! both reported as the maximum range, so they never pull a solver.

use crate::config::PathLossConfig;

/// Pure RSSI ↔ distance conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathLossModel {
    config: PathLossConfig,
}

impl PathLossModel {
    /// Create a model from validated parameters.
    pub fn new(config: PathLossConfig) -> Self {
        Self { config }
    }

    /// The parameters in use.
    pub fn config(&self) -> &PathLossConfig {
        &self.config
    }

    /// Level at or below which a sample counts as not heard.
    pub fn rssi_floor(&self) -> f64 {
        self.config.rssi_floor_dbm
    }

    /// Maximum recognised range.
    pub fn max_distance(&self) -> f64 {
        self.config.max_distance_m
    }

    /// Estimated distance in metres for one RSSI sample.
    pub fn distance(&self, rssi: f64) -> f64 {
        let c = &self.config;
        if !rssi.is_finite() || rssi >= 0.0 || rssi <= c.rssi_floor_dbm {
            return c.max_distance_m;
        }
        let exponent = (c.reference_power_dbm - rssi) / (10.0 * c.path_loss_exponent);
        10.0_f64
            .powf(exponent)
            .clamp(c.min_distance_m, c.max_distance_m)
    }

    /// Inverse of [`distance`](Self::distance): the RSSI expected at
    /// `distance` metres, with the distance clamped to the model's range.
    pub fn rssi_at(&self, distance: f64) -> f64 {
        let c = &self.config;
        let d = if distance.is_finite() {
            distance.clamp(c.min_distance_m, c.max_distance_m)
        } else {
            c.max_distance_m
        };
        c.reference_power_dbm - 10.0 * c.path_loss_exponent * d.log10()
    }
}

impl Default for PathLossModel {
    fn default() -> Self {
        Self::new(PathLossConfig::default())
    }
}
