//! Positioning engine configuration.
//!
//! [`PositioningConfig`] carries the static beacon table, the map bounds and
//! every tunable constant of the engine. It round-trips through JSON so a
//! deployment can be described in a single file.
//!
//! The thresholds (confidence bands, hysteresis distances, buffer sizes) were
//! tuned empirically for one corridor deployment with beacons roughly 10 to
//! 20 m apart. They are defaults, not derived values.
//!
//! # Example
//!
//! ```rust
//! use wifi_densepose_positioning::config::PositioningConfig;
//!
//! let cfg = PositioningConfig::default();
//! cfg.validate().expect("default config is valid");
//!
//! assert_eq!(cfg.estimator.min_beacons, 3);
//! assert_eq!(cfg.fingerprint.k, 3);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::beacon::{Beacon, BeaconId, BeaconTable};
use crate::domain::geometry::{MapBounds, Point2, TrackAxis};
use crate::error::ConfigError;
use crate::estimation::geometric::EstimationMethod;
use crate::tracking::rooms::RoomAnchor;

// ---------------------------------------------------------------------------
// PositioningConfig
// ---------------------------------------------------------------------------

/// Complete configuration for one deployment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositioningConfig {
    /// Log-distance path-loss parameters.
    pub path_loss: PathLossConfig,
    /// Geometric estimator settings.
    pub estimator: EstimatorConfig,
    /// Rolling buffers and hysteresis.
    pub smoothing: SmoothingConfig,
    /// Fingerprint collection, matching and fusion.
    pub fingerprint: FingerprintConfig,
    /// Static beacon table.
    pub beacons: Vec<Beacon>,
    /// Named anchors used for room lookup and fingerprint positions.
    pub rooms: Vec<RoomAnchor>,
    /// Single-beacon calibrated interpolation. When set, it replaces the
    /// multi-beacon estimator as the geometric position source.
    pub calibration: Option<CalibrationConfig>,
}

impl PositioningConfig {
    /// Load and validate a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::FileRead`] when the file cannot be read,
    /// [`ConfigError::Parse`] when it is not valid JSON for this schema, or
    /// [`ConfigError::InvalidValue`] when validation fails.
    pub fn from_json(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: PositioningConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write this configuration as pretty-printed JSON, creating parent
    /// directories if necessary.
    pub fn to_json(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::FileRead {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::invalid_value("(serialization)", e.to_string()))?;
        std::fs::write(path, json).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    /// Build the immutable beacon lookup.
    pub fn beacon_table(&self) -> Result<BeaconTable, ConfigError> {
        BeaconTable::from_beacons(self.beacons.iter().cloned())
    }

    /// Check every field and return the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.path_loss.validate()?;
        self.estimator.validate()?;
        self.smoothing.validate()?;
        self.fingerprint.validate()?;
        self.beacon_table()?;

        for beacon in &self.beacons {
            if !beacon.position.is_finite() {
                return Err(ConfigError::invalid_value(
                    "beacons",
                    format!("beacon {} has a non-finite position", beacon.id),
                ));
            }
        }
        for room in &self.rooms {
            if room.label.is_empty() || !room.position.is_finite() {
                return Err(ConfigError::invalid_value(
                    "rooms",
                    "room anchors need a label and a finite position",
                ));
            }
        }
        if let Some(calibration) = &self.calibration {
            calibration.validate()?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PathLossConfig
// ---------------------------------------------------------------------------

/// Log-distance path-loss curve parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathLossConfig {
    /// RSSI measured at 1 m. Default: **-59 dBm**.
    pub reference_power_dbm: f64,
    /// Path-loss exponent; 2 is free space, indoor is 2 to 4. Default: **2.5**.
    pub path_loss_exponent: f64,
    /// Maximum recognised range. Default: **30 m**.
    pub max_distance_m: f64,
    /// Smallest distance the model reports. Default: **0.1 m**.
    pub min_distance_m: f64,
    /// Samples at or below this level map to the maximum range. Default: **-100 dBm**.
    pub rssi_floor_dbm: f64,
}

impl Default for PathLossConfig {
    fn default() -> Self {
        Self {
            reference_power_dbm: -59.0,
            path_loss_exponent: 2.5,
            max_distance_m: 30.0,
            min_distance_m: 0.1,
            rssi_floor_dbm: -100.0,
        }
    }
}

impl PathLossConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.path_loss_exponent > 0.0) || !self.path_loss_exponent.is_finite() {
            return Err(ConfigError::invalid_value(
                "path_loss.path_loss_exponent",
                format!("must be > 0, got {}", self.path_loss_exponent),
            ));
        }
        if !self.reference_power_dbm.is_finite() {
            return Err(ConfigError::invalid_value(
                "path_loss.reference_power_dbm",
                "must be finite",
            ));
        }
        if !(self.min_distance_m > 0.0) {
            return Err(ConfigError::invalid_value(
                "path_loss.min_distance_m",
                format!("must be > 0, got {}", self.min_distance_m),
            ));
        }
        if !(self.max_distance_m > self.min_distance_m) || !self.max_distance_m.is_finite() {
            return Err(ConfigError::invalid_value(
                "path_loss.max_distance_m",
                format!(
                    "must be finite and > min_distance_m ({}), got {}",
                    self.min_distance_m, self.max_distance_m
                ),
            ));
        }
        if !(self.rssi_floor_dbm < 0.0) {
            return Err(ConfigError::invalid_value(
                "path_loss.rssi_floor_dbm",
                format!("must be < 0, got {}", self.rssi_floor_dbm),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// EstimatorConfig
// ---------------------------------------------------------------------------

/// Geometric estimator settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Solver strategy. Default: **weighted_centroid**.
    pub method: EstimationMethod,
    /// Beacons within range required for a fix. Default: **3**.
    pub min_beacons: usize,
    /// Region every position is clamped into.
    pub bounds: MapBounds,
    /// Least-squares minimiser settings.
    pub solver: SimplexConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            method: EstimationMethod::WeightedCentroid,
            min_beacons: 3,
            bounds: MapBounds::default(),
            solver: SimplexConfig::default(),
        }
    }
}

impl EstimatorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_beacons == 0 {
            return Err(ConfigError::invalid_value("estimator.min_beacons", "must be > 0"));
        }
        if !self.bounds.is_well_formed() {
            return Err(ConfigError::invalid_value(
                "estimator.bounds",
                "extents must be finite with min <= max",
            ));
        }
        self.solver.validate()
    }
}

/// Nelder-Mead simplex settings for the least-squares solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplexConfig {
    /// Iteration cap. Default: **200**.
    pub max_iterations: usize,
    /// Stop once the spread of objective values falls below this. Default: **1e-6**.
    pub tolerance: f64,
    /// Edge length of the initial simplex in metres. Default: **1.0**.
    pub initial_step: f64,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-6,
            initial_step: 1.0,
        }
    }
}

impl SimplexConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::invalid_value(
                "estimator.solver.max_iterations",
                "must be > 0",
            ));
        }
        if !(self.tolerance > 0.0) {
            return Err(ConfigError::invalid_value(
                "estimator.solver.tolerance",
                format!("must be > 0, got {}", self.tolerance),
            ));
        }
        if !(self.initial_step > 0.0) {
            return Err(ConfigError::invalid_value(
                "estimator.solver.initial_step",
                format!("must be > 0, got {}", self.initial_step),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SmoothingConfig
// ---------------------------------------------------------------------------

/// Rolling buffer sizes and hysteresis thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Per-beacon moving-average window. Default: **5**.
    pub beacon_window: usize,
    /// Window of the tracked raw RSSI. Default: **10**.
    pub rssi_window: usize,
    /// Window of derived positions. Default: **8**.
    pub position_window: usize,
    /// Smallest move adopted as a new reported position. Default: **1.0 m**.
    pub min_position_change: f64,
    /// Displacement from the anchor needed to report a direction. Default: **5.0 m**.
    pub direction_threshold: f64,
    /// Axis direction and trajectory span are measured along.
    pub track_axis: TrackAxis,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            beacon_window: 5,
            rssi_window: 10,
            position_window: 8,
            min_position_change: 1.0,
            direction_threshold: 5.0,
            track_axis: TrackAxis::X,
        }
    }
}

impl SmoothingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.beacon_window == 0 {
            return Err(ConfigError::invalid_value("smoothing.beacon_window", "must be > 0"));
        }
        if self.rssi_window == 0 {
            return Err(ConfigError::invalid_value("smoothing.rssi_window", "must be > 0"));
        }
        if self.position_window == 0 {
            return Err(ConfigError::invalid_value("smoothing.position_window", "must be > 0"));
        }
        if !(self.min_position_change >= 0.0) {
            return Err(ConfigError::invalid_value(
                "smoothing.min_position_change",
                format!("must be >= 0, got {}", self.min_position_change),
            ));
        }
        if !(self.direction_threshold >= 0.0) {
            return Err(ConfigError::invalid_value(
                "smoothing.direction_threshold",
                format!("must be >= 0, got {}", self.direction_threshold),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FingerprintConfig
// ---------------------------------------------------------------------------

/// One step of the distance → confidence step function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBand {
    /// Applies when the best distance is strictly below this value.
    pub below: f64,
    /// Confidence reported for this band.
    pub confidence: f64,
}

/// Fingerprint collection, KNN matching and fusion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Ranks kept per signature. Default: **15**.
    pub top_n: usize,
    /// Candidates returned by the matcher. Default: **3**.
    pub k: usize,
    /// Confidence at which fingerprint output is trusted. Default: **0.75**.
    pub confidence_threshold: f64,
    /// Stored records needed before fingerprinting is attempted. Default: **3**.
    pub min_records: usize,
    /// Distance bands, ascending. Default: **<5 → 0.95, <10 → 0.80, <20 → 0.60**.
    pub bands: Vec<ConfidenceBand>,
    /// Confidence when no band applies. Default: **0.30**.
    pub floor_confidence: f64,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            top_n: 15,
            k: 3,
            confidence_threshold: 0.75,
            min_records: 3,
            bands: vec![
                ConfidenceBand { below: 5.0, confidence: 0.95 },
                ConfidenceBand { below: 10.0, confidence: 0.80 },
                ConfidenceBand { below: 20.0, confidence: 0.60 },
            ],
            floor_confidence: 0.30,
        }
    }
}

impl FingerprintConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::invalid_value("fingerprint.top_n", "must be > 0"));
        }
        if self.k == 0 {
            return Err(ConfigError::invalid_value("fingerprint.k", "must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::invalid_value(
                "fingerprint.confidence_threshold",
                format!("must be in [0, 1], got {}", self.confidence_threshold),
            ));
        }
        if !(0.0..=1.0).contains(&self.floor_confidence) {
            return Err(ConfigError::invalid_value(
                "fingerprint.floor_confidence",
                format!("must be in [0, 1], got {}", self.floor_confidence),
            ));
        }
        for band in &self.bands {
            if !(0.0..=1.0).contains(&band.confidence) || !(band.below > 0.0) {
                return Err(ConfigError::invalid_value(
                    "fingerprint.bands",
                    "each band needs below > 0 and confidence in [0, 1]",
                ));
            }
        }
        if self.bands.windows(2).any(|w| w[1].below <= w[0].below) {
            return Err(ConfigError::invalid_value(
                "fingerprint.bands",
                "band limits must be strictly ascending",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CalibrationConfig
// ---------------------------------------------------------------------------

/// A measured `(rssi, offset)` pair along the track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    /// Smoothed RSSI measured at this spot.
    pub rssi: f64,
    /// Along-track offset from `origin` in metres.
    pub offset: f64,
    /// Where the sample was taken, for reference only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Calibrated single-beacon interpolation along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Beacon whose RSSI drives the curve; the strongest beacon when unset.
    #[serde(default)]
    pub anchor: Option<BeaconId>,
    /// Points ordered strongest RSSI first.
    pub points: Vec<CalibrationPoint>,
    /// Floor position of offset 0.
    #[serde(default)]
    pub origin: Point2,
    /// Axis offsets are measured along.
    #[serde(default)]
    pub axis: TrackAxis,
}

impl CalibrationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.points.is_empty() {
            return Err(ConfigError::invalid_value(
                "calibration.points",
                "at least one point is required",
            ));
        }
        if self
            .points
            .iter()
            .any(|p| !p.rssi.is_finite() || !p.offset.is_finite())
        {
            return Err(ConfigError::invalid_value(
                "calibration.points",
                "rssi and offset must be finite",
            ));
        }
        if self.points.windows(2).any(|w| w[1].rssi > w[0].rssi) {
            return Err(ConfigError::invalid_value(
                "calibration.points",
                "rssi must be non-increasing from the first point to the last",
            ));
        }
        if !self.origin.is_finite() {
            return Err(ConfigError::invalid_value("calibration.origin", "must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_is_valid() {
        let cfg = PositioningConfig::default();
        cfg.validate().expect("default config should be valid");
    }

    #[test]
    fn json_round_trip() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join("positioning.json");

        let mut original = PositioningConfig::default();
        original.beacons.push(Beacon::new("AP-12", Point2::new(5.0, 3.5)));
        original.estimator.method = EstimationMethod::LeastSquares;
        original.to_json(&path).expect("serialization should succeed");

        let loaded = PositioningConfig::from_json(&path).expect("deserialization should succeed");
        assert_eq!(loaded, original);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: PositioningConfig =
            serde_json::from_str(r#"{ "estimator": { "method": "trilateration" } }"#).unwrap();
        assert_eq!(cfg.estimator.method, EstimationMethod::Trilateration);
        assert_eq!(cfg.estimator.min_beacons, 3);
        assert_eq!(cfg.smoothing.position_window, 8);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            PositioningConfig::from_json(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let tmp = tempdir().unwrap();
        assert!(matches!(
            PositioningConfig::from_json(&tmp.path().join("absent.json")),
            Err(ConfigError::FileRead { .. })
        ));
    }

    #[test]
    fn non_positive_exponent_is_invalid() {
        let mut cfg = PositioningConfig::default();
        cfg.path_loss.path_loss_exponent = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn max_distance_below_min_is_invalid() {
        let mut cfg = PositioningConfig::default();
        cfg.path_loss.max_distance_m = 0.05;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_min_beacons_is_invalid() {
        let mut cfg = PositioningConfig::default();
        cfg.estimator.min_beacons = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_position_window_is_invalid() {
        let mut cfg = PositioningConfig::default();
        cfg.smoothing.position_window = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn confidence_threshold_out_of_range_is_invalid() {
        let mut cfg = PositioningConfig::default();
        cfg.fingerprint.confidence_threshold = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unordered_bands_are_invalid() {
        let mut cfg = PositioningConfig::default();
        cfg.fingerprint.bands.swap(0, 2);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn duplicate_beacons_are_invalid() {
        let mut cfg = PositioningConfig::default();
        cfg.beacons.push(Beacon::new("AP-12", Point2::new(5.0, 3.5)));
        cfg.beacons.push(Beacon::new("AP-12", Point2::new(7.0, 3.5)));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn calibration_with_rising_rssi_is_invalid() {
        let mut cfg = PositioningConfig::default();
        cfg.calibration = Some(CalibrationConfig {
            anchor: None,
            points: vec![
                CalibrationPoint { rssi: -60.0, offset: 0.0, label: None },
                CalibrationPoint { rssi: -50.0, offset: 8.0, label: None },
            ],
            origin: Point2::default(),
            axis: TrackAxis::X,
        });
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn calibration_with_plateau_is_valid() {
        let mut cfg = PositioningConfig::default();
        cfg.calibration = Some(CalibrationConfig {
            anchor: None,
            points: vec![
                CalibrationPoint { rssi: -60.0, offset: 12.0, label: None },
                CalibrationPoint { rssi: -65.0, offset: 18.0, label: None },
                CalibrationPoint { rssi: -65.0, offset: 28.0, label: None },
            ],
            origin: Point2::default(),
            axis: TrackAxis::X,
        });
        assert!(cfg.validate().is_ok());
    }
}
