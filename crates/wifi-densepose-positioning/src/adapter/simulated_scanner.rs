//! Simulated scanner driven by the path-loss curve.
//!
//! Produces RSSI for every beacon from a settable true position, with
//! seeded Gaussian noise so runs are reproducible. Useful for demos,
//! benchmarks and end-to-end tests without radio hardware.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::domain::beacon::{BeaconId, BeaconTable};
use crate::domain::geometry::Point2;
use crate::domain::reading::{Reading, RssiSignature};
use crate::error::{ConfigError, PositioningError};
use crate::estimation::path_loss::PathLossModel;
use crate::port::ScanPort;

/// Standard deviation of the simulated noise in dB.
pub const DEFAULT_NOISE_STD_DB: f64 = 3.0;
/// Weakest value the simulated radio reports.
pub const MIN_SIMULATED_RSSI: f64 = -100.0;
/// Strongest value the simulated radio reports.
pub const MAX_SIMULATED_RSSI: f64 = -30.0;
/// Transmitters closer than this are treated as this far away.
const MIN_SIMULATED_DISTANCE: f64 = 0.5;

#[derive(Debug)]
struct SimState {
    position: Point2,
    rng: StdRng,
    clock: DateTime<Utc>,
}

/// [`ScanPort`] backed by the path-loss model.
#[derive(Debug)]
pub struct SimulatedScanner {
    /// Beacons in id order, so noise draws are reproducible.
    beacons: Vec<(BeaconId, Point2)>,
    /// Unidentified transmitters that only show up in signatures.
    ambient: Vec<Point2>,
    model: PathLossModel,
    noise_std: f64,
    interval: Duration,
    state: Mutex<SimState>,
}

impl SimulatedScanner {
    /// Scanner at the origin, noise σ = 3 dB, clock at the Unix epoch
    /// advancing one second per scan.
    pub fn new(beacons: &BeaconTable, model: PathLossModel, seed: u64) -> Self {
        let mut ordered: Vec<(BeaconId, Point2)> =
            beacons.iter().map(|b| (b.id.clone(), b.position)).collect();
        ordered.sort_by(|a, b| a.0.cmp(&b.0));
        Self {
            beacons: ordered,
            ambient: Vec::new(),
            model,
            noise_std: DEFAULT_NOISE_STD_DB,
            interval: Duration::seconds(1),
            state: Mutex::new(SimState {
                position: Point2::default(),
                rng: StdRng::seed_from_u64(seed),
                clock: DateTime::<Utc>::UNIX_EPOCH,
            }),
        }
    }

    /// Override the noise level. Zero gives exact path-loss values.
    pub fn with_noise(mut self, std_db: f64) -> Result<Self, ConfigError> {
        if !(std_db >= 0.0) || !std_db.is_finite() {
            return Err(ConfigError::invalid_value(
                "noise_std_db",
                format!("must be finite and >= 0, got {std_db}"),
            ));
        }
        self.noise_std = std_db;
        Ok(self)
    }

    /// Add unidentified transmitters visible to signature scans.
    #[must_use]
    pub fn with_ambient(mut self, transmitters: impl IntoIterator<Item = Point2>) -> Self {
        self.ambient.extend(transmitters);
        self
    }

    /// Set the simulated clock start and per-scan interval.
    #[must_use]
    pub fn with_clock(self, start: DateTime<Utc>, interval: Duration) -> Self {
        self.state.lock().clock = start;
        Self { interval, ..self }
    }

    /// Move the simulated receiver.
    pub fn set_position(&self, position: Point2) {
        self.state.lock().position = position;
    }

    /// Current true position of the simulated receiver.
    pub fn position(&self) -> Point2 {
        self.state.lock().position
    }

    fn sample(&self, state: &mut SimState, transmitter: Point2) -> Option<i32> {
        let cfg = self.model.config();
        let d = state.position.distance_to(&transmitter).max(MIN_SIMULATED_DISTANCE);
        let clean = cfg.reference_power_dbm - 10.0 * cfg.path_loss_exponent * d.log10();
        let noise: f64 = state.rng.sample(StandardNormal);
        let rssi = (clean + noise * self.noise_std)
            .clamp(MIN_SIMULATED_RSSI, MAX_SIMULATED_RSSI)
            .round() as i32;
        (f64::from(rssi) > MIN_SIMULATED_RSSI).then_some(rssi)
    }
}

impl ScanPort for SimulatedScanner {
    fn scan(&self) -> Result<Reading, PositioningError> {
        let mut state = self.state.lock();
        let captured_at = state.clock;
        state.clock += self.interval;

        let mut reading = Reading::new(captured_at);
        for (id, position) in &self.beacons {
            if let Some(rssi) = self.sample(&mut state, *position) {
                reading.insert(id.clone(), rssi);
            }
        }
        Ok(reading)
    }

    fn signature(&self, top_n: usize) -> Result<RssiSignature, PositioningError> {
        let mut state = self.state.lock();
        let values: Vec<i32> = self
            .beacons
            .iter()
            .map(|(_, p)| *p)
            .chain(self.ambient.iter().copied())
            .filter_map(|p| self.sample(&mut state, p))
            .collect();
        Ok(RssiSignature::from_scan_with_floor(values, top_n, self.model.rssi_floor()))
    }
}
