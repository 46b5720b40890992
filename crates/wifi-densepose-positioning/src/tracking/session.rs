//! Per-session tracking state and the scan-cycle pipeline.
//!
//! A [`TrackingSession`] owns every piece of mutable state a cycle touches:
//! the rolling buffers, both hysteresis anchors, the estimator's cached
//! fix and the trajectory. Sessions share nothing but the read-mostly
//! [`FingerprintStore`], so independent sessions can run side by side.
//!
//! ```text
//! Reading ─► BeaconFilters ─► GeometricEstimator ─► position buffers ─► hysteresis ─┐
//!        │                    (or CalibrationCurve)                                  ├─► FusionPolicy ─► DirectionTracker
//!        └─► RssiSignature ─► KnnMatcher ───────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::{FingerprintConfig, PositioningConfig, SmoothingConfig};
use crate::domain::beacon::BeaconId;
use crate::domain::geometry::{MapBounds, Point2};
use crate::domain::reading::{Reading, RssiSignature};
use crate::domain::result::{Direction, FusionMethod, TrajectoryPoint, TrajectorySummary};
use crate::error::{PositioningError, PositioningResult};
use crate::estimation::geometric::{EstimateOutcome, GeometricEstimator};
use crate::estimation::path_loss::PathLossModel;
use crate::fingerprint::matcher::{Classification, KnnMatcher};
use crate::fingerprint::store::FingerprintStore;
use crate::tracking::calibration::CalibrationCurve;
use crate::tracking::fusion::FusionPolicy;
use crate::tracking::hysteresis::{DirectionTracker, PositionHysteresis};
use crate::tracking::rooms::RoomDirectory;
use crate::tracking::smoothing::{BeaconFilters, RollingMean};

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// Everything one scan cycle hands to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanCycle {
    pub reading: Reading,
    /// Signature for fingerprint matching. Derived from `reading` when absent.
    pub signature: Option<RssiSignature>,
}

impl ScanCycle {
    pub fn new(reading: Reading) -> Self {
        Self {
            reading,
            signature: None,
        }
    }

    pub fn with_signature(mut self, signature: RssiSignature) -> Self {
        self.signature = Some(signature);
        self
    }
}

impl From<Reading> for ScanCycle {
    fn from(reading: Reading) -> Self {
        Self::new(reading)
    }
}

/// Where the geometric candidate of a cycle came from.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometricSource {
    /// Multi-beacon estimation.
    Estimator(EstimateOutcome),
    /// Single-beacon calibrated interpolation.
    Calibrated {
        /// Smoothed RSSI fed into the curve.
        rssi: f64,
    },
    /// Calibration is configured but the tracked beacon has not been heard.
    NoSignal,
}

/// Outcome of [`TrackingSession::process`].
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub captured_at: DateTime<Utc>,
    /// Beacon whose RSSI feeds `raw_rssi` and `smoothed_rssi`.
    pub rssi_beacon: Option<BeaconId>,
    /// Raw RSSI of `rssi_beacon` this cycle.
    pub raw_rssi: Option<i32>,
    /// Rolling mean of `rssi_beacon`. The buffer restarts whenever the
    /// tracked beacon changes, so it never mixes transmitters.
    pub smoothed_rssi: Option<f64>,
    pub source: GeometricSource,
    /// Smoothed geometric position after hysteresis.
    pub geometric: Option<Point2>,
    /// `None` when the store was too small to match against.
    pub classification: Option<Classification>,
    pub method: FusionMethod,
    /// Reported position; `None` until any source has produced one.
    pub position: Option<Point2>,
    pub room: Option<String>,
    pub confidence: Option<f64>,
    pub direction: Direction,
    pub tracking: bool,
    pub trajectory_len: usize,
}

/// Whether the session records a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Tracking {
        started_at: DateTime<Utc>,
    },
}

// ---------------------------------------------------------------------------
// TrackingSession
// ---------------------------------------------------------------------------

/// One tracked receiver.
#[derive(Debug)]
pub struct TrackingSession {
    smoothing: SmoothingConfig,
    fingerprint: FingerprintConfig,
    bounds: MapBounds,

    estimator: GeometricEstimator,
    calibration: Option<(CalibrationCurve, Option<BeaconId>)>,
    matcher: KnnMatcher,
    policy: FusionPolicy,
    rooms: RoomDirectory,
    store: Arc<FingerprintStore>,

    beacon_filters: BeaconFilters,
    rssi_beacon: Option<BeaconId>,
    rssi_buffer: RollingMean,
    x_buffer: RollingMean,
    y_buffer: RollingMean,
    hysteresis: PositionHysteresis,
    direction: DirectionTracker,

    state: SessionState,
    trajectory: Vec<TrajectoryPoint>,
}

impl TrackingSession {
    /// Build a session from a configuration and a shared fingerprint store.
    ///
    /// # Errors
    ///
    /// [`PositioningError::Config`] when the configuration is invalid, and
    /// [`PositioningError::UnknownBeacon`] when the calibration anchor is
    /// not in the beacon table.
    pub fn new(config: &PositioningConfig, store: Arc<FingerprintStore>) -> PositioningResult<Self> {
        config.validate()?;
        let beacons = config.beacon_table()?;

        let calibration = match &config.calibration {
            Some(cal) => {
                if let Some(anchor) = &cal.anchor {
                    if beacons.get(anchor).is_none() {
                        return Err(PositioningError::UnknownBeacon {
                            id: anchor.to_string(),
                        });
                    }
                }
                Some((CalibrationCurve::from_config(cal), cal.anchor.clone()))
            }
            None => None,
        };

        let smoothing = config.smoothing;
        let model = PathLossModel::new(config.path_loss);

        Ok(Self {
            smoothing,
            fingerprint: config.fingerprint.clone(),
            bounds: config.estimator.bounds,
            estimator: GeometricEstimator::new(model, beacons, config.estimator),
            calibration,
            matcher: KnnMatcher::from_config(&config.fingerprint),
            policy: FusionPolicy::from_config(&config.fingerprint),
            rooms: RoomDirectory::new(config.rooms.clone()),
            store,
            beacon_filters: BeaconFilters::new(smoothing.beacon_window),
            rssi_beacon: None,
            rssi_buffer: RollingMean::new(smoothing.rssi_window),
            x_buffer: RollingMean::new(smoothing.position_window),
            y_buffer: RollingMean::new(smoothing.position_window),
            hysteresis: PositionHysteresis::new(smoothing.min_position_change),
            direction: DirectionTracker::new(smoothing.direction_threshold, smoothing.track_axis),
            state: SessionState::Idle,
            trajectory: Vec::new(),
        })
    }

    // -- state machine -----------------------------------------------------

    /// Enter `Tracking`, discarding any previous trajectory.
    pub fn start(&mut self, now: DateTime<Utc>) {
        if matches!(self.state, SessionState::Tracking { .. }) {
            tracing::info!("tracking restarted, previous trajectory discarded");
        }
        self.trajectory.clear();
        self.state = SessionState::Tracking { started_at: now };
        tracing::info!(started_at = %now, "tracking started");
    }

    /// Return to `Idle` and summarise the recorded trajectory. The points
    /// stay available through [`trajectory`](Self::trajectory).
    pub fn stop(&mut self) -> TrajectorySummary {
        self.state = SessionState::Idle;
        let summary = self.trajectory_summary();
        tracing::info!(
            points = summary.point_count,
            span = summary.span,
            duration_secs = summary.duration_secs,
            "tracking stopped"
        );
        summary
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, SessionState::Tracking { .. })
    }

    // -- cycle -------------------------------------------------------------

    /// Run one scan cycle.
    pub fn process(&mut self, cycle: ScanCycle) -> CycleReport {
        let ScanCycle { reading, signature } = cycle;
        let captured_at = reading.captured_at();

        let smoothed = self.beacon_filters.update(&reading);

        let tracked = self.tracked_rssi(&reading);
        let raw_rssi = tracked.as_ref().map(|(_, rssi)| *rssi);
        let smoothed_rssi = match tracked {
            Some((beacon, rssi)) => {
                if self.rssi_beacon.as_ref() != Some(&beacon) {
                    tracing::trace!(%beacon, "tracked beacon changed, rssi buffer restarted");
                    self.rssi_buffer.clear();
                    self.rssi_beacon = Some(beacon);
                }
                Some(self.rssi_buffer.push(f64::from(rssi)))
            }
            None => self.rssi_buffer.mean(),
        };

        let (source, candidate) = match &self.calibration {
            Some((curve, _)) => match smoothed_rssi {
                Some(rssi) => (
                    GeometricSource::Calibrated { rssi },
                    Some(self.bounds.clamp(curve.position(rssi))),
                ),
                None => (GeometricSource::NoSignal, None),
            },
            None => {
                let outcome = self.estimator.estimate_rssi(smoothed.iter().map(|(id, v)| (id, *v)));
                let fresh = match &outcome {
                    EstimateOutcome::Fix(fix) => Some(fix.position),
                    EstimateOutcome::InsufficientBeacons { observed, required, .. } => {
                        tracing::warn!(observed, required, "insufficient beacons in range");
                        None
                    }
                    EstimateOutcome::NoSolution { .. } => {
                        tracing::warn!("no geometric solution this cycle");
                        None
                    }
                };
                (GeometricSource::Estimator(outcome), fresh)
            }
        };

        let geometric = match candidate {
            Some(p) => {
                let smoothed_point =
                    Point2::new(self.x_buffer.push(p.x), self.y_buffer.push(p.y));
                Some(self.hysteresis.apply(smoothed_point))
            }
            None => self.hysteresis.reported(),
        };

        let records = self.store.all();
        let floor = self.estimator.model().rssi_floor();
        let classification = self.policy.eligible(records.len()).then(|| {
            let query = signature
                .unwrap_or_else(|| reading.signature_with_floor(self.fingerprint.top_n, floor));
            self.matcher.classify(&query, &records, self.fingerprint.k)
        });

        let fused = self.policy.fuse(
            geometric,
            classification.as_ref(),
            records.len(),
            &self.rooms,
            &self.bounds,
        );

        let direction = match fused.position {
            Some(p) => self.direction.update(p),
            None => Direction::Stationary,
        };

        let room = fused.label.clone().or_else(|| {
            fused
                .position
                .and_then(|p| self.rooms.nearest(&p).map(str::to_owned))
        });

        if let (SessionState::Tracking { started_at }, Some(position)) = (self.state, fused.position) {
            let elapsed_secs =
                ((captured_at - started_at).num_milliseconds() as f64 / 1000.0).max(0.0);
            self.trajectory.push(TrajectoryPoint {
                sequence: self.trajectory.len() as u64,
                elapsed_secs,
                position,
                room: room.clone(),
                method: fused.method,
                confidence: fused.confidence,
                rssi: smoothed_rssi.map(|r| r.round() as i32),
            });
        }

        CycleReport {
            captured_at,
            rssi_beacon: self.rssi_beacon.clone(),
            raw_rssi,
            smoothed_rssi,
            source,
            geometric,
            classification,
            method: fused.method,
            position: fused.position,
            room,
            confidence: fused.confidence,
            direction,
            tracking: self.is_tracking(),
            trajectory_len: self.trajectory.len(),
        }
    }

    /// RSSI of the calibration anchor, or of the strongest beacon when no
    /// anchor is configured.
    fn tracked_rssi(&self, reading: &Reading) -> Option<(BeaconId, i32)> {
        match &self.calibration {
            Some((_, Some(anchor))) => reading.get(anchor).map(|rssi| (anchor.clone(), rssi)),
            _ => reading.strongest().map(|(id, rssi)| (id.clone(), rssi)),
        }
    }

    // -- trajectory --------------------------------------------------------

    pub fn trajectory(&self) -> &[TrajectoryPoint] {
        &self.trajectory
    }

    /// Empty the trajectory without leaving `Tracking`.
    pub fn clear_trajectory(&mut self) {
        self.trajectory.clear();
    }

    /// Aggregate statistics of the current trajectory.
    pub fn trajectory_summary(&self) -> TrajectorySummary {
        summarize(&self.trajectory, |p| self.smoothing.track_axis.project(p))
    }

    /// Drop every rolling buffer, hysteresis anchor and the cached fix.
    /// The trajectory and tracking state are kept.
    pub fn reset_filters(&mut self) {
        self.beacon_filters.clear();
        self.rssi_beacon = None;
        self.rssi_buffer.clear();
        self.x_buffer.clear();
        self.y_buffer.clear();
        self.hysteresis.reset();
        self.direction.reset();
        self.estimator.reset();
    }

    pub fn estimator(&self) -> &GeometricEstimator {
        &self.estimator
    }

    pub fn store(&self) -> &Arc<FingerprintStore> {
        &self.store
    }

    pub fn rooms(&self) -> &RoomDirectory {
        &self.rooms
    }
}

fn summarize<F>(points: &[TrajectoryPoint], along: F) -> TrajectorySummary
where
    F: Fn(&Point2) -> f64,
{
    let Some(last) = points.last() else {
        return TrajectorySummary::default();
    };

    let (min, max) = points
        .iter()
        .map(|p| along(&p.position))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let mut rooms_visited: Vec<String> = Vec::new();
    for room in points.iter().filter_map(|p| p.room.as_ref()) {
        if !rooms_visited.contains(room) {
            rooms_visited.push(room.clone());
        }
    }

    TrajectorySummary {
        point_count: points.len(),
        min_position: Some(min),
        max_position: Some(max),
        span: max - min,
        rooms_visited,
        duration_secs: last.elapsed_secs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CalibrationConfig, CalibrationPoint};
    use crate::domain::beacon::Beacon;
    use crate::domain::geometry::TrackAxis;
    use crate::fingerprint::record::FingerprintRecord;
    use crate::tracking::rooms::RoomAnchor;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_760_000_000 + secs, 0).unwrap()
    }

    fn corridor_config() -> PositioningConfig {
        PositioningConfig {
            beacons: vec![
                Beacon::new("AP-12", Point2::new(5.0, 3.5)),
                Beacon::new("AP-11", Point2::new(25.3, 3.5)),
                Beacon::new("AP-XX", Point2::new(38.2, 3.5)),
            ],
            rooms: vec![
                RoomAnchor::new("7412", Point2::new(2.0, 4.5)),
                RoomAnchor::new("7409", Point2::new(35.0, 4.5)),
            ],
            ..PositioningConfig::default()
        }
    }

    fn reading_at(secs: i64, samples: &[(&str, i32)]) -> Reading {
        Reading::from_samples(t(secs), samples.iter().copied())
    }

    #[test]
    fn unknown_calibration_anchor_is_rejected() {
        let mut cfg = corridor_config();
        cfg.calibration = Some(CalibrationConfig {
            anchor: Some(BeaconId::new("AP-99")),
            points: vec![CalibrationPoint { rssi: -50.0, offset: 0.0, label: None }],
            origin: Point2::new(0.0, 3.5),
            axis: TrackAxis::X,
        });
        let err = TrackingSession::new(&cfg, Arc::new(FingerprintStore::in_memory())).unwrap_err();
        assert!(matches!(err, PositioningError::UnknownBeacon { id } if id == "AP-99"));
    }

    #[test]
    fn too_few_beacons_reports_no_position() {
        let mut session =
            TrackingSession::new(&corridor_config(), Arc::new(FingerprintStore::in_memory())).unwrap();
        let report = session.process(reading_at(0, &[("AP-12", -60), ("AP-11", -70)]).into());
        assert!(matches!(
            report.source,
            GeometricSource::Estimator(EstimateOutcome::InsufficientBeacons { observed: 2, required: 3, .. })
        ));
        assert_eq!(report.position, None);
        assert_eq!(report.method, FusionMethod::GeometricFallback);
        assert_eq!(report.direction, Direction::Stationary);
    }

    #[test]
    fn geometric_cycle_reports_nearest_room() {
        let mut session =
            TrackingSession::new(&corridor_config(), Arc::new(FingerprintStore::in_memory())).unwrap();
        let report = session.process(
            reading_at(0, &[("AP-12", -80), ("AP-11", -62), ("AP-XX", -62)]).into(),
        );
        let p = report.position.unwrap();
        assert!(p.x > 25.3 && p.x < 38.2);
        assert_eq!(report.room.as_deref(), Some("7409"));
        assert!(report.classification.is_none());
    }

    #[test]
    fn trajectory_only_grows_while_tracking() {
        let mut session =
            TrackingSession::new(&corridor_config(), Arc::new(FingerprintStore::in_memory())).unwrap();
        let strong = [("AP-12", -50), ("AP-11", -75), ("AP-XX", -80)];

        session.process(reading_at(0, &strong).into());
        assert!(session.trajectory().is_empty());

        session.start(t(10));
        session.process(reading_at(11, &strong).into());
        session.process(reading_at(13, &strong).into());
        assert_eq!(session.trajectory().len(), 2);
        assert_eq!(session.trajectory()[1].sequence, 1);
        assert_eq!(session.trajectory()[1].elapsed_secs, 3.0);

        let summary = session.stop();
        assert_eq!(summary.point_count, 2);
        assert_eq!(summary.duration_secs, 3.0);
        assert_eq!(summary.rooms_visited, vec!["7412".to_string()]);

        session.process(reading_at(20, &strong).into());
        assert_eq!(session.trajectory().len(), 2);

        session.start(t(30));
        assert!(session.trajectory().is_empty());
    }

    #[test]
    fn confident_fingerprint_overrides_geometry() {
        let store = Arc::new(FingerprintStore::in_memory());
        for (label, sig) in [
            ("7412", vec![-50.0, -75.0, -80.0]),
            ("7409", vec![-55.0, -60.0, -85.0]),
            ("lobby", vec![-70.0, -72.0, -74.0]),
        ] {
            store
                .insert(FingerprintRecord::new(label, RssiSignature::new(sig), 3, t(0)))
                .unwrap();
        }
        let mut session = TrackingSession::new(&corridor_config(), store).unwrap();

        let report = session.process(
            ScanCycle::new(reading_at(0, &[("AP-12", -80), ("AP-11", -62), ("AP-XX", -62)]))
                .with_signature(RssiSignature::new(vec![-51.0, -74.0, -80.0])),
        );

        assert_eq!(report.method, FusionMethod::Fingerprint);
        assert_eq!(report.room.as_deref(), Some("7412"));
        assert_eq!(report.position, Some(Point2::new(2.0, 4.5)));
        assert_eq!(report.confidence, Some(0.95));
    }

    #[test]
    fn fingerprint_position_stays_inside_bounds() {
        let mut cfg = corridor_config();
        cfg.rooms.push(RoomAnchor::new("annex", Point2::new(120.0, 40.0)));
        assert!(cfg.validate().is_ok());

        let store = Arc::new(FingerprintStore::in_memory());
        for (label, sig) in [
            ("annex", vec![-50.0, -75.0, -80.0]),
            ("7409", vec![-55.0, -60.0, -85.0]),
            ("lobby", vec![-70.0, -72.0, -74.0]),
        ] {
            store
                .insert(FingerprintRecord::new(label, RssiSignature::new(sig), 3, t(0)))
                .unwrap();
        }
        let mut session = TrackingSession::new(&cfg, store).unwrap();

        let report = session.process(
            ScanCycle::new(reading_at(0, &[("AP-12", -80), ("AP-11", -62), ("AP-XX", -62)]))
                .with_signature(RssiSignature::new(vec![-50.0, -75.0, -80.0])),
        );

        assert_eq!(report.method, FusionMethod::Fingerprint);
        assert_eq!(report.room.as_deref(), Some("annex"));
        let p = report.position.unwrap();
        assert!(cfg.estimator.bounds.contains(&p), "reported {p} outside bounds");
        assert_eq!(p, Point2::new(75.0, 22.0));
    }

    /// Derived signatures drop samples the distance model treats as not
    /// heard, so the raised floor changes which record matches.
    #[test]
    fn derived_signature_uses_model_floor() {
        let store = Arc::new(FingerprintStore::in_memory());
        for (label, sig) in [
            ("a", vec![-45.0, -94.0, -95.0]),
            ("b", vec![-50.0, -60.0, -70.0]),
            ("c", vec![-80.0, -85.0, -88.0]),
        ] {
            store
                .insert(FingerprintRecord::new(label, RssiSignature::new(sig), 3, t(0)))
                .unwrap();
        }
        let weak = [("AP-12", -95), ("AP-11", -94), ("AP-XX", -50)];

        let mut default_floor = TrackingSession::new(&corridor_config(), Arc::clone(&store)).unwrap();
        let report = default_floor.process(reading_at(0, &weak).into());
        assert_eq!(report.classification.unwrap().label.as_deref(), Some("a"));

        let mut cfg = corridor_config();
        cfg.path_loss.rssi_floor_dbm = -90.0;
        let mut raised_floor = TrackingSession::new(&cfg, store).unwrap();
        let report = raised_floor.process(reading_at(0, &weak).into());
        let classification = report.classification.unwrap();
        assert_eq!(classification.label.as_deref(), Some("b"));
        assert_eq!(classification.confidence, 0.95);
    }

    #[test]
    fn rssi_buffer_restarts_when_strongest_beacon_changes() {
        let mut session =
            TrackingSession::new(&corridor_config(), Arc::new(FingerprintStore::in_memory())).unwrap();

        session.process(reading_at(0, &[("AP-12", -50), ("AP-11", -70), ("AP-XX", -80)]).into());
        let report =
            session.process(reading_at(1, &[("AP-12", -54), ("AP-11", -70), ("AP-XX", -80)]).into());
        assert_eq!(report.rssi_beacon, Some(BeaconId::new("AP-12")));
        assert_eq!(report.smoothed_rssi, Some(-52.0));

        let report =
            session.process(reading_at(2, &[("AP-12", -75), ("AP-11", -48), ("AP-XX", -80)]).into());
        assert_eq!(report.rssi_beacon, Some(BeaconId::new("AP-11")));
        assert_eq!(report.raw_rssi, Some(-48));
        assert_eq!(report.smoothed_rssi, Some(-48.0));
    }

    #[test]
    fn calibrated_interpolation_follows_anchor() {
        let mut cfg = corridor_config();
        cfg.smoothing.rssi_window = 1;
        cfg.smoothing.position_window = 1;
        cfg.calibration = Some(CalibrationConfig {
            anchor: Some(BeaconId::new("AP-12")),
            points: vec![
                CalibrationPoint { rssi: -44.0, offset: 0.0, label: None },
                CalibrationPoint { rssi: -54.0, offset: 8.0, label: None },
            ],
            origin: Point2::new(9.0, 3.5),
            axis: TrackAxis::X,
        });
        let mut session = TrackingSession::new(&cfg, Arc::new(FingerprintStore::in_memory())).unwrap();

        let report = session.process(reading_at(0, &[("AP-12", -49), ("AP-11", -40)]).into());
        assert_eq!(report.raw_rssi, Some(-49));
        assert!(matches!(report.source, GeometricSource::Calibrated { .. }));
        let p = report.position.unwrap();
        assert!((p.x - 13.0).abs() < 1e-9);

        let report = session.process(reading_at(1, &[("AP-11", -40)]).into());
        assert_eq!(report.raw_rssi, None);
        assert_eq!(report.smoothed_rssi, Some(-49.0));
    }

    #[test]
    fn summary_uses_along_track_extent() {
        let point = |seq: u64, x: f64, room: &str| TrajectoryPoint {
            sequence: seq,
            elapsed_secs: seq as f64 * 2.0,
            position: Point2::new(x, 3.5),
            room: Some(room.to_owned()),
            method: FusionMethod::GeometricFallback,
            confidence: None,
            rssi: None,
        };
        let points = [point(0, 10.0, "a"), point(1, 30.0, "b"), point(2, 5.0, "a")];
        let summary = summarize(&points, |p| p.x);
        assert_eq!(summary.min_position, Some(5.0));
        assert_eq!(summary.max_position, Some(30.0));
        assert_eq!(summary.span, 25.0);
        assert_eq!(summary.rooms_visited, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(summary.duration_secs, 4.0);

        assert_eq!(summarize(&[], |p| p.x), TrajectorySummary::default());
    }
}
