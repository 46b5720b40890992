//! # wifi-densepose-positioning
//!
//! Indoor 2-D positioning from periodic RSSI readings against fixed beacons.
//!
//! This crate implements the **Positioning** bounded context, providing:
//!
//! - **Domain types**: [`BeaconId`], [`BeaconTable`], [`Reading`], [`RssiSignature`], [`Point2`]
//! - **Estimation**: [`PathLossModel`] and [`GeometricEstimator`] (weighted
//!   centroid, trilateration, least squares)
//! - **Fingerprinting**: [`FingerprintStore`] with swap-on-write snapshots and
//!   the [`KnnMatcher`]
//! - **Tracking**: [`TrackingSession`] smoothing, hysteresis and fusion, plus a
//!   bounded [`ScanFeed`] / [`SessionWorker`] hand-off
//! - **Ports**: [`ScanPort`], [`FingerprintRepository`]
//! - **Adapters**: [`SimulatedScanner`], [`JsonFileRepository`], [`InMemoryRepository`]
//!
//! The core never reads a clock and never blocks: every cycle input carries
//! its own capture timestamp.
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::{DateTime, Utc};
//! use wifi_densepose_positioning::{
//!     Beacon, FingerprintStore, Point2, PositioningConfig, Reading, TrackingSession,
//! };
//!
//! let config = PositioningConfig {
//!     beacons: vec![
//!         Beacon::new("AP-12", Point2::new(5.0, 3.5)),
//!         Beacon::new("AP-11", Point2::new(25.3, 3.5)),
//!         Beacon::new("AP-XX", Point2::new(38.2, 3.5)),
//!     ],
//!     ..PositioningConfig::default()
//! };
//! let mut session = TrackingSession::new(&config, Arc::new(FingerprintStore::in_memory()))?;
//!
//! let t = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
//! let reading = Reading::from_samples(t, [("AP-12", -70), ("AP-11", -62), ("AP-XX", -75)]);
//! let report = session.process(reading.into());
//! assert!(report.position.is_some());
//! # Ok::<(), wifi_densepose_positioning::PositioningError>(())
//! ```

pub mod adapter;
pub mod config;
pub mod domain;
pub mod error;
pub mod estimation;
pub mod fingerprint;
pub mod port;
pub mod tracking;

// Re-export key types at the crate root for convenience.
pub use adapter::{InMemoryRepository, JsonFileRepository, SimulatedScanner};
pub use config::PositioningConfig;
pub use domain::{
    Beacon, BeaconAddress, BeaconId, BeaconTable, Direction, FusionMethod, MapBounds, Point2,
    Reading, RssiSignature, TrackAxis, TrajectoryPoint, TrajectorySummary,
};
pub use error::{ConfigError, PositioningError, PositioningResult, StoreError};
pub use estimation::{EstimateOutcome, EstimationMethod, GeometricEstimator, PathLossModel};
pub use fingerprint::{
    collect_fingerprint, Classification, FingerprintRecord, FingerprintStore, KnnMatcher,
};
pub use port::{FingerprintRepository, ScanPort};
pub use tracking::{
    session_channel, CycleReport, ScanCycle, ScanFeed, SessionWorker, TrackingSession,
};
