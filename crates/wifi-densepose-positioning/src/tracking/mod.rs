//! Temporal smoothing, fusion and per-session tracking state.

pub mod calibration;
pub mod fusion;
pub mod hysteresis;
pub mod rooms;
pub mod session;
pub mod smoothing;
pub mod worker;

pub use calibration::CalibrationCurve;
pub use fusion::{FusedEstimate, FusionPolicy};
pub use hysteresis::{DirectionTracker, PositionHysteresis};
pub use rooms::{RoomAnchor, RoomDirectory};
pub use session::{CycleReport, GeometricSource, ScanCycle, SessionState, TrackingSession};
pub use smoothing::{BeaconFilters, RollingMean};
pub use worker::{session_channel, ScanFeed, SessionWorker};
