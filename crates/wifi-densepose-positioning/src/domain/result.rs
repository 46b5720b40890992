//! Values reported to the presentation layer once a cycle completes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::geometry::Point2;

// ---------------------------------------------------------------------------
// FusionMethod
// ---------------------------------------------------------------------------

/// Which source produced the reported position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionMethod {
    /// The fingerprint matcher was confident enough to be trusted.
    Fingerprint,
    /// The geometric estimator (or calibrated interpolation) was used.
    GeometricFallback,
}

impl fmt::Display for FusionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fingerprint => f.write_str("fingerprint"),
            Self::GeometricFallback => f.write_str("geometric fallback"),
        }
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Movement along the track axis, after direction hysteresis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Moved past the threshold towards increasing coordinates.
    Forward,
    /// Moved past the threshold towards decreasing coordinates.
    Backward,
    /// No movement beyond the threshold since the last anchor.
    #[default]
    Stationary,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Stationary => "stationary",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Trajectory
// ---------------------------------------------------------------------------

/// One accepted position recorded while a session is tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Monotonically increasing index within the session, starting at 0.
    pub sequence: u64,
    /// Seconds since tracking started, from the readings' capture stamps.
    pub elapsed_secs: f64,
    /// Reported position.
    pub position: Point2,
    /// Nearest room or fingerprint label, if any is known.
    pub room: Option<String>,
    /// Source of the position.
    pub method: FusionMethod,
    /// Fingerprint confidence; only set when `method` is `Fingerprint`.
    pub confidence: Option<f64>,
    /// Smoothed RSSI of the tracked signal, rounded to whole dBm.
    pub rssi: Option<i32>,
}

/// Aggregate statistics over a recorded trajectory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySummary {
    pub point_count: usize,
    /// Smallest along-track coordinate seen.
    pub min_position: Option<f64>,
    /// Largest along-track coordinate seen.
    pub max_position: Option<f64>,
    /// `max_position - min_position`, or 0 when empty.
    pub span: f64,
    /// Rooms in first-visit order, without repeats.
    pub rooms_visited: Vec<String>,
    /// Elapsed time of the last point.
    pub duration_secs: f64,
}
