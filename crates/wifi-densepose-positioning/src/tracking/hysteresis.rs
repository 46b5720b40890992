//! Change suppression for reported positions and movement direction.

use crate::domain::geometry::{Point2, TrackAxis};
use crate::domain::result::Direction;

// ---------------------------------------------------------------------------
// PositionHysteresis
// ---------------------------------------------------------------------------

/// Holds the reported position until a candidate moves at least
/// `min_change` away from it.
#[derive(Debug, Clone)]
pub struct PositionHysteresis {
    min_change: f64,
    reported: Option<Point2>,
}

impl PositionHysteresis {
    pub fn new(min_change: f64) -> Self {
        Self {
            min_change,
            reported: None,
        }
    }

    /// Offer a newly smoothed candidate and return the position to report.
    ///
    /// The first candidate is always adopted.
    pub fn apply(&mut self, candidate: Point2) -> Point2 {
        match self.reported {
            Some(prev) if prev.distance_to(&candidate) < self.min_change => {
                tracing::trace!(
                    moved = prev.distance_to(&candidate),
                    min_change = self.min_change,
                    "position change suppressed"
                );
                prev
            }
            _ => {
                self.reported = Some(candidate);
                candidate
            }
        }
    }

    /// The last adopted position.
    pub fn reported(&self) -> Option<Point2> {
        self.reported
    }

    pub fn reset(&mut self) {
        self.reported = None;
    }
}

// ---------------------------------------------------------------------------
// DirectionTracker
// ---------------------------------------------------------------------------

/// Reports forward/backward only once the along-axis displacement from the
/// last stable anchor reaches `threshold`; the anchor then moves to the new
/// position.
#[derive(Debug, Clone)]
pub struct DirectionTracker {
    threshold: f64,
    axis: TrackAxis,
    anchor: Option<f64>,
}

impl DirectionTracker {
    pub fn new(threshold: f64, axis: TrackAxis) -> Self {
        Self {
            threshold,
            axis,
            anchor: None,
        }
    }

    /// Classify the movement to `position`. The first position only sets
    /// the anchor.
    pub fn update(&mut self, position: Point2) -> Direction {
        let along = self.axis.project(&position);
        let Some(anchor) = self.anchor else {
            self.anchor = Some(along);
            return Direction::Stationary;
        };

        let diff = along - anchor;
        if diff.abs() >= self.threshold && diff != 0.0 {
            self.anchor = Some(along);
            if diff > 0.0 {
                Direction::Forward
            } else {
                Direction::Backward
            }
        } else {
            Direction::Stationary
        }
    }

    /// Along-axis coordinate of the current anchor.
    pub fn anchor(&self) -> Option<f64> {
        self.anchor
    }

    pub fn reset(&mut self) {
        self.anchor = None;
    }
}
