//! Planar geometry value objects shared by every stage.
//!
//! All coordinates are metres in the building's floor frame. The origin and
//! axis orientation are whatever the beacon table uses.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Point2 -- Value Object
// ---------------------------------------------------------------------------

/// A 2-D position in the floor frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    /// X coordinate in metres.
    pub x: f64,
    /// Y coordinate in metres.
    pub y: f64,
}

impl Point2 {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}m, {:.2}m)", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// MapBounds -- Value Object
// ---------------------------------------------------------------------------

/// Axis-aligned region every reported position is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    /// Minimum X (inclusive).
    pub min_x: f64,
    /// Maximum X (inclusive).
    pub max_x: f64,
    /// Minimum Y (inclusive).
    pub min_y: f64,
    /// Maximum Y (inclusive).
    pub max_y: f64,
}

impl MapBounds {
    /// Create bounds from the two corner extents.
    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self { min_x, max_x, min_y, max_y }
    }

    /// Clamp `p` into the region. Coordinates are clamped, never rejected.
    pub fn clamp(&self, p: Point2) -> Point2 {
        Point2 {
            x: p.x.clamp(self.min_x, self.max_x),
            y: p.y.clamp(self.min_y, self.max_y),
        }
    }

    /// Whether `p` lies inside the region (edges included).
    pub fn contains(&self, p: &Point2) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }

    /// The centre of the region.
    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Whether the extents are ordered and finite.
    pub fn is_well_formed(&self) -> bool {
        [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.min_x <= self.max_x
            && self.min_y <= self.max_y
    }
}

impl Default for MapBounds {
    /// The surveyed floor: 75 m x 22 m with a small margin below the origin.
    fn default() -> Self {
        Self::new(-2.0, 75.0, -3.0, 22.0)
    }
}

// ---------------------------------------------------------------------------
// TrackAxis -- Value Object
// ---------------------------------------------------------------------------

/// The axis along which forward/backward movement is measured.
///
/// Corridor deployments walk mostly along one axis; displacement is
/// projected onto it before the direction hysteresis is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackAxis {
    /// Measure along X (default; corridors run along X).
    #[default]
    X,
    /// Measure along Y.
    Y,
}

impl TrackAxis {
    /// Project a point onto this axis.
    pub fn project(&self, p: &Point2) -> f64 {
        match self {
            Self::X => p.x,
            Self::Y => p.y,
        }
    }

    /// Place `offset` metres along this axis starting from `origin`.
    pub fn offset_from(&self, origin: Point2, offset: f64) -> Point2 {
        match self {
            Self::X => Point2::new(origin.x + offset, origin.y),
            Self::Y => Point2::new(origin.x, origin.y + offset),
        }
    }
}
