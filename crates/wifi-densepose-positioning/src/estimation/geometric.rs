//! Multi-beacon geometric position estimation.
//!
//! Three interchangeable solvers share one contract: given ranges to known
//! beacon positions, produce a point. The strategy is chosen once, at
//! construction, from [`EstimationMethod`].
//!
//! The estimator caches the last fix. Cycles that hear too few beacons in
//! range return that cached value inside
//! [`EstimateOutcome::InsufficientBeacons`] instead of failing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{EstimatorConfig, SimplexConfig};
use crate::domain::beacon::{BeaconId, BeaconTable};
use crate::domain::geometry::{MapBounds, Point2};
use crate::domain::reading::Reading;
use crate::error::ConfigError;
use crate::estimation::path_loss::PathLossModel;
use crate::estimation::simplex;

/// Determinant magnitude below which the trilateration system is singular.
const SINGULAR_EPSILON: f64 = 1e-10;

// ---------------------------------------------------------------------------
// EstimationMethod
// ---------------------------------------------------------------------------

/// Solver strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMethod {
    /// Beacon positions averaged with weight `1 / d²`.
    #[default]
    WeightedCentroid,
    /// Closed-form solve from the three nearest beacons.
    Trilateration,
    /// Nelder-Mead minimisation of squared range residuals.
    LeastSquares,
}

impl EstimationMethod {
    /// The configuration name of this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeightedCentroid => "weighted_centroid",
            Self::Trilateration => "trilateration",
            Self::LeastSquares => "least_squares",
        }
    }
}

impl fmt::Display for EstimationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstimationMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "weighted_centroid" | "centroid" => Ok(Self::WeightedCentroid),
            "trilateration" => Ok(Self::Trilateration),
            "least_squares" => Ok(Self::LeastSquares),
            other => Err(ConfigError::invalid_value(
                "estimator.method",
                format!("unknown method '{other}'"),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Estimate types
// ---------------------------------------------------------------------------

/// A beacon position paired with its estimated range.
#[derive(Debug, Clone, PartialEq)]
pub struct BeaconRange {
    pub beacon: BeaconId,
    pub position: Point2,
    /// Estimated distance in metres.
    pub distance: f64,
}

/// Why the requested solver handed over to the weighted centroid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The three nearest beacons are colinear or coincident.
    SingularSystem,
    /// Fewer than three beacons were in range.
    TooFewBeacons,
}

/// A successful position solve.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionFix {
    /// Solved position, clamped to the map bounds.
    pub position: Point2,
    /// Strategy configured on the estimator.
    pub requested: EstimationMethod,
    /// Strategy that actually produced `position`.
    pub solved_by: EstimationMethod,
    /// Set when `solved_by` differs from `requested`.
    pub fallback: Option<FallbackReason>,
    /// Ranges that took part, nearest first.
    pub ranges: Vec<BeaconRange>,
}

impl PositionFix {
    /// Identifiers of the beacons that took part, nearest first.
    pub fn beacons_used(&self) -> impl Iterator<Item = &BeaconId> {
        self.ranges.iter().map(|r| &r.beacon)
    }
}

/// Outcome of one estimation call.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimateOutcome {
    /// A new position was solved and cached.
    Fix(PositionFix),
    /// Fewer than `required` beacons were in range.
    InsufficientBeacons {
        observed: usize,
        required: usize,
        /// Cached position from an earlier cycle, if any.
        last_known: Option<Point2>,
    },
    /// Every solver degenerated (all weights were zero).
    NoSolution {
        last_known: Option<Point2>,
    },
}

impl EstimateOutcome {
    /// The position to report: the new fix or the cached one.
    pub fn position(&self) -> Option<Point2> {
        match self {
            Self::Fix(fix) => Some(fix.position),
            Self::InsufficientBeacons { last_known, .. } | Self::NoSolution { last_known } => {
                *last_known
            }
        }
    }

    /// Whether this cycle produced a new fix.
    pub fn is_fix(&self) -> bool {
        matches!(self, Self::Fix(_))
    }
}

// ---------------------------------------------------------------------------
// Solvers
// ---------------------------------------------------------------------------

/// Inverse-square weighted average of beacon positions.
///
/// Ranges with non-positive distance are ignored. Returns `None` when no
/// range carries weight.
pub fn weighted_centroid(ranges: &[BeaconRange]) -> Option<Point2> {
    let mut total = 0.0;
    let mut x = 0.0;
    let mut y = 0.0;
    for r in ranges.iter().filter(|r| r.distance > 0.0) {
        let w = 1.0 / (r.distance * r.distance);
        total += w;
        x += w * r.position.x;
        y += w * r.position.y;
    }
    if total > 0.0 && total.is_finite() {
        Some(Point2::new(x / total, y / total))
    } else {
        None
    }
}

/// Closed-form trilateration from exactly three ranges.
///
/// Subtracting the first circle equation from the other two gives a 2×2
/// linear system, solved by Cramer's rule. Returns `None` when the system is
/// singular.
pub fn trilaterate(ranges: &[BeaconRange; 3]) -> Option<Point2> {
    let [r1, r2, r3] = ranges;
    let (p1, p2, p3) = (r1.position, r2.position, r3.position);
    let (d1, d2, d3) = (r1.distance, r2.distance, r3.distance);

    let a = 2.0 * (p2.x - p1.x);
    let b = 2.0 * (p2.y - p1.y);
    let c = d1 * d1 - d2 * d2 - p1.x * p1.x + p2.x * p2.x - p1.y * p1.y + p2.y * p2.y;
    let d = 2.0 * (p3.x - p1.x);
    let e = 2.0 * (p3.y - p1.y);
    let f = d1 * d1 - d3 * d3 - p1.x * p1.x + p3.x * p3.x - p1.y * p1.y + p3.y * p3.y;

    let det = a * e - b * d;
    if det.abs() < SINGULAR_EPSILON {
        return None;
    }

    let point = Point2::new((c * e - f * b) / det, (a * f - d * c) / det);
    point.is_finite().then_some(point)
}

/// Minimise `Σ (|p − beacon| − distance)²` from `seed`.
pub fn least_squares(ranges: &[BeaconRange], seed: Point2, config: &SimplexConfig) -> Point2 {
    let outcome = simplex::minimize(
        |p| {
            ranges
                .iter()
                .map(|r| (p.distance_to(&r.position) - r.distance).powi(2))
                .sum()
        },
        seed,
        config,
    );
    if !outcome.converged {
        tracing::debug!(
            iterations = outcome.iterations,
            residual = outcome.value,
            "least-squares solver hit the iteration cap"
        );
    }
    outcome.point
}

// ---------------------------------------------------------------------------
// GeometricEstimator
// ---------------------------------------------------------------------------

/// Stateful estimator owning the beacon table and the last-known position.
///
/// One instance belongs to one tracking session.
#[derive(Debug, Clone)]
pub struct GeometricEstimator {
    model: PathLossModel,
    beacons: BeaconTable,
    config: EstimatorConfig,
    last_known: Option<Point2>,
}

impl GeometricEstimator {
    /// Create an estimator with an empty position cache.
    pub fn new(model: PathLossModel, beacons: BeaconTable, config: EstimatorConfig) -> Self {
        Self {
            model,
            beacons,
            config,
            last_known: None,
        }
    }

    /// The configured strategy.
    pub fn method(&self) -> EstimationMethod {
        self.config.method
    }

    /// The distance model in use.
    pub fn model(&self) -> &PathLossModel {
        &self.model
    }

    /// The beacon table in use.
    pub fn beacons(&self) -> &BeaconTable {
        &self.beacons
    }

    /// The map bounds positions are clamped into.
    pub fn bounds(&self) -> &MapBounds {
        &self.config.bounds
    }

    /// The cached last fix.
    pub fn last_known(&self) -> Option<Point2> {
        self.last_known
    }

    /// Forget the cached last fix.
    pub fn reset(&mut self) {
        self.last_known = None;
    }

    /// Estimate from one reading.
    pub fn estimate(&mut self, reading: &Reading) -> EstimateOutcome {
        self.estimate_rssi(reading.iter().map(|(id, rssi)| (id, f64::from(rssi))))
    }

    /// Estimate from (possibly smoothed) fractional RSSI samples.
    pub fn estimate_rssi<'a, I>(&mut self, samples: I) -> EstimateOutcome
    where
        I: IntoIterator<Item = (&'a BeaconId, f64)>,
    {
        let model = self.model;
        self.estimate_distances(
            samples
                .into_iter()
                .map(|(id, rssi)| (id, model.distance(rssi))),
        )
    }

    /// Estimate from already-derived ranges.
    ///
    /// Beacons missing from the table and ranges at or beyond the model's
    /// maximum distance are ignored.
    pub fn estimate_distances<'a, I>(&mut self, distances: I) -> EstimateOutcome
    where
        I: IntoIterator<Item = (&'a BeaconId, f64)>,
    {
        let max_distance = self.model.max_distance();
        let mut ranges: Vec<BeaconRange> = distances
            .into_iter()
            .filter(|(_, d)| d.is_finite() && *d < max_distance)
            .filter_map(|(id, distance)| {
                let position = self.beacons.position(id)?;
                Some(BeaconRange {
                    beacon: id.clone(),
                    position,
                    distance,
                })
            })
            .collect();

        if ranges.len() < self.config.min_beacons {
            return EstimateOutcome::InsufficientBeacons {
                observed: ranges.len(),
                required: self.config.min_beacons,
                last_known: self.last_known,
            };
        }

        ranges.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        match self.solve(&ranges) {
            Some((position, solved_by, fallback)) => {
                let position = self.config.bounds.clamp(position);
                self.last_known = Some(position);
                EstimateOutcome::Fix(PositionFix {
                    position,
                    requested: self.config.method,
                    solved_by,
                    fallback,
                    ranges,
                })
            }
            None => EstimateOutcome::NoSolution {
                last_known: self.last_known,
            },
        }
    }

    /// Run the configured strategy on ranges sorted nearest first.
    fn solve(
        &self,
        ranges: &[BeaconRange],
    ) -> Option<(Point2, EstimationMethod, Option<FallbackReason>)> {
        use EstimationMethod::*;

        match self.config.method {
            WeightedCentroid => weighted_centroid(ranges).map(|p| (p, WeightedCentroid, None)),
            Trilateration => {
                let nearest: Option<&[BeaconRange; 3]> =
                    ranges.get(..3).and_then(|s| s.try_into().ok());
                let reason = match nearest {
                    Some(three) => match trilaterate(three) {
                        Some(p) => return Some((p, Trilateration, None)),
                        None => FallbackReason::SingularSystem,
                    },
                    None => FallbackReason::TooFewBeacons,
                };
                tracing::debug!(?reason, "trilateration falling back to weighted centroid");
                weighted_centroid(ranges).map(|p| (p, WeightedCentroid, Some(reason)))
            }
            LeastSquares => {
                let seed = weighted_centroid(ranges).unwrap_or_else(|| self.config.bounds.center());
                let p = least_squares(ranges, seed, &self.config.solver);
                p.is_finite().then_some((p, LeastSquares, None))
            }
        }
    }
}
