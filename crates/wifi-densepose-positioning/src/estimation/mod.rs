//! Range-based position estimation: the path-loss distance model and the
//! geometric solvers built on it.

pub mod geometric;
pub mod path_loss;
pub mod simplex;

pub use geometric::{
    least_squares, trilaterate, weighted_centroid, BeaconRange, EstimateOutcome,
    EstimationMethod, FallbackReason, GeometricEstimator, PositionFix,
};
pub use path_loss::PathLossModel;
pub use simplex::SimplexOutcome;
