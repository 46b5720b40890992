//! Domain types for the positioning bounded context.

pub mod beacon;
pub mod geometry;
pub mod reading;
pub mod result;

pub use beacon::{Beacon, BeaconAddress, BeaconId, BeaconMeta, BeaconTable};
pub use geometry::{MapBounds, Point2, TrackAxis};
pub use reading::{Reading, RssiSignature, RSSI_FLOOR_DBM};
pub use result::{Direction, FusionMethod, TrajectoryPoint, TrajectorySummary};
