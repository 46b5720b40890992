//! Piecewise-linear RSSI → along-track offset interpolation.
//!
//! A single-beacon alternative to multi-beacon estimation: walk the track,
//! note the smoothed RSSI at measured offsets, and interpolate between them.

use crate::config::{CalibrationConfig, CalibrationPoint};
use crate::domain::geometry::{Point2, TrackAxis};

/// Slope used past the weakest calibration point, in metres per dB.
const EXTRAPOLATION_M_PER_DB: f64 = 1.0;

/// Measured `(rssi, offset)` curve, strongest RSSI first.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationCurve {
    points: Vec<(f64, f64)>,
    origin: Point2,
    axis: TrackAxis,
}

impl CalibrationCurve {
    /// Build from a validated configuration.
    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self::new(&config.points, config.origin, config.axis)
    }

    pub fn new(points: &[CalibrationPoint], origin: Point2, axis: TrackAxis) -> Self {
        Self {
            points: points.iter().map(|p| (p.rssi, p.offset)).collect(),
            origin,
            axis,
        }
    }

    /// Along-track offset for `rssi`.
    ///
    /// Stronger than the first point gives the first offset. Weaker than the
    /// last point extrapolates away from it at 1 m per dB. Plateaus (equal
    /// RSSI at consecutive points) resolve to the earlier point.
    pub fn offset(&self, rssi: f64) -> f64 {
        let (Some(&(first_rssi, first_offset)), Some(&(last_rssi, last_offset))) =
            (self.points.first(), self.points.last())
        else {
            return 0.0;
        };

        if rssi >= first_rssi {
            return first_offset;
        }
        if rssi <= last_rssi {
            return last_offset + (last_rssi - rssi) * EXTRAPOLATION_M_PER_DB;
        }

        for w in self.points.windows(2) {
            let (r0, o0) = w[0];
            let (r1, o1) = w[1];
            if r0 >= rssi && rssi >= r1 {
                if r0 == r1 {
                    return o0;
                }
                let ratio = (r0 - rssi) / (r0 - r1);
                return o0 + ratio * (o1 - o0);
            }
        }
        last_offset
    }

    /// Floor position for `rssi`: `origin` shifted along the axis.
    pub fn position(&self, rssi: f64) -> Point2 {
        self.axis.offset_from(self.origin, self.offset(rssi))
    }
}
