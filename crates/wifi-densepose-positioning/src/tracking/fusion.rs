//! Choosing between fingerprint and geometric output for one cycle.

use crate::config::FingerprintConfig;
use crate::domain::geometry::{MapBounds, Point2};
use crate::domain::result::FusionMethod;
use crate::fingerprint::matcher::Classification;
use crate::tracking::rooms::RoomDirectory;

/// The merged result of one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedEstimate {
    /// `None` only when neither source produced a position yet.
    pub position: Option<Point2>,
    pub method: FusionMethod,
    /// Fingerprint label when `method` is `Fingerprint`.
    pub label: Option<String>,
    /// Fingerprint confidence when `method` is `Fingerprint`.
    pub confidence: Option<f64>,
}

/// Trust rule for fingerprint output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionPolicy {
    pub confidence_threshold: f64,
    pub min_records: usize,
}

impl FusionPolicy {
    pub fn from_config(config: &FingerprintConfig) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
            min_records: config.min_records,
        }
    }

    /// Whether a store of `record_count` entries is large enough to match
    /// against at all.
    pub fn eligible(&self, record_count: usize) -> bool {
        record_count >= self.min_records
    }

    /// Merge the two candidates.
    ///
    /// The fingerprint wins when it produced a label with confidence at or
    /// above the threshold and the store is eligible. Its position is the
    /// configured room anchor for that label, clamped to `bounds`, or the
    /// geometric position when the label has no anchor.
    pub fn fuse(
        &self,
        geometric: Option<Point2>,
        classification: Option<&Classification>,
        record_count: usize,
        rooms: &RoomDirectory,
        bounds: &MapBounds,
    ) -> FusedEstimate {
        let trusted = classification.filter(|c| {
            c.label.is_some()
                && c.confidence >= self.confidence_threshold
                && self.eligible(record_count)
        });

        match trusted.and_then(|c| c.label.as_deref().map(|label| (label, c.confidence))) {
            Some((label, confidence)) => {
                tracing::debug!(label, confidence, "fusion: fingerprint");
                let anchored = rooms.position_of(label).map(|p| {
                    let clamped = bounds.clamp(p);
                    if clamped != p {
                        tracing::debug!(label, %p, %clamped, "room anchor outside map bounds");
                    }
                    clamped
                });
                FusedEstimate {
                    position: anchored.or(geometric),
                    method: FusionMethod::Fingerprint,
                    label: Some(label.to_owned()),
                    confidence: Some(confidence),
                }
            }
            None => {
                tracing::debug!(
                    confidence = classification.map(|c| c.confidence),
                    record_count,
                    "fusion: geometric fallback"
                );
                FusedEstimate {
                    position: geometric,
                    method: FusionMethod::GeometricFallback,
                    label: None,
                    confidence: None,
                }
            }
        }
    }
}

impl Default for FusionPolicy {
    fn default() -> Self {
        Self::from_config(&FingerprintConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::rooms::RoomAnchor;

    fn classification(label: &str, confidence: f64) -> Classification {
        Classification {
            label: Some(label.to_owned()),
            confidence,
            candidates: Vec::new(),
        }
    }

    fn rooms() -> RoomDirectory {
        RoomDirectory::new(vec![RoomAnchor::new("7412", Point2::new(2.0, 4.5))])
    }

    fn fuse(
        geometric: Option<Point2>,
        classification: Option<&Classification>,
        record_count: usize,
    ) -> FusedEstimate {
        FusionPolicy::default().fuse(
            geometric,
            classification,
            record_count,
            &rooms(),
            &MapBounds::default(),
        )
    }

    #[test]
    fn confident_match_uses_room_position() {
        let geo = Some(Point2::new(10.0, 3.0));
        let out = fuse(geo, Some(&classification("7412", 0.80)), 3);
        assert_eq!(out.method, FusionMethod::Fingerprint);
        assert_eq!(out.position, Some(Point2::new(2.0, 4.5)));
        assert_eq!(out.label.as_deref(), Some("7412"));
        assert_eq!(out.confidence, Some(0.80));
    }

    #[test]
    fn threshold_is_inclusive() {
        let out = fuse(None, Some(&classification("7412", 0.75)), 3);
        assert_eq!(out.method, FusionMethod::Fingerprint);
    }

    #[test]
    fn low_confidence_falls_back() {
        let geo = Some(Point2::new(10.0, 3.0));
        let out = fuse(geo, Some(&classification("7412", 0.60)), 5);
        assert_eq!(out.method, FusionMethod::GeometricFallback);
        assert_eq!(out.position, geo);
        assert_eq!(out.confidence, None);
    }

    #[test]
    fn small_store_falls_back_regardless_of_confidence() {
        let out = fuse(None, Some(&classification("7412", 0.95)), 2);
        assert_eq!(out.method, FusionMethod::GeometricFallback);
        assert_eq!(out.position, None);
    }

    #[test]
    fn unanchored_label_keeps_geometric_position() {
        let geo = Some(Point2::new(10.0, 3.0));
        let out = fuse(geo, Some(&classification("hall", 0.95)), 3);
        assert_eq!(out.method, FusionMethod::Fingerprint);
        assert_eq!(out.position, geo);
    }

    #[test]
    fn anchor_outside_bounds_is_clamped() {
        let rooms = RoomDirectory::new(vec![RoomAnchor::new("annex", Point2::new(120.0, 40.0))]);
        let bounds = MapBounds::new(-2.0, 75.0, -3.0, 22.0);
        let out = FusionPolicy::default().fuse(
            None,
            Some(&classification("annex", 0.95)),
            3,
            &rooms,
            &bounds,
        );
        assert_eq!(out.method, FusionMethod::Fingerprint);
        assert_eq!(out.position, Some(Point2::new(75.0, 22.0)));
    }

    #[test]
    fn no_match_falls_back() {
        let out = fuse(None, Some(&Classification::no_match()), 10);
        assert_eq!(out.method, FusionMethod::GeometricFallback);
    }
}
