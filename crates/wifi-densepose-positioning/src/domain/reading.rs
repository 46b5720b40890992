//! Per-cycle measurement types: the beacon-keyed [`Reading`] and the
//! identity-free [`RssiSignature`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::beacon::{BeaconAddress, BeaconId, BeaconTable};

/// Default level at or below which a value is treated as "not heard".
pub const RSSI_FLOOR_DBM: i32 = -100;

// ---------------------------------------------------------------------------
// Reading -- Value Object
// ---------------------------------------------------------------------------

/// One scan cycle's worth of beacon RSSI samples.
///
/// Produced by the scanning collaborator, consumed by the estimator and
/// then dropped. Keys are ordered so iteration is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    samples: BTreeMap<BeaconId, i32>,
    captured_at: DateTime<Utc>,
}

impl Reading {
    /// An empty reading captured at `captured_at`.
    pub fn new(captured_at: DateTime<Utc>) -> Self {
        Self {
            samples: BTreeMap::new(),
            captured_at,
        }
    }

    /// Build a reading from `(beacon, rssi)` pairs. Later duplicates win.
    pub fn from_samples<I, K>(captured_at: DateTime<Utc>, samples: I) -> Self
    where
        I: IntoIterator<Item = (K, i32)>,
        K: Into<BeaconId>,
    {
        Self {
            samples: samples.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            captured_at,
        }
    }

    /// Translate a MAC-keyed scan into a beacon-keyed reading.
    ///
    /// Addresses the table does not know are dropped. When one beacon is
    /// reported twice the stronger sample is kept.
    pub fn from_addresses<I>(table: &BeaconTable, captured_at: DateTime<Utc>, scan: I) -> Self
    where
        I: IntoIterator<Item = (BeaconAddress, i32)>,
    {
        let mut samples: BTreeMap<BeaconId, i32> = BTreeMap::new();
        for (address, rssi) in scan {
            let Some(id) = table.resolve(&address) else {
                tracing::trace!(%address, "ignoring unknown beacon address");
                continue;
            };
            samples
                .entry(id.clone())
                .and_modify(|v| *v = (*v).max(rssi))
                .or_insert(rssi);
        }
        Self { samples, captured_at }
    }

    /// Record a sample, replacing any earlier value for the same beacon.
    pub fn insert(&mut self, beacon: impl Into<BeaconId>, rssi: i32) {
        self.samples.insert(beacon.into(), rssi);
    }

    /// The sample for `beacon`, if present.
    pub fn get(&self, beacon: &BeaconId) -> Option<i32> {
        self.samples.get(beacon).copied()
    }

    /// Iterate samples in beacon-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&BeaconId, i32)> {
        self.samples.iter().map(|(k, v)| (k, *v))
    }

    /// Number of beacons in the reading.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no beacon was heard.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Capture time stamped by the scanner.
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// The strongest sample in the reading.
    pub fn strongest(&self) -> Option<(&BeaconId, i32)> {
        self.iter().max_by_key(|(_, rssi)| *rssi)
    }

    /// Drop identities and rank the values into a signature.
    pub fn signature(&self, top_n: usize) -> RssiSignature {
        RssiSignature::from_scan(self.samples.values().copied(), top_n)
    }

    /// [`signature`](Self::signature) with an explicit floor, usually the
    /// path-loss model's `rssi_floor_dbm`.
    pub fn signature_with_floor(&self, top_n: usize, floor_dbm: f64) -> RssiSignature {
        RssiSignature::from_scan_with_floor(self.samples.values().copied(), top_n, floor_dbm)
    }
}

// ---------------------------------------------------------------------------
// RssiSignature -- Value Object
// ---------------------------------------------------------------------------

/// Ranked RSSI values, strongest first, with no beacon identity attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RssiSignature(Vec<f64>);

impl RssiSignature {
    /// Wrap an already-ranked vector.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Rank a raw scan: keep values strictly between [`RSSI_FLOOR_DBM`] and
    /// 0 dBm, sort strongest first, truncate to `top_n`.
    pub fn from_scan(values: impl IntoIterator<Item = i32>, top_n: usize) -> Self {
        Self::from_scan_with_floor(values, top_n, f64::from(RSSI_FLOOR_DBM))
    }

    /// Like [`from_scan`](Self::from_scan) with values at or below
    /// `floor_dbm` dropped instead.
    pub fn from_scan_with_floor(
        values: impl IntoIterator<Item = i32>,
        top_n: usize,
        floor_dbm: f64,
    ) -> Self {
        let mut valid: Vec<i32> = values
            .into_iter()
            .filter(|v| f64::from(*v) > floor_dbm && *v < 0)
            .collect();
        valid.sort_unstable_by(|a, b| b.cmp(a));
        valid.truncate(top_n);
        Self(valid.into_iter().map(f64::from).collect())
    }

    /// The ranked values.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Number of ranks.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the signature carries no ranks.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the underlying vector.
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for RssiSignature {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::beacon::Beacon;
    use crate::domain::geometry::Point2;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn signature_ranks_and_filters() {
        let sig = RssiSignature::from_scan([-70, -100, -45, 3, -88, -52], 3);
        assert_eq!(sig.values(), &[-45.0, -52.0, -70.0]);
    }

    #[test]
    fn signature_of_all_invalid_values_is_empty() {
        assert!(RssiSignature::from_scan([-100, -120, 0, 5], 10).is_empty());
    }

    #[test]
    fn raised_floor_drops_weak_values() {
        let values = [-70, -95, -45, -90, -88];
        assert_eq!(RssiSignature::from_scan(values, 10).len(), 5);
        let sig = RssiSignature::from_scan_with_floor(values, 10, -90.0);
        assert_eq!(sig.values(), &[-45.0, -70.0, -88.0]);

        let reading = Reading::from_samples(t0(), [("AP-12", -95), ("AP-11", -61)]);
        assert_eq!(reading.signature_with_floor(5, -90.0).values(), &[-61.0]);
    }

    #[test]
    fn from_addresses_drops_unknown_and_keeps_strongest() {
        let known = BeaconAddress::parse("3C:A3:08:03:C5:40").unwrap();
        let unknown = BeaconAddress::parse("00:11:22:33:44:55").unwrap();
        let table =
            BeaconTable::from_beacons([Beacon::new("AP-11", Point2::new(25.3, 3.5)).with_address(known)])
                .unwrap();

        let reading =
            Reading::from_addresses(&table, t0(), [(known, -70), (unknown, -40), (known, -64)]);

        assert_eq!(reading.len(), 1);
        assert_eq!(reading.get(&BeaconId::new("AP-11")), Some(-64));
    }

    #[test]
    fn strongest_and_signature() {
        let reading = Reading::from_samples(t0(), [("AP-12", -80), ("AP-11", -55), ("AP-09", -67)]);
        let (id, rssi) = reading.strongest().unwrap();
        assert_eq!(id.as_str(), "AP-11");
        assert_eq!(rssi, -55);
        assert_eq!(reading.signature(2).values(), &[-55.0, -67.0]);
    }
}
