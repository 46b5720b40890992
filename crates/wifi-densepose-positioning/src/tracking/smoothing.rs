//! Fixed-size moving-average buffers.

use std::collections::{BTreeMap, VecDeque};

use crate::domain::beacon::BeaconId;
use crate::domain::reading::Reading;

// ---------------------------------------------------------------------------
// RollingMean
// ---------------------------------------------------------------------------

/// Unweighted mean over the most recent `capacity` samples.
///
/// Pushing one outlier of magnitude `m` into a full buffer moves the mean by
/// at most `m / capacity`.
#[derive(Debug, Clone)]
pub struct RollingMean {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl RollingMean {
    /// Create an empty buffer. A zero capacity is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a sample, evicting the oldest when full, and return the new mean.
    pub fn push(&mut self, value: f64) -> f64 {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Mean of the buffered samples, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            None
        } else {
            Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
        }
    }

    /// The most recent sample.
    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

// ---------------------------------------------------------------------------
// BeaconFilters
// ---------------------------------------------------------------------------

/// One [`RollingMean`] per beacon, created on first sight.
#[derive(Debug, Clone)]
pub struct BeaconFilters {
    window: usize,
    filters: BTreeMap<BeaconId, RollingMean>,
}

impl BeaconFilters {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            filters: BTreeMap::new(),
        }
    }

    /// Feed a reading and return the smoothed RSSI of every beacon it
    /// contains. Beacons missing from this reading keep their history but
    /// are not reported.
    pub fn update(&mut self, reading: &Reading) -> BTreeMap<BeaconId, f64> {
        let window = self.window;
        reading
            .iter()
            .map(|(id, rssi)| {
                let smoothed = self
                    .filters
                    .entry(id.clone())
                    .or_insert_with(|| RollingMean::new(window))
                    .push(f64::from(rssi));
                (id.clone(), smoothed)
            })
            .collect()
    }

    /// Current smoothed value for one beacon.
    pub fn mean(&self, beacon: &BeaconId) -> Option<f64> {
        self.filters.get(beacon).and_then(RollingMean::mean)
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }
}
