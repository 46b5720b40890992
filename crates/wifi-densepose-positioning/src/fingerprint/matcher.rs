//! K-nearest-neighbour matching of live signatures against stored records.
//!
//! Both metrics compare only the overlapping prefix of two signatures: a
//! noisy scan that heard fewer access points still matches on the ranks it
//! does have.

use serde::{Deserialize, Serialize};

use crate::config::{ConfidenceBand, FingerprintConfig};
use crate::domain::reading::RssiSignature;
use crate::fingerprint::record::FingerprintMap;

/// Euclidean distance over the overlapping prefix.
///
/// Returns `f64::INFINITY` when either signature is empty, so an empty
/// record can never look like a perfect match.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Cosine similarity over the overlapping prefix. Zero-magnitude inputs
/// give 0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for i in 0..n {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denom = (norm_a * norm_b).sqrt();
    if denom < 1e-12 {
        0.0
    } else {
        dot / denom
    }
}

// ---------------------------------------------------------------------------
// ConfidenceBands
// ---------------------------------------------------------------------------

/// Step function from best-candidate distance to confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceBands {
    bands: Vec<ConfidenceBand>,
    floor: f64,
}

impl ConfidenceBands {
    /// `bands` must be sorted by ascending `below`.
    pub fn new(bands: Vec<ConfidenceBand>, floor: f64) -> Self {
        Self { bands, floor }
    }

    /// Confidence of the first band whose limit exceeds `distance`.
    pub fn confidence(&self, distance: f64) -> f64 {
        self.bands
            .iter()
            .find(|band| distance < band.below)
            .map_or(self.floor, |band| band.confidence)
    }
}

impl Default for ConfidenceBands {
    fn default() -> Self {
        let cfg = FingerprintConfig::default();
        Self::new(cfg.bands, cfg.floor_confidence)
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// One ranked record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub label: String,
    /// Euclidean distance to the query.
    pub distance: f64,
    /// Cosine similarity to the query.
    pub similarity: f64,
}

/// Result of a KNN query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Classification {
    /// Label of the nearest record; `None` means no match.
    pub label: Option<String>,
    /// Step-function confidence of the nearest record, 0 on no match.
    pub confidence: f64,
    /// Up to `k` nearest records, nearest first.
    pub candidates: Vec<MatchCandidate>,
}

impl Classification {
    /// The well-defined "no match" answer.
    pub fn no_match() -> Self {
        Self::default()
    }

    pub fn is_match(&self) -> bool {
        self.label.is_some()
    }

    /// Distance of the nearest candidate.
    pub fn best_distance(&self) -> Option<f64> {
        self.candidates.first().map(|c| c.distance)
    }
}

// ---------------------------------------------------------------------------
// KnnMatcher
// ---------------------------------------------------------------------------

/// Stateless matcher; the records are handed in per query.
#[derive(Debug, Clone, Default)]
pub struct KnnMatcher {
    bands: ConfidenceBands,
}

impl KnnMatcher {
    pub fn new(bands: ConfidenceBands) -> Self {
        Self { bands }
    }

    pub fn from_config(config: &FingerprintConfig) -> Self {
        Self::new(ConfidenceBands::new(
            config.bands.clone(),
            config.floor_confidence,
        ))
    }

    /// Rank every record by distance to `query` and keep the nearest `k`.
    ///
    /// An empty query or an empty record set yields
    /// [`Classification::no_match`].
    pub fn classify(&self, query: &RssiSignature, records: &FingerprintMap, k: usize) -> Classification {
        if query.is_empty() || records.is_empty() {
            return Classification::no_match();
        }

        let q = query.values();
        let mut ranked: Vec<MatchCandidate> = records
            .values()
            .map(|record| {
                let stored = record.signature.values();
                MatchCandidate {
                    label: record.label.clone(),
                    distance: euclidean_distance(q, stored),
                    similarity: cosine_similarity(q, stored),
                }
            })
            .collect();
        ranked.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.label.cmp(&b.label))
        });

        let Some(best) = ranked.first() else {
            return Classification::no_match();
        };
        if !best.distance.is_finite() {
            return Classification::no_match();
        }
        let label = Some(best.label.clone());
        let confidence = self.bands.confidence(best.distance);
        ranked.truncate(k.max(1));

        Classification {
            label,
            confidence,
            candidates: ranked,
        }
    }
}
