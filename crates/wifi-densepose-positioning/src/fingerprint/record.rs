//! Persisted fingerprint record.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::reading::RssiSignature;

/// The durable label → record mapping.
pub type FingerprintMap = HashMap<String, FingerprintRecord>;

/// An averaged signature recorded at a named location.
///
/// Older store files used `location` and `pattern` for the first two
/// fields and a naive local timestamp; both are still accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintRecord {
    /// Unique location label.
    #[serde(alias = "location")]
    pub label: String,
    /// Averaged signature, strongest rank first.
    #[serde(alias = "pattern")]
    pub signature: RssiSignature,
    /// Scans that contributed to the average.
    pub samples: usize,
    /// When the record was collected.
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl FingerprintRecord {
    pub fn new(
        label: impl Into<String>,
        signature: RssiSignature,
        samples: usize,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            label: label.into(),
            signature,
            samples,
            timestamp,
        }
    }
}

/// ISO-8601 timestamps; naive values are read as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(&s) {
            return Ok(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| de::Error::custom(format!("invalid timestamp '{s}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_legacy_field_names() {
        let json = r#"{
            "location": "7411",
            "pattern": [-48, -55, -61],
            "samples": 10,
            "timestamp": "2025-11-20T14:03:27.512345",
            "raw_patterns": [[-48, -55, -61]]
        }"#;
        let record: FingerprintRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.label, "7411");
        assert_eq!(record.signature.values(), &[-48.0, -55.0, -61.0]);
        assert_eq!(record.samples, 10);
        assert_eq!(record.timestamp.to_rfc3339(), "2025-11-20T14:03:27.512345+00:00");
    }

    #[test]
    fn writes_current_field_names() {
        let ts = DateTime::<Utc>::from_timestamp(1_760_000_000, 0).unwrap();
        let record = FingerprintRecord::new("EV", RssiSignature::new(vec![-50.0]), 3, ts);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["label"], "EV");
        assert_eq!(value["signature"][0], -50.0);
        assert!(value["timestamp"].as_str().unwrap().ends_with("+00:00"));

        let back: FingerprintRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn rejects_garbage_timestamp() {
        let json = r#"{"label":"x","signature":[],"samples":1,"timestamp":"yesterday"}"#;
        assert!(serde_json::from_str::<FingerprintRecord>(json).is_err());
    }
}
