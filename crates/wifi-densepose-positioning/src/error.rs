//! Error types for the wifi-densepose-positioning crate.
//!
//! Only genuine failures live here: unreadable configuration, persistence
//! I/O, malformed addresses. Conditions that are a normal part of a scan
//! cycle (too few beacons, a singular trilateration system, an empty
//! fingerprint store) are modelled as result variants instead.
//!
//! ## Hierarchy
//!
//! ```text
//! PositioningError (top-level)
//! ├── ConfigError   (config validation / file loading)
//! └── StoreError    (fingerprint persistence)
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Convenient `Result` alias used across the crate.
pub type PositioningResult<T> = Result<T, PositioningError>;

// ---------------------------------------------------------------------------
// PositioningError
// ---------------------------------------------------------------------------

/// Top-level error type for the positioning engine.
#[derive(Debug, Error)]
pub enum PositioningError {
    /// A configuration validation or loading error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A fingerprint store persistence error.
    #[error("Fingerprint store error: {0}")]
    Store(#[from] StoreError),

    /// Failed to parse a beacon MAC address.
    #[error("failed to parse beacon address from '{input}': expected aa:bb:cc:dd:ee:ff")]
    AddressParse {
        /// The input string that could not be parsed.
        input: String,
    },

    /// A beacon id was referenced that is not in the beacon table.
    #[error("unknown beacon: {id}")]
    UnknownBeacon {
        /// The unresolved identifier.
        id: String,
    },

    /// The scanning collaborator failed to produce a measurement.
    #[error("scan failed: {reason}")]
    ScanFailed {
        /// Human-readable description of what went wrong.
        reason: String,
    },

    /// The scan feed was closed by its consumer.
    #[error("scan feed closed")]
    FeedClosed,
}

impl PositioningError {
    /// Construct a [`PositioningError::ScanFailed`].
    pub fn scan_failed<S: Into<String>>(reason: S) -> Self {
        PositioningError::ScanFailed { reason: reason.into() }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors produced when loading or validating a [`PositioningConfig`].
///
/// [`PositioningConfig`]: crate::config::PositioningConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field has an invalid value.
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// Name of the field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// A configuration file could not be read or written.
    #[error("Cannot access config file `{path}`: {source}")]
    FileRead {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file contains malformed JSON.
    #[error("Cannot parse config file `{path}`: {source}")]
    Parse {
        /// Path that was being parsed.
        path: PathBuf,
        /// Underlying JSON parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Construct a [`ConfigError::InvalidValue`].
    pub fn invalid_value<S: Into<String>>(field: &'static str, reason: S) -> Self {
        ConfigError::InvalidValue { field, reason: reason.into() }
    }
}

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors produced by fingerprint persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("I/O error on `{path}`: {source}")]
    Io {
        /// Path being accessed when the error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The store could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Fingerprint labels must be non-empty.
    #[error("fingerprint label must not be empty")]
    EmptyLabel,
}

impl StoreError {
    /// Construct a [`StoreError::Io`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io { path: path.into(), source }
    }
}
