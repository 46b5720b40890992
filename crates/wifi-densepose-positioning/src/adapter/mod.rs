//! Adapter implementations for the [`ScanPort`] and
//! [`FingerprintRepository`] ports.
//!
//! - [`SimulatedScanner`]: path-loss RSSI from a settable true position with
//!   seeded Gaussian noise.
//! - [`JsonFileRepository`]: pretty-printed JSON file, replaced atomically.
//! - [`InMemoryRepository`]: volatile store for tests and ephemeral sessions.
//!
//! [`ScanPort`]: crate::port::ScanPort
//! [`FingerprintRepository`]: crate::port::FingerprintRepository

pub mod json_repository;
pub mod memory_repository;
pub mod simulated_scanner;

pub use json_repository::JsonFileRepository;
pub use memory_repository::InMemoryRepository;
pub use simulated_scanner::SimulatedScanner;
