//! Port definitions for the positioning bounded context.
//!
//! Hexagonal-architecture ports that keep radio access and persistence
//! outside the core, so real scanners, simulated scanners and test doubles
//! can be swapped transparently.

mod repository;
mod scan_port;

pub use repository::FingerprintRepository;
pub use scan_port::ScanPort;
