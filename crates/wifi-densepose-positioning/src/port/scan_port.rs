//! The driving-side port for RSSI acquisition.

use crate::domain::reading::{Reading, RssiSignature};
use crate::error::PositioningError;

/// Port that abstracts the radio scanning backend.
///
/// Implementations include:
/// - [`crate::adapter::SimulatedScanner`] -- path-loss model with seeded noise.
/// - OS-specific BLE / WiFi scanners living outside this crate.
pub trait ScanPort: Send + Sync {
    /// Perform one scan of the configured beacons.
    fn scan(&self) -> Result<Reading, PositioningError>;

    /// Scan every visible transmitter and return the `top_n` strongest
    /// values without identities.
    fn signature(&self, top_n: usize) -> Result<RssiSignature, PositioningError>;
}
