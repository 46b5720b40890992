//! The driven-side port for fingerprint persistence.

use crate::error::StoreError;
use crate::fingerprint::record::FingerprintMap;

/// Durable storage for the whole label → record mapping.
///
/// The mapping is the unit of durability: `save` replaces everything that
/// was stored before.
pub trait FingerprintRepository: Send + Sync {
    /// Load the stored mapping. A store that was never written is empty.
    fn load(&self) -> Result<FingerprintMap, StoreError>;

    /// Replace the stored mapping with `records`.
    fn save(&self, records: &FingerprintMap) -> Result<(), StoreError>;
}

impl<R: FingerprintRepository + ?Sized> FingerprintRepository for std::sync::Arc<R> {
    fn load(&self) -> Result<FingerprintMap, StoreError> {
        (**self).load()
    }

    fn save(&self, records: &FingerprintMap) -> Result<(), StoreError> {
        (**self).save(records)
    }
}
