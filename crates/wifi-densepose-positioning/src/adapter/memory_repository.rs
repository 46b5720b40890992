//! Volatile fingerprint persistence.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::error::StoreError;
use crate::fingerprint::record::FingerprintMap;
use crate::port::FingerprintRepository;

/// In-memory repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    records: RwLock<FingerprintMap>,
    saves: AtomicUsize,
}

impl InMemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with `records`.
    pub fn with_records(records: FingerprintMap) -> Self {
        Self {
            records: RwLock::new(records),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of completed `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

impl FingerprintRepository for InMemoryRepository {
    fn load(&self) -> Result<FingerprintMap, StoreError> {
        Ok(self.records.read().clone())
    }

    fn save(&self, records: &FingerprintMap) -> Result<(), StoreError> {
        *self.records.write() = records.clone();
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
