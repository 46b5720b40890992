//! Label → averaged-signature store with swap-on-write persistence.
//!
//! Matching reads a snapshot [`Arc`] of the whole mapping and never holds a
//! lock while it iterates. Every mutation clones the current mapping,
//! persists the new one through the repository and only then swaps it in,
//! so readers see either the old mapping or the new one, never a mix.
//! A failed save leaves the in-memory mapping unchanged.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use serde::{Deserialize, Serialize};

use crate::adapter::InMemoryRepository;
use crate::domain::reading::RssiSignature;
use crate::error::StoreError;
use crate::fingerprint::collect::average_signatures;
use crate::fingerprint::record::{FingerprintMap, FingerprintRecord};
use crate::port::FingerprintRepository;

/// Summary returned by [`FingerprintStore::stats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintStats {
    /// Number of records.
    pub count: usize,
    /// Record labels, sorted.
    pub labels: Vec<String>,
    /// Sum of the sample counts of every record.
    pub total_samples: usize,
}

/// Shared fingerprint store.
pub struct FingerprintStore {
    records: RwLock<Arc<FingerprintMap>>,
    repository: Box<dyn FingerprintRepository>,
}

impl std::fmt::Debug for FingerprintStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FingerprintStore")
            .field("records", &self.records.read().len())
            .finish_non_exhaustive()
    }
}

impl FingerprintStore {
    /// Open a store, loading whatever the repository holds.
    ///
    /// An unreadable or corrupt backing store is treated as empty; nothing
    /// is merged or partially recovered.
    pub fn open(repository: Box<dyn FingerprintRepository>) -> Self {
        let records = match repository.load() {
            Ok(records) => {
                tracing::info!(records = records.len(), "fingerprint store loaded");
                records
            }
            Err(error) => {
                tracing::warn!(%error, "fingerprint store unreadable, starting empty");
                FingerprintMap::new()
            }
        };
        Self {
            records: RwLock::new(Arc::new(records)),
            repository,
        }
    }

    /// An empty store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::open(Box::new(InMemoryRepository::new()))
    }

    /// Average `samples` rank by rank and store the result under `label`,
    /// replacing any existing record.
    ///
    /// Returns `Ok(None)` without touching the store when no sample carries
    /// a value.
    pub fn add(
        &self,
        label: &str,
        samples: &[RssiSignature],
        collected_at: DateTime<Utc>,
    ) -> Result<Option<FingerprintRecord>, StoreError> {
        let label = checked_label(label)?;
        let contributing = samples.iter().filter(|s| !s.is_empty()).count();
        let Some(signature) = average_signatures(samples) else {
            tracing::debug!(label, "no valid samples, nothing stored");
            return Ok(None);
        };
        let record = FingerprintRecord::new(label, signature, contributing, collected_at);
        self.insert(record.clone())?;
        Ok(Some(record))
    }

    /// Store a pre-built record, replacing any record with the same label.
    pub fn insert(&self, mut record: FingerprintRecord) -> Result<(), StoreError> {
        let label = checked_label(&record.label)?.to_owned();
        record.label.clone_from(&label);
        let replaced = self.mutate(|map| map.insert(label.clone(), record).is_some())?;
        tracing::info!(label = %label, replaced, "fingerprint stored");
        Ok(())
    }

    /// Remove a record.
    pub fn remove(&self, label: &str) -> Result<Option<FingerprintRecord>, StoreError> {
        if !self.contains(label) {
            return Ok(None);
        }
        self.mutate(|map| map.remove(label))
    }

    /// Remove every record.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.mutate(|map| map.clear())
    }

    /// A copy of one record.
    pub fn get(&self, label: &str) -> Option<FingerprintRecord> {
        self.records.read().get(label).cloned()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.records.read().contains_key(label)
    }

    /// Snapshot of the whole mapping. Later writes do not affect it.
    pub fn all(&self) -> Arc<FingerprintMap> {
        Arc::clone(&self.records.read())
    }

    /// Labels, sorted.
    pub fn labels(&self) -> Vec<String> {
        let snapshot = self.all();
        let sorted: BTreeSet<&String> = snapshot.keys().collect();
        sorted.into_iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Record count, labels and total samples.
    pub fn stats(&self) -> FingerprintStats {
        let snapshot = self.all();
        FingerprintStats {
            count: snapshot.len(),
            labels: self.labels(),
            total_samples: snapshot.values().map(|r| r.samples).sum(),
        }
    }

    /// Clone, modify, persist, then publish.
    fn mutate<R>(&self, f: impl FnOnce(&mut FingerprintMap) -> R) -> Result<R, StoreError> {
        // The upgradable guard excludes other writers but not readers.
        let guard = self.records.upgradable_read();
        let mut next = FingerprintMap::clone(&guard);
        let out = f(&mut next);
        self.repository.save(&next)?;
        let mut write = RwLockUpgradableReadGuard::upgrade(guard);
        *write = Arc::new(next);
        Ok(out)
    }
}

fn checked_label(label: &str) -> Result<&str, StoreError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        Err(StoreError::EmptyLabel)
    } else {
        Ok(trimmed)
    }
}
