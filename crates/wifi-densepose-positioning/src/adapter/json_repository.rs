//! JSON file persistence for the fingerprint mapping.

use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::fingerprint::record::FingerprintMap;
use crate::port::FingerprintRepository;

/// Stores the whole mapping as one pretty-printed JSON object keyed by label.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a crash mid-write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl FingerprintRepository for JsonFileRepository {
    fn load(&self) -> Result<FingerprintMap, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(FingerprintMap::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        let mut records: FingerprintMap = serde_json::from_str(&contents)?;
        // Keys are authoritative; older files could disagree with the body.
        for (label, record) in records.iter_mut() {
            if record.label != *label {
                record.label.clone_from(label);
            }
        }
        Ok(records)
    }

    fn save(&self, records: &FingerprintMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, json).map_err(|e| StoreError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        tracing::info!(path = %self.path.display(), records = records.len(), "fingerprint store saved");
        Ok(())
    }
}
