//! JSON file key-value store.
//!
//! The file holds one JSON object mapping keys to string values. Writes go
//! to a sibling temp file which is then renamed over the original, so a crash
//! mid-write leaves the previous contents intact.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::{DurablePersistence, PersistenceError};

/// File-backed [`DurablePersistence`].
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Open a store at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, PersistenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(PersistenceError::Corrupt)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let encoded = serde_json::to_vec_pretty(entries).map_err(PersistenceError::Encode)?;
        let tmp_path = self.tmp_path();
        {
            let mut tmp = fs::File::create(&tmp_path)?;
            tmp.write_all(&encoded)?;
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DurablePersistence for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let _guard = self.lock.lock();
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock();
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(PersistenceError::Corrupt(e)) => {
                warn!(path = %self.path.display(), error = %e, "Replacing corrupt store file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)?;
        debug!(path = %self.path.display(), key, bytes = value.len(), "Store written");
        Ok(())
    }
}
