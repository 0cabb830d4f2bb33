//! Durable key-value storage for the stats record.

use std::collections::HashMap;
use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

use crate::stats::StatsError;

/// Minimal string key-value store, the shape of a browser's local storage.
pub trait KeyValueStorage: Debug + Send + Sync {
    /// Reads the value stored under `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if the backing store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StatsError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if the backing store cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StatsError>;
}

/// Process-local storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StatsError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StatsError::new("memory storage lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StatsError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StatsError::new("memory storage lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per record inside a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Creates storage rooted at `dir`. The directory is created on first write.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        info!("Creating JsonFileStorage");
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StatsError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StatsError::new(format!("Invalid storage key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStorage for JsonFileStorage {
    #[instrument(skip(self))]
    fn read(&self, key: &str) -> Result<Option<String>, StatsError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                debug!(path = %path.display(), bytes = content.len(), "Record read");
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No record on disk");
                Ok(None)
            }
            Err(e) => Err(StatsError::new(format!(
                "Failed to read '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    #[instrument(skip(self, value))]
    fn write(&self, key: &str, value: &str) -> Result<(), StatsError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;

        debug!(path = %path.display(), bytes = value.len(), "Record written");
        Ok(())
    }
}
