//! JSON-file local tier
//!
//! Keeps every entry in memory and rewrites a single JSON object file on each
//! write, which is how browser local storage behaves from the page's point of
//! view: synchronous, durable across restarts, shared by all tables.
//!
//! The file is replaced atomically (write to a sibling temp file, then rename)
//! so a crash mid-write leaves the previous contents intact.

use crate::core::{KeyValueStore, PreferenceError, PreferenceResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// File-backed implementation of [`KeyValueStore`]
#[derive(Clone)]
pub struct FileKeyValueStore {
    path: Arc<PathBuf>,
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl FileKeyValueStore {
    /// Open (or create) the store at `path`
    ///
    /// A missing file starts empty. A file that is not a JSON object of
    /// strings is an error, so a corrupted cache is never silently
    /// overwritten.
    pub fn open(path: impl AsRef<Path>) -> PreferenceResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        tracing::debug!(path = %path.display(), entries = entries.len(), "opened file cache");

        Ok(Self {
            path: Arc::new(path),
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> PreferenceResult<()> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, self.path.as_ref())?;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> PreferenceResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| PreferenceError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PreferenceResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| PreferenceError::storage(format!("Failed to acquire write lock: {}", e)))?;

        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist(&entries) {
            // keep memory and disk in agreement
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }

        Ok(())
    }

    fn remove(&self, key: &str) -> PreferenceResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| PreferenceError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }

        Ok(())
    }
}
