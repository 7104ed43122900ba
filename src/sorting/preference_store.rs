//! Dual-tier preference store
//!
//! The local tier is read once to bootstrap the active configuration and is
//! written through on every change. The remote tier is reconciled
//! asynchronously by the controller; once a usable remote value is known it is
//! copied into the local tier so both agree.

use crate::core::sort::cache_key;
use crate::core::{KeyValueStore, PreferenceResult, SortConfig, StoredPreference};
use serde::{Deserialize, Serialize};

/// Coarse lifecycle of one table's preference
///
/// `Uninitialized → LocalResolved → RemoteReconciled`. The last transition
/// happens at most once, when the remote fetch returns a usable value. Later
/// toggles do not change the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    #[default]
    Uninitialized,
    LocalResolved,
    RemoteReconciled,
}

/// Local side of a table's sort preference
pub struct PreferenceStore<K> {
    table_name: String,
    key: String,
    local: K,
}

impl<K: KeyValueStore> PreferenceStore<K> {
    pub fn new(table_name: impl Into<String>, local: K) -> Self {
        let table_name = table_name.into();
        let key = cache_key(&table_name);
        Self {
            table_name,
            key,
            local,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Key of this table's local cache entry
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The cached preference, if present and well-formed
    pub fn read_local(&self) -> Option<SortConfig> {
        let raw = match self.local.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!(table = %self.table_name, "local cache unreadable: {}", e);
                return None;
            }
        };

        match StoredPreference::parse(&raw) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::debug!(table = %self.table_name, "ignoring malformed cache entry: {}", e);
                None
            }
        }
    }

    /// Initial configuration: local cache, then `default`, then `id` ascending
    pub fn resolve_initial(&self, default: Option<&SortConfig>) -> SortConfig {
        self.read_local()
            .or_else(|| default.cloned())
            .unwrap_or_default()
    }

    /// Write `config` to the local tier
    pub fn write_local(&self, config: &SortConfig) -> PreferenceResult<()> {
        let result = StoredPreference::encode(config).and_then(|raw| self.local.set(&self.key, &raw));
        if let Err(e) = &result {
            tracing::warn!(table = %self.table_name, "failed to cache sort preference: {}", e);
        }
        result
    }

    /// Adopt a value fetched from the remote tier
    ///
    /// Returns the value to activate, after writing it through to the local
    /// tier. `None` leaves everything untouched.
    pub fn reconcile(&self, remote: Option<SortConfig>) -> Option<SortConfig> {
        let config = remote?;
        // a failed local write is already logged; the remote value still wins
        let _ = self.write_local(&config);
        Some(config)
    }
}
