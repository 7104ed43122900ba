//! In-memory implementations of both preference tiers for testing and development

use crate::core::{KeyValueStore, PreferenceError, PreferenceResult, RemotePreferences, SortConfig};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory local tier
///
/// Clones share the same map, the way every table in one browser shares the
/// same local storage. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
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

        entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> PreferenceResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| PreferenceError::storage(format!("Failed to acquire write lock: {}", e)))?;

        entries.remove(key);

        Ok(())
    }
}

/// In-memory remote tier
///
/// Backs the development preference server and stands in for the REST
/// backend in tests.
#[derive(Clone, Default)]
pub struct InMemoryRemotePreferences {
    preferences: Arc<RwLock<HashMap<String, SortConfig>>>,
}

impl InMemoryRemotePreferences {
    /// Create an empty remote store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `(table, config)` pairs
    pub fn with_preferences<I>(preferences: I) -> Self
    where
        I: IntoIterator<Item = (String, SortConfig)>,
    {
        Self {
            preferences: Arc::new(RwLock::new(preferences.into_iter().collect())),
        }
    }
}

#[async_trait]
impl RemotePreferences for InMemoryRemotePreferences {
    async fn fetch(&self, table_name: &str) -> PreferenceResult<Option<SortConfig>> {
        let preferences = self
            .preferences
            .read()
            .map_err(|e| PreferenceError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(preferences.get(table_name).cloned())
    }

    async fn save(&self, table_name: &str, config: &SortConfig) -> PreferenceResult<()> {
        let mut preferences = self
            .preferences
            .write()
            .map_err(|e| PreferenceError::storage(format!("Failed to acquire write lock: {}", e)))?;

        preferences.insert(table_name.to_string(), config.clone());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let store = InMemoryKeyValueStore::new();
        store.set("sort-preferences-orders", "{}").unwrap();

        assert_eq!(
            store.get("sort-preferences-orders").unwrap().as_deref(),
            Some("{}")
        );
        assert_eq!(store.get("sort-preferences-repairs").unwrap(), None);
    }

    #[test]
    fn test_clones_share_entries() {
        let store = InMemoryKeyValueStore::new();
        let other = store.clone();
        store.set("k", "v").unwrap();

        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
        other.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_remote_last_write_wins() {
        let remote = InMemoryRemotePreferences::new();
        remote
            .save("companies", &SortConfig::asc("name").unwrap())
            .await
            .unwrap();
        remote
            .save("companies", &SortConfig::desc("edrpou").unwrap())
            .await
            .unwrap();

        let stored = remote.fetch("companies").await.unwrap();
        assert_eq!(stored, Some(SortConfig::desc("edrpou").unwrap()));
    }

    #[tokio::test]
    async fn test_remote_missing_table_is_none() {
        let remote = InMemoryRemotePreferences::with_preferences([(
            "units".to_string(),
            SortConfig::asc("code").unwrap(),
        )]);

        assert!(remote.fetch("units").await.unwrap().is_some());
        assert!(remote.fetch("positions").await.unwrap().is_none());
    }
}
