//! Remote tier repository layered over a key-value store
//!
//! Lets the preference server keep its preferences in any local tier
//! backend (file, LMDB) so they survive restarts.

use crate::core::sort::cache_key;
use crate::core::{KeyValueStore, PreferenceResult, RemotePreferences, SortConfig, StoredPreference};
use async_trait::async_trait;

/// [`RemotePreferences`] stored in a [`KeyValueStore`]
///
/// Entries use the same key and value format as the client-side cache.
/// The store calls are synchronous and short, so they run inline.
pub struct KeyValuePreferences<K> {
    store: K,
}

impl<K: KeyValueStore> KeyValuePreferences<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<K: KeyValueStore> RemotePreferences for KeyValuePreferences<K> {
    async fn fetch(&self, table_name: &str) -> PreferenceResult<Option<SortConfig>> {
        match self.store.get(&cache_key(table_name))? {
            Some(raw) => Ok(Some(StoredPreference::parse(&raw)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, table_name: &str, config: &SortConfig) -> PreferenceResult<()> {
        let raw = StoredPreference::encode(config)?;
        self.store.set(&cache_key(table_name), &raw)
    }
}
