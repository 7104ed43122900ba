//! Local key-value tier

use crate::core::error::PreferenceResult;

/// Synchronous string key-value storage used as the local preference cache
///
/// This is the capability a browser's local storage provides: fast, local,
/// shared across every table. Keys are namespaced by the caller (see
/// [`cache_key`](crate::core::sort::cache_key)), so tables never collide.
///
/// Writes must be visible to the next `get` on the same store as soon as
/// `set` returns.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> PreferenceResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> PreferenceResult<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> PreferenceResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> PreferenceResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> PreferenceResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> PreferenceResult<()> {
        (**self).remove(key)
    }
}
