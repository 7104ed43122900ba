//! Remote preference tier

use crate::core::error::PreferenceResult;
use crate::core::sort::SortConfig;
use async_trait::async_trait;
use std::sync::Arc;

/// Durable, cross-device storage of one sort preference per table
///
/// Last write wins; there is no versioning. Implementations are the HTTP
/// client talking to the REST backend, the in-memory store used in tests,
/// and whatever repository backs the preference server.
#[async_trait]
pub trait RemotePreferences: Send + Sync {
    /// Fetch the stored preference for `table_name`
    ///
    /// `Ok(None)` means nothing usable is stored.
    async fn fetch(&self, table_name: &str) -> PreferenceResult<Option<SortConfig>>;

    /// Create or overwrite the preference for `table_name`
    async fn save(&self, table_name: &str, config: &SortConfig) -> PreferenceResult<()>;
}

#[async_trait]
impl<R: RemotePreferences + ?Sized> RemotePreferences for Arc<R> {
    async fn fetch(&self, table_name: &str) -> PreferenceResult<Option<SortConfig>> {
        (**self).fetch(table_name).await
    }

    async fn save(&self, table_name: &str, config: &SortConfig) -> PreferenceResult<()> {
        (**self).save(table_name, config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    #[async_trait]
    impl RemotePreferences for Fixed {
        async fn fetch(&self, _table_name: &str) -> PreferenceResult<Option<SortConfig>> {
            Ok(Some(SortConfig::default()))
        }

        async fn save(&self, _table_name: &str, _config: &SortConfig) -> PreferenceResult<()> {
            Ok(())
        }
    }

    // Generic callers can hold the trait behind an Arc<dyn ..>
    async fn fetch_through<R: RemotePreferences>(remote: &R) -> Option<SortConfig> {
        remote.fetch("orders").await.ok().flatten()
    }

    #[tokio::test]
    async fn test_arc_dyn_forwards() {
        let remote: Arc<dyn RemotePreferences> = Arc::new(Fixed);
        assert_eq!(fetch_through(&remote).await, Some(SortConfig::default()));
    }
}
