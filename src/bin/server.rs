//! Development backend for the sort preference endpoints
//!
//! ```sh
//! sort-preferences-server [config.yaml]
//! RUST_LOG=debug sort-preferences-server
//! ```
//!
//! Preferences are kept in the configured cache backend (`memory` by
//! default, `file` or `lmdb` to survive restarts).

use anyhow::Result;
use sort_preferences::config::SortPreferencesConfig;
use sort_preferences::server;
use sort_preferences::storage::KeyValuePreferences;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SortPreferencesConfig::from_yaml_file(&path)?,
        None => SortPreferencesConfig::default(),
    };

    tracing::info!(backend = ?config.cache.backend, "opening preference storage");
    let store = config.cache.open()?;
    let preferences = Arc::new(KeyValuePreferences::new(store));

    server::serve(preferences, &config.server.bind).await
}
