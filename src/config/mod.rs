//! Configuration loading and management

use crate::core::{KeyValueStore, SortConfig};
use crate::storage::{FileKeyValueStore, InMemoryKeyValueStore};
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Remote tier connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST backend (e.g. "http://localhost:3000")
    pub base_url: String,

    /// Optional request timeout in milliseconds; no timeout when absent
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// HTTP client for the configured backend
    #[cfg(feature = "http")]
    pub fn client(&self) -> crate::core::PreferenceResult<crate::storage::HttpPreferences> {
        match self.timeout() {
            Some(timeout) => crate::storage::HttpPreferences::with_timeout(&self.base_url, timeout),
            None => crate::storage::HttpPreferences::new(&self.base_url),
        }
    }
}

/// Which local tier to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Memory,
    File,
    Lmdb,
}

/// Local tier settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    /// File path (file backend) or directory (lmdb backend)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl CacheConfig {
    /// Open the configured local tier
    pub fn open(&self) -> Result<Arc<dyn KeyValueStore>> {
        match self.backend {
            CacheBackend::Memory => Ok(Arc::new(InMemoryKeyValueStore::new())),
            CacheBackend::File => {
                let path = self
                    .path
                    .as_ref()
                    .ok_or_else(|| anyhow!("cache.path is required for the file backend"))?;
                Ok(Arc::new(FileKeyValueStore::open(path)?))
            }
            #[cfg(feature = "lmdb")]
            CacheBackend::Lmdb => {
                let path = self
                    .path
                    .as_ref()
                    .ok_or_else(|| anyhow!("cache.path is required for the lmdb backend"))?;
                Ok(Arc::new(crate::storage::LmdbKeyValueStore::open(path)?))
            }
            #[cfg(not(feature = "lmdb"))]
            CacheBackend::Lmdb => Err(anyhow!(
                "the lmdb cache backend requires the `lmdb` feature"
            )),
        }
    }
}

/// Preference server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind (e.g. "127.0.0.1:3000")
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Complete configuration for sort preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortPreferencesConfig {
    /// Remote tier; without it the remote tier must be supplied in code
    #[serde(default)]
    pub api: Option<ApiConfig>,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub server: ServerConfig,

    /// Per-table default sort (table name -> config)
    #[serde(default)]
    pub defaults: BTreeMap<String, SortConfig>,
}

impl SortPreferencesConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject defaults that could never be persisted
    pub fn validate(&self) -> Result<()> {
        for (table, default) in &self.defaults {
            crate::core::sort::validate_table_name(table)?;
            SortConfig::new(default.field.clone(), default.direction)
                .map_err(|e| anyhow!("default for table '{}': {}", table, e))?;
        }
        Ok(())
    }

    /// Configured default for `table_name`
    pub fn default_for(&self, table_name: &str) -> Option<SortConfig> {
        self.defaults.get(table_name).cloned()
    }

    /// Merge several configurations
    ///
    /// Later configurations win: `api`, `cache` and `server` are taken from
    /// the last config that sets them, table defaults are overridden per
    /// table.
    pub fn merge(configs: Vec<SortPreferencesConfig>) -> Self {
        configs
            .into_iter()
            .fold(Self::default(), |mut merged, config| {
                if config.api.is_some() {
                    merged.api = config.api;
                }
                if config.cache.path.is_some() || config.cache.backend != CacheBackend::Memory {
                    merged.cache = config.cache;
                }
                if config.server.bind != default_bind() {
                    merged.server = config.server;
                }
                merged.defaults.extend(config.defaults);
                merged
            })
    }
}
