//! LMDB local tier using heed (memory-mapped B-tree).
//!
//! LMDB is an embedded key-value store, no external server required. Its
//! operations are synchronous memory-mapped I/O, which matches the
//! synchronous contract of [`KeyValueStore`]: a `set` is committed before it
//! returns.
//!
//! # Databases (named LMDB sub-databases)
//!
//! - `sort_preferences` — cache key → serialized `StoredPreference`
//!
//! # Feature flag
//!
//! Enable with `--features lmdb`. Requires the `heed` crate.

use crate::core::{KeyValueStore, PreferenceError, PreferenceResult};
use heed::types::Str;
use heed::{Database, Env, EnvOpenOptions};
use std::path::Path;
use std::sync::Arc;

const DATABASE_NAME: &str = "sort_preferences";

fn lmdb_error(e: heed::Error) -> PreferenceError {
    PreferenceError::storage(format!("lmdb: {}", e))
}

/// LMDB-backed implementation of [`KeyValueStore`]
///
/// The `Env` is wrapped in an `Arc` for cheap cloning; clones share one
/// environment.
///
/// # Example
///
/// ```rust,ignore
/// use sort_preferences::storage::LmdbKeyValueStore;
///
/// let local = LmdbKeyValueStore::open("/var/lib/erp/sort-cache")?;
/// ```
#[derive(Clone)]
pub struct LmdbKeyValueStore {
    env: Arc<Env>,
    db: Database<Str, Str>,
}

impl LmdbKeyValueStore {
    /// Open (or create) an LMDB environment at `path`
    ///
    /// Preferences are tiny; 16 MB of address space is far more than enough.
    pub fn open(path: impl AsRef<Path>) -> PreferenceResult<Self> {
        std::fs::create_dir_all(path.as_ref())?;

        // SAFETY: the environment is opened once per store and never mapped
        // twice from this process for the same path.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(16 * 1024 * 1024)
                .max_dbs(1)
                .open(path.as_ref())
                .map_err(lmdb_error)?
        };

        let mut wtxn = env.write_txn().map_err(lmdb_error)?;
        let db: Database<Str, Str> = env
            .create_database(&mut wtxn, Some(DATABASE_NAME))
            .map_err(lmdb_error)?;
        wtxn.commit().map_err(lmdb_error)?;

        Ok(Self {
            env: Arc::new(env),
            db,
        })
    }
}

impl KeyValueStore for LmdbKeyValueStore {
    fn get(&self, key: &str) -> PreferenceResult<Option<String>> {
        let rtxn = self.env.read_txn().map_err(lmdb_error)?;
        let value = self.db.get(&rtxn, key).map_err(lmdb_error)?;
        Ok(value.map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> PreferenceResult<()> {
        let mut wtxn = self.env.write_txn().map_err(lmdb_error)?;
        self.db.put(&mut wtxn, key, value).map_err(lmdb_error)?;
        wtxn.commit().map_err(lmdb_error)
    }

    fn remove(&self, key: &str) -> PreferenceResult<()> {
        let mut wtxn = self.env.write_txn().map_err(lmdb_error)?;
        self.db.delete(&mut wtxn, key).map_err(lmdb_error)?;
        wtxn.commit().map_err(lmdb_error)
    }
}
