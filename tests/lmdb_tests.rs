//! Local tier contract tests for `LmdbKeyValueStore`.
//!
//! # Running
//!
//! ```sh
//! cargo test --features lmdb --test lmdb_tests
//! ```
//!
//! Each test gets a fresh temporary directory via `tempfile::TempDir`, so
//! every LMDB environment is isolated.

#![cfg(feature = "lmdb")]

#[macro_use]
mod kv_harness;

use sort_preferences::storage::LmdbKeyValueStore;
use tempfile::TempDir;

fn fresh_lmdb_store() -> LmdbKeyValueStore {
    let dir = TempDir::new().expect("Failed to create temp dir");
    // Leak the TempDir so it lives for the duration of the test
    let path = dir.path().to_path_buf();
    std::mem::forget(dir);
    LmdbKeyValueStore::open(&path).expect("Failed to open LMDB store")
}

key_value_store_tests!(fresh_lmdb_store());
