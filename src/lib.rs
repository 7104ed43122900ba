//! # sort-preferences
//!
//! Persistent, per-table sort preferences for data tables backed by a REST API.
//!
//! ## Features
//!
//! - **Locale-aware ordering**: Ukrainian collation with numeric ordering
//!   (`item2` before `item10`), numbers and timestamps compared natively
//! - **Dotted field paths**: sort on nested values (`client.name`); missing
//!   data always sorts last
//! - **Dual-tier persistence**: a synchronous local cache for instant
//!   bootstrap plus a remote tier reconciled in the background
//! - **Optimistic writes**: toggles apply locally at once and reach the
//!   remote tier in issue order, coalesced
//! - **Scoped background work**: dropping a controller cancels its tasks
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sort_preferences::prelude::*;
//!
//! let local = InMemoryKeyValueStore::new();
//! let remote = HttpPreferences::new("http://localhost:3000")?;
//!
//! let companies = SortingController::builder("companies", local, remote)
//!     .default_config(SortConfig::asc("name")?)
//!     .build()?;
//!
//! companies.toggle("client.name");     // asc
//! companies.toggle("client.name");     // desc
//! let rows = companies.sorted_json(&payload);
//! ```

pub mod config;
pub mod core;
#[cfg(feature = "server")]
pub mod server;
pub mod sorting;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Types ===
    pub use crate::core::{
        FieldSource, FieldValue, KeyValueStore, PreferenceError, PreferenceResult,
        RemotePreferences, SortConfig, SortDirection, StoredPreference, compare_by,
    };

    // === Sorting ===
    pub use crate::sorting::{
        PreferenceStore, SortingController, SortingState, SyncState, sort_records,
    };

    // === Storage ===
    #[cfg(feature = "http")]
    pub use crate::storage::HttpPreferences;
    #[cfg(feature = "lmdb")]
    pub use crate::storage::LmdbKeyValueStore;
    pub use crate::storage::{
        FileKeyValueStore, InMemoryKeyValueStore, InMemoryRemotePreferences, KeyValuePreferences,
    };

    // === Config ===
    pub use crate::config::SortPreferencesConfig;

    // === Server ===
    #[cfg(feature = "server")]
    pub use crate::server::{PreferenceState, preference_routes};

    // === External dependencies ===
    pub use async_trait::async_trait;
}
