//! Storage implementations for the local and remote preference tiers

pub mod file;
#[cfg(feature = "http")]
pub mod http;
pub mod in_memory;
pub mod kv_remote;
#[cfg(feature = "lmdb")]
pub mod lmdb;

pub use file::FileKeyValueStore;
#[cfg(feature = "http")]
pub use http::HttpPreferences;
pub use in_memory::{InMemoryKeyValueStore, InMemoryRemotePreferences};
pub use kv_remote::KeyValuePreferences;
#[cfg(feature = "lmdb")]
pub use lmdb::LmdbKeyValueStore;
