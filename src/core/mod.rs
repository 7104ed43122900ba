//! Core module containing fundamental traits and types for sort preferences

pub mod compare;
pub mod error;
pub mod field;
pub mod service;
pub mod sort;
pub mod store;

pub use compare::{
    collate, compare_by, compare_field, compare_keys, compare_signed, compare_values,
};
pub use error::{ErrorResponse, PreferenceError, PreferenceResult};
pub use field::{FieldSource, FieldValue};
pub use service::RemotePreferences;
pub use sort::{SavePreferenceRequest, SortConfig, SortDirection, StoredPreference, cache_key};
pub use store::KeyValueStore;
