//! Error codes, status mapping and recovery paths

use sort_preferences::core::PreferenceError;
use sort_preferences::prelude::*;
use std::sync::Arc;

/// Local tier that fails every operation
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> PreferenceResult<Option<String>> {
        Err(PreferenceError::storage("quota exceeded"))
    }

    fn set(&self, _key: &str, _value: &str) -> PreferenceResult<()> {
        Err(PreferenceError::storage("quota exceeded"))
    }

    fn remove(&self, _key: &str) -> PreferenceResult<()> {
        Err(PreferenceError::storage("quota exceeded"))
    }
}

#[test]
fn test_error_codes() {
    let cases = vec![
        (PreferenceError::InvalidConfig("x".into()), "INVALID_SORT_CONFIG", 400),
        (PreferenceError::InvalidTableName("x y".into()), "INVALID_TABLE_NAME", 400),
        (PreferenceError::storage("disk full"), "STORAGE_ERROR", 500),
        (
            PreferenceError::Status {
                status: 503,
                message: String::new(),
            },
            "REMOTE_STATUS_ERROR",
            502,
        ),
        (PreferenceError::Cancelled, "CANCELLED", 503),
        (PreferenceError::NoRuntime("none".into()), "NO_RUNTIME", 500),
    ];

    for (err, code, status) in cases {
        assert_eq!(err.error_code(), code);
        assert_eq!(err.status_code(), status);
        assert_eq!(err.to_response().code, code);
    }
}

#[test]
fn test_io_error_converts() {
    let err: PreferenceError = std::io::Error::other("boom").into();
    assert_eq!(err.error_code(), "IO_ERROR");
}

#[test]
fn test_invalid_config_constructors() {
    assert!(matches!(SortConfig::asc(""), Err(PreferenceError::InvalidConfig(_))));
    assert!(matches!(SortConfig::desc("   "), Err(PreferenceError::InvalidConfig(_))));
    assert!(matches!(
        StoredPreference::parse(r#"{"sortField":"name","sortDirection":"sideways"}"#),
        Err(PreferenceError::Serialization(_))
    ));
}

#[tokio::test]
async fn test_broken_local_tier_is_recovered() {
    let remote = InMemoryRemotePreferences::new();
    let controller = SortingController::builder("orders", Arc::new(BrokenStore), remote.clone())
        .default_config(SortConfig::asc("number").unwrap())
        .build()
        .unwrap();

    assert_eq!(controller.current_config(), SortConfig::asc("number").unwrap());

    controller.toggle("number");
    assert_eq!(controller.current_config(), SortConfig::desc("number").unwrap());

    controller.flush().await.unwrap();
    assert_eq!(
        remote.fetch("orders").await.unwrap(),
        Some(SortConfig::desc("number").unwrap())
    );
}

#[test]
fn test_preference_store_surfaces_write_error() {
    let store = PreferenceStore::new("orders", BrokenStore);
    assert_eq!(store.read_local(), None);
    assert!(matches!(
        store.write_local(&SortConfig::default()),
        Err(PreferenceError::Storage(_))
    ));
}
