//! Shared test harness for local tier backends
//!
//! The `key_value_store_tests!` macro generates a test module that validates
//! any `KeyValueStore` implementation against the contract the preference
//! store relies on.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod kv_harness;
//!
//! use sort_preferences::storage::InMemoryKeyValueStore;
//!
//! key_value_store_tests!(InMemoryKeyValueStore::new());
//! ```
//!
//! # Generated Tests
//!
//! - `test_get_missing` — unknown key reads as `None`
//! - `test_set_then_get` — a write is visible to the next read
//! - `test_overwrite` — last write wins
//! - `test_remove` — removed key reads as `None`, removing twice is fine
//! - `test_unicode_values` — Cyrillic field paths survive storage
//! - `test_tables_are_isolated` — two tables never see each other's entries
//! - `test_preference_store_round_trip` — written config is readable back
//! - `test_concurrent_writes` — parallel writers from blocking tasks

/// Generate a `KeyValueStore` conformance test suite.
///
/// `$factory` must evaluate to a fresh store implementing
/// `KeyValueStore + Clone + 'static`. It is re-evaluated for each test.
#[macro_export]
macro_rules! key_value_store_tests {
    ($factory:expr) => {
        mod key_value_store_contract_tests {
            use super::*;
            use sort_preferences::core::sort::cache_key;
            use sort_preferences::core::{KeyValueStore, SortConfig};
            use sort_preferences::sorting::PreferenceStore;

            #[test]
            fn test_get_missing() {
                let store = $factory;
                assert_eq!(store.get("sort-preferences-missing").unwrap(), None);
            }

            #[test]
            fn test_set_then_get() {
                let store = $factory;
                store.set("sort-preferences-orders", "value").unwrap();
                assert_eq!(
                    store.get("sort-preferences-orders").unwrap().as_deref(),
                    Some("value")
                );
            }

            #[test]
            fn test_overwrite() {
                let store = $factory;
                store.set("k", "first").unwrap();
                store.set("k", "second").unwrap();
                assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
            }

            #[test]
            fn test_remove() {
                let store = $factory;
                store.set("k", "v").unwrap();
                store.remove("k").unwrap();
                assert_eq!(store.get("k").unwrap(), None);
                store.remove("k").unwrap();
            }

            #[test]
            fn test_unicode_values() {
                let store = $factory;
                let value = r#"{"sortField":"клієнт.назва","sortDirection":"asc"}"#;
                store.set(&cache_key("замовлення"), value).unwrap();
                assert_eq!(
                    store.get(&cache_key("замовлення")).unwrap().as_deref(),
                    Some(value)
                );
            }

            #[test]
            fn test_tables_are_isolated() {
                let store = $factory;
                store.set(&cache_key("orders"), "a").unwrap();
                store.set(&cache_key("orders-archive"), "b").unwrap();
                assert_eq!(store.get(&cache_key("orders")).unwrap().as_deref(), Some("a"));
                assert_eq!(
                    store.get(&cache_key("orders-archive")).unwrap().as_deref(),
                    Some("b")
                );
            }

            #[test]
            fn test_preference_store_round_trip() {
                let preferences = PreferenceStore::new("repairs", $factory);
                let config = SortConfig::desc("status.changed_at").unwrap();

                preferences.write_local(&config).unwrap();
                assert_eq!(preferences.read_local(), Some(config.clone()));
                assert_eq!(preferences.resolve_initial(None), config);
            }

            #[tokio::test]
            async fn test_concurrent_writes() {
                let store = $factory;
                let mut handles = Vec::new();
                for i in 0..8 {
                    let store = store.clone();
                    handles.push(tokio::task::spawn_blocking(move || {
                        store.set(&cache_key(&format!("table-{}", i)), "v").unwrap();
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }
                for i in 0..8 {
                    assert!(store.get(&cache_key(&format!("table-{}", i))).unwrap().is_some());
                }
            }
        }
    };
}
