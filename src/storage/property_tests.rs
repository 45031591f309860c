//! Property-Based Tests for the Storage Module
//!
//! Uses proptest to verify correctness properties of the persistent store
//! and the two-tier cache.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::storage::{AdaptiveCache, Cache, PersistentStore};

// == Test Configuration ==
const TEST_DEFAULT_TTL: i64 = 300;

// == Strategies ==
/// Generates valid cache keys (non-empty, within length limit)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}"
}

/// Generates cache values (JSON strings, never null so they can't collide
/// with the null default used by the tests)
fn valid_value_strategy() -> impl Strategy<Value = Value> {
    "[a-zA-Z0-9 ]{1,128}".prop_map(Value::String)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Value },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

fn create_test_store() -> (PersistentStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = PersistentStore::new(dir.path(), TEST_DEFAULT_TTL).unwrap();
    (store, dir)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // For any sequence of cache operations, the hit/miss counters track
    // exactly the get outcomes a model map predicts, and the entry count
    // matches the surviving keys.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..40)) {
        let (store, _dir) = create_test_store();
        let mut model: HashMap<String, Value> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    prop_assert!(store.set(&key, value.clone(), None));
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let result = store.get(&key, Value::Null);
                    match model.get(&key) {
                        Some(expected) => {
                            prop_assert_eq!(&result, expected, "Hit returned wrong value");
                            expected_hits += 1;
                        }
                        None => {
                            prop_assert_eq!(&result, &Value::Null, "Miss must return default");
                            expected_misses += 1;
                        }
                    }
                }
                CacheOp::Delete { key } => {
                    prop_assert!(store.delete(&key));
                    model.remove(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.entries, model.len(), "Entry count mismatch");
    }

    // For any valid key-value pair, storing the pair and then retrieving it
    // (before expiration) returns the exact same value that was stored.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let (store, _dir) = create_test_store();

        prop_assert!(store.set(&key, value.clone(), None));

        let retrieved = store.get(&key, Value::Null);
        prop_assert_eq!(retrieved, value, "Round-trip value mismatch");
    }

    // For any key that exists in the store, after a delete a subsequent
    // get returns the caller's default.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let (store, _dir) = create_test_store();

        prop_assert!(store.set(&key, value, None));
        prop_assert!(store.has(&key), "Key should exist before delete");

        prop_assert!(store.delete(&key));

        prop_assert!(!store.has(&key), "Key should not exist after delete");
        prop_assert_eq!(store.get(&key, Value::Null), Value::Null);
    }

    // For any key, storing V1 and then V2 results in a get returning V2,
    // with a single surviving entry.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let (store, _dir) = create_test_store();

        prop_assert!(store.set(&key, value1, None));
        prop_assert!(store.set(&key, value2.clone(), None));

        let retrieved = store.get(&key, Value::Null);
        prop_assert_eq!(retrieved, value2, "Overwrite should return new value");
        prop_assert_eq!(store.entry_count(), 1, "Should have exactly one entry after overwrite");
    }

    // For any value written through the adaptive cache, a fresh store over
    // the same directory observes it: the write-through is durable.
    #[test]
    fn prop_write_through_durability(key in valid_key_strategy(), value in valid_value_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(PersistentStore::new(dir.path(), TEST_DEFAULT_TTL).unwrap());
        let cache = AdaptiveCache::new(store);

        prop_assert!(cache.set(&key, value.clone(), None));

        let reopened = PersistentStore::new(dir.path(), TEST_DEFAULT_TTL).unwrap();
        prop_assert_eq!(reopened.get(&key, Value::Null), value);
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // For any entry stored with a short TTL, a get after the TTL has
    // elapsed returns the caller's default and removes the file.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in valid_key_strategy(),
        value in valid_value_strategy()
    ) {
        use std::thread::sleep;
        use std::time::Duration;

        let (store, _dir) = create_test_store();

        prop_assert!(store.set(&key, value.clone(), Some(1)));

        // Entry visible before expiration
        prop_assert_eq!(store.get(&key, Value::Null), value, "Value should match before expiration");

        sleep(Duration::from_millis(1100));

        prop_assert_eq!(store.get(&key, Value::Null), Value::Null, "Entry should be gone after TTL");
        prop_assert_eq!(store.entry_count(), 0, "Expired file should be removed on read");
    }
}

// == Additional Unit Tests for Edge Cases ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_object_values_roundtrip() {
        let (store, _dir) = create_test_store();

        let value = json!({"list": [1, 2, 3], "nested": {"flag": true}});
        assert!(store.set("obj", value.clone(), None));
        assert_eq!(store.get("obj", Value::Null), value);
    }

    #[test]
    fn test_keys_with_path_characters_are_safe() {
        let (store, _dir) = create_test_store();

        // Hashing keeps hostile key bytes away from the filesystem
        let key = "../../etc/passwd";
        assert!(store.set(key, json!("value"), None));
        assert_eq!(store.get(key, Value::Null), json!("value"));
        assert_eq!(store.entry_count(), 1);
    }

    #[test]
    fn test_distinct_keys_do_not_collide() {
        let (store, _dir) = create_test_store();

        assert!(store.set("a", json!(1), None));
        assert!(store.set("b", json!(2), None));

        assert_eq!(store.get("a", Value::Null), json!(1));
        assert_eq!(store.get("b", Value::Null), json!(2));
        assert_eq!(store.entry_count(), 2);
    }
}
