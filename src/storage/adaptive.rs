//! Adaptive Cache Module
//!
//! Volatile in-process layer in front of the persistent store, implementing
//! read-through and write-through. Once a value has been observed in this
//! process it is served from memory until invalidated — no further
//! persistent reads and no TTL re-check at this layer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::storage::{Cache, CacheStats, PersistentStore};

// == Adaptive Cache ==
/// Two-tier cache: an unbounded in-process map over a [`PersistentStore`].
///
/// This is deliberately not an LRU: the map grows until `delete` or `clear`
/// invalidates entries. The in-process copy is trusted for the remainder of
/// the process lifetime, which amortizes repeated reads of hot keys while
/// the persistent tier shares state across restarts and workers.
#[derive(Debug)]
pub struct AdaptiveCache {
    /// In-process values, keyed as stored
    hot: Mutex<HashMap<String, Value>>,
    /// Durable backing tier
    store: Arc<PersistentStore>,
}

impl AdaptiveCache {
    // == Constructor ==
    /// Creates an adaptive cache over the given persistent store.
    pub fn new(store: Arc<PersistentStore>) -> Self {
        Self {
            hot: Mutex::new(HashMap::new()),
            store,
        }
    }

    /// The persistent tier backing this cache.
    pub fn persistent(&self) -> &Arc<PersistentStore> {
        &self.store
    }

    fn hot(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        // A poisoned lock only means another thread panicked mid-access;
        // the map itself is still a plain HashMap, so keep going.
        self.hot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Cache for AdaptiveCache {
    /// Returns the in-process copy when present, otherwise reads through to
    /// the persistent store and promotes real hits into memory.
    ///
    /// A persisted value equal to `default` is treated as a miss and never
    /// promoted, so it is re-fetched on every call — callers must not
    /// overload `default` with valid values.
    fn get(&self, key: &str, default: Value) -> Value {
        if let Some(value) = self.hot().get(key).cloned() {
            return value;
        }

        let value = self.store.get(key, default.clone());
        if value != default {
            self.hot().insert(key.to_string(), value.clone());
        }
        value
    }

    /// Updates the in-process map first, then writes through.
    ///
    /// The in-process copy is kept even when the persistent write fails, so
    /// the value stays readable for the rest of this process.
    fn set(&self, key: &str, value: Value, ttl_seconds: Option<i64>) -> bool {
        self.hot().insert(key.to_string(), value.clone());
        self.store.set(key, value, ttl_seconds)
    }

    fn has(&self, key: &str) -> bool {
        self.hot().contains_key(key) || self.store.has(key)
    }

    fn delete(&self, key: &str) -> bool {
        self.hot().remove(key);
        self.store.delete(key)
    }

    fn clear(&self) -> bool {
        self.hot().clear();
        self.store.clear()
    }

    /// Delegates to the persistent store; in-process hits are not counted
    /// separately.
    fn stats(&self) -> CacheStats {
        self.store.stats()
    }
}
