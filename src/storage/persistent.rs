//! Persistent Store Module
//!
//! Durable key-value storage with TTL: one file per hashed key, each
//! containing a serialized [`CacheEntry`]. Expiration is lazy — expired
//! entries are detected and removed at read time, never by the store
//! itself in the background.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::error::Result;
use crate::storage::{Cache, CacheEntry, CacheStats};

/// File suffix for committed entry files.
const ENTRY_SUFFIX: &str = ".json";

// == Persistent Store ==
/// File-backed key-value store with TTL and hit/miss accounting.
///
/// Writes are committed with a write-then-rename so a crash mid-write never
/// leaves a truncated entry behind. Storage errors on the write path are
/// logged and reported as `false`, never raised, so callers can treat a
/// broken backend as ordinary unavailability.
#[derive(Debug)]
pub struct PersistentStore {
    /// Directory holding the entry files
    dir: PathBuf,
    /// TTL in seconds applied when a set carries no explicit TTL
    default_ttl: i64,
    /// Number of successful retrievals
    hits: AtomicU64,
    /// Number of failed retrievals (absent, expired, or corrupt)
    misses: AtomicU64,
}

impl PersistentStore {
    // == Constructor ==
    /// Creates a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Arguments
    /// * `dir` - Directory to hold the entry files
    /// * `default_ttl` - TTL in seconds applied when a set carries no explicit TTL
    pub fn new(dir: impl Into<PathBuf>, default_ttl: i64) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            default_ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    /// Maps a key to its entry file path.
    ///
    /// Keys are hashed so arbitrary key bytes never reach the filesystem
    /// and the file name length stays constant.
    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{:x}{}", digest, ENTRY_SUFFIX))
    }

    /// Shared read path for `get` and `has`.
    ///
    /// Returns the live value, removing the entry file as a side effect when
    /// it turns out expired or unparseable. Does not touch the counters.
    fn lookup(&self, key: &str) -> Option<Value> {
        let path = self.entry_path(key);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(_) => return None,
        };

        let entry: CacheEntry = match serde_json::from_slice(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                // Corrupt entries are a miss, not a crash: drop the file so
                // the next write starts clean.
                warn!("Removing corrupt cache entry for key '{}': {}", key, err);
                let _ = fs::remove_file(&path);
                return None;
            }
        };

        if entry.is_expired() {
            let _ = fs::remove_file(&path);
            return None;
        }

        Some(entry.value)
    }

    // == Purge Expired ==
    /// Removes all expired (and unreadable) entry files.
    ///
    /// Returns the number of files removed. Correctness never depends on
    /// this: every read already enforces expiry lazily. The background
    /// sweep task calls this to reclaim disk.
    pub fn purge_expired(&self) -> usize {
        let iter = match fs::read_dir(&self.dir) {
            Ok(iter) => iter,
            Err(err) => {
                warn!("Sweep could not read cache directory: {}", err);
                return 0;
            }
        };

        let mut removed = 0;
        for dent in iter.filter_map(|e| e.ok()) {
            let path = dent.path();
            if !path.to_string_lossy().ends_with(ENTRY_SUFFIX) {
                continue;
            }

            let stale = match fs::read(&path).map(|raw| serde_json::from_slice::<CacheEntry>(&raw))
            {
                Ok(Ok(entry)) => entry.is_expired(),
                // Unreadable or unparseable files get reclaimed too
                _ => true,
            };

            if stale && fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }
        removed
    }

    // == Entry Count ==
    /// Returns the number of entry files currently on disk.
    ///
    /// Expired entries that have not yet been read (or swept) still count;
    /// they are removed lazily.
    pub fn entry_count(&self) -> usize {
        match fs::read_dir(&self.dir) {
            Ok(iter) => iter
                .filter_map(|e| e.ok())
                .filter(|e| e.file_name().to_string_lossy().ends_with(ENTRY_SUFFIX))
                .count(),
            Err(_) => 0,
        }
    }
}

impl Cache for PersistentStore {
    fn get(&self, key: &str, default: Value) -> Value {
        match self.lookup(key) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                value
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                default
            }
        }
    }

    fn set(&self, key: &str, value: Value, ttl_seconds: Option<i64>) -> bool {
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, ttl);

        let payload = match serde_json::to_vec(&entry) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("Could not serialize cache entry for key '{}': {}", key, err);
                return false;
            }
        };

        // Write to a sibling temp file and rename over the target so
        // readers never observe a partial entry.
        let path = self.entry_path(key);
        let tmp = path.with_extension("json.tmp");
        if let Err(err) = fs::write(&tmp, &payload) {
            warn!("Could not write cache entry for key '{}': {}", key, err);
            return false;
        }
        if let Err(err) = fs::rename(&tmp, &path) {
            warn!("Could not commit cache entry for key '{}': {}", key, err);
            let _ = fs::remove_file(&tmp);
            return false;
        }
        true
    }

    fn has(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    fn delete(&self, key: &str) -> bool {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => true,
            // Deleting an absent key is a success, not an error
            Err(err) if err.kind() == ErrorKind::NotFound => true,
            Err(err) => {
                warn!("Could not delete cache entry for key '{}': {}", key, err);
                false
            }
        }
    }

    fn clear(&self) -> bool {
        let iter = match fs::read_dir(&self.dir) {
            Ok(iter) => iter,
            Err(err) => {
                warn!("Could not read cache directory for clear: {}", err);
                return false;
            }
        };

        let mut ok = true;
        for dent in iter.filter_map(|e| e.ok()) {
            let path = dent.path();
            if path.to_string_lossy().ends_with(ENTRY_SUFFIX) {
                if let Err(err) = fs::remove_file(&path) {
                    warn!("Could not remove cache entry file {:?}: {}", path, err);
                    ok = false;
                }
            }
        }

        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        ok
    }

    fn stats(&self) -> CacheStats {
        CacheStats::new(
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            self.entry_count(),
        )
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;
    use tempfile::TempDir;

    fn create_test_store() -> (PersistentStore, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = PersistentStore::new(dir.path(), 300).unwrap();
        (store, dir)
    }

    #[test]
    fn test_set_and_get() {
        let (store, _dir) = create_test_store();

        assert!(store.set("key1", json!("value1"), None));
        assert_eq!(store.get("key1", Value::Null), json!("value1"));
    }

    #[test]
    fn test_get_missing_returns_default() {
        let (store, _dir) = create_test_store();

        assert_eq!(store.get("nope", json!("fallback")), json!("fallback"));
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_overwrite() {
        let (store, _dir) = create_test_store();

        assert!(store.set("key1", json!("value1"), None));
        assert!(store.set("key1", json!("value2"), None));

        assert_eq!(store.get("key1", Value::Null), json!("value2"));
        assert_eq!(store.entry_count(), 1);
    }

    #[test]
    fn test_zero_ttl_expires_on_next_read() {
        let (store, _dir) = create_test_store();

        assert!(store.set("key1", json!("value1"), Some(0)));
        assert_eq!(store.get("key1", Value::Null), Value::Null);
        // The expired file was physically removed during the lookup
        assert_eq!(store.entry_count(), 0);
    }

    #[test]
    fn test_negative_ttl_accepted_and_expired() {
        let (store, _dir) = create_test_store();

        assert!(store.set("key1", json!("value1"), Some(-5)));
        assert_eq!(store.get("key1", Value::Null), Value::Null);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_ttl_expiration() {
        let (store, _dir) = create_test_store();

        assert!(store.set("key1", json!("value1"), Some(1)));
        assert_eq!(store.get("key1", Value::Null), json!("value1"));

        sleep(Duration::from_millis(1100));

        assert_eq!(store.get("key1", Value::Null), Value::Null);
        assert!(!store.has("key1"));
    }

    #[test]
    fn test_has_applies_expiry_semantics() {
        let (store, _dir) = create_test_store();

        assert!(store.set("live", json!(1), Some(60)));
        assert!(store.set("dead", json!(2), Some(0)));

        assert!(store.has("live"));
        assert!(!store.has("dead"));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (store, _dir) = create_test_store();

        assert!(store.set("key1", json!("value1"), None));
        assert!(store.delete("key1"));
        // Deleting again (key absent) still reports success
        assert!(store.delete("key1"));
        assert!(!store.has("key1"));
    }

    #[test]
    fn test_clear_removes_entries_and_resets_counters() {
        let (store, _dir) = create_test_store();

        store.set("key1", json!(1), None);
        store.set("key2", json!(2), None);
        store.get("key1", Value::Null); // hit
        store.get("nope", Value::Null); // miss

        assert!(store.clear());

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.entries, 0);
        assert!(!store.has("key1"));
        assert!(!store.has("key2"));
    }

    #[test]
    fn test_stats_accounting() {
        let (store, _dir) = create_test_store();

        store.set("key1", json!("value1"), None);
        store.get("key1", Value::Null); // hit
        store.get("missing", Value::Null); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_corrupt_entry_treated_as_miss_and_removed() {
        let (store, _dir) = create_test_store();

        store.set("key1", json!("value1"), None);
        fs::write(store.entry_path("key1"), b"not json at all").unwrap();

        assert_eq!(store.get("key1", json!("fallback")), json!("fallback"));
        assert_eq!(store.stats().misses, 1);
        assert_eq!(store.entry_count(), 0);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = PersistentStore::new(dir.path(), 300).unwrap();
            assert!(store.set("key1", json!({"n": 7}), Some(120)));
        }

        let reopened = PersistentStore::new(dir.path(), 300).unwrap();
        assert_eq!(reopened.get("key1", Value::Null), json!({"n": 7}));
    }

    #[test]
    fn test_set_fails_when_directory_is_gone() {
        let dir = tempfile::tempdir().unwrap();
        let store = PersistentStore::new(dir.path().join("store"), 300).unwrap();

        fs::remove_dir_all(dir.path().join("store")).unwrap();

        assert!(!store.set("key1", json!("value1"), None));
    }

    #[test]
    fn test_purge_expired() {
        let (store, _dir) = create_test_store();

        store.set("dead", json!(1), Some(0));
        store.set("live", json!(2), Some(100));

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.entry_count(), 1);
        assert_eq!(store.get("live", Value::Null), json!(2));
    }

    #[test]
    fn test_purge_reclaims_unreadable_files() {
        let (store, _dir) = create_test_store();

        fs::write(store.entry_path("junk"), b"garbage").unwrap();

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.entry_count(), 0);
    }
}
