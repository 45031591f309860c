//! Storage Module
//!
//! Two-tier key-value storage: a durable file-backed store and a volatile
//! in-process layer in front of it.

mod adaptive;
mod entry;
mod persistent;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use adaptive::AdaptiveCache;
pub use entry::{current_timestamp, CacheEntry};
pub use persistent::PersistentStore;
pub use stats::CacheStats;

use serde_json::Value;

// == Public Constants ==
/// Maximum allowed key length in bytes (enforced at the request layer)
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed serialized value size in bytes (enforced at the request layer)
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Cache Contract ==
/// Common contract for the key-value tiers.
///
/// Absence and expiry are not errors: `get` returns the caller-supplied
/// default for both, and the write operations report storage failure as a
/// plain `false` so callers can treat a broken backend as ordinary
/// unavailability. The circuit breaker is generic over this trait and works
/// against either tier.
pub trait Cache: Send + Sync {
    /// Returns the stored value, or `default` if the key is absent or expired.
    ///
    /// A stored value that happens to equal `default` is indistinguishable
    /// from a miss; callers must not overload `default` with valid values.
    fn get(&self, key: &str, default: Value) -> Value;

    /// Stores a value, overwriting any previous entry.
    ///
    /// `ttl_seconds` of `None` applies the store's default TTL; zero or
    /// negative TTLs are accepted and yield an entry that is expired on the
    /// next read. Returns `false` only on storage I/O failure.
    fn set(&self, key: &str, value: Value, ttl_seconds: Option<i64>) -> bool;

    /// True if the key is present and unexpired, with the same expiry
    /// semantics as `get`.
    fn has(&self, key: &str) -> bool;

    /// Removes a key. Idempotent: returns `true` whether or not the key
    /// existed, `false` only on storage I/O failure.
    fn delete(&self, key: &str) -> bool;

    /// Removes all entries and resets the hit/miss counters.
    fn clear(&self) -> bool;

    /// Returns a snapshot of the hit/miss counters and entry count.
    fn stats(&self) -> CacheStats;
}
