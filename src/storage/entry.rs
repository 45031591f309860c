//! Cache Entry Module
//!
//! Defines the persisted structure for individual cache entries with TTL
//! support.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// A single persisted cache entry.
///
/// Serialized to disk as `{"value": ..., "expiresAt": ...}`. A missing
/// `expiresAt` means the entry never expires; the public `set` operations
/// always stamp one, so such entries only appear in hand-written files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Absolute expiration timestamp (Unix seconds)
    pub expires_at: Option<i64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry expiring `ttl_seconds` from now.
    ///
    /// Zero and negative TTLs are accepted; the entry is then already
    /// expired when next read.
    pub fn new(value: Value, ttl_seconds: i64) -> Self {
        Self {
            value,
            expires_at: Some(current_timestamp() + ttl_seconds),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired when the current time is
    /// greater than or equal to the expiration time, so a TTL of zero is
    /// expired on the very next read.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp() >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns the current Unix timestamp in seconds.
pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs() as i64
}
