//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::breaker::CircuitStatus;
use crate::storage::CacheStats;

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: Value,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for the clear operation (POST /clear)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
}

impl ClearResponse {
    /// Creates a new ClearResponse
    pub fn new() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

impl Default for ClearResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Current number of stored entries
    pub entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            entries: stats.entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for one circuit's status (GET /circuits/:name)
#[derive(Debug, Clone, Serialize)]
pub struct CircuitStatusResponse {
    /// Resource name
    pub service: String,
    /// Derived state: CLOSED, OPEN, or HALF_OPEN
    pub state: String,
    /// Recorded consecutive failures
    pub failures: u64,
    /// Unix timestamp of the most recent failure, if any
    pub last_failure: Option<i64>,
}

impl From<CircuitStatus> for CircuitStatusResponse {
    fn from(status: CircuitStatus) -> Self {
        Self {
            service: status.service,
            state: status.state.as_str().to_string(),
            failures: status.failures,
            last_failure: status.last_failure,
        }
    }
}

/// Response body for the circuit list endpoint (GET /circuits)
#[derive(Debug, Clone, Serialize)]
pub struct CircuitListResponse {
    /// Status of every resource the breaker has seen
    pub circuits: Vec<CircuitStatusResponse>,
}

impl CircuitListResponse {
    /// Creates a new CircuitListResponse
    pub fn new(statuses: Vec<CircuitStatus>) -> Self {
        Self {
            circuits: statuses.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response body for the circuit reset operation (POST /circuits/:name/reset)
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    /// Success message
    pub message: String,
    /// The resource that was reset
    pub service: String,
}

impl ResetResponse {
    /// Creates a new ResetResponse
    pub fn new(service: impl Into<String>) -> Self {
        let service = service.into();
        Self {
            message: format!("Circuit '{}' reset", service),
            service,
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
