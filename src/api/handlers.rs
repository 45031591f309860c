//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::breaker::CircuitBreaker;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    CircuitListResponse, CircuitStatusResponse, ClearResponse, DeleteResponse, GetResponse,
    HealthResponse, ResetResponse, SetRequest, SetResponse, StatsResponse,
};
use crate::storage::{AdaptiveCache, Cache, PersistentStore};

/// Application state shared across all handlers.
///
/// The breaker runs over the same adaptive cache instance the cache
/// endpoints serve, so circuit records flow through the hot tier and land
/// in the same persistent store.
#[derive(Clone)]
pub struct AppState {
    /// Durable tier (the sweep task works against this directly)
    pub store: Arc<PersistentStore>,
    /// Two-tier cache served by the cache endpoints
    pub cache: Arc<AdaptiveCache>,
    /// Circuit breaker persisted through the cache
    pub breaker: Arc<CircuitBreaker<AdaptiveCache>>,
}

impl AppState {
    /// Wires the tiers together over an existing persistent store.
    pub fn new(store: PersistentStore, failure_threshold: u32, open_timeout: i64) -> Result<Self> {
        let store = Arc::new(store);
        let cache = Arc::new(AdaptiveCache::new(store.clone()));
        let breaker = Arc::new(CircuitBreaker::new(
            cache.clone(),
            failure_threshold,
            open_timeout,
        )?);
        Ok(Self {
            store,
            cache,
            breaker,
        })
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = PersistentStore::new(&config.cache_dir, config.default_ttl)?;
        Self::new(store, config.failure_threshold, config.open_timeout)
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair in both cache tiers with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    // Validate request
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    if !state.cache.set(&req.key, req.value, req.ttl) {
        return Err(CacheError::Internal(
            "Cache entry was not persisted".to_string(),
        ));
    }

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key. Missing and expired keys are
/// both reported as 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    if !state.cache.has(&key) {
        return Err(CacheError::NotFound(key));
    }

    let value = state.cache.get(&key, Value::Null);
    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from both cache tiers. Deleting an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if !state.cache.delete(&key) {
        return Err(CacheError::Internal(
            "Cache entry was not deleted".to_string(),
        ));
    }

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for POST /clear
///
/// Removes all entries from both tiers and resets the counters.
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    if !state.cache.clear() {
        return Err(CacheError::Internal("Cache was not cleared".to_string()));
    }

    Ok(Json(ClearResponse::new()))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /circuits
///
/// Returns the status of every resource the breaker has seen.
pub async fn circuits_handler(State(state): State<AppState>) -> Json<CircuitListResponse> {
    Json(CircuitListResponse::new(state.breaker.all_statuses()))
}

/// Handler for GET /circuits/:name
///
/// Returns one circuit's status. Unknown names report a closed circuit
/// with zero failures rather than an error.
pub async fn circuit_status_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<CircuitStatusResponse> {
    Json(CircuitStatusResponse::from(state.breaker.status(&name)))
}

/// Handler for POST /circuits/:name/failure
///
/// Records a failure for the resource and returns the resulting status.
/// A storage write failure degrades silently: the response then reflects
/// whatever state is still readable.
pub async fn circuit_failure_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<CircuitStatusResponse> {
    state.breaker.record_failure(&name);
    Json(CircuitStatusResponse::from(state.breaker.status(&name)))
}

/// Handler for POST /circuits/:name/success
///
/// Records a success for the resource and returns the resulting status.
pub async fn circuit_success_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<CircuitStatusResponse> {
    state.breaker.record_success(&name);
    Json(CircuitStatusResponse::from(state.breaker.status(&name)))
}

/// Handler for POST /circuits/:name/reset
///
/// Administratively clears a circuit's record.
pub async fn circuit_reset_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ResetResponse>> {
    if !state.breaker.reset(&name) {
        return Err(CacheError::Internal(
            "Circuit record was not cleared".to_string(),
        ));
    }

    Ok(Json(ResetResponse::new(name)))
}
