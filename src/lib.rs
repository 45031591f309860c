//! Cachegate - a two-tier TTL cache with a cache-backed circuit breaker
//!
//! A durable file-backed store with a volatile in-process layer in front of
//! it, plus a per-resource failure gate persisted through the same storage,
//! exposed over a small admin HTTP API.

pub mod api;
pub mod breaker;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use breaker::{CircuitBreaker, CircuitState, CircuitStatus};
pub use config::Config;
pub use error::CacheError;
pub use storage::{AdaptiveCache, Cache, CacheStats, PersistentStore};
pub use tasks::spawn_sweep_task;
