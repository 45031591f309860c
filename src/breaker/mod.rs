//! Circuit Breaker Module
//!
//! Per-resource failure gating with three derived states, persisted through
//! the shared cache so tripped circuits survive process restarts.

mod circuit;
mod state;

// Re-export public types
pub use circuit::{CircuitBreaker, CircuitStatus};
pub use state::{derive_state, CircuitState};

// == Public Constants ==
/// Failures required to open a circuit when none is configured
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;

/// Seconds a circuit stays open before a trial call is allowed
pub const DEFAULT_OPEN_TIMEOUT: i64 = 60;
