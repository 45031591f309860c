//! Circuit Breaker Implementation
//!
//! Tracks failure counts and timestamps per named resource through the
//! shared cache contract and derives the gate state on every read. Because
//! the records go through the same storage as everything else, a tripped
//! circuit survives a process restart.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::breaker::{derive_state, CircuitState, DEFAULT_FAILURE_THRESHOLD, DEFAULT_OPEN_TIMEOUT};
use crate::error::{CacheError, Result};
use crate::storage::{current_timestamp, Cache};

/// Key prefix for per-resource failure counts.
const FAILURES_PREFIX: &str = "failures:";

/// Key prefix for per-resource last-failure timestamps.
const LAST_FAILURE_PREFIX: &str = "lastFailure:";

/// Key of the persisted list of resource names seen by the breaker.
const RESOURCE_REGISTRY_KEY: &str = "circuit:resources";

// == Circuit Status ==
/// Point-in-time view of one resource's circuit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitStatus {
    /// Resource name
    pub service: String,
    /// Derived gate state
    pub state: CircuitState,
    /// Recorded consecutive failures
    pub failures: u64,
    /// Unix timestamp of the most recent failure, if any
    pub last_failure: Option<i64>,
}

// == Circuit Breaker ==
/// Per-resource failure gate over any [`Cache`] implementation.
///
/// No state machine is stored: `failures:<name>` and `lastFailure:<name>`
/// records are the only persisted facts, and the CLOSED/OPEN/HALF_OPEN
/// state is re-derived from them on every read. Absence of both records
/// means a closed circuit.
///
/// Storage failures degrade rather than propagate: a record that cannot be
/// written is logged and dropped, and the affected circuit simply keeps
/// reporting closed.
pub struct CircuitBreaker<C: Cache> {
    /// Shared storage for the circuit records
    cache: Arc<C>,
    /// Failures required to open a circuit
    failure_threshold: u32,
    /// Seconds a circuit stays open before a trial is allowed
    open_timeout: i64,
}

impl<C: Cache> CircuitBreaker<C> {
    // == Constructor ==
    /// Creates a breaker with explicit parameters.
    ///
    /// Fails fast on caller misuse: the threshold must be at least 1 and
    /// the open timeout positive.
    pub fn new(cache: Arc<C>, failure_threshold: u32, open_timeout: i64) -> Result<Self> {
        if failure_threshold == 0 {
            return Err(CacheError::InvalidConfig(
                "failure threshold must be at least 1".to_string(),
            ));
        }
        if open_timeout <= 0 {
            return Err(CacheError::InvalidConfig(
                "open timeout must be positive".to_string(),
            ));
        }
        Ok(Self {
            cache,
            failure_threshold,
            open_timeout,
        })
    }

    /// Creates a breaker with the default threshold (5) and timeout (60 s).
    pub fn with_defaults(cache: Arc<C>) -> Self {
        Self {
            cache,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            open_timeout: DEFAULT_OPEN_TIMEOUT,
        }
    }

    fn failures_key(name: &str) -> String {
        format!("{FAILURES_PREFIX}{name}")
    }

    fn last_failure_key(name: &str) -> String {
        format!("{LAST_FAILURE_PREFIX}{name}")
    }

    /// Recorded failure count; an absent record means zero.
    fn failures(&self, name: &str) -> u64 {
        self.cache
            .get(&Self::failures_key(name), Value::Null)
            .as_u64()
            .unwrap_or(0)
    }

    /// Timestamp of the most recent failure, if one is recorded.
    fn last_failure(&self, name: &str) -> Option<i64> {
        self.cache
            .get(&Self::last_failure_key(name), Value::Null)
            .as_i64()
    }

    // == Record Failure ==
    /// Increments the failure count and re-arms the open window.
    ///
    /// Every failure refreshes the last-failure timestamp, so a failure
    /// recorded while half-open pushes the resource straight back to open
    /// without requiring the full threshold again.
    ///
    /// Returns `false` when the records could not be persisted; the breaker
    /// then keeps reporting the circuit as closed.
    pub fn record_failure(&self, name: &str) -> bool {
        let failures = self.failures(name) + 1;
        let now = current_timestamp();

        let mut ok = self.cache.set(&Self::failures_key(name), json!(failures), None);
        ok &= self
            .cache
            .set(&Self::last_failure_key(name), json!(now), None);
        self.register(name);

        if !ok {
            warn!(
                "Circuit record for '{}' was not persisted; circuit stays closed",
                name
            );
        }
        ok
    }

    // == Record Success ==
    /// Clears the resource's record, unconditionally returning it to closed.
    ///
    /// A single success fully resets the breaker; there is no trial
    /// counting in the half-open state.
    pub fn record_success(&self, name: &str) -> bool {
        let mut ok = self.cache.delete(&Self::failures_key(name));
        ok &= self.cache.delete(&Self::last_failure_key(name));

        if !ok {
            warn!("Circuit record for '{}' could not be cleared", name);
        }
        ok
    }

    // == Reset ==
    /// Administrative reset: clears the record as if the resource had just
    /// succeeded.
    pub fn reset(&self, name: &str) -> bool {
        self.record_success(name)
    }

    // == Is Available ==
    /// True unless the derived state is open.
    ///
    /// Half-open permits the call: that is the trial request which decides
    /// whether the circuit closes again.
    pub fn is_available(&self, name: &str) -> bool {
        self.status(name).state != CircuitState::Open
    }

    // == Status ==
    /// Derives the current status of one resource.
    ///
    /// Unknown names report a closed circuit with zero failures.
    pub fn status(&self, name: &str) -> CircuitStatus {
        let failures = self.failures(name);
        let last_failure = self.last_failure(name);
        let state = derive_state(
            failures,
            last_failure,
            self.failure_threshold,
            self.open_timeout,
            current_timestamp(),
        );

        CircuitStatus {
            service: name.to_string(),
            state,
            failures,
            last_failure,
        }
    }

    // == All Statuses ==
    /// Statuses for every resource the breaker has seen a failure from.
    pub fn all_statuses(&self) -> Vec<CircuitStatus> {
        self.resources()
            .iter()
            .map(|name| self.status(name))
            .collect()
    }

    /// Persisted resource registry; absent or malformed registry reads as
    /// empty.
    fn resources(&self) -> Vec<String> {
        match self.cache.get(RESOURCE_REGISTRY_KEY, Value::Null) {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Adds a name to the registry on first failure. Best effort: a failed
    /// write only costs visibility in `all_statuses`.
    fn register(&self, name: &str) {
        let mut names = self.resources();
        if names.iter().any(|n| n == name) {
            return;
        }
        names.push(name.to_string());
        if !self.cache.set(RESOURCE_REGISTRY_KEY, json!(names), None) {
            warn!("Resource registry update for '{}' failed", name);
        }
    }
}
