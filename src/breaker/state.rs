//! Circuit State Module
//!
//! The three-state gate and the pure derivation function behind it.
//!
//! # States
//! - Closed: normal operation, calls permitted
//! - Open: failure threshold reached, calls forbidden
//! - Half-Open: cooldown elapsed, a trial call is permitted

use serde::Serialize;

// == Circuit State ==
/// Derived gate state for one resource.
///
/// Never stored: always computed from the persisted failure count and last
/// failure timestamp, so the reported state cannot drift from its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CircuitState {
    #[serde(rename = "CLOSED")]
    Closed,
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "HALF_OPEN")]
    HalfOpen,
}

impl CircuitState {
    /// Canonical wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "CLOSED",
            CircuitState::Open => "OPEN",
            CircuitState::HalfOpen => "HALF_OPEN",
        }
    }
}

// == State Derivation ==
/// Derives the gate state from the persisted record.
///
/// - Below the threshold the circuit is closed, timestamps ignored.
/// - At or above the threshold the circuit is open while the last failure
///   is within `open_timeout` seconds of `now`, and half-open after that.
///
/// A record with failures but no timestamp (a half-written record from a
/// crashed process) derives half-open: callers get a trial rather than a
/// permanent block.
pub fn derive_state(
    failures: u64,
    last_failure: Option<i64>,
    threshold: u32,
    open_timeout: i64,
    now: i64,
) -> CircuitState {
    if failures < u64::from(threshold) {
        return CircuitState::Closed;
    }

    let elapsed = now - last_failure.unwrap_or(0);
    if elapsed <= open_timeout {
        CircuitState::Open
    } else {
        CircuitState::HalfOpen
    }
}
