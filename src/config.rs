//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the persistent entry files
    pub cache_dir: String,
    /// Default TTL in seconds applied when a set carries no explicit TTL
    pub default_ttl: i64,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep task interval in seconds
    pub sweep_interval: u64,
    /// Failures required before a circuit opens
    pub failure_threshold: u32,
    /// Seconds a circuit stays open before a trial call is allowed
    pub open_timeout: i64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DIR` - Persistent entry directory (default: "cache-data")
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `FAILURE_THRESHOLD` - Failures before a circuit opens (default: 5)
    /// - `OPEN_TIMEOUT` - Open-circuit cooldown in seconds (default: 60)
    pub fn from_env() -> Self {
        Self {
            cache_dir: env::var("CACHE_DIR").unwrap_or_else(|_| "cache-data".to_string()),
            default_ttl: env::var("DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            failure_threshold: env::var("FAILURE_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            open_timeout: env::var("OPEN_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: "cache-data".to_string(),
            default_ttl: 300,
            server_port: 3000,
            sweep_interval: 60,
            failure_threshold: 5,
            open_timeout: 60,
        }
    }
}
