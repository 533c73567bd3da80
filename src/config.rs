//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// TTL in seconds for entries set without an explicit TTL
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Seconds between WebSocket snapshot broadcasts
    pub broadcast_interval: u64,
    /// Maximum number of concurrent WebSocket clients
    pub max_ws_clients: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 40)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 5)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `BROADCAST_INTERVAL` - Snapshot broadcast frequency in seconds (default: 1)
    /// - `MAX_WS_CLIENTS` - Concurrent WebSocket connection cap (default: 64)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            broadcast_interval: env_or("BROADCAST_INTERVAL", defaults.broadcast_interval),
            max_ws_clients: env_or("MAX_WS_CLIENTS", defaults.max_ws_clients),
        }
    }

    /// Rejects settings the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            (self.max_entries == 0, "MAX_ENTRIES must be at least 1"),
            (self.default_ttl == 0, "DEFAULT_TTL must be at least 1 second"),
            (
                self.broadcast_interval == 0,
                "BROADCAST_INTERVAL must be at least 1 second",
            ),
            (self.max_ws_clients == 0, "MAX_WS_CLIENTS must be at least 1"),
        ];

        match checks.iter().find(|(failed, _)| *failed) {
            Some((_, message)) => Err(CacheError::InvalidConfig(message.to_string())),
            None => Ok(()),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn broadcast_interval(&self) -> Duration {
        Duration::from_secs(self.broadcast_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 40,
            default_ttl: 5,
            server_port: 8080,
            broadcast_interval: 1,
            max_ws_clients: 64,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
