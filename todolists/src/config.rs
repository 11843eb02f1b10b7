//! Configuration for the todolist client.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;
use todoflow_api::client::DEFAULT_BASE_URL;

/// Configuration that cannot be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The API URL is not http(s)
    #[error("TODOLIST_API_URL must start with http:// or https://, got {0}")]
    InvalidApiUrl(String),

    /// A timeout of zero seconds
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    /// The API key is set but blank
    #[error("TODOLIST_API_KEY is set but empty")]
    EmptyApiKey,
}

/// Client configuration loaded from environment variables.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the todolist API
    pub api_url: String,
    /// API key sent as `API-KEY`; without one the in-memory API is used
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Time allowed for in-flight effects at shutdown, in seconds
    pub shutdown_timeout_secs: u64,
    /// Install the Prometheus recorder
    pub metrics_enabled: bool,
    /// Log filter used when `RUST_LOG` is unset (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `TODOLIST_API_URL` | [`DEFAULT_BASE_URL`] |
    /// | `TODOLIST_API_KEY` | unset |
    /// | `TODOLIST_REQUEST_TIMEOUT_SECS` | 10 |
    /// | `TODOLIST_SHUTDOWN_TIMEOUT_SECS` | 5 |
    /// | `TODOLIST_METRICS` | false |
    /// | `RUST_LOG` | `info` |
    ///
    /// Unparseable numbers and flags fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_url: lookup("TODOLIST_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: lookup("TODOLIST_API_KEY"),
            request_timeout_secs: lookup("TODOLIST_REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            shutdown_timeout_secs: lookup("TODOLIST_SHUTDOWN_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            metrics_enabled: lookup("TODOLIST_METRICS")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(false),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Check values that parsed but cannot work
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(self.api_url.clone()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("TODOLIST_REQUEST_TIMEOUT_SECS"));
        }
        if self.shutdown_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("TODOLIST_SHUTDOWN_TIMEOUT_SECS"));
        }
        if self.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(())
    }

    /// Per-request timeout
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Shutdown grace period
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("shutdown_timeout_secs", &self.shutdown_timeout_secs)
            .field("metrics_enabled", &self.metrics_enabled)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
