//! Dashboard configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! The backend base URL can be baked in at build time (`option_env!`) and
//! overridden at runtime. Everything else is a timeout with a typed default.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_STREAM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SUGGESTION_TIMEOUT_SECS: u64 = 10;

const BASE_URL_VAR: &str = "AI_SERVICE_URL";
const BUILD_BASE_URL: Option<&str> = option_env!("AI_SERVICE_URL");

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A numeric variable was set but could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    /// A timeout variable was set to zero.
    #[error("{var} must be greater than zero")]
    ZeroTimeout { var: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Upper bound on one streamed query, from connect to `complete`.
    pub stream: Duration,
    pub connect: Duration,
    /// Per-request bound for the reachability and suggestion calls.
    pub suggestion: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            stream: Duration::from_secs(DEFAULT_STREAM_TIMEOUT_SECS),
            connect: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            suggestion: Duration::from_secs(DEFAULT_SUGGESTION_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub base_url: String,
    pub timeouts: Timeouts,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_owned(), timeouts: Timeouts::default() }
    }
}

impl DashboardConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `AI_SERVICE_URL`: runtime value, else the build-time value, else `http://localhost:5000`
    /// - `QUERY_STREAM_TIMEOUT_SECS`: default 30
    /// - `HTTP_CONNECT_TIMEOUT_SECS`: default 10
    /// - `SUGGESTION_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error when a timeout variable is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let runtime = std::env::var(BASE_URL_VAR).ok();
        let base_url = resolve_base_url(runtime.as_deref(), BUILD_BASE_URL);

        let timeouts = Timeouts {
            stream: env_secs("QUERY_STREAM_TIMEOUT_SECS", DEFAULT_STREAM_TIMEOUT_SECS)?,
            connect: env_secs("HTTP_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
            suggestion: env_secs("SUGGESTION_TIMEOUT_SECS", DEFAULT_SUGGESTION_TIMEOUT_SECS)?,
        };

        Ok(Self { base_url, timeouts })
    }

    /// Replace the base URL, normalizing a trailing slash away.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }
}

fn resolve_base_url(runtime: Option<&str>, build_time: Option<&str>) -> String {
    let raw = runtime
        .filter(|v| !v.trim().is_empty())
        .or_else(|| build_time.filter(|v| !v.trim().is_empty()))
        .unwrap_or(DEFAULT_BASE_URL);
    normalize_base_url(raw)
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn env_secs(var: &'static str, default: u64) -> Result<Duration, ConfigError> {
    let Ok(raw) = std::env::var(var) else {
        return Ok(Duration::from_secs(default));
    };
    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber { var, value: raw.clone() })?;
    if secs == 0 {
        return Err(ConfigError::ZeroTimeout { var });
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
