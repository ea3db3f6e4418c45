//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_SESSION_DIR: &str = ".blogspace";
pub const DEFAULT_FETCH_LIMIT: usize = 20;
pub const DEFAULT_AUTH_LATENCY_MS: u64 = 800;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogConfig {
    /// Collection endpoint root, without a trailing slash.
    pub api_base_url: String,
    /// Directory holding the persisted session file.
    pub session_dir: PathBuf,
    /// Number of posts kept from a fetch.
    pub fetch_limit: usize,
    /// Simulated login/register round-trip.
    pub auth_latency: Duration,
    pub timeouts: HttpTimeouts,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            auth_latency: Duration::from_millis(DEFAULT_AUTH_LATENCY_MS),
            timeouts: HttpTimeouts::default(),
        }
    }
}

impl BlogConfig {
    /// Build typed config from environment variables.
    ///
    /// All optional:
    /// - `BLOG_API_BASE_URL`: collection endpoint root (default jsonplaceholder)
    /// - `BLOG_SESSION_DIR`: default `.blogspace`
    /// - `BLOG_FETCH_LIMIT`: default 20, must be positive
    /// - `BLOG_AUTH_LATENCY_MS`: default 800
    /// - `BLOG_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BLOG_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for a malformed base URL or fetch limit.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = match std::env::var("BLOG_API_BASE_URL") {
            Ok(raw) => normalize_base_url(&raw)?,
            Err(_) => DEFAULT_API_BASE_URL.to_string(),
        };
        let session_dir = std::env::var("BLOG_SESSION_DIR").map_or_else(|_| PathBuf::from(DEFAULT_SESSION_DIR), PathBuf::from);
        let fetch_limit = parse_fetch_limit(std::env::var("BLOG_FETCH_LIMIT").ok().as_deref())?;
        let auth_latency = Duration::from_millis(env_parse_u64("BLOG_AUTH_LATENCY_MS", DEFAULT_AUTH_LATENCY_MS));
        let timeouts = HttpTimeouts {
            request_secs: env_parse_u64("BLOG_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("BLOG_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_base_url, session_dir, fetch_limit, auth_latency, timeouts })
    }
}

/// Strip trailing slashes and require an http(s) scheme.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] when the scheme is missing.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Parse(format!("BLOG_API_BASE_URL must start with http:// or https://: {raw}")));
    }
    Ok(trimmed.to_string())
}

fn parse_fetch_limit(raw: Option<&str>) -> Result<usize, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_FETCH_LIMIT);
    };
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(ConfigError::Parse(format!("BLOG_FETCH_LIMIT must be a positive integer: {raw}"))),
        Ok(limit) => Ok(limit),
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
