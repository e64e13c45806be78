//! Connection configuration.

use crate::error::StatError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default base URL of the stats API.
pub const DEFAULT_BASE_URL: &str = "https://stats.nba.com/stats/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

const DEFAULT_REFERER: &str = "https://www.nba.com/";

/// Settings for an HTTP connection to the stats API.
///
/// Missing keys fall back to their defaults when deserializing.
///
/// # Examples
///
/// ```rust
/// use courtstat::ConnectionConfig;
///
/// let config = ConnectionConfig::from_json(r#"{"timeout_secs": 5}"#).unwrap();
/// assert_eq!(config.timeout_secs, 5);
/// assert_eq!(config.base_url, courtstat::config::DEFAULT_BASE_URL);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Base URL every endpoint is appended to.
    pub base_url: String,

    /// Request timeout in seconds. Must be non-zero.
    pub timeout_secs: u64,

    /// `User-Agent` header. The API rejects requests without a browser-like agent.
    pub user_agent: String,

    /// `Referer` header.
    pub referer: Option<String>,

    /// Additional headers sent with every request.
    pub headers: BTreeMap<String, String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: Some(DEFAULT_REFERER.to_string()),
            headers: BTreeMap::new(),
        }
    }
}

impl ConnectionConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, StatError> {
        let config: ConnectionConfig = serde_json::from_str(json)
            .map_err(|e| StatError::InvalidConfig(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the base URL, builder style.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the timeout, builder style.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Add an extra header, builder style.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Check the configuration for values no connection can use.
    pub fn validate(&self) -> Result<(), StatError> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(StatError::InvalidConfig(
                "base_url cannot be empty".to_string(),
            ));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(StatError::InvalidConfig(format!(
                "base_url must be an http(s) URL, got {}",
                base
            )));
        }
        if self.timeout_secs == 0 {
            return Err(StatError::InvalidConfig(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
