//! Blocking HTTP connection to the stats API.
//!
//! Available with the `http` cargo feature.

use crate::config::ConnectionConfig;
use crate::connection::{Connection, Query};
use crate::error::StatError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, REFERER, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// A `Connection` backed by a blocking `reqwest` client.
///
/// # Example
///
/// ```rust,no_run
/// use courtstat::{ConnectionConfig, Game, HttpConnection};
/// use courtstat::game::BoxScoreItem;
///
/// # fn example() -> Result<(), courtstat::StatError> {
/// let conn = HttpConnection::new(ConnectionConfig::default())?;
/// let mut game = Game::for_season("0021500001", "2015-16", "Regular Season");
/// let officials = game.box_score_item(BoxScoreItem::Officials, &conn)?;
/// println!("{} officials", officials.len());
/// # Ok(())
/// # }
/// ```
pub struct HttpConnection {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpConnection {
    /// Build a connection from a validated configuration.
    pub fn new(config: ConnectionConfig) -> Result<Self, StatError> {
        config.validate()?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers(&config)?)
            .build()
            .map_err(|e| StatError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url,
            client,
        })
    }

    /// The base URL queries are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn default_headers(config: &ConnectionConfig) -> Result<HeaderMap, StatError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, header_value(&config.user_agent)?);
    if let Some(ref referer) = config.referer {
        headers.insert(REFERER, header_value(referer)?);
    }
    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| StatError::InvalidConfig(format!("invalid header name {}: {}", name, e)))?;
        headers.insert(name, header_value(value)?);
    }
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue, StatError> {
    HeaderValue::from_str(value)
        .map_err(|e| StatError::InvalidConfig(format!("invalid header value {:?}: {}", value, e)))
}

impl Connection for HttpConnection {
    fn send(&self, query: &Query) -> Result<Value, StatError> {
        let url = query.url(&self.base_url);
        debug!(%url, "Sending stats request");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| StatError::Transport(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(StatError::Transport(format!(
                "HTTP error {} when fetching {}",
                response.status(),
                url
            )));
        }

        response
            .json::<Value>()
            .map_err(|e| StatError::Parse(format!("Failed to parse response from {}: {}", url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ConnectionConfig::default().with_timeout_secs(0);
        assert!(matches!(
            HttpConnection::new(config),
            Err(StatError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_new_rejects_bad_header() {
        let config = ConnectionConfig::default().with_header("bad header", "x");
        assert!(matches!(
            HttpConnection::new(config),
            Err(StatError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_base_url_kept() {
        let config = ConnectionConfig::default().with_base_url("http://localhost:9/stats/");
        let conn = HttpConnection::new(config).unwrap();
        assert_eq!(conn.base_url(), "http://localhost:9/stats/");
    }
}
