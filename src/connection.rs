//! Connections and queries.
//!
//! A `Connection` turns a `Query` into a parsed JSON document. The
//! resolver treats it as an opaque blocking call: method, headers and
//! retry policy belong to the implementation.

use crate::error::StatError;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// A request for one endpoint with its parameters.
///
/// # Examples
///
/// ```rust
/// use courtstat::Query;
///
/// let query = Query::new(
///     "boxscoresummaryv2",
///     vec![("GameID".to_string(), "0021500001".to_string())],
/// );
/// assert_eq!(
///     query.url("https://stats.nba.com/stats/"),
///     "https://stats.nba.com/stats/boxscoresummaryv2?GameID=0021500001"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    endpoint: String,
    params: Vec<(String, String)>,
}

impl Query {
    /// Create a query for `endpoint` with the given parameters.
    pub fn new(endpoint: impl Into<String>, params: Vec<(String, String)>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params,
        }
    }

    /// The endpoint name, relative to the API base URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The query parameters in send order.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Look up a parameter value by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Render the full, percent-encoded URL under `base_url`.
    ///
    /// A missing trailing slash on `base_url` is added.
    pub fn url(&self, base_url: &str) -> String {
        let mut url = String::from(base_url);
        if !url.ends_with('/') {
            url.push('/');
        }
        url.push_str(&self.endpoint);
        if !self.params.is_empty() {
            let query = self
                .params
                .iter()
                .map(|(key, value)| {
                    format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
                })
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }
}

/// Trait for connections that execute queries.
///
/// Implementations return the parsed response body, or
/// `StatError::Transport` / `StatError::Parse` when the call fails.
///
/// # Examples
///
/// ```rust
/// use courtstat::{Connection, FixtureConnection, Query};
/// use serde_json::json;
///
/// let conn = FixtureConnection::new().with_response("teamdetails", json!({"resultSets": []}));
/// let body = conn.send(&Query::new("teamdetails", Vec::new())).unwrap();
/// assert_eq!(body, json!({"resultSets": []}));
/// ```
pub trait Connection {
    /// Execute `query` and return the parsed JSON body.
    fn send(&self, query: &Query) -> Result<Value, StatError>;
}

impl<C: Connection + ?Sized> Connection for &C {
    fn send(&self, query: &Query) -> Result<Value, StatError> {
        (**self).send(query)
    }
}

/// An in-memory connection serving canned responses by endpoint.
///
/// Every query is recorded, whether or not a response exists for it, so
/// callers can count round trips. Queries for unknown endpoints fail with
/// `StatError::Transport`.
#[derive(Debug, Default)]
pub struct FixtureConnection {
    responses: HashMap<String, Value>,
    requests: RefCell<Vec<Query>>,
}

impl FixtureConnection {
    /// Create a connection with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the response for `endpoint`, builder style.
    pub fn with_response(mut self, endpoint: impl Into<String>, body: Value) -> Self {
        self.insert(endpoint, body);
        self
    }

    /// Register or replace the response for `endpoint`.
    pub fn insert(&mut self, endpoint: impl Into<String>, body: Value) {
        self.responses.insert(endpoint.into(), body);
    }

    /// All queries received so far, oldest first.
    pub fn requests(&self) -> Vec<Query> {
        self.requests.borrow().clone()
    }

    /// Number of queries received so far.
    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Number of queries received for `endpoint`.
    pub fn requests_for(&self, endpoint: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|query| query.endpoint() == endpoint)
            .count()
    }
}

impl Connection for FixtureConnection {
    fn send(&self, query: &Query) -> Result<Value, StatError> {
        self.requests.borrow_mut().push(query.clone());
        self.responses
            .get(query.endpoint())
            .cloned()
            .ok_or_else(|| {
                StatError::Transport(format!("no response for endpoint {}", query.endpoint()))
            })
    }
}
