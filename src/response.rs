//! Parsed API responses.
//!
//! Every stats endpoint answers with a list of named tables ("result
//! sets"), each made of a header row and value rows. `StatResponse` is the
//! cached form a statistic keeps after a successful load.

use crate::error::StatError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One named table of a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultSet {
    /// Table name as reported by the API (e.g. `"GameSummary"`).
    pub name: String,

    /// Column names.
    #[serde(default)]
    pub headers: Vec<String>,

    /// Rows; each row has one value per header.
    #[serde(rename = "rowSet", default)]
    pub rows: Vec<Vec<Value>>,
}

/// A decoded response, as cached by a statistic.
///
/// Accepts both layouts the API uses: a `resultSets` array, or a single
/// `resultSet` object (some endpoints also send an array under that key).
///
/// # Examples
///
/// ```rust
/// use courtstat::StatResponse;
/// use serde_json::json;
///
/// let response = StatResponse::from_value(json!({
///     "resource": "teamdetails",
///     "parameters": {"TeamID": 1610612744},
///     "resultSets": [
///         {"name": "TeamBackground", "headers": ["TEAM_ID"], "rowSet": [[1610612744]]}
///     ]
/// }))
/// .unwrap();
///
/// assert_eq!(response.result_sets.len(), 1);
/// assert_eq!(response.result_sets[0].name, "TeamBackground");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawResponse")]
pub struct StatResponse {
    /// Resource name echoed by the API.
    pub resource: String,

    /// Parameters echoed by the API.
    pub parameters: Value,

    /// The result tables, in response order.
    #[serde(rename = "resultSets")]
    pub result_sets: Vec<ResultSet>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<ResultSet>),
    One(ResultSet),
}

impl From<OneOrMany> for Vec<ResultSet> {
    fn from(sets: OneOrMany) -> Self {
        match sets {
            OneOrMany::Many(sets) => sets,
            OneOrMany::One(set) => vec![set],
        }
    }
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    resource: String,
    #[serde(default)]
    parameters: Value,
    #[serde(rename = "resultSets", default)]
    result_sets: Option<OneOrMany>,
    #[serde(rename = "resultSet", default)]
    result_set: Option<OneOrMany>,
}

impl TryFrom<RawResponse> for StatResponse {
    type Error = String;

    fn try_from(raw: RawResponse) -> Result<Self, Self::Error> {
        let sets = raw
            .result_sets
            .or(raw.result_set)
            .ok_or_else(|| String::from("response has no resultSets"))?;
        Ok(Self {
            resource: raw.resource,
            parameters: raw.parameters,
            result_sets: sets.into(),
        })
    }
}

impl StatResponse {
    /// Decode a response body returned by a connection.
    pub fn from_value(value: Value) -> Result<Self, StatError> {
        serde_json::from_value(value)
            .map_err(|e| StatError::Parse(format!("Unexpected response shape: {}", e)))
    }

    /// Find a result set by name.
    pub fn result_set(&self, name: &str) -> Option<&ResultSet> {
        self.result_sets.iter().find(|set| set.name == name)
    }
}
