//! Stat items: indexed views into a loaded response.

use crate::response::ResultSet;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A read-only view of one result set of a loaded statistic.
///
/// Borrowed from the statistic's cache, so it cannot outlive the cache
/// it was read from.
///
/// # Examples
///
/// ```rust
/// use courtstat::{ResultSet, StatItem};
/// use serde_json::json;
///
/// let set = ResultSet {
///     name: "Officials".to_string(),
///     headers: vec!["OFFICIAL_ID".to_string(), "LAST_NAME".to_string()],
///     rows: vec![vec![json!(1153), json!("Crawford")]],
/// };
/// let item = StatItem::new(2, &set);
///
/// assert_eq!(item.index(), 2);
/// assert_eq!(item.get::<String>(0, "LAST_NAME"), Some("Crawford".to_string()));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StatItem<'a> {
    index: usize,
    set: &'a ResultSet,
}

impl<'a> StatItem<'a> {
    /// Wrap the result set found at `index` of a response.
    pub fn new(index: usize, set: &'a ResultSet) -> Self {
        Self { index, set }
    }

    /// Position of this item in the response.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Result set name.
    pub fn name(&self) -> &'a str {
        &self.set.name
    }

    /// Column names.
    pub fn headers(&self) -> &'a [String] {
        &self.set.headers
    }

    /// All rows.
    pub fn rows(&self) -> &'a [Vec<Value>] {
        &self.set.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.set.rows.len()
    }

    /// Whether the item has no rows.
    pub fn is_empty(&self) -> bool {
        self.set.rows.is_empty()
    }

    /// Row at position `row`.
    pub fn row(&self, row: usize) -> Option<&'a [Value]> {
        self.set.rows.get(row).map(Vec::as_slice)
    }

    /// Column position of `header`.
    pub fn column(&self, header: &str) -> Option<usize> {
        self.set.headers.iter().position(|h| h == header)
    }

    /// Raw cell at (`row`, `header`).
    pub fn value(&self, row: usize, header: &str) -> Option<&'a Value> {
        let column = self.column(header)?;
        self.set.rows.get(row)?.get(column)
    }

    /// Cell at (`row`, `header`) deserialized as `T`.
    ///
    /// Returns `None` if the cell is missing or has another type.
    pub fn get<T: DeserializeOwned>(&self, row: usize, header: &str) -> Option<T> {
        self.value(row, header)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Every value of the `header` column, top to bottom.
    pub fn column_values(&self, header: &str) -> Option<Vec<&'a Value>> {
        let column = self.column(header)?;
        Some(
            self.set
                .rows
                .iter()
                .filter_map(|row| row.get(column))
                .collect(),
        )
    }

    /// Rows as JSON objects keyed by header.
    pub fn records(&self) -> impl Iterator<Item = Map<String, Value>> + 'a {
        let set: &'a ResultSet = self.set;
        let headers = &set.headers;
        set.rows.iter().map(move |row| {
            headers
                .iter()
                .cloned()
                .zip(row.iter().cloned())
                .collect::<Map<String, Value>>()
        })
    }

    /// The underlying result set.
    pub fn result_set(&self) -> &'a ResultSet {
        self.set
    }
}
