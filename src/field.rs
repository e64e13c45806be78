//! Query fields shared by every statistic of an element.
//!
//! A `FieldMap` holds the request parameters (game id, season, per-mode, ...)
//! of one element. Every statistic of that element keeps a handle to the
//! same map, so a value set through any handle is seen by all of them.

use crate::error::StatError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A named request parameter of the stats API.
///
/// The string form is the parameter name sent on the wire.
///
/// # Examples
///
/// ```rust
/// use courtstat::FieldType;
///
/// assert_eq!(FieldType::GameId.param_name(), "GameID");
/// assert_eq!("SeasonType".parse::<FieldType>().unwrap(), FieldType::SeasonType);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
)]
pub enum FieldType {
    #[strum(serialize = "GameID")]
    GameId,
    #[strum(serialize = "TeamID")]
    TeamId,
    #[strum(serialize = "LeagueID")]
    LeagueId,
    #[strum(serialize = "Season")]
    Season,
    #[strum(serialize = "SeasonType")]
    SeasonType,
    #[strum(serialize = "RangeType")]
    RangeType,
    #[strum(serialize = "StartPeriod")]
    StartPeriod,
    #[strum(serialize = "EndPeriod")]
    EndPeriod,
    #[strum(serialize = "StartRange")]
    StartRange,
    #[strum(serialize = "EndRange")]
    EndRange,
    #[strum(serialize = "PerMode")]
    PerMode,
    #[strum(serialize = "MeasureType")]
    MeasureType,
    #[strum(serialize = "PlusMinus")]
    PlusMinus,
    #[strum(serialize = "PaceAdjust")]
    PaceAdjust,
    #[strum(serialize = "Rank")]
    Rank,
    #[strum(serialize = "Month")]
    Month,
    #[strum(serialize = "OpponentTeamID")]
    OpponentTeamId,
    #[strum(serialize = "Period")]
    Period,
    #[strum(serialize = "LastNGames")]
    LastNGames,
    #[strum(serialize = "GroupQuantity")]
    GroupQuantity,
    #[strum(serialize = "DateFrom")]
    DateFrom,
    #[strum(serialize = "DateTo")]
    DateTo,
    #[strum(serialize = "Location")]
    Location,
    #[strum(serialize = "Outcome")]
    Outcome,
}

impl FieldType {
    /// The parameter name sent to the API.
    pub fn param_name(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Default)]
struct FieldStore {
    values: HashMap<FieldType, Value>,
    revision: u64,
}

/// Shared, mutable map of request fields.
///
/// Cloning a `FieldMap` clones the handle, not the contents: both handles
/// read and write the same store. Every mutation bumps a revision counter
/// that statistics use to detect a stale cache.
///
/// # Examples
///
/// ```rust
/// use courtstat::{FieldMap, FieldType};
///
/// let fields = FieldMap::new();
/// let shared = fields.clone();
///
/// fields.set(FieldType::Season, "2015-16").unwrap();
/// assert_eq!(shared.get::<String>(FieldType::Season), Some("2015-16".to_string()));
/// assert!(shared.contains(FieldType::Season));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    inner: Rc<RefCell<FieldStore>>,
}

impl FieldMap {
    /// Create a new empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value.
    ///
    /// # Errors
    ///
    /// * `StatError::InvalidField` - the value cannot be represented as
    ///   JSON; the map and its revision are left untouched
    pub fn set(&self, key: FieldType, value: impl Serialize) -> Result<(), StatError> {
        let json_value = serde_json::to_value(value).map_err(|e| StatError::InvalidField {
            field: key,
            reason: e.to_string(),
        })?;
        self.set_value(key, json_value);
        Ok(())
    }

    /// Set a field to an already encoded JSON value.
    pub fn set_value(&self, key: FieldType, value: Value) {
        let mut store = self.inner.borrow_mut();
        store.values.insert(key, value);
        store.revision += 1;
    }

    /// Set a field value only if the field is not already present.
    ///
    /// Returns `Ok(true)` if the value was written.
    pub fn set_default(&self, key: FieldType, value: impl Serialize) -> Result<bool, StatError> {
        if self.contains(key) {
            return Ok(false);
        }
        self.set(key, value)?;
        Ok(true)
    }

    /// Remove a field, returning its previous value.
    pub fn remove(&self, key: FieldType) -> Option<Value> {
        let mut store = self.inner.borrow_mut();
        let previous = store.values.remove(&key);
        if previous.is_some() {
            store.revision += 1;
        }
        previous
    }

    /// Get a field value.
    ///
    /// Returns `None` if the key doesn't exist or if the value
    /// cannot be deserialized to the requested type.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: FieldType) -> Option<T> {
        self.inner
            .borrow()
            .values
            .get(&key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Get the raw JSON value of a field.
    pub fn value(&self, key: FieldType) -> Option<Value> {
        self.inner.borrow().values.get(&key).cloned()
    }

    /// Check whether a field is present with a non-null value.
    pub fn contains(&self, key: FieldType) -> bool {
        self.inner
            .borrow()
            .values
            .get(&key)
            .is_some_and(|v| !v.is_null())
    }

    /// The subset of `required` that is not present, in the given order.
    pub fn missing(&self, required: &[FieldType]) -> Vec<FieldType> {
        required
            .iter()
            .copied()
            .filter(|field| !self.contains(*field))
            .collect()
    }

    /// Number of fields stored (including `null` ones).
    pub fn len(&self) -> usize {
        self.inner.borrow().values.len()
    }

    /// Whether the map has no fields.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().values.is_empty()
    }

    /// Monotonic counter bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.inner.borrow().revision
    }

    /// Whether both handles point at the same store.
    pub fn ptr_eq(&self, other: &FieldMap) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Render the present fields as request parameters, sorted by name.
    ///
    /// Strings are sent verbatim, other scalars in their JSON form; `null`
    /// fields are skipped.
    pub fn params(&self) -> Vec<(String, String)> {
        let store = self.inner.borrow();
        let mut params: Vec<(String, String)> = store
            .values
            .iter()
            .filter_map(|(key, value)| {
                let rendered = match value {
                    Value::Null => return None,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((key.param_name().to_string(), rendered))
            })
            .collect();
        params.sort();
        params
    }
}
