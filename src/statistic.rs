//! Statistic module.
//!
//! Provides `Statistic<K>`, one network-backed resource of kind `K`, and the
//! object-safe `Resource` trait elements use to hold statistics of
//! different kinds side by side.

use crate::connection::{Connection, Query};
use crate::error::StatError;
use crate::field::{FieldMap, FieldType};
use crate::item::StatItem;
use crate::response::StatResponse;
use crate::stat_type::{ItemKind, StatKind, StatType};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, info, warn};

/// A lazily loaded, cached statistic.
///
/// The statistic targets `K::IDENTIFIER` followed by the active type's
/// description. It reads its request parameters from a `FieldMap` shared
/// with the rest of its element, and caches the parsed response until the
/// type changes or the field map is mutated.
///
/// # Examples
///
/// ```rust
/// use courtstat::*;
/// use courtstat::game::{BoxScore, BoxScoreItem, BoxScoreType};
/// use serde_json::json;
///
/// let fields = FieldMap::new();
/// for (field, value) in courtstat::game::box_score_defaults("0021500001", "2015-16", "Regular Season") {
///     fields.set_value(field, value);
/// }
///
/// let conn = FixtureConnection::new().with_response(
///     "boxscorescoringv2",
///     json!({"resultSets": [
///         {"name": "sqlPlayersScoring", "headers": [], "rowSet": []},
///         {"name": "sqlTeamsScoring", "headers": [], "rowSet": []}
///     ]}),
/// );
///
/// let mut box_score: Statistic<BoxScore> = Statistic::new(fields);
/// assert_eq!(box_score.endpoint(), "boxscoresummaryv2");
///
/// let item = box_score.item_for(BoxScoreItem::TeamScoring, &conn).unwrap();
/// assert_eq!(item.name(), "sqlTeamsScoring");
/// assert_eq!(box_score.stat_type(), BoxScoreType::Scoring);
/// ```
pub struct Statistic<K: StatKind> {
    stat_type: K::Type,
    endpoint: String,
    fields: FieldMap,
    loaded: bool,
    loaded_revision: u64,
    response: Option<StatResponse>,
    loads: usize,
    kind: PhantomData<fn() -> K>,
}

impl<K: StatKind> Statistic<K> {
    /// Create an unloaded statistic of the default type.
    pub fn new(fields: FieldMap) -> Self {
        Self::with_type(K::DEFAULT_TYPE, fields)
    }

    /// Create an unloaded statistic of the given type.
    pub fn with_type(stat_type: K::Type, fields: FieldMap) -> Self {
        Self {
            stat_type,
            endpoint: endpoint_for::<K>(stat_type),
            fields,
            loaded: false,
            loaded_revision: 0,
            response: None,
            loads: 0,
            kind: PhantomData,
        }
    }

    /// The kind's base endpoint.
    pub fn identifier(&self) -> &'static str {
        K::IDENTIFIER
    }

    /// The endpoint of the active type.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The active type.
    pub fn stat_type(&self) -> K::Type {
        self.stat_type
    }

    /// Fields that must be present before loading.
    pub fn required_fields(&self) -> &'static [FieldType] {
        K::REQUIRED_FIELDS
    }

    /// The shared field map.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Required fields currently absent from the field map.
    pub fn missing_fields(&self) -> Vec<FieldType> {
        self.fields.missing(K::REQUIRED_FIELDS)
    }

    /// Select the active type.
    ///
    /// Always invalidates the cache, even when `stat_type` is already active.
    pub fn set_type(&mut self, stat_type: K::Type) {
        debug!(
            from = self.stat_type.description(),
            to = stat_type.description(),
            identifier = K::IDENTIFIER,
            "Switching statistic type"
        );
        self.stat_type = stat_type;
        self.endpoint = endpoint_for::<K>(stat_type);
        self.loaded = false;
    }

    /// Select the active type by its description.
    ///
    /// On `StatError::UnknownType` the type and endpoint are unchanged.
    pub fn set_type_str(&mut self, description: &str) -> Result<(), StatError> {
        let stat_type = K::Type::from_description(description)?;
        self.set_type(stat_type);
        Ok(())
    }

    /// Whether the cache matches the current type and field map.
    pub fn is_loaded(&self) -> bool {
        self.loaded && self.loaded_revision == self.fields.revision()
    }

    /// Load the response for the active type, unless the cache is current.
    ///
    /// # Errors
    ///
    /// * `StatError::MissingRequiredField` - required fields are absent; no
    ///   request is sent
    /// * `StatError::Transport` / `StatError::Parse` - from the connection or
    ///   the response decoder
    ///
    /// The statistic is left unloaded after any error, so the next call
    /// retries.
    pub fn load(&mut self, connection: &dyn Connection) -> Result<(), StatError> {
        if self.is_loaded() {
            debug!(endpoint = %self.endpoint, "Statistic already loaded");
            return Ok(());
        }
        self.loaded = false;

        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(StatError::MissingRequiredField {
                endpoint: self.endpoint.clone(),
                fields: missing,
            });
        }

        let revision = self.fields.revision();
        let query = Query::new(self.endpoint.clone(), self.fields.params());
        let response = connection
            .send(&query)
            .and_then(StatResponse::from_value)
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, error = %e, "Failed to load statistic");
                e
            })?;

        info!(
            endpoint = %self.endpoint,
            result_sets = response.result_sets.len(),
            "Loaded statistic"
        );
        self.response = Some(response);
        self.loaded = true;
        self.loaded_revision = revision;
        self.loads += 1;
        Ok(())
    }

    /// Drop the cache and load again.
    pub fn reload(&mut self, connection: &dyn Connection) -> Result<(), StatError> {
        self.loaded = false;
        self.load(connection)
    }

    /// The item at `index` of the loaded response.
    ///
    /// # Errors
    ///
    /// * `StatError::NotLoaded` - the cache is missing or stale
    /// * `StatError::IndexOutOfRange` - the response has no result set at `index`
    pub fn item(&self, index: usize) -> Result<StatItem<'_>, StatError> {
        let response = self.cached()?;
        response
            .result_sets
            .get(index)
            .map(|set| StatItem::new(index, set))
            .ok_or_else(|| StatError::IndexOutOfRange {
                endpoint: self.endpoint.clone(),
                index,
                available: response.result_sets.len(),
            })
    }

    /// Resolve an item by its `(type, index)` address.
    ///
    /// Switches to the item's type when another type is active, then loads
    /// if the cache is not current. When the type already matches and the
    /// cache is current, no request is sent.
    pub fn item_for(
        &mut self,
        item: K::Item,
        connection: &dyn Connection,
    ) -> Result<StatItem<'_>, StatError> {
        let (stat_type, index) = item.address();
        if stat_type != self.stat_type {
            self.set_type(stat_type);
        }
        self.load(connection)?;
        self.item(index)
    }

    /// Every item of the loaded response, in response order.
    pub fn items(&self) -> Result<Vec<StatItem<'_>>, StatError> {
        let response = self.cached()?;
        Ok(response
            .result_sets
            .iter()
            .enumerate()
            .map(|(index, set)| StatItem::new(index, set))
            .collect())
    }

    /// The cached response, if the cache is current.
    pub fn response(&self) -> Option<&StatResponse> {
        if self.is_loaded() {
            self.response.as_ref()
        } else {
            None
        }
    }

    /// Number of successful loads performed so far.
    pub fn load_count(&self) -> usize {
        self.loads
    }

    fn cached(&self) -> Result<&StatResponse, StatError> {
        self.response()
            .ok_or_else(|| StatError::NotLoaded(self.endpoint.clone()))
    }
}

fn endpoint_for<K: StatKind>(stat_type: K::Type) -> String {
    format!("{}{}", K::IDENTIFIER, stat_type.description())
}

impl<K: StatKind> fmt::Debug for Statistic<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statistic")
            .field("endpoint", &self.endpoint)
            .field("stat_type", &self.stat_type)
            .field("loaded", &self.is_loaded())
            .field("loads", &self.loads)
            .finish()
    }
}

/// Object-safe view of a statistic of any kind.
///
/// Elements store their statistics as `Box<dyn Resource>`; typed access
/// goes through `as_any` downcasting to `Statistic<K>`.
pub trait Resource: Any {
    /// The kind's base endpoint.
    fn identifier(&self) -> &'static str;

    /// The endpoint of the active type.
    fn endpoint(&self) -> &str;

    /// Description of the active type.
    fn type_description(&self) -> &'static str;

    /// Select the active type by its description.
    fn set_type_str(&mut self, description: &str) -> Result<(), StatError>;

    /// Fields that must be present before loading.
    fn required_fields(&self) -> &'static [FieldType];

    /// The shared field map.
    fn fields(&self) -> &FieldMap;

    /// Whether the cache is current.
    fn is_loaded(&self) -> bool;

    /// Load unless the cache is current.
    fn load(&mut self, connection: &dyn Connection) -> Result<(), StatError>;

    /// The item at `index` of the loaded response.
    fn item(&self, index: usize) -> Result<StatItem<'_>, StatError>;

    /// Number of successful loads performed so far.
    fn load_count(&self) -> usize;

    /// Borrow as `Any` for downcasting to `Statistic<K>`.
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow as `Any` for downcasting to `Statistic<K>`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<K: StatKind> Resource for Statistic<K> {
    fn identifier(&self) -> &'static str {
        K::IDENTIFIER
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn type_description(&self) -> &'static str {
        self.stat_type.description()
    }

    fn set_type_str(&mut self, description: &str) -> Result<(), StatError> {
        Statistic::set_type_str(self, description)
    }

    fn required_fields(&self) -> &'static [FieldType] {
        K::REQUIRED_FIELDS
    }

    fn fields(&self) -> &FieldMap {
        &self.fields
    }

    fn is_loaded(&self) -> bool {
        Statistic::is_loaded(self)
    }

    fn load(&mut self, connection: &dyn Connection) -> Result<(), StatError> {
        Statistic::load(self, connection)
    }

    fn item(&self, index: usize) -> Result<StatItem<'_>, StatError> {
        Statistic::item(self, index)
    }

    fn load_count(&self) -> usize {
        self.loads
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::FixtureConnection;
    use crate::stat_type::RoutingTable;
    use once_cell::sync::Lazy;
    use serde_json::{json, Value};
    use strum::{Display, EnumIter, EnumString, IntoStaticStr};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr, Display)]
    enum SplitType {
        #[strum(serialize = "home")]
        Home,
        #[strum(serialize = "road")]
        Road,
    }

    impl StatType for SplitType {
        const NAME: &'static str = "split";
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
    enum SplitItem {
        HomeOverall,
        HomeByMonth,
        RoadOverall,
    }

    impl ItemKind for SplitItem {
        type Type = SplitType;

        fn address(self) -> (SplitType, usize) {
            match self {
                SplitItem::HomeOverall => (SplitType::Home, 0),
                SplitItem::HomeByMonth => (SplitType::Home, 1),
                SplitItem::RoadOverall => (SplitType::Road, 0),
            }
        }

        fn routes() -> &'static RoutingTable<Self> {
            static ROUTES: Lazy<RoutingTable<SplitItem>> = Lazy::new(RoutingTable::build);
            &ROUTES
        }
    }

    struct Splits;

    impl StatKind for Splits {
        type Type = SplitType;
        type Item = SplitItem;
        const IDENTIFIER: &'static str = "splits";
        const REQUIRED_FIELDS: &'static [FieldType] = &[FieldType::TeamId, FieldType::Season];
        const DEFAULT_TYPE: SplitType = SplitType::Home;
    }

    fn body(names: &[&str]) -> Value {
        let sets: Vec<Value> = names
            .iter()
            .map(|name| json!({"name": name, "headers": ["X"], "rowSet": [[1]]}))
            .collect();
        json!({ "resultSets": sets })
    }

    fn fixture() -> FixtureConnection {
        FixtureConnection::new()
            .with_response("splitshome", body(&["HomeOverall", "HomeByMonth"]))
            .with_response("splitsroad", body(&["RoadOverall"]))
    }

    fn ready_fields() -> FieldMap {
        let fields = FieldMap::new();
        fields.set(FieldType::TeamId, 1610612744u64).unwrap();
        fields.set(FieldType::Season, "2015-16").unwrap();
        fields
    }

    #[test]
    fn test_new_is_unloaded() {
        let stat: Statistic<Splits> = Statistic::new(ready_fields());
        assert_eq!(stat.endpoint(), "splitshome");
        assert_eq!(stat.identifier(), "splits");
        assert!(!stat.is_loaded());
        assert_eq!(stat.load_count(), 0);
    }

    #[test]
    fn test_load_and_read() {
        let conn = fixture();
        let mut stat: Statistic<Splits> = Statistic::new(ready_fields());

        stat.load(&conn).unwrap();
        assert!(stat.is_loaded());
        assert_eq!(stat.item(1).unwrap().name(), "HomeByMonth");

        let query = &conn.requests()[0];
        assert_eq!(query.endpoint(), "splitshome");
        assert_eq!(query.param("TeamID"), Some("1610612744"));
        assert_eq!(query.param("Season"), Some("2015-16"));
    }

    #[test]
    fn test_load_is_idempotent() {
        let conn = fixture();
        let mut stat: Statistic<Splits> = Statistic::new(ready_fields());

        stat.load(&conn).unwrap();
        stat.load(&conn).unwrap();
        assert_eq!(stat.load_count(), 1);
        assert_eq!(conn.request_count(), 1);
    }

    #[test]
    fn test_missing_fields_block_request() {
        let conn = fixture();
        let fields = FieldMap::new();
        fields.set(FieldType::Season, "2015-16").unwrap();
        let mut stat: Statistic<Splits> = Statistic::new(fields);

        let err = stat.load(&conn).unwrap_err();
        assert_eq!(
            err,
            StatError::MissingRequiredField {
                endpoint: "splitshome".to_string(),
                fields: vec![FieldType::TeamId],
            }
        );
        assert!(!stat.is_loaded());
        assert_eq!(conn.request_count(), 0);
    }

    #[test]
    fn test_set_type_invalidates_even_when_unchanged() {
        let conn = fixture();
        let mut stat: Statistic<Splits> = Statistic::new(ready_fields());
        stat.load(&conn).unwrap();

        stat.set_type(SplitType::Home);
        assert!(!stat.is_loaded());
        assert!(matches!(stat.item(0), Err(StatError::NotLoaded(_))));
    }

    #[test]
    fn test_set_type_str() {
        let mut stat: Statistic<Splits> = Statistic::new(ready_fields());
        stat.set_type_str("road").unwrap();
        assert_eq!(stat.stat_type(), SplitType::Road);
        assert_eq!(stat.endpoint(), "splitsroad");

        let err = stat.set_type_str("neutral").unwrap_err();
        assert!(matches!(err, StatError::UnknownType { kind: "split", .. }));
        assert_eq!(stat.stat_type(), SplitType::Road);
        assert_eq!(stat.endpoint(), "splitsroad");
    }

    #[test]
    fn test_item_for_switches_type_once() {
        let conn = fixture();
        let mut stat: Statistic<Splits> = Statistic::new(ready_fields());

        assert_eq!(stat.item_for(SplitItem::HomeByMonth, &conn).unwrap().index(), 1);
        assert_eq!(stat.item_for(SplitItem::HomeOverall, &conn).unwrap().index(), 0);
        assert_eq!(stat.load_count(), 1);

        let item = stat.item_for(SplitItem::RoadOverall, &conn).unwrap();
        assert_eq!(item.name(), "RoadOverall");
        assert_eq!(stat.load_count(), 2);
        assert_eq!(conn.requests_for("splitsroad"), 1);
    }

    #[test]
    fn test_index_out_of_range() {
        let conn = fixture();
        let mut stat: Statistic<Splits> = Statistic::with_type(SplitType::Road, ready_fields());
        stat.load(&conn).unwrap();

        assert_eq!(
            stat.item(3).unwrap_err(),
            StatError::IndexOutOfRange {
                endpoint: "splitsroad".to_string(),
                index: 3,
                available: 1,
            }
        );
    }

    #[test]
    fn test_field_mutation_makes_cache_stale() {
        let conn = fixture();
        let fields = ready_fields();
        let mut stat: Statistic<Splits> = Statistic::new(fields.clone());
        stat.load(&conn).unwrap();

        fields.set(FieldType::Season, "2016-17").unwrap();
        assert!(!stat.is_loaded());
        assert!(stat.response().is_none());

        stat.load(&conn).unwrap();
        assert_eq!(stat.load_count(), 2);
        assert_eq!(conn.requests()[1].param("Season"), Some("2016-17"));
    }

    #[test]
    fn test_failed_load_can_retry() {
        let mut conn = FixtureConnection::new();
        let mut stat: Statistic<Splits> = Statistic::new(ready_fields());

        assert!(matches!(stat.load(&conn), Err(StatError::Transport(_))));
        assert!(!stat.is_loaded());

        conn.insert("splitshome", json!({"unexpected": true}));
        assert!(matches!(stat.load(&conn), Err(StatError::Parse(_))));
        assert!(!stat.is_loaded());

        conn.insert("splitshome", body(&["HomeOverall"]));
        stat.load(&conn).unwrap();
        assert!(stat.is_loaded());
        assert_eq!(stat.load_count(), 1);
    }

    #[test]
    fn test_reload_forces_request() {
        let conn = fixture();
        let mut stat: Statistic<Splits> = Statistic::new(ready_fields());
        stat.load(&conn).unwrap();
        stat.reload(&conn).unwrap();
        assert_eq!(conn.request_count(), 2);
    }

    #[test]
    fn test_items_lists_every_result_set() {
        let conn = fixture();
        let mut stat: Statistic<Splits> = Statistic::new(ready_fields());
        assert!(stat.items().is_err());

        stat.load(&conn).unwrap();
        let names: Vec<&str> = stat.items().unwrap().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["HomeOverall", "HomeByMonth"]);
    }

    #[test]
    fn test_resource_downcast() {
        let mut boxed: Box<dyn Resource> = Box::new(Statistic::<Splits>::new(ready_fields()));
        assert_eq!(boxed.type_description(), "home");
        boxed.set_type_str("road").unwrap();
        assert_eq!(boxed.endpoint(), "splitsroad");

        let typed = boxed
            .as_any_mut()
            .downcast_mut::<Statistic<Splits>>()
            .unwrap();
        assert_eq!(typed.stat_type(), SplitType::Road);
    }
}
