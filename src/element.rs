//! Elements and their features.
//!
//! An element (a team, a game) owns one field map and one statistic per
//! feature. The feature set is the element's feature enum: every variant
//! gets its statistic at construction, sharing the element's field map.

use crate::connection::Connection;
use crate::error::StatError;
use crate::field::{FieldMap, FieldType};
use crate::item::StatItem;
use crate::stat_type::StatKind;
use crate::statistic::{Resource, Statistic};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use strum::IntoEnumIterator;
use tracing::debug;

/// A capability of an element, backed by exactly one statistic.
pub trait Feature: Copy + Eq + Hash + Debug + IntoEnumIterator + 'static {
    /// Build the unloaded statistic for this feature over `fields`.
    fn build(self, fields: &FieldMap) -> Box<dyn Resource>;
}

/// A domain object owning a field map and one statistic per feature.
///
/// # Examples
///
/// ```rust
/// use courtstat::{Element, FieldType};
/// use courtstat::team::TeamFeature;
///
/// let team: Element<TeamFeature> = Element::new("1610612744", FieldType::TeamId);
/// assert_eq!(team.fields().get::<String>(FieldType::TeamId), Some("1610612744".to_string()));
///
/// let details = team.feature(TeamFeature::Details).unwrap();
/// assert_eq!(details.endpoint(), "teamdetails");
/// assert!(!details.is_loaded());
/// ```
pub struct Element<F: Feature> {
    id: String,
    fields: FieldMap,
    features: HashMap<F, Box<dyn Resource>>,
}

impl<F: Feature> Element<F> {
    /// Create an element and seed `id_field` with its identifier.
    ///
    /// Every feature's statistic is built immediately and left unloaded.
    pub fn new(id: impl Into<String>, id_field: FieldType) -> Self {
        let id = id.into();
        let fields = FieldMap::new();
        fields.set_value(id_field, Value::from(id.as_str()));

        let features: HashMap<F, Box<dyn Resource>> = F::iter()
            .map(|feature| (feature, feature.build(&fields)))
            .collect();
        debug!(%id, features = features.len(), "Created element");

        Self {
            id,
            fields,
            features,
        }
    }

    /// The element identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The field map shared by every feature.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Features of this element, in declaration order.
    pub fn features(&self) -> impl Iterator<Item = F> {
        F::iter()
    }

    /// The statistic registered for `feature`.
    pub fn feature(&self, feature: F) -> Result<&dyn Resource, StatError> {
        match self.features.get(&feature) {
            Some(resource) => Ok(resource.as_ref()),
            None => Err(unknown_feature(feature)),
        }
    }

    /// The statistic registered for `feature`, mutably.
    pub fn feature_mut(&mut self, feature: F) -> Result<&mut dyn Resource, StatError> {
        match self.features.get_mut(&feature) {
            Some(resource) => Ok(resource.as_mut()),
            None => Err(unknown_feature(feature)),
        }
    }

    /// The statistic of `feature` as its concrete kind.
    ///
    /// Fails with `StatError::UnknownFeature` if the feature is backed by
    /// another kind.
    pub fn statistic<K: StatKind>(&self, feature: F) -> Result<&Statistic<K>, StatError> {
        self.feature(feature)?
            .as_any()
            .downcast_ref::<Statistic<K>>()
            .ok_or_else(|| kind_mismatch::<F, K>(feature))
    }

    /// The statistic of `feature` as its concrete kind, mutably.
    pub fn statistic_mut<K: StatKind>(
        &mut self,
        feature: F,
    ) -> Result<&mut Statistic<K>, StatError> {
        self.feature_mut(feature)?
            .as_any_mut()
            .downcast_mut::<Statistic<K>>()
            .ok_or_else(|| kind_mismatch::<F, K>(feature))
    }

    /// Resolve an item of `feature` by its `(type, index)` address.
    ///
    /// May switch the statistic's type and load it; see
    /// `Statistic::item_for`.
    pub fn item<K: StatKind>(
        &mut self,
        feature: F,
        item: K::Item,
        connection: &dyn Connection,
    ) -> Result<StatItem<'_>, StatError> {
        self.statistic_mut::<K>(feature)?.item_for(item, connection)
    }

    /// Load the statistic of `feature`.
    pub fn load(&mut self, feature: F, connection: &dyn Connection) -> Result<(), StatError> {
        self.feature_mut(feature)?.load(connection)
    }

    /// Load every feature in declaration order, stopping at the first error.
    pub fn load_all(&mut self, connection: &dyn Connection) -> Result<(), StatError> {
        for feature in F::iter() {
            self.load(feature, connection)?;
        }
        Ok(())
    }

    /// Features whose required fields are all present.
    pub fn loadable_features(&self) -> Vec<F> {
        F::iter()
            .filter(|feature| {
                self.features.get(feature).is_some_and(|resource| {
                    self.fields.missing(resource.required_fields()).is_empty()
                })
            })
            .collect()
    }
}

fn unknown_feature<F: Debug>(feature: F) -> StatError {
    StatError::UnknownFeature(format!("{:?}", feature))
}

fn kind_mismatch<F: Debug, K: StatKind>(feature: F) -> StatError {
    StatError::UnknownFeature(format!(
        "{:?} is not backed by {}",
        feature,
        K::IDENTIFIER
    ))
}
