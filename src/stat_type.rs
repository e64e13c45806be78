//! Statistic kinds, their types and item addressing.
//!
//! A statistic *kind* (box score, team dashboard, ...) names a base endpoint
//! and the fields it requires. Each kind has a *type* enum selecting one of
//! its response shapes, and an *item* enum addressing one result set of one
//! shape as a `(type, index)` pair.

use crate::error::StatError;
use crate::field::FieldType;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// A response-shape variant of a statistic kind.
///
/// The description is the endpoint suffix; `description` and
/// `from_description` are inverse over every variant.
///
/// # Examples
///
/// ```rust
/// use courtstat::StatType;
/// use courtstat::game::BoxScoreType;
///
/// assert_eq!(BoxScoreType::Traditional.description(), "traditionalv2");
/// assert_eq!(
///     BoxScoreType::from_description("scoringv2").unwrap(),
///     BoxScoreType::Scoring
/// );
/// assert!(BoxScoreType::from_description("bogus").is_err());
/// ```
pub trait StatType:
    Copy + Eq + Hash + Debug + IntoEnumIterator + FromStr + Into<&'static str> + 'static
{
    /// Human-readable kind name used in error messages.
    const NAME: &'static str;

    /// The endpoint suffix of this type.
    fn description(self) -> &'static str {
        self.into()
    }

    /// Look a type up by its description.
    fn from_description(description: &str) -> Result<Self, StatError> {
        description
            .parse::<Self>()
            .map_err(|_| StatError::UnknownType {
                kind: Self::NAME,
                value: description.to_string(),
            })
    }
}

/// An addressable result set of a statistic kind.
///
/// Each variant is routed to the type whose response contains it and the
/// position of its result set in that response.
pub trait ItemKind: Copy + Eq + Hash + Debug + IntoEnumIterator + 'static {
    /// The type enum of the owning kind.
    type Type: StatType;

    /// The `(type, index)` address of this item.
    fn address(self) -> (Self::Type, usize);

    /// The process-wide routing table of this item enum.
    fn routes() -> &'static RoutingTable<Self>;

    /// The type this item belongs to.
    fn stat_type(self) -> Self::Type {
        self.address().0
    }

    /// Position of this item's result set in its type's response.
    fn index(self) -> usize {
        self.address().1
    }

    /// Every item of `stat_type`, in declaration order.
    fn items_of(stat_type: Self::Type) -> &'static [Self] {
        Self::routes().items_of(stat_type)
    }
}

/// Item variants grouped by type.
///
/// Built once by partitioning every item variant by the type it declares.
/// Every type has an entry, possibly empty.
///
/// # Examples
///
/// ```rust
/// use courtstat::ItemKind;
/// use courtstat::game::{BoxScoreItem, BoxScoreType};
///
/// let scoring = BoxScoreItem::items_of(BoxScoreType::Scoring);
/// assert_eq!(
///     scoring,
///     &[BoxScoreItem::PlayersScoring, BoxScoreItem::TeamScoring]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RoutingTable<I: ItemKind> {
    groups: HashMap<I::Type, Vec<I>>,
}

impl<I: ItemKind> RoutingTable<I> {
    /// Partition every variant of `I` by its type.
    pub fn build() -> Self {
        let mut groups: HashMap<I::Type, Vec<I>> =
            I::Type::iter().map(|ty| (ty, Vec::new())).collect();
        for item in I::iter() {
            groups.entry(item.stat_type()).or_default().push(item);
        }
        Self { groups }
    }

    /// Items of `stat_type`, in declaration order.
    pub fn items_of(&self, stat_type: I::Type) -> &[I] {
        self.groups
            .get(&stat_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of item variants across all types.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Whether the table routes no items at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every index is used at most once within its type.
    pub fn has_unique_indexes(&self) -> bool {
        self.groups.values().all(|items| {
            let mut indexes: Vec<usize> = items.iter().map(|item| item.index()).collect();
            indexes.sort_unstable();
            indexes.windows(2).all(|pair| pair[0] != pair[1])
        })
    }
}

/// A statistic kind: base endpoint, required fields and addressing enums.
///
/// Kinds are zero-sized markers; `Statistic<K>` holds the state.
pub trait StatKind: 'static {
    /// Response-shape variants of this kind.
    type Type: StatType;

    /// Addressable result sets of this kind.
    type Item: ItemKind<Type = Self::Type>;

    /// Base endpoint; the active type's description is appended to it.
    const IDENTIFIER: &'static str;

    /// Fields that must be present before the statistic can load.
    const REQUIRED_FIELDS: &'static [FieldType];

    /// Type selected at construction.
    const DEFAULT_TYPE: Self::Type;
}

/// The type of kinds that have a single response shape.
///
/// Its description is empty, so the endpoint equals the kind's identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumString, IntoStaticStr, Display,
)]
pub enum SingleType {
    #[default]
    #[strum(serialize = "")]
    Base,
}

impl StatType for SingleType {
    const NAME: &'static str = "single";
}
