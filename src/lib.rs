//! # courtstat - Lazy, Memoized Resolver for the NBA Stats API
//!
//! Models the stats API as typed domain objects whose data is fetched on
//! demand and cached:
//! - **Lazy** loading (nothing is fetched until an item is asked for)
//! - **Memoized** responses (a loaded statistic is reused until its type or
//!   fields change)
//! - **Type-aware** addressing (items name the response shape they live in,
//!   and the resolver switches shapes for you)
//!
//! ## Core Concepts
//!
//! ### Resolution Pipeline
//!
//! ```text
//! [Element] → [Feature] → [Statistic] → [StatItem]
//! ```
//!
//! 1. An **Element** (a `Team`, a `Game`) owns a shared `FieldMap`
//! 2. Each **Feature** of the element is backed by exactly one **Statistic**
//! 3. A **Statistic** targets one endpoint per **type** and caches its response
//! 4. A **StatItem** is one result set of that response, addressed by an
//!    item enum carrying `(type, index)`
//!
//! ### Key Features
//!
//! - **Shared Fields**: every statistic of an element reads the same field map
//! - **Validation**: required fields are checked before any request is sent
//! - **Invalidation**: type switches and field mutations mark the cache stale
//! - **Pluggable Transport**: any `Connection` works; `FixtureConnection` for
//!   offline use, `HttpConnection` with the `http` feature
//!
//! ## Example
//!
//! ```rust
//! use courtstat::*;
//! use courtstat::game::{BoxScoreItem, BoxScoreType};
//! use serde_json::json;
//!
//! let conn = FixtureConnection::new().with_response(
//!     "boxscoresummaryv2",
//!     json!({"resultSets": [
//!         {"name": "GameSummary", "headers": ["GAME_STATUS_TEXT"], "rowSet": [["Final"]]}
//!     ]}),
//! );
//!
//! let mut game = Game::for_season("0021500001", "2015-16", "Regular Season");
//! let summary = game.box_score_item(BoxScoreItem::GameSummary, &conn).unwrap();
//! assert_eq!(summary.get::<String>(0, "GAME_STATUS_TEXT").as_deref(), Some("Final"));
//!
//! // Same type: served from cache
//! let _ = game.box_score_item(BoxScoreItem::GameSummary, &conn).unwrap();
//! assert_eq!(conn.request_count(), 1);
//! assert_eq!(game.box_score().unwrap().stat_type(), BoxScoreType::Summary);
//! ```
//!
//! ## Modules
//!
//! - [`field`] - Field types and the shared field map
//! - [`stat_type`] - Statistic kinds, types, items and routing tables
//! - [`statistic`] - The cached statistic and the `Resource` trait
//! - [`item`] - Views into loaded result sets
//! - [`element`] - Elements and features
//! - [`team`] / [`game`] - Concrete elements and statistic kinds
//! - [`connection`] - Queries and connections
//! - [`config`] - HTTP connection settings
//! - [`response`] - Decoded responses
//! - [`error`] - Error types

pub mod config;
pub mod connection;
pub mod element;
pub mod error;
pub mod field;
pub mod game;
#[cfg(feature = "http")]
pub mod http;
pub mod item;
pub mod response;
pub mod stat_type;
pub mod statistic;
pub mod team;

// Re-export main types for convenience
pub use config::ConnectionConfig;
pub use connection::{Connection, FixtureConnection, Query};
pub use element::{Element, Feature};
pub use error::StatError;
pub use field::{FieldMap, FieldType};
pub use item::StatItem;
pub use response::{ResultSet, StatResponse};
pub use stat_type::{ItemKind, RoutingTable, SingleType, StatKind, StatType};
pub use statistic::{Resource, Statistic};

// Re-export concrete elements
pub use game::Game;
pub use team::Team;

#[cfg(feature = "http")]
pub use http::HttpConnection;
