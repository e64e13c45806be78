//! Games and their statistics.
//!
//! A `Game` is an element keyed by `GameID` with two features: the box
//! score, which has one response shape per box score type, and the
//! play-by-play log.

use crate::connection::Connection;
use crate::element::{Element, Feature};
use crate::error::StatError;
use crate::field::{FieldMap, FieldType};
use crate::item::StatItem;
use crate::stat_type::{ItemKind, RoutingTable, SingleType, StatKind, StatType};
use crate::statistic::{Resource, Statistic};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::ops::{Deref, DerefMut};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Box score variants. Each selects a distinct endpoint and response shape.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumString, IntoStaticStr, Display,
)]
pub enum BoxScoreType {
    #[default]
    #[strum(serialize = "summaryv2")]
    Summary,
    #[strum(serialize = "traditionalv2")]
    Traditional,
    #[strum(serialize = "scoringv2")]
    Scoring,
    #[strum(serialize = "advancedv2")]
    Advanced,
    #[strum(serialize = "miscv2")]
    Misc,
    #[strum(serialize = "usagev2")]
    Usage,
    #[strum(serialize = "fourfactorsv2")]
    FourFactors,
}

impl StatType for BoxScoreType {
    const NAME: &'static str = "box score";
}

/// Result sets of the box score, addressed by type and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum BoxScoreItem {
    /// `summaryv2` result sets start here.
    GameSummary,
    OtherStats,
    Officials,
    InactivePlayers,
    GameInfo,
    LineScore,
    LastMeeting,
    SeasonSeries,
    AvailableVideo,

    /// `traditionalv2` result sets start here.
    PlayerStats,
    TeamStats,
    TeamStarterBenchStats,

    /// `scoringv2` result sets start here.
    PlayersScoring,
    TeamScoring,

    /// `usagev2` result sets start here.
    PlayersUsage,
    TeamUsage,

    /// `advancedv2` result sets start here.
    PlayersAdvanced,
    TeamAdvanced,

    /// `miscv2` result sets start here.
    PlayersMisc,
    TeamMisc,

    /// `fourfactorsv2` result sets start here.
    PlayersFourFactors,
    TeamFourFactors,
}

impl ItemKind for BoxScoreItem {
    type Type = BoxScoreType;

    fn address(self) -> (BoxScoreType, usize) {
        use BoxScoreItem::*;
        use BoxScoreType as T;
        match self {
            GameSummary => (T::Summary, 0),
            OtherStats => (T::Summary, 1),
            Officials => (T::Summary, 2),
            InactivePlayers => (T::Summary, 3),
            GameInfo => (T::Summary, 4),
            LineScore => (T::Summary, 5),
            LastMeeting => (T::Summary, 6),
            SeasonSeries => (T::Summary, 7),
            AvailableVideo => (T::Summary, 8),
            PlayerStats => (T::Traditional, 0),
            TeamStats => (T::Traditional, 1),
            TeamStarterBenchStats => (T::Traditional, 2),
            PlayersScoring => (T::Scoring, 0),
            TeamScoring => (T::Scoring, 1),
            PlayersUsage => (T::Usage, 0),
            TeamUsage => (T::Usage, 1),
            PlayersAdvanced => (T::Advanced, 0),
            TeamAdvanced => (T::Advanced, 1),
            PlayersMisc => (T::Misc, 0),
            TeamMisc => (T::Misc, 1),
            PlayersFourFactors => (T::FourFactors, 0),
            TeamFourFactors => (T::FourFactors, 1),
        }
    }

    fn routes() -> &'static RoutingTable<Self> {
        static ROUTES: Lazy<RoutingTable<BoxScoreItem>> = Lazy::new(RoutingTable::build);
        &ROUTES
    }
}

/// The box score of a game.
///
/// Requires the game id, season, season type and the period/range window.
/// Defaults to the summary type.
pub struct BoxScore;

impl StatKind for BoxScore {
    type Type = BoxScoreType;
    type Item = BoxScoreItem;
    const IDENTIFIER: &'static str = "boxscore";
    const REQUIRED_FIELDS: &'static [FieldType] = &[
        FieldType::GameId,
        FieldType::Season,
        FieldType::SeasonType,
        FieldType::RangeType,
        FieldType::StartPeriod,
        FieldType::EndPeriod,
        FieldType::StartRange,
        FieldType::EndRange,
    ];
    const DEFAULT_TYPE: BoxScoreType = BoxScoreType::Summary;
}

/// Result sets of the play-by-play log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum PlayByPlayItem {
    /// One row per event.
    PlayByPlay,
    /// Whether video exists for the game.
    AvailableVideo,
}

impl ItemKind for PlayByPlayItem {
    type Type = SingleType;

    fn address(self) -> (SingleType, usize) {
        match self {
            PlayByPlayItem::PlayByPlay => (SingleType::Base, 0),
            PlayByPlayItem::AvailableVideo => (SingleType::Base, 1),
        }
    }

    fn routes() -> &'static RoutingTable<Self> {
        static ROUTES: Lazy<RoutingTable<PlayByPlayItem>> = Lazy::new(RoutingTable::build);
        &ROUTES
    }
}

/// The play-by-play log of a game.
pub struct PlayByPlay;

impl StatKind for PlayByPlay {
    type Type = SingleType;
    type Item = PlayByPlayItem;
    const IDENTIFIER: &'static str = "playbyplayv2";
    const REQUIRED_FIELDS: &'static [FieldType] = &[
        FieldType::GameId,
        FieldType::StartPeriod,
        FieldType::EndPeriod,
    ];
    const DEFAULT_TYPE: SingleType = SingleType::Base;
}

/// Features of a game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr, Display,
)]
pub enum GameFeature {
    #[strum(serialize = "boxscore")]
    BoxScore,
    #[strum(serialize = "playbyplay")]
    PlayByPlay,
}

impl Feature for GameFeature {
    fn build(self, fields: &FieldMap) -> Box<dyn Resource> {
        match self {
            GameFeature::BoxScore => Box::new(Statistic::<BoxScore>::new(fields.clone())),
            GameFeature::PlayByPlay => Box::new(Statistic::<PlayByPlay>::new(fields.clone())),
        }
    }
}

/// Field values covering a full game for the box score and play-by-play.
///
/// Range type 0 with periods 1 to 10 and ranges 0 to 28800 asks for the
/// whole game, overtimes included.
pub fn box_score_defaults(game_id: &str, season: &str, season_type: &str) -> Vec<(FieldType, Value)> {
    vec![
        (FieldType::GameId, json!(game_id)),
        (FieldType::Season, json!(season)),
        (FieldType::SeasonType, json!(season_type)),
        (FieldType::RangeType, json!(0)),
        (FieldType::StartPeriod, json!(1)),
        (FieldType::EndPeriod, json!(10)),
        (FieldType::StartRange, json!(0)),
        (FieldType::EndRange, json!(28800)),
    ]
}

/// A game element.
///
/// # Examples
///
/// ```rust
/// use courtstat::{FixtureConnection, Game};
/// use courtstat::game::{BoxScoreItem, BoxScoreType};
/// use serde_json::json;
///
/// let conn = FixtureConnection::new().with_response(
///     "boxscoretraditionalv2",
///     json!({"resultSets": [
///         {"name": "PlayerStats", "headers": ["PLAYER_NAME"], "rowSet": [["Stephen Curry"]]},
///         {"name": "TeamStats", "headers": [], "rowSet": []},
///         {"name": "TeamStarterBenchStats", "headers": [], "rowSet": []}
///     ]}),
/// );
///
/// let mut game = Game::for_season("0021500001", "2015-16", "Regular Season");
/// let players = game.box_score_item(BoxScoreItem::PlayerStats, &conn).unwrap();
/// assert_eq!(players.get::<String>(0, "PLAYER_NAME").as_deref(), Some("Stephen Curry"));
/// assert_eq!(game.box_score().unwrap().stat_type(), BoxScoreType::Traditional);
/// ```
pub struct Game {
    element: Element<GameFeature>,
}

impl Game {
    /// Create a game with only its id set.
    pub fn new(game_id: impl Into<String>) -> Self {
        Self {
            element: Element::new(game_id, FieldType::GameId),
        }
    }

    /// Create a game with the full-game window of `box_score_defaults`.
    pub fn for_season(game_id: impl Into<String>, season: &str, season_type: &str) -> Self {
        let game = Self::new(game_id);
        for (field, value) in box_score_defaults(game.id(), season, season_type) {
            if !game.fields().contains(field) {
                game.fields().set_value(field, value);
            }
        }
        game
    }

    /// The box score statistic.
    pub fn box_score(&self) -> Result<&Statistic<BoxScore>, StatError> {
        self.element.statistic::<BoxScore>(GameFeature::BoxScore)
    }

    /// The box score statistic, mutably.
    pub fn box_score_mut(&mut self) -> Result<&mut Statistic<BoxScore>, StatError> {
        self.element.statistic_mut::<BoxScore>(GameFeature::BoxScore)
    }

    /// Switch the box score to `stat_type` and load it.
    pub fn box_score_of(
        &mut self,
        stat_type: BoxScoreType,
        connection: &dyn Connection,
    ) -> Result<&mut Statistic<BoxScore>, StatError> {
        let box_score = self.box_score_mut()?;
        box_score.set_type(stat_type);
        box_score.load(connection)?;
        Ok(box_score)
    }

    /// Resolve one box score result set, switching type if needed.
    pub fn box_score_item(
        &mut self,
        item: BoxScoreItem,
        connection: &dyn Connection,
    ) -> Result<StatItem<'_>, StatError> {
        self.element
            .item::<BoxScore>(GameFeature::BoxScore, item, connection)
    }

    /// Resolve one play-by-play result set.
    pub fn play_by_play_item(
        &mut self,
        item: PlayByPlayItem,
        connection: &dyn Connection,
    ) -> Result<StatItem<'_>, StatError> {
        self.element
            .item::<PlayByPlay>(GameFeature::PlayByPlay, item, connection)
    }
}

impl Deref for Game {
    type Target = Element<GameFeature>;

    fn deref(&self) -> &Self::Target {
        &self.element
    }
}

impl DerefMut for Game {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::FixtureConnection;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    fn sets(names: &[&str]) -> Value {
        let sets: Vec<Value> = names
            .iter()
            .map(|name| json!({"name": name, "headers": ["GAME_ID"], "rowSet": [["0021500001"]]}))
            .collect();
        json!({ "resultSets": sets })
    }

    #[test]
    fn test_box_score_type_round_trip() {
        for ty in BoxScoreType::iter() {
            assert_eq!(BoxScoreType::from_description(ty.description()).unwrap(), ty);
        }
        assert!(BoxScoreType::from_description("hustlev2").is_err());
    }

    #[test]
    fn test_box_score_partition_complete_and_disjoint() {
        let routes = BoxScoreItem::routes();
        let mut seen = HashSet::new();
        for ty in BoxScoreType::iter() {
            for item in BoxScoreItem::items_of(ty) {
                assert_eq!(item.stat_type(), ty);
                assert!(seen.insert(*item), "{:?} routed twice", item);
            }
        }
        assert_eq!(seen.len(), BoxScoreItem::iter().count());
        assert_eq!(routes.len(), 22);
        assert!(routes.has_unique_indexes());
        assert_eq!(BoxScoreItem::items_of(BoxScoreType::Summary).len(), 9);
    }

    #[test]
    fn test_box_score_endpoints() {
        let fields = FieldMap::new();
        let mut stat: Statistic<BoxScore> = Statistic::new(fields);
        assert_eq!(stat.endpoint(), "boxscoresummaryv2");
        stat.set_type(BoxScoreType::FourFactors);
        assert_eq!(stat.endpoint(), "boxscorefourfactorsv2");
    }

    #[test]
    fn test_for_season_fills_required_fields() {
        let game = Game::for_season("0021500001", "2015-16", "Regular Season");
        assert!(game.box_score().unwrap().missing_fields().is_empty());
        assert_eq!(
            game.fields().get::<String>(FieldType::GameId).as_deref(),
            Some("0021500001")
        );
        assert_eq!(
            game.loadable_features(),
            vec![GameFeature::BoxScore, GameFeature::PlayByPlay]
        );
    }

    #[test]
    fn test_new_game_cannot_load_box_score() {
        let conn = FixtureConnection::new();
        let mut game = Game::new("0021500001");
        let err = game
            .box_score_item(BoxScoreItem::GameSummary, &conn)
            .unwrap_err();
        match err {
            StatError::MissingRequiredField { fields, .. } => {
                assert_eq!(fields.len(), 7);
                assert!(!fields.contains(&FieldType::GameId));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(conn.request_count(), 0);
    }

    #[test]
    fn test_box_score_item_switches_types() {
        let conn = FixtureConnection::new()
            .with_response(
                "boxscoresummaryv2",
                sets(&[
                    "GameSummary",
                    "OtherStats",
                    "Officials",
                    "InactivePlayers",
                    "GameInfo",
                    "LineScore",
                    "LastMeeting",
                    "SeasonSeries",
                    "AvailableVideo",
                ]),
            )
            .with_response("boxscoremiscv2", sets(&["sqlPlayersMisc", "sqlTeamsMisc"]));

        let mut game = Game::for_season("0021500001", "2015-16", "Regular Season");
        assert_eq!(
            game.box_score_item(BoxScoreItem::LineScore, &conn).unwrap().name(),
            "LineScore"
        );
        assert_eq!(
            game.box_score_item(BoxScoreItem::Officials, &conn).unwrap().name(),
            "Officials"
        );
        assert_eq!(
            game.box_score_item(BoxScoreItem::TeamMisc, &conn).unwrap().name(),
            "sqlTeamsMisc"
        );
        assert_eq!(conn.requests_for("boxscoresummaryv2"), 1);
        assert_eq!(conn.requests_for("boxscoremiscv2"), 1);
        assert_eq!(game.box_score().unwrap().load_count(), 2);
    }

    #[test]
    fn test_box_score_of_loads_requested_type() {
        let conn = FixtureConnection::new()
            .with_response("boxscoreusagev2", sets(&["sqlPlayersUsage", "sqlTeamsUsage"]));
        let mut game = Game::for_season("0021500001", "2015-16", "Playoffs");

        let stat = game.box_score_of(BoxScoreType::Usage, &conn).unwrap();
        assert!(stat.is_loaded());
        assert_eq!(stat.item(1).unwrap().name(), "sqlTeamsUsage");
        assert_eq!(conn.requests()[0].param("SeasonType"), Some("Playoffs"));
    }

    #[test]
    fn test_play_by_play() {
        let conn = FixtureConnection::new()
            .with_response("playbyplayv2", sets(&["PlayByPlay", "AvailableVideo"]));
        let mut game = Game::for_season("0021500001", "2015-16", "Regular Season");

        let item = game
            .play_by_play_item(PlayByPlayItem::AvailableVideo, &conn)
            .unwrap();
        assert_eq!(item.index(), 1);
        assert_eq!(item.name(), "AvailableVideo");
    }
}
