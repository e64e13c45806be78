//! Teams and their statistics.
//!
//! A `Team` is an element keyed by `TeamID`. Its dashboard has one
//! response shape per split family; every other feature has a single
//! shape.

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

/// Fields every team dashboard request carries.
const DASHBOARD_FIELDS: &[FieldType] = &[
    FieldType::TeamId,
    FieldType::Season,
    FieldType::SeasonType,
    FieldType::MeasureType,
    FieldType::PerMode,
    FieldType::PlusMinus,
    FieldType::PaceAdjust,
    FieldType::Rank,
    FieldType::Month,
    FieldType::OpponentTeamId,
    FieldType::Period,
    FieldType::LastNGames,
];

// Single-shape kinds

/// Result sets of the team details response, in response order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum TeamDetailsItem {
    Background,
    History,
    SocialSites,
    AwardsChampionships,
    AwardsConference,
    AwardsDivision,
    HallOfFame,
    Retired,
}

impl ItemKind for TeamDetailsItem {
    type Type = SingleType;

    fn address(self) -> (SingleType, usize) {
        (SingleType::Base, self as usize)
    }

    fn routes() -> &'static RoutingTable<Self> {
        static ROUTES: Lazy<RoutingTable<TeamDetailsItem>> = Lazy::new(RoutingTable::build);
        &ROUTES
    }
}

/// Franchise background, history and awards.
pub struct TeamDetails;

impl StatKind for TeamDetails {
    type Type = SingleType;
    type Item = TeamDetailsItem;
    const IDENTIFIER: &'static str = "teamdetails";
    const REQUIRED_FIELDS: &'static [FieldType] = &[FieldType::TeamId];
    const DEFAULT_TYPE: SingleType = SingleType::Base;
}

/// Result sets of the team summary response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum TeamSummaryItem {
    InfoCommon,
    SeasonRanks,
    AvailableSeasons,
}

impl ItemKind for TeamSummaryItem {
    type Type = SingleType;

    fn address(self) -> (SingleType, usize) {
        (SingleType::Base, self as usize)
    }

    fn routes() -> &'static RoutingTable<Self> {
        static ROUTES: Lazy<RoutingTable<TeamSummaryItem>> = Lazy::new(RoutingTable::build);
        &ROUTES
    }
}

/// Season summary: record, conference rank and league ranks.
pub struct TeamSummary;

impl StatKind for TeamSummary {
    type Type = SingleType;
    type Item = TeamSummaryItem;
    const IDENTIFIER: &'static str = "teaminfocommon";
    const REQUIRED_FIELDS: &'static [FieldType] = &[
        FieldType::TeamId,
        FieldType::LeagueId,
        FieldType::Season,
        FieldType::SeasonType,
    ];
    const DEFAULT_TYPE: SingleType = SingleType::Base;
}

/// Result sets of the roster response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum TeamRosterItem {
    Players,
    Coaches,
}

impl ItemKind for TeamRosterItem {
    type Type = SingleType;

    fn address(self) -> (SingleType, usize) {
        (SingleType::Base, self as usize)
    }

    fn routes() -> &'static RoutingTable<Self> {
        static ROUTES: Lazy<RoutingTable<TeamRosterItem>> = Lazy::new(RoutingTable::build);
        &ROUTES
    }
}

/// Players and coaches for one season.
pub struct TeamRoster;

impl StatKind for TeamRoster {
    type Type = SingleType;
    type Item = TeamRosterItem;
    const IDENTIFIER: &'static str = "commonteamroster";
    const REQUIRED_FIELDS: &'static [FieldType] = &[FieldType::TeamId, FieldType::Season];
    const DEFAULT_TYPE: SingleType = SingleType::Base;
}

/// The single result set of the year-by-year response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum TeamSeasonsItem {
    TeamStats,
}

impl ItemKind for TeamSeasonsItem {
    type Type = SingleType;

    fn address(self) -> (SingleType, usize) {
        (SingleType::Base, 0)
    }

    fn routes() -> &'static RoutingTable<Self> {
        static ROUTES: Lazy<RoutingTable<TeamSeasonsItem>> = Lazy::new(RoutingTable::build);
        &ROUTES
    }
}

/// Year-by-year team totals.
pub struct TeamSeasons;

impl StatKind for TeamSeasons {
    type Type = SingleType;
    type Item = TeamSeasonsItem;
    const IDENTIFIER: &'static str = "teamyearbyyearstats";
    const REQUIRED_FIELDS: &'static [FieldType] = &[
        FieldType::TeamId,
        FieldType::LeagueId,
        FieldType::PerMode,
        FieldType::SeasonType,
    ];
    const DEFAULT_TYPE: SingleType = SingleType::Base;
}

/// The single result set of the game log response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum TeamGameLogItem {
    Games,
}

impl ItemKind for TeamGameLogItem {
    type Type = SingleType;

    fn address(self) -> (SingleType, usize) {
        (SingleType::Base, 0)
    }

    fn routes() -> &'static RoutingTable<Self> {
        static ROUTES: Lazy<RoutingTable<TeamGameLogItem>> = Lazy::new(RoutingTable::build);
        &ROUTES
    }
}

/// Per-game log for one season.
pub struct TeamGameLog;

impl StatKind for TeamGameLog {
    type Type = SingleType;
    type Item = TeamGameLogItem;
    const IDENTIFIER: &'static str = "teamgamelog";
    const REQUIRED_FIELDS: &'static [FieldType] = &[
        FieldType::TeamId,
        FieldType::Season,
        FieldType::SeasonType,
    ];
    const DEFAULT_TYPE: SingleType = SingleType::Base;
}

/// Result sets of the lineups response: the team total, then each lineup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum TeamLineupsItem {
    Overall,
    Lineups,
}

impl ItemKind for TeamLineupsItem {
    type Type = SingleType;

    fn address(self) -> (SingleType, usize) {
        (SingleType::Base, self as usize)
    }

    fn routes() -> &'static RoutingTable<Self> {
        static ROUTES: Lazy<RoutingTable<TeamLineupsItem>> = Lazy::new(RoutingTable::build);
        &ROUTES
    }
}

/// Lineup combinations of `GroupQuantity` players.
pub struct TeamLineups;

impl StatKind for TeamLineups {
    type Type = SingleType;
    type Item = TeamLineupsItem;
    const IDENTIFIER: &'static str = "teamdashlineups";
    const REQUIRED_FIELDS: &'static [FieldType] = &[
        FieldType::TeamId,
        FieldType::Season,
        FieldType::SeasonType,
        FieldType::GroupQuantity,
        FieldType::MeasureType,
        FieldType::PerMode,
        FieldType::PlusMinus,
        FieldType::PaceAdjust,
        FieldType::Rank,
        FieldType::Month,
        FieldType::OpponentTeamId,
        FieldType::Period,
        FieldType::LastNGames,
    ];
    const DEFAULT_TYPE: SingleType = SingleType::Base;
}

// Dashboard

/// Dashboard split families. Each is a separate endpoint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumString, IntoStaticStr, Display,
)]
pub enum DashboardType {
    #[default]
    #[strum(serialize = "generalsplits")]
    General,
    #[strum(serialize = "gamesplits")]
    Game,
    #[strum(serialize = "shootingsplits")]
    Shooting,
    #[strum(serialize = "clutch")]
    Clutch,
    #[strum(serialize = "lastngames")]
    LastNGames,
    #[strum(serialize = "opponent")]
    Opponent,
    #[strum(serialize = "teamperformance")]
    TeamPerformance,
    #[strum(serialize = "yearoveryear")]
    YearOverYear,
}

impl StatType for DashboardType {
    const NAME: &'static str = "team dashboard";
}

/// Dashboard result sets, addressed by split family and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum DashboardItem {
    /// `generalsplits` result sets start here.
    Overall,
    Location,
    WinsLosses,
    Month,
    PrePostAllStar,
    DaysRest,

    /// `gamesplits` result sets start here.
    GameSplitsOverall,
    ByHalf,
    ByPeriod,
    ByScoreMargin,
    ByActualMargin,

    /// `shootingsplits` result sets start here.
    ShootingOverall,
    ShotDistance5Ft,
    ShotDistance8Ft,
    ShotArea,
    AssistedShot,
    ShotType,
    AssistedBy,

    /// `clutch` result sets start here.
    ClutchOverall,
    Last5Min5Point,
    Last3Min5Point,
    Last1Min5Point,
    Last30Sec3Point,
    Last10Sec3Point,

    /// `lastngames` result sets start here.
    LastNOverall,
    Last5Games,
    Last10Games,
    Last15Games,
    Last20Games,
    GameNumber,

    /// `opponent` result sets start here.
    OpponentOverall,
    Conference,
    Division,
    OpponentTeam,

    /// `teamperformance` result sets start here.
    PerformanceOverall,
    ScoreDifferential,
    PointsScored,
    PointsAgainst,

    /// `yearoveryear` result sets start here.
    YearOverYearOverall,
    BySeason,
}

impl ItemKind for DashboardItem {
    type Type = DashboardType;

    fn address(self) -> (DashboardType, usize) {
        use DashboardItem::*;
        use DashboardType as T;
        match self {
            Overall => (T::General, 0),
            Location => (T::General, 1),
            WinsLosses => (T::General, 2),
            Month => (T::General, 3),
            PrePostAllStar => (T::General, 4),
            DaysRest => (T::General, 5),
            GameSplitsOverall => (T::Game, 0),
            ByHalf => (T::Game, 1),
            ByPeriod => (T::Game, 2),
            ByScoreMargin => (T::Game, 3),
            ByActualMargin => (T::Game, 4),
            ShootingOverall => (T::Shooting, 0),
            ShotDistance5Ft => (T::Shooting, 1),
            ShotDistance8Ft => (T::Shooting, 2),
            ShotArea => (T::Shooting, 3),
            AssistedShot => (T::Shooting, 4),
            ShotType => (T::Shooting, 5),
            AssistedBy => (T::Shooting, 6),
            ClutchOverall => (T::Clutch, 0),
            Last5Min5Point => (T::Clutch, 1),
            Last3Min5Point => (T::Clutch, 2),
            Last1Min5Point => (T::Clutch, 3),
            Last30Sec3Point => (T::Clutch, 4),
            Last10Sec3Point => (T::Clutch, 5),
            LastNOverall => (T::LastNGames, 0),
            Last5Games => (T::LastNGames, 1),
            Last10Games => (T::LastNGames, 2),
            Last15Games => (T::LastNGames, 3),
            Last20Games => (T::LastNGames, 4),
            GameNumber => (T::LastNGames, 5),
            OpponentOverall => (T::Opponent, 0),
            Conference => (T::Opponent, 1),
            Division => (T::Opponent, 2),
            OpponentTeam => (T::Opponent, 3),
            PerformanceOverall => (T::TeamPerformance, 0),
            ScoreDifferential => (T::TeamPerformance, 1),
            PointsScored => (T::TeamPerformance, 2),
            PointsAgainst => (T::TeamPerformance, 3),
            YearOverYearOverall => (T::YearOverYear, 0),
            BySeason => (T::YearOverYear, 1),
        }
    }

    fn routes() -> &'static RoutingTable<Self> {
        static ROUTES: Lazy<RoutingTable<DashboardItem>> = Lazy::new(RoutingTable::build);
        &ROUTES
    }
}

/// Team dashboard splits. Defaults to the general splits.
pub struct TeamDashboard;

impl StatKind for TeamDashboard {
    type Type = DashboardType;
    type Item = DashboardItem;
    const IDENTIFIER: &'static str = "teamdashboardby";
    const REQUIRED_FIELDS: &'static [FieldType] = DASHBOARD_FIELDS;
    const DEFAULT_TYPE: DashboardType = DashboardType::General;
}

/// Features of a team.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr, Display,
)]
pub enum TeamFeature {
    #[strum(serialize = "details")]
    Details,
    #[strum(serialize = "summary")]
    Summary,
    #[strum(serialize = "roster")]
    Roster,
    #[strum(serialize = "seasons")]
    Seasons,
    #[strum(serialize = "gamelog")]
    GameLog,
    #[strum(serialize = "dashboard")]
    Dashboard,
    #[strum(serialize = "lineups")]
    Lineups,
}

impl Feature for TeamFeature {
    fn build(self, fields: &FieldMap) -> Box<dyn Resource> {
        let fields = fields.clone();
        match self {
            TeamFeature::Details => Box::new(Statistic::<TeamDetails>::new(fields)),
            TeamFeature::Summary => Box::new(Statistic::<TeamSummary>::new(fields)),
            TeamFeature::Roster => Box::new(Statistic::<TeamRoster>::new(fields)),
            TeamFeature::Seasons => Box::new(Statistic::<TeamSeasons>::new(fields)),
            TeamFeature::GameLog => Box::new(Statistic::<TeamGameLog>::new(fields)),
            TeamFeature::Dashboard => Box::new(Statistic::<TeamDashboard>::new(fields)),
            TeamFeature::Lineups => Box::new(Statistic::<TeamLineups>::new(fields)),
        }
    }
}

/// Field values that let every team feature load for `season`.
///
/// Regular season, per-game, base measures, no opponent or period filter,
/// five-man lineups.
pub fn season_defaults(season: &str) -> Vec<(FieldType, Value)> {
    vec![
        (FieldType::LeagueId, json!("00")),
        (FieldType::Season, json!(season)),
        (FieldType::SeasonType, json!("Regular Season")),
        (FieldType::PerMode, json!("PerGame")),
        (FieldType::MeasureType, json!("Base")),
        (FieldType::PlusMinus, json!("N")),
        (FieldType::PaceAdjust, json!("N")),
        (FieldType::Rank, json!("N")),
        (FieldType::Month, json!(0)),
        (FieldType::OpponentTeamId, json!(0)),
        (FieldType::Period, json!(0)),
        (FieldType::LastNGames, json!(0)),
        (FieldType::GroupQuantity, json!(5)),
    ]
}

/// A team element.
///
/// # Examples
///
/// ```rust
/// use courtstat::{FixtureConnection, Team};
/// use courtstat::team::{DashboardItem, DashboardType};
/// use serde_json::json;
///
/// let conn = FixtureConnection::new().with_response(
///     "teamdashboardbyclutch",
///     json!({"resultSets": [
///         {"name": "OverallTeamDashboard", "headers": ["W"], "rowSet": [[73]]},
///         {"name": "Last5Min5PointTeamDashboard", "headers": ["W"], "rowSet": [[31]]}
///     ]}),
/// );
///
/// let mut team = Team::for_season("1610612744", "2015-16");
/// let clutch = team.dashboard_item(DashboardItem::Last5Min5Point, &conn).unwrap();
/// assert_eq!(clutch.get::<u32>(0, "W"), Some(31));
/// assert_eq!(team.dashboard().unwrap().stat_type(), DashboardType::Clutch);
/// ```
pub struct Team {
    element: Element<TeamFeature>,
}

impl Team {
    /// Create a team with only its id set.
    pub fn new(team_id: impl Into<String>) -> Self {
        Self {
            element: Element::new(team_id, FieldType::TeamId),
        }
    }

    /// Create a team with `season_defaults` applied.
    pub fn for_season(team_id: impl Into<String>, season: &str) -> Self {
        let team = Self::new(team_id);
        for (field, value) in season_defaults(season) {
            if !team.fields().contains(field) {
                team.fields().set_value(field, value);
            }
        }
        team
    }

    /// The dashboard statistic.
    pub fn dashboard(&self) -> Result<&Statistic<TeamDashboard>, StatError> {
        self.element.statistic::<TeamDashboard>(TeamFeature::Dashboard)
    }

    /// The dashboard statistic, mutably.
    pub fn dashboard_mut(&mut self) -> Result<&mut Statistic<TeamDashboard>, StatError> {
        self.element
            .statistic_mut::<TeamDashboard>(TeamFeature::Dashboard)
    }

    /// Switch the dashboard to `stat_type` and load it.
    pub fn dashboard_of(
        &mut self,
        stat_type: DashboardType,
        connection: &dyn Connection,
    ) -> Result<&mut Statistic<TeamDashboard>, StatError> {
        let dashboard = self.dashboard_mut()?;
        dashboard.set_type(stat_type);
        dashboard.load(connection)?;
        Ok(dashboard)
    }

    /// Resolve one dashboard result set, switching split family if needed.
    pub fn dashboard_item(
        &mut self,
        item: DashboardItem,
        connection: &dyn Connection,
    ) -> Result<StatItem<'_>, StatError> {
        self.element
            .item::<TeamDashboard>(TeamFeature::Dashboard, item, connection)
    }

    /// Resolve one roster result set.
    pub fn roster_item(
        &mut self,
        item: TeamRosterItem,
        connection: &dyn Connection,
    ) -> Result<StatItem<'_>, StatError> {
        self.element
            .item::<TeamRoster>(TeamFeature::Roster, item, connection)
    }

    /// The season's game log.
    pub fn game_log(&mut self, connection: &dyn Connection) -> Result<StatItem<'_>, StatError> {
        self.element
            .item::<TeamGameLog>(TeamFeature::GameLog, TeamGameLogItem::Games, connection)
    }
}

impl Deref for Team {
    type Target = Element<TeamFeature>;

    fn deref(&self) -> &Self::Target {
        &self.element
    }
}

impl DerefMut for Team {
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
            .map(|name| json!({"name": name, "headers": ["TEAM_ID"], "rowSet": [[1610612744]]}))
            .collect();
        json!({ "resultSets": sets })
    }

    #[test]
    fn test_dashboard_type_round_trip() {
        for ty in DashboardType::iter() {
            assert_eq!(DashboardType::from_description(ty.description()).unwrap(), ty);
        }
    }

    #[test]
    fn test_dashboard_partition() {
        let mut seen = HashSet::new();
        for ty in DashboardType::iter() {
            let items = DashboardItem::items_of(ty);
            assert!(!items.is_empty(), "{:?} has no items", ty);
            for item in items {
                assert!(seen.insert(*item));
            }
        }
        assert_eq!(seen.len(), DashboardItem::iter().count());
        assert!(DashboardItem::routes().has_unique_indexes());
    }

    #[test]
    fn test_single_shape_indexes_follow_declaration() {
        assert_eq!(TeamDetailsItem::Retired.index(), 7);
        assert_eq!(TeamSummaryItem::AvailableSeasons.index(), 2);
        assert_eq!(TeamRosterItem::Coaches.index(), 1);
        assert_eq!(TeamLineupsItem::Lineups.index(), 1);
        assert!(TeamDetailsItem::routes().has_unique_indexes());
        assert_eq!(TeamDetailsItem::items_of(SingleType::Base).len(), 8);
    }

    #[test]
    fn test_feature_endpoints() {
        let team = Team::new("1610612744");
        let endpoints: Vec<&str> = team
            .features()
            .map(|f| team.feature(f).unwrap().endpoint())
            .collect();
        assert_eq!(
            endpoints,
            vec![
                "teamdetails",
                "teaminfocommon",
                "commonteamroster",
                "teamyearbyyearstats",
                "teamgamelog",
                "teamdashboardbygeneralsplits",
                "teamdashlineups",
            ]
        );
    }

    #[test]
    fn test_new_team_only_details_loadable() {
        let team = Team::new("1610612744");
        assert_eq!(team.loadable_features(), vec![TeamFeature::Details]);

        let team = Team::for_season("1610612744", "2015-16");
        assert_eq!(team.loadable_features().len(), 7);
    }

    #[test]
    fn test_dashboard_item_reuses_loaded_type() {
        let conn = FixtureConnection::new()
            .with_response(
                "teamdashboardbygeneralsplits",
                sets(&["Overall", "Location", "WinsLosses", "Month", "PrePostAllStar", "DaysRest"]),
            )
            .with_response("teamdashboardbyopponent", sets(&["Overall", "Conference"]));
        let mut team = Team::for_season("1610612744", "2015-16");

        assert_eq!(team.dashboard_item(DashboardItem::Month, &conn).unwrap().index(), 3);
        assert_eq!(team.dashboard_item(DashboardItem::DaysRest, &conn).unwrap().index(), 5);
        assert_eq!(conn.request_count(), 1);

        assert_eq!(
            team.dashboard_item(DashboardItem::Conference, &conn).unwrap().name(),
            "Conference"
        );
        assert_eq!(conn.request_count(), 2);

        let err = team.dashboard_item(DashboardItem::OpponentTeam, &conn).unwrap_err();
        assert!(matches!(err, StatError::IndexOutOfRange { index: 3, available: 2, .. }));
        assert_eq!(conn.request_count(), 2);
    }

    #[test]
    fn test_dashboard_of_by_description() {
        let conn = FixtureConnection::new()
            .with_response("teamdashboardbyyearoveryear", sets(&["Overall", "BySeason"]));
        let mut team = Team::for_season("1610612744", "2015-16");

        team.feature_mut(TeamFeature::Dashboard)
            .unwrap()
            .set_type_str("yearoveryear")
            .unwrap();
        assert_eq!(team.dashboard().unwrap().stat_type(), DashboardType::YearOverYear);

        let stat = team.dashboard_of(DashboardType::YearOverYear, &conn).unwrap();
        assert_eq!(stat.item(1).unwrap().name(), "BySeason");
    }

    #[test]
    fn test_roster_and_game_log_share_fields() {
        let conn = FixtureConnection::new()
            .with_response("commonteamroster", sets(&["CommonTeamRoster", "Coaches"]))
            .with_response("teamgamelog", sets(&["TeamGameLog"]));
        let mut team = Team::for_season("1610612744", "2015-16");

        assert_eq!(
            team.roster_item(TeamRosterItem::Coaches, &conn).unwrap().name(),
            "Coaches"
        );
        assert_eq!(team.game_log(&conn).unwrap().name(), "TeamGameLog");

        for query in conn.requests() {
            assert_eq!(query.param("TeamID"), Some("1610612744"));
            assert_eq!(query.param("Season"), Some("2015-16"));
        }
    }
}
