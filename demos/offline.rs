//! Offline example: resolve team dashboard items from canned responses
//!
//! This example demonstrates:
//! - Serving responses from a `FixtureConnection`
//! - Discovering items per dashboard type
//! - Type switching and cache reuse

use courtstat::team::{DashboardItem, DashboardType};
use courtstat::*;
use serde_json::json;
use strum::IntoEnumIterator;

fn main() -> Result<(), StatError> {
    tracing_subscriber::fmt().init();

    let conn = FixtureConnection::new()
        .with_response(
            "teamdashboardbygeneralsplits",
            json!({"resultSets": [
                {"name": "OverallTeamDashboard", "headers": ["GP", "W", "L"], "rowSet": [[82, 73, 9]]},
                {"name": "LocationTeamDashboard", "headers": ["TEAM_GAME_LOCATION", "W", "L"],
                 "rowSet": [["Home", 39, 2], ["Road", 34, 7]]}
            ]}),
        )
        .with_response(
            "teamdashboardbyclutch",
            json!({"resultSets": [
                {"name": "OverallTeamDashboard", "headers": ["W", "L"], "rowSet": [[73, 9]]},
                {"name": "Last5Min5PointTeamDashboard", "headers": ["W", "L"], "rowSet": [[31, 7]]}
            ]}),
        );

    println!("Dashboard items by type:");
    for ty in DashboardType::iter() {
        println!("  {:<16} {:?}", ty.description(), DashboardItem::items_of(ty));
    }

    let mut team = Team::for_season("1610612744", "2015-16");

    let location = team.dashboard_item(DashboardItem::Location, &conn)?;
    println!("\n=== {} ===", location.name());
    for record in location.records() {
        println!("  {:?}", record);
    }

    let overall = team.dashboard_item(DashboardItem::Overall, &conn)?;
    println!("\nOverall wins: {:?}", overall.get::<u32>(0, "W"));

    let clutch = team.dashboard_item(DashboardItem::Last5Min5Point, &conn)?;
    println!("Clutch record: {:?}-{:?}", clutch.get::<u32>(0, "W"), clutch.get::<u32>(0, "L"));

    println!("\nRequests sent: {}", conn.request_count());
    Ok(())
}
