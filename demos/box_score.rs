//! Box score example: fetch a game's box score from the live API
//!
//! This example demonstrates:
//! - Building an `HttpConnection` from configuration
//! - Resolving items across several box score types
//! - Reusing a loaded type without another request
//!
//! Run with `cargo run --example box_score --features http`.

use courtstat::game::BoxScoreItem;
use courtstat::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), StatError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let conn = HttpConnection::new(ConnectionConfig::default())?;
    let mut game = Game::for_season("0021500001", "2015-16", "Regular Season");

    println!("=== Line Score ===");
    let line_score = game.box_score_item(BoxScoreItem::LineScore, &conn)?;
    for record in line_score.records() {
        println!(
            "  {}: {}",
            record.get("TEAM_ABBREVIATION").cloned().unwrap_or_default(),
            record.get("PTS").cloned().unwrap_or_default()
        );
    }

    // Same type as the line score: served from cache
    let officials = game.box_score_item(BoxScoreItem::Officials, &conn)?;
    println!("\n{} officials", officials.len());

    println!("\n=== Player Scoring ===");
    let scoring = game.box_score_item(BoxScoreItem::PlayersScoring, &conn)?;
    for row in 0..scoring.len() {
        let name: Option<String> = scoring.get(row, "PLAYER_NAME");
        let pct: Option<f64> = scoring.get(row, "PCT_PTS_3PT");
        println!("  {:<25} {:.3}", name.unwrap_or_default(), pct.unwrap_or_default());
    }

    println!(
        "\nBox score loaded {} times",
        game.box_score()?.load_count()
    );

    Ok(())
}
