//! CLI demo for the scoreboard example.

use scoreboard::{ScoreboardAction, ScoreboardReducer, ScoreboardState, select_game};
use stateflow_runtime::StoreBuilder;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Scoreboard Example ===\n");

    let store = StoreBuilder::new()
        .with_slice("game", ScoreboardReducer::new())
        .build()?;

    let _sub = store.observe(select_game(), |game| {
        println!("score: {} - {}", game.home, game.away);
    });

    store.dispatch(ScoreboardAction::HomeScore)?;
    store.dispatch(ScoreboardAction::HomeScore)?;
    store.dispatch(ScoreboardAction::AwayScore)?;

    println!("\nOverwriting from the official feed...");
    store.dispatch(ScoreboardAction::SetScores {
        game: ScoreboardState::new(3, 2),
    })?;

    println!("\nNew game...");
    store.dispatch(ScoreboardAction::ResetScore)?;

    Ok(())
}
