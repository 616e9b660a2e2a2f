//! Scoreboard example: a minimal synchronous slice.

pub mod reducer;
pub mod types;

pub use reducer::ScoreboardReducer;
pub use types::{ScoreboardAction, ScoreboardState};

use stateflow_core::selector::{
    FeatureSelector, MemoEq, Selector, create_feature_selector, create_selector,
};
use std::sync::Arc;

impl MemoEq for ScoreboardState {
    fn memo_eq(&self, prior: &Self) -> bool {
        self == prior
    }
}

/// Extracts the game slice from the root state.
#[must_use]
pub fn select_game() -> FeatureSelector<ScoreboardState> {
    create_feature_selector::<ScoreboardState>("game")
}

/// Total points on the board.
#[must_use]
pub fn select_total() -> impl Selector<Output = u32> {
    create_selector((select_game(),), |game: &Arc<ScoreboardState>| game.total())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;
    use stateflow_core::registry::ReducerRegistry;

    #[test]
    fn total_tracks_both_teams() {
        let mut registry = ReducerRegistry::new();
        registry.register("game", ScoreboardReducer::new()).unwrap();
        let root = registry.compose_root();

        let total = select_total();
        let mut state = root.initial_state();
        assert_eq!(total.select(&state).unwrap(), 0);

        state = root.reduce(&state, &ScoreboardAction::HomeScore).unwrap();
        state = root.reduce(&state, &ScoreboardAction::AwayScore).unwrap();
        assert_eq!(total.select(&state).unwrap(), 2);
    }
}
