//! Domain types and actions for the scoreboard example.

use serde::{Deserialize, Serialize};
use stateflow_core::action::{Action, ActionKind};
use std::any::Any;

/// Kind of [`ScoreboardAction::HomeScore`]
pub const HOME_SCORE: ActionKind = ActionKind::new("[Scoreboard Page] Home Score");
/// Kind of [`ScoreboardAction::AwayScore`]
pub const AWAY_SCORE: ActionKind = ActionKind::new("[Scoreboard Page] Away Score");
/// Kind of [`ScoreboardAction::ResetScore`]
pub const RESET_SCORE: ActionKind = ActionKind::new("[Scoreboard Page] Score Reset");
/// Kind of [`ScoreboardAction::SetScores`]
pub const SET_SCORES: ActionKind = ActionKind::new("[Scoreboard Page] Set Scores");

/// State of the game slice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreboardState {
    /// Home team score
    pub home: u32,
    /// Away team score
    pub away: u32,
}

impl ScoreboardState {
    /// Creates a scoreboard at the given scores
    #[must_use]
    pub const fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    /// Total points on the board
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.home + self.away
    }
}

/// Everything that can happen to the game slice
#[derive(Debug)]
pub enum ScoreboardAction {
    /// The home team scored
    HomeScore,
    /// The away team scored
    AwayScore,
    /// Start over at 0:0
    ResetScore,
    /// Overwrite both scores
    SetScores {
        /// The scores to show
        game: ScoreboardState,
    },
}

impl Action for ScoreboardAction {
    fn kind(&self) -> ActionKind {
        match self {
            Self::HomeScore => HOME_SCORE,
            Self::AwayScore => AWAY_SCORE,
            Self::ResetScore => RESET_SCORE,
            Self::SetScores { .. } => SET_SCORES,
        }
    }

    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }
}
