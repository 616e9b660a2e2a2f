//! Reducer for the game slice.

use crate::types::{ScoreboardAction, ScoreboardState};
use stateflow_core::action::Action;
use stateflow_core::error::SliceError;
use stateflow_core::registry::SliceReducer;

/// Reducer owning the `game` slice
#[derive(Clone, Debug, Default)]
pub struct ScoreboardReducer;

impl ScoreboardReducer {
    /// Creates a new `ScoreboardReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SliceReducer for ScoreboardReducer {
    type Slice = ScoreboardState;

    fn initial(&self) -> ScoreboardState {
        ScoreboardState::default()
    }

    fn reduce(
        &self,
        slice: &ScoreboardState,
        action: &dyn Action,
    ) -> Result<Option<ScoreboardState>, SliceError> {
        let Some(action) = action.downcast_ref::<ScoreboardAction>() else {
            return Ok(None);
        };

        match action {
            ScoreboardAction::HomeScore => Ok(Some(ScoreboardState {
                home: slice.home + 1,
                away: slice.away,
            })),
            ScoreboardAction::AwayScore => Ok(Some(ScoreboardState {
                home: slice.home,
                away: slice.away + 1,
            })),
            ScoreboardAction::ResetScore => Ok(Some(ScoreboardState::default())),
            ScoreboardAction::SetScores { game } => Ok(Some(*game)),
        }
    }
}
