//! Actions for the todos slice.
//!
//! Kinds follow the `"[Category] Description"` convention: page actions are
//! user intents, API actions are the paired success/failure results of the
//! asynchronous load.

use crate::types::{Todo, TodoId};
use chrono::{DateTime, Utc};
use stateflow_core::action::{Action, ActionKind};
use std::any::Any;

/// Kind of [`TodoAction::Add`]
pub const ADD_TODO: ActionKind = ActionKind::new("[Todo Page] Add Todo");
/// Kind of [`TodoAction::Remove`]
pub const REMOVE_TODO: ActionKind = ActionKind::new("[Todo Page] Remove Todo");
/// Kind of [`TodoAction::Load`]
pub const LOAD_TODOS: ActionKind = ActionKind::new("[Todo Page] Load Todos");
/// Kind of [`TodoAction::LoadSuccess`]
pub const LOAD_TODOS_SUCCESS: ActionKind = ActionKind::new("[Todo API] Load Todos Success");
/// Kind of [`TodoAction::LoadFailure`]
pub const LOAD_TODOS_FAILURE: ActionKind = ActionKind::new("[Todo API] Load Todos Failure");

/// Everything that can happen to the todos slice
#[derive(Debug)]
pub enum TodoAction {
    /// Add a todo with the given content
    Add {
        /// Identifier, generated by [`TodoAction::add`]
        id: TodoId,
        /// What needs doing
        content: String,
        /// Creation time, captured by [`TodoAction::add`]
        created_at: DateTime<Utc>,
    },

    /// Remove a todo by id
    Remove {
        /// Todo to remove
        id: TodoId,
    },

    /// Start loading todos from the backing API
    Load,

    /// The load finished; replaces the whole list
    LoadSuccess {
        /// The fetched todos
        todos: Vec<Todo>,
    },

    /// The load failed
    LoadFailure {
        /// Description of the failure
        error: String,
    },
}

impl TodoAction {
    /// Creates an [`TodoAction::Add`] with a freshly generated id and
    /// timestamp.
    ///
    /// Ids and timestamps are captured here, not in the reducer, so
    /// replaying a recorded action sequence reproduces the same state.
    #[must_use]
    pub fn add(content: impl Into<String>) -> Self {
        Self::Add {
            id: TodoId::new(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Creates a [`TodoAction::LoadSuccess`].
    #[must_use]
    pub fn load_success(todos: Vec<Todo>) -> Self {
        Self::LoadSuccess { todos }
    }

    /// Creates a [`TodoAction::LoadFailure`].
    #[must_use]
    pub fn load_failure(error: impl Into<String>) -> Self {
        Self::LoadFailure {
            error: error.into(),
        }
    }
}

impl Action for TodoAction {
    fn kind(&self) -> ActionKind {
        match self {
            Self::Add { .. } => ADD_TODO,
            Self::Remove { .. } => REMOVE_TODO,
            Self::Load => LOAD_TODOS,
            Self::LoadSuccess { .. } => LOAD_TODOS_SUCCESS,
            Self::LoadFailure { .. } => LOAD_TODOS_FAILURE,
        }
    }

    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct() {
        let kinds = [
            ADD_TODO,
            REMOVE_TODO,
            LOAD_TODOS,
            LOAD_TODOS_SUCCESS,
            LOAD_TODOS_FAILURE,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn add_generates_fresh_ids() {
        let first = TodoAction::add("x");
        let second = TodoAction::add("x");
        match (first, second) {
            (TodoAction::Add { id: a, .. }, TodoAction::Add { id: b, .. }) => assert_ne!(a, b),
            _ => unreachable!(),
        }
    }
}
