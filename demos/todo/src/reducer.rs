//! Reducer for the todos slice.

use crate::actions::TodoAction;
use crate::types::{Status, Todo, TodosState};
use stateflow_core::action::Action;
use stateflow_core::error::SliceError;
use stateflow_core::registry::SliceReducer;
use std::sync::Arc;

/// Reducer owning the `todos` slice
#[derive(Clone, Debug, Default)]
pub struct TodosReducer;

impl TodosReducer {
    /// Creates a new `TodosReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SliceReducer for TodosReducer {
    type Slice = TodosState;

    fn initial(&self) -> TodosState {
        TodosState::initial()
    }

    fn reduce(
        &self,
        slice: &TodosState,
        action: &dyn Action,
    ) -> Result<Option<TodosState>, SliceError> {
        let Some(action) = action.downcast_ref::<TodoAction>() else {
            return Ok(None);
        };

        match action {
            TodoAction::Add {
                id,
                content,
                created_at,
            } => {
                if content.trim().is_empty() {
                    return Err(SliceError::new("todo content cannot be empty"));
                }
                let mut todos = slice.todos.as_ref().clone();
                todos.push(Todo::new(id.clone(), content.clone(), *created_at));
                Ok(Some(TodosState {
                    todos: Arc::new(todos),
                    status: slice.status,
                    error: None,
                }))
            }

            TodoAction::Remove { id } => {
                let mut todos = slice.todos.as_ref().clone();
                todos.retain(|todo| &todo.id != id);
                Ok(Some(TodosState {
                    todos: Arc::new(todos),
                    status: slice.status,
                    error: None,
                }))
            }

            TodoAction::Load => Ok(Some(TodosState {
                todos: Arc::clone(&slice.todos),
                status: Status::Loading,
                error: slice.error.clone(),
            })),

            TodoAction::LoadSuccess { todos } => Ok(Some(TodosState {
                todos: Arc::new(todos.clone()),
                status: Status::Success,
                error: None,
            })),

            TodoAction::LoadFailure { error } => Ok(Some(TodosState {
                todos: Arc::clone(&slice.todos),
                status: Status::Error,
                error: Some(error.clone()),
            })),
        }
    }
}
