//! Selectors over the todos slice.

use crate::types::{Status, Todo, TodosState};
use stateflow_core::selector::{
    FeatureSelector, Selector, create_feature_selector, create_selector,
};
use std::sync::Arc;

/// Extracts the todos slice from the root state.
#[must_use]
pub fn select_todos_state() -> FeatureSelector<TodosState> {
    create_feature_selector::<TodosState>("todos")
}

/// The current todo list.
///
/// Projects the list's own `Arc`, so downstream memo cells see an unchanged
/// list as an unchanged input even when `status` or `error` moved.
#[must_use]
pub fn select_all_todos() -> impl Selector<Output = Arc<Vec<Todo>>> {
    create_selector((select_todos_state(),), |state: &Arc<TodosState>| {
        Arc::clone(&state.todos)
    })
}

/// The load lifecycle status.
#[must_use]
pub fn select_status() -> impl Selector<Output = Status> {
    create_selector((select_todos_state(),), |state: &Arc<TodosState>| {
        state.status
    })
}

/// The last load failure, `None` when the slice is clean.
#[must_use]
pub fn select_error() -> impl Selector<Output = Option<String>> {
    create_selector((select_todos_state(),), |state: &Arc<TodosState>| {
        state.error.clone()
    })
}

/// Number of todos.
#[must_use]
pub fn select_todo_count() -> impl Selector<Output = usize> {
    create_selector((select_all_todos(),), |todos: &Arc<Vec<Todo>>| todos.len())
}
