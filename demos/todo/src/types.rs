//! Domain types for the todo example.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a todo item
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Creates a new random `TodoId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `TodoId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// What needs doing
    pub content: String,
    /// When the todo was created
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a new todo item
    #[must_use]
    pub const fn new(id: TodoId, content: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            content,
            created_at,
        }
    }
}

/// Lifecycle of the asynchronous load
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Nothing requested yet
    Pending,
    /// A load is in flight
    Loading,
    /// The last load succeeded
    Success,
    /// The last load failed
    Error,
}

impl stateflow_core::selector::MemoEq for Status {
    fn memo_eq(&self, prior: &Self) -> bool {
        self == prior
    }
}

/// State of the todos slice
///
/// The list sits behind an `Arc` so an unchanged list keeps its reference
/// across transitions that only touch `status` or `error`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodosState {
    /// Current todo list
    pub todos: Arc<Vec<Todo>>,
    /// Load lifecycle
    pub status: Status,
    /// Last load failure; `None` means no error
    pub error: Option<String>,
}

impl TodosState {
    /// The state before any action has been dispatched
    #[must_use]
    pub fn initial() -> Self {
        Self {
            todos: Arc::new(Vec::new()),
            status: Status::Pending,
            error: None,
        }
    }

    /// Number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Looks up a todo by id
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| &todo.id == id)
    }
}

impl Default for TodosState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;

    #[test]
    fn todo_id_display() {
        let id = TodoId::new();
        assert!(!format!("{id}").is_empty());
    }

    #[test]
    fn initial_state_is_empty_and_clean() {
        let state = TodosState::initial();
        assert_eq!(state.count(), 0);
        assert_eq!(state.status, Status::Pending);
        assert_eq!(state.error, None);
    }

    #[test]
    fn get_finds_by_id() {
        let id = TodoId::new();
        let state = TodosState {
            todos: Arc::new(vec![Todo::new(id.clone(), "buy milk".into(), Utc::now())]),
            ..TodosState::initial()
        };
        assert_eq!(state.get(&id).unwrap().content, "buy milk");
        assert!(state.get(&TodoId::new()).is_none());
    }
}
