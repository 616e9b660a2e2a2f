//! Domain types and actions for the bookshelf example.

use serde::{Deserialize, Serialize};
use stateflow_core::action::{Action, ActionKind};
use std::any::Any;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a book
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    /// Creates a new random `BookId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a user
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// A book on the shelf
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier
    pub id: BookId,
    /// Title of the book
    pub title: String,
    /// Owner; `None` marks a shared book visible to everyone
    pub owner: Option<UserId>,
}

impl Book {
    /// Creates a shared book
    #[must_use]
    pub const fn shared(id: BookId, title: String) -> Self {
        Self {
            id,
            title,
            owner: None,
        }
    }

    /// Creates a book owned by one user
    #[must_use]
    pub const fn owned_by(id: BookId, title: String, owner: UserId) -> Self {
        Self {
            id,
            title,
            owner: Some(owner),
        }
    }
}

/// A reader account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Display name
    pub name: String,
}

/// State of the books slice
#[derive(Clone, Debug, Default)]
pub struct BooksState {
    /// Every book known to the application
    pub all: Arc<Vec<Book>>,
}

/// State of the account slice
#[derive(Clone, Debug, Default)]
pub struct AccountState {
    /// The signed-in user, if any
    pub current: Option<Arc<User>>,
}

/// Kind of [`BookshelfAction::SetBooks`]
pub const SET_BOOKS: ActionKind = ActionKind::new("[Book List] Set Books");
/// Kind of [`BookshelfAction::SelectUser`]
pub const SELECT_USER: ActionKind = ActionKind::new("[Account Page] Select User");
/// Kind of [`BookshelfAction::ClearUser`]
pub const CLEAR_USER: ActionKind = ActionKind::new("[Account Page] Clear User");

/// Everything that can happen to the bookshelf slices
#[derive(Debug)]
pub enum BookshelfAction {
    /// Replace the full book list
    SetBooks {
        /// The books to show
        books: Vec<Book>,
    },
    /// Sign a user in
    SelectUser {
        /// The user signing in
        user: User,
    },
    /// Sign the current user out
    ClearUser,
}

impl Action for BookshelfAction {
    fn kind(&self) -> ActionKind {
        match self {
            Self::SetBooks { .. } => SET_BOOKS,
            Self::SelectUser { .. } => SELECT_USER,
            Self::ClearUser => CLEAR_USER,
        }
    }

    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }
}
