//! Reducers for the books and account slices.

use crate::types::{AccountState, BooksState, BookshelfAction};
use stateflow_core::action::Action;
use stateflow_core::error::SliceError;
use stateflow_core::registry::SliceReducer;
use std::sync::Arc;

/// Reducer owning the `books` slice
#[derive(Clone, Debug, Default)]
pub struct BooksReducer;

impl SliceReducer for BooksReducer {
    type Slice = BooksState;

    fn initial(&self) -> BooksState {
        BooksState::default()
    }

    fn reduce(
        &self,
        _slice: &BooksState,
        action: &dyn Action,
    ) -> Result<Option<BooksState>, SliceError> {
        match action.downcast_ref::<BookshelfAction>() {
            Some(BookshelfAction::SetBooks { books }) => Ok(Some(BooksState {
                all: Arc::new(books.clone()),
            })),
            _ => Ok(None),
        }
    }
}

/// Reducer owning the `account` slice
#[derive(Clone, Debug, Default)]
pub struct AccountReducer;

impl SliceReducer for AccountReducer {
    type Slice = AccountState;

    fn initial(&self) -> AccountState {
        AccountState::default()
    }

    fn reduce(
        &self,
        _slice: &AccountState,
        action: &dyn Action,
    ) -> Result<Option<AccountState>, SliceError> {
        match action.downcast_ref::<BookshelfAction>() {
            Some(BookshelfAction::SelectUser { user }) => Ok(Some(AccountState {
                current: Some(Arc::new(user.clone())),
            })),
            Some(BookshelfAction::ClearUser) => Ok(Some(AccountState { current: None })),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;
    use crate::types::{Book, BookId, User, UserId};
    use stateflow_testing::SliceTest;

    #[test]
    fn set_books_replaces_the_list() {
        SliceTest::new("books", BooksReducer)
            .when_action(BookshelfAction::SetBooks {
                books: vec![Book::shared(BookId::new(), "Dune".into())],
            })
            .then_slice(|state| {
                assert_eq!(state.all.len(), 1);
                assert_eq!(state.all[0].title, "Dune");
            })
            .run();
    }

    #[test]
    fn select_user_signs_in() {
        SliceTest::new("account", AccountReducer)
            .when_action(BookshelfAction::SelectUser {
                user: User {
                    id: UserId::new(),
                    name: "ada".into(),
                },
            })
            .then_slice(|state| {
                assert_eq!(state.current.as_ref().unwrap().name, "ada");
            })
            .run();
    }

    #[test]
    fn clear_user_signs_out() {
        SliceTest::new("account", AccountReducer)
            .given_slice(AccountState {
                current: Some(Arc::new(User {
                    id: UserId::new(),
                    name: "ada".into(),
                })),
            })
            .when_action(BookshelfAction::ClearUser)
            .then_slice(|state| {
                assert!(state.current.is_none());
            })
            .run();
    }

    #[test]
    fn account_ignores_book_actions() {
        SliceTest::new("account", AccountReducer)
            .when_action(BookshelfAction::SetBooks { books: vec![] })
            .then_unchanged()
            .run();
    }
}
