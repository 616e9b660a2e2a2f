//! Selectors composing the books and account slices.
//!
//! `select_visible_books` is the cross-slice composition: it re-projects
//! only when the book list or the signed-in user actually changed, and
//! returns the cached list reference otherwise.

use crate::types::{AccountState, Book, BookId, BooksState, User};
use stateflow_core::selector::{
    FeatureSelector, Selector, SelectorWithProps, create_feature_selector, create_selector,
    create_selector_with_props,
};
use std::sync::Arc;

/// Extracts the books slice.
#[must_use]
pub fn select_books_state() -> FeatureSelector<BooksState> {
    create_feature_selector::<BooksState>("books")
}

/// Extracts the account slice.
#[must_use]
pub fn select_account_state() -> FeatureSelector<AccountState> {
    create_feature_selector::<AccountState>("account")
}

/// Every book known to the application.
#[must_use]
pub fn select_all_books() -> impl Selector<Output = Arc<Vec<Book>>> {
    create_selector((select_books_state(),), |state: &Arc<BooksState>| {
        Arc::clone(&state.all)
    })
}

/// The signed-in user, if any.
#[must_use]
pub fn select_current_user() -> impl Selector<Output = Option<Arc<User>>> {
    create_selector((select_account_state(),), |state: &Arc<AccountState>| {
        state.current.clone()
    })
}

/// Books visible to the signed-in user: shared books plus their own.
/// Signed out, only shared books are visible.
#[must_use]
pub fn select_visible_books() -> impl Selector<Output = Arc<Vec<Book>>> {
    create_selector(
        (select_all_books(), select_current_user()),
        |books: &Arc<Vec<Book>>, user: &Option<Arc<User>>| {
            let visible = books
                .iter()
                .filter(|book| match (&book.owner, user) {
                    (None, _) => true,
                    (Some(owner), Some(user)) => owner == &user.id,
                    (Some(_), None) => false,
                })
                .cloned()
                .collect();
            Arc::new(visible)
        },
    )
}

/// Looks up one book by id; the id is a prop, compared by value in the memo
/// key.
#[must_use]
pub fn select_book_by_id() -> impl SelectorWithProps<BookId, Output = Option<Arc<Book>>> {
    create_selector_with_props(
        (select_all_books(),),
        |books: &Arc<Vec<Book>>, id: &BookId| {
            books.iter().find(|book| &book.id == id).cloned().map(Arc::new)
        },
    )
}
