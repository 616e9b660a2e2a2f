//! Bookshelf example: two slices composed by memoized selectors.

pub mod reducer;
pub mod selectors;
pub mod types;

pub use reducer::{AccountReducer, BooksReducer};
pub use types::{AccountState, Book, BookId, BooksState, BookshelfAction, User, UserId};

use stateflow_core::error::SelectError;
use stateflow_runtime::{BuildError, Store, StoreBuilder};
use thiserror::Error;

/// Errors that abort the bookshelf application's startup
#[derive(Error, Debug)]
pub enum SetupError {
    /// Store construction failed
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Selector wiring does not match the registered slices
    #[error(transparent)]
    Select(#[from] SelectError),
}

/// Builds the bookshelf store and verifies the selector wiring.
///
/// # Errors
///
/// [`SetupError`] when a slice registration or the selector wiring is wrong.
pub fn build_store() -> Result<Store, SetupError> {
    let store = StoreBuilder::new()
        .with_slice("books", BooksReducer)
        .with_slice("account", AccountReducer)
        .build()?;

    let state = store.state();
    selectors::select_books_state().verify(&state)?;
    selectors::select_account_state().verify(&state)?;
    Ok(store)
}
