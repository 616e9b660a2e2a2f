//! Todo example: a single slice with an asynchronous load effect.
//!
//! Demonstrates the full loop: page actions mutate the list synchronously,
//! `[Todo Page] Load Todos` flips the slice to `Loading` and triggers the
//! load effect, and the effect's paired success/failure actions complete the
//! cycle.

pub mod actions;
pub mod effects;
pub mod reducer;
pub mod selectors;
pub mod types;

pub use actions::TodoAction;
pub use effects::{FailingTodoApi, InMemoryTodoApi, TodoApi, load_todos_effect};
pub use reducer::TodosReducer;
pub use types::{Status, Todo, TodoId, TodosState};

use stateflow_core::error::SelectError;
use stateflow_runtime::{BuildError, EffectHandle, Store, StoreBuilder};
use std::sync::Arc;
use thiserror::Error;

/// Errors that abort the todo application's startup
#[derive(Error, Debug)]
pub enum SetupError {
    /// Store construction failed
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Selector wiring does not match the registered slices
    #[error(transparent)]
    Select(#[from] SelectError),
}

/// Builds the todo store with the load effect wired to the given API.
///
/// Verifies the selector wiring against the initial state so a bad slice
/// name or type aborts startup.
///
/// # Errors
///
/// [`SetupError`] when a slice registration or the selector wiring is wrong.
pub fn build_store(api: Arc<dyn TodoApi>) -> Result<(Store, EffectHandle), SetupError> {
    let (effect, handle) = load_todos_effect(api);
    let store = StoreBuilder::new()
        .with_slice("todos", TodosReducer::new())
        .with_effect(effect)
        .build()?;

    selectors::select_todos_state().verify(&store.state())?;
    Ok((store, handle))
}
