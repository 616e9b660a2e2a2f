//! # Stateflow Runtime
//!
//! Store runtime for the stateflow architecture.
//!
//! This crate provides the imperative half of the container: the [`Store`]
//! that owns the current state, serializes every dispatch onto one logical
//! timeline, publishes snapshots to subscribers, and drives the asynchronous
//! effect pipeline.
//!
//! ## Core Components
//!
//! - **Store**: synchronous dispatch with a strict total order of state
//!   transitions, replay-on-subscribe observation, selector watching
//! - **Effect Pipeline**: async handlers bound to action kinds, spawned
//!   after each publish, feeding follow-up actions back into dispatch
//!
//! ## Example
//!
//! ```ignore
//! use stateflow_runtime::{Store, StoreBuilder};
//!
//! let store = StoreBuilder::new()
//!     .with_slice("todos", TodosReducer)
//!     .with_effect(load_todos_effect)
//!     .build()?;
//!
//! store.dispatch(TodoAction::add("buy milk"))?;
//! let todos = store.slice::<TodosState>("todos")?;
//! ```

mod effect;
mod store;

pub use effect::{Effect, EffectFuture, EffectHandle, EffectHandler, FnHandler, FollowUps, create_effect};
pub use store::{Store, StoreBuilder, Subscription, SubscriptionId};

/// Error types for the Store runtime.
pub mod error {
    use stateflow_core::error::{ReducerFault, RegistryError};
    use thiserror::Error;

    /// Errors that abort store construction.
    ///
    /// Setup-time errors are fatal to initialization by design; none of them
    /// is deferred to dispatch time.
    #[derive(Error, Debug)]
    pub enum BuildError {
        /// A slice registration failed.
        #[error(transparent)]
        Registry(#[from] RegistryError),

        /// Effects were registered but no tokio runtime is entered.
        ///
        /// Effect handlers are spawned as tasks; building a store with
        /// effects requires a runtime context.
        #[error("effects registered without a tokio runtime")]
        MissingRuntime,
    }

    /// Errors that can occur during Store operations.
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// A slice reducer failed during dispatch.
        ///
        /// The dispatch failed atomically: no partial state was published
        /// and the store retains its pre-dispatch value.
        #[error(transparent)]
        Reducer(#[from] ReducerFault),

        /// Store is shutting down and not accepting new actions.
        #[error("store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete.
        #[error("shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// [`crate::Store::settle`] timed out waiting for quiescence.
        #[error("settle timed out with {0} effects still running")]
        SettleTimeout(usize),
    }

    /// A failure produced by an effect handler.
    ///
    /// Caught at the per-handler boundary, logged, and never propagated to
    /// other handlers or the store. By convention handlers convert expected
    /// failures into a designated failure action instead of returning this.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    #[error("{message}")]
    pub struct EffectFailure {
        /// Human-readable description of the failure.
        pub message: String,
    }

    impl EffectFailure {
        /// Creates a failure from a message.
        pub fn new(message: impl Into<String>) -> Self {
            Self {
                message: message.into(),
            }
        }
    }
}

pub use error::{BuildError, EffectFailure, StoreError};
