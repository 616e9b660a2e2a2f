//! # Stateflow Core
//!
//! Core types for the stateflow unidirectional state container.
//!
//! This crate provides the pure, runtime-free half of the architecture:
//!
//! - **Action**: an immutable, uniquely-kinded value describing an intent or
//!   event ([`action`])
//! - **Slice**: a named, independently-reduced partition of the state tree
//!   ([`state`])
//! - **Reducer Registry**: composes slice reducers into one root transition
//!   function with structural sharing ([`registry`])
//! - **Selector Engine**: memoized, compositional projections from state to
//!   derived values ([`selector`])
//!
//! The store runtime (dispatch loop, subscriptions, effect pipeline) lives in
//! the companion `stateflow-runtime` crate.
//!
//! ## Data flow
//!
//! ```text
//! caller ──► Action ──► Store::dispatch
//!                          │
//!                          ▼
//!                    Root reducer (slice reducers, registration order)
//!                          │
//!                          ▼
//!                      new AppState ──► subscribers ──► selectors
//!                          │
//!                          ▼
//!                    effect pipeline ──► follow-up Actions ──► dispatch
//! ```
//!
//! ## Example
//!
//! ```
//! use stateflow_core::action::{Action, ActionKind};
//! use stateflow_core::error::SliceError;
//! use stateflow_core::registry::{ReducerRegistry, SliceReducer};
//!
//! #[derive(Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! impl Action for CounterAction {
//!     fn kind(&self) -> ActionKind {
//!         ActionKind::new("[Counter] Increment")
//!     }
//!     fn as_any(&self) -> &(dyn std::any::Any + Send + Sync) {
//!         self
//!     }
//! }
//!
//! struct CounterReducer;
//!
//! impl SliceReducer for CounterReducer {
//!     type Slice = u64;
//!
//!     fn initial(&self) -> u64 {
//!         0
//!     }
//!
//!     fn reduce(&self, slice: &u64, action: &dyn Action) -> Result<Option<u64>, SliceError> {
//!         match action.downcast_ref::<CounterAction>() {
//!             Some(CounterAction::Increment) => Ok(Some(slice + 1)),
//!             None => Ok(None),
//!         }
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = ReducerRegistry::new();
//! registry.register("counter", CounterReducer)?;
//! let root = registry.compose_root();
//!
//! let state = root.reduce(&root.initial_state(), &CounterAction::Increment)?;
//! assert_eq!(state.slice::<u64>("counter")?.as_ref(), &1);
//! # Ok(())
//! # }
//! ```

// Re-export the small-vector types used across the API surface.
pub use smallvec::{SmallVec, smallvec};

pub mod action;
pub mod error;
pub mod registry;
pub mod selector;
pub mod state;

pub use action::{Action, ActionKind, DynAction};
pub use error::{ReducerFault, RegistryError, SelectError, SliceError};
pub use registry::{ReducerRegistry, RootReducer, SliceReducer};
pub use selector::{
    FeatureSelector, MemoEq, MemoizedPropsSelector, MemoizedSelector, Selector, SelectorWithProps,
    create_feature_selector, create_selector, create_selector_with_props,
};
pub use state::{AppState, DynSlice, SliceLayout};
