//! Error taxonomy for registry setup, dispatch, and selection.
//!
//! Setup-time errors ([`RegistryError`], and [`SelectError`] when surfaced by
//! startup verification) are fatal to initialization. [`ReducerFault`] is a
//! runtime error surfaced synchronously to the dispatch caller; the state is
//! left at its pre-dispatch value.

use thiserror::Error;

/// Errors raised while binding slices to the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two reducers claimed the same slice name.
    #[error("slice '{name}' is already registered")]
    DuplicateSlice {
        /// The contested slice name.
        name: &'static str,
    },
}

/// Errors raised while extracting a slice or evaluating a selector.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// A feature selector referenced a slice name that was never registered.
    #[error("slice '{name}' was never registered")]
    UnknownSlice {
        /// The missing slice name.
        name: &'static str,
    },

    /// The slice is registered but holds a different state type.
    #[error("slice '{name}' holds a different state type")]
    SliceMismatch {
        /// The mismatched slice name.
        name: &'static str,
    },
}

/// A failure produced by a slice reducer while applying an action.
///
/// Slice reducers return this instead of panicking; the registry wraps it in
/// a [`ReducerFault`] naming the offending slice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SliceError(String);

impl SliceError {
    /// Creates a slice error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A dispatch failed inside a slice reducer.
///
/// The whole dispatch fails atomically: no partial state is published and the
/// store retains its pre-dispatch value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("reducer for slice '{slice}' failed")]
pub struct ReducerFault {
    /// Name of the slice whose reducer failed.
    pub slice: &'static str,
    /// The underlying reducer error.
    #[source]
    pub source: SliceError,
}
