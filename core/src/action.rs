//! Action model: uniquely-kinded, immutable values dispatched into the store.
//!
//! Every action carries an [`ActionKind`] — a `"[Category] Description"`
//! string that serves as the dispatch discriminator, the effect match key,
//! and the human-readable trace label. Domain actions are enums implementing
//! [`Action`]; reducers match on the concrete enum after downcasting, with a
//! no-op arm for everything else.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// The kind of an action: a namespaced `"[Category] Description"` label.
///
/// The label is a stable public contract: it must be unique per distinct
/// action kind within a running process. Uniqueness is a documented
/// convention, not mechanically enforced.
///
/// # Example
///
/// ```
/// use stateflow_core::action::ActionKind;
///
/// const ADD_TODO: ActionKind = ActionKind::new("[Todo Page] Add Todo");
/// assert_eq!(ADD_TODO.as_str(), "[Todo Page] Add Todo");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionKind(&'static str);

impl ActionKind {
    /// Creates a kind from its label.
    #[must_use]
    pub const fn new(label: &'static str) -> Self {
        Self(label)
    }

    /// Returns the label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl fmt::Debug for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionKind({})", self.0)
    }
}

/// An immutable value describing an intent or event.
///
/// Actions are dispatched into the store as [`DynAction`] trait objects and
/// travel unchanged through reducers, subscribers, and the effect pipeline.
/// The same kind may be dispatched repeatedly; equality between dispatches is
/// by value, never by identity.
///
/// # Example
///
/// ```
/// use stateflow_core::action::{Action, ActionKind};
///
/// #[derive(Debug)]
/// enum CounterAction {
///     Increment,
///     Reset,
/// }
///
/// impl Action for CounterAction {
///     fn kind(&self) -> ActionKind {
///         match self {
///             Self::Increment => ActionKind::new("[Counter] Increment"),
///             Self::Reset => ActionKind::new("[Counter] Reset"),
///         }
///     }
///
///     fn as_any(&self) -> &(dyn std::any::Any + Send + Sync) {
///         self
///     }
/// }
/// ```
pub trait Action: Any + Send + Sync + fmt::Debug {
    /// The unique kind of this action.
    fn kind(&self) -> ActionKind;

    /// Upcast used by reducers and effects to reach the concrete payload.
    ///
    /// Implementations return `self`.
    fn as_any(&self) -> &(dyn Any + Send + Sync);
}

/// A dispatched action, shared across the store and effect tasks.
pub type DynAction = Arc<dyn Action>;

impl dyn Action {
    /// Attempts to view this action as a concrete type.
    ///
    /// Returns `None` when the action is of a different type, which is how
    /// slice reducers ignore actions belonging to other slices.
    #[must_use]
    pub fn downcast_ref<A: Action>(&self) -> Option<&A> {
        self.as_any().downcast_ref::<A>()
    }
}
