//! Reducer registry: binds named slices to pure transition functions and
//! composes them into one root reducer.
//!
//! Slice reducers are applied in registration order against the pre-dispatch
//! snapshot; no reducer observes another slice's mid-dispatch result. A slice
//! that does not handle an action reports `Ok(None)` and keeps its prior
//! reference, so unhandled actions are no-ops at the reference level.

use crate::action::Action;
use crate::error::{ReducerFault, RegistryError, SliceError};
use crate::state::{AppState, DynSlice, SliceLayout};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// A pure state-transition function for one named slice.
///
/// # Contract
///
/// `reduce` never mutates its input: it returns `Ok(Some(next))` only when
/// the action's kind matches one of its handled variants, and `Ok(None)`
/// otherwise. Violating the reference-level no-op contract breaks change
/// detection for every consumer downstream.
///
/// # Example
///
/// ```
/// use stateflow_core::action::{Action, ActionKind};
/// use stateflow_core::error::SliceError;
/// use stateflow_core::registry::SliceReducer;
///
/// #[derive(Debug)]
/// enum CounterAction {
///     Increment,
/// }
///
/// impl Action for CounterAction {
///     fn kind(&self) -> ActionKind {
///         ActionKind::new("[Counter] Increment")
///     }
///     fn as_any(&self) -> &(dyn std::any::Any + Send + Sync) {
///         self
///     }
/// }
///
/// struct CounterReducer;
///
/// impl SliceReducer for CounterReducer {
///     type Slice = u64;
///
///     fn initial(&self) -> u64 {
///         0
///     }
///
///     fn reduce(&self, slice: &u64, action: &dyn Action) -> Result<Option<u64>, SliceError> {
///         match action.downcast_ref::<CounterAction>() {
///             Some(CounterAction::Increment) => Ok(Some(slice + 1)),
///             None => Ok(None),
///         }
///     }
/// }
/// ```
pub trait SliceReducer: Send + Sync + 'static {
    /// The slice state this reducer owns.
    type Slice: Send + Sync + 'static;

    /// The slice value before any action has been dispatched.
    fn initial(&self) -> Self::Slice;

    /// Computes the next slice value for an action.
    ///
    /// # Errors
    ///
    /// A [`SliceError`] aborts the whole dispatch atomically; the store keeps
    /// its pre-dispatch state.
    fn reduce(&self, slice: &Self::Slice, action: &dyn Action)
    -> Result<Option<Self::Slice>, SliceError>;
}

type DynReduce = Box<dyn Fn(&DynSlice, &dyn Action) -> Result<Option<DynSlice>, SliceError> + Send + Sync>;

struct SliceEntry {
    name: &'static str,
    reduce: DynReduce,
}

/// Collects slice registrations before the root reducer is composed.
#[derive(Default)]
pub struct ReducerRegistry {
    entries: Vec<SliceEntry>,
    initial: Vec<DynSlice>,
    index: HashMap<&'static str, usize>,
}

impl ReducerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a slice name to a reducer and its initial value.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateSlice`] when the name is already bound.
    pub fn register<R: SliceReducer>(
        &mut self,
        name: &'static str,
        reducer: R,
    ) -> Result<(), RegistryError> {
        if self.index.contains_key(name) {
            return Err(RegistryError::DuplicateSlice { name });
        }

        let initial: DynSlice = Arc::new(reducer.initial());
        let reduce: DynReduce = Box::new(move |slice, action| {
            let Some(current) = slice.downcast_ref::<R::Slice>() else {
                return Err(SliceError::new("slice holds an unexpected state type"));
            };
            Ok(reducer
                .reduce(current, action)?
                .map(|next| Arc::new(next) as DynSlice))
        });

        self.index.insert(name, self.entries.len());
        self.entries.push(SliceEntry { name, reduce });
        self.initial.push(initial);
        Ok(())
    }

    /// Number of registered slices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no slices are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Composes the registered slice reducers into one root reducer.
    #[must_use]
    pub fn compose_root(self) -> RootReducer {
        let layout = Arc::new(SliceLayout::new(
            self.entries.iter().map(|e| e.name).collect(),
        ));
        RootReducer {
            layout,
            entries: self.entries,
            initial: self.initial.into(),
        }
    }
}

/// The composed transition function over the whole state tree.
pub struct RootReducer {
    layout: Arc<SliceLayout>,
    entries: Vec<SliceEntry>,
    initial: Arc<[DynSlice]>,
}

impl RootReducer {
    /// The state before any action has been dispatched.
    #[must_use]
    pub fn initial_state(&self) -> AppState {
        AppState::new(Arc::clone(&self.layout), Arc::clone(&self.initial))
    }

    /// Applies every slice reducer, in registration order, to its own slice
    /// of the pre-dispatch snapshot.
    ///
    /// Unaffected slices retain their prior reference; if nothing changed the
    /// returned state is pointer-identical to the input.
    ///
    /// # Errors
    ///
    /// The first [`ReducerFault`] aborts the whole transition; no partial
    /// state is produced.
    pub fn reduce(&self, state: &AppState, action: &dyn Action) -> Result<AppState, ReducerFault> {
        let slices = state.slices();
        let mut changed: SmallVec<[(usize, DynSlice); 4]> = SmallVec::new();

        for (position, entry) in self.entries.iter().enumerate() {
            match (entry.reduce)(&slices[position], action) {
                Ok(Some(next)) => changed.push((position, next)),
                Ok(None) => {}
                Err(source) => {
                    return Err(ReducerFault {
                        slice: entry.name,
                        source,
                    });
                }
            }
        }

        if changed.is_empty() {
            return Ok(state.clone());
        }

        let mut next: Vec<DynSlice> = slices.to_vec();
        for (position, slice) in changed {
            next[position] = slice;
        }
        Ok(AppState::new(Arc::clone(state.layout_arc()), next.into()))
    }
}
