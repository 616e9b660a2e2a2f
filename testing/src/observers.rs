//! Capture-style observers for store tests.

use stateflow_core::state::AppState;
use std::sync::{Arc, Mutex, PoisonError};

/// Records every state published to it, for asserting on transition
/// sequences in store tests.
///
/// # Example
///
/// ```ignore
/// let observer = RecordingObserver::new();
/// let _sub = store.subscribe(observer.callback());
/// store.dispatch(TodoAction::add("x"))?;
/// assert_eq!(observer.len(), 2); // replay + one transition
/// ```
#[derive(Clone, Default)]
pub struct RecordingObserver {
    states: Arc<Mutex<Vec<AppState>>>,
}

impl RecordingObserver {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the callback to pass to `Store::subscribe`.
    #[must_use]
    pub fn callback(&self) -> impl Fn(&AppState) + Send + Sync + use<> {
        let states = Arc::clone(&self.states);
        move |state: &AppState| {
            states
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(state.clone());
        }
    }

    /// Number of states observed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been observed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every observed state, in publication order.
    #[must_use]
    pub fn states(&self) -> Vec<AppState> {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recently observed state.
    #[must_use]
    pub fn last(&self) -> Option<AppState> {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}
