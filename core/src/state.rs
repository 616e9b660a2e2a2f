//! The application state tree: named, independently-reduced slices.
//!
//! [`AppState`] is an immutable snapshot. Slice values live behind `Arc`s in
//! registration order; the name-to-index layout is itself shared, so cloning
//! a state is two reference-count bumps. Reference equality (`Arc::ptr_eq`)
//! is the change signal throughout: a dispatch that alters nothing yields a
//! snapshot whose slice array is pointer-identical to its predecessor, and
//! any change shares every untouched slice with the prior snapshot.

use crate::error::SelectError;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A type-erased slice value.
pub type DynSlice = Arc<dyn Any + Send + Sync>;

/// Slice names in registration order, shared by every state produced from
/// one registry.
#[derive(Debug)]
pub struct SliceLayout {
    names: Vec<&'static str>,
    index: HashMap<&'static str, usize>,
}

impl SliceLayout {
    pub(crate) fn new(names: Vec<&'static str>) -> Self {
        let index = names.iter().enumerate().map(|(i, n)| (*n, i)).collect();
        Self { names, index }
    }

    /// Slice names in registration order.
    #[must_use]
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    /// Whether a slice name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

/// An immutable snapshot of the whole application state.
#[derive(Clone)]
pub struct AppState {
    layout: Arc<SliceLayout>,
    slices: Arc<[DynSlice]>,
}

impl AppState {
    pub(crate) fn new(layout: Arc<SliceLayout>, slices: Arc<[DynSlice]>) -> Self {
        Self { layout, slices }
    }

    /// The slice layout shared with every snapshot from the same registry.
    #[must_use]
    pub fn layout(&self) -> &SliceLayout {
        &self.layout
    }

    pub(crate) fn layout_arc(&self) -> &Arc<SliceLayout> {
        &self.layout
    }

    pub(crate) fn slices(&self) -> &Arc<[DynSlice]> {
        &self.slices
    }

    /// Extracts a named slice as its concrete type.
    ///
    /// The returned `Arc` is the slice's live reference: two snapshots whose
    /// slice was untouched in between return pointer-equal values.
    ///
    /// # Errors
    ///
    /// [`SelectError::UnknownSlice`] when the name was never registered,
    /// [`SelectError::SliceMismatch`] when the slice holds a different type.
    pub fn slice<T: Send + Sync + 'static>(&self, name: &'static str) -> Result<Arc<T>, SelectError> {
        let position = self
            .layout
            .position(name)
            .ok_or(SelectError::UnknownSlice { name })?;
        Arc::clone(&self.slices[position])
            .downcast::<T>()
            .map_err(|_| SelectError::SliceMismatch { name })
    }

    /// Whether two snapshots are the same published state.
    ///
    /// This is reference equality over the slice array — the efficient
    /// change-detection signal downstream consumers key on.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slices, &other.slices)
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("slices", &self.layout.names())
            .finish()
    }
}
