//! Memoized derived-state selection.
//!
//! Selectors are pure projections from [`AppState`] to derived values.
//! Composed selectors carry a memo cell keyed on their inputs: inputs are
//! compared with [`MemoEq`] (pointer equality for `Arc`s, value equality for
//! primitives), and the projector runs only when some input changed. Memo
//! cells live for the process lifetime and are reset only by explicit
//! [`Selector::invalidate`] — nothing expires on its own.
//!
//! Projectors must be pure and side-effect-free. That contract is documented,
//! not mechanically enforced; an impure projector breaks memoization
//! correctness for every caller.

use crate::error::SelectError;
use crate::state::AppState;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

/// Change detection used by memo cells.
///
/// Mirrors the reference-equality discipline of the state tree: `Arc`
/// values compare by pointer, primitives and `String` by value, and
/// composites elementwise.
pub trait MemoEq: Clone + Send + Sync + 'static {
    /// Whether `self` is unchanged relative to a previously memoized value.
    fn memo_eq(&self, prior: &Self) -> bool;
}

impl<T: ?Sized + Send + Sync + 'static> MemoEq for Arc<T> {
    fn memo_eq(&self, prior: &Self) -> bool {
        Arc::ptr_eq(self, prior)
    }
}

macro_rules! memo_eq_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MemoEq for $ty {
                fn memo_eq(&self, prior: &Self) -> bool {
                    self == prior
                }
            }
        )*
    };
}

memo_eq_by_value!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, String,
    &'static str
);

impl<T: MemoEq> MemoEq for Option<T> {
    fn memo_eq(&self, prior: &Self) -> bool {
        match (self, prior) {
            (Some(a), Some(b)) => a.memo_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

macro_rules! memo_eq_for_tuples {
    ($( ( $($name:ident : $idx:tt),+ ) ),+ $(,)?) => {
        $(
            impl<$($name: MemoEq),+> MemoEq for ($($name,)+) {
                fn memo_eq(&self, prior: &Self) -> bool {
                    $( self.$idx.memo_eq(&prior.$idx) )&&+
                }
            }
        )+
    };
}

memo_eq_for_tuples!(
    (A: 0),
    (A: 0, B: 1),
    (A: 0, B: 1, C: 2),
    (A: 0, B: 1, C: 2, D: 3),
);

/// A pure projection from state to a derived value.
pub trait Selector: Send + Sync + 'static {
    /// The derived value this selector produces.
    type Output: MemoEq;

    /// Evaluates the selector against a state snapshot.
    ///
    /// # Errors
    ///
    /// [`SelectError`] when a feature selector in the composition references
    /// an unregistered or mismatched slice.
    fn select(&self, state: &AppState) -> Result<Self::Output, SelectError>;

    /// Drops any memoized value. Stateless selectors have nothing to drop.
    fn invalidate(&self) {}
}

impl<S: Selector + ?Sized> Selector for Arc<S> {
    type Output = S::Output;

    fn select(&self, state: &AppState) -> Result<Self::Output, SelectError> {
        (**self).select(state)
    }

    fn invalidate(&self) {
        (**self).invalidate();
    }
}

/// A pure projection parameterized by extrinsic props.
///
/// Every state-only [`Selector`] participates via a blanket impl that
/// ignores the props, so plain selectors compose into props selectors
/// unchanged.
pub trait SelectorWithProps<Props>: Send + Sync + 'static {
    /// The derived value this selector produces.
    type Output: MemoEq;

    /// Evaluates the selector against a state snapshot and props.
    ///
    /// # Errors
    ///
    /// [`SelectError`] when a feature selector in the composition references
    /// an unregistered or mismatched slice.
    fn select_with(&self, state: &AppState, props: &Props) -> Result<Self::Output, SelectError>;

    /// Drops any memoized value.
    fn invalidate(&self) {}
}

impl<S: Selector, Props> SelectorWithProps<Props> for S {
    type Output = S::Output;

    fn select_with(&self, state: &AppState, _props: &Props) -> Result<Self::Output, SelectError> {
        self.select(state)
    }

    fn invalidate(&self) {
        Selector::invalidate(self);
    }
}

/// Extracts one named slice from the root state.
///
/// Created by [`create_feature_selector`]. The output is the slice's live
/// `Arc`, so downstream memo cells see an unchanged slice as an unchanged
/// input.
pub struct FeatureSelector<T> {
    name: &'static str,
    _slice: PhantomData<fn() -> T>,
}

impl<T> FeatureSelector<T> {
    /// The slice name this selector extracts.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: Send + Sync + 'static> FeatureSelector<T> {
    /// Checks the wiring against a state snapshot.
    ///
    /// Applications call this at startup so a bad slice name or type aborts
    /// initialization instead of failing at first use.
    ///
    /// # Errors
    ///
    /// [`SelectError::UnknownSlice`] or [`SelectError::SliceMismatch`].
    pub fn verify(&self, state: &AppState) -> Result<(), SelectError> {
        state.slice::<T>(self.name).map(|_| ())
    }
}

impl<T: Send + Sync + 'static> Selector for FeatureSelector<T> {
    type Output = Arc<T>;

    fn select(&self, state: &AppState) -> Result<Arc<T>, SelectError> {
        state.slice::<T>(self.name)
    }
}

/// Creates a selector extracting the named slice as type `T`.
///
/// # Example
///
/// ```ignore
/// let select_todos = create_feature_selector::<TodosState>("todos");
/// ```
#[must_use]
pub fn create_feature_selector<T>(name: &'static str) -> FeatureSelector<T> {
    FeatureSelector {
        name,
        _slice: PhantomData,
    }
}

/// A tuple of input selectors evaluated together.
pub trait SelectorInputs: Send + Sync + 'static {
    /// The tuple of input values, compared elementwise by the memo cell.
    type Values: MemoEq;

    /// Evaluates every input against the snapshot.
    ///
    /// # Errors
    ///
    /// The first [`SelectError`] from any input.
    fn evaluate(&self, state: &AppState) -> Result<Self::Values, SelectError>;

    /// Invalidates every composed input.
    fn invalidate(&self);
}

/// A tuple of props-aware input selectors evaluated together.
pub trait PropsSelectorInputs<Props>: Send + Sync + 'static {
    /// The tuple of input values, compared elementwise by the memo cell.
    type Values: MemoEq;

    /// Evaluates every input against the snapshot and props.
    ///
    /// # Errors
    ///
    /// The first [`SelectError`] from any input.
    fn evaluate(&self, state: &AppState, props: &Props) -> Result<Self::Values, SelectError>;

    /// Invalidates every composed input.
    fn invalidate(&self);
}

/// A pure function over the evaluated input tuple.
pub trait Projector<Values, Out>: Send + Sync + 'static {
    /// Computes the derived value. Must be pure and side-effect-free.
    fn project(&self, values: &Values) -> Out;
}

/// A pure function over the evaluated input tuple and props.
pub trait PropsProjector<Values, Props, Out>: Send + Sync + 'static {
    /// Computes the derived value. Must be pure and side-effect-free.
    fn project(&self, values: &Values, props: &Props) -> Out;
}

macro_rules! impl_selector_arity {
    ($( ( $($name:ident : $idx:tt),+ ) ),+ $(,)?) => {
        $(
            impl<$($name: Selector),+> SelectorInputs for ($($name,)+) {
                type Values = ($($name::Output,)+);

                fn evaluate(&self, state: &AppState) -> Result<Self::Values, SelectError> {
                    Ok(($(self.$idx.select(state)?,)+))
                }

                fn invalidate(&self) {
                    $( self.$idx.invalidate(); )+
                }
            }

            impl<Props, $($name: SelectorWithProps<Props>),+> PropsSelectorInputs<Props>
                for ($($name,)+)
            {
                type Values = ($($name::Output,)+);

                fn evaluate(
                    &self,
                    state: &AppState,
                    props: &Props,
                ) -> Result<Self::Values, SelectError> {
                    Ok(($(self.$idx.select_with(state, props)?,)+))
                }

                fn invalidate(&self) {
                    $( <$name as SelectorWithProps<Props>>::invalidate(&self.$idx); )+
                }
            }

            impl<F, Out, $($name),+> Projector<($($name,)+), Out> for F
            where
                F: Fn($(&$name),+) -> Out + Send + Sync + 'static,
            {
                fn project(&self, values: &($($name,)+)) -> Out {
                    self($(&values.$idx),+)
                }
            }

            impl<F, Props, Out, $($name),+> PropsProjector<($($name,)+), Props, Out> for F
            where
                F: Fn($(&$name,)+ &Props) -> Out + Send + Sync + 'static,
            {
                fn project(&self, values: &($($name,)+), props: &Props) -> Out {
                    self($(&values.$idx,)+ props)
                }
            }
        )+
    };
}

impl_selector_arity!(
    (S1: 0),
    (S1: 0, S2: 1),
    (S1: 0, S2: 1, S3: 2),
    (S1: 0, S2: 1, S3: 2, S4: 3),
);

/// A composed selector with a memo cell.
///
/// Created by [`create_selector`].
pub struct MemoizedSelector<I: SelectorInputs, P, Out> {
    inputs: I,
    project: P,
    cell: Mutex<Option<(I::Values, Out)>>,
}

impl<I, P, Out> Selector for MemoizedSelector<I, P, Out>
where
    I: SelectorInputs,
    P: Projector<I::Values, Out>,
    Out: MemoEq,
{
    type Output = Out;

    fn select(&self, state: &AppState) -> Result<Out, SelectError> {
        let values = self.inputs.evaluate(state)?;
        let mut cell = self.cell.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((prior, output)) = cell.as_ref() {
            if values.memo_eq(prior) {
                return Ok(output.clone());
            }
        }
        let output = self.project.project(&values);
        *cell = Some((values, output.clone()));
        Ok(output)
    }

    fn invalidate(&self) {
        self.cell
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.inputs.invalidate();
    }
}

/// Composes input selectors and a projector into a memoized selector.
///
/// The projector is invoked only when some input changed (by [`MemoEq`])
/// since the last evaluation; otherwise the cached output is returned
/// without running it.
///
/// # Example
///
/// ```ignore
/// let select_remaining = create_selector(
///     (select_all_todos,),
///     |todos: &Arc<Vec<Todo>>| todos.iter().filter(|t| !t.done).count(),
/// );
/// ```
#[must_use]
pub fn create_selector<I, P, Out>(inputs: I, project: P) -> MemoizedSelector<I, P, Out>
where
    I: SelectorInputs,
    P: Projector<I::Values, Out>,
    Out: MemoEq,
{
    MemoizedSelector {
        inputs,
        project,
        cell: Mutex::new(None),
    }
}

/// A composed props selector with a memo cell.
///
/// Created by [`create_selector_with_props`]. The memo key is the input
/// tuple (by [`MemoEq`]) extended with the props — compared by *value*,
/// since props are often freshly constructed per call site.
pub struct MemoizedPropsSelector<I: PropsSelectorInputs<Props>, P, Props, Out> {
    inputs: I,
    project: P,
    cell: Mutex<Option<(I::Values, Props, Out)>>,
}

impl<I, P, Props, Out> SelectorWithProps<Props> for MemoizedPropsSelector<I, P, Props, Out>
where
    I: PropsSelectorInputs<Props>,
    P: PropsProjector<I::Values, Props, Out>,
    Props: Clone + PartialEq + Send + Sync + 'static,
    Out: MemoEq,
{
    type Output = Out;

    fn select_with(&self, state: &AppState, props: &Props) -> Result<Out, SelectError> {
        let values = self.inputs.evaluate(state, props)?;
        let mut cell = self.cell.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((prior, prior_props, output)) = cell.as_ref() {
            if values.memo_eq(prior) && props == prior_props {
                return Ok(output.clone());
            }
        }
        let output = self.project.project(&values, props);
        *cell = Some((values, props.clone(), output.clone()));
        Ok(output)
    }

    fn invalidate(&self) {
        self.cell
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        <I as PropsSelectorInputs<Props>>::invalidate(&self.inputs);
    }
}

/// Composes props-aware inputs and a projector into a memoized selector
/// whose memo key includes the props by value equality.
#[must_use]
pub fn create_selector_with_props<I, P, Props, Out>(
    inputs: I,
    project: P,
) -> MemoizedPropsSelector<I, P, Props, Out>
where
    I: PropsSelectorInputs<Props>,
    P: PropsProjector<I::Values, Props, Out>,
    Props: Clone + PartialEq + Send + Sync + 'static,
    Out: MemoEq,
{
    MemoizedPropsSelector {
        inputs,
        project,
        cell: Mutex::new(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;
    use crate::action::{Action, ActionKind};
    use crate::error::SliceError;
    use crate::registry::{ReducerRegistry, RootReducer, SliceReducer};
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    enum TestAction {
        Push(u32),
        Label(String),
    }

    impl Action for TestAction {
        fn kind(&self) -> ActionKind {
            match self {
                Self::Push(_) => ActionKind::new("[Test] Push"),
                Self::Label(_) => ActionKind::new("[Test] Label"),
            }
        }

        fn as_any(&self) -> &(dyn Any + Send + Sync) {
            self
        }
    }

    #[derive(Debug, PartialEq)]
    struct Numbers {
        values: Arc<Vec<u32>>,
    }

    struct NumbersReducer;

    impl SliceReducer for NumbersReducer {
        type Slice = Numbers;

        fn initial(&self) -> Numbers {
            Numbers {
                values: Arc::new(Vec::new()),
            }
        }

        fn reduce(&self, slice: &Numbers, action: &dyn Action) -> Result<Option<Numbers>, SliceError> {
            match action.downcast_ref::<TestAction>() {
                Some(TestAction::Push(n)) => {
                    let mut values = slice.values.as_ref().clone();
                    values.push(*n);
                    Ok(Some(Numbers {
                        values: Arc::new(values),
                    }))
                }
                _ => Ok(None),
            }
        }
    }

    struct LabelReducer;

    impl SliceReducer for LabelReducer {
        type Slice = String;

        fn initial(&self) -> String {
            "start".to_string()
        }

        fn reduce(&self, _slice: &String, action: &dyn Action) -> Result<Option<String>, SliceError> {
            match action.downcast_ref::<TestAction>() {
                Some(TestAction::Label(label)) => Ok(Some(label.clone())),
                _ => Ok(None),
            }
        }
    }

    fn root() -> RootReducer {
        let mut registry = ReducerRegistry::new();
        registry.register("numbers", NumbersReducer).unwrap();
        registry.register("label", LabelReducer).unwrap();
        registry.compose_root()
    }

    #[test]
    fn feature_selector_returns_live_slice_reference() {
        let root = root();
        let state = root.initial_state();
        let select_numbers = create_feature_selector::<Numbers>("numbers");

        let a = select_numbers.select(&state).unwrap();
        let b = select_numbers.select(&state).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn feature_selector_verify_rejects_bad_wiring() {
        let root = root();
        let state = root.initial_state();

        assert!(create_feature_selector::<Numbers>("numbers").verify(&state).is_ok());
        assert_eq!(
            create_feature_selector::<Numbers>("ghost").verify(&state),
            Err(SelectError::UnknownSlice { name: "ghost" })
        );
        assert_eq!(
            create_feature_selector::<u64>("numbers").verify(&state),
            Err(SelectError::SliceMismatch { name: "numbers" })
        );
    }

    #[test]
    fn projector_runs_exactly_once_for_unchanged_inputs() {
        let root = root();
        let state = root.initial_state();
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);

        let select_sum = create_selector(
            (create_feature_selector::<Numbers>("numbers"),),
            move |numbers: &Arc<Numbers>| {
                counted.fetch_add(1, Ordering::SeqCst);
                numbers.values.iter().sum::<u32>()
            },
        );

        for _ in 0..5 {
            assert_eq!(select_sum.select(&state).unwrap(), 0);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn changed_input_reinvokes_the_projector_once() {
        let root = root();
        let state = root.initial_state();
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);

        let select_sum = create_selector(
            (create_feature_selector::<Numbers>("numbers"),),
            move |numbers: &Arc<Numbers>| {
                counted.fetch_add(1, Ordering::SeqCst);
                numbers.values.iter().sum::<u32>()
            },
        );

        assert_eq!(select_sum.select(&state).unwrap(), 0);
        let state = root.reduce(&state, &TestAction::Push(4)).unwrap();
        assert_eq!(select_sum.select(&state).unwrap(), 4);
        assert_eq!(select_sum.select(&state).unwrap(), 4);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unrelated_slice_change_does_not_reinvoke_the_projector() {
        let root = root();
        let state = root.initial_state();
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);

        let select_sum = create_selector(
            (create_feature_selector::<Numbers>("numbers"),),
            move |numbers: &Arc<Numbers>| {
                counted.fetch_add(1, Ordering::SeqCst);
                numbers.values.iter().sum::<u32>()
            },
        );

        select_sum.select(&state).unwrap();
        let state = root.reduce(&state, &TestAction::Label("next".into())).unwrap();
        select_sum.select(&state).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn two_input_composition_tracks_each_input() {
        let root = root();
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);

        let select_summary = create_selector(
            (
                create_feature_selector::<Numbers>("numbers"),
                create_feature_selector::<String>("label"),
            ),
            move |numbers: &Arc<Numbers>, label: &Arc<String>| {
                counted.fetch_add(1, Ordering::SeqCst);
                Arc::new(format!("{}:{}", label, numbers.values.len()))
            },
        );

        let state = root.initial_state();
        let first = select_summary.select(&state).unwrap();
        assert_eq!(first.as_str(), "start:0");

        // Same state: cached output reference comes back.
        let again = select_summary.select(&state).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        let state = root.reduce(&state, &TestAction::Push(1)).unwrap();
        assert_eq!(select_summary.select(&state).unwrap().as_str(), "start:1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invalidate_forces_reprojection() {
        let root = root();
        let state = root.initial_state();
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);

        let select_len = create_selector(
            (create_feature_selector::<Numbers>("numbers"),),
            move |numbers: &Arc<Numbers>| {
                counted.fetch_add(1, Ordering::SeqCst);
                numbers.values.len()
            },
        );

        select_len.select(&state).unwrap();
        select_len.select(&state).unwrap();
        Selector::invalidate(&select_len);
        select_len.select(&state).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn props_extend_the_memo_key_by_value() {
        let root = root();
        let mut state = root.initial_state();
        for n in [1_u32, 2, 3] {
            state = root.reduce(&state, &TestAction::Push(n)).unwrap();
        }
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);

        let select_contains = create_selector_with_props(
            (create_feature_selector::<Numbers>("numbers"),),
            move |numbers: &Arc<Numbers>, wanted: &u32| {
                counted.fetch_add(1, Ordering::SeqCst);
                numbers.values.contains(wanted)
            },
        );

        // Freshly constructed but equal props hit the memo.
        assert!(select_contains.select_with(&state, &2).unwrap());
        assert!(select_contains.select_with(&state, &2).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Different props miss it.
        assert!(!select_contains.select_with(&state, &9).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn select_error_propagates_through_composition() {
        let root = root();
        let state = root.initial_state();

        let select_broken = create_selector(
            (create_feature_selector::<Numbers>("ghost"),),
            |numbers: &Arc<Numbers>| numbers.values.len(),
        );

        assert_eq!(
            select_broken.select(&state).unwrap_err(),
            SelectError::UnknownSlice { name: "ghost" }
        );
    }
}
