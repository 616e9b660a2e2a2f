//! Effect pipeline: async side-effect handlers bound to action kinds.
//!
//! Effects are the secondary consumers of dispatched actions. A handler runs
//! after the store has published the resulting state, observes only
//! post-transition snapshots, and produces zero or more follow-up actions
//! that re-enter the store through the ordinary dispatch queue. Handlers run
//! concurrently with respect to each other; a handler's own invocations for
//! successive matching actions are not ordered unless it serializes
//! internally.

use crate::error::EffectFailure;
use futures::future::BoxFuture;
use smallvec::SmallVec;
use stateflow_core::action::{ActionKind, DynAction};
use stateflow_core::state::AppState;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Follow-up actions produced by one handler invocation.
pub type FollowUps = SmallVec<[DynAction; 4]>;

/// Future returned by an effect handler.
pub type EffectFuture = BoxFuture<'static, Result<FollowUps, EffectFailure>>;

/// An asynchronous side-effect handler.
///
/// Handlers never mutate state directly: they read the post-transition
/// snapshot, perform async work, and dispatch further actions by returning
/// them. A failing handler returns [`EffectFailure`], which the pipeline
/// logs and absorbs — by convention the handler itself converts expected
/// failures (network errors and the like) into a designated failure action
/// instead, so the error re-enters the normal action flow.
pub trait EffectHandler: Send + Sync + 'static {
    /// Handles one matching action against the state it produced.
    fn handle(&self, action: DynAction, state: AppState) -> EffectFuture;
}

/// Adapts an async closure into an [`EffectHandler`].
///
/// # Example
///
/// ```ignore
/// let handler = FnHandler::new(|action, state| async move {
///     // ... async work ...
///     Ok(FollowUps::new())
/// });
/// ```
pub struct FnHandler<F>(F);

impl<F> FnHandler<F> {
    /// Wraps the closure.
    pub fn new<Fut>(f: F) -> Self
    where
        F: Fn(DynAction, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<FollowUps, EffectFailure>> + Send + 'static,
    {
        Self(f)
    }
}

impl<F, Fut> EffectHandler for FnHandler<F>
where
    F: Fn(DynAction, AppState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FollowUps, EffectFailure>> + Send + 'static,
{
    fn handle(&self, action: DynAction, state: AppState) -> EffectFuture {
        Box::pin((self.0)(action, state))
    }
}

/// A registered effect: a named binding of action kinds to a handler.
///
/// Created by [`create_effect`]; handed to the store builder.
pub struct Effect {
    pub(crate) name: &'static str,
    pub(crate) kinds: HashSet<ActionKind>,
    pub(crate) handler: Arc<dyn EffectHandler>,
    pub(crate) cancelled: Arc<AtomicBool>,
}

impl Effect {
    /// The effect's name, used as its tracing label.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this effect matches the given action kind.
    #[must_use]
    pub fn matches(&self, kind: ActionKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Cancellation handle for a registered effect.
///
/// Cancelling prevents any further follow-up dispatch from that effect —
/// including from invocations already in flight — without affecting other
/// handlers or the store.
#[derive(Clone)]
pub struct EffectHandle {
    cancelled: Arc<AtomicBool>,
}

impl EffectHandle {
    /// Cancels the effect.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether the effect has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Binds a set of action kinds to an asynchronous handler.
///
/// Returns the effect (to register on the store builder) and its
/// cancellation handle.
///
/// # Example
///
/// ```ignore
/// let (effect, handle) = create_effect(
///     "load-todos",
///     [LOAD_TODOS],
///     LoadTodosEffect::new(api),
/// );
/// let store = StoreBuilder::new()
///     .with_slice("todos", TodosReducer)
///     .with_effect(effect)
///     .build()?;
/// ```
pub fn create_effect<H: EffectHandler>(
    name: &'static str,
    kinds: impl IntoIterator<Item = ActionKind>,
    handler: H,
) -> (Effect, EffectHandle) {
    let cancelled = Arc::new(AtomicBool::new(false));
    let effect = Effect {
        name,
        kinds: kinds.into_iter().collect(),
        handler: Arc::new(handler),
        cancelled: Arc::clone(&cancelled),
    };
    (effect, EffectHandle { cancelled })
}

/// Decrements the store's pending-effect counter when an effect task ends,
/// even if the handler future panics.
pub(crate) struct PendingGuard(pub(crate) Arc<AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
