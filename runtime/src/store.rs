//! The Store: single holder of application state, dispatch loop, and
//! subscription management.
//!
//! # Ordering discipline
//!
//! All reducer execution happens on one logical timeline. `dispatch` is
//! synchronous; a FIFO queue plus a draining flag serialize every entry
//! point — reentrant dispatches from subscriber callbacks, follow-up
//! dispatches from effect tasks, and dispatches from other threads are
//! queued and drained after the in-flight transition completes. No two
//! reducer runs ever interleave, and every consumer observes the same strict
//! total order of state transitions.
//!
//! # Failure discipline
//!
//! A reducer fault aborts its dispatch atomically: nothing is published and
//! the state keeps its pre-dispatch value. The caller that started a drain
//! receives the fault for the action it submitted; faults of actions queued
//! behind it are logged — their callers have already returned.

use crate::effect::{Effect, PendingGuard};
use crate::error::{BuildError, StoreError};
use stateflow_core::action::{Action, DynAction};
use stateflow_core::registry::{ReducerRegistry, RootReducer, SliceReducer};
use stateflow_core::selector::{Selector, SelectorWithProps};
use stateflow_core::state::AppState;
use stateflow_core::error::{ReducerFault, RegistryError, SelectError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use std::time::Duration;

type SubscriberFn = dyn Fn(&AppState) + Send + Sync;

/// Identifier of an active subscription.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(u64);

/// Handle returned by [`Store::subscribe`].
///
/// Unsubscribing is explicit and idempotent; dropping the handle leaves the
/// subscription active.
pub struct Subscription {
    id: SubscriptionId,
    store: Weak<StoreInner>,
}

impl Subscription {
    /// The subscription's identifier.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Removes the observer from the store. Safe to call repeatedly.
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.store.upgrade() {
            inner.remove_subscriber(self.id);
        }
    }
}

struct DispatchQueue {
    pending: VecDeque<DynAction>,
    draining: bool,
}

struct SubscriberSet {
    next_id: u64,
    entries: Vec<(SubscriptionId, Arc<SubscriberFn>)>,
}

struct StoreInner {
    root: RootReducer,
    state: RwLock<AppState>,
    queue: Mutex<DispatchQueue>,
    subscribers: Mutex<SubscriberSet>,
    effects: Vec<Effect>,
    runtime: Option<tokio::runtime::Handle>,
    pending_effects: Arc<AtomicUsize>,
    shutdown: AtomicBool,
}

impl StoreInner {
    fn remove_subscriber(&self, id: SubscriptionId) {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subscribers.entries.retain(|(entry_id, _)| *entry_id != id);
    }
}

/// Builder for a [`Store`].
///
/// Setup-time failures — a duplicate slice name, or effects registered
/// outside a tokio runtime — abort construction: they are fatal to
/// initialization, never deferred to dispatch time.
///
/// # Example
///
/// ```ignore
/// let store = StoreBuilder::new()
///     .with_slice("todos", TodosReducer)
///     .with_slice("game", ScoreboardReducer)
///     .with_effect(load_todos_effect)
///     .build()?;
/// ```
#[derive(Default)]
#[must_use]
pub struct StoreBuilder {
    registrations: Vec<Box<dyn FnOnce(&mut ReducerRegistry) -> Result<(), RegistryError>>>,
    effects: Vec<Effect>,
}

impl StoreBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a slice name to a reducer.
    pub fn with_slice<R: SliceReducer>(mut self, name: &'static str, reducer: R) -> Self {
        self.registrations
            .push(Box::new(move |registry| registry.register(name, reducer)));
        self
    }

    /// Registers an effect created by [`crate::effect::create_effect`].
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Composes the root reducer and constructs the store.
    ///
    /// # Errors
    ///
    /// [`BuildError::Registry`] when two reducers claimed the same slice
    /// name; [`BuildError::MissingRuntime`] when effects are registered but
    /// no tokio runtime is entered.
    pub fn build(self) -> Result<Store, BuildError> {
        let mut registry = ReducerRegistry::new();
        for registration in self.registrations {
            registration(&mut registry)?;
        }
        let root = registry.compose_root();
        let state = root.initial_state();

        let runtime = tokio::runtime::Handle::try_current().ok();
        if runtime.is_none() && !self.effects.is_empty() {
            return Err(BuildError::MissingRuntime);
        }

        Ok(Store {
            inner: Arc::new(StoreInner {
                root,
                state: RwLock::new(state),
                queue: Mutex::new(DispatchQueue {
                    pending: VecDeque::new(),
                    draining: false,
                }),
                subscribers: Mutex::new(SubscriberSet {
                    next_id: 0,
                    entries: Vec::new(),
                }),
                effects: self.effects,
                runtime,
                pending_effects: Arc::new(AtomicUsize::new(0)),
                shutdown: AtomicBool::new(false),
            }),
        })
    }
}

/// The single process-wide holder of application state.
///
/// `Store` is a cheap `Clone` handle over shared internals; effect tasks and
/// threads share one store by cloning it.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Dispatches an action: runs the root reducer, publishes the new state
    /// to every subscriber in registration order, then feeds matching
    /// effects.
    ///
    /// Reentrant calls (from a subscriber or an effect task while another
    /// dispatch is in flight) are queued FIFO and drained after the current
    /// transition's notifications complete.
    ///
    /// # Errors
    ///
    /// [`StoreError::Reducer`] when a slice reducer fails — the state keeps
    /// its pre-dispatch value. [`StoreError::ShutdownInProgress`] after
    /// [`Store::shutdown`] has been initiated. A queued (reentrant or
    /// concurrent) dispatch returns `Ok` at enqueue time; its fault, if any,
    /// is logged when the queue drains.
    pub fn dispatch<A: Action>(&self, action: A) -> Result<(), StoreError> {
        self.dispatch_dyn(Arc::new(action))
    }

    /// [`Store::dispatch`] for an already-shared action.
    ///
    /// # Errors
    ///
    /// Same as [`Store::dispatch`].
    pub fn dispatch_dyn(&self, action: DynAction) -> Result<(), StoreError> {
        if self.inner.shutdown.load(Ordering::Acquire) {
            tracing::warn!(kind = %action.kind(), "rejected action: store is shutting down");
            metrics::counter!("store.dispatch.rejected").increment(1);
            return Err(StoreError::ShutdownInProgress);
        }

        let submitted = Arc::clone(&action);
        {
            let mut queue = self.lock_queue();
            queue.pending.push_back(action);
            if queue.draining {
                tracing::debug!(kind = %submitted.kind(), "dispatch queued behind in-flight transition");
                metrics::counter!("store.dispatch.queued").increment(1);
                return Ok(());
            }
            queue.draining = true;
        }

        let mut own_result = Ok(());
        loop {
            let next = {
                let mut queue = self.lock_queue();
                match queue.pending.pop_front() {
                    Some(action) => action,
                    None => {
                        queue.draining = false;
                        break;
                    }
                }
            };

            let result = self.process(&next);
            if Arc::ptr_eq(&next, &submitted) {
                own_result = result.map_err(StoreError::from);
            } else if let Err(fault) = result {
                tracing::error!(
                    kind = %next.kind(),
                    error = %fault,
                    "queued dispatch failed; state unchanged"
                );
            }
        }
        own_result
    }

    /// Runs one transition: reduce, publish, feed effects.
    fn process(&self, action: &DynAction) -> Result<(), ReducerFault> {
        tracing::debug!(kind = %action.kind(), "dispatching");
        metrics::counter!("store.dispatch.total").increment(1);

        let current = self.state();
        let started = std::time::Instant::now();
        let next = match self.inner.root.reduce(&current, action.as_ref()) {
            Ok(next) => next,
            Err(fault) => {
                metrics::counter!("store.dispatch.faults").increment(1);
                return Err(fault);
            }
        };
        metrics::histogram!("store.reducer.duration_seconds").record(started.elapsed().as_secs_f64());

        let changed = !next.same_as(&current);
        {
            let mut state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
            *state = next.clone();
        }
        tracing::trace!(kind = %action.kind(), changed, "transition applied");

        // Publish to a stable snapshot of the subscriber set: observers
        // removed mid-round cannot skip or double-call the rest.
        let snapshot: Vec<Arc<SubscriberFn>> = {
            let subscribers = self.lock_subscribers();
            subscribers.entries.iter().map(|(_, f)| Arc::clone(f)).collect()
        };
        for observer in snapshot {
            observer(&next);
        }

        // Effects observe post-transition state only.
        self.feed_effects(action, &next);
        Ok(())
    }

    fn feed_effects(&self, action: &DynAction, state: &AppState) {
        let kind = action.kind();
        for effect in &self.inner.effects {
            if !effect.matches(kind) || effect.cancelled.load(Ordering::Acquire) {
                continue;
            }
            let Some(runtime) = &self.inner.runtime else {
                // Unreachable when built through StoreBuilder; kept as a log
                // rather than a panic.
                tracing::error!(effect = effect.name, "no runtime available; effect skipped");
                continue;
            };

            tracing::debug!(effect = effect.name, kind = %kind, "spawning effect handler");
            metrics::counter!("store.effects.spawned").increment(1);
            self.inner.pending_effects.fetch_add(1, Ordering::SeqCst);
            let guard = PendingGuard(Arc::clone(&self.inner.pending_effects));

            let handler = Arc::clone(&effect.handler);
            let cancelled = Arc::clone(&effect.cancelled);
            let name = effect.name;
            let store = self.clone();
            let action = Arc::clone(action);
            let state = state.clone();

            runtime.spawn(async move {
                let _guard = guard;
                match handler.handle(action, state).await {
                    Ok(follow_ups) => {
                        for follow_up in follow_ups {
                            if cancelled.load(Ordering::Acquire) {
                                tracing::debug!(effect = name, "cancelled; follow-up dropped");
                                metrics::counter!("store.effects.cancelled").increment(1);
                                break;
                            }
                            if let Err(error) = store.dispatch_dyn(follow_up) {
                                tracing::error!(
                                    effect = name,
                                    %error,
                                    "follow-up dispatch failed"
                                );
                            }
                        }
                    }
                    Err(failure) => {
                        // Caught at the per-handler boundary: logged, never
                        // propagated to other handlers or the store.
                        metrics::counter!("store.effects.failed").increment(1);
                        tracing::error!(effect = name, error = %failure, "effect handler failed");
                    }
                }
            });
        }
    }

    /// Returns the current state snapshot. O(1), never blocks on reducers.
    #[must_use]
    pub fn state(&self) -> AppState {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Extracts a named slice of the current state.
    ///
    /// # Errors
    ///
    /// [`SelectError`] for an unregistered name or mismatched type.
    pub fn slice<T: Send + Sync + 'static>(&self, name: &'static str) -> Result<Arc<T>, SelectError> {
        self.state().slice::<T>(name)
    }

    /// Evaluates a selector against the current state.
    ///
    /// # Errors
    ///
    /// [`SelectError`] from the selector's composition.
    pub fn select<S: Selector>(&self, selector: &S) -> Result<S::Output, SelectError> {
        selector.select(&self.state())
    }

    /// Evaluates a props selector against the current state.
    ///
    /// # Errors
    ///
    /// [`SelectError`] from the selector's composition.
    pub fn select_with<S, Props>(
        &self,
        selector: &S,
        props: &Props,
    ) -> Result<S::Output, SelectError>
    where
        S: SelectorWithProps<Props>,
    {
        selector.select_with(&self.state(), props)
    }

    /// Registers an observer of published states.
    ///
    /// The observer is invoked once immediately with the current state
    /// (replay-on-subscribe) and again after every subsequent transition, in
    /// registration order relative to other observers, until unsubscribed.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&AppState) + Send + Sync + 'static,
    {
        let observer: Arc<SubscriberFn> = Arc::new(observer);
        let id = {
            let mut subscribers = self.lock_subscribers();
            let id = SubscriptionId(subscribers.next_id);
            subscribers.next_id += 1;
            subscribers.entries.push((id, Arc::clone(&observer)));
            id
        };

        observer(&self.state());
        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    /// Removes a subscription. Idempotent.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        self.inner.remove_subscriber(subscription.id);
    }

    /// Watches a selector: the callback fires on subscribe and then whenever
    /// the selected value changes (by [`stateflow_core::selector::MemoEq`])
    /// across published states.
    ///
    /// Selector evaluation errors are logged, not propagated — wire-up
    /// mistakes belong to startup verification.
    pub fn observe<S, F>(&self, selector: S, callback: F) -> Subscription
    where
        S: Selector,
        F: Fn(&S::Output) + Send + Sync + 'static,
    {
        use stateflow_core::selector::MemoEq;

        let last: Mutex<Option<S::Output>> = Mutex::new(None);
        self.subscribe(move |state| match selector.select(state) {
            Ok(output) => {
                let mut last = last.lock().unwrap_or_else(PoisonError::into_inner);
                let unchanged = last.as_ref().is_some_and(|prior| output.memo_eq(prior));
                if !unchanged {
                    *last = Some(output.clone());
                    drop(last);
                    callback(&output);
                }
            }
            Err(error) => {
                tracing::warn!(%error, "selector evaluation failed during observe");
            }
        })
    }

    /// Waits until the store is quiescent: no queued actions and no pending
    /// effect tasks.
    ///
    /// # Errors
    ///
    /// [`StoreError::SettleTimeout`] when effects are still running after
    /// `timeout`.
    pub async fn settle(&self, timeout: Duration) -> Result<(), StoreError> {
        let started = std::time::Instant::now();
        let poll_interval = Duration::from_millis(10);

        loop {
            let pending = self.inner.pending_effects.load(Ordering::SeqCst);
            let queued = {
                let queue = self.lock_queue();
                queue.pending.len() + usize::from(queue.draining)
            };

            if pending == 0 && queued == 0 {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                tracing::error!(pending, queued, "settle timed out");
                return Err(StoreError::SettleTimeout(pending));
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Initiates graceful shutdown: rejects new dispatches, then waits for
    /// pending effects to finish.
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownTimeout`] when effects are still running after
    /// `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("initiating graceful shutdown");
        metrics::counter!("store.shutdown.initiated").increment(1);
        self.inner.shutdown.store(true, Ordering::Release);

        let started = std::time::Instant::now();
        let poll_interval = Duration::from_millis(10);

        loop {
            let pending = self.inner.pending_effects.load(Ordering::SeqCst);
            if pending == 0 {
                tracing::info!("all effects completed, shutdown successful");
                return Ok(());
            }
            if started.elapsed() >= timeout {
                tracing::error!(pending, "shutdown timed out");
                return Err(StoreError::ShutdownTimeout(pending));
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Number of active subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock_subscribers().entries.len()
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, DispatchQueue> {
        self.inner.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_subscribers(&self) -> std::sync::MutexGuard<'_, SubscriberSet> {
        self.inner.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store {
    /// Starts a [`StoreBuilder`].
    #[must_use]
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }
}
