//! Integration tests for the effect pipeline
//!
//! Covers the system-wide ordering guarantee (trigger transitions always
//! precede their follow-ups), post-transition snapshots, concurrent
//! handlers, failure absorption at the per-handler boundary, cancellation,
//! and quiescence/shutdown.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use stateflow_core::action::{Action, ActionKind, DynAction};
use stateflow_core::error::SliceError;
use stateflow_core::registry::SliceReducer;
use stateflow_core::smallvec;
use stateflow_runtime::{EffectFailure, FnHandler, FollowUps, StoreBuilder, StoreError, create_effect};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Test Fixtures
// ============================================================================

const LOAD_A: ActionKind = ActionKind::new("[Pipeline] Load A");
const LOAD_B: ActionKind = ActionKind::new("[Pipeline] Load B");
const APPLIED: ActionKind = ActionKind::new("[Pipeline] Applied");

#[derive(Debug)]
enum PipelineAction {
    LoadA,
    LoadB,
    /// Follow-up carrying the tag of the work that finished
    Applied(String),
}

impl Action for PipelineAction {
    fn kind(&self) -> ActionKind {
        match self {
            Self::LoadA => LOAD_A,
            Self::LoadB => LOAD_B,
            Self::Applied(_) => APPLIED,
        }
    }

    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }
}

struct JournalReducer;

impl SliceReducer for JournalReducer {
    type Slice = Vec<String>;

    fn initial(&self) -> Vec<String> {
        Vec::new()
    }

    fn reduce(&self, slice: &Vec<String>, action: &dyn Action) -> Result<Option<Vec<String>>, SliceError> {
        let Some(action) = action.downcast_ref::<PipelineAction>() else {
            return Ok(None);
        };
        let entry = match action {
            PipelineAction::LoadA => "load_a".to_string(),
            PipelineAction::LoadB => "load_b".to_string(),
            PipelineAction::Applied(tag) => tag.clone(),
        };
        let mut next = slice.clone();
        next.push(entry);
        Ok(Some(next))
    }
}

fn journal(store: &stateflow_runtime::Store) -> Vec<String> {
    store.slice::<Vec<String>>("journal").unwrap().as_ref().clone()
}

fn follow_up(tag: impl Into<String>) -> FollowUps {
    smallvec![Arc::new(PipelineAction::Applied(tag.into())) as DynAction]
}

// ============================================================================
// Tests
// ============================================================================

/// Dispatching A then B, with effects producing C and D, yields transitions
/// in the order A', B', then C/D in completion order of their async work —
/// never C/D before A' and B'.
#[tokio::test]
async fn follow_ups_never_precede_their_triggers() {
    let (slow, _slow_handle) = create_effect(
        "slow-load",
        [LOAD_A],
        FnHandler::new(|_action, _state| async move {
            tokio::time::sleep(Duration::from_millis(80)).await;
            Ok(follow_up("done_a"))
        }),
    );
    let (fast, _fast_handle) = create_effect(
        "fast-load",
        [LOAD_B],
        FnHandler::new(|_action, _state| async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(follow_up("done_b"))
        }),
    );

    let store = StoreBuilder::new()
        .with_slice("journal", JournalReducer)
        .with_effect(slow)
        .with_effect(fast)
        .build()
        .unwrap();

    store.dispatch(PipelineAction::LoadA).unwrap();
    store.dispatch(PipelineAction::LoadB).unwrap();
    store.settle(Duration::from_secs(2)).await.unwrap();

    let journal = journal(&store);
    assert_eq!(journal[..2], ["load_a".to_string(), "load_b".to_string()]);
    // Completion order: the fast effect's follow-up lands first.
    assert_eq!(journal[2..], ["done_b".to_string(), "done_a".to_string()]);
}

/// Effects observe post-transition state only.
#[tokio::test]
async fn handlers_see_the_state_their_trigger_produced() {
    let (effect, _handle) = create_effect(
        "snapshot-probe",
        [LOAD_A],
        FnHandler::new(|_action, state| async move {
            let journal = state.slice::<Vec<String>>("journal").map_err(|e| EffectFailure::new(e.to_string()))?;
            Ok(follow_up(format!("saw_{}", journal.len())))
        }),
    );

    let store = StoreBuilder::new()
        .with_slice("journal", JournalReducer)
        .with_effect(effect)
        .build()
        .unwrap();

    store.dispatch(PipelineAction::LoadA).unwrap();
    store.settle(Duration::from_secs(2)).await.unwrap();

    // The handler saw "load_a" already applied.
    assert_eq!(journal(&store), ["load_a".to_string(), "saw_1".to_string()]);
}

/// Two handlers matching the same kind both run, concurrently.
#[tokio::test]
async fn matching_handlers_run_independently() {
    let (first, _h1) = create_effect(
        "first",
        [LOAD_A],
        FnHandler::new(|_action, _state| async move { Ok(follow_up("from_first")) }),
    );
    let (second, _h2) = create_effect(
        "second",
        [LOAD_A],
        FnHandler::new(|_action, _state| async move { Ok(follow_up("from_second")) }),
    );

    let store = StoreBuilder::new()
        .with_slice("journal", JournalReducer)
        .with_effect(first)
        .with_effect(second)
        .build()
        .unwrap();

    store.dispatch(PipelineAction::LoadA).unwrap();
    store.settle(Duration::from_secs(2)).await.unwrap();

    let journal = journal(&store);
    assert!(journal.contains(&"from_first".to_string()));
    assert!(journal.contains(&"from_second".to_string()));
}

/// A failing handler is caught at its boundary: logged, absorbed, and
/// without consequence for other handlers or the store.
#[tokio::test]
async fn handler_failure_does_not_crash_the_pipeline() {
    let (failing, _h1) = create_effect(
        "failing",
        [LOAD_A],
        FnHandler::new(|_action, _state| async move {
            Err::<FollowUps, _>(EffectFailure::new("connection refused"))
        }),
    );
    let (healthy, _h2) = create_effect(
        "healthy",
        [LOAD_A],
        FnHandler::new(|_action, _state| async move { Ok(follow_up("still_alive")) }),
    );

    let store = StoreBuilder::new()
        .with_slice("journal", JournalReducer)
        .with_effect(failing)
        .with_effect(healthy)
        .build()
        .unwrap();

    store.dispatch(PipelineAction::LoadA).unwrap();
    store.settle(Duration::from_secs(2)).await.unwrap();

    let journal = journal(&store);
    assert!(journal.contains(&"still_alive".to_string()));

    // The store keeps working after the failure.
    store.dispatch(PipelineAction::LoadB).unwrap();
    store.settle(Duration::from_secs(2)).await.unwrap();
    assert!(journal_contains(&store, "load_b"));
}

fn journal_contains(store: &stateflow_runtime::Store, entry: &str) -> bool {
    journal(store).iter().any(|e| e == entry)
}

/// Cancelling an effect prevents any further follow-up dispatch from it,
/// including from invocations already in flight.
#[tokio::test]
async fn cancellation_suppresses_follow_ups() {
    let (cancellable, handle) = create_effect(
        "cancellable",
        [LOAD_A],
        FnHandler::new(|_action, _state| async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(follow_up("too_late"))
        }),
    );
    let (other, _other_handle) = create_effect(
        "unaffected",
        [LOAD_A],
        FnHandler::new(|_action, _state| async move { Ok(follow_up("unaffected")) }),
    );

    let store = StoreBuilder::new()
        .with_slice("journal", JournalReducer)
        .with_effect(cancellable)
        .with_effect(other)
        .build()
        .unwrap();

    store.dispatch(PipelineAction::LoadA).unwrap();
    handle.cancel();
    store.settle(Duration::from_secs(2)).await.unwrap();

    let journal = journal(&store);
    assert!(!journal.contains(&"too_late".to_string()));
    assert!(journal.contains(&"unaffected".to_string()));
}

/// A cancelled effect is not invoked for later matching actions either.
#[tokio::test]
async fn cancelled_effects_are_skipped_entirely() {
    let (effect, handle) = create_effect(
        "skippable",
        [LOAD_A],
        FnHandler::new(|_action, _state| async move { Ok(follow_up("ran")) }),
    );

    let store = StoreBuilder::new()
        .with_slice("journal", JournalReducer)
        .with_effect(effect)
        .build()
        .unwrap();

    handle.cancel();
    store.dispatch(PipelineAction::LoadA).unwrap();
    store.settle(Duration::from_secs(2)).await.unwrap();

    assert_eq!(journal(&store), ["load_a".to_string()]);
}

/// `settle` reports a timeout while an effect is still running, then
/// succeeds once it finishes.
#[tokio::test]
async fn settle_times_out_on_slow_effects() {
    let (slow, _handle) = create_effect(
        "very-slow",
        [LOAD_A],
        FnHandler::new(|_action, _state| async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(FollowUps::new())
        }),
    );

    let store = StoreBuilder::new()
        .with_slice("journal", JournalReducer)
        .with_effect(slow)
        .build()
        .unwrap();

    store.dispatch(PipelineAction::LoadA).unwrap();
    let result = store.settle(Duration::from_millis(10)).await;
    assert!(matches!(result, Err(StoreError::SettleTimeout(_))));

    store.settle(Duration::from_secs(2)).await.unwrap();
}

/// After shutdown, new dispatches are rejected while in-flight effects are
/// awaited.
#[tokio::test]
async fn shutdown_rejects_new_dispatches() {
    let store = StoreBuilder::new()
        .with_slice("journal", JournalReducer)
        .build()
        .unwrap();

    store.dispatch(PipelineAction::LoadA).unwrap();
    store.shutdown(Duration::from_secs(1)).await.unwrap();

    let result = store.dispatch(PipelineAction::LoadB);
    assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
    assert_eq!(journal(&store), ["load_a".to_string()]);
}
