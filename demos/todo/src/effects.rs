//! Load effect for the todos slice.
//!
//! `[Todo Page] Load Todos` triggers a fetch against the injected
//! [`TodoApi`]; the handler converts the outcome into the paired
//! `[Todo API] Load Todos Success` / `Load Todos Failure` actions, so API
//! failures re-enter the normal action flow instead of escaping the
//! pipeline.

use crate::actions::{LOAD_TODOS, TodoAction};
use crate::types::Todo;
use futures::future::BoxFuture;
use stateflow_core::action::DynAction;
use stateflow_core::smallvec;
use stateflow_core::state::AppState;
use stateflow_runtime::{Effect, EffectFuture, EffectHandle, EffectHandler, create_effect};
use std::sync::Arc;
use thiserror::Error;

/// Failure fetching todos from the backing service
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct ApiError(pub String);

/// The backing service the load effect fetches from.
///
/// Injected as a trait so demos and tests swap implementations freely.
pub trait TodoApi: Send + Sync + 'static {
    /// Fetches the full todo list.
    fn fetch_todos(&self) -> BoxFuture<'static, Result<Vec<Todo>, ApiError>>;
}

/// An in-memory [`TodoApi`] serving a fixed list.
pub struct InMemoryTodoApi {
    todos: Vec<Todo>,
}

impl InMemoryTodoApi {
    /// Creates an API serving the given todos.
    #[must_use]
    pub const fn new(todos: Vec<Todo>) -> Self {
        Self { todos }
    }
}

impl TodoApi for InMemoryTodoApi {
    fn fetch_todos(&self) -> BoxFuture<'static, Result<Vec<Todo>, ApiError>> {
        let todos = self.todos.clone();
        Box::pin(async move { Ok(todos) })
    }
}

/// A [`TodoApi`] that always fails, for exercising the failure path.
pub struct FailingTodoApi {
    message: String,
}

impl FailingTodoApi {
    /// Creates an API failing with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl TodoApi for FailingTodoApi {
    fn fetch_todos(&self) -> BoxFuture<'static, Result<Vec<Todo>, ApiError>> {
        let message = self.message.clone();
        Box::pin(async move { Err(ApiError(message)) })
    }
}

/// Handler backing the load effect.
pub struct LoadTodosEffect {
    api: Arc<dyn TodoApi>,
}

impl LoadTodosEffect {
    /// Creates the handler over the given API.
    #[must_use]
    pub fn new(api: Arc<dyn TodoApi>) -> Self {
        Self { api }
    }
}

impl EffectHandler for LoadTodosEffect {
    fn handle(&self, _action: DynAction, _state: AppState) -> EffectFuture {
        let api = Arc::clone(&self.api);
        Box::pin(async move {
            let follow_up = match api.fetch_todos().await {
                Ok(todos) => TodoAction::load_success(todos),
                Err(error) => {
                    tracing::warn!(%error, "todo fetch failed");
                    TodoAction::load_failure(error.to_string())
                }
            };
            Ok(smallvec![Arc::new(follow_up) as DynAction])
        })
    }
}

/// Binds the load handler to `[Todo Page] Load Todos`.
#[must_use]
pub fn load_todos_effect(api: Arc<dyn TodoApi>) -> (Effect, EffectHandle) {
    create_effect("load-todos", [LOAD_TODOS], LoadTodosEffect::new(api))
}
