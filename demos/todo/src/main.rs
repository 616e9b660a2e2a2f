//! CLI demo for the todo example.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use todo::{InMemoryTodoApi, Todo, TodoAction, TodoId, TodosState, build_store, selectors};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Todo Example ===\n");

    let remote = vec![
        Todo::new(TodoId::new(), "Review the release notes".into(), Utc::now()),
        Todo::new(TodoId::new(), "File the expense report".into(), Utc::now()),
    ];
    let (store, _load_handle) = build_store(Arc::new(InMemoryTodoApi::new(remote)))?;

    // Watch the load status as it moves through the lifecycle.
    let status_sub = store.observe(selectors::select_status(), |status| {
        println!("status: {status:?}");
    });

    println!("Adding todos...");
    store.dispatch(TodoAction::add("Buy milk"))?;
    store.dispatch(TodoAction::add("Write documentation"))?;

    let state = store.slice::<TodosState>("todos")?;
    println!("\nTodos after adding: {}", state.count());
    for item in state.todos.iter() {
        println!("  - {}", item.content);
    }

    let first_id = state.todos[0].id.clone();
    println!("\nRemoving '{}'...", state.todos[0].content);
    store.dispatch(TodoAction::Remove { id: first_id })?;

    println!("\nLoading todos from the API...");
    store.dispatch(TodoAction::Load)?;
    store.settle(Duration::from_secs(5)).await?;

    let state = store.slice::<TodosState>("todos")?;
    println!("\nload finished with status {:?}", state.status);
    println!("Todos after load: {}", state.count());
    for item in state.todos.iter() {
        println!("  - {}", item.content);
    }

    status_sub.unsubscribe();
    store.shutdown(Duration::from_secs(5)).await?;
    println!("\nDone.");
    Ok(())
}
