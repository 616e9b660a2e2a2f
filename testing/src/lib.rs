//! # Stateflow Testing
//!
//! Testing utilities and helpers for the stateflow architecture.
//!
//! This crate provides:
//! - [`SliceTest`]: a fluent Given-When-Then harness for slice reducers
//! - [`RecordingObserver`]: a capture-style observer for store tests
//! - [`init_test_logging`]: tracing setup for test binaries
//!
//! ## Example
//!
//! ```ignore
//! use stateflow_testing::SliceTest;
//!
//! #[test]
//! fn add_todo_appends() {
//!     SliceTest::new("todos", TodosReducer)
//!         .when_action(TodoAction::add("buy milk"))
//!         .then_slice(|state| {
//!             assert_eq!(state.todos.len(), 1);
//!         })
//!         .run();
//! }
//! ```

mod observers;

pub use observers::RecordingObserver;
pub use slice_test::SliceTest;

/// Initializes a compact tracing subscriber for tests.
///
/// Reads `RUST_LOG` for filtering and is safe to call from every test; only
/// the first call installs the subscriber.
pub fn init_test_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .compact()
        .try_init();
}
