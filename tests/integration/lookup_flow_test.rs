//! End-to-end lookup flow tests.
//!
//! Drive the dispatcher and presentation binding the way the TUI does,
//! against the SQLite store.

use super::common::seeded_sqlite_store;
use shelf_lookup::binding::{BindingState, PresentationBinding};
use shelf_lookup::catalog::CATALOG;
use shelf_lookup::config::QueryConfig;
use shelf_lookup::db::{MockProductStore, ProductStore, Value};
use shelf_lookup::dispatch::QueryDispatcher;
use shelf_lookup::error::ShelfError;
use std::sync::Arc;
use std::time::Duration;

async fn sqlite_dispatcher() -> QueryDispatcher {
    let store: Arc<dyn ProductStore> = Arc::new(seeded_sqlite_store().await);
    QueryDispatcher::new(store, &QueryConfig::default())
}

#[tokio::test]
async fn test_by_id_flow() {
    let dispatcher = sqlite_dispatcher().await;
    let mut binding = PresentationBinding::new(0).unwrap();

    let result = binding.on_run_requested(&dispatcher, 0, "3").await.unwrap();

    assert_eq!(result.columns, CATALOG.schema_for(0).unwrap());
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0][1], Value::from("Sourdough Loaf"));
}

#[tokio::test]
async fn test_by_category_flow() {
    let dispatcher = sqlite_dispatcher().await;

    let result = dispatcher.dispatch(1, "dairy").await.unwrap();

    assert_eq!(result.rows.len(), 3);
    for row in &result.rows {
        assert_eq!(row.len(), result.columns.len());
    }
}

#[tokio::test]
async fn test_switching_modes_keeps_rows_until_next_run() {
    let dispatcher = sqlite_dispatcher().await;
    let mut binding = PresentationBinding::new(1).unwrap();
    binding.on_run_requested(&dispatcher, 1, "dairy").await.unwrap();

    binding.on_mode_changed(0).unwrap();

    let view = binding.view();
    assert_eq!(view.headers, CATALOG.schema_for(0).unwrap());
    let displayed = view.displayed.as_ref().unwrap();
    assert_eq!(displayed.mode_id, 1);
    assert_eq!(displayed.columns, CATALOG.schema_for(1).unwrap());

    let result = binding.on_run_requested(&dispatcher, 0, "1").await.unwrap();
    assert_eq!(result.mode_id, 0);
}

#[tokio::test]
async fn test_unbound_mode_renders_empty_table() {
    let dispatcher = sqlite_dispatcher().await;
    let mut binding = PresentationBinding::new(2).unwrap();

    let result = binding.on_run_requested(&dispatcher, 2, "1").await.unwrap();

    assert!(result.is_empty());
    assert_eq!(result.columns, CATALOG.schema_for(2).unwrap());
}

#[tokio::test]
async fn test_failed_run_keeps_previous_result() {
    let store = Arc::new(seeded_sqlite_store().await);
    let dispatcher = QueryDispatcher::new(store.clone(), &QueryConfig::default());
    let mut binding = PresentationBinding::new(1).unwrap();
    binding.on_run_requested(&dispatcher, 1, "bakery").await.unwrap();
    let before = binding.view().displayed.clone();

    store.close().await.unwrap();
    let err = binding
        .on_run_requested(&dispatcher, 1, "dairy")
        .await
        .unwrap_err();

    assert!(matches!(err, ShelfError::Persistence(_)));
    assert_eq!(binding.view().displayed, before);
    assert!(binding.view().last_error.is_some());
}

#[tokio::test]
async fn test_rapid_runs_never_apply_out_of_order() {
    let store = MockProductStore::grocery().with_latency(Duration::from_millis(50));
    let dispatcher = Arc::new(QueryDispatcher::new(Arc::new(store), &QueryConfig::default()));
    let mut binding = PresentationBinding::new(1).unwrap();

    // First run goes out on a worker, as the TUI does it.
    let first = binding.begin_run(1).unwrap();
    let worker = {
        let dispatcher = Arc::clone(&dispatcher);
        tokio::spawn(async move { dispatcher.dispatch(1, "dairy").await })
    };

    // The second run, for a different mode, arrives while the first is pending.
    assert_eq!(binding.begin_run(0), Err(ShelfError::Busy));
    assert_eq!(binding.state(), BindingState::AwaitingResult(first));

    binding.complete_run(first, worker.await.unwrap()).unwrap();
    assert_eq!(binding.view().displayed.as_ref().unwrap().mode_id, 1);

    // Re-issued once idle, the second run wins.
    let result = binding.on_run_requested(&dispatcher, 0, "2").await.unwrap();
    assert_eq!(result.mode_id, 0);

    // A late duplicate delivery of the first outcome is ignored.
    binding
        .complete_run(first, dispatcher.dispatch(1, "dairy").await)
        .unwrap();
    assert_eq!(binding.view().displayed.as_ref().unwrap().mode_id, 0);
}
