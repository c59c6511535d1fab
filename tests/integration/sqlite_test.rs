//! SQLite store tests.
//!
//! Exercise the product lookups against a real (in-memory) database.

use super::common::seeded_sqlite_store;
use shelf_lookup::catalog::CATALOG;
use shelf_lookup::config::ConnectionConfig;
use shelf_lookup::db::{self, ProductStore, SqliteStore, Value};
use shelf_lookup::error::ShelfError;

#[tokio::test]
async fn test_lookup_by_id_returns_one_row() {
    let store = seeded_sqlite_store().await;

    let rows = store.lookup_by_id(7).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), CATALOG.schema_for(0).unwrap().len());
    assert_eq!(
        rows[0],
        vec![
            Value::Int(7),
            Value::from("Gala Apples"),
            Value::from("produce"),
            Value::Float(0.75),
            Value::Int(80),
        ]
    );

    store.close().await.unwrap();
}

#[tokio::test]
async fn test_lookup_by_id_missing_is_empty() {
    let store = seeded_sqlite_store().await;
    assert!(store.lookup_by_id(5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_lookup_by_category_orders_by_id() {
    let store = seeded_sqlite_store().await;

    let rows = store.lookup_by_category("dairy").await.unwrap();

    let ids: Vec<&Value> = rows.iter().map(|row| &row[0]).collect();
    assert_eq!(ids, vec![&Value::Int(1), &Value::Int(2), &Value::Int(4)]);
    for row in &rows {
        assert_eq!(row.len(), CATALOG.schema_for(1).unwrap().len());
    }
}

#[tokio::test]
async fn test_lookup_by_category_is_exact_match() {
    let store = seeded_sqlite_store().await;

    assert!(store.lookup_by_category("").await.unwrap().is_empty());
    assert!(store.lookup_by_category("dair").await.unwrap().is_empty());
    assert!(store.lookup_by_category("'; DROP TABLE products; --").await.unwrap().is_empty());

    // Still intact after the hostile input above.
    assert_eq!(store.lookup_by_category("bakery").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_table_is_persistence_error() {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = SqliteStore::from_pool(pool);

    let err = store.lookup_by_id(1).await.unwrap_err();
    assert!(matches!(err, ShelfError::Persistence(msg) if msg.contains("products")));
}

#[tokio::test]
async fn test_closed_pool_is_persistence_error() {
    let store = seeded_sqlite_store().await;
    store.close().await.unwrap();

    let err = store.lookup_by_category("dairy").await.unwrap_err();
    assert!(matches!(err, ShelfError::Persistence(_)));
}

#[tokio::test]
async fn test_connect_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop.db");
    let config = ConnectionConfig::from_connection_string(&format!(
        "sqlite://{}?mode=rwc",
        path.display()
    ))
    .unwrap();

    let store = db::connect(&config).await.unwrap();

    // The fresh file has no products table yet.
    assert!(matches!(
        store.lookup_by_id(1).await,
        Err(ShelfError::Persistence(_))
    ));
    store.close().await.unwrap();
}
