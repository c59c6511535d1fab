//! PostgreSQL store tests.
//!
//! Each test creates its own temporary `products` table, so any database
//! the DATABASE_URL user can write to will do.

use shelf_lookup::db::{PostgresStore, ProductStore, Value};
use sqlx::postgres::PgPoolOptions;

/// Helper to get test database URL from environment.
fn get_test_database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

/// Connects a single-connection store whose session sees a seeded temp table.
async fn get_test_store() -> Option<PostgresStore> {
    let url = get_test_database_url()?;
    // Temp tables are per-session, so pin the pool to one connection.
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .ok()?;
    sqlx::raw_sql(
        r#"
        CREATE TEMP TABLE products (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            price NUMERIC(10, 2) NOT NULL,
            quantity INTEGER NOT NULL
        );
        INSERT INTO products VALUES
            (1, 'Whole Milk', 'dairy', 3.50, 24),
            (2, 'Cheddar', 'dairy', 6.00, 12),
            (3, 'Sourdough Loaf', 'bakery', 4.50, 8);
        "#,
    )
    .execute(&pool)
    .await
    .ok()?;

    Some(PostgresStore::from_pool(pool))
}

#[tokio::test]
async fn test_lookup_by_id() {
    let Some(store) = get_test_store().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let rows = store.lookup_by_id(2).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], Value::from("Cheddar"));
    assert_eq!(rows[0][3], Value::Float(6.0));

    store.close().await.unwrap();
}

#[tokio::test]
async fn test_lookup_by_category() {
    let Some(store) = get_test_store().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let rows = store.lookup_by_category("dairy").await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], Value::Int(1));
    assert_eq!(rows[0].len(), 4);

    assert!(store.lookup_by_category("").await.unwrap().is_empty());

    store.close().await.unwrap();
}
