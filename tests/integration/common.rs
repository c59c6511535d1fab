//! Shared fixtures for integration tests.

use shelf_lookup::db::SqliteStore;
use sqlx::sqlite::SqlitePoolOptions;

/// Products seeded into every test database.
pub const SEED_SQL: &str = r#"
    CREATE TABLE products (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        price REAL NOT NULL,
        quantity INTEGER NOT NULL
    );
    INSERT INTO products (id, name, category, price, quantity) VALUES
        (1, 'Whole Milk', 'dairy', 3.49, 24),
        (2, 'Cheddar', 'dairy', 5.99, 12),
        (3, 'Sourdough Loaf', 'bakery', 4.50, 8),
        (4, 'Butter', 'dairy', 4.25, 18),
        (7, 'Gala Apples', 'produce', 0.75, 80);
"#;

/// Opens an in-memory SQLite store seeded with `SEED_SQL`.
pub async fn seeded_sqlite_store() -> SqliteStore {
    // One connection: every `:memory:` connection is its own database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::raw_sql(SEED_SQL)
        .execute(&pool)
        .await
        .expect("seed products");
    SqliteStore::from_pool(pool)
}
