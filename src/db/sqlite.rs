//! SQLite product store.

use crate::config::ConnectionConfig;
use crate::db::{Product, ProductStore, Row};
use crate::error::{Result, ShelfError};
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Sqlite;
use std::time::Duration;
use tracing::debug;

const PRODUCT_BY_ID_SQL: &str = r#"
    SELECT id, name, category, price, quantity
    FROM products
    WHERE id = ?1
    LIMIT 1
"#;

const PRODUCTS_BY_CATEGORY_SQL: &str = r#"
    SELECT id, name, category, price, quantity
    FROM products
    WHERE category = ?1
    ORDER BY id
"#;

type ProductTuple = (i64, String, String, f64, i64);

/// SQLite product store.
#[derive(Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a store from an existing connection pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the database file named by the configuration.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let conn_str = config.to_connection_string()?;
        // Every connection to `:memory:` is a separate database.
        let max_connections = if conn_str.contains(":memory:") { 1 } else { 2 };

        debug!("Opening SQLite database {}", conn_str);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&conn_str)
            .await
            .map_err(|e| ShelfError::connection(format!("Cannot open {conn_str}: {e}")))?;

        Ok(Self { pool })
    }

    async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| ShelfError::persistence(format!("Failed to acquire connection: {e}")))
    }
}

#[async_trait]
impl ProductStore for SqliteStore {
    async fn lookup_by_id(&self, id: i64) -> Result<Vec<Row>> {
        let mut conn = self.acquire().await?;
        let product: Option<ProductTuple> = sqlx::query_as(PRODUCT_BY_ID_SQL)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| ShelfError::persistence(e.to_string()))?;

        Ok(product
            .map(|tuple| Product::from(tuple).detail_row())
            .into_iter()
            .collect())
    }

    async fn lookup_by_category(&self, category: &str) -> Result<Vec<Row>> {
        let mut conn = self.acquire().await?;
        let products: Vec<ProductTuple> = sqlx::query_as(PRODUCTS_BY_CATEGORY_SQL)
            .bind(category)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| ShelfError::persistence(e.to_string()))?;

        Ok(products
            .into_iter()
            .map(|tuple| Product::from(tuple).listing_row())
            .collect())
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}
