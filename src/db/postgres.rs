//! PostgreSQL product store.
//!
//! Provides the `PostgresStore` struct that implements the `ProductStore` trait
//! for PostgreSQL databases using sqlx.

use crate::config::ConnectionConfig;
use crate::db::{Product, ProductStore, Row};
use crate::error::{Result, ShelfError};
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Postgres;
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum number of connection retry attempts.
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay between retry attempts (doubles each retry).
const RETRY_BASE_DELAY_MS: u64 = 500;

const PRODUCT_BY_ID_SQL: &str = r#"
    SELECT id::bigint, name::text, category::text, price::float8, quantity::bigint
    FROM products
    WHERE id = $1
    LIMIT 1
"#;

const PRODUCTS_BY_CATEGORY_SQL: &str = r#"
    SELECT id::bigint, name::text, category::text, price::float8, quantity::bigint
    FROM products
    WHERE category = $1
    ORDER BY id
"#;

type ProductTuple = (i64, String, String, f64, i64);

/// PostgreSQL product store.
#[derive(Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store from an existing connection pool.
    ///
    /// This is primarily useful for testing.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the configured server, retrying transient failures.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let conn_str = config.to_connection_string()?;

        let mut last_error = None;
        let mut delay = Duration::from_millis(RETRY_BASE_DELAY_MS);

        for attempt in 1..=MAX_RETRY_ATTEMPTS {
            debug!("Connection attempt {} of {}", attempt, MAX_RETRY_ATTEMPTS);

            let result = PgPoolOptions::new()
                .max_connections(2)
                .acquire_timeout(Duration::from_secs(10))
                .connect(&conn_str)
                .await;

            match result {
                Ok(pool) => {
                    debug!("Successfully connected to database");
                    return Ok(Self { pool });
                }
                Err(e) => {
                    let is_transient = is_transient_error(&e);
                    last_error = Some(e);

                    if attempt < MAX_RETRY_ATTEMPTS && is_transient {
                        warn!(
                            "Connection attempt {} failed (transient error), retrying in {:?}",
                            attempt, delay
                        );
                        tokio::time::sleep(delay).await;
                        delay *= 2; // Exponential backoff
                    } else {
                        break;
                    }
                }
            }
        }

        match last_error {
            Some(e) => Err(map_connection_error(e, config)),
            None => Err(ShelfError::internal("No connection attempt was made")),
        }
    }

    /// Checks out one connection for the duration of a single lookup.
    async fn acquire(&self) -> Result<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| ShelfError::persistence(format!("Failed to acquire connection: {e}")))
    }
}

#[async_trait]
impl ProductStore for PostgresStore {
    async fn lookup_by_id(&self, id: i64) -> Result<Vec<Row>> {
        let mut conn = self.acquire().await?;
        let product: Option<ProductTuple> = sqlx::query_as(PRODUCT_BY_ID_SQL)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| ShelfError::persistence(format_query_error(e)))?;

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
            .map_err(|e| ShelfError::persistence(format_query_error(e)))?;

        debug!(
            "Category '{}' matched {} products",
            category,
            products.len()
        );

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

/// Determines if an error is transient and worth retrying.
fn is_transient_error(error: &sqlx::Error) -> bool {
    let error_str = error.to_string().to_lowercase();

    // Authentication and database-not-found errors are not transient
    if error_str.contains("password authentication failed")
        || error_str.contains("authentication failed")
        || error_str.contains("does not exist")
    {
        return false;
    }

    error_str.contains("connection refused")
        || error_str.contains("timed out")
        || error_str.contains("temporarily unavailable")
        || error_str.contains("connection reset")
        || error_str.contains("broken pipe")
}

/// Maps sqlx connection errors to user-friendly messages.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> ShelfError {
    let host = config.host.as_deref().unwrap_or("localhost");
    let port = config.port;
    let user = config.user.as_deref().unwrap_or("unknown");
    let database = config.database.as_deref().unwrap_or("unknown");

    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        ShelfError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running."
        ))
    } else if error_str.contains("authentication failed") {
        ShelfError::connection(format!(
            "Authentication failed for user '{user}'. Check your credentials."
        ))
    } else if error_str.contains("does not exist") && error_str.contains("database") {
        ShelfError::connection(format!("Database '{database}' does not exist."))
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        ShelfError::connection(format!(
            "Connection to {host}:{port} timed out. The server may be overloaded or unreachable."
        ))
    } else {
        ShelfError::connection(error.to_string())
    }
}

/// Formats a query error, keeping the server's detail and hint when present.
fn format_query_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    let mut result = format!("ERROR: {}", db_error.message());
    if let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
        if let Some(detail) = pg_error.detail() {
            result.push_str("\n  DETAIL: ");
            result.push_str(detail);
        }
        if let Some(hint) = pg_error.hint() {
            result.push_str("\n  HINT: ");
            result.push_str(hint);
        }
    }
    result
}
