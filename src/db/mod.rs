//! Persistence layer for product lookups.
//!
//! Provides a trait-based interface with one operation per bound lookup
//! mode, allowing different database backends to be used interchangeably.

mod mock;
mod postgres;
mod product;
mod sqlite;
mod types;

pub use mock::{FailingProductStore, MockProductStore, StoreCall};
pub use postgres::PostgresStore;
pub use product::Product;
pub use sqlite::SqliteStore;
pub use types::{ResultSet, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Postgres,
    Sqlite,
}

impl DatabaseBackend {
    /// Returns the backend as a string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }

    /// Parses a backend from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

/// Opens a store for the given configuration.
///
/// This is the central factory function for database connections.
pub async fn connect(config: &ConnectionConfig) -> Result<Arc<dyn ProductStore>> {
    match config.backend {
        DatabaseBackend::Postgres => Ok(Arc::new(PostgresStore::connect(config).await?)),
        DatabaseBackend::Sqlite => Ok(Arc::new(SqliteStore::connect(config).await?)),
    }
}

/// Read-only product lookups.
///
/// Each operation returns rows already shaped for the mode it answers.
/// An empty vector means no match; faults are `ShelfError::Persistence`.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Looks up a single product by id. Returns zero or one rows.
    async fn lookup_by_id(&self, id: i64) -> Result<Vec<Row>>;

    /// Lists every product in `category`.
    async fn lookup_by_category(&self, category: &str) -> Result<Vec<Row>>;

    /// Closes the underlying connection pool.
    async fn close(&self) -> Result<()>;
}
