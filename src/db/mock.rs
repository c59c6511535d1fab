//! In-memory product stores for tests and the `--mock-db` demo mode.

use super::{Product, ProductStore, Row};
use crate::error::{Result, ShelfError};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// A store operation as received by a mock, for asserting on calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    ById(i64),
    ByCategory(String),
}

/// A mock store that answers from a fixed product list.
pub struct MockProductStore {
    products: Vec<Product>,
    latency: Duration,
    calls: Mutex<Vec<StoreCall>>,
}

impl MockProductStore {
    /// Creates an empty mock store.
    pub fn new() -> Self {
        Self::with_products(Vec::new())
    }

    /// Creates a mock store holding the given products.
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products,
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A small grocery inventory used by `--mock-db`.
    pub fn grocery() -> Self {
        Self::with_products(vec![
            Product::new(1, "Whole Milk", "dairy", 3.49, 24),
            Product::new(2, "Cheddar", "dairy", 5.99, 12),
            Product::new(3, "Greek Yogurt", "dairy", 1.29, 40),
            Product::new(4, "Sourdough Loaf", "bakery", 4.50, 8),
            Product::new(5, "Bagels (6)", "bakery", 3.99, 15),
            Product::new(6, "Bananas", "produce", 0.25, 120),
            Product::new(7, "Gala Apples", "produce", 0.89, 80),
            Product::new(8, "Ground Coffee", "pantry", 8.75, 20),
        ])
    }

    /// Delays every lookup by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Returns the operations received so far, oldest first.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    async fn record(&self, call: StoreCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for MockProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductStore for MockProductStore {
    async fn lookup_by_id(&self, id: i64) -> Result<Vec<Row>> {
        self.record(StoreCall::ById(id)).await;
        Ok(self
            .products
            .iter()
            .filter(|p| p.id == id)
            .take(1)
            .map(Product::detail_row)
            .collect())
    }

    async fn lookup_by_category(&self, category: &str) -> Result<Vec<Row>> {
        self.record(StoreCall::ByCategory(category.to_string()))
            .await;
        Ok(self
            .products
            .iter()
            .filter(|p| p.category == category)
            .map(Product::listing_row)
            .collect())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A store whose every lookup fails, for exercising error paths.
pub struct FailingProductStore {
    message: String,
}

impl FailingProductStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ProductStore for FailingProductStore {
    async fn lookup_by_id(&self, _id: i64) -> Result<Vec<Row>> {
        Err(ShelfError::persistence(self.message.clone()))
    }

    async fn lookup_by_category(&self, _category: &str) -> Result<Vec<Row>> {
        Err(ShelfError::persistence(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
