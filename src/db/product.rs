//! Product records as stored in the `products` table.

use super::{Row, Value};

/// A product row.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
}

impl Product {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        quantity: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            price,
            quantity,
        }
    }

    /// Row shape of the product-by-id lookup: ID, Name, Category, Price, Quantity.
    pub fn detail_row(&self) -> Row {
        vec![
            Value::Int(self.id),
            Value::String(self.name.clone()),
            Value::String(self.category.clone()),
            Value::Float(self.price),
            Value::Int(self.quantity),
        ]
    }

    /// Row shape of the by-category lookup: ID, Name, Price, Quantity.
    pub fn listing_row(&self) -> Row {
        vec![
            Value::Int(self.id),
            Value::String(self.name.clone()),
            Value::Float(self.price),
            Value::Int(self.quantity),
        ]
    }
}

impl From<(i64, String, String, f64, i64)> for Product {
    fn from((id, name, category, price, quantity): (i64, String, String, f64, i64)) -> Self {
        Self {
            id,
            name,
            category,
            price,
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;

    #[test]
    fn test_rows_match_catalog_schemas() {
        let product = Product::new(7, "Whole Milk", "dairy", 3.49, 24);
        assert_eq!(
            product.detail_row().len(),
            CATALOG.schema_for(0).unwrap().len()
        );
        assert_eq!(
            product.listing_row().len(),
            CATALOG.schema_for(1).unwrap().len()
        );
    }

    #[test]
    fn test_listing_row_skips_category() {
        let product = Product::new(7, "Whole Milk", "dairy", 3.49, 24);
        assert_eq!(
            product.listing_row(),
            vec![
                Value::Int(7),
                Value::from("Whole Milk"),
                Value::Float(3.49),
                Value::Int(24)
            ]
        );
    }
}
