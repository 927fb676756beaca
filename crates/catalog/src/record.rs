//! Records returned by the catalog service.

use common::ProductId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product record as served by `GET products/{id}`.
///
/// Only the identifier is interpreted; every other field (title, price,
/// image, ...) is kept verbatim in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    /// Creates a product with no attributes.
    pub fn new(id: impl Into<ProductId>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
        }
    }

    /// Adds an attribute, replacing any previous value under `name`.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Returns the attribute stored under `name`.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

/// Available stock for a product as served by `GET stock/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

impl Stock {
    /// Creates a stock record.
    pub fn new(id: impl Into<ProductId>, amount: u32) -> Self {
        Self {
            id: id.into(),
            amount,
        }
    }

    /// Returns true if `requested` units can be purchased.
    pub fn allows(&self, requested: i64) -> bool {
        requested >= 1 && requested <= i64::from(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_keeps_unknown_fields() {
        let json = r#"{"id":5,"title":"Tênis","price":179.5,"image":"https://cdn/x.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, ProductId::new(5));
        assert_eq!(product.attribute("title"), Some(&Value::from("Tênis")));
        assert_eq!(product.attribute("price"), Some(&Value::from(179.5)));
        assert_eq!(product.attributes.len(), 3);
    }

    #[test]
    fn product_builder_sets_attributes() {
        let product = Product::new(5u64)
            .with_attribute("name", "X")
            .with_attribute("price", 10);

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json, serde_json::json!({"id": 5, "name": "X", "price": 10}));
    }

    #[test]
    fn stock_allows_only_range_one_to_amount() {
        let stock = Stock::new(1u64, 3);

        assert!(!stock.allows(0));
        assert!(!stock.allows(-2));
        assert!(stock.allows(1));
        assert!(stock.allows(3));
        assert!(!stock.allows(4));
    }

    #[test]
    fn empty_stock_allows_nothing() {
        assert!(!Stock::new(1u64, 0).allows(1));
    }
}
