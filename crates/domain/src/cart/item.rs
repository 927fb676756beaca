//! Cart line item.

use catalog::Product;
use common::ProductId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single line in the cart.
///
/// Serializes as the catalog product record plus an `amount` field, which is
/// also the persisted format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,

    /// Display attributes copied verbatim from the catalog record.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,

    /// Requested quantity, always at least 1.
    pub amount: u32,
}

impl CartItem {
    /// Creates an item with no attributes.
    pub fn new(id: impl Into<ProductId>, amount: u32) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
            amount,
        }
    }

    /// Creates a single-unit item from a catalog record.
    ///
    /// A catalog field named `amount` is dropped so that it cannot shadow
    /// the cart quantity.
    pub fn from_product(product: Product) -> Self {
        let mut attributes = product.attributes;
        attributes.remove("amount");
        Self {
            id: product.id,
            attributes,
            amount: 1,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_product_copies_attributes_with_amount_one() {
        let product = Product::new(5u64)
            .with_attribute("name", "X")
            .with_attribute("price", 10);

        let item = CartItem::from_product(product);

        assert_eq!(item.id, ProductId::new(5));
        assert_eq!(item.amount, 1);
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            serde_json::json!({"id": 5, "name": "X", "price": 10, "amount": 1})
        );
    }

    #[test]
    fn from_product_ignores_catalog_amount_field() {
        let product = Product::new(3u64).with_attribute("amount", 40);

        let item = CartItem::from_product(product);

        assert_eq!(item.amount, 1);
        assert!(item.attribute("amount").is_none());
    }

    #[test]
    fn deserializes_persisted_record() {
        let json = r#"{"id":2,"title":"Tênis","price":139.9,"image":"a.jpg","amount":3}"#;
        let item: CartItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.id, ProductId::new(2));
        assert_eq!(item.amount, 3);
        assert_eq!(item.attribute("title").unwrap(), "Tênis");
        assert_eq!(item.attributes.len(), 3);
    }

    #[test]
    fn negative_amount_is_rejected() {
        let result = serde_json::from_str::<CartItem>(r#"{"id":2,"amount":-1}"#);
        assert!(result.is_err());
    }
}
