//! The cart sequence.

use std::collections::HashSet;

use common::ProductId;
use serde::{Deserialize, Serialize, Serializer};

use super::CartItem;

/// Ordered cart contents.
///
/// A `Cart` is a value: every transform borrows the current cart and returns
/// a new one, so a snapshot handed out earlier never changes underneath its
/// holder. Order is insertion order.
///
/// Invariants upheld by every constructor, including deserialization:
/// - at most one item per product ID
/// - every amount is at least 1
///
/// Serializes as a plain JSON array of items.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from items.
    ///
    /// Zero-amount items and repeated product IDs (first one wins) are
    /// dropped.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut seen = HashSet::with_capacity(items.len());
        let items = items
            .into_iter()
            .filter(|item| item.amount >= 1 && seen.insert(item.id))
            .collect();
        Self { items }
    }

    /// Returns the items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterates the items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    /// Returns the item for a product.
    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == product_id)
    }

    /// Returns true if the product is in the cart.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Returns the number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the sum of all amounts.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Returns a cart with `item` appended.
    ///
    /// Returns None if the product is already present or the amount is 0.
    pub fn with_appended(&self, item: CartItem) -> Option<Cart> {
        if item.amount == 0 || self.contains(item.id) {
            return None;
        }
        let mut items = self.items.clone();
        items.push(item);
        Some(Cart { items })
    }

    /// Returns a cart where only the product's amount is replaced.
    ///
    /// Returns None if the product is absent or the amount is 0.
    pub fn with_amount(&self, product_id: ProductId, amount: u32) -> Option<Cart> {
        if amount == 0 || !self.contains(product_id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id == product_id {
                    CartItem {
                        amount,
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Some(Cart { items })
    }

    /// Returns a cart without the product, keeping the others in order.
    ///
    /// Returns None if the product is absent.
    pub fn without(&self, product_id: ProductId) -> Option<Cart> {
        if !self.contains(product_id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .filter(|item| item.id != product_id)
            .cloned()
            .collect();
        Some(Cart { items })
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Cart::from_items(items)
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
