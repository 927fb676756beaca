//! In-memory catalog for tests and local runs.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use common::ProductId;

use crate::error::CatalogError;
use crate::record::{Product, Stock};
use crate::service::CatalogService;

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: HashMap<ProductId, Product>,
    stock: HashMap<ProductId, u32>,
    fail_lookups: bool,
    product_lookups: usize,
    stock_lookups: usize,
}

/// In-memory catalog service.
///
/// Clones share the same fixtures, so a test can keep a handle and change
/// stock levels while a cart manager holds another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogService {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalogService {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, InMemoryCatalogState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, InMemoryCatalogState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a product together with its stock level.
    pub fn insert(&self, product: Product, stock: u32) {
        let mut state = self.write();
        state.stock.insert(product.id, stock);
        state.products.insert(product.id, product);
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_product(self, product: Product, stock: u32) -> Self {
        self.insert(product, stock);
        self
    }

    /// Sets the stock level for a product.
    pub fn set_stock(&self, id: ProductId, amount: u32) {
        self.write().stock.insert(id, amount);
    }

    /// Configures every subsequent lookup to fail.
    pub fn set_fail_lookups(&self, fail: bool) {
        self.write().fail_lookups = fail;
    }

    /// Returns how many product lookups were served.
    pub fn product_lookups(&self) -> usize {
        self.read().product_lookups
    }

    /// Returns how many stock lookups were served.
    pub fn stock_lookups(&self) -> usize {
        self.read().stock_lookups
    }
}

#[async_trait]
impl CatalogService for InMemoryCatalogService {
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let mut state = self.write();
        state.product_lookups += 1;

        if state.fail_lookups {
            return Err(CatalogError::Unavailable("catalog offline".to_string()));
        }

        state
            .products
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound {
                resource: "products",
                id,
            })
    }

    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        let mut state = self.write();
        state.stock_lookups += 1;

        if state.fail_lookups {
            return Err(CatalogError::Unavailable("catalog offline".to_string()));
        }

        state
            .stock
            .get(&id)
            .map(|&amount| Stock::new(id, amount))
            .ok_or(CatalogError::NotFound {
                resource: "stock",
                id,
            })
    }
}
