//! Catalog service trait.

use std::sync::Arc;

use async_trait::async_trait;
use common::ProductId;

use crate::error::CatalogError;
use crate::record::{Product, Stock};

/// Read-only access to product records and stock levels.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetches the full product record.
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// Fetches the current stock for a product.
    ///
    /// Implementations must not cache: every call reflects the service's
    /// current answer.
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError>;
}

#[async_trait]
impl<T: CatalogService + ?Sized> CatalogService for Arc<T> {
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        (**self).product(id).await
    }

    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        (**self).stock(id).await
    }
}
