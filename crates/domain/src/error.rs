//! Domain error types.

use cart_store::StoreError;
use catalog::CatalogError;
use common::ProductId;
use thiserror::Error;

use crate::cart::CartOperation;
use crate::notice::{Notice, OUT_OF_STOCK_MESSAGE};

/// Errors that can abort a cart operation.
///
/// Every variant leaves the cart exactly as it was before the operation.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity is outside `1..=available`.
    #[error(
        "Requested quantity {requested} of product {product_id} is out of stock (available: {available})"
    )]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    /// The product is not in the cart.
    #[error("Product {product_id} is not in the cart")]
    NotInCart { product_id: ProductId },

    /// A catalog or stock lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Reading or writing the persisted cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Coarse classification of [`CartError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartErrorKind {
    OutOfStock,
    NotFound,
    Upstream,
    Storage,
}

impl CartErrorKind {
    /// Returns a stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            CartErrorKind::OutOfStock => "out_of_stock",
            CartErrorKind::NotFound => "not_found",
            CartErrorKind::Upstream => "upstream_failure",
            CartErrorKind::Storage => "storage_failure",
        }
    }
}

impl CartError {
    /// Returns the error's classification.
    pub fn kind(&self) -> CartErrorKind {
        match self {
            CartError::OutOfStock { .. } => CartErrorKind::OutOfStock,
            CartError::NotInCart { .. } => CartErrorKind::NotFound,
            CartError::Catalog(_) => CartErrorKind::Upstream,
            CartError::Storage(_) => CartErrorKind::Storage,
        }
    }

    /// Converts the error into the notice shown to the user.
    ///
    /// Out-of-stock is a warning with its own message; everything else is an
    /// error carrying the operation's generic failure message.
    pub fn notice(&self, operation: CartOperation) -> Notice {
        match self.kind() {
            CartErrorKind::OutOfStock => Notice::warning(OUT_OF_STOCK_MESSAGE),
            _ => Notice::error(operation.failure_message()),
        }
    }
}
