//! Cart commands.

use common::ProductId;

/// Command to set the quantity of an item already in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    /// The product whose quantity changes.
    pub product_id: ProductId,

    /// Target quantity as requested by the caller.
    ///
    /// Signed so that zero or negative requests reach the stock check and
    /// are rejected there instead of failing to parse.
    pub amount: i64,
}

impl UpdateProductAmount {
    /// Creates a new UpdateProductAmount command.
    pub fn new(product_id: impl Into<ProductId>, amount: i64) -> Self {
        Self {
            product_id: product_id.into(),
            amount,
        }
    }
}
