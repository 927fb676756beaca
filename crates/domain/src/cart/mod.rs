//! Cart contents, commands and the manager that mutates them.

mod commands;
mod contents;
mod item;
mod manager;

pub use commands::UpdateProductAmount;
pub use contents::Cart;
pub use item::CartItem;
pub use manager::{CartManager, DEFAULT_STORAGE_KEY};

/// The user-facing cart operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    AddProduct,
    RemoveProduct,
    UpdateProductAmount,
}

impl CartOperation {
    /// Returns a stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            CartOperation::AddProduct => "add_product",
            CartOperation::RemoveProduct => "remove_product",
            CartOperation::UpdateProductAmount => "update_product_amount",
        }
    }

    /// Returns the generic message shown when the operation fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            CartOperation::AddProduct => "Error adding product",
            CartOperation::RemoveProduct => "Error removing product",
            CartOperation::UpdateProductAmount => "Error updating product quantity",
        }
    }
}

impl std::fmt::Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
