//! Domain layer for the storefront cart.
//!
//! This crate provides:
//! - `CartItem` and the immutable `Cart` sequence with its transforms
//! - `CartManager`, which stock-checks every mutation against the catalog
//!   and persists the result to a key-value store
//! - `Notice`/`Notifier` for surfacing failed operations to a user

pub mod cart;
pub mod error;
pub mod notice;

pub use cart::{
    Cart, CartItem, CartManager, CartOperation, DEFAULT_STORAGE_KEY, UpdateProductAmount,
};
pub use common::ProductId;
pub use error::{CartError, CartErrorKind};
pub use notice::{Notice, Notifier, OUT_OF_STOCK_MESSAGE, RecordingNotifier, Severity, TracingNotifier};
