//! Shared types used across the cart manager crates.

mod types;

pub use types::{ParseProductIdError, ProductId};
