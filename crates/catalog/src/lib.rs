//! Product catalog and stock lookups.
//!
//! The cart only ever reads from the catalog: a product record when an item
//! is first added, and the current stock ceiling before any quantity change.
//! [`HttpCatalogService`] talks to the storefront API; [`InMemoryCatalogService`]
//! serves fixtures for tests and local runs.

pub mod error;
pub mod http;
pub mod memory;
pub mod record;
pub mod service;

pub use error::CatalogError;
pub use http::{CatalogConfig, HttpCatalogService};
pub use memory::InMemoryCatalogService;
pub use record::{Product, Stock};
pub use service::CatalogService;
