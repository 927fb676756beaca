//! Catalog error types.

use common::ProductId;
use thiserror::Error;

/// Errors that can occur while querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not be sent or the response body not read.
    #[error("Catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Catalog returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The requested record does not exist.
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: ProductId },

    /// The response body could not be decoded.
    #[error("Failed to decode catalog response: {0}")]
    Decode(#[source] reqwest::Error),

    /// The service answered with a record for a different product.
    #[error("Requested {resource} {requested} but received {returned}")]
    MismatchedRecord {
        resource: &'static str,
        requested: ProductId,
        returned: ProductId,
    },

    /// The configured base URL is invalid.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The service is unavailable.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    /// Returns true if the error means the record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}
