//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cart_store::StoreError;
use catalog::CatalogError;
use domain::{CartError, CartErrorKind, CartOperation};
use thiserror::Error;

use crate::config::ConfigError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// A cart operation was aborted.
    Cart {
        operation: CartOperation,
        error: CartError,
    },
}

impl ApiError {
    /// Wraps a cart error together with the operation that raised it.
    pub fn cart(operation: CartOperation) -> impl FnOnce(CartError) -> ApiError {
        move |error| ApiError::Cart { operation, error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": msg }),
            ),
            ApiError::Cart { operation, error } => {
                let notice = error.notice(operation);
                let status = cart_error_status(&error);
                if status.is_server_error() {
                    tracing::error!(%operation, error = %error, "cart operation failed");
                }
                (
                    status,
                    serde_json::json!({
                        "error": notice.message,
                        "severity": notice.severity,
                        "detail": error.to_string(),
                    }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

fn cart_error_status(err: &CartError) -> StatusCode {
    match err.kind() {
        CartErrorKind::OutOfStock => StatusCode::CONFLICT,
        CartErrorKind::NotFound => StatusCode::NOT_FOUND,
        CartErrorKind::Upstream => StatusCode::BAD_GATEWAY,
        CartErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Cart error: {0}")]
    Cart(#[from] CartError),
}
