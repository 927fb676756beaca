//! Cart endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use domain::{Cart, CartItem, CartOperation, ProductId, UpdateProductAmount};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct AddProductRequest {
    pub product_id: ProductId,
}

#[derive(Deserialize)]
pub struct UpdateAmountRequest {
    pub amount: i64,
}

// -- Response types --

#[derive(Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub item_count: usize,
    pub total_quantity: u64,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            item_count: cart.len(),
            total_quantity: cart.total_quantity(),
            items: cart.items().to_vec(),
        }
    }
}

// -- Handlers --

/// GET /cart — current cart snapshot.
pub async fn get(State(state): State<Arc<AppState>>) -> Json<CartResponse> {
    Json(state.cart.cart().into())
}

/// POST /cart/items — add one unit of a product.
#[tracing::instrument(skip(state, req), fields(product_id = %req.product_id))]
pub async fn add(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddProductRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .cart
        .add_product(req.product_id)
        .await
        .map_err(ApiError::cart(CartOperation::AddProduct))?;

    Ok(Json(cart.into()))
}

/// PUT /cart/items/{id} — set the amount of a product in the cart.
#[tracing::instrument(skip(state, req))]
pub async fn update_amount(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAmountRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let product_id = parse_product_id(&id)?;

    let cart = state
        .cart
        .update_product_amount(UpdateProductAmount::new(product_id, req.amount))
        .await
        .map_err(ApiError::cart(CartOperation::UpdateProductAmount))?;

    Ok(Json(cart.into()))
}

/// DELETE /cart/items/{id} — remove a product from the cart.
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let product_id = parse_product_id(&id)?;

    let cart = state
        .cart
        .remove_product(product_id)
        .await
        .map_err(ApiError::cart(CartOperation::RemoveProduct))?;

    Ok(Json(cart.into()))
}

fn parse_product_id(id: &str) -> Result<ProductId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid product ID: {e}")))
}
