//! Cart route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use clementine_core::{CartItemId, ProductId};

use super::ApiMessage;
use crate::db::{CartItemRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::{Cart, CartItem};
use crate::state::AppState;

/// Request body for adding a product to the cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: i32,
    /// Defaults to 1; must be >= 1.
    pub quantity: Option<i32>,
}

/// POST /api/cart
///
/// Adds a product to the caller's cart. Re-adding a product increments the
/// existing line's quantity and leaves its price snapshot untouched.
#[instrument(skip_all, fields(user_id = %user.id, product_id = payload.product_id))]
pub async fn add_to_cart(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<ApiMessage<CartItem>>)> {
    let quantity = payload.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::Validation("quantity must be >= 1".to_string()));
    }

    let item = CartItemRepository::new(state.pool())
        .add_item(user.id, ProductId::new(payload.product_id), quantity)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product not found".to_string()),
            other => AppError::Database(other),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiMessage {
            message: "Item added to cart successfully",
            data: item,
        }),
    ))
}

/// GET /api/cart
///
/// The caller's cart lines with product projections and the
/// snapshot-priced total.
pub async fn get_cart(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<Cart>> {
    let lines = CartItemRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(Cart::from_lines(lines)))
}

/// DELETE /api/cart/{id}
///
/// Removes a cart line owned by the caller. A line owned by someone else
/// reports 404, same as a missing one.
pub async fn remove_from_cart(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    CartItemRepository::new(state.pool())
        .remove_item(user.id, CartItemId::new(id))
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Not found".to_string()),
            other => AppError::Database(other),
        })?;

    Ok(StatusCode::NO_CONTENT)
}
