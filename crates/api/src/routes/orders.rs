//! Order route handlers.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use super::ApiMessage;
use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::RequireUser;
use crate::models::{Order, OrderWithItems};
use crate::services::CheckoutEngine;
use crate::state::AppState;

/// POST /api/orders
///
/// Converts the caller's cart into an order. Delegates to the checkout
/// engine, which runs the whole placement as one atomic transaction.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn place_order(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiMessage<Order>>)> {
    let order = CheckoutEngine::new(state.pool()).place_order(user.id).await?;

    tracing::info!(order_id = %order.id, total = %order.total_amount, "order placed");

    Ok((
        StatusCode::CREATED,
        Json(ApiMessage {
            message: "Order placed successfully",
            data: order,
        }),
    ))
}

/// GET /api/orders
///
/// Order history with nested items and products, newest first. Customers
/// only see their own orders; admins see all.
pub async fn list_orders(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderWithItems>>> {
    let orders = OrderRepository::new(state.pool())
        .list(user.id, user.role)
        .await?;

    Ok(Json(orders))
}
