//! Order domain types.
//!
//! Orders and their items are created atomically by checkout and are
//! read-only afterwards; `total_amount` and `price_at_purchase` are never
//! re-derived from live catalog data.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use clementine_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::catalog::Product;

/// A placed order (domain type).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// User the order belongs to.
    pub user_id: UserId,
    /// Total computed at placement from price snapshots; immutable after.
    pub total_amount: Decimal,
    /// Lifecycle state; checkout only ever produces `Pending`.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

/// One line of a placed order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Unique order item ID.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Units purchased.
    pub quantity: i32,
    /// Price snapshot copied from the cart line at placement; immutable.
    pub price_at_purchase: Decimal,
    /// The product, joined for order history listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

/// An order with its nested items, as returned by order history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}
