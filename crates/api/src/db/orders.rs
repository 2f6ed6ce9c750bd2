//! Order repository for database operations.
//!
//! Orders are created by the checkout engine inside its transaction; this
//! repository only reads them back.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use clementine_core::{
    CategoryId, OrderId, OrderItemId, OrderStatus, ProductId, Role, UserId,
};

use super::RepositoryError;
use crate::models::catalog::Product;
use crate::models::order::{Order, OrderItem, OrderWithItems};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OrderRow {
    pub(crate) id: i32,
    pub(crate) user_id: i32,
    pub(crate) total_amount: Decimal,
    pub(crate) status: OrderStatus,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            total_amount: row.total_amount,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for order items joined with their product.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    quantity: i32,
    price_at_purchase: Decimal,
    product_name: String,
    product_description: Option<String>,
    product_price: Decimal,
    product_stock: i32,
    product_image_url: Option<String>,
    product_category_id: Option<i32>,
    product_created_at: DateTime<Utc>,
    product_updated_at: DateTime<Utc>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            price_at_purchase: row.price_at_purchase,
            product: Some(Product {
                id: ProductId::new(row.product_id),
                name: row.product_name,
                description: row.product_description,
                price: row.product_price,
                stock: row.product_stock,
                image_url: row.product_image_url,
                category_id: row.product_category_id.map(CategoryId::new),
                created_at: row.product_created_at,
                updated_at: row.product_updated_at,
            }),
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders with nested items and their products, newest first.
    ///
    /// A `customer` only sees their own orders; any other role sees all.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        user_id: UserId,
        role: Role,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let scope = match role {
            Role::Customer => Some(user_id.as_i32()),
            Role::Admin => None,
        };

        let order_rows: Vec<OrderRow> = sqlx::query_as(
            r"
            SELECT id, user_id, total_amount, status, created_at, updated_at
            FROM orders
            WHERE ($1::int IS NULL OR user_id = $1)
            ORDER BY created_at DESC
            ",
        )
        .bind(scope)
        .fetch_all(self.pool)
        .await?;

        if order_rows.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = order_rows.iter().map(|o| o.id).collect();

        let item_rows: Vec<OrderItemRow> = sqlx::query_as(
            r"
            SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price_at_purchase,
                   p.name AS product_name,
                   p.description AS product_description,
                   p.price AS product_price,
                   p.stock AS product_stock,
                   p.image_url AS product_image_url,
                   p.category_id AS product_category_id,
                   p.created_at AS product_created_at,
                   p.updated_at AS product_updated_at
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.id ASC
            ",
        )
        .bind(&order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut items_by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
        for row in item_rows {
            items_by_order
                .entry(row.order_id)
                .or_default()
                .push(row.into());
        }

        Ok(order_rows
            .into_iter()
            .map(|row| {
                let items = items_by_order.remove(&row.id).unwrap_or_default();
                OrderWithItems {
                    order: row.into(),
                    items,
                }
            })
            .collect())
    }
}
