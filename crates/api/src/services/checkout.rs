//! The order placement transaction.
//!
//! Converts a user's cart into a persisted order inside a single database
//! transaction: load cart lines, validate stock, compute the total from
//! price snapshots, create the order and its items, decrement product
//! stock, clear the cart. Every step happens against the same transaction,
//! so a failure at any point rolls the whole operation back and no partial
//! order, stock change, or cart mutation ever becomes visible.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use clementine_core::{OrderStatus, UserId};

use crate::db::RepositoryError;
use crate::db::orders::OrderRow;
use crate::models::order::Order;

/// Errors that can abort order placement.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The user has no cart lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line asks for more units than the product has in stock.
    /// Carries the offending product's name.
    #[error("not enough stock for {product}")]
    InsufficientStock {
        /// Name of the product that failed the stock check.
        product: String,
    },

    /// The transaction failed for storage reasons; everything was rolled back.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// One cart line as read inside the checkout transaction, joined with the
/// product fields the transaction needs.
#[derive(Debug, sqlx::FromRow)]
struct CheckoutLine {
    product_id: i32,
    quantity: i32,
    price_at_addition: Decimal,
    product_name: String,
    stock: i32,
}

/// The checkout engine.
///
/// Stateless besides the injected pool; every call to [`place_order`]
/// runs as one atomic transaction.
///
/// [`place_order`]: CheckoutEngine::place_order
pub struct CheckoutEngine<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutEngine<'a> {
    /// Create a new checkout engine.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order from the user's current cart.
    ///
    /// On success the order (status `pending`) has been committed together
    /// with its items, stock decrements, and the cart deletion. On any
    /// error the transaction is rolled back before the error surfaces.
    ///
    /// There is no retry here; a failed call leaves storage untouched and
    /// retrying is the caller's decision.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`] if the user has no cart lines.
    /// - [`CheckoutError::InsufficientStock`] on the first line whose
    ///   quantity exceeds the product's stock.
    /// - [`CheckoutError::Repository`] for storage failures.
    pub async fn place_order(&self, user_id: UserId) -> Result<Order, CheckoutError> {
        // An early return drops the transaction, which rolls it back.
        let mut tx = self.pool.begin().await?;

        let lines: Vec<CheckoutLine> = sqlx::query_as(
            r"
            SELECT ci.product_id, ci.quantity, ci.price_at_addition,
                   p.name AS product_name, p.stock
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.user_id = $1
            ORDER BY ci.created_at ASC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        verify_stock(&lines)?;

        let total = order_total(&lines);

        let order: OrderRow = sqlx::query_as(
            r"
            INSERT INTO orders (user_id, total_amount, status)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, total_amount, status, created_at, updated_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(total)
        .bind(OrderStatus::Pending)
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, price_at_purchase)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.price_at_addition)
            .execute(&mut *tx)
            .await?;

            // The stock guard in the WHERE clause re-checks at write time,
            // so two checkouts racing over the same product cannot drive
            // stock negative even under weaker isolation levels.
            let result = sqlx::query(
                r"
                UPDATE products
                SET stock = stock - $1, updated_at = now()
                WHERE id = $2 AND stock >= $1
                ",
            )
            .bind(line.quantity)
            .bind(line.product_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(CheckoutError::InsufficientStock {
                    product: line.product_name.clone(),
                });
            }
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(order.into())
    }
}

/// Check every line against the stock read inside the transaction.
///
/// Halts at the first violation, naming the offending product.
fn verify_stock(lines: &[CheckoutLine]) -> Result<(), CheckoutError> {
    for line in lines {
        if line.quantity > line.stock {
            return Err(CheckoutError::InsufficientStock {
                product: line.product_name.clone(),
            });
        }
    }
    Ok(())
}

/// Order total over the cart lines.
///
/// Uses the `price_at_addition` snapshots, never the live product price.
fn order_total(lines: &[CheckoutLine]) -> Decimal {
    lines
        .iter()
        .map(|line| line.price_at_addition * Decimal::from(line.quantity))
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(name: &str, quantity: i32, stock: i32, price: Decimal) -> CheckoutLine {
        CheckoutLine {
            product_id: 1,
            quantity,
            price_at_addition: price,
            product_name: name.to_string(),
            stock,
        }
    }

    #[test]
    fn test_verify_stock_accepts_exact_fit() {
        let lines = vec![line("Phone", 10, 10, Decimal::from(499))];
        assert!(verify_stock(&lines).is_ok());
    }

    #[test]
    fn test_verify_stock_rejects_over_ask() {
        let lines = vec![line("Phone", 11, 10, Decimal::from(499))];
        let err = verify_stock(&lines).unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InsufficientStock { product } if product == "Phone"
        ));
    }

    #[test]
    fn test_verify_stock_halts_at_first_violation() {
        let lines = vec![
            line("Phone", 2, 10, Decimal::from(499)),
            line("Laptop", 5, 1, Decimal::from(1200)),
            line("Tablet", 9, 1, Decimal::from(300)),
        ];
        let err = verify_stock(&lines).unwrap_err();
        // The first offender is named, not the batch.
        assert!(matches!(
            err,
            CheckoutError::InsufficientStock { product } if product == "Laptop"
        ));
    }

    #[test]
    fn test_order_total_uses_price_snapshots() {
        // Snapshot price 499 x 2 = 998 regardless of what the product
        // costs today; the live price never enters the computation.
        let lines = vec![line("Phone", 2, 10, Decimal::from(499))];
        assert_eq!(order_total(&lines), Decimal::from(998));
    }

    #[test]
    fn test_order_total_sums_lines() {
        let lines = vec![
            line("Phone", 2, 10, Decimal::new(49900, 2)),
            line("Case", 3, 10, Decimal::new(1250, 2)),
        ];
        assert_eq!(order_total(&lines), Decimal::new(103550, 2));
    }

    #[test]
    fn test_order_total_of_nothing_is_zero() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }
}
