//! Cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use clementine_core::{CartItemId, ProductId, UserId};

/// One cart line (domain type).
///
/// There is at most one `CartItem` per `(user, product)` pair; re-adding a
/// product increments `quantity` on the existing line. `price_at_addition`
/// is captured at first add and never updated afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Unique cart item ID.
    pub id: CartItemId,
    /// Owning user.
    pub user_id: UserId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Units of the product in the cart (always >= 1).
    pub quantity: i32,
    /// Price snapshot from the first add.
    pub price_at_addition: Decimal,
    /// When the line was created.
    pub created_at: DateTime<Utc>,
    /// When the line was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Read-only product projection joined onto cart listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    pub image_url: Option<String>,
    pub stock: i32,
}

/// A cart line joined with its product projection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: CartProduct,
}

/// A user's cart: lines plus the snapshot-priced total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartLine>,
    pub total: Decimal,
}

impl Cart {
    /// Assemble a cart from its lines, computing the total.
    #[must_use]
    pub fn from_lines(items: Vec<CartLine>) -> Self {
        let total = cart_total(&items);
        Self { items, total }
    }
}

/// Total of a set of cart lines.
///
/// Uses the `price_at_addition` snapshots, never the live product price.
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .map(|line| line.item.price_at_addition * Decimal::from(line.item.quantity))
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;

    fn line(product_id: i32, quantity: i32, price_at_addition: Decimal) -> CartLine {
        let now = Utc::now();
        CartLine {
            item: CartItem {
                id: CartItemId::new(product_id),
                user_id: UserId::new(1),
                product_id: ProductId::new(product_id),
                quantity,
                price_at_addition,
                created_at: now,
                updated_at: now,
            },
            product: CartProduct {
                id: ProductId::new(product_id),
                name: format!("product-{product_id}"),
                image_url: None,
                stock: 100,
            },
        }
    }

    #[test]
    fn test_total_of_empty_cart_is_zero() {
        assert_eq!(cart_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_total_multiplies_snapshot_by_quantity() {
        let lines = vec![line(1, 2, Decimal::from(499))];
        assert_eq!(cart_total(&lines), Decimal::from(998));
    }

    #[test]
    fn test_total_sums_across_lines() {
        let lines = vec![
            line(1, 2, Decimal::new(1050, 2)), // 10.50 x 2
            line(2, 1, Decimal::new(999, 2)),  // 9.99 x 1
        ];
        assert_eq!(cart_total(&lines), Decimal::new(3099, 2));
    }

    #[test]
    fn test_total_ignores_live_product_data() {
        // The product projection carries stock but no price; only the
        // snapshot participates in the total.
        let mut lines = vec![line(1, 3, Decimal::from(7))];
        lines[0].product.stock = 0;
        assert_eq!(cart_total(&lines), Decimal::from(21));
    }

    #[test]
    fn test_cart_from_lines() {
        let cart = Cart::from_lines(vec![line(1, 2, Decimal::from(499))]);
        assert_eq!(cart.total, Decimal::from(998));
        assert_eq!(cart.items.len(), 1);
    }
}
