//! Catalog domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use clementine_core::{CategoryId, ProductId};

/// A product category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Unique category name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
    /// When the category was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A product (domain type).
///
/// `price` and `stock` are mutable over time; price changes never
/// retroactively affect carts or orders, which carry their own snapshots.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Current price.
    pub price: Decimal,
    /// Units currently in stock.
    pub stock: i32,
    /// Hosted image URL, when an image was uploaded.
    pub image_url: Option<String>,
    /// Linked category, when any.
    pub category_id: Option<CategoryId>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Minimal category projection joined onto product listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
}

/// A product with its category projection, as returned by listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<CategoryRef>,
}

/// Pagination metadata for product listings.
///
/// `page` is 1-indexed; `pages` is the total page count for the filtered
/// result set.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub pages: i64,
}

impl PageMeta {
    /// Build pagination metadata from a total row count.
    #[must_use]
    pub fn new(total: i64, page: i64, page_size: i64) -> Self {
        Self {
            total,
            page,
            page_size,
            pages: (total + page_size - 1) / page_size,
        }
    }
}

/// One page of a filtered product listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub meta: PageMeta,
    pub data: Vec<ProductWithCategory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_meta_exact_division() {
        let meta = PageMeta::new(20, 1, 10);
        assert_eq!(meta.pages, 2);
    }

    #[test]
    fn test_page_meta_rounds_up() {
        let meta = PageMeta::new(21, 1, 10);
        assert_eq!(meta.pages, 3);
    }

    #[test]
    fn test_page_meta_empty() {
        let meta = PageMeta::new(0, 1, 10);
        assert_eq!(meta.pages, 0);
        assert_eq!(meta.total, 0);
    }

    #[test]
    fn test_page_meta_single_partial_page() {
        let meta = PageMeta::new(3, 1, 10);
        assert_eq!(meta.pages, 1);
    }
}
