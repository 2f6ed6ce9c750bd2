//! Product repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use clementine_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::catalog::{CategoryRef, Product, ProductWithCategory};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: Option<String>,
    price: Decimal,
    stock: i32,
    image_url: Option<String>,
    category_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            stock: row.stock,
            image_url: row.image_url,
            category_id: row.category_id.map(CategoryId::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for product-with-category queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductWithCategoryRow {
    id: i32,
    name: String,
    description: Option<String>,
    price: Decimal,
    stock: i32,
    image_url: Option<String>,
    category_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    category_name: Option<String>,
}

impl From<ProductWithCategoryRow> for ProductWithCategory {
    fn from(row: ProductWithCategoryRow) -> Self {
        let category = match (row.category_id, row.category_name) {
            (Some(id), Some(name)) => Some(CategoryRef {
                id: CategoryId::new(id),
                name,
            }),
            _ => None,
        };

        Self {
            product: Product {
                id: ProductId::new(row.id),
                name: row.name,
                description: row.description,
                price: row.price,
                stock: row.stock,
                image_url: row.image_url,
                category_id: row.category_id.map(CategoryId::new),
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            category,
        }
    }
}

// =============================================================================
// Filters
// =============================================================================

/// Filters for product listings. All fields combine with AND.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Inclusive lower bound on the current price.
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound on the current price.
    pub max_price: Option<Decimal>,
    /// Exact category match.
    pub category_id: Option<CategoryId>,
    /// Case-insensitive substring match on the product name.
    pub search: Option<String>,
}

/// Fields for creating a product. The image URL is already hosted by the
/// time it reaches the repository.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// Fields for updating a product. Absent fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails (including
    /// a missing category reference).
    pub async fn create(&self, input: &NewProduct) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(
            r"
            INSERT INTO products (name, description, price, stock, image_url, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, price, stock, image_url, category_id,
                      created_at, updated_at
            ",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(&input.image_url)
        .bind(input.category_id.map(|id| id.as_i32()))
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, description, price, stock, image_url, category_id,
                   created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Update a product. Absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                stock = COALESCE($5, stock),
                image_url = COALESCE($6, image_url),
                category_id = COALESCE($7, category_id),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, description, price, stock, image_url, category_id,
                      created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.price)
        .bind(changes.stock)
        .bind(&changes.image_url)
        .bind(changes.category_id.map(|c| c.as_i32()))
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a product. Cart lines referencing it cascade away.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List products with filtering and pagination, newest-created first.
    ///
    /// `page` is 1-indexed. Returns the total count of the filtered set
    /// alongside the requested page of rows, each joined with its category
    /// projection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        page: i64,
        page_size: i64,
    ) -> Result<(i64, Vec<ProductWithCategory>), RepositoryError> {
        let offset = (page - 1) * page_size;
        let category_id = filter.category_id.map(|c| c.as_i32());

        let (total,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*)
            FROM products p
            WHERE ($1::numeric IS NULL OR p.price >= $1)
              AND ($2::numeric IS NULL OR p.price <= $2)
              AND ($3::int IS NULL OR p.category_id = $3)
              AND ($4::text IS NULL OR p.name ILIKE '%' || $4 || '%')
            ",
        )
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(category_id)
        .bind(&filter.search)
        .fetch_one(self.pool)
        .await?;

        let rows: Vec<ProductWithCategoryRow> = sqlx::query_as(
            r"
            SELECT p.id, p.name, p.description, p.price, p.stock, p.image_url,
                   p.category_id, p.created_at, p.updated_at,
                   c.name AS category_name
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE ($1::numeric IS NULL OR p.price >= $1)
              AND ($2::numeric IS NULL OR p.price <= $2)
              AND ($3::int IS NULL OR p.category_id = $3)
              AND ($4::text IS NULL OR p.name ILIKE '%' || $4 || '%')
            ORDER BY p.created_at DESC
            LIMIT $5 OFFSET $6
            ",
        )
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(category_id)
        .bind(&filter.search)
        .bind(page_size)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok((total, rows.into_iter().map(Into::into).collect()))
    }
}
