//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use clementine_core::{CategoryId, ProductId};

use super::ApiMessage;
use crate::db::{ProductRepository, RepositoryError};
use crate::db::products::{NewProduct, ProductChanges, ProductFilter};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Product;
use crate::models::catalog::{PageMeta, ProductPage};
use crate::state::AppState;

/// Default page size for product listings.
const DEFAULT_PAGE_SIZE: i64 = 10;
/// Largest page size a client may request.
const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters for product listings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub category_id: Option<i32>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub category_id: Option<i32>,
    /// Image payload: a URL or base64-encoded blob, uploaded to the asset
    /// store before the product is stored.
    pub image: Option<String>,
}

/// Request body for updating a product. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub category_id: Option<i32>,
    pub image: Option<String>,
}

/// GET /api/products
///
/// Filtered, paginated listing, newest-created first.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<ProductPage>> {
    let (page, page_size) = validate_pagination(query.page, query.page_size)?;
    validate_price_bounds(query.min_price, query.max_price)?;

    let filter = ProductFilter {
        min_price: query.min_price,
        max_price: query.max_price,
        category_id: query.category_id.map(CategoryId::new),
        search: query.search,
    };

    let (total, data) = ProductRepository::new(state.pool())
        .list(&filter, page, page_size)
        .await?;

    Ok(Json(ProductPage {
        meta: PageMeta::new(total, page, page_size),
        data,
    }))
}

/// POST /api/products (admin)
#[instrument(skip_all, fields(name = %payload.name))]
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiMessage<Product>>)> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name required".to_string()));
    }
    if payload.price < Decimal::ZERO {
        return Err(AppError::Validation("price must be >= 0".to_string()));
    }
    if payload.stock < 0 {
        return Err(AppError::Validation("stock must be >= 0".to_string()));
    }

    let image_url = upload_image(&state, payload.image.as_deref()).await?;

    let product = ProductRepository::new(state.pool())
        .create(&NewProduct {
            name: payload.name,
            description: payload.description,
            price: payload.price,
            stock: payload.stock,
            image_url,
            category_id: payload.category_id.map(CategoryId::new),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiMessage {
            message: "Product created successfully",
            data: product,
        }),
    ))
}

/// PUT /api/products/{id} (admin)
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ApiMessage<Product>>> {
    if let Some(price) = payload.price
        && price < Decimal::ZERO
    {
        return Err(AppError::Validation("price must be >= 0".to_string()));
    }
    if let Some(stock) = payload.stock
        && stock < 0
    {
        return Err(AppError::Validation("stock must be >= 0".to_string()));
    }

    // When no new image is supplied the stored URL is kept as-is.
    let image_url = upload_image(&state, payload.image.as_deref()).await?;

    let product = ProductRepository::new(state.pool())
        .update(
            ProductId::new(id),
            &ProductChanges {
                name: payload.name,
                description: payload.description,
                price: payload.price,
                stock: payload.stock,
                image_url,
                category_id: payload.category_id.map(CategoryId::new),
            },
        )
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product not found".to_string()),
            other => AppError::Database(other),
        })?;

    Ok(Json(ApiMessage {
        message: "Product updated successfully",
        data: product,
    }))
}

/// DELETE /api/products/{id} (admin)
pub async fn delete_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let deleted = ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Push an image payload through the asset store, when one is configured.
///
/// Without a configured store the payload is stored unchanged, which keeps
/// plain-URL payloads working in development.
async fn upload_image(state: &AppState, image: Option<&str>) -> Result<Option<String>> {
    let Some(image) = image else {
        return Ok(None);
    };
    if image.is_empty() {
        return Ok(None);
    }

    match state.assets() {
        Some(store) => {
            let url = store
                .upload(image)
                .await
                .map_err(|e| AppError::Internal(format!("asset upload failed: {e}")))?;
            Ok(Some(url))
        }
        None => Ok(Some(image.to_string())),
    }
}

/// Normalize and bound pagination parameters.
fn validate_pagination(page: Option<i64>, page_size: Option<i64>) -> Result<(i64, i64)> {
    let page = page.unwrap_or(1);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    if page < 1 {
        return Err(AppError::Validation("page must be >= 1".to_string()));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(AppError::Validation(format!(
            "pageSize must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }

    Ok((page, page_size))
}

/// Reject negative price bounds.
fn validate_price_bounds(min: Option<Decimal>, max: Option<Decimal>) -> Result<()> {
    for bound in [min, max].into_iter().flatten() {
        if bound < Decimal::ZERO {
            return Err(AppError::Validation(
                "price bounds must be >= 0".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let (page, page_size) = validate_pagination(None, None).unwrap_or((0, 0));
        assert_eq!((page, page_size), (1, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn test_pagination_rejects_zero_page() {
        assert!(validate_pagination(Some(0), None).is_err());
    }

    #[test]
    fn test_pagination_rejects_oversized_page() {
        assert!(validate_pagination(None, Some(MAX_PAGE_SIZE + 1)).is_err());
        assert!(validate_pagination(None, Some(0)).is_err());
    }

    #[test]
    fn test_pagination_accepts_bounds() {
        assert!(validate_pagination(Some(1), Some(1)).is_ok());
        assert!(validate_pagination(Some(7), Some(MAX_PAGE_SIZE)).is_ok());
    }

    #[test]
    fn test_price_bounds_reject_negative() {
        assert!(validate_price_bounds(Some(Decimal::from(-1)), None).is_err());
        assert!(validate_price_bounds(None, Some(Decimal::from(-1))).is_err());
        assert!(validate_price_bounds(Some(Decimal::ZERO), Some(Decimal::from(10))).is_ok());
    }
}
