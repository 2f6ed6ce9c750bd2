//! Category route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use clementine_core::CategoryId;

use super::ApiMessage;
use crate::db::{CategoryRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Category;
use crate::state::AppState;

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Request body for updating a category.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

/// GET /api/categories (admin)
///
/// The whole category surface is admin-only, listing included.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}

/// POST /api/categories (admin)
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiMessage<Category>>)> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name required".to_string()));
    }

    let category = CategoryRepository::new(state.pool())
        .create(&payload.name, payload.description.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiMessage {
            message: "Category created successfully",
            data: category,
        }),
    ))
}

/// PUT /api/categories/{id} (admin)
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<ApiMessage<Category>>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name required".to_string()));
    }

    let category = CategoryRepository::new(state.pool())
        .update(
            CategoryId::new(id),
            Some(payload.name.as_str()),
            payload.description.as_deref(),
        )
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Not found".to_string()),
            other => AppError::Database(other),
        })?;

    Ok(Json(ApiMessage {
        message: "Category updated successfully",
        data: category,
    }))
}

/// DELETE /api/categories/{id} (admin)
pub async fn delete_category(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let deleted = CategoryRepository::new(state.pool())
        .delete(CategoryId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
