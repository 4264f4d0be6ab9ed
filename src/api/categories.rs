use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState, CategoryDto, CategoryWithCountDto, MessageResponse};
use crate::slug::generate_slug;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

/// GET /api/categories — ordered by name, with per-category video counts
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryWithCountDto>>, ApiError> {
    let categories = state.store().list_categories().await?;

    Ok(Json(
        categories
            .into_iter()
            .map(CategoryWithCountDto::from)
            .collect(),
    ))
}

/// GET /api/categories/{id}
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CategoryWithCountDto>, ApiError> {
    let category = state
        .store()
        .get_category(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category"))?;

    Ok(Json(CategoryWithCountDto::from(category)))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryDto>), ApiError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::validation("Category name is required"));
    }

    let slug = generate_slug(&name);

    if state
        .store()
        .find_conflicting_category(&name, &slug, None)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("A category with this name already exists"));
    }

    let category = state
        .store()
        .create_category(name, slug, payload.description.filter(|d| !d.is_empty()))
        .await?;

    Ok((StatusCode::CREATED, Json(CategoryDto::from(category))))
}

/// PUT /api/categories/{id}
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<CategoryDto>, ApiError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::validation("Category name is required"));
    }

    let slug = generate_slug(&name);

    // The record may keep its own name; only other rows conflict
    if state
        .store()
        .find_conflicting_category(&name, &slug, Some(&id))
        .await?
        .is_some()
    {
        return Err(ApiError::conflict(
            "Another category with this name already exists",
        ));
    }

    let category = state
        .store()
        .update_category(&id, name, slug, payload.description.filter(|d| !d.is_empty()))
        .await?
        .ok_or_else(|| ApiError::not_found("Category"))?;

    Ok(Json(CategoryDto::from(category)))
}

/// DELETE /api/categories/{id} — blocked while any video references it
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let category = state
        .store()
        .get_category(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category"))?;

    if category.video_count > 0 {
        return Err(ApiError::conflict(format!(
            "Cannot delete category. It has {} associated video(s)",
            category.video_count
        )));
    }

    state.store().delete_category(&id).await?;

    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
