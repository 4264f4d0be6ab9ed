use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState, MessageResponse, NotificationDto};

#[derive(Debug, Deserialize)]
pub struct NotificationRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// GET /api/notifications — newest first
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NotificationDto>>, ApiError> {
    let notifications = state.store().list_notifications().await?;

    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationDto::from)
            .collect(),
    ))
}

/// GET /api/notifications/{id}
pub async fn get_notification(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<NotificationDto>, ApiError> {
    let notification = state
        .store()
        .get_notification(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification"))?;

    Ok(Json(NotificationDto::from(notification)))
}

/// POST /api/notifications
pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NotificationRequest>,
) -> Result<(StatusCode, Json<NotificationDto>), ApiError> {
    if payload.title.is_empty() || payload.description.is_empty() {
        return Err(ApiError::validation("Title and description are required"));
    }

    let notification = state
        .store()
        .create_notification(payload.title, payload.description)
        .await?;

    Ok((StatusCode::CREATED, Json(NotificationDto::from(notification))))
}

/// PUT /api/notifications/{id}
pub async fn update_notification(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<NotificationRequest>,
) -> Result<Json<NotificationDto>, ApiError> {
    if payload.title.is_empty() || payload.description.is_empty() {
        return Err(ApiError::validation("Title and description are required"));
    }

    let notification = state
        .store()
        .update_notification(id, payload.title, payload.description)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification"))?;

    Ok(Json(NotificationDto::from(notification)))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.store().delete_notification(id).await? {
        return Err(ApiError::not_found("Notification"));
    }

    Ok(Json(MessageResponse::new("Notification deleted successfully")))
}
