use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

use super::{ApiError, AppState, MessageResponse, VideoDto, VideoListResponse};
use crate::db::VideoFilter;

#[derive(Debug, Deserialize)]
pub struct VideoListQuery {
    pub search: Option<String>,
    pub category_ids: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<u64>,
}

/// `category_ids` arrives either as a real JSON array or as a JSON-encoded
/// string (multipart form submissions serialize it that way).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryIds {
    List(Vec<String>),
    Encoded(String),
}

impl CategoryIds {
    fn into_ids(self) -> Result<Vec<String>, ApiError> {
        let mut ids = match self {
            Self::List(ids) => ids,
            Self::Encoded(raw) => serde_json::from_str::<Vec<String>>(&raw)
                .map_err(|_| ApiError::validation("Invalid category_ids format"))?,
        };

        // Duplicate ids would collide in the join table
        let mut seen = HashSet::new();
        ids.retain(|id| seen.insert(id.clone()));

        Ok(ids)
    }
}

#[derive(Debug, Deserialize)]
pub struct VideoRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub video_link: String,
    pub description: Option<String>,
    pub category_ids: Option<CategoryIds>,
}

/// GET /api/videos
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VideoListQuery>,
) -> Result<Json<VideoListResponse>, ApiError> {
    let filter = VideoFilter {
        search: query.search,
        category_ids: query
            .category_ids
            .map(|raw| {
                raw.split(',')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    };

    let cursor = match query.cursor.as_deref().filter(|c| !c.is_empty()) {
        Some(raw) => Some(
            raw.parse::<i32>()
                .map_err(|_| ApiError::validation("Invalid cursor"))?,
        ),
        None => None,
    };

    let limit = query.limit.unwrap_or(10);

    let page = state.store().list_videos(&filter, cursor, limit).await?;

    Ok(Json(VideoListResponse {
        videos: page.videos.into_iter().map(VideoDto::from).collect(),
        next_cursor: page.next_cursor,
        has_more: page.has_more,
    }))
}

/// GET /api/videos/{id}
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<VideoDto>, ApiError> {
    let video = state
        .store()
        .get_video(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Video"))?;

    Ok(Json(VideoDto::from(video)))
}

/// POST /api/videos
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VideoRequest>,
) -> Result<(StatusCode, Json<VideoDto>), ApiError> {
    if payload.title.is_empty() || payload.video_link.is_empty() {
        return Err(ApiError::validation("Title and video_link are required"));
    }

    let category_ids = match payload.category_ids {
        Some(ids) => ids.into_ids()?,
        None => Vec::new(),
    };

    if !state.store().categories_exist(&category_ids).await? {
        return Err(ApiError::validation("One or more category_ids do not exist"));
    }

    let video = state
        .store()
        .create_video(
            payload.title,
            payload.video_link,
            payload.description.filter(|d| !d.is_empty()),
            &category_ids,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(VideoDto::from(video))))
}

/// PUT /api/videos/{id}
///
/// The association set is only replaced when `category_ids` is present in
/// the request; omitting it leaves existing associations untouched.
pub async fn update_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<VideoRequest>,
) -> Result<Json<VideoDto>, ApiError> {
    if payload.title.is_empty() || payload.video_link.is_empty() {
        return Err(ApiError::validation("Title and video_link are required"));
    }

    let category_ids = match payload.category_ids {
        Some(ids) => Some(ids.into_ids()?),
        None => None,
    };

    if let Some(ids) = &category_ids {
        if !state.store().categories_exist(ids).await? {
            return Err(ApiError::validation("One or more category_ids do not exist"));
        }
    }

    let video = state
        .store()
        .update_video(
            id,
            payload.title,
            payload.video_link,
            payload.description.filter(|d| !d.is_empty()),
            category_ids.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Video"))?;

    Ok(Json(VideoDto::from(video)))
}

/// DELETE /api/videos/{id} — removes the video and its join rows as one unit
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.store().delete_video(id).await? {
        return Err(ApiError::not_found("Video"));
    }

    Ok(Json(MessageResponse::new("Video deleted successfully")))
}
