use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState, BannerDto, MessageResponse};
use crate::db::BannerWrite;
use crate::services::UploadStore;

#[derive(Debug, Deserialize)]
pub struct BannerListQuery {
    pub active_only: Option<String>,
}

/// Fields collected from the multipart body. `image` holds the relative
/// `/images/...` path of an already-saved upload.
#[derive(Debug, Default)]
struct BannerForm {
    title: Option<String>,
    link_url: Option<String>,
    is_active: bool,
    sort_order: Option<i32>,
    image: Option<String>,
}

async fn fill_banner_form(
    multipart: &mut Multipart,
    uploads: &UploadStore,
    form: &mut BannerForm,
) -> Result<(), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::validation("Invalid multipart body"))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "title" => {
                form.title = Some(read_text(field).await?);
            }
            "link_url" => {
                form.link_url = Some(read_text(field).await?);
            }
            "is_active" => {
                form.is_active = read_text(field).await? == "true";
            }
            "order" => {
                let text = read_text(field).await?;
                if !text.is_empty() {
                    form.sort_order = Some(
                        text.parse()
                            .map_err(|_| ApiError::validation("Invalid order value"))?,
                    );
                }
            }
            "banner_image" => {
                let original_name = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::validation("Failed to read uploaded image"))?;
                form.image = Some(uploads.save(original_name.as_deref(), &data).await?);
            }
            _ => {}
        }
    }

    Ok(())
}

/// Read the whole multipart body. If parsing fails after the image part was
/// already written to disk, the file is removed before the error surfaces.
async fn read_banner_form(
    mut multipart: Multipart,
    uploads: &UploadStore,
) -> Result<BannerForm, ApiError> {
    let mut form = BannerForm::default();

    match fill_banner_form(&mut multipart, uploads, &mut form).await {
        Ok(()) => Ok(form),
        Err(e) => {
            if let Some(image) = &form.image {
                uploads.remove(image).await;
            }
            Err(e)
        }
    }
}

/// Stored URLs are absolute; recover the `/images/...` suffix for file ops.
fn extract_relative_path(url: &str) -> &str {
    if url.starts_with("/images/") {
        return url;
    }
    url.find("/images/").map_or(url, |idx| &url[idx..])
}

/// GET /api/banners — ordered for display; `active_only=true` filters
pub async fn list_banners(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BannerListQuery>,
) -> Result<Json<Vec<BannerDto>>, ApiError> {
    let active_only = query.active_only.as_deref() == Some("true");

    let banners = state.store().list_banners(active_only).await?;

    Ok(Json(banners.into_iter().map(BannerDto::from).collect()))
}

/// GET /api/banners/{id}
pub async fn get_banner(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<BannerDto>, ApiError> {
    let banner = state
        .store()
        .get_banner(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Banner"))?;

    Ok(Json(BannerDto::from(banner)))
}

/// POST /api/banners — multipart; the image part is mandatory
pub async fn create_banner(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<(StatusCode, Json<BannerDto>), ApiError> {
    let form = read_banner_form(multipart, state.uploads()).await?;

    let Some(relative_path) = form.image else {
        return Err(ApiError::validation("Banner image is required"));
    };

    // The absolute URL is computed once, at write time
    let image_url = format!("{}{relative_path}", state.request_base_url(&headers));

    let write = BannerWrite {
        title: form.title.filter(|t| !t.is_empty()),
        image_url,
        link_url: form.link_url.filter(|l| !l.is_empty()),
        is_active: form.is_active,
        sort_order: form.sort_order.unwrap_or(0),
    };

    match state.store().create_banner(write).await {
        Ok(banner) => Ok((StatusCode::CREATED, Json(BannerDto::from(banner)))),
        Err(e) => {
            // no row was written; do not leave the upload orphaned
            state.uploads().remove(&relative_path).await;
            Err(e.into())
        }
    }
}

/// PUT /api/banners/{id} — multipart; the image part is optional.
///
/// The previous file is deleted only after the row update succeeds, so a
/// stored row never references an already-deleted file.
pub async fn update_banner(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<BannerDto>, ApiError> {
    let form = read_banner_form(multipart, state.uploads()).await?;

    let existing = match state.store().get_banner(id).await {
        Ok(Some(banner)) => banner,
        Ok(None) => {
            if let Some(image) = &form.image {
                state.uploads().remove(image).await;
            }
            return Err(ApiError::not_found("Banner"));
        }
        Err(e) => {
            if let Some(image) = &form.image {
                state.uploads().remove(image).await;
            }
            return Err(e.into());
        }
    };

    let image_url = if let Some(relative) = &form.image {
        format!("{}{relative}", state.request_base_url(&headers))
    } else {
        existing.image_url.clone()
    };

    let write = BannerWrite {
        title: match form.title {
            Some(t) if t.is_empty() => None,
            Some(t) => Some(t),
            None => existing.title.clone(),
        },
        image_url,
        link_url: form.link_url.filter(|l| !l.is_empty()),
        is_active: form.is_active,
        sort_order: form.sort_order.unwrap_or(existing.sort_order),
    };

    let updated = match state.store().update_banner(id, write).await {
        Ok(Some(banner)) => banner,
        Ok(None) => {
            if let Some(image) = &form.image {
                state.uploads().remove(image).await;
            }
            return Err(ApiError::not_found("Banner"));
        }
        Err(e) => {
            if let Some(image) = &form.image {
                state.uploads().remove(image).await;
            }
            return Err(e.into());
        }
    };

    if form.image.is_some() {
        state
            .uploads()
            .remove(extract_relative_path(&existing.image_url))
            .await;
    }

    Ok(Json(BannerDto::from(updated)))
}

/// DELETE /api/banners/{id} — removes the row, then best-effort the file
pub async fn delete_banner(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    let banner = state
        .store()
        .get_banner(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Banner"))?;

    state.store().delete_banner(id).await?;

    state
        .uploads()
        .remove(extract_relative_path(&banner.image_url))
        .await;

    Ok(Json(MessageResponse::new("Banner deleted successfully")))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|_| ApiError::validation("Invalid multipart body"))
}
