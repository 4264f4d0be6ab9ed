use serde::Serialize;

use crate::db::{CategoryWithCount, VideoWithCategories};
use crate::entities::{banner_images, categories, notifications};

#[derive(Debug, Serialize)]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<categories::Model> for CategoryDto {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryWithCountDto {
    #[serde(flatten)]
    pub category: CategoryDto,
    pub video_count: i64,
}

impl From<CategoryWithCount> for CategoryWithCountDto {
    fn from(row: CategoryWithCount) -> Self {
        Self {
            category: CategoryDto::from(row.category),
            video_count: row.video_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VideoDto {
    pub id: i32,
    pub title: String,
    pub video_link: String,
    pub description: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub categories: Vec<CategoryDto>,
}

impl From<VideoWithCategories> for VideoDto {
    fn from(row: VideoWithCategories) -> Self {
        Self {
            id: row.video.id,
            title: row.video.title,
            video_link: row.video.video_link,
            description: row.video.description,
            created_at: row.video.created_at,
            categories: row.categories.into_iter().map(CategoryDto::from).collect(),
        }
    }
}

/// One keyset page; `nextCursor` is null once the listing is exhausted.
#[derive(Debug, Serialize)]
pub struct VideoListResponse {
    pub videos: Vec<VideoDto>,
    #[serde(rename = "nextCursor")]
    pub next_cursor: Option<String>,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub struct BannerDto {
    pub id: i32,
    pub title: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    pub is_active: bool,
    pub order: i32,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<banner_images::Model> for BannerDto {
    fn from(model: banner_images::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            image_url: model.image_url,
            link_url: model.link_url,
            is_active: model.is_active,
            order: model.sort_order,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<notifications::Model> for NotificationDto {
    fn from(model: notifications::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
