use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{banner_images, prelude::*};

/// Resolved banner fields as they should be written; the handlers decide
/// fallbacks for partially supplied updates before calling in here.
#[derive(Debug, Clone)]
pub struct BannerWrite {
    pub title: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

pub struct BannerRepository {
    conn: DatabaseConnection,
}

impl BannerRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, active_only: bool) -> Result<Vec<banner_images::Model>> {
        let mut query = BannerImages::find();

        if active_only {
            query = query.filter(banner_images::Column::IsActive.eq(true));
        }

        query
            .order_by_asc(banner_images::Column::SortOrder)
            .order_by_asc(banner_images::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list banners")
    }

    pub async fn get(&self, id: i32) -> Result<Option<banner_images::Model>> {
        BannerImages::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query banner")
    }

    pub async fn create(&self, write: BannerWrite) -> Result<banner_images::Model> {
        let active = banner_images::ActiveModel {
            title: Set(write.title),
            image_url: Set(write.image_url),
            link_url: Set(write.link_url),
            is_active: Set(write.is_active),
            sort_order: Set(write.sort_order),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to create banner")
    }

    pub async fn update(&self, id: i32, write: BannerWrite) -> Result<Option<banner_images::Model>> {
        let Some(existing) = BannerImages::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query banner for update")?
        else {
            return Ok(None);
        };

        let mut active: banner_images::ActiveModel = existing.into();
        active.title = Set(write.title);
        active.image_url = Set(write.image_url);
        active.link_url = Set(write.link_url);
        active.is_active = Set(write.is_active);
        active.sort_order = Set(write.sort_order);

        let banner = active
            .update(&self.conn)
            .await
            .context("Failed to update banner")?;

        Ok(Some(banner))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = BannerImages::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete banner")?;

        Ok(result.rows_affected > 0)
    }
}
