use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set,
};

use crate::entities::{notifications, prelude::*};

pub struct NotificationRepository {
    conn: DatabaseConnection,
}

impl NotificationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<notifications::Model>> {
        Notifications::find()
            .order_by_desc(notifications::Column::CreatedAt)
            .order_by_desc(notifications::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list notifications")
    }

    pub async fn get(&self, id: i32) -> Result<Option<notifications::Model>> {
        Notifications::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query notification")
    }

    pub async fn create(&self, title: String, description: String) -> Result<notifications::Model> {
        let active = notifications::ActiveModel {
            title: Set(title),
            description: Set(description),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to create notification")
    }

    pub async fn update(
        &self,
        id: i32,
        title: String,
        description: String,
    ) -> Result<Option<notifications::Model>> {
        let Some(existing) = Notifications::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query notification for update")?
        else {
            return Ok(None);
        };

        let mut active: notifications::ActiveModel = existing.into();
        active.title = Set(title);
        active.description = Set(description);

        let notification = active
            .update(&self.conn)
            .await
            .context("Failed to update notification")?;

        Ok(Some(notification))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Notifications::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete notification")?;

        Ok(result.rows_affected > 0)
    }
}
