use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::entities::{categories, prelude::*, video_categories};

#[derive(Debug, Clone)]
pub struct CategoryWithCount {
    pub category: categories::Model,
    pub video_count: i64,
}

pub struct CategoryRepository {
    conn: DatabaseConnection,
}

impl CategoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All categories ordered by name, each with its video count.
    pub async fn list(&self) -> Result<Vec<CategoryWithCount>> {
        let rows = Categories::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list categories")?;

        let counts: Vec<(String, i64)> = VideoCategories::find()
            .select_only()
            .column(video_categories::Column::CategoryId)
            .column_as(video_categories::Column::VideoId.count(), "video_count")
            .group_by(video_categories::Column::CategoryId)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to count category associations")?;

        let counts: HashMap<String, i64> = counts.into_iter().collect();

        Ok(rows
            .into_iter()
            .map(|category| {
                let video_count = counts.get(&category.id).copied().unwrap_or(0);
                CategoryWithCount {
                    category,
                    video_count,
                }
            })
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<CategoryWithCount>> {
        let Some(category) = Categories::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query category")?
        else {
            return Ok(None);
        };

        let video_count = self.video_count(id).await?;

        Ok(Some(CategoryWithCount {
            category,
            video_count,
        }))
    }

    /// Number of videos referencing the category; gates deletion.
    pub async fn video_count(&self, id: &str) -> Result<i64> {
        let count = VideoCategories::find()
            .filter(video_categories::Column::CategoryId.eq(id))
            .count(&self.conn)
            .await
            .context("Failed to count category associations")?;

        Ok(count as i64)
    }

    /// Find another category already holding the name or slug. `exclude_id`
    /// keeps a record from conflicting with itself on update.
    pub async fn find_conflicting(
        &self,
        name: &str,
        slug: &str,
        exclude_id: Option<&str>,
    ) -> Result<Option<categories::Model>> {
        let mut query = Categories::find().filter(
            Condition::any()
                .add(categories::Column::Name.eq(name))
                .add(categories::Column::Slug.eq(slug)),
        );

        if let Some(own_id) = exclude_id {
            query = query.filter(categories::Column::Id.ne(own_id));
        }

        query
            .one(&self.conn)
            .await
            .context("Failed to check for conflicting category")
    }

    pub async fn create(
        &self,
        name: String,
        slug: String,
        description: Option<String>,
    ) -> Result<categories::Model> {
        let active = categories::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name),
            slug: Set(slug),
            description: Set(description),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to create category")
    }

    pub async fn update(
        &self,
        id: &str,
        name: String,
        slug: String,
        description: Option<String>,
    ) -> Result<Option<categories::Model>> {
        let Some(existing) = Categories::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query category for update")?
        else {
            return Ok(None);
        };

        let mut active: categories::ActiveModel = existing.into();
        active.name = Set(name);
        active.slug = Set(slug);
        active.description = Set(description);

        let category = active
            .update(&self.conn)
            .await
            .context("Failed to update category")?;

        Ok(Some(category))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Categories::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete category")?;

        Ok(result.rows_affected > 0)
    }

    /// Whether every id in `ids` names an existing category. `ids` must be
    /// deduplicated by the caller.
    pub async fn all_exist(&self, ids: &[String]) -> Result<bool> {
        if ids.is_empty() {
            return Ok(true);
        }

        let count = Categories::find()
            .filter(categories::Column::Id.is_in(ids.iter().cloned()))
            .count(&self.conn)
            .await
            .context("Failed to verify category ids")?;

        Ok(count == ids.len() as u64)
    }
}
