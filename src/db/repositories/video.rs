use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, Func, Query as SeaQuery};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityName, EntityTrait,
    LoaderTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{categories, prelude::*, video_categories, videos};

/// Filters applied to the video listing
#[derive(Debug, Default, Clone)]
pub struct VideoFilter {
    pub search: Option<String>,
    pub category_ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct VideoWithCategories {
    pub video: videos::Model,
    pub categories: Vec<categories::Model>,
}

/// One keyset page of the video listing
#[derive(Debug)]
pub struct VideoPage {
    pub videos: Vec<VideoWithCategories>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

pub struct VideoRepository {
    conn: DatabaseConnection,
}

impl VideoRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Fetch one page ordered by (created_at DESC, id DESC), starting
    /// strictly after the row identified by `cursor` when supplied.
    ///
    /// `limit + 1` rows are fetched; the extra row only signals that more
    /// pages exist and is trimmed from the result.
    pub async fn list_page(
        &self,
        filter: &VideoFilter,
        cursor: Option<i32>,
        limit: u64,
    ) -> Result<VideoPage> {
        let mut query = Videos::find();

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(videos::Column::Title)))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(videos::Column::Description)))
                            .like(pattern),
                    ),
            );
        }

        if !filter.category_ids.is_empty() {
            let association_subquery = SeaQuery::select()
                .column(video_categories::Column::VideoId)
                .from(VideoCategories.table_ref())
                .and_where(
                    video_categories::Column::CategoryId
                        .is_in(filter.category_ids.iter().cloned()),
                )
                .to_owned();

            query = query.filter(videos::Column::Id.in_subquery(association_subquery));
        }

        if let Some(cursor_id) = cursor {
            let anchor = Videos::find_by_id(cursor_id)
                .one(&self.conn)
                .await
                .context("Failed to resolve pagination cursor")?
                .ok_or_else(|| anyhow::anyhow!("Cursor video {cursor_id} not found"))?;

            query = query.filter(
                Condition::any()
                    .add(videos::Column::CreatedAt.lt(anchor.created_at.clone()))
                    .add(
                        Condition::all()
                            .add(videos::Column::CreatedAt.eq(anchor.created_at))
                            .add(videos::Column::Id.lt(anchor.id)),
                    ),
            );
        }

        let mut rows = query
            .order_by_desc(videos::Column::CreatedAt)
            .order_by_desc(videos::Column::Id)
            .limit(limit.saturating_add(1))
            .all(&self.conn)
            .await
            .context("Failed to list videos")?;

        let has_more = rows.len() as u64 > limit;
        if has_more {
            rows.truncate(limit as usize);
        }
        let next_cursor = if has_more {
            rows.last().map(|v| v.id.to_string())
        } else {
            None
        };

        let categories = rows
            .load_many_to_many(Categories, VideoCategories, &self.conn)
            .await
            .context("Failed to load video categories")?;

        let videos = rows
            .into_iter()
            .zip(categories)
            .map(|(video, categories)| VideoWithCategories { video, categories })
            .collect();

        Ok(VideoPage {
            videos,
            next_cursor,
            has_more,
        })
    }

    pub async fn get(&self, id: i32) -> Result<Option<VideoWithCategories>> {
        let Some(video) = Videos::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query video")?
        else {
            return Ok(None);
        };

        let categories = video
            .find_related(Categories)
            .all(&self.conn)
            .await
            .context("Failed to load video categories")?;

        Ok(Some(VideoWithCategories { video, categories }))
    }

    pub async fn create(
        &self,
        title: String,
        video_link: String,
        description: Option<String>,
        category_ids: &[String],
    ) -> Result<VideoWithCategories> {
        let active = videos::ActiveModel {
            title: Set(title),
            video_link: Set(video_link),
            description: Set(description),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let video = active.insert(&self.conn).await.context("Failed to create video")?;

        self.replace_associations(video.id, category_ids).await?;

        let categories = video.find_related(Categories).all(&self.conn).await?;

        Ok(VideoWithCategories { video, categories })
    }

    /// Update a video. The association set is fully replaced only when
    /// `category_ids` is supplied; `None` leaves existing rows untouched.
    pub async fn update(
        &self,
        id: i32,
        title: String,
        video_link: String,
        description: Option<String>,
        category_ids: Option<&[String]>,
    ) -> Result<Option<VideoWithCategories>> {
        let Some(existing) = Videos::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query video for update")?
        else {
            return Ok(None);
        };

        let mut active: videos::ActiveModel = existing.into();
        active.title = Set(title);
        active.video_link = Set(video_link);
        active.description = Set(description);

        let video = active.update(&self.conn).await.context("Failed to update video")?;

        if let Some(ids) = category_ids {
            self.replace_associations(id, ids).await?;
        }

        let categories = video.find_related(Categories).all(&self.conn).await?;

        Ok(Some(VideoWithCategories { video, categories }))
    }

    /// Delete a video together with its association rows.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        VideoCategories::delete_many()
            .filter(video_categories::Column::VideoId.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to delete video associations")?;

        let result = Videos::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete video")?;

        Ok(result.rows_affected > 0)
    }

    /// Delete-all-then-recreate so the association set is replaced as a unit.
    async fn replace_associations(&self, video_id: i32, category_ids: &[String]) -> Result<()> {
        VideoCategories::delete_many()
            .filter(video_categories::Column::VideoId.eq(video_id))
            .exec(&self.conn)
            .await
            .context("Failed to clear video associations")?;

        if !category_ids.is_empty() {
            let rows = category_ids
                .iter()
                .map(|category_id| video_categories::ActiveModel {
                    video_id: Set(video_id),
                    category_id: Set(category_id.clone()),
                });

            VideoCategories::insert_many(rows)
                .exec(&self.conn)
                .await
                .context("Failed to create video associations")?;
        }

        Ok(())
    }
}
