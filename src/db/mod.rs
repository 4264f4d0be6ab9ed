use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::banner::BannerWrite;
pub use repositories::category::CategoryWithCount;
pub use repositories::user::User;
pub use repositories::video::{VideoFilter, VideoPage, VideoWithCategories};

use crate::entities::{banner_images, categories, notifications};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn video_repo(&self) -> repositories::video::VideoRepository {
        repositories::video::VideoRepository::new(self.conn.clone())
    }

    fn category_repo(&self) -> repositories::category::CategoryRepository {
        repositories::category::CategoryRepository::new(self.conn.clone())
    }

    fn banner_repo(&self) -> repositories::banner::BannerRepository {
        repositories::banner::BannerRepository::new(self.conn.clone())
    }

    fn notification_repo(&self) -> repositories::notification::NotificationRepository {
        repositories::notification::NotificationRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_credentials(username, password).await
    }

    pub async fn seed_default_admin(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().seed_admin(username, password).await
    }

    // ========== Videos ==========

    pub async fn list_videos(
        &self,
        filter: &VideoFilter,
        cursor: Option<i32>,
        limit: u64,
    ) -> Result<VideoPage> {
        self.video_repo().list_page(filter, cursor, limit).await
    }

    pub async fn get_video(&self, id: i32) -> Result<Option<VideoWithCategories>> {
        self.video_repo().get(id).await
    }

    pub async fn create_video(
        &self,
        title: String,
        video_link: String,
        description: Option<String>,
        category_ids: &[String],
    ) -> Result<VideoWithCategories> {
        self.video_repo()
            .create(title, video_link, description, category_ids)
            .await
    }

    pub async fn update_video(
        &self,
        id: i32,
        title: String,
        video_link: String,
        description: Option<String>,
        category_ids: Option<&[String]>,
    ) -> Result<Option<VideoWithCategories>> {
        self.video_repo()
            .update(id, title, video_link, description, category_ids)
            .await
    }

    pub async fn delete_video(&self, id: i32) -> Result<bool> {
        self.video_repo().delete(id).await
    }

    // ========== Categories ==========

    pub async fn list_categories(&self) -> Result<Vec<CategoryWithCount>> {
        self.category_repo().list().await
    }

    pub async fn get_category(&self, id: &str) -> Result<Option<CategoryWithCount>> {
        self.category_repo().get(id).await
    }

    pub async fn find_conflicting_category(
        &self,
        name: &str,
        slug: &str,
        exclude_id: Option<&str>,
    ) -> Result<Option<categories::Model>> {
        self.category_repo()
            .find_conflicting(name, slug, exclude_id)
            .await
    }

    pub async fn create_category(
        &self,
        name: String,
        slug: String,
        description: Option<String>,
    ) -> Result<categories::Model> {
        self.category_repo().create(name, slug, description).await
    }

    pub async fn update_category(
        &self,
        id: &str,
        name: String,
        slug: String,
        description: Option<String>,
    ) -> Result<Option<categories::Model>> {
        self.category_repo()
            .update(id, name, slug, description)
            .await
    }

    pub async fn delete_category(&self, id: &str) -> Result<bool> {
        self.category_repo().delete(id).await
    }

    pub async fn categories_exist(&self, ids: &[String]) -> Result<bool> {
        self.category_repo().all_exist(ids).await
    }

    // ========== Banners ==========

    pub async fn list_banners(&self, active_only: bool) -> Result<Vec<banner_images::Model>> {
        self.banner_repo().list(active_only).await
    }

    pub async fn get_banner(&self, id: i32) -> Result<Option<banner_images::Model>> {
        self.banner_repo().get(id).await
    }

    pub async fn create_banner(&self, write: BannerWrite) -> Result<banner_images::Model> {
        self.banner_repo().create(write).await
    }

    pub async fn update_banner(
        &self,
        id: i32,
        write: BannerWrite,
    ) -> Result<Option<banner_images::Model>> {
        self.banner_repo().update(id, write).await
    }

    pub async fn delete_banner(&self, id: i32) -> Result<bool> {
        self.banner_repo().delete(id).await
    }

    // ========== Notifications ==========

    pub async fn list_notifications(&self) -> Result<Vec<notifications::Model>> {
        self.notification_repo().list().await
    }

    pub async fn get_notification(&self, id: i32) -> Result<Option<notifications::Model>> {
        self.notification_repo().get(id).await
    }

    pub async fn create_notification(
        &self,
        title: String,
        description: String,
    ) -> Result<notifications::Model> {
        self.notification_repo().create(title, description).await
    }

    pub async fn update_notification(
        &self,
        id: i32,
        title: String,
        description: String,
    ) -> Result<Option<notifications::Model>> {
        self.notification_repo().update(id, title, description).await
    }

    pub async fn delete_notification(&self, id: i32) -> Result<bool> {
        self.notification_repo().delete(id).await
    }
}
