use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::db::Store;
use crate::services::UploadStore;

pub mod assets;
pub mod auth;
pub mod banners;
pub mod categories;
mod error;
pub mod notifications;
mod types;
pub mod videos;

pub use error::ApiError;
pub use types::*;

pub struct AppState {
    config: Config,
    store: Store,
    uploads: UploadStore,
}

impl AppState {
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub const fn uploads(&self) -> &UploadStore {
        &self.uploads
    }

    /// Base URL stamped into stored image URLs: the configured value when
    /// set, otherwise the scheme+host of the originating request. Stored
    /// URLs therefore go stale if the serving host changes later.
    #[must_use]
    pub fn request_base_url(&self, headers: &HeaderMap) -> String {
        if let Some(base) = self
            .config
            .server
            .base_url
            .as_deref()
            .filter(|b| !b.is_empty())
        {
            return base.trim_end_matches('/').to_string();
        }

        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("http");
        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("localhost");

        format!("{scheme}://{host}")
    }
}

#[must_use]
pub fn create_app_state(config: Config, store: Store) -> Arc<AppState> {
    let uploads = UploadStore::new(&config.server.public_dir);

    Arc::new(AppState {
        config,
        store,
        uploads,
    })
}

/// Connect the store, run migrations, seed the default admin account and
/// assemble the application state.
pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    if store
        .seed_default_admin(&config.auth.admin_username, &config.auth.admin_password)
        .await?
    {
        tracing::info!(username = %config.auth.admin_username, "Seeded default admin account");
    }

    Ok(create_app_state(config, store))
}

pub fn router(state: Arc<AppState>) -> Router {
    let config = state.config().clone();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_name(config.session.cookie_name.clone())
        .with_secure(config.session.secure_cookies)
        .with_http_only(true)
        .with_same_site(config.session.same_site_policy())
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(
            config.session.ttl_hours,
        )));

    let mut api_router = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/check", get(auth::check_auth))
        .route(
            "/videos",
            get(videos::list_videos).post(videos::create_video),
        )
        .route(
            "/videos/{id}",
            get(videos::get_video)
                .put(videos::update_video)
                .delete(videos::delete_video),
        )
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/banners",
            get(banners::list_banners).post(banners::create_banner),
        )
        .route(
            "/banners/{id}",
            get(banners::get_banner)
                .put(banners::update_banner)
                .delete(banners::delete_banner),
        )
        .route(
            "/notifications",
            get(notifications::list_notifications).post(notifications::create_notification),
        )
        .route(
            "/notifications/{id}",
            get(notifications::get_notification)
                .put(notifications::update_notification)
                .delete(notifications::delete_notification),
        );

    if config.server.debug_endpoint {
        api_router = api_router.route("/debug/session", get(auth::debug_session));
    }

    let api_router = api_router.layer(session_layer).with_state(state.clone());

    // Wildcard mode cannot carry credentials; the allow-list mode powers
    // the session cookie across origins
    let cors_layer = if config.server.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .server
            .cors_allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::PATCH,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
    };

    Router::new()
        .route("/health", get(health))
        .with_state(state)
        .nest("/api", api_router)
        .merge(assets::router(&config.server.public_dir))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
}

/// Liveness probe; answers ok only while the database responds.
async fn health(State(state): State<Arc<AppState>>) -> Response {
    match state.store().ping().await {
        Ok(()) => {
            Json(serde_json::json!({ "status": "ok", "message": "Server is running" }))
                .into_response()
        }
        Err(e) => {
            tracing::error!("Health check failed: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "status": "error" })),
            )
                .into_response()
        }
    }
}
