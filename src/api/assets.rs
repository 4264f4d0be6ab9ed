use axum::{Router, response::Redirect, routing::get};
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

/// Admin UI pages and uploaded images, served from the public directory.
/// The root lands on the login page.
pub fn router(public_dir: &str) -> Router {
    let public = Path::new(public_dir);

    Router::new()
        .route("/", get(|| async { Redirect::to("/login") }))
        .route_service("/login", ServeFile::new(public.join("login.html")))
        .route_service("/admin", ServeFile::new(public.join("admin.html")))
        .fallback_service(ServeDir::new(public))
}
