use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::error;

use super::AppState;

/// Session key holding the authenticated user's id
const SESSION_USER_KEY: &str = "user_id";

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

fn failure(status: StatusCode, body: serde_json::Value) -> Response {
    (status, Json(body)).into_response()
}

/// POST /api/auth/login
///
/// The session record is persisted by the session layer before the success
/// response leaves the server.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Response {
    if payload.username.is_empty() || payload.password.is_empty() {
        return failure(
            StatusCode::BAD_REQUEST,
            json!({ "success": false, "error": "Username and password are required" }),
        );
    }

    let user = match state
        .store()
        .verify_credentials(&payload.username, &payload.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            error!("Login error: {e:#}");
            return failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "success": false, "error": "An error occurred during login" }),
            );
        }
    };

    // Identical wording for unknown user and wrong password, so the
    // endpoint cannot be used to enumerate usernames
    let Some(user) = user else {
        return failure(
            StatusCode::UNAUTHORIZED,
            json!({ "success": false, "error": "Invalid username or password" }),
        );
    };

    if let Err(e) = session.insert(SESSION_USER_KEY, user.id).await {
        error!("Session save error: {e}");
        return failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "success": false, "error": "Failed to save session" }),
        );
    }

    tracing::info!(username = %user.username, "Login successful");

    Json(json!({
        "success": true,
        "message": "Login successful",
        "user": { "id": user.id, "username": user.username }
    }))
    .into_response()
}

/// POST /api/auth/logout
///
/// Flushing destroys the server-side record and clears the cookie under
/// its configured name; calling it without a session is not an error.
pub async fn logout(session: Session) -> Response {
    match session.flush().await {
        Ok(()) => Json(json!({ "success": true, "message": "Logout successful" })).into_response(),
        Err(e) => {
            error!("Logout error: {e}");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "success": false, "error": "Failed to logout" }),
            )
        }
    }
}

/// GET /api/auth/check
pub async fn check_auth(State(state): State<Arc<AppState>>, session: Session) -> Response {
    let user_id = match session.get::<i32>(SESSION_USER_KEY).await {
        Ok(user_id) => user_id,
        Err(e) => {
            error!("Session read error: {e}");
            return failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "success": false, "error": "An error occurred while checking authentication" }),
            );
        }
    };

    let Some(user_id) = user_id else {
        return failure(
            StatusCode::UNAUTHORIZED,
            json!({ "success": false, "authenticated": false, "message": "No active session" }),
        );
    };

    // The session may outlive the user row; treat that as unauthenticated
    match state.store().get_user_by_id(user_id).await {
        Ok(Some(user)) => Json(json!({
            "success": true,
            "authenticated": true,
            "user": { "id": user.id, "username": user.username }
        }))
        .into_response(),
        Ok(None) => failure(
            StatusCode::UNAUTHORIZED,
            json!({ "success": false, "authenticated": false }),
        ),
        Err(e) => {
            error!("Check auth error: {e:#}");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "success": false, "error": "An error occurred while checking authentication" }),
            )
        }
    }
}

/// GET /api/debug/session — only routed when `server.debug_endpoint` is set
pub async fn debug_session(session: Session) -> Response {
    let user_id = session.get::<i32>(SESSION_USER_KEY).await.ok().flatten();

    Json(json!({
        "session_id": session.id().map(|id| id.to_string()),
        "user_id": user_id,
    }))
    .into_response()
}
