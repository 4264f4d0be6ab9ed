use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use fitcms::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::path::PathBuf;
use tower::ServiceExt;

const BOUNDARY: &str = "fitcms-test-boundary";

fn test_config() -> (Config, PathBuf) {
    let public_dir = std::env::temp_dir().join(format!("fitcms-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(public_dir.join("images")).unwrap();

    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // a single pooled connection keeps the in-memory database alive
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.session.secure_cookies = false;
    config.server.public_dir = public_dir.to_str().unwrap().to_string();
    config.server.base_url = Some("http://localhost:5000".to_string());

    (config, public_dir)
}

async fn spawn_app_from(config: Config) -> Router {
    let state = fitcms::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    fitcms::api::router(state)
}

async fn spawn_app() -> Router {
    let (config, _) = test_config();
    spawn_app_from(config).await
}

async fn spawn_app_with_dir() -> (Router, PathBuf) {
    let (config, public_dir) = test_config();
    (spawn_app_from(config).await, public_dir)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn multipart_request(
    method: &str,
    uri: &str,
    fields: &[(&str, &str)],
    image: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((filename, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"banner_image\"; filename=\"{filename}\"\r\nContent-Type: {}\r\n\r\n",
                mime::IMAGE_PNG
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "username": "admin", "password": "welcome@1" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap();

    cookie.split(';').next().unwrap().to_string()
}

fn image_filenames(public_dir: &PathBuf) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(public_dir.join("images"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_health_and_root_redirect() {
    let app = spawn_app().await;

    let response = app.clone().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");

    let response = app.clone().oneshot(get_request("/")).await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn test_login_validation_and_credentials() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/login", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);

    // wrong password for a seeded user
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "username": "admin", "password": "nope" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(response).await;

    // unknown username must be indistinguishable
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "username": "ghost", "password": "nope" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let unknown_user = body_json(response).await;

    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password["error"], "Invalid username or password");
}

#[tokio::test]
async fn test_auth_session_flow() {
    let app = spawn_app().await;

    // no session yet
    let response = app.clone().oneshot(get_request("/api/auth/check")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["authenticated"], false);

    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/check")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["user"]["username"], "admin");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // the old cookie no longer maps to a session
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/check")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // logging out twice is not an error
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_notifications_crud() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/notifications", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/notifications",
            json!({ "title": "New schedule", "description": "Classes move to 7am" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["title"], "New schedule");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/notifications",
            json!({ "title": "Holiday hours", "description": "Closed Friday" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // newest first
    let response = app
        .clone()
        .oneshot(get_request("/api/notifications"))
        .await
        .unwrap();
    let list = body_json(response).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["title"], "Holiday hours");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/notifications/{id}"),
            json!({ "title": "New schedule", "description": "Classes move to 6am" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["description"], "Classes move to 6am");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/notifications/9999",
            json!({ "title": "x", "description": "y" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/notifications/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/notifications/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

async fn create_category(app: &Router, name: &str) -> Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/categories",
            json!({ "name": name }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn test_category_slug_and_conflicts() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/categories", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let created = create_category(&app, "Leg Day!").await;
    assert_eq!(created["name"], "Leg Day!");
    assert_eq!(created["slug"], "leg-day");
    let id = created["id"].as_str().unwrap().to_string();

    // exact duplicate name
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/categories",
            json!({ "name": "Leg Day!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // different name normalizing to the same slug
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/categories",
            json!({ "name": "leg DAY" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // a record never conflicts with itself on update
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/categories/{id}"),
            json!({ "name": "Leg Day!", "description": "Squats and lunges" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/categories/{id}"),
            json!({ "name": "Lower Body" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["slug"], "lower-body");

    let response = app
        .clone()
        .oneshot(get_request("/api/categories/not-a-real-id"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_delete_blocked_until_empty() {
    let app = spawn_app().await;

    let category = create_category(&app, "Cardio").await;
    let category_id = category["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/videos",
            json!({
                "title": "Morning HIIT",
                "video_link": "https://videos.example/hiit.mp4",
                "category_ids": [category_id],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let video = body_json(response).await;
    let video_id = video["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/categories/{category_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("1 associated video(s)")
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/videos/{video_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/categories/{category_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // deletion is irreversible
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/categories/{category_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_video_crud_and_associations() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/videos",
            json!({ "title": "No link" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let cat_a = create_category(&app, "Strength").await["id"]
        .as_str()
        .unwrap()
        .to_string();
    let cat_b = create_category(&app, "Mobility").await["id"]
        .as_str()
        .unwrap()
        .to_string();

    // category ids as a literal list
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/videos",
            json!({
                "title": "Full Body Session",
                "video_link": "https://videos.example/full-body.mp4",
                "description": "Compound lifts",
                "category_ids": [cat_a, cat_b],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let video = body_json(response).await;
    let video_id = video["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/videos/{video_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    let mut slugs: Vec<&str> = fetched["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["slug"].as_str().unwrap())
        .collect();
    slugs.sort_unstable();
    assert_eq!(slugs, vec!["mobility", "strength"]);

    // category ids as a JSON-encoded string (multipart form compatibility)
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/videos",
            json!({
                "title": "Hip Opener Flow",
                "video_link": "https://videos.example/hips.mp4",
                "category_ids": format!("[\"{cat_b}\"]"),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let encoded = body_json(response).await;
    assert_eq!(encoded["categories"].as_array().unwrap().len(), 1);

    // malformed JSON string
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/videos",
            json!({
                "title": "Broken",
                "video_link": "https://videos.example/broken.mp4",
                "category_ids": "not json",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid category_ids format");

    // unknown category id
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/videos",
            json!({
                "title": "Ghost categories",
                "video_link": "https://videos.example/ghost.mp4",
                "category_ids": ["does-not-exist"],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // explicit category_ids replaces the association set
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/videos/{video_id}"),
            json!({
                "title": "Full Body Session",
                "video_link": "https://videos.example/full-body.mp4",
                "category_ids": [cat_a],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["categories"].as_array().unwrap().len(), 1);
    assert_eq!(updated["categories"][0]["slug"], "strength");

    // omitting category_ids leaves associations untouched
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/videos/{video_id}"),
            json!({
                "title": "Full Body Session v2",
                "video_link": "https://videos.example/full-body.mp4",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let untouched = body_json(response).await;
    assert_eq!(untouched["title"], "Full Body Session v2");
    assert_eq!(untouched["categories"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/videos/{video_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/videos/{video_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_video_pagination_round_trip() {
    let app = spawn_app().await;

    let mut created_ids = Vec::new();
    for n in 1..=25 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/videos",
                json!({
                    "title": format!("Video {n:02}"),
                    "video_link": format!("https://videos.example/{n:02}.mp4"),
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        created_ids.push(body_json(response).await["id"].as_i64().unwrap());
    }

    let mut collected = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0;

    loop {
        let uri = match &cursor {
            Some(c) => format!("/api/videos?limit=10&cursor={c}"),
            None => "/api/videos?limit=10".to_string(),
        };

        let response = app.clone().oneshot(get_request(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_json(response).await;
        pages += 1;

        for video in page["videos"].as_array().unwrap() {
            collected.push(video["id"].as_i64().unwrap());
        }

        if page["hasMore"].as_bool().unwrap() {
            cursor = Some(page["nextCursor"].as_str().unwrap().to_string());
        } else {
            assert!(page["nextCursor"].is_null());
            break;
        }
    }

    assert_eq!(pages, 3);
    assert_eq!(collected.len(), 25);

    // strictly descending creation order, each video exactly once
    let mut expected = created_ids.clone();
    expected.reverse();
    assert_eq!(collected, expected);
}

#[tokio::test]
async fn test_video_search_and_category_filters() {
    let app = spawn_app().await;

    let cat_a = create_category(&app, "Strength").await["id"]
        .as_str()
        .unwrap()
        .to_string();
    let cat_b = create_category(&app, "Mobility").await["id"]
        .as_str()
        .unwrap()
        .to_string();

    for (title, description, categories) in [
        ("Pull Day", Some("Heavy DEADLIFT session"), vec![cat_a.clone()]),
        ("Hip Flow", None, vec![cat_b.clone()]),
        ("Rest Day Stretch", Some("gentle stretching"), vec![]),
    ] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/videos",
                json!({
                    "title": title,
                    "video_link": "https://videos.example/v.mp4",
                    "description": description,
                    "category_ids": categories,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // case-insensitive substring match against title OR description
    let response = app
        .clone()
        .oneshot(get_request("/api/videos?search=deadlift"))
        .await
        .unwrap();
    let page = body_json(response).await;
    let videos = page["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0]["title"], "Pull Day");

    let response = app
        .clone()
        .oneshot(get_request("/api/videos?search=day"))
        .await
        .unwrap();
    let page = body_json(response).await;
    assert_eq!(page["videos"].as_array().unwrap().len(), 2);

    // OR semantics across the supplied category ids
    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/videos?category_ids={cat_a},{cat_b}"
        )))
        .await
        .unwrap();
    let page = body_json(response).await;
    assert_eq!(page["videos"].as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/videos?category_ids={cat_b}")))
        .await
        .unwrap();
    let page = body_json(response).await;
    let videos = page["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0]["title"], "Hip Flow");
}

#[tokio::test]
async fn test_banner_lifecycle() {
    let (app, public_dir) = spawn_app_with_dir().await;

    // image part is mandatory on create; no row and no file is written
    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            "/api/banners",
            &[("title", "Summer sale")],
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Banner image is required");
    assert!(image_filenames(&public_dir).is_empty());

    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            "/api/banners",
            &[
                ("title", "Summer sale"),
                ("is_active", "true"),
                ("order", "2"),
                ("link_url", "https://example.com/sale"),
            ],
            Some(("hero.png", b"png bytes")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let banner_id = created["id"].as_i64().unwrap();

    // string form fields arrive typed in the stored row
    assert_eq!(created["is_active"], json!(true));
    assert_eq!(created["order"], json!(2));
    let image_url = created["image_url"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("http://localhost:5000/images/"));

    let first_files = image_filenames(&public_dir);
    assert_eq!(first_files.len(), 1);

    // an inactive banner is hidden by active_only
    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            "/api/banners",
            &[("is_active", "false"), ("order", "1")],
            Some(("secondary.png", b"more png bytes")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.clone().oneshot(get_request("/api/banners")).await.unwrap();
    let all = body_json(response).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
    // ordered by `order` ascending
    assert_eq!(all[0]["order"], json!(1));

    let response = app
        .clone()
        .oneshot(get_request("/api/banners?active_only=true"))
        .await
        .unwrap();
    let active = body_json(response).await;
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(active[0]["id"].as_i64().unwrap(), banner_id);

    // replacing the image deletes the old file only after the update lands
    let response = app
        .clone()
        .oneshot(multipart_request(
            "PUT",
            &format!("/api/banners/{banner_id}"),
            &[("is_active", "true")],
            Some(("hero-v2.png", b"new png bytes")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_ne!(updated["image_url"].as_str().unwrap(), image_url);
    // the order field falls back to the stored value when absent
    assert_eq!(updated["order"], json!(2));

    let after_replace = image_filenames(&public_dir);
    assert_eq!(after_replace.len(), 2);
    assert!(!after_replace.contains(&first_files[0]));

    // updating a missing banner cleans up the upload it received
    let response = app
        .clone()
        .oneshot(multipart_request(
            "PUT",
            "/api/banners/9999",
            &[],
            Some(("orphan.png", b"orphan bytes")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(image_filenames(&public_dir).len(), 2);

    // delete removes the row and then the backing file
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/banners/{banner_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/banners/{banner_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(image_filenames(&public_dir).len(), 1);

    std::fs::remove_dir_all(&public_dir).ok();
}

#[tokio::test]
async fn test_debug_endpoint_is_config_gated() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/api/debug/session"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (mut config, _) = test_config();
    config.server.debug_endpoint = true;
    let app = spawn_app_from(config).await;

    let response = app
        .clone()
        .oneshot(get_request("/api/debug/session"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["user_id"].is_null());
}
