//! Common test utilities and fixtures
use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use chorus_server::{
    config::UploadSettings,
    router::create_router,
    services::{AuthService, FileStorage},
    state::AppState,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "chorus-test-boundary";

/// Test user credentials
pub mod fixtures {
    pub const TEST_PASSWORD: &str = "TestPassword123!";
    pub const FAKE_MP3: &[u8] = b"ID3 fake mp3 bytes";
    pub const FAKE_PNG: &[u8] = b"\x89PNG fake png bytes";
}

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub media_dir: TempDir,
    _db_dir: TempDir,
}

/// Build an app backed by throwaway database and media directories
pub async fn create_test_app() -> TestApp {
    let db_dir = tempfile::tempdir().unwrap();
    let db_url = format!("sqlite://{}", db_dir.path().join("test.db").display());

    let pool = chorus_storage::create_pool(&db_url).await.unwrap();
    chorus_storage::run_migrations(&pool).await.unwrap();

    let media_dir = tempfile::tempdir().unwrap();
    let files = FileStorage::new(media_dir.path().to_path_buf());
    files.initialize().await.unwrap();

    let auth = Arc::new(AuthService::new("test-secret-key".to_string(), 1));

    let state = AppState::new(
        pool,
        auth,
        Arc::new(files),
        UploadSettings {
            max_audio_kb: 64,
            max_image_kb: 64,
        },
    );

    let app = create_router(state.clone());

    TestApp {
        app,
        state,
        media_dir,
        _db_dir: db_dir,
    }
}

/// Fire a JSON (or empty) request at the router
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Fire a multipart request at the router
pub async fn request_multipart(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Vec<u8>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={}", BOUNDARY),
    );

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = builder.body(Body::from(body)).unwrap();

    app.clone().oneshot(request).await.unwrap()
}

/// Decode a response body as JSON
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// Assemble a multipart body from text fields and file parts
pub fn multipart_body(
    fields: &[(&str, &str)],
    files: &[(&str, &str, &str, &[u8])],
) -> Vec<u8> {
    let mut body: Vec<u8> = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    for (name, filename, content_type, data) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Register an account through the API; returns (user, token)
pub async fn register_user(app: &Router, name: &str, email: &str) -> (Value, String) {
    let response = request(
        app,
        "POST",
        "/api/register",
        None,
        Some(serde_json::json!({
            "name": name,
            "email": email,
            "password": fixtures::TEST_PASSWORD,
            "password_confirmation": fixtures::TEST_PASSWORD,
        })),
    )
    .await;

    assert_eq!(response.status(), 201, "registration should succeed");

    let body = body_json(response).await;
    let token = body["token"].as_str().unwrap().to_string();
    (body["user"].clone(), token)
}

/// Upload a song with valid defaults through the API; returns the song body
pub async fn upload_song(app: &Router, token: &str, title: &str, artist: &str) -> Value {
    let body = multipart_body(
        &[("title", title), ("artist", artist)],
        &[("audio_file", "song.mp3", "audio/mpeg", fixtures::FAKE_MP3)],
    );

    let response = request_multipart(app, "POST", "/api/songs", Some(token), body).await;
    assert_eq!(response.status(), 201, "song upload should succeed");

    body_json(response).await
}
