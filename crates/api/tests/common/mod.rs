#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use linguist_core::roles::{ROLE_MANAGER, ROLE_TRANSLATOR};
use linguist_core::status::{FileKind, SegmentStatus};
use linguist_core::types::DbId;
use linguist_db::MemoryStore;
use tower::ServiceExt;

use linguist_api::config::ServerConfig;
use linguist_api::router::build_app_router;
use linguist_api::state::AppState;

pub const ALICE: DbId = 1;
pub const BOB: DbId = 2;
pub const MANAGER: DbId = 90;

/// Build a test `ServerConfig` with safe defaults.
///
/// Stats retries run without delay so degraded-path tests stay fast.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        stats_retry_delay_ms: 0,
    }
}

/// The full application router over an in-memory store.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the application with the production middleware stack on top of a
/// fresh [`MemoryStore`].
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), store.clone(), &config);
    let router = build_app_router(state.clone(), &config);
    TestApp {
        store,
        state,
        router,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Who is calling: `(user_id, role)`.
pub type Caller = (DbId, &'static str);

pub fn translator(user_id: DbId) -> Caller {
    (user_id, ROLE_TRANSLATOR)
}

pub fn manager() -> Caller {
    (MANAGER, ROLE_MANAGER)
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    caller: Option<Caller>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((user_id, role)) = caller {
        builder = builder
            .header("x-user-id", user_id.to_string())
            .header("x-user-role", role);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Anonymous GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_as(app: Router, uri: &str, caller: Caller) -> Response<Body> {
    send(app, Method::GET, uri, Some(caller), None).await
}

pub async fn post_as(app: Router, uri: &str, caller: Caller) -> Response<Body> {
    send(app, Method::POST, uri, Some(caller), None).await
}

pub async fn post_json_as(
    app: Router,
    uri: &str,
    caller: Caller,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(caller), Some(body)).await
}

pub async fn delete_as(app: Router, uri: &str, caller: Caller) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(caller), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a project through the API and return its id.
pub async fn create_project(app: &TestApp, name: &str, deadline: Option<&str>) -> DbId {
    let body = serde_json::json!({
        "name": name,
        "source_language": "en",
        "target_language": "ja",
        "deadline": deadline,
        "files": [
            { "name": "manual.docx" },
            { "name": "glossary.pdf", "kind": "reference" }
        ]
    });
    let response = post_json_as(app.router(), "/api/v1/projects", manager(), body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Seed segments into a project's first (work) file.
pub async fn seed_work_segments(app: &TestApp, project_id: DbId, segments: &[(&str, SegmentStatus)]) {
    use linguist_db::ProjectStore;

    let files = app.store.files(project_id).await.unwrap();
    let work = files
        .iter()
        .find(|f| f.kind() == Ok(FileKind::Work))
        .expect("project has a work file");
    for (text, status) in segments {
        app.store.add_segment(work.id, text, *status).await.unwrap();
    }
}
