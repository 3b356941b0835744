#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use pages_api::auth::jwt::{issue_token, JwtConfig};
use pages_api::config::ServerConfig;
use pages_api::router::build_app_router;
use pages_api::state::AppState;
use pages_core::editor::Editor;
use pages_core::fields::PageFields;
use pages_core::i18n::Translator;
use pages_core::page::{Page, PageDraft};
use pages_core::status::Statuses;
use pages_core::store::MemoryPageStore;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        vault_prefix: "/vault".to_string(),
        page_statuses: None,
        locale_catalog: None,
        database_url: None,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            token_lifetime_mins: 15,
        },
    }
}

/// The application under test plus direct handles on its state.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryPageStore>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Persist a page through the lifecycle manager, as editor `created_by`.
    pub async fn seed_page(&self, title: &str, created_by: i64) -> Page {
        let fields = PageFields {
            title: Some(title.to_string()),
            body: Some(format!("{title} body")),
            ..Default::default()
        };
        let draft = PageDraft::new(self.state.pages.statuses());
        self.state
            .pages
            .create(draft, &fields, &Editor::new(created_by, "admin"))
            .await
            .unwrap()
    }
}

/// Build the full application router over an in-memory store with the
/// default status set and no locale catalog.
pub fn build_test_app() -> TestApp {
    build_test_app_with(Translator::default())
}

pub fn build_test_app_with(translator: Translator) -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryPageStore::new());
    let state = AppState::new(store.clone(), config.clone(), Statuses::default(), translator);
    let router = build_app_router(state.clone(), &config);
    TestApp {
        router,
        state,
        store,
    }
}

/// Bearer token for editor `id` with `role`.
pub fn token(id: i64, role: &str) -> String {
    issue_token(&Editor::new(id, role), &test_config().jwt).unwrap()
}

/// A request builder carrying the bearer token for (`id`, `role`).
pub fn authed(method: Method, uri: &str, id: i64, role: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {}", token(id, role)))
}

/// Send a request to the app and return the response.
pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

/// Send a GET request as an admin.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = authed(Method::GET, uri, 1, "admin")
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a POST request with a JSON body as (`id`, `role`).
pub async fn post_json_as(
    app: Router,
    uri: &str,
    json: serde_json::Value,
    id: i64,
    role: &str,
) -> Response<Body> {
    let request = authed(Method::POST, uri, id, role)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&json).unwrap()))
        .unwrap();
    send(app, request).await
}

/// Send a POST request with a JSON body as an admin.
pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    post_json_as(app, uri, json, 1, "admin").await
}

/// Send an empty asynchronous (`X-Requested-With`) POST as an admin.
pub async fn post_async(app: Router, uri: &str) -> Response<Body> {
    let request = authed(Method::POST, uri, 1, "admin")
        .header("x-requested-with", "XMLHttpRequest")
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send an empty navigation POST as an admin, optionally with a referer.
pub async fn post_navigation(app: Router, uri: &str, referer: Option<&str>) -> Response<Body> {
    let mut builder = authed(Method::POST, uri, 1, "admin");
    if let Some(referer) = referer {
        builder = builder.header("referer", referer);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `Location` header of a redirect response.
pub fn location(response: &Response<Body>) -> String {
    response.headers()["location"].to_str().unwrap().to_string()
}
