#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use streamcode_core::codes::CodeGenerator;
use tower::ServiceExt;

use streamcode_api::config::ServerConfig;
use streamcode_api::router::build_app_router;
use streamcode_api::state::AppState;

/// Fixed seed so generated codes are reproducible within a test.
pub const TEST_SEED: u64 = 7;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and a 5-second store deadline.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".parse().unwrap()],
        request_timeout_secs: 30,
        store_timeout_ms: 5_000,
        database_url: String::new(),
        database_max_connections: 5,
    }
}

/// State wired to `pool` with a deterministic code generator.
///
/// Creates the schema first, exactly as the binary does on startup.
pub async fn test_state(pool: PgPool) -> AppState {
    streamcode_db::create_schema(&pool).await.unwrap();
    AppState::new(pool, test_config(), Arc::new(CodeGenerator::from_seed(TEST_SEED)))
}

/// Build the full application router with the production middleware stack.
pub async fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    build_app_router(test_state(pool).await, &config)
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PATCH, uri, body).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a stream and return its id.
pub async fn create_stream(app: Router, name: &str) -> String {
    let response = post_json(app, "/api/v1/streams", serde_json::json!({ "name": name })).await;
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

/// POST a gift against `stream_id` and return its code.
pub async fn create_gift(app: Router, stream_id: &str, amount: f64, capacity: i32) -> String {
    let response = post_json(
        app,
        "/api/v1/gifts",
        serde_json::json!({ "amount": amount, "capacity": capacity, "stream_id": stream_id }),
    )
    .await;
    let json = body_json(response).await;
    json["data"]["gift_code"].as_str().unwrap().to_string()
}
