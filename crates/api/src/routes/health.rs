use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Router};
use serde::Serialize;

use crate::response::Envelope;
use crate::state::AppState;

/// Health payload carried in the envelope's `data`.
#[derive(Debug, Serialize)]
pub struct Health {
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database answered a ping.
    pub db_healthy: bool,
}

/// GET /health
///
/// 200 when the database is reachable, 503 otherwise.
async fn health_check(State(state): State<AppState>) -> Envelope<Health> {
    let db_healthy = streamcode_db::health_check(&state.pool).await.is_ok();
    let (status, message) = if db_healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    Envelope {
        status,
        message: message.to_string(),
        data: Some(Health {
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }),
    }
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
