//! Route definitions for gifts.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::gift;
use crate::state::AppState;

/// Gift routes mounted at `/gifts`.
///
/// ```text
/// GET   /               -> list
/// POST  /               -> create
/// POST  /redeem         -> redeem
/// GET   /usage/{code}   -> usage
/// PATCH /{id}           -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(gift::list).post(gift::create))
        .route("/redeem", post(gift::redeem))
        .route("/usage/{code}", get(gift::usage))
        .route("/{id}", patch(gift::update))
}
