//! Route definitions for streams.

use axum::routing::get;
use axum::Router;

use crate::handlers::stream;
use crate::state::AppState;

/// Stream routes mounted at `/streams`.
///
/// ```text
/// GET   /       -> list
/// POST  /       -> create
/// GET   /{id}   -> get_by_id
/// PATCH /{id}   -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(stream::list).post(stream::create))
        .route("/{id}", get(stream::get_by_id).patch(stream::update))
}
