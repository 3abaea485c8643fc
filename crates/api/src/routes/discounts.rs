//! Route definitions for discounts.

use axum::routing::get;
use axum::Router;

use crate::handlers::discount;
use crate::state::AppState;

/// Discount routes mounted at `/discounts`.
///
/// ```text
/// GET  /    -> list
/// POST /    -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(discount::list).post(discount::create))
}
