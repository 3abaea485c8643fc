pub mod discounts;
pub mod gifts;
pub mod health;
pub mod streams;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /discounts                  list, issue
///
/// /gifts                      list, issue
/// /gifts/redeem               redeem one unit (POST)
/// /gifts/usage/{code}         redemption counter (GET)
/// /gifts/{id}                 update amount / capacity (PATCH)
///
/// /streams                    list, create
/// /streams/{id}               get, update
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/discounts", discounts::router())
        .nest("/gifts", gifts::router())
        .nest("/streams", streams::router())
}
