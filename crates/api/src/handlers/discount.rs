//! Handlers for the `/discounts` resource.

use axum::extract::State;
use axum::response::IntoResponse;
use serde::Serialize;
use streamcode_db::models::discount::CreateDiscount;
use streamcode_db::repositories::DiscountRepo;
use streamcode_db::with_deadline;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::Envelope;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct DiscountCreated {
    discount_code: String,
}

/// GET /api/v1/discounts
///
/// List all discounts with their manager link.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let discounts =
        with_deadline(state.store_timeout(), DiscountRepo::list_with_manager(&state.pool)).await?;
    Ok(Envelope::ok("All Discounts", discounts))
}

/// POST /api/v1/discounts
///
/// Issue a discount for a stream and return its code.
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateDiscount>,
) -> AppResult<impl IntoResponse> {
    let manager = state.issuance.issue_discount(&input).await?;
    Ok(Envelope::created(
        "Discount created successfully",
        DiscountCreated {
            discount_code: manager.code,
        },
    ))
}
