//! Handlers for the `/gifts` resource.

use axum::extract::State;
use axum::response::IntoResponse;
use serde::Serialize;
use streamcode_core::error::CoreError;
use streamcode_core::promo::entities;
use streamcode_core::types::DbId;
use streamcode_db::models::gift::{CreateGift, RedeemGift, UpdateGift};
use streamcode_db::repositories::GiftRepo;
use streamcode_db::with_deadline;
use validator::Validate;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::response::Envelope;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct GiftCreated {
    gift_code: String,
}

#[derive(Debug, Serialize)]
struct GiftRedeemed {
    gift_amount: f64,
    used: i32,
    capacity: i32,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/gifts
///
/// List all gifts with their manager link.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let gifts =
        with_deadline(state.store_timeout(), GiftRepo::list_with_manager(&state.pool)).await?;
    Ok(Envelope::ok("All Gifts", gifts))
}

/// POST /api/v1/gifts
///
/// Issue a gift for a stream and return its code.
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateGift>,
) -> AppResult<impl IntoResponse> {
    let manager = state.issuance.issue_gift(&input).await?;
    Ok(Envelope::created(
        "Gift created successfully",
        GiftCreated {
            gift_code: manager.code,
        },
    ))
}

/// POST /api/v1/gifts/redeem
///
/// Consume one unit of a gift. 412 when the gift is exhausted.
pub async fn redeem(
    State(state): State<AppState>,
    AppJson(input): AppJson<RedeemGift>,
) -> AppResult<impl IntoResponse> {
    let redemption = state.redemption.redeem(&input.code).await?;
    Ok(Envelope::ok(
        "Gift redeemed",
        GiftRedeemed {
            gift_amount: redemption.amount,
            used: redemption.used,
            capacity: redemption.capacity,
        },
    ))
}

/// GET /api/v1/gifts/usage/{code}
///
/// Redemption counter for a gift code. Codes may contain `#`, `&` and other
/// reserved characters, so clients must percent-encode them.
pub async fn usage(
    State(state): State<AppState>,
    AppPath(code): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let usage = state.redemption.usage(&code).await?;
    Ok(Envelope::ok("Gift usage", usage))
}

/// PATCH /api/v1/gifts/{id}
///
/// Change a gift's amount or capacity. The counter itself is read-only here.
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateGift>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let gift = with_deadline(state.store_timeout(), GiftRepo::update(&state.pool, id, &input))
        .await?
        .ok_or_else(|| CoreError::not_found(entities::GIFT, id))?;
    Ok(Envelope::ok("Gift updated", gift))
}
