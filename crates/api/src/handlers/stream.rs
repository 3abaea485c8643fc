//! Handlers for the `/streams` resource.

use axum::extract::State;
use axum::response::IntoResponse;
use streamcode_core::error::CoreError;
use streamcode_core::promo::entities;
use streamcode_core::types::DbId;
use streamcode_db::models::stream::{CreateStream, UpdateStream};
use streamcode_db::repositories::StreamRepo;
use streamcode_db::with_deadline;
use validator::Validate;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::response::Envelope;
use crate::state::AppState;

/// GET /api/v1/streams
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let streams =
        with_deadline(state.store_timeout(), StreamRepo::list_with_managers(&state.pool)).await?;
    Ok(Envelope::ok("All Streams", streams))
}

/// POST /api/v1/streams
///
/// Any start/finish supplied by the client is ignored; the stream is
/// scheduled for the fixed window around now.
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateStream>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let stream = with_deadline(state.store_timeout(), StreamRepo::create(&state.pool, &input)).await?;
    tracing::info!(stream_id = %stream.id, name = %stream.name, "Stream created");
    Ok(Envelope::created("Stream created successfully", stream))
}

/// GET /api/v1/streams/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let stream = with_deadline(state.store_timeout(), StreamRepo::find_with_managers(&state.pool, id))
        .await?
        .ok_or_else(|| CoreError::not_found(entities::STREAM, id))?;
    Ok(Envelope::ok("Stream", stream))
}

/// PATCH /api/v1/streams/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateStream>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let stream = with_deadline(state.store_timeout(), StreamRepo::update(&state.pool, id, &input))
        .await?
        .ok_or_else(|| CoreError::not_found(entities::STREAM, id))?;
    Ok(Envelope::ok("Stream updated", stream))
}
