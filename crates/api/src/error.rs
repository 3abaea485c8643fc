use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use streamcode_core::error::CoreError;
use streamcode_db::StoreError;

use crate::response::Envelope;

/// Generic message returned for every 5xx; the cause is only logged.
const INTERNAL_MESSAGE: &str = "Something went wrong";

/// Application-level error type for HTTP handlers and services.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce the standard `{ status, message }` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `streamcode_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A store-level error from `streamcode_db`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(err.into())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Core(errors.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl AppError {
    /// The HTTP status and client-facing message for this error.
    ///
    /// Server faults are logged here and replaced by a generic message.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => {
                    (StatusCode::NOT_FOUND, format!("{entity} {key} not found"))
                }
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                CoreError::CapacityExhausted { .. } => (
                    StatusCode::PRECONDITION_FAILED,
                    "No more capacity to use. All used.".to_string(),
                ),
            },

            // --- Store errors ---
            AppError::Store(err) => classify_store_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        Envelope::<()>::message(status, message).into_response()
    }
}

fn internal() -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
}

/// Classify a store error into an HTTP status and message.
///
/// - Unique violations map to 409.
/// - Check violations map to 400 (the request asked for an invalid state).
/// - Foreign key violations map to 409 (the referenced row is gone).
/// - Integrity faults, timeouts and everything else map to 500.
///
/// Constraint names are logged, never returned.
fn classify_store_error(err: &StoreError) -> (StatusCode, String) {
    match err {
        StoreError::Conflict { constraint } => {
            tracing::warn!(constraint = %constraint, "Unique constraint rejected write");
            (StatusCode::CONFLICT, constraint_message(constraint).to_string())
        }
        StoreError::CheckViolation { constraint } => {
            tracing::warn!(constraint = %constraint, "Check constraint rejected write");
            (StatusCode::BAD_REQUEST, constraint_message(constraint).to_string())
        }
        StoreError::ForeignKey { constraint } => {
            tracing::warn!(constraint = %constraint, "Foreign key rejected write");
            (
                StatusCode::CONFLICT,
                "Referenced record no longer exists".to_string(),
            )
        }
        StoreError::Timeout(limit) => {
            tracing::error!(limit_ms = limit.as_millis() as u64, "Store operation timed out");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Store error");
            internal()
        }
    }
}

/// Client-facing wording for a named schema constraint.
fn constraint_message(constraint: &str) -> &'static str {
    match constraint {
        "uq_discount_managers_code" => "Code is already in use",
        "uq_discount_managers_discount_id" => "Discount already has a code",
        "uq_discount_managers_gift_id" => "Gift already has a code",
        "ck_gifts_used" => "Gift capacity cannot be lower than its used count",
        "ck_gifts_amount" | "ck_discounts_amount" => "Amount must not be negative",
        "ck_discounts_percent" => "Percent must be between 0 and 100",
        "ck_streams_window" => "Stream must finish after it starts",
        "ck_discount_managers_target" => "Code must link to exactly one discount or gift",
        _ => "Request conflicts with existing data",
    }
}
