//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is needed.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use streamcode_api::error::AppError;
use streamcode_core::error::CoreError;
use streamcode_db::StoreError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Domain errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::not_found("Gift", "abc"));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
    assert_eq!(json["message"], "Gift abc not found");
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn capacity_exhausted_returns_412() {
    let err = AppError::Core(CoreError::CapacityExhausted {
        code: "abc".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(json["status"], 412);
    assert_eq!(json["message"], "No more capacity to use. All used.");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("capacity: range".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "capacity: range");
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict("no unique code".into()));

    let (status, _) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "invalid field value");
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unique_violation_returns_409() {
    let err = AppError::Store(StoreError::Conflict {
        constraint: "uq_discount_managers_code".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["message"], "Code is already in use");
}

#[tokio::test]
async fn check_violation_returns_400_with_domain_message() {
    let err = AppError::Store(StoreError::CheckViolation {
        constraint: "ck_gifts_used".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["message"],
        "Gift capacity cannot be lower than its used count"
    );
}

#[tokio::test]
async fn constraint_names_are_not_echoed() {
    let errors = [
        StoreError::Conflict {
            constraint: "uq_something_new".into(),
        },
        StoreError::CheckViolation {
            constraint: "ck_something_new".into(),
        },
        StoreError::ForeignKey {
            constraint: "discount_managers_stream_id_fkey".into(),
        },
    ];

    for err in errors {
        let (_, json) = error_to_response(AppError::Store(err)).await;
        let message = json["message"].as_str().unwrap();
        assert!(!message.contains("uq_"), "leaked: {message}");
        assert!(!message.contains("ck_"), "leaked: {message}");
        assert!(!message.contains("fkey"), "leaked: {message}");
    }
}

// ---------------------------------------------------------------------------
// Server faults hide their cause
// ---------------------------------------------------------------------------

#[tokio::test]
async fn timeout_returns_generic_500() {
    let err = AppError::Store(StoreError::Timeout(Duration::from_millis(50)));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["status"], 500);
    assert_eq!(json["message"], "Something went wrong");
}

#[tokio::test]
async fn integrity_fault_does_not_leak_details() {
    let err = AppError::Store(StoreError::Integrity("manager 1 has two targets".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!json["message"].as_str().unwrap().contains("manager"));
}
