//! Shared response envelope for API handlers.
//!
//! Every response body, success or error, is
//! `{ "status": <code>, "message": <text>, "data"?: <payload> }`.
//! Use [`Envelope`] instead of ad-hoc `serde_json::json!` bodies to keep the
//! status in the body and the HTTP status line in sync.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Serialize, Serializer};

/// Standard `{ status, message, data? }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Envelope::ok("All Streams", streams))
/// ```
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    #[serde(serialize_with = "serialize_status")]
    pub status: StatusCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// 200 with a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: message.into(),
            data: Some(data),
        }
    }

    /// 201 with a payload.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// A body with no payload, used for errors.
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}
