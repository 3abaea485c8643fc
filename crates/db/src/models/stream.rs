//! Stream entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use streamcode_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::discount_manager::DiscountManager;

/// A row from the `streams` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Stream {
    pub id: DbId,
    pub name: String,
    pub start_time: Timestamp,
    pub finish_time: Timestamp,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a stream. Start and finish are always computed server-side.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStream {
    #[serde(alias = "stream_name")]
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub status: Option<String>,
}

/// DTO for updating a stream. All fields optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStream {
    #[serde(alias = "stream_name")]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub status: Option<String>,
}

/// A stream together with every code linked to it.
#[derive(Debug, Clone, Serialize)]
pub struct StreamWithManagers {
    #[serde(flatten)]
    pub stream: Stream,
    pub discount_managers: Vec<DiscountManager>,
}
