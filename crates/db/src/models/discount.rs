//! Discount entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use streamcode_core::promo::validate_amount;
use streamcode_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::discount_manager::DiscountManager;

/// A row from the `discounts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Discount {
    pub id: DbId,
    pub percent: i32,
    pub amount: f64,
    /// `false` = `percent` applies, `true` = `amount` applies.
    pub percent_amount: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for issuing a discount against a stream.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDiscount {
    #[validate(range(min = 0, max = 100))]
    pub percent: i32,
    #[validate(custom(function = "validate_amount"))]
    pub amount: f64,
    #[serde(default)]
    pub percent_amount: bool,
    pub stream_id: DbId,
}

/// A discount with its manager link, if one exists.
#[derive(Debug, Clone, Serialize)]
pub struct DiscountWithManager {
    #[serde(flatten)]
    pub discount: Discount,
    pub discount_manager: Option<DiscountManager>,
}
