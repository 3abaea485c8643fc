//! Gift entity model and DTOs.
//!
//! `used` is only ever written by the redemption path
//! ([`GiftRepo::increment_used`](crate::repositories::GiftRepo::increment_used)).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use streamcode_core::promo::validate_amount;
use streamcode_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::discount_manager::DiscountManager;

/// A row from the `gifts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Gift {
    pub id: DbId,
    pub amount: f64,
    pub used: i32,
    pub capacity: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Gift {
    /// Redemptions left before the gift is exhausted.
    pub fn remaining(&self) -> i32 {
        (self.capacity - self.used).max(0)
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.capacity
    }
}

/// DTO for issuing a gift against a stream. `used` always starts at 0.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGift {
    #[validate(custom(function = "validate_amount"))]
    pub amount: f64,
    #[validate(range(min = 0))]
    pub capacity: i32,
    pub stream_id: DbId,
}

/// DTO for updating a gift. `used` is deliberately absent.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateGift {
    #[validate(custom(function = "validate_amount"))]
    pub amount: Option<f64>,
    #[validate(range(min = 0))]
    pub capacity: Option<i32>,
}

/// Body of a redemption request.
///
/// The code is not validated: any string that no gift owns, empty or
/// oversized included, is simply an unknown code.
#[derive(Debug, Clone, Deserialize)]
pub struct RedeemGift {
    pub code: String,
}

/// A gift with its manager link, if one exists.
#[derive(Debug, Clone, Serialize)]
pub struct GiftWithManager {
    #[serde(flatten)]
    pub gift: Gift,
    pub discount_manager: Option<DiscountManager>,
}
