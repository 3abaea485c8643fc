//! Domain rules for streams, discounts and gifts.
//!
//! Pure functions and small value types with no database dependency, shared
//! by the repository layer and the HTTP services.

use chrono::Duration;
use validator::ValidationError;

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Half-width of the window a stream is scheduled for, around its creation.
pub const STREAM_WINDOW_MINUTES: i64 = 45;

/// Status given to a stream when the client does not supply one.
pub const DEFAULT_STREAM_STATUS: &str = "scheduled";

/// Entity names used in not-found errors and log fields.
pub mod entities {
    pub const STREAM: &str = "Stream";
    pub const DISCOUNT: &str = "Discount";
    pub const GIFT: &str = "Gift";
}

// ---------------------------------------------------------------------------
// Stream window
// ---------------------------------------------------------------------------

/// Start and finish of a stream created at `now`.
///
/// Client-supplied times are never used; the window is always
/// `now - 45min ..= now + 45min`.
pub fn stream_window(now: Timestamp) -> (Timestamp, Timestamp) {
    let half = Duration::minutes(STREAM_WINDOW_MINUTES);
    (now - half, now + half)
}

// ---------------------------------------------------------------------------
// Link target
// ---------------------------------------------------------------------------

/// What a discount manager row points at.
///
/// A manager references exactly one discount or exactly one gift. The
/// `discount_gift` column is the stored discriminator (`true` = gift).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    Discount(DbId),
    Gift(DbId),
}

impl LinkTarget {
    /// The stored discriminator value.
    pub fn discount_gift(&self) -> bool {
        matches!(self, Self::Gift(_))
    }

    pub fn discount_id(&self) -> Option<DbId> {
        match self {
            Self::Discount(id) => Some(*id),
            Self::Gift(_) => None,
        }
    }

    pub fn gift_id(&self) -> Option<DbId> {
        match self {
            Self::Gift(id) => Some(*id),
            Self::Discount(_) => None,
        }
    }

    /// Rebuild a target from its stored columns.
    ///
    /// Returns `None` when the discriminator and foreign keys disagree, i.e.
    /// when the row does not reference exactly one entity of the flagged kind.
    pub fn from_columns(
        discount_gift: bool,
        discount_id: Option<DbId>,
        gift_id: Option<DbId>,
    ) -> Option<Self> {
        match (discount_gift, discount_id, gift_id) {
            (false, Some(id), None) => Some(Self::Discount(id)),
            (true, None, Some(id)) => Some(Self::Gift(id)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Discount kind
// ---------------------------------------------------------------------------

/// Which of a discount's two values applies at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountKind {
    Percent,
    Amount,
}

impl DiscountKind {
    /// Map the stored `percent_amount` flag (`false` = percent, `true` = amount).
    pub fn from_flag(percent_amount: bool) -> Self {
        if percent_amount {
            Self::Amount
        } else {
            Self::Percent
        }
    }
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Currency amounts must be finite and non-negative.
///
/// `validator` hands `Copy` fields to custom hooks by value.
pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("amount_out_of_range")
            .with_message("amount must be a finite, non-negative number".into()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
