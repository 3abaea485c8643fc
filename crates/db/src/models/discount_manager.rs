//! Discount manager: the public code and the link it routes to.
//!
//! In memory the link is a [`LinkTarget`], so a manager cannot point at both
//! a discount and a gift. On disk (and on the wire) it is the flat
//! `discount_gift` / `discount_id` / `gift_id` triple, guarded by the
//! `ck_discount_managers_target` constraint.

use serde::Serialize;
use sqlx::FromRow;
use streamcode_core::promo::LinkTarget;
use streamcode_core::types::{DbId, Timestamp};

use crate::error::StoreError;

/// A row from the `discount_managers` table, exactly as stored.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct DiscountManagerRow {
    pub id: DbId,
    pub code: String,
    /// `false` = discount, `true` = gift.
    pub discount_gift: bool,
    pub discount_id: Option<DbId>,
    pub gift_id: Option<DbId>,
    pub stream_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A validated discount manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "DiscountManagerRow")]
pub struct DiscountManager {
    pub id: DbId,
    pub code: String,
    pub target: LinkTarget,
    pub stream_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<DiscountManagerRow> for DiscountManager {
    type Error = StoreError;

    fn try_from(row: DiscountManagerRow) -> Result<Self, Self::Error> {
        let target = LinkTarget::from_columns(row.discount_gift, row.discount_id, row.gift_id)
            .ok_or_else(|| {
                StoreError::Integrity(format!(
                    "discount manager {} does not reference exactly one {}",
                    row.id,
                    if row.discount_gift { "gift" } else { "discount" },
                ))
            })?;

        Ok(Self {
            id: row.id,
            code: row.code,
            target,
            stream_id: row.stream_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<DiscountManager> for DiscountManagerRow {
    fn from(manager: DiscountManager) -> Self {
        Self {
            id: manager.id,
            code: manager.code,
            discount_gift: manager.target.discount_gift(),
            discount_id: manager.target.discount_id(),
            gift_id: manager.target.gift_id(),
            stream_id: manager.stream_id,
            created_at: manager.created_at,
            updated_at: manager.updated_at,
        }
    }
}

/// Input for inserting a manager row.
#[derive(Debug, Clone)]
pub struct NewDiscountManager {
    pub code: String,
    pub target: LinkTarget,
    pub stream_id: DbId,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;
    use streamcode_core::types::new_id;

    use super::*;

    fn row(discount_gift: bool, discount_id: Option<DbId>, gift_id: Option<DbId>) -> DiscountManagerRow {
        let now = Utc::now();
        DiscountManagerRow {
            id: new_id(),
            code: "abcd1234".into(),
            discount_gift,
            discount_id,
            gift_id,
            stream_id: new_id(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn gift_row_converts_to_gift_target() {
        let gift_id = new_id();
        let manager = DiscountManager::try_from(row(true, None, Some(gift_id))).unwrap();
        assert_eq!(manager.target, LinkTarget::Gift(gift_id));
    }

    #[test]
    fn row_with_both_keys_is_an_integrity_fault() {
        let result = DiscountManager::try_from(row(false, Some(new_id()), Some(new_id())));
        assert_matches!(result, Err(StoreError::Integrity(_)));
    }

    #[test]
    fn flag_disagreeing_with_key_is_an_integrity_fault() {
        let result = DiscountManager::try_from(row(true, Some(new_id()), None));
        assert_matches!(result, Err(StoreError::Integrity(_)));
    }

    #[test]
    fn serializes_as_flat_columns() {
        let discount_id = new_id();
        let manager = DiscountManager::try_from(row(false, Some(discount_id), None)).unwrap();
        let json = serde_json::to_value(&manager).unwrap();

        assert_eq!(json["discount_gift"], false);
        assert_eq!(json["discount_id"], discount_id.to_string());
        assert!(json["gift_id"].is_null());
        assert_eq!(json["code"], "abcd1234");
        assert!(json.get("target").is_none());
    }

    #[test]
    fn row_round_trips_through_manager() {
        let original = row(true, None, Some(new_id()));
        let manager = DiscountManager::try_from(original.clone()).unwrap();
        assert_eq!(DiscountManagerRow::from(manager), original);
    }
}
