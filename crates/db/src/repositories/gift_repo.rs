//! Repository for the `gifts` table.

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use streamcode_core::promo::LinkTarget;
use streamcode_core::types::{new_id, DbId};

use crate::error::StoreError;
use crate::models::gift::{CreateGift, Gift, GiftWithManager, UpdateGift};
use crate::repositories::DiscountManagerRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, amount, used, capacity, created_at, updated_at";

/// Provides CRUD operations and the redemption counter for gifts.
pub struct GiftRepo;

impl GiftRepo {
    /// Insert a gift with `used = 0` inside the caller's transaction.
    pub async fn create_in_tx(
        conn: &mut PgConnection,
        input: &CreateGift,
    ) -> Result<Gift, StoreError> {
        let query = format!(
            "INSERT INTO gifts (id, amount, used, capacity) \
             VALUES ($1, $2, 0, $3) \
             RETURNING {COLUMNS}"
        );
        let gift = sqlx::query_as::<_, Gift>(&query)
            .bind(new_id())
            .bind(input.amount)
            .bind(input.capacity)
            .fetch_one(conn)
            .await?;
        Ok(gift)
    }

    /// Find a gift by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Gift>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM gifts WHERE id = $1");
        let gift = sqlx::query_as::<_, Gift>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(gift)
    }

    /// Find the gift that owns `code`, together with its manager.
    ///
    /// Returns `None` when no manager has this code or when the code belongs
    /// to a discount. A gift manager whose gift row is missing is an
    /// integrity fault.
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<GiftWithManager>, StoreError> {
        let Some(manager) = DiscountManagerRepo::find_by_code(pool, code).await? else {
            return Ok(None);
        };
        let LinkTarget::Gift(gift_id) = manager.target else {
            return Ok(None);
        };

        let gift = Self::find_by_id(pool, gift_id).await?.ok_or_else(|| {
            StoreError::Integrity(format!(
                "discount manager {} references missing gift {gift_id}",
                manager.id
            ))
        })?;

        Ok(Some(GiftWithManager {
            gift,
            discount_manager: Some(manager),
        }))
    }

    /// List all gifts, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Gift>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM gifts ORDER BY created_at, id");
        let gifts = sqlx::query_as::<_, Gift>(&query).fetch_all(pool).await?;
        Ok(gifts)
    }

    /// List all gifts, each with its manager link.
    pub async fn list_with_manager(pool: &PgPool) -> Result<Vec<GiftWithManager>, StoreError> {
        let gifts = Self::list(pool).await?;
        let mut managers: HashMap<DbId, _> = DiscountManagerRepo::list_by_kind(pool, true)
            .await?
            .into_iter()
            .filter_map(|m| m.target.gift_id().map(|id| (id, m)))
            .collect();

        Ok(gifts
            .into_iter()
            .map(|gift| GiftWithManager {
                discount_manager: managers.remove(&gift.id),
                gift,
            })
            .collect())
    }

    /// Update a gift's amount and/or capacity. Only non-`None` fields are
    /// applied; `used` is never touched here.
    ///
    /// Returns `None` if no row with the given `id` exists. Lowering
    /// capacity below `used` fails with [`StoreError::CheckViolation`].
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGift,
    ) -> Result<Option<Gift>, StoreError> {
        let query = format!(
            "UPDATE gifts SET \
                amount = COALESCE($2, amount), \
                capacity = COALESCE($3, capacity), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let gift = sqlx::query_as::<_, Gift>(&query)
            .bind(id)
            .bind(input.amount)
            .bind(input.capacity)
            .fetch_optional(pool)
            .await?;
        Ok(gift)
    }

    /// Consume one unit of capacity, if any is left.
    ///
    /// This is a single conditional `UPDATE`, so concurrent callers are
    /// serialized by the row lock and the `used < capacity` predicate is
    /// re-evaluated against the committed value. Returns the updated row, or
    /// `None` if the gift was already exhausted (or does not exist) when the
    /// update ran.
    pub async fn increment_used(pool: &PgPool, id: DbId) -> Result<Option<Gift>, StoreError> {
        let query = format!(
            "UPDATE gifts SET used = used + 1, updated_at = now() \
             WHERE id = $1 AND used < capacity \
             RETURNING {COLUMNS}"
        );
        let gift = sqlx::query_as::<_, Gift>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(gift)
    }
}
