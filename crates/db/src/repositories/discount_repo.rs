//! Repository for the `discounts` table.

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use streamcode_core::types::{new_id, DbId};

use crate::error::StoreError;
use crate::models::discount::{CreateDiscount, Discount, DiscountWithManager};
use crate::repositories::DiscountManagerRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, percent, amount, percent_amount, created_at, updated_at";

/// Provides insert and lookup operations for discounts.
pub struct DiscountRepo;

impl DiscountRepo {
    /// Insert a discount inside the caller's transaction.
    ///
    /// `input.stream_id` is not stored here; the stream link lives on the
    /// manager row.
    pub async fn create_in_tx(
        conn: &mut PgConnection,
        input: &CreateDiscount,
    ) -> Result<Discount, StoreError> {
        let query = format!(
            "INSERT INTO discounts (id, percent, amount, percent_amount) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        let discount = sqlx::query_as::<_, Discount>(&query)
            .bind(new_id())
            .bind(input.percent)
            .bind(input.amount)
            .bind(input.percent_amount)
            .fetch_one(conn)
            .await?;
        Ok(discount)
    }

    /// Find a discount by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Discount>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM discounts WHERE id = $1");
        let discount = sqlx::query_as::<_, Discount>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(discount)
    }

    /// List all discounts, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Discount>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM discounts ORDER BY created_at, id");
        let discounts = sqlx::query_as::<_, Discount>(&query)
            .fetch_all(pool)
            .await?;
        Ok(discounts)
    }

    /// List all discounts, each with its manager link.
    pub async fn list_with_manager(pool: &PgPool) -> Result<Vec<DiscountWithManager>, StoreError> {
        let discounts = Self::list(pool).await?;
        let mut managers: HashMap<DbId, _> = DiscountManagerRepo::list_by_kind(pool, false)
            .await?
            .into_iter()
            .filter_map(|m| m.target.discount_id().map(|id| (id, m)))
            .collect();

        Ok(discounts
            .into_iter()
            .map(|discount| DiscountWithManager {
                discount_manager: managers.remove(&discount.id),
                discount,
            })
            .collect())
    }
}
