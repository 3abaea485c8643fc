//! Repository for the `discount_managers` table.

use sqlx::{PgConnection, PgPool};
use streamcode_core::types::{new_id, DbId};

use crate::error::StoreError;
use crate::models::discount_manager::{DiscountManager, DiscountManagerRow, NewDiscountManager};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, code, discount_gift, discount_id, gift_id, stream_id, created_at, updated_at";

/// Provides insert and lookup operations for discount managers.
pub struct DiscountManagerRepo;

impl DiscountManagerRepo {
    /// Insert a manager row inside the caller's transaction.
    ///
    /// A duplicate code fails with [`StoreError::Conflict`] on
    /// [`CODE_CONSTRAINT`](crate::schema::CODE_CONSTRAINT).
    pub async fn create_in_tx(
        conn: &mut PgConnection,
        input: &NewDiscountManager,
    ) -> Result<DiscountManager, StoreError> {
        let query = format!(
            "INSERT INTO discount_managers (id, code, discount_gift, discount_id, gift_id, stream_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, DiscountManagerRow>(&query)
            .bind(new_id())
            .bind(&input.code)
            .bind(input.target.discount_gift())
            .bind(input.target.discount_id())
            .bind(input.target.gift_id())
            .bind(input.stream_id)
            .fetch_one(conn)
            .await?;
        row.try_into()
    }

    /// Find a manager by its public code.
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<DiscountManager>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM discount_managers WHERE code = $1");
        sqlx::query_as::<_, DiscountManagerRow>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await?
            .map(DiscountManager::try_from)
            .transpose()
    }

    /// Find a manager by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DiscountManager>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM discount_managers WHERE id = $1");
        sqlx::query_as::<_, DiscountManagerRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .map(DiscountManager::try_from)
            .transpose()
    }

    /// List all managers, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<DiscountManager>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM discount_managers ORDER BY created_at, id");
        let rows = sqlx::query_as::<_, DiscountManagerRow>(&query)
            .fetch_all(pool)
            .await?;
        rows.into_iter().map(DiscountManager::try_from).collect()
    }

    /// List managers of one kind (`true` = gift links, `false` = discount links).
    pub async fn list_by_kind(
        pool: &PgPool,
        discount_gift: bool,
    ) -> Result<Vec<DiscountManager>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM discount_managers \
             WHERE discount_gift = $1 ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, DiscountManagerRow>(&query)
            .bind(discount_gift)
            .fetch_all(pool)
            .await?;
        rows.into_iter().map(DiscountManager::try_from).collect()
    }

    /// List managers belonging to any of the given streams.
    pub async fn list_for_streams(
        pool: &PgPool,
        stream_ids: &[DbId],
    ) -> Result<Vec<DiscountManager>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM discount_managers \
             WHERE stream_id = ANY($1) ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, DiscountManagerRow>(&query)
            .bind(stream_ids)
            .fetch_all(pool)
            .await?;
        rows.into_iter().map(DiscountManager::try_from).collect()
    }
}
