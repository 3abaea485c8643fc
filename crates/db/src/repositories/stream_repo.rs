//! Repository for the `streams` table.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use streamcode_core::promo::{stream_window, DEFAULT_STREAM_STATUS};
use streamcode_core::types::{new_id, DbId};

use crate::error::StoreError;
use crate::models::stream::{CreateStream, Stream, StreamWithManagers, UpdateStream};
use crate::repositories::DiscountManagerRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, start_time, finish_time, status, created_at, updated_at";

/// Provides CRUD operations for streams.
pub struct StreamRepo;

impl StreamRepo {
    /// Insert a new stream, returning the created row.
    ///
    /// The schedule is always the fixed window around the creation instant.
    pub async fn create(pool: &PgPool, input: &CreateStream) -> Result<Stream, StoreError> {
        let now = Utc::now();
        let (start, finish) = stream_window(now);
        let query = format!(
            "INSERT INTO streams (id, name, start_time, finish_time, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) \
             RETURNING {COLUMNS}"
        );
        let stream = sqlx::query_as::<_, Stream>(&query)
            .bind(new_id())
            .bind(&input.name)
            .bind(start)
            .bind(finish)
            .bind(input.status.as_deref().unwrap_or(DEFAULT_STREAM_STATUS))
            .bind(now)
            .fetch_one(pool)
            .await?;
        Ok(stream)
    }

    /// Find a stream by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Stream>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM streams WHERE id = $1");
        let stream = sqlx::query_as::<_, Stream>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(stream)
    }

    /// Check that a stream exists and hold a share lock on it until the
    /// caller's transaction ends, so it cannot vanish before the manager row
    /// referencing it is written.
    pub async fn lock_for_share_in_tx(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<bool, StoreError> {
        let found: Option<(DbId,)> = sqlx::query_as("SELECT id FROM streams WHERE id = $1 FOR SHARE")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(found.is_some())
    }

    /// List all streams, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Stream>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM streams ORDER BY created_at, id");
        let streams = sqlx::query_as::<_, Stream>(&query).fetch_all(pool).await?;
        Ok(streams)
    }

    /// List all streams, each with the managers linked to it.
    pub async fn list_with_managers(pool: &PgPool) -> Result<Vec<StreamWithManagers>, StoreError> {
        let streams = Self::list(pool).await?;
        let ids: Vec<DbId> = streams.iter().map(|s| s.id).collect();

        let mut by_stream: HashMap<DbId, Vec<_>> = HashMap::new();
        for manager in DiscountManagerRepo::list_for_streams(pool, &ids).await? {
            by_stream.entry(manager.stream_id).or_default().push(manager);
        }

        Ok(streams
            .into_iter()
            .map(|stream| StreamWithManagers {
                discount_managers: by_stream.remove(&stream.id).unwrap_or_default(),
                stream,
            })
            .collect())
    }

    /// Find one stream with the managers linked to it.
    pub async fn find_with_managers(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<StreamWithManagers>, StoreError> {
        let Some(stream) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let discount_managers = DiscountManagerRepo::list_for_streams(pool, &[id]).await?;
        Ok(Some(StreamWithManagers {
            stream,
            discount_managers,
        }))
    }

    /// Update a stream's name and/or status. Only non-`None` fields are
    /// applied; the schedule is fixed at creation.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStream,
    ) -> Result<Option<Stream>, StoreError> {
        let query = format!(
            "UPDATE streams SET \
                name = COALESCE($2, name), \
                status = COALESCE($3, status), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let stream = sqlx::query_as::<_, Stream>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.status)
            .fetch_optional(pool)
            .await?;
        Ok(stream)
    }
}
