//! Entity store for streams, discounts, gifts and discount managers.
//!
//! Repositories are zero-sized structs with async functions taking a
//! `&PgPool` (or a `&mut PgConnection` for the `_in_tx` variants that must
//! run inside a caller-owned transaction).

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod deadline;
pub mod error;
pub mod models;
pub mod repositories;
pub mod schema;

pub use deadline::with_deadline;
pub use error::{SchemaError, StoreError};
pub use schema::create_schema;

pub type DbPool = sqlx::PgPool;

/// How long to wait for a free connection before giving up.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
