//! Idempotent schema bootstrap.
//!
//! Every statement uses `IF NOT EXISTS`, so [`create_schema`] can run on each
//! process start. Tables are listed in foreign-key order.

use sqlx::PgPool;

use crate::error::SchemaError;

/// Unique constraint on the public redemption code.
pub const CODE_CONSTRAINT: &str = "uq_discount_managers_code";

/// One table and the statements (table first, then indexes) that define it.
pub struct TableDefinition {
    pub name: &'static str,
    pub statements: &'static [&'static str],
}

/// All tables owned by the service, in creation order.
pub const TABLES: &[TableDefinition] = &[
    TableDefinition {
        name: "streams",
        statements: &["CREATE TABLE IF NOT EXISTS streams ( \
                id          UUID PRIMARY KEY, \
                name        TEXT NOT NULL, \
                start_time  TIMESTAMPTZ NOT NULL, \
                finish_time TIMESTAMPTZ NOT NULL, \
                status      TEXT NOT NULL, \
                created_at  TIMESTAMPTZ NOT NULL DEFAULT now(), \
                updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(), \
                CONSTRAINT ck_streams_window CHECK (finish_time >= start_time) \
            )"],
    },
    TableDefinition {
        name: "discounts",
        statements: &["CREATE TABLE IF NOT EXISTS discounts ( \
                id             UUID PRIMARY KEY, \
                percent        INTEGER NOT NULL, \
                amount         DOUBLE PRECISION NOT NULL, \
                percent_amount BOOLEAN NOT NULL DEFAULT false, \
                created_at     TIMESTAMPTZ NOT NULL DEFAULT now(), \
                updated_at     TIMESTAMPTZ NOT NULL DEFAULT now(), \
                CONSTRAINT ck_discounts_percent CHECK (percent BETWEEN 0 AND 100), \
                CONSTRAINT ck_discounts_amount CHECK (amount >= 0) \
            )"],
    },
    TableDefinition {
        name: "gifts",
        statements: &["CREATE TABLE IF NOT EXISTS gifts ( \
                id         UUID PRIMARY KEY, \
                amount     DOUBLE PRECISION NOT NULL, \
                used       INTEGER NOT NULL DEFAULT 0, \
                capacity   INTEGER NOT NULL, \
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
                CONSTRAINT ck_gifts_amount CHECK (amount >= 0), \
                CONSTRAINT ck_gifts_used CHECK (used >= 0 AND used <= capacity) \
            )"],
    },
    TableDefinition {
        name: "discount_managers",
        statements: &[
            "CREATE TABLE IF NOT EXISTS discount_managers ( \
                id            UUID PRIMARY KEY, \
                code          TEXT NOT NULL, \
                discount_gift BOOLEAN NOT NULL, \
                discount_id   UUID REFERENCES discounts (id), \
                gift_id       UUID REFERENCES gifts (id), \
                stream_id     UUID NOT NULL REFERENCES streams (id), \
                created_at    TIMESTAMPTZ NOT NULL DEFAULT now(), \
                updated_at    TIMESTAMPTZ NOT NULL DEFAULT now(), \
                CONSTRAINT uq_discount_managers_code UNIQUE (code), \
                CONSTRAINT uq_discount_managers_discount_id UNIQUE (discount_id), \
                CONSTRAINT uq_discount_managers_gift_id UNIQUE (gift_id), \
                CONSTRAINT ck_discount_managers_target CHECK ( \
                    (discount_gift AND gift_id IS NOT NULL AND discount_id IS NULL) \
                    OR (NOT discount_gift AND discount_id IS NOT NULL AND gift_id IS NULL) \
                ) \
            )",
            "CREATE INDEX IF NOT EXISTS idx_discount_managers_stream_id \
                ON discount_managers (stream_id)",
        ],
    },
];

/// Ensure every table in [`TABLES`] exists.
///
/// Stops at the first rejected statement and reports which table it belonged
/// to.
pub async fn create_schema(pool: &PgPool) -> Result<(), SchemaError> {
    for table in TABLES {
        for statement in table.statements {
            sqlx::query(statement)
                .execute(pool)
                .await
                .map_err(|source| {
                    tracing::error!(table = table.name, error = %source, "Table definition rejected");
                    SchemaError {
                        table: table.name,
                        source,
                    }
                })?;
        }
        tracing::info!(table = table.name, "Table ensured");
    }
    Ok(())
}
