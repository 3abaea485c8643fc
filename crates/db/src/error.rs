//! Store-level error types.

use std::time::Duration;

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// PostgreSQL SQLSTATE for `check_violation`.
const CHECK_VIOLATION: &str = "23514";

/// Failure of a single store operation.
///
/// Constraint violations are pulled out of [`sqlx::Error`] so callers can
/// react to them (e.g. regenerate a code on a duplicate) without poking at
/// driver internals.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint (or primary key) was violated.
    #[error("unique constraint violated: {constraint}")]
    Conflict { constraint: String },

    /// A `CHECK` constraint rejected the row.
    #[error("check constraint violated: {constraint}")]
    CheckViolation { constraint: String },

    /// A foreign key referenced a row that does not exist.
    #[error("foreign key violated: {constraint}")]
    ForeignKey { constraint: String },

    /// Stored data breaks an invariant the schema is supposed to guarantee.
    #[error("data integrity fault: {0}")]
    Integrity(String),

    /// The operation did not finish before its deadline.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    /// Returns `true` if this is a unique violation on the named constraint.
    pub fn is_conflict_on(&self, name: &str) -> bool {
        matches!(self, Self::Conflict { constraint } if constraint == name)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return Self::Conflict { constraint },
                Some(CHECK_VIOLATION) => return Self::CheckViolation { constraint },
                Some(FOREIGN_KEY_VIOLATION) => return Self::ForeignKey { constraint },
                _ => {}
            }
        }
        Self::Database(err)
    }
}

/// Schema bootstrap failed. Fatal at startup.
#[derive(Debug, thiserror::Error)]
#[error("failed to create table {table}: {source}")]
pub struct SchemaError {
    /// The table whose definition the store rejected.
    pub table: &'static str,
    #[source]
    pub source: sqlx::Error,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn non_database_errors_stay_opaque() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert_matches!(err, StoreError::Database(sqlx::Error::RowNotFound));
    }

    #[test]
    fn conflict_matches_only_its_constraint() {
        let err = StoreError::Conflict {
            constraint: "uq_discount_managers_code".into(),
        };
        assert!(err.is_conflict_on("uq_discount_managers_code"));
        assert!(!err.is_conflict_on("streams_pkey"));
        assert!(!StoreError::Timeout(Duration::from_secs(1)).is_conflict_on("streams_pkey"));
    }

    #[test]
    fn schema_error_names_the_table() {
        let err = SchemaError {
            table: "gifts",
            source: sqlx::Error::PoolTimedOut,
        };
        assert!(err.to_string().contains("gifts"));
    }
}
