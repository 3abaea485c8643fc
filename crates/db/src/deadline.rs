//! Per-call deadlines for store operations.

use std::future::Future;
use std::time::Duration;

use crate::error::StoreError;

/// Run a store operation, failing with [`StoreError::Timeout`] if it does not
/// complete within `limit`.
///
/// On timeout the inner future is dropped. A transaction owned by that future
/// is dropped with it, which rolls it back, so a timed-out write leaves
/// nothing behind.
pub async fn with_deadline<T, E, F>(limit: Duration, operation: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<StoreError>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(limit_ms = limit.as_millis() as u64, "Store operation timed out");
            Err(StoreError::Timeout(limit).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn fast_operation_passes_through() {
        let result: Result<u32, StoreError> =
            with_deadline(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn inner_error_is_preserved() {
        let result: Result<u32, StoreError> = with_deadline(Duration::from_secs(1), async {
            Err(StoreError::Integrity("broken".into()))
        })
        .await;
        assert_matches!(result, Err(StoreError::Integrity(_)));
    }

    #[tokio::test]
    async fn slow_operation_times_out() {
        let limit = Duration::from_millis(50);
        let result: Result<u32, StoreError> = with_deadline(limit, async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(1)
        })
        .await;
        assert_matches!(result, Err(StoreError::Timeout(d)) if d == limit);
    }
}
