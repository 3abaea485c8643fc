//! Gift redemption.
//!
//! The counter is advanced with a single conditional `UPDATE ... WHERE used <
//! capacity`, never with a read followed by a blind write. When that update
//! matches no row another redeemer took the last unit between our read and
//! our write, so the gift is read again and the capacity re-checked. Every
//! lost race means some other call succeeded, which bounds the loop by the
//! gift's capacity.

use std::time::Duration;

use serde::Serialize;
use sqlx::PgPool;
use streamcode_core::error::CoreError;
use streamcode_core::promo::entities;
use streamcode_core::types::DbId;
use streamcode_db::repositories::GiftRepo;
use streamcode_db::with_deadline;

use crate::error::AppResult;

/// Outcome of a successful redemption.
#[derive(Debug, Clone)]
pub struct Redemption {
    pub gift_id: DbId,
    /// Monetary value the caller should apply.
    pub amount: f64,
    /// Counter value after this redemption.
    pub used: i32,
    pub capacity: i32,
    /// Number of read/update rounds it took (1 when uncontended).
    pub attempts: u32,
}

/// Read-only view of a gift's redemption counter.
#[derive(Debug, Clone, Serialize)]
pub struct GiftUsage {
    pub code: String,
    pub used: i32,
    pub capacity: i32,
    pub remaining: i32,
}

#[derive(Clone)]
pub struct RedemptionService {
    pool: PgPool,
    store_timeout: Duration,
}

impl RedemptionService {
    pub fn new(pool: PgPool, store_timeout: Duration) -> Self {
        Self {
            pool,
            store_timeout,
        }
    }

    /// Consume one unit of the gift identified by `code`.
    ///
    /// Fails with [`CoreError::NotFound`] if no gift owns the code and with
    /// [`CoreError::CapacityExhausted`] if every unit is already used; in
    /// both cases nothing is written.
    pub async fn redeem(&self, code: &str) -> AppResult<Redemption> {
        let mut attempts = 0;
        loop {
            attempts += 1;

            let found = with_deadline(self.store_timeout, GiftRepo::find_by_code(&self.pool, code))
                .await?
                .ok_or_else(|| CoreError::not_found(entities::GIFT, code))?;
            let gift = found.gift;

            if gift.is_exhausted() {
                tracing::info!(
                    code,
                    gift_id = %gift.id,
                    used = gift.used,
                    capacity = gift.capacity,
                    "Gift has no capacity left",
                );
                return Err(CoreError::CapacityExhausted {
                    code: code.to_string(),
                }
                .into());
            }

            let updated =
                with_deadline(self.store_timeout, GiftRepo::increment_used(&self.pool, gift.id))
                    .await?;

            match updated {
                Some(gift) => {
                    tracing::info!(
                        code,
                        gift_id = %gift.id,
                        used = gift.used,
                        capacity = gift.capacity,
                        attempts,
                        "Gift redeemed",
                    );
                    return Ok(Redemption {
                        gift_id: gift.id,
                        amount: gift.amount,
                        used: gift.used,
                        capacity: gift.capacity,
                        attempts,
                    });
                }
                None => {
                    tracing::debug!(code, gift_id = %gift.id, attempts, "Lost redemption race, re-checking");
                }
            }
        }
    }

    /// Current counter for the gift identified by `code`.
    pub async fn usage(&self, code: &str) -> AppResult<GiftUsage> {
        let found = with_deadline(self.store_timeout, GiftRepo::find_by_code(&self.pool, code))
            .await?
            .ok_or_else(|| CoreError::not_found(entities::GIFT, code))?;

        Ok(GiftUsage {
            code: code.to_string(),
            used: found.gift.used,
            capacity: found.gift.capacity,
            remaining: found.gift.remaining(),
        })
    }
}
