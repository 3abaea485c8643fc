//! Discount and gift issuance.
//!
//! The child row and its manager link are written in one transaction, after
//! the stream has been checked (and share-locked) inside that same
//! transaction. A missing stream therefore writes nothing, and a failure
//! after the child insert rolls the child back with it.
//!
//! Codes are random and may collide. A collision surfaces as a unique
//! violation on the code constraint; the transaction is discarded and the
//! whole issuance retried with a fresh code.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use streamcode_core::codes::{CodeGenerator, CODE_LENGTH};
use streamcode_core::error::CoreError;
use streamcode_core::promo::{entities, DiscountKind, LinkTarget};
use streamcode_core::types::DbId;
use streamcode_db::models::discount::CreateDiscount;
use streamcode_db::models::discount_manager::{DiscountManager, NewDiscountManager};
use streamcode_db::models::gift::CreateGift;
use streamcode_db::repositories::{DiscountManagerRepo, DiscountRepo, GiftRepo, StreamRepo};
use streamcode_db::schema::CODE_CONSTRAINT;
use streamcode_db::with_deadline;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// How many fresh codes to try before giving up on a collision streak.
const MAX_CODE_ATTEMPTS: u32 = 5;

/// What is being issued.
enum Issue<'a> {
    Discount(&'a CreateDiscount),
    Gift(&'a CreateGift),
}

impl Issue<'_> {
    fn stream_id(&self) -> DbId {
        match self {
            Self::Discount(input) => input.stream_id,
            Self::Gift(input) => input.stream_id,
        }
    }

    fn entity(&self) -> &'static str {
        match self {
            Self::Discount(_) => entities::DISCOUNT,
            Self::Gift(_) => entities::GIFT,
        }
    }
}

#[derive(Clone)]
pub struct IssuanceService {
    pool: PgPool,
    codes: Arc<CodeGenerator>,
    store_timeout: Duration,
}

impl IssuanceService {
    pub fn new(pool: PgPool, codes: Arc<CodeGenerator>, store_timeout: Duration) -> Self {
        Self {
            pool,
            codes,
            store_timeout,
        }
    }

    /// Create a discount linked to `input.stream_id` and return its manager.
    pub async fn issue_discount(&self, input: &CreateDiscount) -> AppResult<DiscountManager> {
        input.validate()?;
        let manager = self.issue(Issue::Discount(input)).await?;
        tracing::info!(
            code = %manager.code,
            stream_id = %input.stream_id,
            kind = ?DiscountKind::from_flag(input.percent_amount),
            "Discount issued",
        );
        Ok(manager)
    }

    /// Create a gift (with `used = 0`) linked to `input.stream_id` and return
    /// its manager.
    pub async fn issue_gift(&self, input: &CreateGift) -> AppResult<DiscountManager> {
        input.validate()?;
        let manager = self.issue(Issue::Gift(input)).await?;
        tracing::info!(
            code = %manager.code,
            stream_id = %input.stream_id,
            capacity = input.capacity,
            "Gift issued",
        );
        Ok(manager)
    }

    async fn issue(&self, request: Issue<'_>) -> AppResult<DiscountManager> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = self.codes.new_code(CODE_LENGTH);
            match with_deadline(self.store_timeout, self.issue_once(&request, code)).await {
                Err(AppError::Store(err)) if err.is_conflict_on(CODE_CONSTRAINT) => {
                    tracing::warn!(attempt, entity = request.entity(), "Generated code collided, retrying");
                }
                other => return other,
            }
        }
        Err(CoreError::Conflict(format!(
            "could not generate a unique code after {MAX_CODE_ATTEMPTS} attempts"
        ))
        .into())
    }

    /// One transactional attempt: check stream, insert child, insert link.
    async fn issue_once(&self, request: &Issue<'_>, code: String) -> AppResult<DiscountManager> {
        let stream_id = request.stream_id();
        let mut tx = self.pool.begin().await?;

        if !StreamRepo::lock_for_share_in_tx(&mut tx, stream_id).await? {
            // Dropping `tx` rolls back; nothing has been written yet anyway.
            return Err(CoreError::not_found(entities::STREAM, stream_id).into());
        }

        let target = match request {
            Issue::Discount(input) => {
                LinkTarget::Discount(DiscountRepo::create_in_tx(&mut tx, input).await?.id)
            }
            Issue::Gift(input) => LinkTarget::Gift(GiftRepo::create_in_tx(&mut tx, input).await?.id),
        };

        let manager = DiscountManagerRepo::create_in_tx(
            &mut tx,
            &NewDiscountManager {
                code,
                target,
                stream_id,
            },
        )
        .await?;

        tx.commit().await?;
        Ok(manager)
    }
}
