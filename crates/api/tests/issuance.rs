//! Service-level tests for transactional discount and gift issuance.

mod common;

use std::collections::HashSet;

use assert_matches::assert_matches;
use sqlx::PgPool;
use streamcode_api::error::AppError;
use streamcode_api::state::AppState;
use streamcode_core::codes::{is_well_formed, CodeGenerator, CODE_LENGTH};
use streamcode_core::error::CoreError;
use streamcode_core::promo::LinkTarget;
use streamcode_core::types::DbId;
use streamcode_db::models::discount::CreateDiscount;
use streamcode_db::models::gift::CreateGift;
use streamcode_db::models::stream::CreateStream;
use streamcode_db::repositories::{DiscountManagerRepo, DiscountRepo, GiftRepo, StreamRepo};

async fn new_stream(state: &AppState) -> DbId {
    StreamRepo::create(
        &state.pool,
        &CreateStream {
            name: "Issuance".to_string(),
            status: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn gift_input(stream_id: DbId) -> CreateGift {
    CreateGift {
        amount: 9.99,
        capacity: 4,
        stream_id,
    }
}

fn discount_input(stream_id: DbId) -> CreateDiscount {
    CreateDiscount {
        percent: 0,
        amount: 3.0,
        percent_amount: true,
        stream_id,
    }
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn gift_manager_links_to_the_new_gift(pool: PgPool) {
    let state = common::test_state(pool).await;
    let stream_id = new_stream(&state).await;

    let manager = state.issuance.issue_gift(&gift_input(stream_id)).await.unwrap();

    assert_eq!(manager.stream_id, stream_id);
    let LinkTarget::Gift(gift_id) = manager.target else {
        panic!("expected a gift link, got {:?}", manager.target);
    };
    let gift = GiftRepo::find_by_id(&state.pool, gift_id).await.unwrap().unwrap();
    assert_eq!(gift.used, 0);
    assert_eq!(gift.capacity, 4);
}

#[sqlx::test(migrations = false)]
async fn discount_manager_links_to_the_new_discount(pool: PgPool) {
    let state = common::test_state(pool).await;
    let stream_id = new_stream(&state).await;

    let manager = state
        .issuance
        .issue_discount(&discount_input(stream_id))
        .await
        .unwrap();

    let LinkTarget::Discount(discount_id) = manager.target else {
        panic!("expected a discount link, got {:?}", manager.target);
    };
    let discount = DiscountRepo::find_by_id(&state.pool, discount_id)
        .await
        .unwrap()
        .unwrap();
    assert!(discount.percent_amount);
    assert_eq!(discount.amount, 3.0);

    let stored = DiscountManagerRepo::find_by_code(&state.pool, &manager.code)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, manager);
}

// ---------------------------------------------------------------------------
// Codes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn issued_codes_are_well_formed_and_distinct(pool: PgPool) {
    let state = common::test_state(pool).await;
    let stream_id = new_stream(&state).await;

    let mut codes = HashSet::new();
    for _ in 0..20 {
        let manager = state.issuance.issue_gift(&gift_input(stream_id)).await.unwrap();
        assert_eq!(manager.code.len(), CODE_LENGTH);
        assert!(is_well_formed(&manager.code), "bad code {}", manager.code);
        codes.insert(manager.code);
    }
    assert_eq!(codes.len(), 20);
}

/// First `n` codes a generator seeded like the test state would hand out.
fn seeded_codes(n: usize) -> Vec<String> {
    let codes = CodeGenerator::from_seed(common::TEST_SEED);
    (0..n).map(|_| codes.new_code(CODE_LENGTH)).collect()
}

#[sqlx::test(migrations = false)]
async fn colliding_code_is_retried_with_a_fresh_one(pool: PgPool) {
    // Same seed on both sides: the second issuer's first code is taken.
    let first_state = common::test_state(pool.clone()).await;
    let second_state = common::test_state(pool).await;
    let stream_id = new_stream(&first_state).await;
    let expected = seeded_codes(2);

    let first = first_state
        .issuance
        .issue_gift(&gift_input(stream_id))
        .await
        .unwrap();
    let second = second_state
        .issuance
        .issue_gift(&gift_input(stream_id))
        .await
        .unwrap();

    assert_eq!(first.code, expected[0]);
    assert_eq!(second.code, expected[1]);

    // The losing attempt's gift row was rolled back with its transaction.
    assert_eq!(GiftRepo::list(&first_state.pool).await.unwrap().len(), 2);
    assert_eq!(
        DiscountManagerRepo::list(&first_state.pool).await.unwrap().len(),
        2
    );
}

#[sqlx::test(migrations = false)]
async fn persistent_collisions_give_up_with_conflict(pool: PgPool) {
    let first_state = common::test_state(pool.clone()).await;
    let second_state = common::test_state(pool).await;
    let stream_id = new_stream(&first_state).await;

    // Take every code the second issuer will try.
    for _ in 0..5 {
        first_state
            .issuance
            .issue_gift(&gift_input(stream_id))
            .await
            .unwrap();
    }

    let result = second_state
        .issuance
        .issue_discount(&discount_input(stream_id))
        .await;

    assert_matches!(result, Err(AppError::Core(CoreError::Conflict(_))));
    assert!(DiscountRepo::list(&first_state.pool).await.unwrap().is_empty());
    assert_eq!(GiftRepo::list(&first_state.pool).await.unwrap().len(), 5);
}

// ---------------------------------------------------------------------------
// Atomicity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn missing_stream_writes_nothing(pool: PgPool) {
    let state = common::test_state(pool).await;

    let result = state.issuance.issue_gift(&gift_input(uuid::Uuid::new_v4())).await;
    assert_matches!(
        result,
        Err(AppError::Core(CoreError::NotFound { entity: "Stream", .. }))
    );

    let result = state
        .issuance
        .issue_discount(&discount_input(uuid::Uuid::new_v4()))
        .await;
    assert_matches!(result, Err(AppError::Core(CoreError::NotFound { .. })));

    assert!(GiftRepo::list(&state.pool).await.unwrap().is_empty());
    assert!(DiscountRepo::list(&state.pool).await.unwrap().is_empty());
    assert!(DiscountManagerRepo::list(&state.pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = false)]
async fn invalid_input_is_rejected_before_any_write(pool: PgPool) {
    let state = common::test_state(pool).await;
    let stream_id = new_stream(&state).await;

    let result = state
        .issuance
        .issue_gift(&CreateGift {
            amount: -1.0,
            ..gift_input(stream_id)
        })
        .await;
    assert_matches!(result, Err(AppError::Core(CoreError::Validation(_))));

    assert!(GiftRepo::list(&state.pool).await.unwrap().is_empty());
}
