//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` as the first argument. Methods suffixed `_in_tx` take a
//! `&mut PgConnection` so callers can group several writes into one
//! transaction.

pub mod discount_manager_repo;
pub mod discount_repo;
pub mod gift_repo;
pub mod stream_repo;

pub use discount_manager_repo::DiscountManagerRepo;
pub use discount_repo::DiscountRepo;
pub use gift_repo::GiftRepo;
pub use stream_repo::StreamRepo;
