//! Services holding the write paths that need more than one store call.
//!
//! Each service owns a pool handle (and, for issuance, the shared code
//! generator) and applies the configured deadline to every store call.

pub mod issuance;
pub mod redemption;

pub use issuance::IssuanceService;
pub use redemption::{GiftUsage, Redemption, RedemptionService};
