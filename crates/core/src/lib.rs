//! Domain types and rules for the streamcode service.
//!
//! This crate has no internal dependencies and no I/O, so it can be used by
//! the repository layer, the HTTP server and tests alike.

pub mod codes;
pub mod error;
pub mod promo;
pub mod types;
