//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Reads go straight to the repositories in `streamcode_db`; writes that
//! span several rows go through [`crate::services`]. Errors are mapped via
//! [`AppError`](crate::error::AppError).

pub mod discount;
pub mod gift;
pub mod stream;
