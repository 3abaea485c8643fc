//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - Where the entity is mutable, an update DTO (all `Option` fields)
//! - A "with relation" view used by the eager-loading list queries

pub mod discount;
pub mod discount_manager;
pub mod gift;
pub mod stream;
