//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Lookup tables only carry the entity struct.

pub mod brand;
pub mod communication;
pub mod inventory;
pub mod lookup;
pub mod password_reset;
pub mod product;
pub mod user;
pub mod warehouse;
