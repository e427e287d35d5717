//! Domain logic shared by the database, dispatch, and API crates.
//!
//! This crate has no internal dependencies so every other crate in the
//! workspace can use it.

pub mod audience;
pub mod channels;
pub mod communication;
pub mod error;
pub mod inventory;
pub mod phone;
pub mod roles;
pub mod types;
pub mod validation;
