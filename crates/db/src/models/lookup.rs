//! Lookup table models (`user_types`, `provinces`).

use ingetech_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserType {
    pub id: DbId,
    pub name: String,
}

/// A row from the `provinces` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Province {
    pub id: DbId,
    pub name: String,
}
