//! Brand entity model and DTOs.

use ingetech_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `brands` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Brand {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a brand.
#[derive(Debug, Deserialize)]
pub struct CreateBrand {
    pub name: String,
    pub description: Option<String>,
}
