//! Warehouse entity model and DTOs.

use ingetech_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `warehouses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Warehouse {
    pub id: DbId,
    pub name: String,
    pub location: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a warehouse.
#[derive(Debug, Deserialize)]
pub struct CreateWarehouse {
    pub name: String,
    pub location: Option<String>,
}
