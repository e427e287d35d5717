//! Inventory rows, movements and low-stock alerts.

use ingetech_core::inventory::MovementKind;
use ingetech_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `inventory_items` table: stock of one product in one
/// warehouse.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryItem {
    pub id: DbId,
    pub product_id: DbId,
    pub warehouse_id: DbId,
    pub quantity: i32,
    pub minimum_quantity: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an inventory row.
#[derive(Debug, Deserialize)]
pub struct CreateInventoryItem {
    pub product_id: DbId,
    pub warehouse_id: DbId,
    #[serde(default)]
    pub quantity: i32,
    pub minimum_quantity: Option<i32>,
}

/// DTO for updating an inventory row. Quantity changes go through
/// movements, so only the threshold is editable.
#[derive(Debug, Deserialize)]
pub struct UpdateInventoryItem {
    pub minimum_quantity: Option<i32>,
}

/// A row from the `inventory_movements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryMovement {
    pub id: DbId,
    pub product_id: DbId,
    pub warehouse_id: DbId,
    pub destination_warehouse_id: Option<DbId>,
    pub kind: String,
    pub quantity: i32,
    pub user_id: Option<DbId>,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for recording a movement.
#[derive(Debug, Deserialize)]
pub struct CreateInventoryMovement {
    pub product_id: DbId,
    pub warehouse_id: DbId,
    pub destination_warehouse_id: Option<DbId>,
    pub kind: MovementKind,
    pub quantity: i32,
    pub user_id: Option<DbId>,
    pub note: Option<String>,
}

/// A row from the `stock_alerts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StockAlert {
    pub id: DbId,
    pub inventory_item_id: DbId,
    pub quantity: i32,
    pub minimum_quantity: i32,
    pub is_processed: bool,
    pub processed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
