//! Repository for `inventory_items` and `inventory_movements`.

use ingetech_core::inventory::{is_low_stock, plan_movement, DEFAULT_MINIMUM_QUANTITY};
use ingetech_core::types::DbId;
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::inventory::{
    CreateInventoryItem, CreateInventoryMovement, InventoryItem, InventoryMovement, StockAlert,
    UpdateInventoryItem,
};
use crate::repositories::stock_alert_repo::COLUMNS as ALERT_COLUMNS;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, product_id, warehouse_id, quantity, minimum_quantity, created_at, updated_at";

const MOVEMENT_COLUMNS: &str = "id, product_id, warehouse_id, destination_warehouse_id, kind, \
                                quantity, user_id, note, created_at";

/// Why a movement could not be recorded.
#[derive(Debug, thiserror::Error)]
pub enum MovementError {
    /// The movement breaks a stock rule (insufficient stock, bad quantity...).
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Result of a recorded movement.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedMovement {
    pub movement: InventoryMovement,
    /// The source row after the movement.
    pub item: InventoryItem,
    /// The destination row after a transfer.
    pub destination: Option<InventoryItem>,
    /// A newly raised low-stock alert, if the movement crossed the minimum.
    pub alert: Option<StockAlert>,
}

/// Stock rows and the movements that change them.
pub struct InventoryRepo;

impl InventoryRepo {
    /// Create a stock row for a product in a warehouse.
    pub async fn create(
        pool: &PgPool,
        input: &CreateInventoryItem,
    ) -> Result<InventoryItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO inventory_items (product_id, warehouse_id, quantity, minimum_quantity)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(input.product_id)
            .bind(input.warehouse_id)
            .bind(input.quantity)
            .bind(input.minimum_quantity.unwrap_or(DEFAULT_MINIMUM_QUANTITY))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<InventoryItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inventory_items WHERE id = $1");
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List stock rows, optionally restricted to one warehouse.
    pub async fn list(
        pool: &PgPool,
        warehouse_id: Option<DbId>,
    ) -> Result<Vec<InventoryItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inventory_items
             WHERE ($1::BIGINT IS NULL OR warehouse_id = $1)
             ORDER BY warehouse_id ASC, product_id ASC"
        );
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(warehouse_id)
            .fetch_all(pool)
            .await
    }

    /// Update the minimum quantity of a stock row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateInventoryItem,
    ) -> Result<Option<InventoryItem>, sqlx::Error> {
        let query = format!(
            "UPDATE inventory_items SET
                minimum_quantity = COALESCE($2, minimum_quantity)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(id)
            .bind(input.minimum_quantity)
            .fetch_optional(pool)
            .await
    }

    /// Record a movement and apply it to stock in one transaction.
    ///
    /// The source row is locked with `FOR UPDATE` before the stock rules are
    /// checked, so concurrent exits cannot overdraw it. Missing rows are
    /// created on the fly for movements that add stock. When the source
    /// ends at or below its minimum an alert is raised unless an open one
    /// already exists.
    pub async fn record_movement(
        pool: &PgPool,
        input: &CreateInventoryMovement,
    ) -> Result<RecordedMovement, MovementError> {
        let mut tx = pool.begin().await?;

        let lock_query = format!(
            "SELECT {COLUMNS} FROM inventory_items
             WHERE product_id = $1 AND warehouse_id = $2
             FOR UPDATE"
        );
        let current = sqlx::query_as::<_, InventoryItem>(&lock_query)
            .bind(input.product_id)
            .bind(input.warehouse_id)
            .fetch_optional(&mut *tx)
            .await?;

        let stock = current.as_ref().map_or(0, |item| item.quantity);
        let change = plan_movement(
            input.kind,
            input.quantity,
            stock,
            input.warehouse_id,
            input.destination_warehouse_id,
        )
        .map_err(MovementError::Rejected)?;

        let item = apply_delta(&mut tx, input.product_id, input.warehouse_id, change.source_delta)
            .await?;

        let destination = match input.destination_warehouse_id {
            Some(dest) if change.destination_delta != 0 => Some(
                apply_delta(&mut tx, input.product_id, dest, change.destination_delta).await?,
            ),
            _ => None,
        };

        let movement_query = format!(
            "INSERT INTO inventory_movements
                (product_id, warehouse_id, destination_warehouse_id, kind, quantity, user_id, note)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {MOVEMENT_COLUMNS}"
        );
        let movement = sqlx::query_as::<_, InventoryMovement>(&movement_query)
            .bind(input.product_id)
            .bind(input.warehouse_id)
            .bind(input.destination_warehouse_id)
            .bind(input.kind.as_str())
            .bind(input.quantity)
            .bind(input.user_id)
            .bind(&input.note)
            .fetch_one(&mut *tx)
            .await?;

        let alert = if is_low_stock(item.quantity, item.minimum_quantity) {
            let alert_query = format!(
                "INSERT INTO stock_alerts (inventory_item_id, quantity, minimum_quantity)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (inventory_item_id) WHERE NOT is_processed DO NOTHING
                 RETURNING {ALERT_COLUMNS}"
            );
            sqlx::query_as::<_, StockAlert>(&alert_query)
                .bind(item.id)
                .bind(item.quantity)
                .bind(item.minimum_quantity)
                .fetch_optional(&mut *tx)
                .await?
        } else {
            None
        };

        tx.commit().await?;

        if let Some(ref alert) = alert {
            tracing::info!(
                alert_id = alert.id,
                inventory_item_id = item.id,
                quantity = item.quantity,
                minimum = item.minimum_quantity,
                "Low stock alert raised"
            );
        }

        Ok(RecordedMovement {
            movement,
            item,
            destination,
            alert,
        })
    }

    /// List movements, newest first, optionally for one product.
    pub async fn list_movements(
        pool: &PgPool,
        product_id: Option<DbId>,
    ) -> Result<Vec<InventoryMovement>, sqlx::Error> {
        let query = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM inventory_movements
             WHERE ($1::BIGINT IS NULL OR product_id = $1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, InventoryMovement>(&query)
            .bind(product_id)
            .fetch_all(pool)
            .await
    }
}

/// Add `delta` to the stock of a product in a warehouse.
///
/// Positive deltas create the row with the default minimum when it does not
/// exist yet. Negative deltas only ever apply to a row already locked by the
/// caller.
async fn apply_delta(
    tx: &mut Transaction<'_, Postgres>,
    product_id: DbId,
    warehouse_id: DbId,
    delta: i32,
) -> Result<InventoryItem, sqlx::Error> {
    if delta < 0 {
        let query = format!(
            "UPDATE inventory_items SET quantity = quantity + $3
             WHERE product_id = $1 AND warehouse_id = $2
             RETURNING {COLUMNS}"
        );
        return sqlx::query_as::<_, InventoryItem>(&query)
            .bind(product_id)
            .bind(warehouse_id)
            .bind(delta)
            .fetch_one(&mut **tx)
            .await;
    }

    let query = format!(
        "INSERT INTO inventory_items (product_id, warehouse_id, quantity, minimum_quantity)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (product_id, warehouse_id)
         DO UPDATE SET quantity = inventory_items.quantity + EXCLUDED.quantity
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, InventoryItem>(&query)
        .bind(product_id)
        .bind(warehouse_id)
        .bind(delta)
        .bind(DEFAULT_MINIMUM_QUANTITY)
        .fetch_one(&mut **tx)
        .await
}
