//! Repository for the `stock_alerts` table.

use ingetech_core::types::DbId;
use sqlx::PgPool;

use crate::models::inventory::StockAlert;

pub(crate) const COLUMNS: &str =
    "id, inventory_item_id, quantity, minimum_quantity, is_processed, processed_at, created_at";

/// Low-stock alerts. Processing an alert never touches stock.
pub struct StockAlertRepo;

impl StockAlertRepo {
    /// List alerts, open ones first, newest first within each group.
    pub async fn list(pool: &PgPool, only_open: bool) -> Result<Vec<StockAlert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM stock_alerts
             WHERE NOT is_processed OR NOT $1
             ORDER BY is_processed ASC, created_at DESC, id DESC"
        );
        sqlx::query_as::<_, StockAlert>(&query)
            .bind(only_open)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<StockAlert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stock_alerts WHERE id = $1");
        sqlx::query_as::<_, StockAlert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Mark an open alert as processed.
    ///
    /// Returns `None` if the alert does not exist or was already processed.
    pub async fn mark_processed(pool: &PgPool, id: DbId) -> Result<Option<StockAlert>, sqlx::Error> {
        let query = format!(
            "UPDATE stock_alerts SET is_processed = true, processed_at = NOW()
             WHERE id = $1 AND NOT is_processed
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StockAlert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
