//! Repository for the `warehouses` table.

use ingetech_core::types::DbId;
use sqlx::PgPool;

use crate::models::warehouse::{CreateWarehouse, Warehouse};

const COLUMNS: &str = "id, name, location, created_at, updated_at";

pub struct WarehouseRepo;

impl WarehouseRepo {
    pub async fn create(pool: &PgPool, input: &CreateWarehouse) -> Result<Warehouse, sqlx::Error> {
        let query = format!(
            "INSERT INTO warehouses (name, location) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Warehouse>(&query)
            .bind(&input.name)
            .bind(&input.location)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Warehouse>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM warehouses WHERE id = $1");
        sqlx::query_as::<_, Warehouse>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Warehouse>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM warehouses ORDER BY name ASC");
        sqlx::query_as::<_, Warehouse>(&query).fetch_all(pool).await
    }
}
