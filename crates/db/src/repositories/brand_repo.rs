//! Repository for the `brands` table.

use ingetech_core::types::DbId;
use sqlx::PgPool;

use crate::models::brand::{Brand, CreateBrand};

const COLUMNS: &str = "id, name, description, created_at, updated_at";

pub struct BrandRepo;

impl BrandRepo {
    pub async fn create(pool: &PgPool, input: &CreateBrand) -> Result<Brand, sqlx::Error> {
        let query = format!(
            "INSERT INTO brands (name, description) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brand>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Brand>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brands WHERE id = $1");
        sqlx::query_as::<_, Brand>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List brands alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Brand>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brands ORDER BY name ASC");
        sqlx::query_as::<_, Brand>(&query).fetch_all(pool).await
    }
}
