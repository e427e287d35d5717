//! Product entity model and DTOs.

use ingetech_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `products` table. Prices are integer cents.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub brand_id: Option<DbId>,
    pub created_by: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a product.
#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub brand_id: Option<DbId>,
    pub created_by: Option<DbId>,
}

/// DTO for updating a product. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProduct {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub brand_id: Option<DbId>,
    pub is_active: Option<bool>,
}
