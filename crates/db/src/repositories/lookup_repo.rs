//! Repositories for the `user_types` and `provinces` lookup tables.

use ingetech_core::types::DbId;
use sqlx::PgPool;

use crate::models::lookup::{Province, UserType};

/// Read access to user types.
pub struct UserTypeRepo;

impl UserTypeRepo {
    /// List all user types ordered by ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<UserType>, sqlx::Error> {
        sqlx::query_as::<_, UserType>("SELECT id, name FROM user_types ORDER BY id ASC")
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserType>, sqlx::Error> {
        sqlx::query_as::<_, UserType>("SELECT id, name FROM user_types WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a user type ID by name (case-sensitive).
    pub async fn find_id_by_name(pool: &PgPool, name: &str) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM user_types WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }
}

/// Read access to provinces.
pub struct ProvinceRepo;

impl ProvinceRepo {
    /// List all provinces ordered by ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Province>, sqlx::Error> {
        sqlx::query_as::<_, Province>("SELECT id, name FROM provinces ORDER BY id ASC")
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Province>, sqlx::Error> {
        sqlx::query_as::<_, Province>("SELECT id, name FROM provinces WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
