//! User entity model and DTOs.

use chrono::NaiveDate;
use ingetech_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub identification: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub province_id: DbId,
    pub user_type_id: DbId,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub identification: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub province_id: DbId,
    pub user_type_id: DbId,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            identification: user.identification,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            phone: user.phone,
            address: user.address,
            birth_date: user.birth_date,
            province_id: user.province_id,
            user_type_id: user.user_type_id,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// A user selected as the recipient of a communication.
#[derive(Debug, Clone, FromRow)]
pub struct Recipient {
    pub id: DbId,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub identification: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub province_id: DbId,
    pub user_type_id: DbId,
}

/// DTO for updating an existing user. All fields are optional.
///
/// Nullable columns (`phone`, `address`, `birth_date`) are overwritten with
/// whatever is supplied, so callers pass the full desired value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub identification: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub province_id: Option<DbId>,
    pub user_type_id: Option<DbId>,
}

/// Filters for the admin user listing.
#[derive(Debug, Default, Deserialize)]
pub struct UserSearch {
    /// Case-insensitive match on name, email, username or identification.
    pub search: Option<String>,
    pub province_id: Option<DbId>,
    pub user_type_id: Option<DbId>,
}
