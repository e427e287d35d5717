//! Shared fixtures for repository tests.

#![allow(dead_code)]

use ingetech_core::roles::{USER_TYPE_ADMIN, USER_TYPE_CLIENT};
use ingetech_core::types::DbId;
use ingetech_db::models::user::{CreateUser, User};
use ingetech_db::repositories::UserRepo;
use sqlx::PgPool;

pub const SAN_JOSE: DbId = 1;
pub const ALAJUELA: DbId = 2;
pub const CARTAGO: DbId = 3;

pub async fn create_user(pool: &PgPool, tag: &str, province_id: DbId, user_type_id: DbId) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            identification: format!("ID-{tag}"),
            username: tag.to_string(),
            email: format!("{tag}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
            full_name: format!("Usuario {tag}"),
            phone: Some("8888-8888".to_string()),
            address: None,
            birth_date: None,
            province_id,
            user_type_id,
        },
    )
    .await
    .unwrap()
}

pub async fn create_client(pool: &PgPool, tag: &str, province_id: DbId) -> User {
    create_user(pool, tag, province_id, USER_TYPE_CLIENT).await
}

pub async fn create_admin(pool: &PgPool, tag: &str, province_id: DbId) -> User {
    create_user(pool, tag, province_id, USER_TYPE_ADMIN).await
}
