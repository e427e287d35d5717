//! Repository for the `password_reset_tokens` table.

use ingetech_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::password_reset::PasswordResetToken;

const COLUMNS: &str = "id, user_id, token_hash, expires_at, used_at, created_at";

/// Stores hashed, single-use password reset tokens.
pub struct PasswordResetRepo;

impl PasswordResetRepo {
    /// Store a new token hash for a user.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<PasswordResetToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO password_reset_tokens (user_id, token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PasswordResetToken>(&query)
            .bind(user_id)
            .bind(token_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Mark an unused, unexpired token as used and return it.
    ///
    /// Returns `None` if the hash is unknown, expired, or already consumed.
    /// The single UPDATE makes concurrent consumption of one token impossible.
    pub async fn consume(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<PasswordResetToken>, sqlx::Error> {
        let query = format!(
            "UPDATE password_reset_tokens SET used_at = NOW()
             WHERE token_hash = $1 AND used_at IS NULL AND expires_at > NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PasswordResetToken>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Invalidate every outstanding token for a user.
    pub async fn invalidate_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE password_reset_tokens SET used_at = NOW()
             WHERE user_id = $1 AND used_at IS NULL",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
