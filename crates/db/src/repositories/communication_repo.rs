//! Repository for the `communications` table.

use ingetech_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::communication::{Communication, CreateCommunication, UpdateCommunication};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, body, scheduled_at, sent_at, created_by, created_at, updated_at";

/// Provides CRUD and scheduling operations for communications.
pub struct CommunicationRepo;

impl CommunicationRepo {
    /// Insert a new communication, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCommunication,
    ) -> Result<Communication, sqlx::Error> {
        let query = format!(
            "INSERT INTO communications (title, body, scheduled_at, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Communication>(&query)
            .bind(&input.title)
            .bind(&input.body)
            .bind(input.scheduled_at)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a communication by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Communication>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM communications WHERE id = $1");
        sqlx::query_as::<_, Communication>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all communications, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Communication>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM communications ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Communication>(&query)
            .fetch_all(pool)
            .await
    }

    /// Unsent communications whose schedule has arrived, oldest first.
    pub async fn list_due(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<Communication>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM communications
             WHERE scheduled_at IS NOT NULL AND scheduled_at <= $1 AND sent_at IS NULL
             ORDER BY scheduled_at ASC, id ASC"
        );
        sqlx::query_as::<_, Communication>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// Update an unsent communication.
    ///
    /// Returns `None` if the row does not exist or has already been sent.
    pub async fn update_unsent(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCommunication,
    ) -> Result<Option<Communication>, sqlx::Error> {
        let query = format!(
            "UPDATE communications SET
                title = COALESCE($2, title),
                body = COALESCE($3, body),
                scheduled_at = $4
             WHERE id = $1 AND sent_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Communication>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.body)
            .bind(input.scheduled_at)
            .fetch_optional(pool)
            .await
    }

    /// Clear the schedule of an unsent communication.
    ///
    /// Returns `true` if a row was updated.
    pub async fn cancel_schedule(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE communications SET scheduled_at = NULL
             WHERE id = $1 AND sent_at IS NULL AND scheduled_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stamp `sent_at` once. Returns `false` if it was already stamped.
    pub async fn mark_sent(pool: &PgPool, id: DbId, sent_at: Timestamp) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE communications SET sent_at = $2 WHERE id = $1 AND sent_at IS NULL",
        )
        .bind(id)
        .bind(sent_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a communication with its segments and dispatch records.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM communications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
