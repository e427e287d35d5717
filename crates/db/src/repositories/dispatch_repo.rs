//! Repository for the `communication_dispatches` table.

use ingetech_core::types::DbId;
use sqlx::PgPool;

use crate::models::communication::{CommunicationDispatch, ReceivedCommunication};

const COLUMNS: &str = "id, communication_id, recipient_id, sent_at";

/// Proof-of-send records, one per (communication, recipient).
pub struct DispatchRepo;

impl DispatchRepo {
    /// Claim a recipient for a communication.
    ///
    /// Uses `INSERT ... ON CONFLICT DO NOTHING` against
    /// `uq_communication_dispatches_recipient`. Returns the new record when
    /// the claim succeeded, or `None` when the recipient was already claimed
    /// by an earlier or concurrent dispatch.
    pub async fn claim(
        pool: &PgPool,
        communication_id: DbId,
        recipient_id: DbId,
    ) -> Result<Option<CommunicationDispatch>, sqlx::Error> {
        let query = format!(
            "INSERT INTO communication_dispatches (communication_id, recipient_id)
             VALUES ($1, $2)
             ON CONFLICT (communication_id, recipient_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CommunicationDispatch>(&query)
            .bind(communication_id)
            .bind(recipient_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a communication has been dispatched to a recipient.
    pub async fn exists(
        pool: &PgPool,
        communication_id: DbId,
        recipient_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM communication_dispatches
                WHERE communication_id = $1 AND recipient_id = $2
             )",
        )
        .bind(communication_id)
        .bind(recipient_id)
        .fetch_one(pool)
        .await
    }

    /// Number of recipients a communication reached.
    pub async fn count_for_communication(
        pool: &PgPool,
        communication_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM communication_dispatches WHERE communication_id = $1",
        )
        .bind(communication_id)
        .fetch_one(pool)
        .await
    }

    /// Communications delivered to a user, newest delivery first.
    pub async fn list_for_recipient(
        pool: &PgPool,
        recipient_id: DbId,
    ) -> Result<Vec<ReceivedCommunication>, sqlx::Error> {
        sqlx::query_as::<_, ReceivedCommunication>(
            "SELECT c.id, c.title, c.body, d.sent_at AS delivered_at
             FROM communication_dispatches d
             JOIN communications c ON c.id = d.communication_id
             WHERE d.recipient_id = $1
             ORDER BY d.sent_at DESC, c.id DESC",
        )
        .bind(recipient_id)
        .fetch_all(pool)
        .await
    }
}
