//! Repository for the `communication_segments` table.

use ingetech_core::audience::SegmentFilter;
use ingetech_core::types::DbId;
use sqlx::PgPool;

use crate::models::communication::CommunicationSegment;

const COLUMNS: &str = "id, communication_id, province_id, user_type_id";

/// Audience segments attached to a communication.
pub struct SegmentRepo;

impl SegmentRepo {
    /// List the segments of a communication in insertion order.
    pub async fn list_for_communication(
        pool: &PgPool,
        communication_id: DbId,
    ) -> Result<Vec<CommunicationSegment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM communication_segments
             WHERE communication_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, CommunicationSegment>(&query)
            .bind(communication_id)
            .fetch_all(pool)
            .await
    }

    /// Replace every segment of a communication in one transaction.
    ///
    /// Segments naming neither a province nor a user type are skipped.
    pub async fn replace(
        pool: &PgPool,
        communication_id: DbId,
        segments: &[SegmentFilter],
    ) -> Result<Vec<CommunicationSegment>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM communication_segments WHERE communication_id = $1")
            .bind(communication_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO communication_segments (communication_id, province_id, user_type_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let mut inserted = Vec::with_capacity(segments.len());
        for segment in segments
            .iter()
            .filter(|s| s.province_id.is_some() || s.user_type_id.is_some())
        {
            let row = sqlx::query_as::<_, CommunicationSegment>(&query)
                .bind(communication_id)
                .bind(segment.province_id)
                .bind(segment.user_type_id)
                .fetch_one(&mut *tx)
                .await?;
            inserted.push(row);
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
