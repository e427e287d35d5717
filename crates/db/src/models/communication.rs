//! Communication, audience segment and dispatch record models.

use ingetech_core::audience::SegmentFilter;
use ingetech_core::communication::CommunicationStatus;
use ingetech_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `communications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Communication {
    pub id: DbId,
    pub title: String,
    pub body: String,
    pub scheduled_at: Option<Timestamp>,
    pub sent_at: Option<Timestamp>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Communication {
    pub fn status(&self, now: Timestamp) -> CommunicationStatus {
        CommunicationStatus::of(self.scheduled_at, self.sent_at, now)
    }

    pub fn is_sent(&self) -> bool {
        self.sent_at.is_some()
    }
}

/// A row from the `communication_segments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommunicationSegment {
    pub id: DbId,
    pub communication_id: DbId,
    pub province_id: Option<DbId>,
    pub user_type_id: Option<DbId>,
}

impl From<&CommunicationSegment> for SegmentFilter {
    fn from(segment: &CommunicationSegment) -> Self {
        SegmentFilter {
            province_id: segment.province_id,
            user_type_id: segment.user_type_id,
        }
    }
}

/// A row from the `communication_dispatches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommunicationDispatch {
    pub id: DbId,
    pub communication_id: DbId,
    pub recipient_id: DbId,
    pub sent_at: Timestamp,
}

/// A communication as seen by one recipient: the message plus when it
/// reached them.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReceivedCommunication {
    pub id: DbId,
    pub title: String,
    pub body: String,
    pub delivered_at: Timestamp,
}

/// DTO for creating a communication.
#[derive(Debug, Deserialize)]
pub struct CreateCommunication {
    pub title: String,
    pub body: String,
    pub scheduled_at: Option<Timestamp>,
    pub created_by: Option<DbId>,
}

/// DTO for updating a communication. `scheduled_at` is written as given,
/// so `None` clears the schedule.
#[derive(Debug, Deserialize)]
pub struct UpdateCommunication {
    pub title: Option<String>,
    pub body: Option<String>,
    pub scheduled_at: Option<Timestamp>,
}
