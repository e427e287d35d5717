//! Communication lifecycle rules: scheduling validation and status.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// A scheduled send must be at least this far in the future.
pub const MIN_SCHEDULE_LEAD_SECS: i64 = 60;

/// Communications sent within this window are flagged as "recently sent".
pub const RECENTLY_SENT_WINDOW_SECS: i64 = 120;

/// Validate the requested schedule of a communication being created or edited.
///
/// Returns the `scheduled_at` value to persist: `None` when the caller asked
/// to send immediately (any submitted time is discarded), otherwise the
/// submitted time, which must be at least [`MIN_SCHEDULE_LEAD_SECS`] ahead
/// of `now`.
pub fn validate_schedule(
    scheduled_at: Option<Timestamp>,
    send_now: bool,
    now: Timestamp,
) -> Result<Option<Timestamp>, String> {
    if send_now {
        return Ok(None);
    }
    match scheduled_at {
        Some(at) if at <= now + Duration::seconds(MIN_SCHEDULE_LEAD_SECS) => Err(
            "Scheduled send time must be at least 1 minute in the future".to_string(),
        ),
        other => Ok(other),
    }
}

/// Derived state of a communication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationStatus {
    /// Not scheduled and not sent.
    Draft,
    /// Scheduled for a future time.
    Scheduled,
    /// Scheduled time has passed; the next sweep will send it.
    Due,
    /// Already sent.
    Sent,
}

impl CommunicationStatus {
    pub fn of(scheduled_at: Option<Timestamp>, sent_at: Option<Timestamp>, now: Timestamp) -> Self {
        match (sent_at, scheduled_at) {
            (Some(_), _) => Self::Sent,
            (None, Some(at)) if at <= now => Self::Due,
            (None, Some(_)) => Self::Scheduled,
            (None, None) => Self::Draft,
        }
    }
}

/// `?status=` filter accepted by the communication list endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Draft,
    Scheduled,
    Sent,
    /// Anything not yet sent.
    Pending,
}

impl StatusFilter {
    pub fn matches(self, status: CommunicationStatus) -> bool {
        match self {
            Self::All => true,
            Self::Draft => status == CommunicationStatus::Draft,
            Self::Scheduled => matches!(
                status,
                CommunicationStatus::Scheduled | CommunicationStatus::Due
            ),
            Self::Sent => status == CommunicationStatus::Sent,
            Self::Pending => status != CommunicationStatus::Sent,
        }
    }
}

/// Whether a communication went out within [`RECENTLY_SENT_WINDOW_SECS`].
pub fn is_recently_sent(sent_at: Option<Timestamp>, now: Timestamp) -> bool {
    sent_at.is_some_and(|at| at > now - Duration::seconds(RECENTLY_SENT_WINDOW_SECS))
}
