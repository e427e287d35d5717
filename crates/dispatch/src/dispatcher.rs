//! Fan-out of one communication to its audience.
//!
//! A dispatch run:
//! 1. loads the communication and stops if `sent_at` is already set,
//! 2. resolves recipients from its segments,
//! 3. claims each recipient with a unique dispatch record and sends through
//!    every enabled channel only when the claim is new,
//! 4. stamps `sent_at`.
//!
//! Claiming before sending makes delivery at-most-once per recipient even
//! when a scheduled sweep and a manual send overlap, and lets a run that
//! died halfway resume without repeating anyone.

use std::sync::Arc;

use chrono::Utc;
use ingetech_core::audience::{AudienceFilter, SegmentFilter};
use ingetech_core::channels::ChannelSelection;
use ingetech_core::types::DbId;
use ingetech_db::models::communication::Communication;
use ingetech_db::models::user::Recipient;
use ingetech_db::repositories::{CommunicationRepo, DispatchRepo, SegmentRepo, UserRepo};
use ingetech_db::DbPool;
use serde::Serialize;

use crate::channels::{Delivery, NotificationChannel, OutboundMessage};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Communication {0} not found")]
    NotFound(DbId),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Result of dispatching one communication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub communication_id: DbId,
    /// The communication had already been sent; nothing was done.
    pub already_sent: bool,
    /// Recipients the audience resolved to.
    pub recipients: usize,
    /// Recipients claimed and sent to during this run.
    pub dispatched: usize,
    /// Recipients skipped because an earlier run already reached them.
    pub skipped: usize,
    /// Individual channel sends that failed.
    pub failed_sends: usize,
}

/// Result of one pass over the due communications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    /// Communications dispatched without error.
    pub processed: usize,
    /// Communications that were due.
    pub total: usize,
}

// ---------------------------------------------------------------------------
// CommunicationDispatcher
// ---------------------------------------------------------------------------

/// Sends communications through the configured channels.
pub struct CommunicationDispatcher {
    pool: DbPool,
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl CommunicationDispatcher {
    pub fn new(pool: DbPool, channels: Vec<Arc<dyn NotificationChannel>>) -> Self {
        let dispatcher = Self { pool, channels };
        tracing::info!(channels = ?dispatcher.channel_names(), "Communication dispatcher ready");
        dispatcher
    }

    /// Names of the configured channels, in send order.
    pub fn channel_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Dispatch one communication through the selected channels.
    pub async fn dispatch(
        &self,
        communication_id: DbId,
        selection: ChannelSelection,
    ) -> Result<DispatchOutcome, DispatchError> {
        let communication = CommunicationRepo::find_by_id(&self.pool, communication_id)
            .await?
            .ok_or(DispatchError::NotFound(communication_id))?;

        let mut outcome = DispatchOutcome {
            communication_id,
            ..DispatchOutcome::default()
        };

        if communication.is_sent() {
            tracing::debug!(communication_id, "Communication already sent, skipping");
            outcome.already_sent = true;
            return Ok(outcome);
        }

        let recipients = self.resolve_recipients(communication_id).await?;
        outcome.recipients = recipients.len();
        tracing::info!(
            communication_id,
            recipients = recipients.len(),
            title = %communication.title,
            "Dispatching communication"
        );

        let message = outbound(&communication);
        let channels: Vec<&Arc<dyn NotificationChannel>> = self
            .channels
            .iter()
            .filter(|c| selection.allows(c.name()))
            .collect();

        for recipient in &recipients {
            let claimed = DispatchRepo::claim(&self.pool, communication_id, recipient.id).await?;
            if claimed.is_none() {
                outcome.skipped += 1;
                continue;
            }
            outcome.dispatched += 1;
            outcome.failed_sends += send_to(&channels, recipient, &message).await;
        }

        // A concurrent run may have stamped it first; either way it is sent.
        CommunicationRepo::mark_sent(&self.pool, communication_id, Utc::now()).await?;

        tracing::info!(
            communication_id,
            dispatched = outcome.dispatched,
            skipped = outcome.skipped,
            failed_sends = outcome.failed_sends,
            "Communication marked as sent"
        );
        Ok(outcome)
    }

    /// Dispatch every due communication through all channels.
    ///
    /// Per-item failures are logged and counted out of `processed`; only a
    /// failure to list the due items is returned as an error.
    pub async fn process_due(&self) -> Result<SweepSummary, DispatchError> {
        let due = CommunicationRepo::list_due(&self.pool, Utc::now()).await?;
        let mut summary = SweepSummary {
            processed: 0,
            total: due.len(),
        };

        if due.is_empty() {
            tracing::debug!("No due communications");
            return Ok(summary);
        }

        tracing::info!(count = due.len(), "Found due communications");
        for communication in &due {
            match self.dispatch(communication.id, ChannelSelection::all()).await {
                Ok(_) => summary.processed += 1,
                Err(e) => {
                    tracing::error!(
                        communication_id = communication.id,
                        error = %e,
                        "Failed to dispatch communication"
                    );
                }
            }
        }

        Ok(summary)
    }

    /// Preview who a communication would reach, without sending.
    pub async fn resolve_recipients(
        &self,
        communication_id: DbId,
    ) -> Result<Vec<Recipient>, DispatchError> {
        let segments = SegmentRepo::list_for_communication(&self.pool, communication_id).await?;
        let filters: Vec<SegmentFilter> = segments.iter().map(SegmentFilter::from).collect();
        let filter = AudienceFilter::from_segments(&filters);
        Ok(UserRepo::list_recipients(&self.pool, &filter).await?)
    }
}

fn outbound(communication: &Communication) -> OutboundMessage {
    OutboundMessage {
        title: communication.title.clone(),
        body: communication.body.clone(),
    }
}

/// Send to one recipient through each channel. Returns the failure count.
async fn send_to(
    channels: &[&Arc<dyn NotificationChannel>],
    recipient: &Recipient,
    message: &OutboundMessage,
) -> usize {
    let mut failures = 0;
    for channel in channels {
        match channel.send(recipient, message).await {
            Ok(Delivery::NoAddress) => {
                tracing::debug!(
                    recipient_id = recipient.id,
                    channel = channel.name(),
                    "Recipient has no address for channel"
                );
            }
            Ok(_) => {}
            Err(e) => {
                failures += 1;
                tracing::warn!(
                    recipient_id = recipient.id,
                    channel = channel.name(),
                    error = %e,
                    "Channel send failed"
                );
            }
        }
    }
    failures
}
