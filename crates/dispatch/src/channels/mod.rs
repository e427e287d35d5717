//! Outbound notification channels.
//!
//! Each channel delivers one [`OutboundMessage`] to one [`Recipient`]. The
//! dispatcher holds a list of channels and asks each enabled one in turn.

pub mod email;
pub mod whatsapp;

use ingetech_db::models::user::Recipient;

use self::email::EmailError;
use self::whatsapp::WhatsAppError;

/// The content of a communication as handed to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub title: String,
    /// HTML for email; sent verbatim below the bold title on WhatsApp.
    pub body: String,
}

/// What a channel did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the external provider.
    Sent,
    /// Provider not configured; logged instead of sent.
    Simulated,
    /// Recipient has no address for this channel.
    NoAddress,
}

/// Error type unifying every channel's failures.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    WhatsApp(#[from] WhatsAppError),
}

/// A delivery channel for communications.
#[async_trait::async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Channel name, matching the names in [`ingetech_core::channels`].
    fn name(&self) -> &'static str;

    async fn send(
        &self,
        recipient: &Recipient,
        message: &OutboundMessage,
    ) -> Result<Delivery, ChannelError>;
}
