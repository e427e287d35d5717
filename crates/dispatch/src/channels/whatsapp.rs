//! WhatsApp Business Cloud API delivery.
//!
//! Messages are POSTed to `{api_url}{phone_number_id}/messages` with bearer
//! authentication. When any of the three settings is missing the channel
//! runs in simulation mode: the send is logged and reported as delivered.

use std::time::Duration;

use ingetech_core::channels::CHANNEL_WHATSAPP;
use ingetech_core::phone::normalize_for_whatsapp;
use ingetech_db::models::user::Recipient;
use serde::Serialize;

use super::{ChannelError, Delivery, NotificationChannel, OutboundMessage};

/// HTTP request timeout for a single send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for WhatsApp delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WhatsAppError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("WhatsApp API returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

// ---------------------------------------------------------------------------
// WhatsAppConfig
// ---------------------------------------------------------------------------

/// Credentials for the WhatsApp Cloud API.
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    /// Base URL including the version segment and trailing slash,
    /// e.g. `https://graph.facebook.com/v17.0/`.
    pub api_url: String,
    pub phone_number_id: String,
    pub access_token: String,
}

impl WhatsAppConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` unless all of `WHATSAPP_API_URL`,
    /// `WHATSAPP_PHONE_NUMBER_ID` and `WHATSAPP_ACCESS_TOKEN` are set and
    /// non-empty.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Some(Self {
            api_url: var("WHATSAPP_API_URL")?,
            phone_number_id: var("WHATSAPP_PHONE_NUMBER_ID")?,
            access_token: var("WHATSAPP_ACCESS_TOKEN")?,
        })
    }

    /// The messages endpoint for the configured phone number.
    pub fn messages_url(&self) -> String {
        format!("{}{}/messages", self.api_url, self.phone_number_id)
    }
}

// ---------------------------------------------------------------------------
// Request payload
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct TextMessageRequest<'a> {
    messaging_product: &'static str,
    recipient_type: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextBody,
}

#[derive(Debug, Serialize)]
struct TextBody {
    body: String,
}

/// Text sent to WhatsApp: bold title, blank line, body.
pub fn format_text(message: &OutboundMessage) -> String {
    format!("*{}*\n\n{}", message.title, message.body)
}

// ---------------------------------------------------------------------------
// WhatsAppChannel
// ---------------------------------------------------------------------------

/// Sends communications as WhatsApp text messages.
pub struct WhatsAppChannel {
    client: reqwest::Client,
    config: Option<WhatsAppConfig>,
}

impl WhatsAppChannel {
    /// Create a channel. `None` puts it in simulation mode.
    pub fn new(config: Option<WhatsAppConfig>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    pub fn is_simulated(&self) -> bool {
        self.config.is_none()
    }

    async fn post(
        &self,
        config: &WhatsAppConfig,
        to: &str,
        text: String,
    ) -> Result<(), WhatsAppError> {
        let payload = TextMessageRequest {
            messaging_product: "whatsapp",
            recipient_type: "individual",
            to,
            kind: "text",
            text: TextBody { body: text },
        };

        let response = self
            .client
            .post(config.messages_url())
            .bearer_auth(&config.access_token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WhatsAppError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl NotificationChannel for WhatsAppChannel {
    fn name(&self) -> &'static str {
        CHANNEL_WHATSAPP
    }

    async fn send(
        &self,
        recipient: &Recipient,
        message: &OutboundMessage,
    ) -> Result<Delivery, ChannelError> {
        let Some(phone) = recipient.phone.as_deref().filter(|p| !p.trim().is_empty()) else {
            return Ok(Delivery::NoAddress);
        };
        let to = normalize_for_whatsapp(phone);

        let Some(config) = &self.config else {
            tracing::info!(to = %to, "WhatsApp not configured, simulated send");
            return Ok(Delivery::Simulated);
        };

        self.post(config, &to, format_text(message)).await?;
        tracing::info!(to = %to, "WhatsApp message sent");
        Ok(Delivery::Sent)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
