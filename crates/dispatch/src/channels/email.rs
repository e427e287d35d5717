//! SMTP email.
//!
//! [`EmailSender`] is the email [`NotificationChannel`] for communications
//! and also sends account mail (reset links, temporary passwords, direct
//! messages). Bodies are HTML.

use ingetech_core::channels::CHANNEL_EMAIL;
use ingetech_db::models::user::Recipient;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{ChannelError, Delivery, NotificationChannel, OutboundMessage};

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// Sender or recipient is not a valid mailbox.
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Could not build email: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "IngeTech <noreply@ingetech.local>";

/// SMTP relay settings. The relay is reached with STARTTLS.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// `From` mailbox, with or without a display name.
    pub from_address: String,
    /// Credentials are only used when both are set.
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Read SMTP settings, or `None` when `SMTP_HOST` is unset or blank.
    ///
    /// | Variable        | Default                             |
    /// |-----------------|-------------------------------------|
    /// | `SMTP_HOST`     | none, email disabled                |
    /// | `SMTP_PORT`     | `587`                               |
    /// | `SMTP_FROM`     | `IngeTech <noreply@ingetech.local>` |
    /// | `SMTP_USER`     | none                                |
    /// | `SMTP_PASSWORD` | none                                |
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Some(Self {
            smtp_host: var("SMTP_HOST")?,
            smtp_port: var("SMTP_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: var("SMTP_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: var("SMTP_USER"),
            smtp_password: var("SMTP_PASSWORD"),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailSender
// ---------------------------------------------------------------------------

/// Sends HTML email through one pooled SMTP transport.
pub struct EmailSender {
    from_address: String,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailSender {
    /// Build the SMTP transport. No connection is opened until the first send.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            from_address: config.from_address.clone(),
            mailer: transport_builder.build(),
        })
    }

    /// Send one HTML email to a bare address.
    pub async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<(), EmailError> {
        self.deliver(to.parse()?, subject, html).await
    }

    async fn deliver(&self, to: Mailbox, subject: &str, html: &str) -> Result<(), EmailError> {
        let address = to.email.to_string();
        let email = Message::builder()
            .from(self.from_address.parse()?)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.mailer.send(email).await?;

        tracing::info!(to = %address, subject, "Email sent");
        Ok(())
    }
}

#[async_trait::async_trait]
impl NotificationChannel for EmailSender {
    fn name(&self) -> &'static str {
        CHANNEL_EMAIL
    }

    /// Subject is the communication title; the body is sent as HTML.
    async fn send(
        &self,
        recipient: &Recipient,
        message: &OutboundMessage,
    ) -> Result<Delivery, ChannelError> {
        if recipient.email.trim().is_empty() {
            return Ok(Delivery::NoAddress);
        }
        self.deliver(recipient_mailbox(recipient)?, &message.title, &message.body)
            .await?;
        Ok(Delivery::Sent)
    }
}

/// `"Full Name" <email>`, or the bare address when the name is blank.
fn recipient_mailbox(recipient: &Recipient) -> Result<Mailbox, EmailError> {
    let name = recipient.full_name.trim();
    let name = (!name.is_empty()).then(|| name.to_string());
    Ok(Mailbox::new(name, recipient.email.trim().parse()?))
}

/// Escape text for inclusion in an HTML body.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
