//! Scheduled dispatch of due communications.
//!
//! Builds the notification channels from the environment and runs the
//! [`DispatchSweeper`] loop until shutdown.

use std::sync::Arc;

use ingetech_dispatch::{
    CommunicationDispatcher, DispatchSweeper, EmailConfig, EmailSender, NotificationChannel,
    SweeperConfig, WhatsAppChannel, WhatsAppConfig,
};
use tokio_util::sync::CancellationToken;

/// Build the SMTP sender, or `None` when `SMTP_HOST` is not set.
///
/// # Panics
///
/// Panics if SMTP is configured but the transport cannot be built.
pub fn mailer_from_env() -> Option<Arc<EmailSender>> {
    match EmailConfig::from_env() {
        Some(config) => {
            let sender = EmailSender::new(&config).expect("Invalid SMTP configuration");
            tracing::info!(host = %config.smtp_host, port = config.smtp_port, "SMTP email enabled");
            Some(Arc::new(sender))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, email delivery disabled");
            None
        }
    }
}

/// Channels used by the dispatcher: email when configured, and WhatsApp
/// (simulated when its credentials are missing).
pub fn notification_channels(
    mailer: Option<&Arc<EmailSender>>,
) -> Vec<Arc<dyn NotificationChannel>> {
    let mut channels: Vec<Arc<dyn NotificationChannel>> = Vec::new();
    if let Some(mailer) = mailer {
        channels.push(Arc::clone(mailer) as Arc<dyn NotificationChannel>);
    }

    let whatsapp = WhatsAppChannel::new(WhatsAppConfig::from_env());
    if whatsapp.is_simulated() {
        tracing::warn!("WhatsApp credentials missing, messages will be simulated");
    }
    channels.push(Arc::new(whatsapp));
    channels
}

/// Run the dispatch sweep loop until `cancel` is triggered.
pub async fn run(
    dispatcher: Arc<CommunicationDispatcher>,
    config: SweeperConfig,
    cancel: CancellationToken,
) {
    DispatchSweeper::new(dispatcher, config).run(cancel).await;
    tracing::info!("Dispatch sweep task stopped");
}
