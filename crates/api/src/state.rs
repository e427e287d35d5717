use std::sync::Arc;

use ingetech_dispatch::{CommunicationDispatcher, EmailSender};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ingetech_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Communication fan-out shared with the background sweeper.
    pub dispatcher: Arc<CommunicationDispatcher>,
    /// SMTP sender for account mail. `None` when SMTP is not configured.
    pub mailer: Option<Arc<EmailSender>>,
}
