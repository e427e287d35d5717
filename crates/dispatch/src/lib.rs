//! Communication delivery for IngeTech.
//!
//! - [`channels`]: outbound adapters (SMTP email, WhatsApp Cloud API) behind
//!   the [`NotificationChannel`] trait.
//! - [`CommunicationDispatcher`]: resolves a communication's audience and
//!   fans it out to each recipient exactly once.
//! - [`DispatchSweeper`]: background loop that dispatches due scheduled
//!   communications.

pub mod channels;
pub mod dispatcher;
pub mod sweeper;

pub use channels::email::{EmailConfig, EmailError, EmailSender};
pub use channels::whatsapp::{WhatsAppChannel, WhatsAppConfig, WhatsAppError};
pub use channels::{ChannelError, Delivery, NotificationChannel, OutboundMessage};
pub use dispatcher::{CommunicationDispatcher, DispatchError, DispatchOutcome, SweepSummary};
pub use sweeper::{DispatchSweeper, SweeperConfig};
