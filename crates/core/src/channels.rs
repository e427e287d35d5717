//! Well-known notification channel names and per-send channel selection.

use serde::{Deserialize, Serialize};

/// Email delivered via SMTP.
pub const CHANNEL_EMAIL: &str = "email";

/// Text message delivered via the WhatsApp Business Cloud API.
pub const CHANNEL_WHATSAPP: &str = "whatsapp";

/// Which channels a dispatch run may use.
///
/// Scheduled sweeps always use [`ChannelSelection::all`]; manual sends let
/// the administrator switch channels off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSelection {
    #[serde(default = "enabled")]
    pub email: bool,
    #[serde(default = "enabled")]
    pub whatsapp: bool,
}

fn enabled() -> bool {
    true
}

impl ChannelSelection {
    pub const fn all() -> Self {
        Self {
            email: true,
            whatsapp: true,
        }
    }

    /// Whether the named channel is enabled. Unknown names are disabled.
    pub fn allows(&self, channel: &str) -> bool {
        match channel {
            CHANNEL_EMAIL => self.email,
            CHANNEL_WHATSAPP => self.whatsapp,
            _ => false,
        }
    }
}

impl Default for ChannelSelection {
    fn default() -> Self {
        Self::all()
    }
}
