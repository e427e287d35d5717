//! Background sweep that dispatches due scheduled communications.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::dispatcher::CommunicationDispatcher;

/// Default time between sweeps.
const DEFAULT_INTERVAL_SECS: u64 = 30;

/// Default pause after a sweep fails as a whole.
const DEFAULT_ERROR_BACKOFF_SECS: u64 = 300;

/// Timing for [`DispatchSweeper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweeperConfig {
    pub interval: Duration,
    pub error_backoff: Duration,
}

impl SweeperConfig {
    /// Load timing from environment variables.
    ///
    /// | Variable                      | Default |
    /// |-------------------------------|---------|
    /// | `DISPATCH_INTERVAL_SECS`      | `30`    |
    /// | `DISPATCH_ERROR_BACKOFF_SECS` | `300`   |
    pub fn from_env() -> Self {
        let secs = |name: &str, default: u64| {
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        };
        Self {
            interval: Duration::from_secs(secs("DISPATCH_INTERVAL_SECS", DEFAULT_INTERVAL_SECS)),
            error_backoff: Duration::from_secs(secs(
                "DISPATCH_ERROR_BACKOFF_SECS",
                DEFAULT_ERROR_BACKOFF_SECS,
            )),
        }
    }
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            error_backoff: Duration::from_secs(DEFAULT_ERROR_BACKOFF_SECS),
        }
    }
}

// ---------------------------------------------------------------------------
// DispatchSweeper
// ---------------------------------------------------------------------------

/// Polls for due communications and dispatches them one at a time.
pub struct DispatchSweeper {
    dispatcher: Arc<CommunicationDispatcher>,
    config: SweeperConfig,
}

impl DispatchSweeper {
    pub fn new(dispatcher: Arc<CommunicationDispatcher>, config: SweeperConfig) -> Self {
        Self { dispatcher, config }
    }

    /// Run the sweep loop until `cancel` fires.
    ///
    /// Sweeps once immediately, then waits `interval` between sweeps, or
    /// `error_backoff` after a sweep that failed as a whole.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            backoff_secs = self.config.error_backoff.as_secs(),
            "Dispatch sweeper started"
        );

        loop {
            let wait = self.sweep_once().await;

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Dispatch sweeper cancelled");
                    break;
                }
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }

    /// Run one sweep and return how long to wait before the next one.
    async fn sweep_once(&self) -> Duration {
        match self.dispatcher.process_due().await {
            Ok(summary) => {
                if summary.total > 0 {
                    tracing::info!(
                        processed = summary.processed,
                        total = summary.total,
                        "Dispatch sweep complete"
                    );
                }
                self.config.interval
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    backoff_secs = self.config.error_backoff.as_secs(),
                    "Dispatch sweep failed, backing off"
                );
                self.config.error_backoff
            }
        }
    }
}
