//! Client configuration

use crate::error::{Error, Result};
use std::env;
use std::time::Duration;

const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;
const DEFAULT_SPAM_THRESHOLD: u32 = 0;

/// Tunables of the mailbox state machine.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Delay between one inbox poll completing and the next starting.
    pub poll_interval: Duration,
    /// Spam indicator values strictly above this route a message to
    /// the Spam folder during inbox ingestion.
    pub spam_threshold: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            spam_threshold: DEFAULT_SPAM_THRESHOLD,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads from `.env` if present. All variables are optional:
    /// - `WEBMAIL_POLL_INTERVAL_MS` (default: `5000`)
    /// - `WEBMAIL_SPAM_THRESHOLD` (default: `0`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a variable is set but not parseable.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let poll_ms = match env::var("WEBMAIL_POLL_INTERVAL_MS") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| Error::Config(format!("Invalid WEBMAIL_POLL_INTERVAL_MS: {e}")))?,
            Err(_) => DEFAULT_POLL_INTERVAL_MS,
        };
        let spam_threshold = match env::var("WEBMAIL_SPAM_THRESHOLD") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| Error::Config(format!("Invalid WEBMAIL_SPAM_THRESHOLD: {e}")))?,
            Err(_) => DEFAULT_SPAM_THRESHOLD,
        };

        Ok(Self {
            poll_interval: Duration::from_millis(poll_ms),
            spam_threshold,
        })
    }
}
