// Shared transport configuration for building reqwest::Client instances.
//
// The device RPC client and the remote trigger client share timeout
// settings through this module, and report timeouts against them.

use std::time::Duration;

use crate::error::Error;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("coverd/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::ClientSetup(format!("failed to build HTTP client: {e}")))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Wrap a reqwest failure. When the client's timeout is known, a timeout
/// becomes [`Error::Timeout`] carrying it.
pub(crate) fn send_error(err: reqwest::Error, timeout: Option<Duration>) -> Error {
    match timeout {
        Some(limit) if err.is_timeout() => Error::Timeout {
            timeout_secs: limit.as_secs(),
        },
        _ => Error::Transport(err),
    }
}
