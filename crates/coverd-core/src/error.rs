// ── Core error types ──
//
// Domain errors from coverd-core. Consumers never see HTTP status codes
// or JSON parse failures directly: the `From<coverd_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to device at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Device request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Decision errors ──────────────────────────────────────────────
    #[error("Status of cover {cover_id} is unavailable")]
    StatusUnavailable { cover_id: u32 },

    #[error("Command {command} failed: {message}")]
    CommandFailed { command: String, message: String },

    #[error("Provisioning of {key} failed: {message}")]
    Provisioning { key: String, message: String },

    #[error("Remote trigger is missing the {field} argument")]
    InvalidTrigger { field: &'static str },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Device API error: {message}")]
    Api {
        message: String,
        /// JSON-RPC error code (if the device sent one).
        code: Option<i32>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<coverd_api::Error> for CoreError {
    fn from(err: coverd_api::Error) -> Self {
        match err {
            coverd_api::Error::Transport(ref e) => {
                if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            coverd_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            coverd_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            coverd_api::Error::ClientSetup(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason,
            },
            coverd_api::Error::Http { status, body } => CoreError::Api {
                message: body,
                code: None,
                status: Some(status),
            },
            coverd_api::Error::Rpc { code, message } => CoreError::Api {
                message,
                code: Some(code),
                status: None,
            },
            coverd_api::Error::InvalidComponentKey(key) => CoreError::Config {
                message: format!("component key '{key}' is not of the form <type>:<id>"),
            },
            coverd_api::Error::WebSocketConnect(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("WebSocket connection failed: {reason}"),
            },
            coverd_api::Error::WebSocketClosed { code, reason } => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("WebSocket closed (code {code}): {reason}"),
            },
            coverd_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
