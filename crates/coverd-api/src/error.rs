use thiserror::Error;

/// JSON-RPC error code the device uses for "component/argument not found".
pub const RPC_NOT_FOUND: i32 = -105;

/// Top-level error type for the `coverd-api` crate.
///
/// Covers every failure mode across the device surfaces: HTTP RPC,
/// remote GET triggers, and the WebSocket notification stream.
/// `coverd-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request exceeded the client's configured timeout.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// HTTP client could not be constructed.
    #[error("Client setup failed: {0}")]
    ClientSetup(String),

    /// Non-success HTTP status without a parseable RPC error body.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── RPC ─────────────────────────────────────────────────────────
    /// Structured JSON-RPC error frame from the device.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i32, message: String },

    /// Component key is not of the form `<type>:<id>`.
    #[error("Invalid component key: {0}")]
    InvalidComponentKey(String),

    // ── WebSocket ───────────────────────────────────────────────────
    /// WebSocket connection failed.
    #[error("WebSocket connection failed: {0}")]
    WebSocketConnect(String),

    /// WebSocket closed with a non-normal close code.
    #[error("WebSocket closed (code {code}): {reason}")]
    WebSocketClosed { code: u16, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the device reported the target as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Rpc { code, .. } => *code == RPC_NOT_FOUND,
            Self::Http { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}
