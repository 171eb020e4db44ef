//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use coverd_config::ConfigError;
use coverd_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to device at {url}")]
    #[diagnostic(
        code(coverd::connection_failed),
        help(
            "Check that the device is powered and reachable.\n\
             URL: {url}\n\
             Try: coverd status --device <host>"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(coverd::timeout),
        help("Increase timeout with --timeout or check device responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Device ───────────────────────────────────────────────────────

    #[error("Cover {cover_id} not found on the device")]
    #[diagnostic(
        code(coverd::not_found),
        help("Check cover_id in the config file, or pass --cover-id.")
    )]
    CoverNotFound { cover_id: u32 },

    #[error("Device API error: {message}")]
    #[diagnostic(code(coverd::api_error))]
    Api { message: String },

    #[error("{failed} virtual component(s) could not be provisioned")]
    #[diagnostic(
        code(coverd::provisioning),
        help("Re-run with -v to see the failing keys and device responses.")
    )]
    Provisioning { failed: usize },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(coverd::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("No device configured")]
    #[diagnostic(
        code(coverd::no_device),
        help(
            "Pass --device <host>, set COVERD_DEVICE_URL, or add device_url to\n\
             {path}"
        )
    )]
    NoDevice { path: String },

    #[error("Config file already exists at {path}")]
    #[diagnostic(code(coverd::config_exists), help("Use --force to overwrite it."))]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(coverd::config))]
    Config(ConfigError),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::CoverNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoDevice { .. } | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingDevice => CliError::NoDevice {
                path: coverd_config::config_path().display().to_string(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::StatusUnavailable { cover_id } => CliError::CoverNotFound { cover_id },

            CoreError::InvalidTrigger { field } => CliError::Validation {
                field: field.into(),
                reason: "must not be blank".into(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Api {
                message,
                code,
                status,
            } => CliError::Api {
                message: match (code, status) {
                    (Some(code), _) => format!("{message} (rpc code {code})"),
                    (None, Some(status)) => format!("{message} (HTTP {status})"),
                    (None, None) => message,
                },
            },

            CoreError::CommandFailed { command, message } => CliError::Api {
                message: format!("{command}: {message}"),
            },

            CoreError::Provisioning { key, message } => CliError::Api {
                message: format!("{key}: {message}"),
            },

            CoreError::Internal(message) => CliError::Api { message },
        }
    }
}

impl From<coverd_api::Error> for CliError {
    fn from(err: coverd_api::Error) -> Self {
        CoreError::from(err).into()
    }
}
