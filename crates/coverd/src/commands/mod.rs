//! Subcommand handlers.

pub mod config_cmd;
pub mod reconcile;
pub mod run;
pub mod status;
pub mod trigger;

use coverd_api::{RemoteTriggerClient, TransportConfig};
use coverd_core::{ControllerConfig, ShellyDevice};

use crate::error::CliError;

/// RPC-backed device for the configured host.
fn device(config: &ControllerConfig) -> Result<ShellyDevice, CliError> {
    Ok(ShellyDevice::connect(config)?)
}

/// HTTP client for peer triggers, sharing the configured timeout.
fn remote(config: &ControllerConfig) -> Result<RemoteTriggerClient, CliError> {
    let transport = TransportConfig::default().with_timeout(config.timeout);
    Ok(RemoteTriggerClient::new(&transport)?)
}
