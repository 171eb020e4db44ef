//! Config resolution: file + environment, then CLI flag overrides.

use std::path::PathBuf;

use coverd_config::Config;
use coverd_core::ControllerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The file `--config` points at, or the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(coverd_config::config_path)
}

/// Load the config file and apply global flag overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = coverd_config::load_config_from(&config_file(global))?;

    if let Some(ref device) = global.device {
        cfg.device_url = Some(device.clone());
    }
    if let Some(cover_id) = global.cover_id {
        cfg.cover_id = cover_id;
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout_secs = timeout;
    }
    Ok(cfg)
}

/// Load, override, validate, and translate into the runtime config.
pub fn controller_config(global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let cfg = load(global)?;
    cfg.to_controller_config().map_err(|e| match e {
        coverd_config::ConfigError::MissingDevice => CliError::NoDevice {
            path: config_file(global).display().to_string(),
        },
        other => other.into(),
    })
}
