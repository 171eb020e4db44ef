//! Configuration for the coverd daemon.
//!
//! One TOML file (plus `COVERD_*` environment overrides) describing the
//! device, the controlled cover, the virtual components to provision, and
//! the routing table. Translates into `coverd_core::ControllerConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use coverd_core::{
    ControllerConfig, EventAction, EventPattern, RouteAction, VirtualComponent,
};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no device URL configured (set device_url or pass --device)")]
    MissingDevice,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Device base URL or bare host (e.g., "192.168.1.40").
    pub device_url: Option<String>,

    /// Cover component id on the device. Defaults to the first cover, `0`.
    #[serde(default)]
    pub cover_id: u32,

    /// Log every inbound event at info level.
    #[serde(default)]
    pub debug: bool,

    /// Delay between provisioning and subscribing to events.
    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,

    /// Per-request HTTP timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// `src` identity announced on the RPC channel.
    #[serde(default = "default_client_src")]
    pub client_src: String,

    #[serde(default)]
    pub virtual_components: Vec<VirtualComponent>,

    /// Routing table, first match wins.
    #[serde(default)]
    pub event_actions: Vec<EventAction>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_url: None,
            cover_id: 0,
            debug: false,
            startup_delay_ms: default_startup_delay_ms(),
            timeout_secs: default_timeout_secs(),
            client_src: default_client_src(),
            virtual_components: default_virtual_components(),
            event_actions: default_event_actions(),
        }
    }
}

fn default_startup_delay_ms() -> u64 {
    2000
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_client_src() -> String {
    "coverd".into()
}

/// Four virtual buttons, one per cover action.
pub fn default_virtual_components() -> Vec<VirtualComponent> {
    vec![
        VirtualComponent::new("button:200", "Cover Open"),
        VirtualComponent::new("button:201", "Cover Close"),
        VirtualComponent::new("button:202", "Slat Open"),
        VirtualComponent::new("button:203", "Slat Close"),
    ]
}

/// Virtual buttons, one four-button BTHome remote, and one BTHome sensor.
pub fn default_event_actions() -> Vec<EventAction> {
    let push = || EventPattern::exact("single_push");
    vec![
        EventAction::new("button:200", push(), RouteAction::Open),
        EventAction::new("button:201", push(), RouteAction::Close),
        EventAction::new("button:202", push(), RouteAction::SlatOpen),
        EventAction::new("button:203", push(), RouteAction::SlatClose),
        EventAction::new("bthomedevice:200", EventPattern::Any, RouteAction::ByButtonIndex),
        EventAction::new("bthomesensor:200", push(), RouteAction::Open),
        EventAction::new(
            "bthomesensor:200",
            EventPattern::exact("double_push"),
            RouteAction::Close,
        ),
    ]
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "coverd").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("coverd");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load defaults, then `path` (if it exists), then `COVERD_*` variables.
///
/// Arrays in the file replace the default table rather than extending it.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("COVERD_").ignore(&["config"]));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_toml(cfg)?)?;
    Ok(())
}

pub fn to_toml(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

// ── Validation & translation ────────────────────────────────────────

/// Parse a device address. A bare host gets an `http://` scheme.
pub fn parse_device_url(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::MissingDevice);
    }
    let candidate = if raw.contains("://") {
        raw.to_owned()
    } else {
        format!("http://{raw}")
    };
    let url = Url::parse(&candidate)
        .map_err(|e| invalid("device_url", format!("'{raw}' is not a valid URL: {e}")))?;
    if url.host_str().is_none() {
        return Err(invalid("device_url", format!("'{raw}' has no host")));
    }
    Ok(url)
}

fn validate_key(key: &str) -> Result<(), ConfigError> {
    let valid = key
        .split_once(':')
        .is_some_and(|(kind, id)| !kind.is_empty() && id.parse::<u32>().is_ok());
    if valid {
        Ok(())
    } else {
        Err(invalid(
            "virtual_components",
            format!("key '{key}' is not of the form <type>:<id>"),
        ))
    }
}

impl Config {
    /// Check everything that can be checked without talking to the device.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let device = self.device_url.as_deref().ok_or(ConfigError::MissingDevice)?;
        parse_device_url(device)?;

        for component in &self.virtual_components {
            validate_key(&component.key)?;
            if component.name.trim().is_empty() {
                return Err(invalid(
                    "virtual_components",
                    format!("component '{}' has an empty name", component.key),
                ));
            }
        }

        for (i, entry) in self.event_actions.iter().enumerate() {
            if entry.source.trim().is_empty() {
                return Err(invalid("event_actions", format!("entry {i} has an empty source")));
            }
            if entry.event == EventPattern::exact("") {
                return Err(invalid("event_actions", format!("entry {i} has an empty event")));
            }
            if let RouteAction::RemoteTrigger {
                device,
                input,
                event,
            } = &entry.action
            {
                if [device, input, event].iter().any(|s| s.trim().is_empty()) {
                    return Err(invalid(
                        "event_actions",
                        format!("entry {i}: remote_trigger needs device, input and event"),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Validate and build the runtime configuration.
    pub fn to_controller_config(&self) -> Result<ControllerConfig, ConfigError> {
        self.validate()?;
        let device = self.device_url.as_deref().ok_or(ConfigError::MissingDevice)?;
        let mut config = ControllerConfig::new(parse_device_url(device)?, self.cover_id)
            .with_virtual_components(self.virtual_components.clone())
            .with_event_actions(self.event_actions.clone())
            .with_debug(self.debug)
            .with_startup_delay(Duration::from_millis(self.startup_delay_ms));
        config.timeout = Duration::from_secs(self.timeout_secs);
        config.client_src.clone_from(&self.client_src);
        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bare_host_gets_http_scheme() {
        let url = parse_device_url("192.168.1.40").unwrap();
        assert_eq!(url.as_str(), "http://192.168.1.40/");

        let url = parse_device_url("https://shutter.lan:8443").unwrap();
        assert_eq!(url.as_str(), "https://shutter.lan:8443/");

        assert!(matches!(parse_device_url("  "), Err(ConfigError::MissingDevice)));
    }

    #[test]
    fn default_table_is_valid_once_device_is_set() {
        let cfg = Config {
            device_url: Some("10.0.0.2".into()),
            ..Config::default()
        };
        let controller = cfg.to_controller_config().unwrap();
        assert_eq!(controller.virtual_components.len(), 4);
        assert_eq!(controller.event_actions.len(), 7);
        assert_eq!(controller.startup_delay, Duration::from_secs(2));
    }

    #[test]
    fn missing_device_is_rejected() {
        let err = Config::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingDevice));
    }

    #[test]
    fn malformed_component_key_is_rejected() {
        let cfg = Config {
            device_url: Some("10.0.0.2".into()),
            virtual_components: vec![VirtualComponent::new("button", "Open")],
            ..Config::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("<type>:<id>"), "{err}");
    }

    #[test]
    fn blank_remote_trigger_is_rejected() {
        let cfg = Config {
            device_url: Some("10.0.0.2".into()),
            event_actions: vec![EventAction::new(
                "button:203",
                EventPattern::Any,
                RouteAction::RemoteTrigger {
                    device: "10.0.0.9".into(),
                    input: String::new(),
                    event: "single_push".into(),
                },
            )],
            ..Config::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation { .. })));
    }
}
