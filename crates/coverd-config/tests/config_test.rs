#![allow(clippy::unwrap_used)]
// Layered loading: defaults → TOML file → COVERD_* environment.

use std::path::Path;

use coverd_config::{Config, load_config_from, save_config};
use coverd_core::{EventPattern, RouteAction};
use figment::Jail;
use pretty_assertions::assert_eq;

#[test]
fn missing_file_yields_defaults() {
    Jail::expect_with(|_jail| {
        let cfg = load_config_from(Path::new("absent.toml")).map_err(|e| e.to_string())?;
        assert_eq!(cfg, Config::default());
        Ok(())
    });
}

#[test]
fn file_overrides_defaults_and_replaces_table() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
                device_url = "http://10.0.0.2"
                cover_id = 1
                debug = true

                [[virtual_components]]
                key = "button:210"
                name = "Awning"

                [[event_actions]]
                source = "button:210"
                event = "ALL"
                action = "close"
            "#,
        )?;

        let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
        assert_eq!(cfg.device_url.as_deref(), Some("http://10.0.0.2"));
        assert_eq!(cfg.cover_id, 1);
        assert!(cfg.debug);
        assert_eq!(cfg.startup_delay_ms, 2000);
        assert_eq!(cfg.virtual_components.len(), 1);
        assert_eq!(cfg.event_actions.len(), 1);
        assert_eq!(cfg.event_actions[0].event, EventPattern::Any);
        assert_eq!(cfg.event_actions[0].action, RouteAction::Close);
        Ok(())
    });
}

#[test]
fn omitted_cover_id_targets_first_cover() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", r#"device_url = "10.0.0.2""#)?;

        let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
        assert_eq!(cfg.cover_id, 0);

        let controller = cfg.to_controller_config().map_err(|e| e.to_string())?;
        assert_eq!(controller.cover_id, 0);
        Ok(())
    });
}

#[test]
fn environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
                device_url = "http://10.0.0.2"
                cover_id = 1
            "#,
        )?;
        jail.set_env("COVERD_COVER_ID", "4");
        jail.set_env("COVERD_DEVICE_URL", "shutter.lan");

        let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
        assert_eq!(cfg.cover_id, 4);

        let controller = cfg.to_controller_config().map_err(|e| e.to_string())?;
        assert_eq!(controller.device_url.as_str(), "http://shutter.lan/");
        assert_eq!(controller.cover_id, 4);
        Ok(())
    });
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let cfg = Config {
        device_url: Some("http://10.0.0.7".into()),
        cover_id: 2,
        ..Config::default()
    };
    save_config(&cfg, &path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("by_button_index"), "{raw}");

    let parsed: Config = toml::from_str(&raw).unwrap();
    assert_eq!(parsed, cfg);
}
