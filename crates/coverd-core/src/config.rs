// ── Runtime controller configuration ──
//
// These types describe *what* the controller drives and *how* it routes
// events. They never touch disk: coverd-config builds a `ControllerConfig`
// and hands it in. Immutable once constructed.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::{EventPattern, RouteAction};

/// Default one-shot delay between provisioning and subscribing to events.
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_secs(2);

/// Declared identity of a virtual input that must exist on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualComponent {
    /// `<type>:<id>`, e.g. `button:200`.
    pub key: String,
    pub name: String,
}

impl VirtualComponent {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

/// One routing table entry: `(source, event) -> action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAction {
    pub source: String,
    pub event: EventPattern,
    pub action: RouteAction,
}

impl EventAction {
    pub fn new(source: impl Into<String>, event: EventPattern, action: RouteAction) -> Self {
        Self {
            source: source.into(),
            event,
            action,
        }
    }

    pub fn matches(&self, source: &str, event: &str) -> bool {
        self.source == source && self.event.matches(event)
    }
}

/// Configuration for one controller instance driving exactly one cover.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Device base URL (e.g., `http://192.168.1.40`).
    pub device_url: Url,
    /// Cover component id on the device.
    pub cover_id: u32,
    /// Virtual components reconciled at startup, in order.
    pub virtual_components: Vec<VirtualComponent>,
    /// Routing table, first match wins.
    pub event_actions: Vec<EventAction>,
    /// Emit one diagnostic line per inbound event. Never changes behavior.
    pub debug: bool,
    /// One-shot delay between provisioning and subscribing.
    pub startup_delay: Duration,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// `src` identity used on the RPC channel.
    pub client_src: String,
}

impl ControllerConfig {
    /// Minimal configuration with an empty table and default timings.
    pub fn new(device_url: Url, cover_id: u32) -> Self {
        Self {
            device_url,
            cover_id,
            virtual_components: Vec::new(),
            event_actions: Vec::new(),
            debug: false,
            startup_delay: DEFAULT_STARTUP_DELAY,
            timeout: Duration::from_secs(10),
            client_src: "coverd".into(),
        }
    }

    pub fn with_virtual_components(mut self, components: Vec<VirtualComponent>) -> Self {
        self.virtual_components = components;
        self
    }

    pub fn with_event_actions(mut self, actions: Vec<EventAction>) -> Self {
        self.event_actions = actions;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }

    /// First table entry matching `(source, event)`, in declaration order.
    pub fn lookup(&self, source: &str, event: &str) -> Option<&EventAction> {
        self.event_actions
            .iter()
            .find(|entry| entry.matches(source, event))
    }
}
