// ── Inbound event types ──

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// A button/sensor notification, consumed exactly once by the router.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    /// Component key of the originating input, e.g. `"button:200"`.
    pub source: String,
    /// Event type, e.g. `"single_push"`.
    pub event: String,
    /// Remaining notification fields (`idx`, `data`, ...).
    pub payload: serde_json::Value,
}

impl InboundEvent {
    pub fn new(source: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            event: event.into(),
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Which source family this event belongs to, if recognized.
    pub fn family(&self) -> Option<SourceFamily> {
        SourceFamily::of(&self.source)
    }

    /// Button index on multi-button devices (`idx` in the payload).
    pub fn button_index(&self) -> Option<u64> {
        self.payload.get("idx").and_then(serde_json::Value::as_u64)
    }
}

/// Input families the router accepts. Everything else is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum SourceFamily {
    /// Physical BTHome sensor (`bthomesensor:<id>`).
    BtHomeSensor,
    /// Physical BTHome multi-button device (`bthomedevice:<id>`).
    BtHomeDevice,
    /// Virtual button provisioned on the host device (`button:<id>`).
    VirtualButton,
}

impl SourceFamily {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::BtHomeSensor => "bthomesensor:",
            Self::BtHomeDevice => "bthomedevice:",
            Self::VirtualButton => "button:",
        }
    }

    pub fn of(source: &str) -> Option<Self> {
        Self::iter().find(|family| source.starts_with(family.prefix()))
    }
}

/// Event-type side of a routing table entry.
///
/// Config files spell the wildcard `"*"` or `"ALL"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventPattern {
    Any,
    Exact(String),
}

impl EventPattern {
    pub fn exact(event: impl Into<String>) -> Self {
        Self::Exact(event.into())
    }

    pub fn matches(&self, event: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected == event,
        }
    }
}

impl From<String> for EventPattern {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "*" | "ALL" => Self::Any,
            _ => Self::Exact(raw),
        }
    }
}

impl From<EventPattern> for String {
    fn from(pattern: EventPattern) -> Self {
        match pattern {
            EventPattern::Any => "*".into(),
            EventPattern::Exact(event) => event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_by_prefix() {
        assert_eq!(SourceFamily::of("bthomesensor:201"), Some(SourceFamily::BtHomeSensor));
        assert_eq!(SourceFamily::of("bthomedevice:200"), Some(SourceFamily::BtHomeDevice));
        assert_eq!(SourceFamily::of("button:200"), Some(SourceFamily::VirtualButton));
        assert_eq!(SourceFamily::of("input:0"), None);
        assert_eq!(SourceFamily::of("switch:0"), None);
    }

    #[test]
    fn wildcard_spellings() {
        assert_eq!(EventPattern::from("*".to_owned()), EventPattern::Any);
        assert_eq!(EventPattern::from("ALL".to_owned()), EventPattern::Any);
        assert_eq!(
            EventPattern::from("single_push".to_owned()),
            EventPattern::exact("single_push")
        );
    }

    #[test]
    fn pattern_matching() {
        assert!(EventPattern::Any.matches("long_push"));
        assert!(EventPattern::exact("single_push").matches("single_push"));
        assert!(!EventPattern::exact("single_push").matches("double_push"));
    }

    #[test]
    fn button_index_from_payload() {
        let event = InboundEvent::new("bthomedevice:200", "single_push")
            .with_payload(serde_json::json!({ "idx": 2 }));
        assert_eq!(event.button_index(), Some(2));
        assert_eq!(InboundEvent::new("button:200", "single_push").button_index(), None);
    }
}
