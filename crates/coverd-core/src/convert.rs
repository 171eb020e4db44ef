// ── API-to-domain type conversions ──
//
// Bridges raw coverd-api wire types into canonical coverd-core domain types.

use coverd_api::{ComponentConfigRaw, CoverStatusRaw, DeviceEvent};

use crate::model::{ComponentConfig, CoverState, CoverStatus, InboundEvent};

impl From<CoverStatusRaw> for CoverStatus {
    fn from(raw: CoverStatusRaw) -> Self {
        Self {
            state: CoverState::from_wire(&raw.state),
            position: raw.current_pos,
            slat_position: raw.slat_pos,
        }
    }
}

impl From<ComponentConfigRaw> for ComponentConfig {
    fn from(raw: ComponentConfigRaw) -> Self {
        Self { name: raw.name }
    }
}

impl From<&DeviceEvent> for InboundEvent {
    fn from(event: &DeviceEvent) -> Self {
        Self {
            source: event.component.clone(),
            event: event.event.clone(),
            payload: event.extra.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn status_from_raw() {
        let raw: CoverStatusRaw = serde_json::from_value(serde_json::json!({
            "id": 0,
            "state": "close",
            "current_pos": 0,
            "slat_pos": 100
        }))
        .unwrap();

        let status = CoverStatus::from(raw);
        assert_eq!(
            status,
            CoverStatus {
                state: CoverState::Closed,
                position: Some(0),
                slat_position: Some(100),
            }
        );
    }

    #[test]
    fn inbound_event_from_device_event() {
        let raw: DeviceEvent = serde_json::from_value(serde_json::json!({
            "component": "bthomedevice:200",
            "id": 200,
            "event": "single_push",
            "idx": 1
        }))
        .unwrap();

        let event = InboundEvent::from(&raw);
        assert_eq!(event.source, "bthomedevice:200");
        assert_eq!(event.event, "single_push");
        assert_eq!(event.button_index(), Some(1));
    }
}
