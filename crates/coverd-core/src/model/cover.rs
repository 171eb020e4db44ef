// ── Cover domain types ──

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Motion state reported by the cover.
///
/// Kept apart from [`CoverAction`]: the settled closed state and the close
/// verb share a token on some firmware, but never a type here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverState {
    Open,
    Closed,
    Opening,
    Closing,
    Calibrating,
    /// Halted somewhere between the end stops.
    Stopped,
    /// Any state token this build does not know about.
    Unknown(String),
}

impl CoverState {
    /// Parse a device state token. `"close"` is accepted as an alias for
    /// `"closed"`.
    pub fn from_wire(token: &str) -> Self {
        match token {
            "open" => Self::Open,
            "closed" | "close" => Self::Closed,
            "opening" => Self::Opening,
            "closing" => Self::Closing,
            "calibrating" => Self::Calibrating,
            "stopped" => Self::Stopped,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// `true` while the actuator is driving the cover.
    pub fn is_moving(&self) -> bool {
        matches!(self, Self::Opening | Self::Closing | Self::Calibrating)
    }
}

impl fmt::Display for CoverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Opening => "opening",
            Self::Closing => "closing",
            Self::Calibrating => "calibrating",
            Self::Stopped => "stopped",
            Self::Unknown(token) => token,
        };
        f.write_str(token)
    }
}

/// Point-in-time cover status. Always re-read, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverStatus {
    pub state: CoverState,
    /// 0 = closed, 100 = open. `None` until calibrated.
    pub position: Option<u8>,
    /// Slat tilt 0..=100, only on covers with slat control.
    pub slat_position: Option<u8>,
}

impl CoverStatus {
    pub fn new(state: CoverState) -> Self {
        Self {
            state,
            position: None,
            slat_position: None,
        }
    }

    pub fn with_slat(mut self, slat_position: u8) -> Self {
        self.slat_position = Some(slat_position);
        self
    }

    pub fn is_moving(&self) -> bool {
        self.state.is_moving()
    }
}

/// Logical action requested by a routed event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum CoverAction {
    Open,
    Close,
    SlatOpen,
    SlatClose,
}

impl CoverAction {
    /// Button index on a four-button remote: open, close, slat open, slat close.
    pub fn from_button_index(idx: u64) -> Option<Self> {
        match idx {
            0 => Some(Self::Open),
            1 => Some(Self::Close),
            2 => Some(Self::SlatOpen),
            3 => Some(Self::SlatClose),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn close_token_aliases_closed_state() {
        assert_eq!(CoverState::from_wire("close"), CoverState::Closed);
        assert_eq!(CoverState::from_wire("closed"), CoverState::Closed);
        assert_eq!(CoverState::Closed.to_string(), "closed");
    }

    #[test]
    fn unknown_state_round_trips_token() {
        let state = CoverState::from_wire("jammed");
        assert_eq!(state, CoverState::Unknown("jammed".into()));
        assert_eq!(state.to_string(), "jammed");
        assert!(!state.is_moving());
    }

    #[test]
    fn moving_states() {
        for token in ["opening", "closing", "calibrating"] {
            assert!(CoverState::from_wire(token).is_moving(), "{token}");
        }
        for token in ["open", "closed", "stopped"] {
            assert!(!CoverState::from_wire(token).is_moving(), "{token}");
        }
    }

    #[test]
    fn action_tokens_are_camel_case() {
        assert_eq!(CoverAction::SlatOpen.to_string(), "slatOpen");
        assert_eq!("slatClose".parse::<CoverAction>().unwrap(), CoverAction::SlatClose);
    }

    #[test]
    fn button_index_mapping() {
        assert_eq!(CoverAction::from_button_index(0), Some(CoverAction::Open));
        assert_eq!(CoverAction::from_button_index(3), Some(CoverAction::SlatClose));
        assert_eq!(CoverAction::from_button_index(4), None);
    }
}
