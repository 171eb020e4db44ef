// ── Routing table actions ──

use serde::{Deserialize, Serialize};

use super::cover::CoverAction;

/// Right-hand side of a routing table entry.
///
/// Plain data: the router resolves it against the inbound event and the
/// guard interprets the resulting [`CoverAction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteAction {
    Open,
    Close,
    #[serde(alias = "slatOpen")]
    SlatOpen,
    #[serde(alias = "slatClose")]
    SlatClose,
    /// Pick the action from the payload `idx` of a four-button remote.
    #[serde(alias = "byButtonIndex")]
    ByButtonIndex,
    /// Forward the press to a peer device as a synthetic button event.
    RemoteTrigger {
        device: String,
        input: String,
        event: String,
    },
}

impl RouteAction {
    /// The fixed cover action, for entries that do not depend on the payload.
    pub fn cover_action(&self) -> Option<CoverAction> {
        match self {
            Self::Open => Some(CoverAction::Open),
            Self::Close => Some(CoverAction::Close),
            Self::SlatOpen => Some(CoverAction::SlatOpen),
            Self::SlatClose => Some(CoverAction::SlatClose),
            Self::ByButtonIndex | Self::RemoteTrigger { .. } => None,
        }
    }
}
