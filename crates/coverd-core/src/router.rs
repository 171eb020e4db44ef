// ── Event router ──
//
// Filters inbound events to recognized source families, looks them up in
// the routing table, and dispatches the resulting action. Routing never
// fails: every error (and any panic in a dispatched action) is logged and
// the next event is processed normally.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::ControllerConfig;
use crate::device::{Device, RemoteTrigger};
use crate::guard::CoverGuard;
use crate::model::{CoverAction, InboundEvent, RouteAction};
use crate::trigger::TriggerProxy;

/// What the router did with one event.
#[derive(Debug)]
pub enum Routed {
    /// Source prefix is not a recognized family.
    UnknownSource,
    /// No table entry matched `(source, event)`.
    NoMatch,
    /// `ByButtonIndex` entry, but the payload index was missing or out of range.
    BadButtonIndex(Option<u64>),
    /// Handed to the guard. `task` is the spawned command, if one was sent.
    Cover {
        action: CoverAction,
        task: Option<JoinHandle<()>>,
    },
    /// Forwarded to the trigger proxy. `task` is `None` if the arguments
    /// were rejected.
    RemoteTrigger { task: Option<JoinHandle<()>> },
    /// The dispatched action panicked; the panic was contained.
    Panicked,
}

impl Routed {
    /// Wait for any spawned command or trigger request to finish.
    pub async fn settle(self) {
        let task = match self {
            Self::Cover { task, .. } | Self::RemoteTrigger { task } => task,
            _ => None,
        };
        if let Some(task) = task {
            if let Err(e) = task.await {
                error!(error = %e, "dispatched task aborted");
            }
        }
    }
}

pub struct Router<D, R> {
    config: Arc<ControllerConfig>,
    guard: CoverGuard<D>,
    proxy: TriggerProxy<R>,
}

impl<D: Device, R: RemoteTrigger> Router<D, R> {
    pub fn new(config: Arc<ControllerConfig>, device: Arc<D>, remote: Arc<R>) -> Self {
        let guard = CoverGuard::new(config.cover_id, device);
        Self {
            config,
            guard,
            proxy: TriggerProxy::new(remote),
        }
    }

    /// Route one event to completion of its decision step.
    pub async fn route(&self, event: &InboundEvent) -> Routed {
        if self.config.debug {
            info!(source = %event.source, event = %event.event, payload = %event.payload, "inbound event");
        }

        match AssertUnwindSafe(self.dispatch(event)).catch_unwind().await {
            Ok(routed) => routed,
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".into());
                error!(source = %event.source, event = %event.event, %reason, "event handler panicked");
                Routed::Panicked
            }
        }
    }

    async fn dispatch(&self, event: &InboundEvent) -> Routed {
        let Some(family) = event.family() else {
            debug!(source = %event.source, "ignoring event from unrecognized source");
            return Routed::UnknownSource;
        };

        let Some(entry) = self.config.lookup(&event.source, &event.event) else {
            debug!(source = %event.source, event = %event.event, ?family, "no route");
            return Routed::NoMatch;
        };

        let action = match &entry.action {
            RouteAction::RemoteTrigger {
                device,
                input,
                event: remote_event,
            } => {
                let task = self.proxy.trigger(device, input, remote_event).ok();
                return Routed::RemoteTrigger { task };
            }
            RouteAction::ByButtonIndex => {
                let idx = event.button_index();
                match idx.and_then(CoverAction::from_button_index) {
                    Some(action) => action,
                    None => {
                        debug!(source = %event.source, ?idx, "button index out of range");
                        return Routed::BadButtonIndex(idx);
                    }
                }
            }
            fixed => match fixed.cover_action() {
                Some(action) => action,
                None => return Routed::NoMatch,
            },
        };

        debug!(source = %event.source, event = %event.event, %action, "routed");
        let task = self.guard.handle(action).await;
        Routed::Cover { action, task }
    }
}
