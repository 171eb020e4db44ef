// ── Controller ──
//
// Sequences one controller instance: provision, wait out the startup
// delay, then feed the event stream through the router one event at a
// time until the stream closes or the token is cancelled.

use std::sync::Arc;

use coverd_api::{DeviceEvent, WebSocketHandle};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::device::{Device, RemoteTrigger};
use crate::model::InboundEvent;
use crate::provision::{Provisioner, ReconcileReport};
use crate::router::Router;

/// Anything that hands out receivers for device notifications.
pub trait EventSource {
    fn subscribe(&self) -> broadcast::Receiver<Arc<DeviceEvent>>;
}

impl EventSource for WebSocketHandle {
    fn subscribe(&self) -> broadcast::Receiver<Arc<DeviceEvent>> {
        WebSocketHandle::subscribe(self)
    }
}

impl EventSource for broadcast::Sender<Arc<DeviceEvent>> {
    fn subscribe(&self) -> broadcast::Receiver<Arc<DeviceEvent>> {
        broadcast::Sender::subscribe(self)
    }
}

pub struct Controller<D, R> {
    config: Arc<ControllerConfig>,
    provisioner: Provisioner<D>,
    router: Router<D, R>,
}

impl<D: Device, R: RemoteTrigger> Controller<D, R> {
    pub fn new(config: ControllerConfig, device: Arc<D>, remote: Arc<R>) -> Self {
        let config = Arc::new(config);
        Self {
            provisioner: Provisioner::new(Arc::clone(&device)),
            router: Router::new(Arc::clone(&config), device, remote),
            config,
        }
    }

    /// Run the provisioner once over the configured components.
    pub async fn reconcile(&self) -> ReconcileReport {
        self.provisioner
            .reconcile(&self.config.virtual_components)
            .await
    }

    /// Provision, delay, subscribe, then route events until the stream
    /// closes or `cancel` fires.
    pub async fn run<E: EventSource>(&self, events: &E, cancel: CancellationToken) {
        let cover_id = self.config.cover_id;
        info!(cover_id, device = %self.config.device_url, "controller starting");

        let report = self.reconcile().await;
        if !report.is_clean() {
            warn!(failed = ?report.failed, "some virtual components could not be provisioned");
        }

        let delay = self.config.startup_delay;
        debug!(?delay, "waiting before subscribing to events");
        tokio::select! {
            () = cancel.cancelled() => {
                info!("controller cancelled during startup delay");
                return;
            }
            () = tokio::time::sleep(delay) => {}
        }

        let mut rx = events.subscribe();
        info!(cover_id, "listening for events");

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("controller shutting down");
                    break;
                }
                received = rx.recv() => match received {
                    Ok(raw) => {
                        let event = InboundEvent::from(raw.as_ref());
                        self.router.route(&event).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "event receiver lagged, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("event stream closed");
                        break;
                    }
                },
            }
        }
    }
}
