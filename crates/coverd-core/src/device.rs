// ── Device collaborator traits ──
//
// The guard, router, and provisioner never talk to coverd-api directly.
// They are generic over these traits so tests can swap in recording fakes.

use std::future::Future;

use coverd_api::{RemoteTriggerClient, RpcClient, TransportConfig};

use crate::command::CoverCommand;
use crate::config::{ControllerConfig, VirtualComponent};
use crate::error::CoreError;
use crate::model::{ComponentConfig, CoverStatus};

/// Reads the live status of a cover.
pub trait StatusProvider: Send + Sync {
    /// `Ok(None)` means the device answered but has no such cover.
    fn cover_status(
        &self,
        cover_id: u32,
    ) -> impl Future<Output = Result<Option<CoverStatus>, CoreError>> + Send;
}

/// Sends motion commands to a cover.
pub trait CommandTransport: Send + Sync {
    fn send(
        &self,
        cover_id: u32,
        command: CoverCommand,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Reads and mutates component configuration on the device.
pub trait ComponentStore: Send + Sync {
    /// `Ok(None)` when no component exists at `key`.
    fn component_config(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<ComponentConfig>, CoreError>> + Send;

    fn add_component(
        &self,
        component: &VirtualComponent,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn delete_component(&self, key: &str) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Everything the controller needs from the host device.
pub trait Device: StatusProvider + CommandTransport + ComponentStore + 'static {}

impl<T> Device for T where T: StatusProvider + CommandTransport + ComponentStore + 'static {}

/// Fires synthetic button events on a peer device.
pub trait RemoteTrigger: Send + Sync + 'static {
    fn button_trigger(
        &self,
        device: &str,
        input: &str,
        event: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl RemoteTrigger for RemoteTriggerClient {
    async fn button_trigger(&self, device: &str, input: &str, event: &str) -> Result<(), CoreError> {
        RemoteTriggerClient::button_trigger(self, device, input, event)
            .await
            .map_err(CoreError::from)
    }
}

// ── ShellyDevice ─────────────────────────────────────────────────────

/// [`Device`] backed by the device's JSON-RPC endpoint.
pub struct ShellyDevice {
    rpc: RpcClient,
}

impl ShellyDevice {
    /// Build the RPC client for `config.device_url` with the configured
    /// timeout and `src` identity.
    pub fn connect(config: &ControllerConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let rpc = RpcClient::new(config.device_url.clone(), &transport)?
            .with_src(config.client_src.clone());
        Ok(Self { rpc })
    }
}

impl StatusProvider for ShellyDevice {
    async fn cover_status(&self, cover_id: u32) -> Result<Option<CoverStatus>, CoreError> {
        match self.rpc.cover_status(cover_id).await {
            Ok(raw) => Ok(Some(raw.into())),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl CommandTransport for ShellyDevice {
    async fn send(&self, cover_id: u32, command: CoverCommand) -> Result<(), CoreError> {
        let result = match command {
            CoverCommand::Stop => self.rpc.cover_stop(cover_id).await,
            CoverCommand::Open => self.rpc.cover_open(cover_id).await,
            CoverCommand::Close => self.rpc.cover_close(cover_id).await,
            CoverCommand::GoToPosition {
                position,
                slat_position,
            } => {
                self.rpc
                    .cover_go_to_position(cover_id, position, slat_position)
                    .await
            }
        };

        result.map_err(|e| CoreError::CommandFailed {
            command: command.to_string(),
            message: e.to_string(),
        })
    }
}

impl ComponentStore for ShellyDevice {
    async fn component_config(&self, key: &str) -> Result<Option<ComponentConfig>, CoreError> {
        Ok(self.rpc.component_config(key).await?.map(Into::into))
    }

    async fn add_component(&self, component: &VirtualComponent) -> Result<(), CoreError> {
        self.rpc
            .virtual_add(&component.key, &component.name)
            .await
            .map_err(CoreError::from)
    }

    async fn delete_component(&self, key: &str) -> Result<(), CoreError> {
        self.rpc.virtual_delete(key).await.map_err(CoreError::from)
    }
}
