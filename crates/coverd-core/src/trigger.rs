// ── Remote trigger proxy ──

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::device::RemoteTrigger;
use crate::error::CoreError;

/// Forwards button events to peer devices, one GET per call, no retry.
pub struct TriggerProxy<R> {
    client: Arc<R>,
}

impl<R> Clone for TriggerProxy<R> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<R: RemoteTrigger> TriggerProxy<R> {
    pub fn new(client: Arc<R>) -> Self {
        Self { client }
    }

    /// Validate the arguments and spawn the trigger request.
    ///
    /// Blank arguments are rejected before any network traffic. The
    /// request outcome is only logged.
    pub fn trigger(
        &self,
        device: &str,
        input: &str,
        event: &str,
    ) -> Result<JoinHandle<()>, CoreError> {
        validate(device, input, event)?;

        let client = Arc::clone(&self.client);
        let (device, input, event) = (device.to_owned(), input.to_owned(), event.to_owned());
        Ok(tokio::spawn(async move {
            match client.button_trigger(&device, &input, &event).await {
                Ok(()) => info!(%device, %input, %event, "remote trigger sent"),
                Err(e) => error!(%device, %input, %event, error = %e, "remote trigger failed"),
            }
        }))
    }

    /// Validate and send in the caller's task, returning the outcome.
    pub async fn send(&self, device: &str, input: &str, event: &str) -> Result<(), CoreError> {
        validate(device, input, event)?;
        self.client.button_trigger(device, input, event).await?;
        info!(device, input, event, "remote trigger sent");
        Ok(())
    }
}

fn validate(device: &str, input: &str, event: &str) -> Result<(), CoreError> {
    for (field, value) in [("device", device), ("input", input), ("event", event)] {
        if value.trim().is_empty() {
            error!(device, input, event, "malformed trigger arguments: {field} is blank");
            return Err(CoreError::InvalidTrigger { field });
        }
    }
    Ok(())
}
