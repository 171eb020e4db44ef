// Remote button triggers on peer devices.
//
// Peers are addressed by host (or full URL) rather than through an
// `RpcClient`, so a single client can fire events at any device on the LAN.

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::rpc::client::parse_bare;
use crate::transport::{TransportConfig, send_error};

/// HTTP client for `GET /rpc/Button.Trigger` on arbitrary peer devices.
#[derive(Clone)]
pub struct RemoteTriggerClient {
    http: reqwest::Client,
    timeout: Option<Duration>,
}

impl RemoteTriggerClient {
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            timeout: Some(transport.timeout),
        })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http, timeout: None }
    }

    /// Build `http://{device}/rpc/Button.Trigger?id={input}&event={event}`.
    ///
    /// A bare host (`192.168.1.50`, `shelly-hall.local:8080`) gets an
    /// `http://` scheme; anything containing `://` is used as the base as-is.
    pub fn trigger_url(device: &str, input: &str, event: &str) -> Result<Url, Error> {
        let base = if device.contains("://") {
            device.trim_end_matches('/').to_owned()
        } else {
            format!("http://{}", device.trim_end_matches('/'))
        };
        let mut url = Url::parse(&format!("{base}/rpc/Button.Trigger"))?;
        url.query_pairs_mut()
            .append_pair("id", input)
            .append_pair("event", event);
        Ok(url)
    }

    /// Fire a synthetic button event on a peer device.
    pub async fn button_trigger(&self, device: &str, input: &str, event: &str) -> Result<(), Error> {
        let url = Self::trigger_url(device, input, event)?;
        debug!(%url, "GET Button.Trigger");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout))?;
        let _: serde_json::Value = parse_bare(resp).await?;
        Ok(())
    }
}
