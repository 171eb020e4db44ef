// Device RPC HTTP client
//
// Wraps `reqwest::Client` with JSON-RPC frame construction, request id
// sequencing, and error-frame unwrapping. Endpoint groups (cover,
// components) are implemented as inherent methods in separate files to
// keep this module focused on transport mechanics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::rpc::models::{RpcErrorBody, RpcFrame, RpcRequest};
use crate::transport::{TransportConfig, send_error};

/// Default `src` identity sent with every request.
pub const DEFAULT_SRC: &str = "coverd";

/// Raw HTTP client for a single device's JSON-RPC endpoint.
///
/// Every call is a `POST {base}/rpc` carrying `{id, src, method, params}`.
/// Methods return the unwrapped `result` payload -- error frames are
/// turned into [`Error::Rpc`] before the caller sees them.
pub struct RpcClient {
    http: reqwest::Client,
    base_url: Url,
    src: String,
    timeout: Option<Duration>,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the device root (e.g. `http://192.168.1.40`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let mut client = Self::with_client(http, base_url);
        client.timeout = Some(transport.timeout);
        Ok(client)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Its timeout is unknown here, so timeouts surface as
    /// [`Error::Transport`].
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            src: DEFAULT_SRC.into(),
            timeout: None,
            next_id: AtomicU64::new(1),
        }
    }

    /// Override the `src` identity used in request frames.
    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        self.src = src.into();
        self
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/rpc`
    pub(crate) fn rpc_url(&self) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/rpc"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Invoke `method` with `params` and deserialize the `result`.
    ///
    /// A `null` or missing result deserializes as JSON `null`, so `()`
    /// and `Option<T>` are valid targets for commands without output.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.rpc_url()?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, "RPC call");

        let frame = RpcRequest {
            id,
            src: &self.src,
            method,
            params,
        };
        let resp = self
            .http
            .post(url)
            .json(&frame)
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout))?;

        parse_frame(resp).await
    }
}

/// Parse an RPC response body, returning `result` on success or an
/// [`Error::Rpc`] when the device sent an error frame.
///
/// Also handles the bare `{"code": N, "message": "..."}` shape the device
/// returns with HTTP 4xx/5xx.
pub(crate) async fn parse_frame<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Transport)?;
    trace!(status = status.as_u16(), len = body.len(), "RPC response");

    if !status.is_success() {
        if let Ok(err) = serde_json::from_str::<RpcErrorBody>(&body) {
            return Err(rpc_error(err));
        }
        if let Ok(RpcFrame {
            error: Some(err), ..
        }) = serde_json::from_str::<RpcFrame>(&body)
        {
            return Err(rpc_error(err));
        }
        return Err(Error::Http {
            status: status.as_u16(),
            body: preview(&body).to_owned(),
        });
    }

    let frame: RpcFrame = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body: body.clone(),
    })?;

    if let Some(err) = frame.error {
        return Err(rpc_error(err));
    }

    let result = frame.result.unwrap_or(serde_json::Value::Null);
    serde_json::from_value(result).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}

/// Deserialize a bare result body (the shape `GET /rpc/<Method>` returns).
pub(crate) async fn parse_bare<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Transport)?;

    if !status.is_success() {
        return Err(match serde_json::from_str::<RpcErrorBody>(&body) {
            Ok(err) => rpc_error(err),
            Err(_) => Error::Http {
                status: status.as_u16(),
                body: preview(&body).to_owned(),
            },
        });
    }

    if body.trim().is_empty() {
        return serde_json::from_value(serde_json::Value::Null).map_err(|e| {
            Error::Deserialization {
                message: e.to_string(),
                body,
            }
        });
    }

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body: body.clone(),
    })
}

fn rpc_error(err: RpcErrorBody) -> Error {
    Error::Rpc {
        code: err.code,
        message: err.message.unwrap_or_default(),
    }
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
