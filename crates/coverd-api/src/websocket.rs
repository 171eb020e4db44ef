//! WebSocket notification stream with auto-reconnect.
//!
//! Connects to a device's RPC WebSocket (`ws://<host>/rpc`), registers for
//! notifications by sending one request carrying our `src`, and streams
//! each `NotifyEvent` entry through a [`tokio::sync::broadcast`] channel.
//! Handles reconnection with exponential backoff + jitter automatically.
//!
//! # Example
//!
//! ```rust,ignore
//! use coverd_api::websocket::{WebSocketHandle, ReconnectConfig};
//! use tokio_util::sync::CancellationToken;
//! use url::Url;
//!
//! let cancel = CancellationToken::new();
//! let ws_url = Url::parse("ws://192.168.1.40/rpc")?;
//!
//! let handle = WebSocketHandle::connect(ws_url, "coverd".into(), ReconnectConfig::default(), cancel.clone());
//! let mut rx = handle.subscribe();
//!
//! while let Ok(event) = rx.recv().await {
//!     println!("{}: {}", event.component, event.event);
//! }
//!
//! handle.shutdown();
//! ```

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;

// ── Broadcast channel capacity ───────────────────────────────────────

const EVENT_CHANNEL_CAPACITY: usize = 256;

// ── DeviceEvent ──────────────────────────────────────────────────────

/// One entry of a `NotifyEvent` notification.
///
/// Uses `#[serde(flatten)]` to capture all fields beyond the core set
/// (`idx`, `data`, ...), so nothing from the device is silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceEvent {
    /// Originating component key, e.g. `"button:200"`, `"bthomedevice:200"`.
    pub component: String,

    /// Numeric component id, if present.
    #[serde(default)]
    pub id: Option<u32>,

    /// Event type, e.g. `"single_push"`, `"double_push"`, `"long_push"`.
    pub event: String,

    /// Device timestamp (unix seconds, fractional).
    #[serde(default)]
    pub ts: Option<f64>,

    /// All remaining fields the device sends.
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

// ── ReconnectConfig ──────────────────────────────────────────────────

/// Exponential backoff configuration for WebSocket reconnection.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt. Default: 1s.
    pub initial_delay: Duration,

    /// Upper bound on backoff delay. Default: 30s.
    pub max_delay: Duration,

    /// Maximum reconnection attempts before giving up.
    /// `None` means retry forever.
    pub max_retries: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: None,
        }
    }
}

/// Derive the notification WebSocket URL from a device base URL.
///
/// `http://host` -> `ws://host/rpc`, `https://host` -> `wss://host/rpc`.
pub fn websocket_url(device_url: &Url) -> Result<Url, Error> {
    let scheme = match device_url.scheme() {
        "https" | "wss" => "wss",
        _ => "ws",
    };
    let host = device_url
        .host_str()
        .ok_or_else(|| Error::WebSocketConnect(format!("no host in {device_url}")))?;
    let authority = match device_url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    };
    Ok(Url::parse(&format!("{scheme}://{authority}/rpc"))?)
}

// ── WebSocketHandle ──────────────────────────────────────────────────

/// Handle to a running WebSocket event stream.
///
/// Call [`shutdown`](Self::shutdown) to tear down the background task.
pub struct WebSocketHandle {
    event_tx: broadcast::Sender<Arc<DeviceEvent>>,
    cancel: CancellationToken,
}

impl WebSocketHandle {
    /// Spawn the connect/reconnect loop and return immediately.
    ///
    /// The first connection attempt happens asynchronously. Receivers only
    /// see events published after they subscribe -- there is no replay.
    pub fn connect(
        ws_url: Url,
        src: String,
        reconnect: ReconnectConfig,
        cancel: CancellationToken,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let task_tx = event_tx.clone();
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            ws_loop(ws_url, src, task_tx, reconnect, task_cancel).await;
        });

        Self { event_tx, cancel }
    }

    /// Get a new broadcast receiver for the event stream.
    ///
    /// If a consumer falls behind, it receives
    /// [`broadcast::error::RecvError::Lagged`].
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DeviceEvent>> {
        self.event_tx.subscribe()
    }

    /// Signal the background task to shut down gracefully.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

// ── Background reconnection loop ─────────────────────────────────────

/// Main loop: connect → read → on error, backoff → reconnect.
async fn ws_loop(
    ws_url: Url,
    src: String,
    event_tx: broadcast::Sender<Arc<DeviceEvent>>,
    reconnect: ReconnectConfig,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;

    loop {
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = connect_and_read(&ws_url, &src, &event_tx, &cancel) => result,
        };

        match result {
            // Clean disconnect: reset attempt counter, reconnect after the initial delay.
            Ok(()) => {
                if cancel.is_cancelled() {
                    break;
                }
                tracing::info!("WebSocket disconnected cleanly, reconnecting");
                attempt = 0;

                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(reconnect.initial_delay) => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, attempt, "WebSocket error");

                if let Some(max) = reconnect.max_retries {
                    if attempt >= max {
                        tracing::error!(
                            max_retries = max,
                            "WebSocket reconnection limit reached, giving up"
                        );
                        break;
                    }
                }

                let delay = calculate_backoff(attempt, &reconnect);
                tracing::info!(
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    attempt,
                    "Waiting before reconnect"
                );

                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(delay) => {}
                }

                attempt = attempt.saturating_add(1);
            }
        }
    }

    // Reachable via `break`, but select! expansion hides that from rustc.
    #[allow(unreachable_code)]
    {
        tracing::debug!("WebSocket loop exiting");
    }
}

// ── Single connection lifecycle ──────────────────────────────────────

/// Establish a single WebSocket connection, register for notifications,
/// and read frames until it drops.
async fn connect_and_read(
    url: &Url,
    src: &str,
    event_tx: &broadcast::Sender<Arc<DeviceEvent>>,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    tracing::info!(url = %url, "Connecting to WebSocket");

    let (ws_stream, _response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .map_err(|e| Error::WebSocketConnect(e.to_string()))?;

    tracing::info!("WebSocket connected");

    let (mut write, mut read) = ws_stream.split();

    // The device only pushes notifications to peers that have sent at
    // least one request carrying a `src`.
    let hello = serde_json::json!({
        "id": 1,
        "src": src,
        "method": "Shelly.GetDeviceInfo",
    });
    write
        .send(tungstenite::Message::Text(hello.to_string().into()))
        .await
        .map_err(|e| Error::WebSocketConnect(e.to_string()))?;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(()),
            frame = read.next() => {
                match frame {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        parse_and_broadcast(&text, event_tx);
                    }
                    Some(Ok(tungstenite::Message::Ping(_))) => {
                        // tungstenite handles pong replies automatically
                        tracing::trace!("WebSocket ping");
                    }
                    Some(Ok(tungstenite::Message::Close(frame))) => {
                        if let Some(ref cf) = frame {
                            tracing::info!(
                                code = %cf.code,
                                reason = %cf.reason,
                                "WebSocket close frame received"
                            );
                        } else {
                            tracing::info!("WebSocket close frame received (no payload)");
                        }
                        return close_outcome(frame.as_ref());
                    }
                    Some(Err(e)) => {
                        return Err(Error::WebSocketConnect(e.to_string()));
                    }
                    None => {
                        tracing::info!("WebSocket stream ended");
                        return Ok(());
                    }
                    _ => {
                        // Binary, Pong, Frame -- ignore
                    }
                }
            }
        }
    }
}

/// A normal or payload-less close is clean. Any other close code is
/// reported as [`Error::WebSocketClosed`] so the loop backs off.
fn close_outcome(frame: Option<&CloseFrame>) -> Result<(), Error> {
    match frame {
        Some(cf) if cf.code != CloseCode::Normal => Err(Error::WebSocketClosed {
            code: u16::from(cf.code),
            reason: cf.reason.to_string(),
        }),
        _ => Ok(()),
    }
}

// ── Message parsing ──────────────────────────────────────────────────

/// Any frame the device sends: responses carry `result`/`error`,
/// notifications carry `method` + `params`.
#[derive(Debug, Deserialize)]
struct WsFrame {
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<NotifyParams>,
}

#[derive(Debug, Deserialize)]
struct NotifyParams {
    #[serde(default)]
    events: Vec<serde_json::Value>,
}

/// Parse a WebSocket text frame and broadcast any events found inside.
fn parse_and_broadcast(text: &str, event_tx: &broadcast::Sender<Arc<DeviceEvent>>) {
    let frame: WsFrame = match serde_json::from_str(text) {
        Ok(f) => f,
        Err(e) => {
            tracing::debug!(error = %e, "Failed to parse WebSocket frame");
            return;
        }
    };

    match frame.method.as_deref() {
        Some("NotifyEvent") => {}
        Some(other) => {
            tracing::trace!(method = other, "ignoring notification");
            return;
        }
        None => {
            tracing::trace!("ignoring RPC response frame");
            return;
        }
    }

    let Some(params) = frame.params else {
        return;
    };

    for data in params.events {
        match serde_json::from_value::<DeviceEvent>(data) {
            Ok(event) => {
                // Ignore send errors -- just means no active subscribers right now
                let _ = event_tx.send(Arc::new(event));
            }
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed event entry");
            }
        }
    }
}

// ── Backoff calculation ──────────────────────────────────────────────

/// Exponential backoff with jitter.
///
/// `delay = min(initial * 2^attempt, max) + jitter`
///
/// Jitter is +-25% to spread out reconnection storms.
fn calculate_backoff(attempt: u32, config: &ReconnectConfig) -> Duration {
    let exponent = i32::try_from(attempt.min(30)).unwrap_or(30);
    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(exponent);
    let capped = base.min(config.max_delay.as_secs_f64());

    // Deterministic "jitter" seeded from the attempt number.
    let jitter_factor = 1.0 + 0.25 * (f64::from(attempt) * 7.3).sin();
    let with_jitter = (capped * jitter_factor).max(0.0);

    Duration::from_secs_f64(with_jitter)
}

// ── Tests ────────────────────────────────────────────────────────────
