use std::sync::Arc;

use coverd_api::websocket::websocket_url;
use coverd_api::{ReconnectConfig, WebSocketHandle};
use coverd_core::Controller;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::{GlobalOpts, RunArgs};
use crate::config;
use crate::error::CliError;

pub async fn handle(args: RunArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::controller_config(global)?;
    cfg.debug |= args.debug;

    let device = Arc::new(super::device(&cfg)?);
    let remote = Arc::new(super::remote(&cfg)?);
    let ws_url = websocket_url(&cfg.device_url)?;

    let cancel = CancellationToken::new();
    let events = WebSocketHandle::connect(
        ws_url,
        cfg.client_src.clone(),
        ReconnectConfig::default(),
        cancel.child_token(),
    );

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("interrupt received, shutting down"),
            Err(e) => warn!(error = %e, "cannot listen for interrupt, shutting down"),
        }
        shutdown.cancel();
    });

    Controller::new(cfg, device, remote)
        .run(&events, cancel)
        .await;

    events.shutdown();
    Ok(())
}
