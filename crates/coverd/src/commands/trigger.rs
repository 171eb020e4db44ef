use std::sync::Arc;

use coverd_core::TriggerProxy;

use crate::cli::{GlobalOpts, TriggerArgs};
use crate::config;
use crate::error::CliError;

/// One-off trigger. Only the timeout is taken from the config, so this
/// works without a device configured.
pub async fn handle(args: TriggerArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let transport = coverd_api::TransportConfig::default()
        .with_timeout(std::time::Duration::from_secs(cfg.timeout_secs));
    let client = coverd_api::RemoteTriggerClient::new(&transport)?;

    TriggerProxy::new(Arc::new(client))
        .send(&args.peer, &args.input, &args.event)
        .await?;

    println!("{} {} -> {}", args.input, args.event, args.peer);
    Ok(())
}
