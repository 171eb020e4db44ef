use coverd_core::{CoreError, StatusProvider};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::controller_config(global)?;
    let device = super::device(&cfg)?;

    let status = device
        .cover_status(cfg.cover_id)
        .await?
        .ok_or(CoreError::StatusUnavailable {
            cover_id: cfg.cover_id,
        })?;

    let mut fields = vec![format!("cover:{}", cfg.cover_id), status.state.to_string()];
    if let Some(pos) = status.position {
        fields.push(format!("position={pos}"));
    }
    if let Some(slat) = status.slat_position {
        fields.push(format!("slat={slat}"));
    }
    println!("{}", fields.join(" "));
    Ok(())
}
