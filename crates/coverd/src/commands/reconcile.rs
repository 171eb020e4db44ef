use std::sync::Arc;

use coverd_core::Provisioner;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::controller_config(global)?;
    let device = Arc::new(super::device(&cfg)?);

    let report = Provisioner::new(device)
        .reconcile(&cfg.virtual_components)
        .await;

    for (label, keys) in [
        ("created", &report.created),
        ("replaced", &report.replaced),
        ("unchanged", &report.unchanged),
        ("failed", &report.failed),
    ] {
        for key in keys {
            println!("{label:<10} {key}");
        }
    }
    println!("{report}");

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::Provisioning {
            failed: report.failed.len(),
        })
    }
}
