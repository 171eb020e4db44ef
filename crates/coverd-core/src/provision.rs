// ── Virtual component provisioning ──
//
// Startup reconciliation: every declared virtual component must exist on
// the device with the declared name. Re-running after success is a no-op.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::VirtualComponent;
use crate::device::ComponentStore;
use crate::error::CoreError;

/// Outcome of one reconciliation pass, as lists of component keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: Vec<String>,
    pub replaced: Vec<String>,
    pub unchanged: Vec<String>,
    pub failed: Vec<String>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of mutating round-trips the pass needed.
    pub fn changes(&self) -> usize {
        self.created.len() + self.replaced.len()
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} replaced, {} unchanged, {} failed",
            self.created.len(),
            self.replaced.len(),
            self.unchanged.len(),
            self.failed.len()
        )
    }
}

enum Outcome {
    Created,
    Replaced,
    Unchanged,
}

pub struct Provisioner<C> {
    store: Arc<C>,
}

impl<C: ComponentStore> Provisioner<C> {
    pub fn new(store: Arc<C>) -> Self {
        Self { store }
    }

    /// Reconcile `components` in declaration order.
    ///
    /// A failing entry is logged and recorded; the pass carries on with
    /// the next one.
    pub async fn reconcile(&self, components: &[VirtualComponent]) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for component in components {
            let key = component.key.clone();
            match self.reconcile_one(component).await {
                Ok(Outcome::Created) => report.created.push(key),
                Ok(Outcome::Replaced) => report.replaced.push(key),
                Ok(Outcome::Unchanged) => report.unchanged.push(key),
                Err(e) => {
                    error!(key = %component.key, error = %e, "provisioning failed");
                    report.failed.push(key);
                }
            }
        }

        info!(%report, "virtual components reconciled");
        report
    }

    async fn reconcile_one(&self, component: &VirtualComponent) -> Result<Outcome, CoreError> {
        let key = component.key.as_str();
        let existing = self
            .store
            .component_config(key)
            .await
            .map_err(|e| failure(key, "read config", &e))?;

        match existing {
            None => {
                self.store
                    .add_component(component)
                    .await
                    .map_err(|e| failure(key, "add", &e))?;
                info!(key, name = %component.name, "virtual component created");
                Ok(Outcome::Created)
            }
            Some(config) if config.name.as_deref() == Some(component.name.as_str()) => {
                debug!(key, "virtual component up to date");
                Ok(Outcome::Unchanged)
            }
            Some(config) => {
                // The add is only attempted once the delete has gone through.
                self.store
                    .delete_component(key)
                    .await
                    .map_err(|e| failure(key, "delete", &e))?;
                self.store
                    .add_component(component)
                    .await
                    .map_err(|e| failure(key, "re-add", &e))?;
                info!(
                    key,
                    old_name = config.name.as_deref().unwrap_or(""),
                    name = %component.name,
                    "virtual component replaced"
                );
                Ok(Outcome::Replaced)
            }
        }
    }
}

fn failure(key: &str, step: &str, err: &CoreError) -> CoreError {
    CoreError::Provisioning {
        key: key.to_owned(),
        message: format!("{step}: {err}"),
    }
}
