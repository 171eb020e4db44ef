//! Decision layer between `coverd-api` and the `coverd` daemon.
//!
//! This crate owns the domain model and the decision
//! logic for driving a single motorized cover from button events:
//!
//! - **[`Router`]**: Filters inbound events to recognized source families
//!   (BTHome sensors, BTHome multi-button devices, virtual buttons) and maps
//!   `(source, event)` to a [`RouteAction`] via a first-match-wins table.
//!
//! - **[`CoverGuard`]**: Re-reads the cover status before every decision
//!   and turns a requested [`CoverAction`] into at most one
//!   [`CoverCommand`]. A moving cover is always stopped first.
//!
//! - **[`Provisioner`]**: Startup reconciliation that makes declared
//!   virtual components exist with the expected names, idempotently.
//!
//! - **[`TriggerProxy`]**: Fires synthetic button events on peer devices.
//!
//! - **[`Controller`]**: Sequences provisioning, the one-shot startup
//!   delay, and the event loop.
//!
//! Collaborators (status reads, commands, component config, remote GETs)
//! sit behind the traits in [`device`]; [`ShellyDevice`] implements them
//! on top of `coverd_api::RpcClient`.

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod device;
pub mod error;
#[cfg(test)]
mod fake;
pub mod guard;
pub mod model;
pub mod provision;
pub mod router;
pub mod trigger;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::CoverCommand;
pub use config::{ControllerConfig, DEFAULT_STARTUP_DELAY, EventAction, VirtualComponent};
pub use controller::{Controller, EventSource};
pub use device::{CommandTransport, ComponentStore, Device, RemoteTrigger, ShellyDevice, StatusProvider};
pub use error::CoreError;
pub use guard::{CoverGuard, decide};
pub use provision::{Provisioner, ReconcileReport};
pub use router::{Routed, Router};
pub use trigger::TriggerProxy;

pub use model::{
    ComponentConfig, CoverAction, CoverState, CoverStatus, EventPattern, InboundEvent,
    RouteAction, SourceFamily,
};
