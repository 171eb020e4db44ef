// ── Domain model ──
//
// Canonical types shared by the router, guard and provisioner. Wire
// formats live in coverd-api; `convert` bridges the two.

pub mod component;
pub mod cover;
pub mod event;
pub mod route;

pub use component::ComponentConfig;
pub use cover::{CoverAction, CoverState, CoverStatus};
pub use event::{EventPattern, InboundEvent, SourceFamily};
pub use route::RouteAction;
