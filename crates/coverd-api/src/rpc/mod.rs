// Device JSON-RPC surface.
//
// `client` owns transport mechanics; endpoint groups (cover, components)
// are inherent methods on `RpcClient` in their own files.

pub mod client;
pub mod components;
pub mod cover;
pub mod models;

pub use client::RpcClient;
pub use components::split_component_key;
