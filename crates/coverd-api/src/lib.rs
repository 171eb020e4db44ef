// coverd-api: Async Rust client for Shelly Gen2 device RPC (HTTP + WebSocket)

pub mod error;
pub mod remote;
pub mod rpc;
pub mod transport;
pub mod websocket;

pub use error::Error;
pub use remote::RemoteTriggerClient;
pub use rpc::RpcClient;
pub use rpc::models::{ComponentConfigRaw, CoverStatusRaw};
pub use transport::TransportConfig;
pub use websocket::{DeviceEvent, ReconnectConfig, WebSocketHandle};
