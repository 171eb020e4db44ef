// Wire types for the device JSON-RPC protocol.

use serde::{Deserialize, Serialize};

/// Outgoing JSON-RPC request frame.
#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a, P: Serialize> {
    pub id: u64,
    pub src: &'a str,
    pub method: &'a str,
    pub params: &'a P,
}

/// Incoming response frame: exactly one of `result` / `error` is set.
/// Commands like `Cover.Stop` answer with `"result": null`.
#[derive(Debug, Deserialize)]
pub(crate) struct RpcFrame {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<RpcErrorBody>,
}

/// `{"code": -105, "message": "..."}`, either nested in a frame or as the
/// whole body of a failed `GET /rpc/<Method>`.
#[derive(Debug, Deserialize)]
pub(crate) struct RpcErrorBody {
    pub code: i32,
    #[serde(default)]
    pub message: Option<String>,
}

/// Raw `Cover.GetStatus` result.
///
/// `current_pos` is `null` until the cover is calibrated; `slat_pos` is
/// only present when slat control is enabled.
#[derive(Debug, Clone, Deserialize)]
pub struct CoverStatusRaw {
    pub id: u32,
    pub state: String,
    #[serde(default)]
    pub current_pos: Option<u8>,
    #[serde(default)]
    pub slat_pos: Option<u8>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// Raw `<Type>.GetConfig` result for a (virtual) component.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentConfigRaw {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// `Cover.GoToPosition` parameters. Unset fields are omitted so the device
/// leaves that axis alone.
#[derive(Debug, Serialize)]
pub(crate) struct GoToPositionParams {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slat_pos: Option<u8>,
}
