// Cover endpoints
//
// Status read plus the four motion commands the controller issues.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::rpc::client::RpcClient;
use crate::rpc::models::{CoverStatusRaw, GoToPositionParams};

impl RpcClient {
    /// Read the current cover status.
    ///
    /// `Cover.GetStatus {id}`
    pub async fn cover_status(&self, id: u32) -> Result<CoverStatusRaw, Error> {
        debug!(id, "fetching cover status");
        self.call("Cover.GetStatus", &json!({ "id": id })).await
    }

    /// `Cover.Open {id}`
    pub async fn cover_open(&self, id: u32) -> Result<(), Error> {
        self.simple_command("Cover.Open", id).await
    }

    /// `Cover.Close {id}`
    pub async fn cover_close(&self, id: u32) -> Result<(), Error> {
        self.simple_command("Cover.Close", id).await
    }

    /// `Cover.Stop {id}`
    pub async fn cover_stop(&self, id: u32) -> Result<(), Error> {
        self.simple_command("Cover.Stop", id).await
    }

    /// Move cover and/or slats to an absolute position.
    ///
    /// `Cover.GoToPosition {id, pos?, slat_pos?}` -- omitted fields are
    /// left untouched by the device.
    pub async fn cover_go_to_position(
        &self,
        id: u32,
        pos: Option<u8>,
        slat_pos: Option<u8>,
    ) -> Result<(), Error> {
        debug!(id, ?pos, ?slat_pos, "Cover.GoToPosition");
        let _: serde_json::Value = self
            .call(
                "Cover.GoToPosition",
                &GoToPositionParams { id, pos, slat_pos },
            )
            .await?;
        Ok(())
    }

    async fn simple_command(&self, method: &str, id: u32) -> Result<(), Error> {
        debug!(id, method, "cover command");
        let _: serde_json::Value = self.call(method, &json!({ "id": id })).await?;
        Ok(())
    }
}
