// Component configuration endpoints
//
// Lookup of existing component config plus virtual component add/delete.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::rpc::client::RpcClient;
use crate::rpc::models::ComponentConfigRaw;

/// Split `"button:200"` into `("button", 200)`.
pub fn split_component_key(key: &str) -> Option<(&str, u32)> {
    let (kind, id) = key.split_once(':')?;
    if kind.is_empty() {
        return None;
    }
    let id = id.parse().ok()?;
    Some((kind, id))
}

/// `"button"` -> `"Button"`, the RPC namespace for that component type.
fn namespace(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl RpcClient {
    /// Fetch the configuration of the component at `key`.
    ///
    /// `<Type>.GetConfig {id}` -- returns `Ok(None)` when the device
    /// reports the component does not exist.
    pub async fn component_config(&self, key: &str) -> Result<Option<ComponentConfigRaw>, Error> {
        let (kind, id) =
            split_component_key(key).ok_or_else(|| Error::InvalidComponentKey(key.into()))?;
        let method = format!("{}.GetConfig", namespace(kind));
        debug!(key, method, "fetching component config");

        match self.call(&method, &json!({ "id": id })).await {
            Ok(config) => Ok(Some(config)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a virtual component.
    ///
    /// `Virtual.Add {type, id, config: {name}}`
    pub async fn virtual_add(&self, key: &str, name: &str) -> Result<(), Error> {
        let (kind, id) =
            split_component_key(key).ok_or_else(|| Error::InvalidComponentKey(key.into()))?;
        debug!(key, name, "adding virtual component");
        let _: serde_json::Value = self
            .call(
                "Virtual.Add",
                &json!({
                    "type": kind,
                    "id": id,
                    "config": { "name": name },
                }),
            )
            .await?;
        Ok(())
    }

    /// Delete a virtual component.
    ///
    /// `Virtual.Delete {key}`
    pub async fn virtual_delete(&self, key: &str) -> Result<(), Error> {
        debug!(key, "deleting virtual component");
        let _: serde_json::Value = self.call("Virtual.Delete", &json!({ "key": key })).await?;
        Ok(())
    }
}
