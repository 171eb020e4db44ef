// Recording in-memory device used by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::command::CoverCommand;
use crate::config::VirtualComponent;
use crate::device::{CommandTransport, ComponentStore, RemoteTrigger, StatusProvider};
use crate::error::CoreError;
use crate::model::{ComponentConfig, CoverStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Status(u32),
    Send(u32, CoverCommand),
    GetConfig(String),
    Add(String, String),
    Delete(String),
    Trigger(String, String, String),
}

#[derive(Default)]
pub struct FakeDevice {
    status: Mutex<Option<CoverStatus>>,
    status_fails: Mutex<bool>,
    components: Mutex<HashMap<String, String>>,
    failing: Mutex<HashSet<String>>,
    unreadable: Mutex<HashSet<String>>,
    calls: Mutex<Vec<Call>>,
}

#[allow(clippy::unwrap_used)]
impl FakeDevice {
    pub fn with_status(status: CoverStatus) -> Self {
        let device = Self::default();
        *device.status.lock().unwrap() = Some(status);
        device
    }

    pub fn failing_status() -> Self {
        let device = Self::default();
        *device.status_fails.lock().unwrap() = true;
        device
    }

    pub fn insert_component(&self, key: &str, name: &str) {
        self.components
            .lock()
            .unwrap()
            .insert(key.to_owned(), name.to_owned());
    }

    /// Make every call touching `what` fail. `what` is a component key,
    /// a command method name, or a trigger device.
    pub fn fail_on(&self, what: &str) {
        self.failing.lock().unwrap().insert(what.to_owned());
    }

    /// Make `GetConfig` fail for the component at `key`.
    pub fn fail_read(&self, key: &str) {
        self.unreadable.lock().unwrap().insert(key.to_owned());
    }

    pub fn component_name(&self, key: &str) -> Option<String> {
        self.components.lock().unwrap().get(key).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<CoverCommand> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send(_, command) => Some(command),
                _ => None,
            })
            .collect()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Add(..) | Call::Delete(_)))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn fails(&self, what: &str) -> bool {
        self.failing.lock().unwrap().contains(what)
    }
}

#[allow(clippy::unwrap_used)]
impl StatusProvider for FakeDevice {
    async fn cover_status(&self, cover_id: u32) -> Result<Option<CoverStatus>, CoreError> {
        self.record(Call::Status(cover_id));
        if *self.status_fails.lock().unwrap() {
            return Err(CoreError::Timeout { timeout_secs: 10 });
        }
        Ok(self.status.lock().unwrap().clone())
    }
}

impl CommandTransport for FakeDevice {
    async fn send(&self, cover_id: u32, command: CoverCommand) -> Result<(), CoreError> {
        self.record(Call::Send(cover_id, command));
        if self.fails(command.method()) {
            return Err(CoreError::CommandFailed {
                command: command.to_string(),
                message: "rejected".into(),
            });
        }
        Ok(())
    }
}

#[allow(clippy::unwrap_used)]
impl ComponentStore for FakeDevice {
    async fn component_config(&self, key: &str) -> Result<Option<ComponentConfig>, CoreError> {
        self.record(Call::GetConfig(key.to_owned()));
        if self.unreadable.lock().unwrap().contains(key) {
            return Err(CoreError::Timeout { timeout_secs: 10 });
        }
        Ok(self
            .components
            .lock()
            .unwrap()
            .get(key)
            .map(|name| ComponentConfig::named(name.clone())))
    }

    async fn add_component(&self, component: &VirtualComponent) -> Result<(), CoreError> {
        self.record(Call::Add(component.key.clone(), component.name.clone()));
        if self.fails(&component.key) {
            return Err(CoreError::Api {
                message: "add rejected".into(),
                code: Some(-103),
                status: None,
            });
        }
        self.insert_component(&component.key, &component.name);
        Ok(())
    }

    async fn delete_component(&self, key: &str) -> Result<(), CoreError> {
        self.record(Call::Delete(key.to_owned()));
        if self.fails(key) {
            return Err(CoreError::Api {
                message: "delete rejected".into(),
                code: Some(-103),
                status: None,
            });
        }
        self.components.lock().unwrap().remove(key);
        Ok(())
    }
}

impl RemoteTrigger for FakeDevice {
    async fn button_trigger(&self, device: &str, input: &str, event: &str) -> Result<(), CoreError> {
        self.record(Call::Trigger(device.into(), input.into(), event.into()));
        if self.fails(device) {
            return Err(CoreError::ConnectionFailed {
                url: device.into(),
                reason: "unreachable".into(),
            });
        }
        Ok(())
    }
}
