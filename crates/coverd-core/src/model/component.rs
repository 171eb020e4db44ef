// ── Component configuration ──

/// Existing configuration of a component, as far as reconciliation cares.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComponentConfig {
    pub name: Option<String>,
}

impl ComponentConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}
