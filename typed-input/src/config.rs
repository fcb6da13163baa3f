//! Binding and instance configuration
//!
//! Declarative setup for an [`InputActions`](crate::InputActions) instance:
//! which keys bind to which actions of a map, and how the instance filters and
//! starts. Both types deserialize from TOML and offer builder methods.

use crate::types::{DeviceId, InputError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Key → action bindings for one action map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingConfig<K> {
    /// Name of the action map the actions live in
    pub map: String,

    /// Bindings, applied in order
    #[serde(default = "Vec::new")]
    pub actions: Vec<ActionBinding<K>>,
}

/// One key → action binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionBinding<K> {
    /// Typed key
    pub key: K,

    /// Native action name (default: the key's name)
    #[serde(default)]
    pub action: Option<String>,
}

impl<K> BindingConfig<K> {
    /// Create an empty binding set for `map`
    pub fn new(map: impl Into<String>) -> Self {
        Self {
            map: map.into(),
            actions: Vec::new(),
        }
    }

    /// Builder method: bind `key` to the action named after it
    pub fn bind(mut self, key: K) -> Self {
        self.actions.push(ActionBinding { key, action: None });
        self
    }

    /// Builder method: bind `key` to the action `action`
    pub fn bind_named(mut self, key: K, action: impl Into<String>) -> Self {
        self.actions.push(ActionBinding {
            key,
            action: Some(action.into()),
        });
        self
    }
}

impl<K: DeserializeOwned> BindingConfig<K> {
    /// Parse bindings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| InputError::ConfigParseError(e.to_string()))
    }
}

/// Per-instance options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceOptions {
    /// Only accept input from this device
    #[serde(default)]
    pub device: Option<DeviceId>,

    /// Whether the instance starts globally enabled (default: true)
    #[serde(default = "default_true")]
    pub start_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for InstanceOptions {
    fn default() -> Self {
        Self {
            device: None,
            start_enabled: true,
        }
    }
}

impl InstanceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: filter to one device
    pub fn with_device(mut self, device: DeviceId) -> Self {
        self.device = Some(device);
        self
    }

    /// Builder method: choose the initial global enable state
    pub fn with_start_enabled(mut self, enabled: bool) -> Self {
        self.start_enabled = enabled;
        self
    }
}
