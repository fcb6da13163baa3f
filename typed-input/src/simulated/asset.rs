//! Simulated action-map asset
//!
//! An [`InputAsset`] is the in-process counterpart of an engine's input actions
//! asset: a set of named maps, each holding named actions, plus the devices the
//! runtime knows about. Assets are built from an [`AssetDefinition`], either
//! programmatically or from TOML.

use super::action::{SimulatedAction, ValueType};
use crate::backend::{ActionMapProvider, NativeAction};
use crate::types::{DeviceId, DeviceInfo, InputError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Declarative description of an asset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetDefinition {
    /// Optional asset name (for logging)
    #[serde(default)]
    pub name: Option<String>,

    /// Devices known to the runtime
    #[serde(default)]
    pub devices: Vec<DeviceInfo>,

    /// Action maps
    #[serde(default)]
    pub maps: Vec<MapDefinition>,
}

/// One action map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDefinition {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
}

/// One action inside a map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub name: String,

    /// Value shape (default: button)
    #[serde(rename = "type", default)]
    pub value_type: ValueType,

    /// Whether the action starts enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl AssetDefinition {
    /// Create an empty definition
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the asset name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder method: add a device
    pub fn with_device(mut self, device: DeviceInfo) -> Self {
        self.devices.push(device);
        self
    }

    /// Builder method: add a map
    pub fn with_map(mut self, map: MapDefinition) -> Self {
        self.maps.push(map);
        self
    }

    /// Parse a definition from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| InputError::AssetParseError(e.to_string()))
    }
}

impl MapDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
        }
    }

    /// Builder method: add an enabled action
    pub fn with_action(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.actions.push(ActionDefinition {
            name: name.into(),
            value_type,
            enabled: true,
        });
        self
    }

    /// Builder method: add an action that starts disabled
    pub fn with_disabled_action(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.actions.push(ActionDefinition {
            name: name.into(),
            value_type,
            enabled: false,
        });
        self
    }
}

/// Handle to a resolved map inside an [`InputAsset`]
#[derive(Clone)]
pub struct SimulatedMap {
    name: String,
    actions: Vec<SimulatedAction>,
}

impl SimulatedMap {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actions(&self) -> &[SimulatedAction] {
        &self.actions
    }
}

struct AssetState {
    name: String,
    maps: Vec<SimulatedMap>,
    devices: Vec<DeviceInfo>,
}

/// Shared handle to a loaded asset. Clones refer to the same actions.
#[derive(Clone)]
pub struct InputAsset {
    state: Rc<AssetState>,
}

impl InputAsset {
    /// Build an asset from a definition, rejecting duplicate names and device ids
    pub fn from_definition(definition: AssetDefinition) -> Result<Self> {
        let mut device_ids = HashSet::new();
        for device in &definition.devices {
            if !device_ids.insert(device.id) {
                return Err(InputError::DuplicateDevice(device.id));
            }
        }

        let mut map_names = HashSet::new();
        let mut maps = Vec::with_capacity(definition.maps.len());
        for map in definition.maps {
            if !map_names.insert(map.name.clone()) {
                return Err(InputError::DuplicateActionMap(map.name));
            }

            let mut action_names = HashSet::new();
            let mut actions = Vec::with_capacity(map.actions.len());
            for action in map.actions {
                if !action_names.insert(action.name.clone()) {
                    return Err(InputError::DuplicateAction {
                        map: map.name,
                        action: action.name,
                    });
                }
                actions.push(SimulatedAction::new(&map.name, &action.name, action.value_type, action.enabled));
            }

            maps.push(SimulatedMap { name: map.name, actions });
        }

        let name = definition.name.unwrap_or_else(|| "InputAsset".to_string());
        log::debug!(
            "Loaded asset {}: {} maps, {} devices",
            name,
            maps.len(),
            definition.devices.len()
        );

        Ok(Self {
            state: Rc::new(AssetState {
                name,
                maps,
                devices: definition.devices,
            }),
        })
    }

    /// Parse and build an asset from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_definition(AssetDefinition::from_toml_str(content)?)
    }

    /// Load an asset from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        log::info!("Loading input asset: {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Asset name
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Direct access to an action, for driving the simulation
    pub fn action(&self, map: &str, action: &str) -> Option<SimulatedAction> {
        let map = self.find_action_map(map)?;
        self.find_action(&map, action)
    }

    /// Look up a device by id
    pub fn device(&self, id: DeviceId) -> Option<&DeviceInfo> {
        self.state.devices.iter().find(|device| device.id == id)
    }

    /// Clear per-frame edges on every action
    pub fn end_frame(&self) {
        for map in &self.state.maps {
            for action in &map.actions {
                action.end_frame();
            }
        }
    }
}

impl ActionMapProvider for InputAsset {
    type Map = SimulatedMap;
    type Action = SimulatedAction;

    fn find_action_map(&self, name: &str) -> Option<SimulatedMap> {
        self.state.maps.iter().find(|map| map.name == name).cloned()
    }

    fn find_action(&self, map: &SimulatedMap, name: &str) -> Option<SimulatedAction> {
        map.actions.iter().find(|action| action.name() == name).cloned()
    }

    fn devices(&self) -> Vec<DeviceInfo> {
        self.state.devices.clone()
    }
}
