//! Scenario file loading and parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use typed_input::simulated::AssetDefinition;
use typed_input::{ActionValue, BindingConfig, DeviceId, EventKind};

/// Action keys understood by scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    Move,
    Look,
    Jump,
    Sprint,
    Crouch,
    Fire,
    Interact,
    Pause,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A complete scenario (loaded from scenario.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Scenario {
    /// Simulated input asset the instances are built on
    pub asset: AssetDefinition,
    /// Façade instances
    #[serde(default)]
    pub instances: Vec<InstanceConfig>,
    /// Steps, executed in order
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InstanceConfig {
    pub name: String,
    /// Only accept input from this device
    #[serde(default)]
    pub device: Option<DeviceId>,
    #[serde(default = "default_true")]
    pub start_enabled: bool,
    pub bindings: BindingConfig<PlayerAction>,
}

fn default_true() -> bool {
    true
}

/// Identifies one action of the simulated asset
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActionRef {
    pub map: String,
    pub action: String,
}

impl fmt::Display for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.map, self.action)
    }
}

/// State queries available to `query` steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    IsPressed,
    WasPressedThisFrame,
    WasReleasedThisFrame,
    IsActionEnabled,
    ReadButton,
    ReadAxis,
    ReadAxis2d,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryKind::IsPressed => "is_pressed",
            QueryKind::WasPressedThisFrame => "was_pressed_this_frame",
            QueryKind::WasReleasedThisFrame => "was_released_this_frame",
            QueryKind::IsActionEnabled => "is_action_enabled",
            QueryKind::ReadButton => "read_button",
            QueryKind::ReadAxis => "read_axis",
            QueryKind::ReadAxis2d => "read_axis2d",
        };
        write!(f, "{}", name)
    }
}

/// One scenario step
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Press an action's control on a device
    Press {
        #[serde(flatten)]
        target: ActionRef,
        device: DeviceId,
        control: String,
    },
    /// Release an action's control on a device
    Release {
        #[serde(flatten)]
        target: ActionRef,
        device: DeviceId,
        control: String,
    },
    /// Drive an action to a value
    SetValue {
        #[serde(flatten)]
        target: ActionRef,
        device: DeviceId,
        control: String,
        value: ActionValue,
    },
    /// Raise one event without changing action state
    Fire {
        #[serde(flatten)]
        target: ActionRef,
        kind: EventKind,
        device: DeviceId,
        control: String,
    },
    /// Clear per-frame edges
    EndFrame,
    Enable {
        instance: String,
    },
    Disable {
        instance: String,
    },
    EnableAction {
        instance: String,
        key: PlayerAction,
    },
    DisableAction {
        instance: String,
        key: PlayerAction,
    },
    /// Install a named callback; the same `callback` name is the same callback
    Subscribe {
        label: String,
        instance: String,
        key: PlayerAction,
        kind: EventKind,
        callback: String,
    },
    /// Remove a named callback directly
    Unsubscribe {
        instance: String,
        key: PlayerAction,
        kind: EventKind,
        callback: String,
    },
    /// Dispose the handle returned by a `subscribe` step
    DisposeSubscription {
        label: String,
    },
    /// Tear down an instance
    DisposeInstance {
        instance: String,
    },
    Query {
        instance: String,
        key: PlayerAction,
        query: QueryKind,
    },
}

impl Step {
    /// Short name for reports
    pub fn name(&self) -> &'static str {
        match self {
            Step::Press { .. } => "press",
            Step::Release { .. } => "release",
            Step::SetValue { .. } => "set_value",
            Step::Fire { .. } => "fire",
            Step::EndFrame => "end_frame",
            Step::Enable { .. } => "enable",
            Step::Disable { .. } => "disable",
            Step::EnableAction { .. } => "enable_action",
            Step::DisableAction { .. } => "disable_action",
            Step::Subscribe { .. } => "subscribe",
            Step::Unsubscribe { .. } => "unsubscribe",
            Step::DisposeSubscription { .. } => "dispose_subscription",
            Step::DisposeInstance { .. } => "dispose_instance",
            Step::Query { .. } => "query",
        }
    }
}

/// Parse a scenario from TOML text
pub fn parse_scenario(content: &str) -> Result<Scenario> {
    let scenario: Scenario = toml::from_str(content).context("Failed to parse scenario")?;
    Ok(scenario)
}

/// Load a scenario from a TOML file
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file: {:?}", path))?;

    parse_scenario(&content).with_context(|| format!("Invalid scenario file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_deserialization() {
        let toml_content = r#"
            [asset]
            devices = [{ id = 1, name = "Keyboard", class = "Keyboard" }]

            [[asset.maps]]
            name = "Player"
            actions = [{ name = "Sprint" }, { name = "Move", type = "axis2d" }]

            [[instances]]
            name = "solo"
            bindings = { map = "Player", actions = [{ key = "Sprint" }, { key = "Move" }] }

            [[steps]]
            op = "subscribe"
            label = "sprint"
            instance = "solo"
            key = "Sprint"
            kind = "performed"
            callback = "on_sprint"

            [[steps]]
            op = "press"
            map = "Player"
            action = "Sprint"
            device = 1
            control = "leftShift"

            [[steps]]
            op = "set_value"
            map = "Player"
            action = "Move"
            device = 1
            control = "wasd"
            value = { x = 0.0, y = 1.0 }

            [[steps]]
            op = "end_frame"

            [[steps]]
            op = "query"
            instance = "solo"
            key = "Sprint"
            query = "is_pressed"
        "#;

        let scenario = parse_scenario(toml_content).unwrap();
        assert_eq!(scenario.asset.maps.len(), 1);
        assert_eq!(scenario.instances.len(), 1);
        assert_eq!(scenario.instances[0].bindings.actions.len(), 2);
        assert!(scenario.instances[0].start_enabled);
        assert_eq!(scenario.steps.len(), 5);
        assert_eq!(scenario.steps[1].name(), "press");
        assert!(matches!(
            &scenario.steps[2],
            Step::SetValue { value: ActionValue::Axis2d(_), .. }
        ));
        assert!(matches!(
            &scenario.steps[4],
            Step::Query { key: PlayerAction::Sprint, query: QueryKind::IsPressed, .. }
        ));
    }

    #[test]
    fn test_load_scenario_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[asset]\nname = \"FromFile\"").unwrap();

        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.asset.name.as_deref(), Some("FromFile"));
        assert!(scenario.steps.is_empty());

        assert!(load_scenario(Path::new("missing/scenario.toml")).is_err());
    }

    #[test]
    fn test_unknown_op_rejected() {
        let toml_content = r#"
            [asset]

            [[steps]]
            op = "teleport"
        "#;

        assert!(parse_scenario(toml_content).is_err());
    }
}
