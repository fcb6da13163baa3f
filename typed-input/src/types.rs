//! Core types shared by the façade and the backend traits
//!
//! Everything that crosses the boundary between client code, the façade and the
//! host input framework lives here: event kinds, device identities, action values
//! and the context handed to callbacks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Timestamp type used on callback contexts
pub type Timestamp = DateTime<Utc>;

/// Result type for operations at the I/O edges (asset and config loading)
pub type Result<T> = std::result::Result<T, InputError>;

/// Errors raised while loading assets or configuration.
///
/// The façade itself never returns these: misuse of registered actions and
/// subscriptions is logged and degraded to a safe default instead.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to parse asset definition: {0}")]
    AssetParseError(String),

    #[error("Failed to parse binding configuration: {0}")]
    ConfigParseError(String),

    #[error("Duplicate action map: {0}")]
    DuplicateActionMap(String),

    #[error("Duplicate action '{action}' in map '{map}'")]
    DuplicateAction { map: String, action: String },

    #[error("Duplicate device id: {0}")]
    DuplicateDevice(DeviceId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The three callback phases an action reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// The action's control left its rest state
    Started,
    /// The action's interaction completed (e.g. a button press was recognised)
    Performed,
    /// The interaction was aborted or the control returned to rest
    Canceled,
}

impl EventKind {
    /// All kinds, in delivery order for a full press/release cycle
    pub const ALL: [EventKind; 3] = [EventKind::Started, EventKind::Performed, EventKind::Canceled];
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Started => write!(f, "started"),
            EventKind::Performed => write!(f, "performed"),
            EventKind::Canceled => write!(f, "canceled"),
        }
    }
}

/// Opaque identity of an input device, comparable by value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub u32);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device#{}", self.0)
    }
}

/// A device as enumerated by the host framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device identity
    pub id: DeviceId,
    /// Human readable name (e.g. "Gamepad 1")
    pub name: String,
    /// Device class (e.g. "Keyboard", "Gamepad")
    pub class: String,
}

impl DeviceInfo {
    /// Create a new device description
    pub fn new(id: u32, name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            id: DeviceId(id),
            name: name.into(),
            class: class.into(),
        }
    }
}

/// A 2D axis value (sticks, mouse deltas)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Value reported by a native action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionValue {
    /// Digital control
    Button(bool),
    /// Single analog axis
    Axis(f32),
    /// Two analog axes
    Axis2d(Vec2),
}

impl Default for ActionValue {
    fn default() -> Self {
        ActionValue::Button(false)
    }
}

impl fmt::Display for ActionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionValue::Button(v) => write!(f, "{}", v),
            ActionValue::Axis(v) => write!(f, "{:.3}", v),
            ActionValue::Axis2d(v) => write!(f, "({:.3}, {:.3})", v.x, v.y),
        }
    }
}

impl From<bool> for ActionValue {
    fn from(value: bool) -> Self {
        ActionValue::Button(value)
    }
}

impl From<f32> for ActionValue {
    fn from(value: f32) -> Self {
        ActionValue::Axis(value)
    }
}

impl From<Vec2> for ActionValue {
    fn from(value: Vec2) -> Self {
        ActionValue::Axis2d(value)
    }
}

/// Types that can be read out of an [`ActionValue`].
///
/// `Default` is the sentinel returned whenever a read is suppressed.
pub trait InputValue: Default + Copy + 'static {
    /// Extract `Self` from a raw value, `None` on a shape mismatch
    fn from_action_value(value: ActionValue) -> Option<Self>;
}

impl InputValue for bool {
    fn from_action_value(value: ActionValue) -> Option<Self> {
        match value {
            ActionValue::Button(v) => Some(v),
            ActionValue::Axis(v) => Some(v != 0.0),
            ActionValue::Axis2d(_) => None,
        }
    }
}

impl InputValue for f32 {
    fn from_action_value(value: ActionValue) -> Option<Self> {
        match value {
            ActionValue::Axis(v) => Some(v),
            ActionValue::Button(v) => Some(if v { 1.0 } else { 0.0 }),
            ActionValue::Axis2d(_) => None,
        }
    }
}

impl InputValue for Vec2 {
    fn from_action_value(value: ActionValue) -> Option<Self> {
        match value {
            ActionValue::Axis2d(v) => Some(v),
            _ => None,
        }
    }
}

/// Context handed to listeners when a native action reports an event
#[derive(Debug, Clone, PartialEq)]
pub struct ActionContext {
    /// Name of the native action
    pub action: String,
    /// Phase being reported
    pub kind: EventKind,
    /// Device that originated the event
    pub device: DeviceId,
    /// Control path on the device (e.g. "buttonSouth", "leftShift")
    pub control: String,
    /// Value of the action at the time of the event
    pub value: ActionValue,
    /// Time the event was raised
    pub timestamp: Timestamp,
}

impl ActionContext {
    /// Typed read of the event value, sentinel on a shape mismatch
    pub fn read<V: InputValue>(&self) -> V {
        V::from_action_value(self.value).unwrap_or_default()
    }
}

/// Ticket under which a listener is installed on a native event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Listener installed on a native action's event
pub type Listener = Rc<dyn Fn(&ActionContext)>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_extraction() {
        assert!(bool::from_action_value(ActionValue::Button(true)).unwrap());
        assert_eq!(f32::from_action_value(ActionValue::Axis(0.5)), Some(0.5));
        assert_eq!(f32::from_action_value(ActionValue::Button(true)), Some(1.0));
        assert_eq!(
            Vec2::from_action_value(ActionValue::Axis2d(Vec2::new(1.0, -1.0))),
            Some(Vec2::new(1.0, -1.0))
        );
        assert_eq!(Vec2::from_action_value(ActionValue::Axis(1.0)), None);
    }

    #[test]
    fn test_context_read_falls_back_to_default() {
        let context = ActionContext {
            action: "Move".to_string(),
            kind: EventKind::Performed,
            device: DeviceId(1),
            control: "leftStick".to_string(),
            value: ActionValue::Axis(0.25),
            timestamp: Utc::now(),
        };

        assert_eq!(context.read::<f32>(), 0.25);
        assert_eq!(context.read::<Vec2>(), Vec2::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", EventKind::Canceled), "canceled");
        assert_eq!(format!("{}", DeviceId(3)), "device#3");
        assert_eq!(format!("{}", ActionValue::Axis(0.5)), "0.500");
        assert_eq!(format!("{}", ActionValue::Button(true)), "true");
    }

    #[test]
    fn test_value_deserialization() {
        #[derive(Deserialize)]
        struct Holder {
            value: ActionValue,
        }

        let holder: Holder = toml::from_str("value = true").unwrap();
        assert_eq!(holder.value, ActionValue::Button(true));
        let holder: Holder = toml::from_str("value = 0.5").unwrap();
        assert_eq!(holder.value, ActionValue::Axis(0.5));
        let holder: Holder = toml::from_str("value = { x = 1.0, y = 0.0 }").unwrap();
        assert_eq!(holder.value, ActionValue::Axis2d(Vec2::new(1.0, 0.0)));
    }
}
