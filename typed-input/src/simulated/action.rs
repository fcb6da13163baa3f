//! In-process native action
//!
//! Holds the state a host framework would keep for one action (enabled flag,
//! pressed state, per-frame edges, current value, active control) and raises
//! started/performed/canceled events to attached listeners.

use crate::backend::NativeAction;
use crate::types::{ActionContext, ActionValue, DeviceId, EventKind, Listener, ListenerId, Vec2};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Magnitude at which an analog value counts as pressed
pub const DEFAULT_PRESS_POINT: f32 = 0.5;

/// Shape of the value an action reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    Button,
    Axis,
    Axis2d,
}

impl ValueType {
    /// Value the action reports while its control is at rest
    pub fn rest_value(&self) -> ActionValue {
        match self {
            ValueType::Button => ActionValue::Button(false),
            ValueType::Axis => ActionValue::Axis(0.0),
            ValueType::Axis2d => ActionValue::Axis2d(Vec2::ZERO),
        }
    }

    /// Value reported when the control is fully pressed
    fn pressed_value(&self) -> ActionValue {
        match self {
            ValueType::Button => ActionValue::Button(true),
            ValueType::Axis => ActionValue::Axis(1.0),
            ValueType::Axis2d => ActionValue::Axis2d(Vec2::new(0.0, 1.0)),
        }
    }
}

fn magnitude(value: ActionValue) -> f32 {
    match value {
        ActionValue::Button(v) => if v { 1.0 } else { 0.0 },
        ActionValue::Axis(v) => v.abs(),
        ActionValue::Axis2d(v) => (v.x * v.x + v.y * v.y).sqrt(),
    }
}

struct ActionState {
    map: String,
    name: String,
    value_type: ValueType,
    enabled: Cell<bool>,
    pressed: Cell<bool>,
    pressed_this_frame: Cell<bool>,
    released_this_frame: Cell<bool>,
    value: Cell<ActionValue>,
    active: RefCell<Option<(DeviceId, String)>>,
    next_listener: Cell<u64>,
    started: RefCell<Vec<(ListenerId, Listener)>>,
    performed: RefCell<Vec<(ListenerId, Listener)>>,
    canceled: RefCell<Vec<(ListenerId, Listener)>>,
}

/// Shared handle to a simulated action. Clones refer to the same action.
#[derive(Clone)]
pub struct SimulatedAction {
    state: Rc<ActionState>,
}

impl SimulatedAction {
    pub(crate) fn new(map: &str, name: &str, value_type: ValueType, enabled: bool) -> Self {
        Self {
            state: Rc::new(ActionState {
                map: map.to_string(),
                name: name.to_string(),
                value_type,
                enabled: Cell::new(enabled),
                pressed: Cell::new(false),
                pressed_this_frame: Cell::new(false),
                released_this_frame: Cell::new(false),
                value: Cell::new(value_type.rest_value()),
                active: RefCell::new(None),
                next_listener: Cell::new(0),
                started: RefCell::new(Vec::new()),
                performed: RefCell::new(Vec::new()),
                canceled: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Name of the map this action belongs to
    pub fn map_name(&self) -> &str {
        &self.state.map
    }

    /// Shape of the value this action reports
    pub fn value_type(&self) -> ValueType {
        self.state.value_type
    }

    /// Number of listeners currently installed on `kind`
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners(kind).borrow().len()
    }

    /// Press the action's control on `device`: raises started then performed
    pub fn press(&self, device: DeviceId, control: &str) {
        self.set_value(device, control, self.state.value_type.pressed_value());
    }

    /// Release the action's control on `device`: raises canceled
    pub fn release(&self, device: DeviceId, control: &str) {
        self.set_value(device, control, self.state.value_type.rest_value());
    }

    /// Drive the action to `value` from `device`.
    ///
    /// Leaving rest raises started and performed, moving while actuated raises
    /// performed, returning to rest raises canceled. Ignored while disabled.
    pub fn set_value(&self, device: DeviceId, control: &str, value: ActionValue) {
        if !self.state.enabled.get() {
            log::trace!("Ignoring input on disabled action {}/{}", self.state.map, self.state.name);
            return;
        }

        let was_actuated = magnitude(self.state.value.get()) > 0.0;
        let actuated = magnitude(value) > 0.0;
        let pressed = magnitude(value) >= DEFAULT_PRESS_POINT;

        if pressed && !self.state.pressed.get() {
            self.state.pressed_this_frame.set(true);
        }
        if !pressed && self.state.pressed.get() {
            self.state.released_this_frame.set(true);
        }
        self.state.pressed.set(pressed);
        self.state.value.set(value);

        match (was_actuated, actuated) {
            (false, true) => {
                self.set_active(device, control);
                self.raise(EventKind::Started, device, control);
                self.raise(EventKind::Performed, device, control);
            }
            (true, true) => {
                self.set_active(device, control);
                self.raise(EventKind::Performed, device, control);
            }
            (true, false) => {
                self.set_active(device, control);
                self.raise(EventKind::Canceled, device, control);
            }
            (false, false) => {}
        }
    }

    /// Raise a single event without touching the action's state. Ignored while disabled.
    pub fn fire(&self, kind: EventKind, device: DeviceId, control: &str) {
        if !self.state.enabled.get() {
            log::trace!("Ignoring {} on disabled action {}/{}", kind, self.state.map, self.state.name);
            return;
        }
        self.raise(kind, device, control);
    }

    /// Clear the per-frame pressed/released edges.
    ///
    /// A control released during the frame stays the active control until here,
    /// so per-device queries still see the release edge.
    pub fn end_frame(&self) {
        self.state.pressed_this_frame.set(false);
        self.state.released_this_frame.set(false);
        if magnitude(self.state.value.get()) == 0.0 {
            *self.state.active.borrow_mut() = None;
        }
    }

    fn set_active(&self, device: DeviceId, control: &str) {
        *self.state.active.borrow_mut() = Some((device, control.to_string()));
    }

    fn listeners(&self, kind: EventKind) -> &RefCell<Vec<(ListenerId, Listener)>> {
        match kind {
            EventKind::Started => &self.state.started,
            EventKind::Performed => &self.state.performed,
            EventKind::Canceled => &self.state.canceled,
        }
    }

    fn raise(&self, kind: EventKind, device: DeviceId, control: &str) {
        // Listeners may attach or detach while being invoked
        let snapshot: Vec<Listener> = self
            .listeners(kind)
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        if snapshot.is_empty() {
            return;
        }

        let context = ActionContext {
            action: self.state.name.clone(),
            kind,
            device,
            control: control.to_string(),
            value: self.state.value.get(),
            timestamp: Utc::now(),
        };

        log::trace!(
            "Raising {} on {}/{} from {} ({} listeners)",
            kind,
            self.state.map,
            self.state.name,
            device,
            snapshot.len()
        );

        for listener in snapshot {
            listener(&context);
        }
    }
}

impl NativeAction for SimulatedAction {
    fn name(&self) -> &str {
        &self.state.name
    }

    fn enable(&self) {
        self.state.enabled.set(true);
    }

    fn disable(&self) {
        self.state.enabled.set(false);
        self.state.pressed.set(false);
        self.state.value.set(self.state.value_type.rest_value());
        *self.state.active.borrow_mut() = None;
    }

    fn is_enabled(&self) -> bool {
        self.state.enabled.get()
    }

    fn is_pressed(&self) -> bool {
        self.state.pressed.get()
    }

    fn was_pressed_this_frame(&self) -> bool {
        self.state.pressed_this_frame.get()
    }

    fn was_released_this_frame(&self) -> bool {
        self.state.released_this_frame.get()
    }

    fn read_value(&self) -> ActionValue {
        self.state.value.get()
    }

    fn active_device(&self) -> Option<DeviceId> {
        self.state.active.borrow().as_ref().map(|(device, _)| *device)
    }

    fn attach(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.state.next_listener.get() + 1);
        self.state.next_listener.set(id.0);
        self.listeners(kind).borrow_mut().push((id, listener));
        id
    }

    fn detach(&self, kind: EventKind, id: ListenerId) -> bool {
        let mut listeners = self.listeners(kind).borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}
