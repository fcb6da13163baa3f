//! Host input framework interface
//!
//! The façade never polls hardware or parses action maps itself. It talks to
//! whatever framework the host runtime provides through these two traits:
//! - [`ActionMapProvider`] resolves map and action names to native handles
//! - [`NativeAction`] exposes the state of one resolved action and its events
//!
//! The crate ships one implementation, [`crate::simulated`], used for tests,
//! demos and the scenario runner.

use crate::types::{ActionValue, DeviceId, DeviceInfo, EventKind, Listener, ListenerId};

/// A resolved action owned by the host framework.
///
/// Handles are shared references: cloning one must yield a handle to the same
/// underlying action, and all methods take `&self`.
pub trait NativeAction: Clone + 'static {
    /// Name of the action inside its map
    fn name(&self) -> &str;

    /// Enable the action so that it reports state and events
    fn enable(&self);

    /// Disable the action
    fn disable(&self);

    /// Whether the action is currently enabled
    fn is_enabled(&self) -> bool;

    /// Whether the action's control is currently held
    fn is_pressed(&self) -> bool;

    /// Whether the control went down during the current frame
    fn was_pressed_this_frame(&self) -> bool;

    /// Whether the control went up during the current frame
    fn was_released_this_frame(&self) -> bool;

    /// Current value of the action
    fn read_value(&self) -> ActionValue;

    /// Device driving the action right now, if any
    fn active_device(&self) -> Option<DeviceId>;

    /// Install `listener` on the `kind` event and return its ticket.
    ///
    /// Tickets are issued by the action and never repeat on it, so several
    /// façade instances can share one action without their listeners colliding.
    fn attach(&self, kind: EventKind, listener: Listener) -> ListenerId;

    /// Remove the listener installed under `id`. Returns false if none was installed.
    fn detach(&self, kind: EventKind, id: ListenerId) -> bool;
}

/// Resolves action maps and actions by name.
pub trait ActionMapProvider: Clone + 'static {
    /// Handle to a resolved action map
    type Map;

    /// Handle to a resolved action
    type Action: NativeAction;

    /// Look up an action map by name
    fn find_action_map(&self, name: &str) -> Option<Self::Map>;

    /// Look up an action by name inside a resolved map
    fn find_action(&self, map: &Self::Map, name: &str) -> Option<Self::Action>;

    /// Devices currently known to the framework
    fn devices(&self) -> Vec<DeviceInfo>;
}
