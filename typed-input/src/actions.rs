//! Typed input façade
//!
//! [`InputActions`] combines the action registry and the subscription ledger
//! behind one API keyed by a client enum. It is meant to be driven from
//! declarative setup code and a frame loop, so nothing here fails loudly:
//! - configuration mistakes (unknown map/action, duplicate key) are logged and
//!   the registration is skipped
//! - queries on unregistered keys log an error and return the sentinel
//! - duplicate subscriptions log a warning and leave the first one in place
//!
//! All state is shared through `Rc`, so an instance belongs to the thread that
//! created it. Subscription handles keep only a weak reference to it.

use crate::backend::{ActionMapProvider, NativeAction};
use crate::callback::Callback;
use crate::config::{BindingConfig, InstanceOptions};
use crate::ledger::{DeliveryGate, SubscriptionKey, SubscriptionLedger};
use crate::registry::{ActionKey, ActionRegistry};
use crate::subscription::Subscription;
use crate::types::{DeviceId, DeviceInfo, EventKind, InputValue};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

struct Shared<K, P: ActionMapProvider> {
    provider: RefCell<Option<P>>,
    registry: RefCell<ActionRegistry<K, P::Action>>,
    ledger: RefCell<SubscriptionLedger<K>>,
    gate: DeliveryGate,
    disposed: Cell<bool>,
}

/// Typed actions over an action-map provider.
///
/// ```
/// use typed_input::simulated::{AssetDefinition, InputAsset, MapDefinition, ValueType};
/// use typed_input::{Callback, DeviceId, InputActions};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum PlayerAction { Sprint }
///
/// let asset = InputAsset::from_definition(
///     AssetDefinition::new().with_map(MapDefinition::new("Player").with_action("Sprint", ValueType::Button)),
/// ).unwrap();
///
/// let actions = InputActions::new(asset.clone());
/// actions.register_action("Player", PlayerAction::Sprint);
///
/// let on_sprint = Callback::new(|context| println!("sprint from {}", context.device));
/// let mut subscription = actions.register_performed(PlayerAction::Sprint, &on_sprint);
///
/// asset.action("Player", "Sprint").unwrap().press(DeviceId(1), "leftShift");
/// assert!(actions.is_pressed(PlayerAction::Sprint));
///
/// subscription.dispose();
/// ```
pub struct InputActions<K: ActionKey, P: ActionMapProvider> {
    shared: Rc<Shared<K, P>>,
}

impl<K: ActionKey, P: ActionMapProvider> InputActions<K, P> {
    /// Create an unfiltered, enabled instance
    pub fn new(provider: P) -> Self {
        Self::with_options(provider, InstanceOptions::default())
    }

    /// Create an instance that only sees input from `device`
    pub fn for_device(provider: P, device: DeviceId) -> Self {
        Self::with_options(provider, InstanceOptions::new().with_device(device))
    }

    /// Create an instance from explicit options
    pub fn with_options(provider: P, options: InstanceOptions) -> Self {
        log::debug!(
            "Creating input actions (device filter: {:?}, enabled: {})",
            options.device,
            options.start_enabled
        );

        Self {
            shared: Rc::new(Shared {
                provider: RefCell::new(Some(provider)),
                registry: RefCell::new(ActionRegistry::new()),
                ledger: RefCell::new(SubscriptionLedger::new()),
                gate: DeliveryGate::new(options.start_enabled, options.device),
                disposed: Cell::new(false),
            }),
        }
    }

    /// One device-filtered instance per device of `class`, all sharing `provider`
    pub fn per_device(provider: P, class: &str) -> Vec<(DeviceInfo, Self)> {
        let instances: Vec<_> = provider
            .devices()
            .into_iter()
            .filter(|device| device.class == class)
            .map(|device| {
                let instance = Self::for_device(provider.clone(), device.id);
                (device, instance)
            })
            .collect();

        log::debug!("Created {} per-device instances for class {}", instances.len(), class);
        instances
    }

    // ---------------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------------

    /// Bind `key` to the action named after it (its `Debug` form) in `map_name`
    pub fn register_action(&self, map_name: &str, key: K) -> bool {
        self.register_action_named(map_name, key, &key.default_action_name())
    }

    /// Bind `key` to `action_name` in `map_name`.
    ///
    /// Returns false, after logging, when the key is already bound, the map or
    /// action does not exist, or the instance has been disposed.
    pub fn register_action_named(&self, map_name: &str, key: K, action_name: &str) -> bool {
        let provider = self.shared.provider.borrow();
        let Some(provider) = provider.as_ref() else {
            log::error!("Cannot register {:?}: input actions have been disposed", key);
            return false;
        };

        self.shared
            .registry
            .borrow_mut()
            .register(provider, map_name, key, action_name)
    }

    /// Apply every binding of `config`, returning how many were registered
    pub fn apply_config(&self, config: &BindingConfig<K>) -> usize {
        let registered = config
            .actions
            .iter()
            .filter(|binding| match &binding.action {
                Some(action) => self.register_action_named(&config.map, binding.key, action),
                None => self.register_action(&config.map, binding.key),
            })
            .count();

        if registered < config.actions.len() {
            log::warn!(
                "Registered {} of {} bindings from map {}",
                registered,
                config.actions.len(),
                config.map
            );
        }
        registered
    }

    /// Whether `key` is bound
    pub fn is_registered(&self, key: K) -> bool {
        self.shared.registry.borrow().contains(&key)
    }

    /// All bound keys, in no particular order
    pub fn registered_keys(&self) -> Vec<K> {
        self.shared.registry.borrow().keys().copied().collect()
    }

    // ---------------------------------------------------------------------
    // Enable / disable
    // ---------------------------------------------------------------------

    /// Let state queries and callbacks through
    pub fn enable(&self) {
        if self.shared.disposed.get() {
            log::warn!("Ignoring enable(): input actions have been disposed");
            return;
        }
        self.shared.gate.set_enabled(true);
    }

    /// Suppress state queries and callbacks. Native actions are left untouched.
    pub fn disable(&self) {
        self.shared.gate.set_enabled(false);
    }

    /// Global enable flag
    pub fn is_enabled(&self) -> bool {
        self.shared.gate.is_enabled()
    }

    /// Enable the native action bound to `key`
    pub fn enable_action(&self, key: K) {
        self.with_action(key, "enable_action", |action| action.enable());
    }

    /// Disable the native action bound to `key`
    pub fn disable_action(&self, key: K) {
        self.with_action(key, "disable_action", |action| action.disable());
    }

    /// The native action's own enabled flag, independent of the global flag
    pub fn is_action_enabled(&self, key: K) -> bool {
        self.with_action(key, "is_action_enabled", |action| action.is_enabled())
            .unwrap_or(false)
    }

    // ---------------------------------------------------------------------
    // State queries
    // ---------------------------------------------------------------------

    pub fn is_pressed(&self, key: K) -> bool {
        self.query(key, "is_pressed", |action| action.is_pressed())
    }

    pub fn was_pressed_this_frame(&self, key: K) -> bool {
        self.query(key, "was_pressed_this_frame", |action| action.was_pressed_this_frame())
    }

    pub fn was_released_this_frame(&self, key: K) -> bool {
        self.query(key, "was_released_this_frame", |action| action.was_released_this_frame())
    }

    /// Typed value of the action bound to `key`; `V::default()` when suppressed
    pub fn read_value<V: InputValue>(&self, key: K) -> V {
        self.query(key, "read_value", |action| {
            let value = action.read_value();
            V::from_action_value(value).unwrap_or_else(|| {
                log::warn!(
                    "read_value: action {:?} reports {:?}, which does not convert to {}",
                    key,
                    value,
                    std::any::type_name::<V>()
                );
                V::default()
            })
        })
    }

    // ---------------------------------------------------------------------
    // Subscriptions
    // ---------------------------------------------------------------------

    pub fn register_started(&self, key: K, callback: &Callback) -> Subscription {
        self.register(EventKind::Started, key, callback)
    }

    pub fn register_performed(&self, key: K, callback: &Callback) -> Subscription {
        self.register(EventKind::Performed, key, callback)
    }

    pub fn register_canceled(&self, key: K, callback: &Callback) -> Subscription {
        self.register(EventKind::Canceled, key, callback)
    }

    /// Install `callback` on the `kind` event of the action bound to `key`.
    ///
    /// Returns an empty subscription if the key is not bound, the instance is
    /// disposed, or this exact (key, callback, kind) is already installed.
    pub fn register(&self, kind: EventKind, key: K, callback: &Callback) -> Subscription {
        if self.shared.disposed.get() {
            log::error!("Cannot subscribe to {} on {:?}: input actions have been disposed", kind, key);
            return Subscription::empty();
        }

        let registry = self.shared.registry.borrow();
        let Some(action) = registry.get(&key) else {
            log::error!("Cannot subscribe to {} on {:?}: action is not registered", kind, key);
            return Subscription::empty();
        };

        let subscription = SubscriptionKey::new(key, callback, kind);
        let installed = self.shared.ledger.borrow_mut().insert(
            subscription,
            callback,
            &self.shared.gate,
            |wrapper| action.attach(kind, wrapper),
        );

        let Some(listener_id) = installed else {
            log::warn!("Callback is already subscribed to {} on {:?}, ignoring", kind, key);
            return Subscription::empty();
        };
        log::trace!("Subscribed {:?} to {} on {:?} as {:?}", callback, kind, key, listener_id);

        let weak: Weak<Shared<K, P>> = Rc::downgrade(&self.shared);
        Subscription::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.unsubscribe(&subscription, true);
            }
        })
    }

    pub fn unregister_started(&self, key: K, callback: &Callback) {
        self.unregister(EventKind::Started, key, callback);
    }

    pub fn unregister_performed(&self, key: K, callback: &Callback) {
        self.unregister(EventKind::Performed, key, callback);
    }

    pub fn unregister_canceled(&self, key: K, callback: &Callback) {
        self.unregister(EventKind::Canceled, key, callback);
    }

    /// Remove `callback` from the `kind` event of `key`. Logs if nothing matches.
    pub fn unregister(&self, kind: EventKind, key: K, callback: &Callback) {
        self.shared
            .unsubscribe(&SubscriptionKey::new(key, callback, kind), false);
    }

    /// Number of installed subscriptions
    pub fn subscription_count(&self) -> usize {
        self.shared.ledger.borrow().len()
    }

    // ---------------------------------------------------------------------
    // Teardown
    // ---------------------------------------------------------------------

    /// Detach every callback, drop every action handle and the provider, and
    /// disable the instance. Safe to call more than once.
    pub fn dispose(&self) {
        self.shared.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.get()
    }

    /// Device this instance is filtered to
    pub fn device_filter(&self) -> Option<DeviceId> {
        self.shared.gate.device()
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn with_action<T>(&self, key: K, operation: &str, f: impl FnOnce(&P::Action) -> T) -> Option<T> {
        let registry = self.shared.registry.borrow();
        match registry.get(&key) {
            Some(action) => Some(f(action)),
            None => {
                log::error!("{}: action {:?} is not registered", operation, key);
                None
            }
        }
    }

    /// Gated state query: global flag, then registration, then device filter
    fn query<T: Default>(&self, key: K, operation: &str, f: impl FnOnce(&P::Action) -> T) -> T {
        if !self.shared.gate.is_enabled() {
            return T::default();
        }

        self.with_action(key, operation, |action| {
            if self.shared.gate.accepts_device(action.active_device()) {
                f(action)
            } else {
                T::default()
            }
        })
        .unwrap_or_default()
    }
}

impl<K: ActionKey, P: ActionMapProvider> Shared<K, P> {
    /// Remove one subscription and detach its wrapper.
    ///
    /// `from_handle` marks calls coming from a [`Subscription`]; those stay quiet
    /// when the instance was disposed underneath them.
    fn unsubscribe(&self, subscription: &SubscriptionKey<K>, from_handle: bool) {
        let key = subscription.key;
        let kind = subscription.kind;

        let registry = self.registry.borrow();
        let Some(action) = registry.get(&key) else {
            if from_handle && self.disposed.get() {
                log::debug!("Subscription to {} on {:?} outlived its input actions", kind, key);
            } else {
                log::error!("Cannot unsubscribe from {} on {:?}: action is not registered", kind, key);
            }
            return;
        };

        let Some(listener_id) = self.ledger.borrow_mut().remove(subscription) else {
            log::error!("Cannot unsubscribe from {} on {:?}: no matching subscription", kind, key);
            return;
        };

        if !action.detach(kind, listener_id) {
            log::warn!("Listener for {} on {:?} was already detached from the native action", kind, key);
        }
        log::trace!("Unsubscribed from {} on {:?}", kind, key);
    }

    fn dispose(&self) {
        let removed = self.ledger.borrow_mut().drain();
        {
            let registry = self.registry.borrow();
            for entry in &removed {
                if let Some(action) = registry.get(&entry.key) {
                    action.detach(entry.kind, entry.listener_id);
                }
            }
        }

        self.registry.borrow_mut().clear();
        self.provider.borrow_mut().take();
        self.gate.set_enabled(false);

        if !self.disposed.replace(true) {
            log::debug!("Disposed input actions ({} subscriptions detached)", removed.len());
        }
    }
}

impl<K: ActionKey, P: ActionMapProvider> Drop for InputActions<K, P> {
    fn drop(&mut self) {
        self.shared.dispose();
    }
}
