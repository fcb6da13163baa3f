//! Subscription ledger
//!
//! Tracks which client callbacks are installed on which native events. Each
//! entry is keyed by (action key, callback identity, event kind) and owns the
//! wrapper that was attached to the native action, together with the ticket the
//! action issued for it.
//!
//! The wrapper is built by a [`DeliveryGate`]: it drops events from other
//! devices, then events arriving while the instance is globally disabled, and
//! only then forwards to the client callback.

use crate::callback::{Callback, CallbackId};
use crate::registry::ActionKey;
use crate::types::{ActionContext, DeviceId, EventKind, Listener, ListenerId};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// Composite ledger key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionKey<K> {
    pub key: K,
    pub callback: CallbackId,
    pub kind: EventKind,
}

impl<K> SubscriptionKey<K> {
    pub fn new(key: K, callback: &Callback, kind: EventKind) -> Self {
        Self {
            key,
            callback: callback.id(),
            kind,
        }
    }
}

/// Conditions an event must meet before it reaches client code
#[derive(Clone)]
pub struct DeliveryGate {
    enabled: Rc<Cell<bool>>,
    device: Option<DeviceId>,
}

impl DeliveryGate {
    pub fn new(enabled: bool, device: Option<DeviceId>) -> Self {
        Self {
            enabled: Rc::new(Cell::new(enabled)),
            device,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    pub fn device(&self) -> Option<DeviceId> {
        self.device
    }

    /// Whether input attributed to `device` passes the device filter
    pub fn accepts_device(&self, device: Option<DeviceId>) -> bool {
        match self.device {
            Some(filter) => device == Some(filter),
            None => true,
        }
    }

    /// Whether an event should be forwarded: device filter first, then the enable flag
    pub fn admits(&self, context: &ActionContext) -> bool {
        self.accepts_device(Some(context.device)) && self.enabled.get()
    }

    /// Wrap `callback` so that it only sees admitted events
    pub fn wrap(&self, callback: &Callback) -> Listener {
        let gate = self.clone();
        let callback = callback.clone();
        Rc::new(move |context: &ActionContext| {
            if gate.admits(context) {
                callback.call(context);
            } else {
                log::trace!("Dropped {} on {} from {}", context.kind, context.action, context.device);
            }
        })
    }
}

struct LedgerEntry {
    listener_id: ListenerId,
    // Installed on the native event; kept so the entry owns its wrapper.
    _wrapper: Listener,
    // Keeps the callback allocation, and so its identity, alive.
    _callback: Callback,
}

/// An installed subscription removed from the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removed<K> {
    pub key: K,
    pub kind: EventKind,
    pub listener_id: ListenerId,
}

/// (key, callback, kind) → installed wrapper
pub struct SubscriptionLedger<K> {
    entries: HashMap<SubscriptionKey<K>, LedgerEntry>,
}

impl<K: ActionKey> SubscriptionLedger<K> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn contains(&self, subscription: &SubscriptionKey<K>) -> bool {
        self.entries.contains_key(subscription)
    }

    /// Record a new subscription, handing its wrapper to `attach` for installation.
    ///
    /// `attach` returns the ticket the native action issued. Returns `None`,
    /// without calling `attach`, if the same (key, callback, kind) is already recorded.
    pub fn insert(
        &mut self,
        subscription: SubscriptionKey<K>,
        callback: &Callback,
        gate: &DeliveryGate,
        attach: impl FnOnce(Listener) -> ListenerId,
    ) -> Option<ListenerId> {
        if self.entries.contains_key(&subscription) {
            return None;
        }

        let wrapper = gate.wrap(callback);
        let listener_id = attach(Rc::clone(&wrapper));

        self.entries.insert(
            subscription,
            LedgerEntry {
                listener_id,
                _wrapper: wrapper,
                _callback: callback.clone(),
            },
        );

        Some(listener_id)
    }

    /// Remove a subscription, returning the ticket its wrapper was installed under
    pub fn remove(&mut self, subscription: &SubscriptionKey<K>) -> Option<ListenerId> {
        self.entries.remove(subscription).map(|entry| entry.listener_id)
    }

    /// Remove every subscription
    pub fn drain(&mut self) -> Vec<Removed<K>> {
        self.entries
            .drain()
            .map(|(subscription, entry)| Removed {
                key: subscription.key,
                kind: subscription.kind,
                listener_id: entry.listener_id,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of subscriptions for one event kind
    pub fn count(&self, kind: EventKind) -> usize {
        self.entries.keys().filter(|subscription| subscription.kind == kind).count()
    }
}

impl<K: ActionKey> Default for SubscriptionLedger<K> {
    fn default() -> Self {
        Self::new()
    }
}
