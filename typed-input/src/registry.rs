//! Action registry
//!
//! Maps typed keys to native action handles. Handles are resolved once, when a
//! key is registered, and held until the registry is cleared.

use crate::backend::ActionMapProvider;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Keys identifying logical actions. Implemented for every suitable type;
/// fieldless enums deriving `Debug, Clone, Copy, PartialEq, Eq, Hash` qualify.
///
/// The `Debug` form of a key is its default native action name.
pub trait ActionKey: Copy + Eq + Hash + Debug + 'static {
    /// Action name used when none is given at registration
    fn default_action_name(&self) -> String {
        format!("{:?}", self)
    }
}

impl<T> ActionKey for T where T: Copy + Eq + Hash + Debug + 'static {}

/// A registered key's resolved action
#[derive(Clone)]
pub struct RegisteredAction<A> {
    /// Map the action was resolved in
    pub map: String,
    /// Native handle
    pub action: A,
}

/// Key → native action table
pub struct ActionRegistry<K, A> {
    actions: HashMap<K, RegisteredAction<A>>,
}

impl<K: ActionKey, A: Clone> ActionRegistry<K, A> {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Resolve `action_name` inside `map_name` and bind it to `key`.
    ///
    /// Returns false, after logging, if the key is taken or the map or action
    /// cannot be found.
    pub fn register<P>(&mut self, provider: &P, map_name: &str, key: K, action_name: &str) -> bool
    where
        P: ActionMapProvider<Action = A>,
    {
        if self.actions.contains_key(&key) {
            log::warn!("Action key {:?} is already registered, ignoring {}/{}", key, map_name, action_name);
            return false;
        }

        let Some(map) = provider.find_action_map(map_name) else {
            log::error!("Action map not found: {} (while registering {:?})", map_name, key);
            return false;
        };

        let Some(action) = provider.find_action(&map, action_name) else {
            log::error!("Action not found: {}/{} (while registering {:?})", map_name, action_name, key);
            return false;
        };

        log::debug!("Registered action {:?} -> {}/{}", key, map_name, action_name);
        self.actions.insert(
            key,
            RegisteredAction {
                map: map_name.to_string(),
                action,
            },
        );
        true
    }

    /// Native handle for `key`
    pub fn get(&self, key: &K) -> Option<&A> {
        self.actions.get(key).map(|registered| &registered.action)
    }

    /// Full registration record for `key`
    pub fn entry(&self, key: &K) -> Option<&RegisteredAction<A>> {
        self.actions.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.actions.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.actions.keys()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Drop every handle
    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

impl<K: ActionKey, A: Clone> Default for ActionRegistry<K, A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::{AssetDefinition, InputAsset, MapDefinition, SimulatedAction, ValueType};
    use crate::backend::NativeAction;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Jump,
        Dash,
        Crouch,
    }

    fn asset() -> InputAsset {
        InputAsset::from_definition(
            AssetDefinition::new().with_map(
                MapDefinition::new("Player")
                    .with_action("Jump", ValueType::Button)
                    .with_action("Roll", ValueType::Button),
            ),
        )
        .unwrap()
    }

    #[test]
    fn test_register_by_default_name() {
        let asset = asset();
        let mut registry: ActionRegistry<Key, SimulatedAction> = ActionRegistry::new();

        assert!(registry.register(&asset, "Player", Key::Jump, &Key::Jump.default_action_name()));
        assert_eq!(registry.get(&Key::Jump).map(|a| a.name()), Some("Jump"));
        assert_eq!(registry.entry(&Key::Jump).map(|e| e.map.as_str()), Some("Player"));
    }

    #[test]
    fn test_register_with_explicit_name() {
        let asset = asset();
        let mut registry = ActionRegistry::new();

        assert!(registry.register(&asset, "Player", Key::Dash, "Roll"));
        assert_eq!(registry.get(&Key::Dash).map(|a| a.name()), Some("Roll"));
    }

    #[test]
    fn test_failed_registrations() {
        let asset = asset();
        let mut registry = ActionRegistry::new();

        assert!(registry.register(&asset, "Player", Key::Jump, "Jump"));
        // Duplicate key
        assert!(!registry.register(&asset, "Player", Key::Jump, "Roll"));
        // Unknown map
        assert!(!registry.register(&asset, "Vehicle", Key::Dash, "Roll"));
        // Unknown action
        assert!(!registry.register(&asset, "Player", Key::Crouch, "Crouch"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&Key::Jump).map(|a| a.name()), Some("Jump"));
    }

    #[test]
    fn test_clear() {
        let asset = asset();
        let mut registry = ActionRegistry::new();
        registry.register(&asset, "Player", Key::Jump, "Jump");

        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.contains(&Key::Jump));
    }
}
