//! Typed Input Library
//!
//! A thin façade over a host input framework that lets client code address
//! input actions by enum keys instead of string lookups, and subscribe to their
//! events through handles that can be disposed deterministically.
//!
//! # Architecture
//!
//! The library is intentionally small:
//! - [`ActionRegistry`] resolves each key to a native action once, at registration
//! - [`SubscriptionLedger`] records which callback is installed on which event,
//!   keyed by (key, callback identity, event kind)
//! - [`Subscription`] / [`SubscriptionGuard`] undo a registration exactly once
//! - [`InputActions`] combines them and adds a global enable gate and an
//!   optional per-device filter
//!
//! The library does NOT:
//! - Poll devices or read hardware state
//! - Parse action maps or bindings
//! - Decide when events fire
//!
//! Those belong to the host framework, reached through the [`backend`] traits.
//! [`simulated`] provides an in-process framework for tests and tools.
//!
//! # Example Usage
//!
//! ```
//! use typed_input::simulated::InputAsset;
//! use typed_input::{BindingConfig, Callback, DeviceId, InputActions};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum PlayerAction { Sprint, Jump }
//!
//! let asset = InputAsset::from_toml_str(r#"
//!     [[maps]]
//!     name = "Player"
//!     actions = [{ name = "Sprint" }, { name = "JumpButton" }]
//! "#).unwrap();
//!
//! let actions = InputActions::new(asset.clone());
//! actions.apply_config(
//!     &BindingConfig::new("Player")
//!         .bind(PlayerAction::Sprint)
//!         .bind_named(PlayerAction::Jump, "JumpButton"),
//! );
//!
//! let on_jump = Callback::new(|context| println!("jump via {}", context.control));
//! let _subscription = actions.register_performed(PlayerAction::Jump, &on_jump).scoped();
//!
//! asset.action("Player", "JumpButton").unwrap().press(DeviceId(1), "space");
//! assert!(actions.was_pressed_this_frame(PlayerAction::Jump));
//! ```

// Public modules
pub mod actions;
pub mod backend;
pub mod callback;
pub mod config;
pub mod ledger;
pub mod registry;
pub mod simulated;
pub mod subscription;
pub mod types;

// Re-export main types for convenience
pub use actions::InputActions;
pub use backend::{ActionMapProvider, NativeAction};
pub use callback::{Callback, CallbackId};
pub use config::{ActionBinding, BindingConfig, InstanceOptions};
pub use ledger::{DeliveryGate, SubscriptionKey, SubscriptionLedger};
pub use registry::{ActionKey, ActionRegistry};
pub use subscription::{Subscription, SubscriptionGuard};
pub use types::{
    ActionContext, ActionValue, DeviceId, DeviceInfo, EventKind, InputError, InputValue,
    Listener, ListenerId, Result, Timestamp, Vec2,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
