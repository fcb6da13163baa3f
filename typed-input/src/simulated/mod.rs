//! In-process input framework
//!
//! A small stand-in for an engine's input runtime, implementing the
//! [`crate::backend`] traits. Tests, demos and the scenario runner drive it
//! directly: pressing controls, setting values and ending frames, while the
//! façade only sees it through [`ActionMapProvider`](crate::backend::ActionMapProvider).

pub mod action;
pub mod asset;

pub use action::{SimulatedAction, ValueType, DEFAULT_PRESS_POINT};
pub use asset::{ActionDefinition, AssetDefinition, InputAsset, MapDefinition, SimulatedMap};
