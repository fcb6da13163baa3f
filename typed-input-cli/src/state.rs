//! Scenario execution
//!
//! Builds the simulated asset and the façade instances a scenario describes,
//! then runs its steps in order. Input steps drive the simulated framework
//! directly; everything else goes through [`InputActions`] exactly as client
//! code would.

use crate::callbacks::CallbackTable;
use crate::config::{ActionRef, InstanceConfig, PlayerAction, QueryKind, Scenario, Step};
use crate::events::{Journal, JournalEntry};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use typed_input::simulated::{InputAsset, SimulatedAction};
use typed_input::{InputActions, InputError, InstanceOptions, Subscription, Vec2};

/// Errors that abort a scenario
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Invalid asset: {0}")]
    Asset(#[from] InputError),

    #[error("Duplicate instance name: {0}")]
    DuplicateInstance(String),

    #[error("Step {step}: unknown instance '{name}'")]
    UnknownInstance { step: usize, name: String },

    #[error("Step {step}: unknown action {target}")]
    UnknownAction { step: usize, target: String },

    #[error("Step {step}: unknown subscription '{label}'")]
    UnknownSubscription { step: usize, label: String },
}

type Actions = InputActions<PlayerAction, InputAsset>;

/// Summary of one instance after a run
#[derive(Debug, Clone, serde::Serialize)]
pub struct InstanceSummary {
    pub name: String,
    pub device: Option<String>,
    pub registered: usize,
    pub bindings: usize,
    pub enabled: bool,
    pub disposed: bool,
    pub subscriptions: usize,
}

/// Runs one scenario
pub struct ScenarioRunner {
    asset: InputAsset,
    instances: Vec<(String, Actions, usize)>,
    subscriptions: HashMap<String, Subscription>,
    callbacks: CallbackTable,
    journal: Journal,
    current_step: Rc<Cell<usize>>,
}

impl ScenarioRunner {
    /// Build the asset and every instance of `scenario`
    pub fn new(scenario: &Scenario) -> Result<Self, ScenarioError> {
        let asset = InputAsset::from_definition(scenario.asset.clone())?;
        let journal = Journal::new();
        let current_step = Rc::new(Cell::new(0));

        let mut runner = Self {
            callbacks: CallbackTable::new(journal.clone(), Rc::clone(&current_step)),
            asset,
            instances: Vec::new(),
            subscriptions: HashMap::new(),
            journal,
            current_step,
        };

        for instance in &scenario.instances {
            runner.add_instance(instance)?;
        }
        Ok(runner)
    }

    fn add_instance(&mut self, config: &InstanceConfig) -> Result<(), ScenarioError> {
        if self.instances.iter().any(|(name, _, _)| name == &config.name) {
            return Err(ScenarioError::DuplicateInstance(config.name.clone()));
        }

        let mut options = InstanceOptions::new().with_start_enabled(config.start_enabled);
        if let Some(device) = config.device {
            options = options.with_device(device);
        }

        let actions = InputActions::with_options(self.asset.clone(), options);
        let registered = actions.apply_config(&config.bindings);
        log::info!(
            "Instance {}: {}/{} bindings registered",
            config.name,
            registered,
            config.bindings.actions.len()
        );

        self.instances.push((config.name.clone(), actions, config.bindings.actions.len()));
        Ok(())
    }

    /// Run every step. Stops at the first step that references something unknown.
    pub fn run(&mut self, steps: &[Step]) -> Result<(), ScenarioError> {
        for (index, step) in steps.iter().enumerate() {
            let number = index + 1;
            self.current_step.set(number);
            log::debug!("Step {}: {}", number, step.name());
            self.execute(number, step)?;
        }
        Ok(())
    }

    fn execute(&mut self, step: usize, op: &Step) -> Result<(), ScenarioError> {
        match op {
            Step::Press { target, device, control } => {
                self.action(step, target)?.press(*device, control);
            }
            Step::Release { target, device, control } => {
                self.action(step, target)?.release(*device, control);
            }
            Step::SetValue { target, device, control, value } => {
                self.action(step, target)?.set_value(*device, control, *value);
            }
            Step::Fire { target, kind, device, control } => {
                self.action(step, target)?.fire(*kind, *device, control);
            }
            Step::EndFrame => self.asset.end_frame(),
            Step::Enable { instance } => self.instance(step, instance)?.enable(),
            Step::Disable { instance } => self.instance(step, instance)?.disable(),
            Step::EnableAction { instance, key } => self.instance(step, instance)?.enable_action(*key),
            Step::DisableAction { instance, key } => self.instance(step, instance)?.disable_action(*key),
            Step::Subscribe { label, instance, key, kind, callback } => {
                let callback = self.callbacks.get_or_create(callback);
                let subscription = self.instance(step, instance)?.register(*kind, *key, &callback);
                let active = subscription.is_active();

                if let Some(mut previous) = self.subscriptions.insert(label.clone(), subscription) {
                    log::warn!("Step {}: label '{}' reused, disposing the previous subscription", step, label);
                    previous.dispose();
                }

                self.journal.push(JournalEntry::Subscribed {
                    step,
                    label: label.clone(),
                    active,
                });
            }
            Step::Unsubscribe { instance, key, kind, callback } => {
                let callback = self.callbacks.get_or_create(callback);
                self.instance(step, instance)?.unregister(*kind, *key, &callback);
            }
            Step::DisposeSubscription { label } => {
                let subscription = self
                    .subscriptions
                    .get_mut(label)
                    .ok_or_else(|| ScenarioError::UnknownSubscription {
                        step,
                        label: label.clone(),
                    })?;
                subscription.dispose();
            }
            Step::DisposeInstance { instance } => self.instance(step, instance)?.dispose(),
            Step::Query { instance, key, query } => {
                let result = Self::query(self.instance(step, instance)?, *key, *query);
                self.journal.push(JournalEntry::Query {
                    step,
                    instance: instance.clone(),
                    key: *key,
                    query: *query,
                    result,
                });
            }
        }
        Ok(())
    }

    fn query(actions: &Actions, key: PlayerAction, query: QueryKind) -> String {
        match query {
            QueryKind::IsPressed => actions.is_pressed(key).to_string(),
            QueryKind::WasPressedThisFrame => actions.was_pressed_this_frame(key).to_string(),
            QueryKind::WasReleasedThisFrame => actions.was_released_this_frame(key).to_string(),
            QueryKind::IsActionEnabled => actions.is_action_enabled(key).to_string(),
            QueryKind::ReadButton => actions.read_value::<bool>(key).to_string(),
            QueryKind::ReadAxis => format!("{:.3}", actions.read_value::<f32>(key)),
            QueryKind::ReadAxis2d => {
                let value = actions.read_value::<Vec2>(key);
                format!("({:.3}, {:.3})", value.x, value.y)
            }
        }
    }

    fn action(&self, step: usize, target: &ActionRef) -> Result<SimulatedAction, ScenarioError> {
        self.asset
            .action(&target.map, &target.action)
            .ok_or_else(|| ScenarioError::UnknownAction {
                step,
                target: target.to_string(),
            })
    }

    fn instance(&self, step: usize, name: &str) -> Result<&Actions, ScenarioError> {
        self.instances
            .iter()
            .find(|(instance, _, _)| instance == name)
            .map(|(_, actions, _)| actions)
            .ok_or_else(|| ScenarioError::UnknownInstance {
                step,
                name: name.to_string(),
            })
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn asset_name(&self) -> &str {
        self.asset.name()
    }

    pub fn instance_summaries(&self) -> Vec<InstanceSummary> {
        self.instances
            .iter()
            .map(|(name, actions, bindings)| InstanceSummary {
                name: name.clone(),
                device: actions.device_filter().map(|device| {
                    self.asset
                        .device(device)
                        .map(|info| info.name.clone())
                        .unwrap_or_else(|| device.to_string())
                }),
                registered: actions.registered_keys().len(),
                bindings: *bindings,
                enabled: actions.is_enabled(),
                disposed: actions.is_disposed(),
                subscriptions: actions.subscription_count(),
            })
            .collect()
    }
}
