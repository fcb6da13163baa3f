//! Recording callbacks
//!
//! Scenario callbacks are named. Every `subscribe` step that uses the same name
//! gets the same [`Callback`], so the façade sees one callback identity and
//! duplicate subscriptions are suppressed exactly as they would be in client code.

use crate::events::{Journal, JournalEntry};
use chrono::Utc;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use typed_input::{Callback, Timestamp};

/// Named callbacks that record their invocations into a journal
pub struct CallbackTable {
    journal: Journal,
    current_step: Rc<Cell<usize>>,
    started: Timestamp,
    callbacks: HashMap<String, Callback>,
}

impl CallbackTable {
    pub fn new(journal: Journal, current_step: Rc<Cell<usize>>) -> Self {
        Self {
            journal,
            current_step,
            started: Utc::now(),
            callbacks: HashMap::new(),
        }
    }

    /// The callback named `name`, created on first use
    pub fn get_or_create(&mut self, name: &str) -> Callback {
        if let Some(callback) = self.callbacks.get(name) {
            return callback.clone();
        }

        let journal = self.journal.clone();
        let step = Rc::clone(&self.current_step);
        let started = self.started;
        let label = name.to_string();
        let callback = Callback::new(move |context| {
            let offset_us = (context.timestamp - started).num_microseconds().unwrap_or(i64::MAX);
            log::debug!("Callback {} <- {} {} from {}", label, context.kind, context.action, context.device);
            journal.push(JournalEntry::Callback {
                step: step.get(),
                callback: label.clone(),
                kind: context.kind,
                action: context.action.clone(),
                device: context.device,
                control: context.control.clone(),
                value: context.value,
                offset_us,
            });
        });

        self.callbacks.insert(name.to_string(), callback.clone());
        callback
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }
}
