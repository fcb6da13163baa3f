//! Scenario journal
//!
//! Everything observable during a scenario run is appended to a [`Journal`]:
//! callback invocations, subscription outcomes and query results.

use crate::config::{PlayerAction, QueryKind};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use typed_input::{ActionValue, DeviceId, EventKind};

/// One observation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JournalEntry {
    /// A client callback was invoked
    Callback {
        step: usize,
        callback: String,
        kind: EventKind,
        action: String,
        device: DeviceId,
        control: String,
        value: ActionValue,
        /// Microseconds since the run started
        offset_us: i64,
    },
    /// A `subscribe` step completed
    Subscribed {
        step: usize,
        label: String,
        active: bool,
    },
    /// A `query` step completed
    Query {
        step: usize,
        instance: String,
        key: PlayerAction,
        query: QueryKind,
        result: String,
    },
}

impl JournalEntry {
    pub fn step(&self) -> usize {
        match self {
            JournalEntry::Callback { step, .. } => *step,
            JournalEntry::Subscribed { step, .. } => *step,
            JournalEntry::Query { step, .. } => *step,
        }
    }
}

/// Shared, append-only log of a run
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Rc<RefCell<Vec<JournalEntry>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: JournalEntry) {
        self.entries.borrow_mut().push(entry);
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.borrow().clone()
    }

    /// Number of invocations recorded for the callback named `name`
    pub fn callback_count(&self, name: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| matches!(entry, JournalEntry::Callback { callback, .. } if callback == name))
            .count()
    }
}
