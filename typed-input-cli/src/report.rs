//! Report generation
//!
//! Renders the outcome of a scenario run as plain text or JSON.

use crate::events::JournalEntry;
use crate::state::InstanceSummary;
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;

/// Everything a report shows
#[derive(Debug, Serialize)]
pub struct Report {
    pub asset: String,
    pub steps: usize,
    pub instances: Vec<InstanceSummary>,
    pub journal: Vec<JournalEntry>,
}

impl Report {
    /// Render as text with section banners
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let rule = "═══════════════════════════════════════════════";

        // Writing to a String cannot fail
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "  Scenario Report - {}", self.asset);
        let _ = writeln!(out, "{}\n", rule);

        let _ = writeln!(out, "Instances:");
        for instance in &self.instances {
            let _ = writeln!(
                out,
                "  {:<12} device={:<12} actions={}/{} subscriptions={} enabled={}{}",
                instance.name,
                instance.device.as_deref().unwrap_or("any"),
                instance.registered,
                instance.bindings,
                instance.subscriptions,
                instance.enabled,
                if instance.disposed { " (disposed)" } else { "" }
            );
        }

        let _ = writeln!(out, "\nJournal ({} steps):", self.steps);
        let _ = writeln!(out, "───────────────────────────────────────────────");
        if self.journal.is_empty() {
            let _ = writeln!(out, "  (nothing recorded)");
        }
        for entry in &self.journal {
            let _ = writeln!(out, "  {}", describe(entry));
        }

        out
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn describe(entry: &JournalEntry) -> String {
    match entry {
        JournalEntry::Callback {
            step,
            callback,
            kind,
            action,
            device,
            control,
            value,
            offset_us,
        } => format!(
            "[{:>3}] callback  {} <- {} {} from {} ({}) value={} +{}us",
            step, callback, kind, action, device, control, value, offset_us
        ),
        JournalEntry::Subscribed { step, label, active } => format!(
            "[{:>3}] subscribe {} {}",
            step,
            label,
            if *active { "active" } else { "rejected" }
        ),
        JournalEntry::Query {
            step,
            instance,
            key,
            query,
            result,
        } => format!("[{:>3}] query     {}.{}({}) = {}", step, instance, query, key, result),
    }
}
