//! Task status sink
//!
//! Append-only, human-readable progress messages keyed by a phase label.
//! The planner only writes to it.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

pub trait TaskSink: Send + Sync {
    fn update_status(&self, phase: &str, message: &str);
}

/// Forwards status messages to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTask;

impl TaskSink for TracingTask {
    fn update_status(&self, phase: &str, message: &str) {
        tracing::info!(phase, "{}", message);
    }
}

/// Single recorded status message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub phase: String,
    pub message: String,
}

/// Keeps every status message in order, and also logs it
#[derive(Debug, Default)]
pub struct RecordingTask {
    entries: Mutex<Vec<StatusEntry>>,
}

impl RecordingTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all messages recorded so far
    pub fn entries(&self) -> Vec<StatusEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages only, in recording order
    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }
}

impl TaskSink for RecordingTask {
    fn update_status(&self, phase: &str, message: &str) {
        tracing::info!(phase, "{}", message);
        let entry = StatusEntry {
            phase: phase.to_string(),
            message: message.to_string(),
        };
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}
