//! Operator-facing debug log.
//!
//! Keeps the most recent messages for display and forwards every message to
//! the `log` facade, so a host that installs a logger sees the same stream.

use std::collections::VecDeque;

/// Messages kept for display.
pub const DEBUG_LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, Default)]
pub struct DebugLog {
    entries: VecDeque<String>,
}

impl DebugLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        log::info!("{msg}");
        self.push(msg);
    }

    /// A step that degraded or failed.
    pub fn warn(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        log::warn!("{msg}");
        self.push(msg);
    }

    fn push(&mut self, msg: String) {
        if self.entries.len() == DEBUG_LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(msg);
    }

    /// Oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.contains(needle))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
