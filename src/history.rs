//! In-memory run history.
//!
//! Entries live for the lifetime of the process only; the newest entry is
//! always first.

use chrono::{DateTime, Local};
use std::collections::VecDeque;

use crate::runner::RunOutcome;

/// Timestamp format used for history row subtitles.
const ENTRY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One recorded run outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub outcome: RunOutcome,
    pub timestamp: DateTime<Local>,
}

impl HistoryEntry {
    pub fn new(outcome: RunOutcome, timestamp: DateTime<Local>) -> Self {
        Self { outcome, timestamp }
    }

    /// Entry stamped with the current local time.
    pub fn now(outcome: RunOutcome) -> Self {
        Self::new(outcome, Local::now())
    }

    /// Row title, e.g. "❌ Tests failed (exit code 2)".
    pub fn title(&self) -> String {
        format!("{} {}", self.outcome.icon(), self.outcome.status_text())
    }

    /// Row subtitle, e.g. "2026-10-16 14:03:22".
    pub fn subtitle(&self) -> String {
        self.timestamp.format(ENTRY_TIMESTAMP_FORMAT).to_string()
    }
}

/// Append-only, most-recent-first list of run outcomes.
#[derive(Debug, Clone, Default)]
pub struct RunHistory {
    entries: VecDeque<HistoryEntry>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `entry` at the front.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
