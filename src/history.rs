//! Command echo history
//!
//! Keeps the lines a session has echoed as commands, newest last, bounded to
//! a maximum size. Nothing is persisted and there is no navigation cursor.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Default maximum number of entries kept
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// One echoed command line
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// The line as submitted, trimmed
    pub line: String,
    /// When the line was echoed
    pub timestamp: DateTime<Utc>,
}

/// Bounded in-memory list of echoed commands
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<HistoryEntry>,
    max_size: usize,
}

impl CommandHistory {
    /// Create a history with the default limit
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a history that keeps at most `max_size` entries
    pub fn with_limit(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_size: max_size.max(1),
        }
    }

    /// Record a line, evicting the oldest entry when full
    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push_back(HistoryEntry {
            line: line.into(),
            timestamp: Utc::now(),
        });

        while self.entries.len() > self.max_size {
            self.entries.pop_front();
        }
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Lines in submission order
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.line.clone()).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}
