//! Run log for pipeline progress messages.
//!
//! Every entry is printed to stdout and kept in a bounded history, with
//! per-level totals since startup.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Maximum log entries kept in memory.
pub const MAX_LOG_ENTRIES: usize = 100;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting level for sub-steps
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }
}

/// Global log book
pub static LOG_BOOK: Lazy<LogBook> = Lazy::new(LogBook::new);

/// Prints log entries and remembers the most recent ones
pub struct LogBook {
    inner: Mutex<History>,
    capacity: usize,
}

struct History {
    recent: VecDeque<LogEntry>,
    /// Totals per level since startup, indexed by `LogLevel as usize`
    totals: [usize; 4],
}

impl LogBook {
    pub fn new() -> Self {
        Self::with_capacity(MAX_LOG_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(History {
                recent: VecDeque::with_capacity(capacity),
                totals: [0; 4],
            }),
            capacity,
        }
    }

    /// Print an entry and append it to the history
    pub fn log(&self, entry: LogEntry) {
        let prefix = match entry.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(entry.indent as usize);
        println!("{}{} {}", indent, prefix, entry.message);

        let mut history = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        history.totals[entry.level as usize] += 1;
        if history.recent.len() >= self.capacity {
            history.recent.pop_front();
        }
        if self.capacity > 0 {
            history.recent.push_back(entry);
        }
    }

    /// Snapshot of the retained entries, oldest first
    pub fn recent(&self) -> Vec<LogEntry> {
        let history = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        history.recent.iter().cloned().collect()
    }

    /// Number of entries logged at `level`, including evicted ones
    pub fn count(&self, level: LogLevel) -> usize {
        let history = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        history.totals[level as usize]
    }
}

impl Default for LogBook {
    fn default() -> Self {
        Self::new()
    }
}

pub fn log_info(msg: impl Into<String>) {
    LOG_BOOK.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOG_BOOK.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOG_BOOK.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOG_BOOK.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOG_BOOK.log(LogEntry::info(msg).with_indent(indent));
}
