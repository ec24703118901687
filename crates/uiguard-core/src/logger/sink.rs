//! Output sinks for formatted log lines.

use std::sync::{Mutex, PoisonError};

use super::{Level, LogEntry};

/// Destination for formatted log lines. Implementations must not fail.
pub trait LogSink: Send + Sync {
    fn write(&self, entry: &LogEntry, line: &str);
}

/// Console sink backed by `tracing`: each level goes to its own event level,
/// so the installed subscriber decides where each stream ends up.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, entry: &LogEntry, line: &str) {
        let context = entry.context.as_str();
        match entry.level {
            Level::Debug => tracing::debug!(target: "uiguard::log", context, "{line}"),
            Level::Info => tracing::info!(target: "uiguard::log", context, "{line}"),
            Level::Warn => tracing::warn!(target: "uiguard::log", context, "{line}"),
            Level::Error => tracing::error!(target: "uiguard::log", context, "{line}"),
        }
    }
}

/// Captures lines in memory. Used by tests and by callers that want to
/// inspect console output without a subscriber.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every captured line, oldest first.
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lines written at exactly `level`.
    pub fn lines_at(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line)
            .collect()
    }
}

impl LogSink for MemorySink {
    fn write(&self, entry: &LogEntry, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((entry.level, line.to_string()));
    }
}
