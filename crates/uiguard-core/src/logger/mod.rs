//! Leveled, context-tagged logging with a bounded history.
//!
//! A [`Logger`] is an explicitly constructed service object. Clones share the
//! same history buffer and sink, so one instance can be handed to the
//! registry and to every validator.
//!
//! ```
//! use std::sync::Arc;
//! use uiguard_core::logger::{Level, Logger, LoggerOptions, MemorySink};
//!
//! let sink = Arc::new(MemorySink::new());
//! let logger = Logger::new(LoggerOptions::default(), sink.clone());
//! logger.for_context("UI").warn("Button: unknown size", None);
//! assert_eq!(logger.recent_entries().len(), 1);
//! assert_eq!(sink.lines_at(Level::Warn).len(), 1);
//! ```

mod entry;
mod ring;
mod sink;

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use serde::Serialize;
use serde_json::Value;

pub use entry::{Level, LogEntry};
pub use ring::RingBuffer;
pub use sink::{LogSink, MemorySink, TracingSink};

use crate::config::{LoggerConfig, Mode};

/// History size used when nothing else is configured.
pub const DEFAULT_CAPACITY: usize = 50;

/// Construction-time settings for a [`Logger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerOptions {
    /// Context label used when a call does not name one
    pub context: String,
    /// Entries below this level are dropped entirely
    pub min_level: Level,
    /// Ring buffer capacity
    pub capacity: usize,
    /// Production mode drops debug entries regardless of `min_level`
    pub production: bool,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            context: "App".to_string(),
            min_level: Level::Debug,
            capacity: DEFAULT_CAPACITY,
            production: false,
        }
    }
}

impl LoggerOptions {
    /// Options derived from the `[logger]` config section and the run mode.
    pub fn from_config(config: &LoggerConfig, mode: Mode) -> Self {
        Self {
            context: config.context.clone(),
            min_level: config.min_level.unwrap_or_else(|| mode.default_min_level()),
            capacity: config.capacity,
            production: mode.is_production(),
        }
    }
}

struct Shared {
    options: LoggerOptions,
    sink: Arc<dyn LogSink>,
    history: Mutex<RingBuffer<LogEntry>>,
}

/// Shared logging handle.
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("options", &self.shared.options)
            .field("retained", &self.history().len())
            .finish_non_exhaustive()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggerOptions::default(), Arc::new(TracingSink))
    }
}

impl Logger {
    pub fn new(options: LoggerOptions, sink: Arc<dyn LogSink>) -> Self {
        let history = Mutex::new(RingBuffer::new(options.capacity));
        Self {
            shared: Arc::new(Shared {
                options,
                sink,
                history,
            }),
        }
    }

    pub fn options(&self) -> &LoggerOptions {
        &self.shared.options
    }

    /// Whether an entry at `level` would be emitted and retained.
    pub fn accepts(&self, level: Level) -> bool {
        let options = &self.shared.options;
        if options.production && level == Level::Debug {
            return false;
        }
        level >= options.min_level
    }

    /// Emit one entry. Never fails and never panics on a poisoned buffer.
    pub fn log(
        &self,
        level: Level,
        message: impl Into<String>,
        data: Option<Value>,
        context: Option<&str>,
    ) {
        if !self.accepts(level) {
            return;
        }
        let context = context.unwrap_or(self.shared.options.context.as_str());
        let entry = LogEntry::new(level, message, context, data);
        let line = entry.render();
        self.shared.sink.write(&entry, &line);
        self.history().push(entry);
    }

    pub fn debug(&self, message: impl Into<String>, data: Option<Value>) {
        self.log(Level::Debug, message, data, None);
    }

    pub fn info(&self, message: impl Into<String>, data: Option<Value>) {
        self.log(Level::Info, message, data, None);
    }

    pub fn warn(&self, message: impl Into<String>, data: Option<Value>) {
        self.log(Level::Warn, message, data, None);
    }

    pub fn error(&self, message: impl Into<String>, data: Option<Value>) {
        self.log(Level::Error, message, data, None);
    }

    /// Handle whose calls are all tagged with `context`.
    pub fn for_context(&self, context: impl Into<String>) -> ContextLogger {
        ContextLogger {
            logger: self.clone(),
            context: context.into(),
        }
    }

    /// Copy of the retained history, oldest first. Mutating the returned
    /// vector has no effect on the logger.
    pub fn recent_entries(&self) -> Vec<LogEntry> {
        self.history().to_vec()
    }

    /// Counts over the retained history.
    pub fn summary(&self) -> LogSummary {
        let history = self.history();
        let count = |level: Level| history.iter().filter(|e| e.level == level).count();
        LogSummary {
            errors: count(Level::Error),
            warnings: count(Level::Warn),
            total: history.len(),
        }
    }

    /// Hook for shipping retained entries to a remote log service. No service
    /// is wired in, so this only records that nothing was sent.
    pub fn flush_remote(&self) {
        tracing::trace!(
            retained = self.history().len(),
            "remote log flush skipped: no log service configured"
        );
    }

    fn history(&self) -> MutexGuard<'_, RingBuffer<LogEntry>> {
        self.shared
            .history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// A [`Logger`] bound to a fixed context label.
#[derive(Debug, Clone)]
pub struct ContextLogger {
    logger: Logger,
    context: String,
}

impl ContextLogger {
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn debug(&self, message: impl Into<String>, data: Option<Value>) {
        self.logger.log(Level::Debug, message, data, Some(&self.context));
    }

    pub fn info(&self, message: impl Into<String>, data: Option<Value>) {
        self.logger.log(Level::Info, message, data, Some(&self.context));
    }

    pub fn warn(&self, message: impl Into<String>, data: Option<Value>) {
        self.logger.log(Level::Warn, message, data, Some(&self.context));
    }

    pub fn error(&self, message: impl Into<String>, data: Option<Value>) {
        self.logger.log(Level::Error, message, data, Some(&self.context));
    }
}

/// Error/warning/total counts over the retained history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogSummary {
    pub errors: usize,
    pub warnings: usize,
    pub total: usize,
}

impl fmt::Display for LogSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(50);
        write!(
            f,
            "{rule}\nLog summary:\n- Errors: {}\n- Warnings: {}\n- Total: {}\n{rule}",
            self.errors, self.warnings, self.total
        )
    }
}
