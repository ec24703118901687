//! Log levels and entries.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Severity of a log entry, ordered `Debug < Info < Warn < Error`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Upper-case tag used in formatted lines.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// One retained log record. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl LogEntry {
    pub fn new(
        level: Level,
        message: impl Into<String>,
        context: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
            context: context.into(),
            data,
        }
    }

    /// Render as `[LEVEL] [ISO-timestamp] [context] message`, with the
    /// payload appended as compact JSON when present.
    pub fn render(&self) -> String {
        let head = format!(
            "[{}] [{}] [{}] {}",
            self.level.tag(),
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.context,
            self.message
        );
        match &self.data {
            None | Some(Value::Null) => head,
            Some(data) => match serde_json::to_string(data) {
                Ok(json) => format!("{head} {json}"),
                Err(_) => format!("{head} <unprintable payload>"),
            },
        }
    }
}
