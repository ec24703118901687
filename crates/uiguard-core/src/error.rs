//! Error types for uiguard with categorization:
//!
//! - **Configuration errors**: bad `uiguard.toml`, bad environment values,
//!   invalid patterns (exit code 2)
//! - **System errors**: IO failures outside of a guarded check (exit code 3)
//!
//! Validation findings are never errors. They travel through
//! [`crate::ValidationResult`] and [`crate::BuildCheckReport`] instead.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Top-level error type for setup failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Invalid configuration provided
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Parse error when reading configuration or data
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A configured scan pattern failed to compile
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// IO failure with the offending path
    #[error("IO error on {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

impl Error {
    /// Create a configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a parse error.
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an IO error bound to a path.
    pub fn io(path: &Path, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// Returns the process exit code for this error.
    ///
    /// Exit code scheme:
    /// - 1: reserved for a failed build check
    /// - 2: configuration problem
    /// - 3: IO failure
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfig(_) | Self::ParseError(_) | Self::InvalidPattern { .. } => 2,
            Self::Io { .. } => 3,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::parse_error(format!("Failed to parse config: {err}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::parse_error(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
