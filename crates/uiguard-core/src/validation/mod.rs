//! Render-time validation.
//!
//! - [`props`]: property checks against declared value sets, run once per
//!   mounted instance
//! - [`structure`]: sub-component, dependency and import presence checks
//!
//! Nothing here returns an `Err` or panics. Findings are logged and handed
//! back as a [`ValidationResult`].

pub mod props;
pub mod structure;

use serde::Serialize;

pub use props::{PropRule, PropValidator, PropViolation};
pub use structure::StructuralValidator;

/// Outcome of one validation call. Errors keep the order they were found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

impl ValidationResult {
    pub const fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Result holding a single error.
    pub fn failure(message: impl Into<String>) -> Self {
        let mut result = Self::ok();
        result.push_error(message);
        result
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    /// Append `other`'s errors after this result's errors.
    pub fn merge(mut self, other: Self) -> Self {
        self.valid = self.valid && other.valid;
        self.errors.extend(other.errors);
        self
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
