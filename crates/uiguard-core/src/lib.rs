//! # uiguard Core
//!
//! Component contract validation and pre-build safety checks for a
//! front-end project tree.
//!
//! - [`logger`]: leveled, context-tagged logging with a bounded history
//! - [`contracts`]: the component contract registry
//! - [`validation`]: render-time property and structure checks
//! - [`guard`]: static checks run before compilation
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` - returns `Result` instead
//! - No `expect()` - returns `Result` instead
//! - No `panic!()` - returns `Result` instead
//! - No `unsafe` - safe Rust only
//!
//! ## Error Handling
//!
//! Setup (configuration, patterns) returns `Result<T, Error>`. Validation
//! never fails: findings are logged and returned as values.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]
#![forbid(unsafe_code)]

pub mod component;
pub mod config;
pub mod contracts;
mod error;
pub mod guard;
pub mod logger;
pub mod validation;

pub use component::{ComponentShape, CompoundComponent, Props};
pub use config::{Config, GuardConfig, Mode};
pub use contracts::{BuildError, ComponentContract, ContractRegistry, PropertyConstraint};
pub use error::{Error, Result};
pub use guard::{check_components, BuildCheckReport, BuildGuard, Verdict};
pub use logger::{Level, Logger, LoggerOptions};
pub use validation::{PropRule, PropValidator, StructuralValidator, ValidationResult};
