//! Configuration loading and management
//!
//! # Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//! 1. Built-in defaults (the stock front-end project layout)
//! 2. Project config: `uiguard.toml` at the project root, or `--config`
//! 3. Environment variables: `UIGUARD_ENV` (falls back to `NODE_ENV`),
//!    `UIGUARD_LOG_LEVEL`
//!
//! # Example Config
//!
//! ```toml
//! mode = "development"
//!
//! [logger]
//! context = "App"
//! capacity = 50
//!
//! [guard]
//! client_files = ["src/components/ui/button.tsx"]
//! pages_dir = "src/app"
//! page_file_name = "page.tsx"
//! client_primitives = ["Button", "Card"]
//!
//! [[guard.config_files]]
//! path = "tailwind.config.js"
//! heuristics = [{ kind = "expect", pattern = 'darkMode\s*:', label = "dark mode" }]
//!
//! [[components]]
//! name = "Card"
//! file = "src/components/ui/card.tsx"
//! client = true
//! sub_components = ["Header", "Body", "Footer"]
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    str::FromStr,
};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

use crate::{logger::Level, Error, Result};

/// File name looked up at the project root.
pub const CONFIG_FILE_NAME: &str = "uiguard.toml";

/// Run mode. Production raises the logger's minimum level and drops debug
/// telemetry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mode {
    Production,
    #[default]
    Development,
}

impl Mode {
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Minimum log level used when the config does not pin one.
    pub const fn default_min_level(self) -> Level {
        match self {
            Self::Production => Level::Warn,
            Self::Development => Level::Debug,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CONFIG SECTIONS
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub mode: Mode,
    pub logger: LoggerConfig,
    pub guard: GuardConfig,
    pub components: Vec<ContractConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub context: String,
    /// Overrides the mode's default minimum level
    pub min_level: Option<Level>,
    pub capacity: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            context: "App".to_string(),
            min_level: None,
            capacity: crate::logger::DEFAULT_CAPACITY,
        }
    }
}

/// Layout and expectations for the pre-build check. Paths are relative to
/// the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardConfig {
    pub client_files: Vec<String>,
    pub pages_dir: String,
    pub page_file_name: String,
    pub client_primitives: Vec<String>,
    pub representative_page: String,
    pub required_imports: Vec<ImportExpectation>,
    pub config_files: Vec<ConfigFileRule>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        let strings =
            |items: &[&str]| -> Vec<String> { items.iter().map(ToString::to_string).collect() };
        Self {
            client_files: strings(&[
                "src/components/ui/button.tsx",
                "src/components/ui/card.tsx",
                "src/app/appointments/page.tsx",
                "src/utils/logger.ts",
                "src/utils/build-logger.ts",
                "src/utils/component-validator.ts",
                "src/hooks/useComponentLogger.ts",
            ]),
            pages_dir: "src/app".to_string(),
            page_file_name: "page.tsx".to_string(),
            client_primitives: strings(&["Button", "Card", "Dialog", "Form"]),
            representative_page: "src/app/appointments/page.tsx".to_string(),
            required_imports: vec![
                ImportExpectation::new("Card", "../../components/ui/card"),
                ImportExpectation::new("Button", "../../components/ui/button"),
            ],
            config_files: default_config_files(),
        }
    }
}

/// A named import that must appear in the representative page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportExpectation {
    pub name: String,
    pub from: String,
}

impl ImportExpectation {
    pub fn new(name: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    #[default]
    Text,
    Json,
}

/// A configuration file whose presence and shallow content are checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileRule {
    pub path: String,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default)]
    pub format: ConfigFormat,
    #[serde(default)]
    pub heuristics: Vec<Heuristic>,
}

/// Shallow content checks. Every finding is a warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Heuristic {
    /// Warn when `pattern` (a regex) does not match
    Expect { pattern: String, label: String },
    /// Warn when every substring in `all_of` is present
    Discourage { all_of: Vec<String>, label: String },
    /// Warn when a JSON manifest lists `name` in neither dependency table
    Dependency { name: String },
}

const fn default_true() -> bool {
    true
}

fn default_config_files() -> Vec<ConfigFileRule> {
    let expect = |pattern: &str, label: &str| Heuristic::Expect {
        pattern: pattern.to_string(),
        label: label.to_string(),
    };
    let dependency = |name: &str| Heuristic::Dependency {
        name: name.to_string(),
    };
    vec![
        ConfigFileRule {
            path: "next.config.js".to_string(),
            required: true,
            format: ConfigFormat::Text,
            heuristics: vec![Heuristic::Discourage {
                all_of: vec!["experimental".to_string(), "optimizeCss".to_string()],
                label: "experimental optimizeCss configuration".to_string(),
            }],
        },
        ConfigFileRule {
            path: "tsconfig.json".to_string(),
            required: true,
            format: ConfigFormat::Text,
            heuristics: Vec::new(),
        },
        ConfigFileRule {
            path: "tailwind.config.js".to_string(),
            required: true,
            format: ConfigFormat::Text,
            heuristics: vec![
                expect(r"screens\s*:", "screen definitions"),
                expect(r"fontSize\s*:", "font sizes"),
                expect(r"darkMode\s*:", "dark mode configuration"),
            ],
        },
        ConfigFileRule {
            path: "postcss.config.js".to_string(),
            required: false,
            format: ConfigFormat::Text,
            heuristics: vec![expect("autoprefixer", "autoprefixer plugin")],
        },
        ConfigFileRule {
            path: "package.json".to_string(),
            required: true,
            format: ConfigFormat::Json,
            heuristics: vec![
                dependency("tailwindcss"),
                dependency("postcss"),
                dependency("autoprefixer"),
            ],
        },
    ]
}

/// Declarative component contract as written in `uiguard.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractConfig {
    pub name: String,
    pub file: String,
    #[serde(default)]
    pub client: bool,
    #[serde(default)]
    pub sub_components: Vec<String>,
    /// Property name to accepted values; an empty list accepts any value
    #[serde(default)]
    pub properties: BTreeMap<String, Vec<Value>>,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub functions: Vec<String>,
}

/// Contracts for the stock `Button` and `Card` primitives.
pub fn default_components() -> Vec<ContractConfig> {
    let sizes = ["xs", "sm", "md", "lg"]
        .iter()
        .map(|s| Value::String((*s).to_string()))
        .collect();
    let properties = BTreeMap::from([
        ("variant".to_string(), Vec::new()),
        ("size".to_string(), sizes),
        ("isLoading".to_string(), Vec::new()),
        ("fullWidth".to_string(), Vec::new()),
    ]);
    vec![
        ContractConfig {
            name: "Button".to_string(),
            file: "src/components/ui/button.tsx".to_string(),
            client: true,
            sub_components: Vec::new(),
            properties,
            imports: Vec::new(),
            functions: vec!["getVariantClasses".to_string(), "getSizeClasses".to_string()],
        },
        ContractConfig {
            name: "Card".to_string(),
            file: "src/components/ui/card.tsx".to_string(),
            client: true,
            sub_components: vec!["Header".to_string(), "Body".to_string(), "Footer".to_string()],
            properties: BTreeMap::new(),
            imports: Vec::new(),
            functions: Vec::new(),
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
// LOADING
// ═══════════════════════════════════════════════════════════════════════════

impl Config {
    /// Load configuration for the project at `root`.
    ///
    /// An explicit `path` must exist. Without one, `root/uiguard.toml` is
    /// used when present and built-in defaults otherwise.
    pub fn load(root: &Path, path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(explicit) => Self::from_file(explicit)?,
            None => {
                let candidate = root.join(CONFIG_FILE_NAME);
                if candidate.is_file() {
                    Self::from_file(&candidate)?
                } else {
                    tracing::debug!(root = %root.display(), "no {CONFIG_FILE_NAME}, using defaults");
                    Self::default()
                }
            }
        };
        config.apply_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file without env overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, &e))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply environment overrides from the process environment.
    pub fn apply_env_vars(&mut self) -> Result<()> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// `UIGUARD_ENV` must name a mode. `NODE_ENV` is only consulted when
    /// `UIGUARD_ENV` is unset and selects production for `production`,
    /// development for anything else.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("UIGUARD_ENV") {
            self.mode = Mode::from_str(value.trim()).map_err(|_| {
                Error::invalid_config(format!(
                    "Invalid UIGUARD_ENV: {value}. Must be one of: production, development"
                ))
            })?;
        } else if let Some(value) = lookup("NODE_ENV") {
            self.mode = if value.trim().eq_ignore_ascii_case("production") {
                Mode::Production
            } else {
                Mode::Development
            };
        }

        if let Some(value) = lookup("UIGUARD_LOG_LEVEL") {
            let level = Level::from_str(value.trim()).map_err(|_| {
                Error::invalid_config(format!(
                    "Invalid UIGUARD_LOG_LEVEL: {value}. Must be one of: debug, info, warn, error"
                ))
            })?;
            self.logger.min_level = Some(level);
        }
        Ok(())
    }

    /// Reject values the checks cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.logger.capacity == 0 {
            return Err(Error::invalid_config("logger.capacity must be at least 1"));
        }
        if self.guard.page_file_name.trim().is_empty() {
            return Err(Error::invalid_config("guard.page_file_name cannot be empty"));
        }
        for rule in &self.guard.config_files {
            for heuristic in &rule.heuristics {
                if let Heuristic::Expect { pattern, .. } = heuristic {
                    compile_pattern(pattern)?;
                }
            }
        }
        for contract in &self.components {
            if contract.name.trim().is_empty() {
                return Err(Error::invalid_config("component name cannot be empty"));
            }
        }
        Ok(())
    }

    /// Configured contracts, or the stock ones when none are configured.
    pub fn contracts(&self) -> Vec<ContractConfig> {
        if self.components.is_empty() {
            default_components()
        } else {
            self.components.clone()
        }
    }
}

/// Compile a configured regex, mapping failures to [`Error::InvalidPattern`].
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Resolve a configured relative path against the project root.
pub fn resolve(root: &Path, relative: &str) -> PathBuf {
    root.join(relative)
}
