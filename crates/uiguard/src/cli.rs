//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Pre-build safety checks and component contract validation for a
/// front-end project.
#[derive(Debug, Parser)]
#[command(name = "uiguard", version, about)]
pub struct Cli {
    /// Project root to check
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Config file (defaults to `uiguard.toml` in the project root)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the pre-build checks (the default)
    Check,
    /// Check component sources and contract references
    Components,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored running lines and a summary
    #[default]
    Human,
    /// A single JSON document on stdout
    Json,
}
