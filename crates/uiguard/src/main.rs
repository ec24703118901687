//! uiguard CLI - pre-build safety checks for a front-end project
//!
//! Binary name: `uiguard`
//!
//! Exit codes: 0 clean or warnings only, 1 failed checks, 2 bad
//! configuration, 3 I/O failure.

use std::{io, process, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use uiguard_core::{
    config::Config,
    guard::{self, BuildCheckReport, BuildGuard},
    logger::{LoggerOptions, TracingSink},
    ComponentContract, Logger,
};

mod cli;

use cli::{Cli, Command, OutputFormat};

fn main() {
    let cli = Cli::parse();
    let code = match load_config(&cli).and_then(|config| {
        init_tracing(&default_filter(&config));
        run(&cli, &config)
    }) {
        Ok(code) => code,
        Err(err) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Error: {err:#}");
            }
            err.downcast_ref::<uiguard_core::Error>()
                .map_or(1, uiguard_core::Error::exit_code)
        }
    };

    #[allow(clippy::exit)]
    process::exit(code);
}

fn load_config(cli: &Cli) -> Result<Config> {
    Config::load(&cli.root, cli.config.as_deref()).context("Failed to load configuration")
}

/// Console filter used when `RUST_LOG` is unset: the configured minimum
/// level for uiguard's own targets, warnings for everything else.
fn default_filter(config: &Config) -> String {
    let level = config
        .logger
        .min_level
        .unwrap_or_else(|| config.mode.default_min_level());
    format!("warn,uiguard={level},uiguard_core={level}")
}

fn init_tracing(default: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli, config: &Config) -> Result<i32> {
    let logger = Logger::new(
        LoggerOptions::from_config(&config.logger, config.mode),
        Arc::new(TracingSink),
    );
    tracing::debug!(root = %cli.root.display(), mode = %config.mode, "starting");

    let report = match cli.command.unwrap_or(Command::Check) {
        Command::Check => run_build_checks(cli, config)?,
        Command::Components => run_component_checks(cli, config, &logger)?,
    };

    logger.for_context("Build").info(
        format!(
            "{} successes, {} warnings, {} errors",
            report.success_count, report.warning_count, report.error_count
        ),
        None,
    );
    tracing::debug!(summary = %logger.summary(), "log history");
    logger.flush_remote();

    Ok(report.exit_code())
}

fn run_build_checks(cli: &Cli, config: &Config) -> Result<BuildCheckReport> {
    let guard = BuildGuard::new(&cli.root, config.guard.clone());
    match cli.format {
        OutputFormat::Human => guard.run().context("Failed to write report"),
        OutputFormat::Json => {
            let report = guard.check();
            print_json(&report)?;
            Ok(report)
        }
    }
}

fn run_component_checks(cli: &Cli, config: &Config, logger: &Logger) -> Result<BuildCheckReport> {
    let contracts: Vec<ComponentContract> = config
        .contracts()
        .iter()
        .map(ComponentContract::from)
        .collect();
    let report = guard::check_components(&cli.root, &contracts, logger);
    match cli.format {
        OutputFormat::Human => guard::print_report(
            &mut io::stdout().lock(),
            "=== Component contract validation ===",
            &report,
        )
        .context("Failed to write report")?,
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(report)
}

fn print_json(report: &BuildCheckReport) -> Result<()> {
    let document = json!({
        "verdict": report.verdict(),
        "exit_code": report.exit_code(),
        "report": report,
    });
    let rendered =
        serde_json::to_string_pretty(&document).context("Failed to serialize report")?;
    println!("{rendered}");
    Ok(())
}
