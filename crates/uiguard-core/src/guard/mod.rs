//! Pre-build safety checks.
//!
//! # Check Order
//! 1. Client-boundary directives in the configured client files
//! 2. Page entries importing client-only primitives
//! 3. Required imports in the representative page
//! 4. Presence and shallow shape of config files
//!
//! Every check runs regardless of earlier failures. The exit code is 1 iff
//! at least one error was recorded.

pub mod checks;
pub mod report;
pub mod scan;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use colored::Colorize;

pub use report::{BuildCheckReport, CheckKind, CheckLine, CheckOutcome, Verdict};
pub use scan::SourceComponent;

use crate::{
    component::ComponentShape,
    config::GuardConfig,
    contracts::{ComponentContract, ContractRegistry},
    error::{Error, Result},
    logger::Logger,
};

/// Checks run by [`BuildGuard::run_with`], in order.
pub const BUILD_CHECKS: [CheckKind; 4] = [
    CheckKind::ClientDirectives,
    CheckKind::PageScan,
    CheckKind::Imports,
    CheckKind::ConfigFiles,
];

/// Static analysis pass over a project tree.
#[derive(Debug, Clone)]
pub struct BuildGuard {
    root: PathBuf,
    config: GuardConfig,
}

impl BuildGuard {
    pub fn new(root: impl Into<PathBuf>, config: GuardConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run_check(&self, kind: CheckKind, report: &mut BuildCheckReport) {
        let before = report.lines.len();
        match kind {
            CheckKind::ClientDirectives => checks::client_directives(&self.root, &self.config, report),
            CheckKind::PageScan => checks::page_scan(&self.root, &self.config, report),
            CheckKind::Imports => checks::imports(&self.root, &self.config, report),
            CheckKind::ConfigFiles => checks::config_files(&self.root, &self.config, report),
            CheckKind::ComponentSources | CheckKind::Contracts => {}
        }
        tracing::debug!(check = %kind, lines = report.lines.len() - before, "check finished");
    }

    /// Run every check without printing.
    pub fn check(&self) -> BuildCheckReport {
        BUILD_CHECKS
            .iter()
            .fold(BuildCheckReport::new(), |mut report, kind| {
                self.run_check(*kind, &mut report);
                report
            })
    }

    /// Run every check, printing headings and running lines to `out`, then
    /// the summary.
    pub fn run_with<W: Write>(&self, out: &mut W) -> Result<BuildCheckReport> {
        let mut report = BuildCheckReport::new();
        heading(out, "=== Starting build validation ===")?;
        for kind in BUILD_CHECKS {
            let start = report.lines.len();
            info(out, kind.description())?;
            self.run_check(kind, &mut report);
            print_lines(out, &report.lines[start..])?;
        }
        print_summary(out, &report)?;
        Ok(report)
    }

    pub fn run(&self) -> Result<BuildCheckReport> {
        self.run_with(&mut io::stdout().lock())
    }
}

/// Stand-in for a contract whose source file is missing. It reports exactly
/// what the contract declares, so registration records nothing new.
struct DeclaredComponent<'a>(&'a ComponentContract);

impl ComponentShape for DeclaredComponent<'_> {
    fn component_name(&self) -> &str {
        &self.0.name
    }

    fn has_part(&self, part: &str) -> bool {
        self.0.expected_sub_components.iter().any(|p| p == part)
    }

    fn declares_client_directive(&self) -> bool {
        self.0.is_client_boundary
    }
}

/// Component sources checked against their contracts, then the contracts
/// checked against each other.
///
/// Each contract is registered with the component parsed from its source,
/// so client contracts whose source lacks the directive land in the
/// registry's ledger as well. A contract whose source is missing is still
/// registered as declared; the source check alone reports it.
pub fn check_components(
    root: &Path,
    contracts: &[ComponentContract],
    logger: &Logger,
) -> BuildCheckReport {
    let mut report = BuildCheckReport::new();
    let mut registry = ContractRegistry::new(logger);

    for contract in contracts {
        checks::component_source(root, contract, &mut report);
        match fs::read_to_string(root.join(&contract.file)) {
            Ok(content) => {
                let source = SourceComponent::new(contract.name.clone(), content);
                registry.register(Some(&source), contract.clone());
            }
            Err(_) => {
                registry.register(Some(&DeclaredComponent(contract)), contract.clone());
            }
        }
    }

    registry.build_errors().iter().for_each(|error| {
        report.error(
            CheckKind::Contracts,
            format!("{}: {} ({})", error.component, error.message, error.file),
        );
    });
    registry.clear_build_errors();

    registry
        .run_all_validations()
        .errors
        .into_iter()
        .for_each(|message| report.error(CheckKind::Contracts, message));
    if report.lines_for(CheckKind::Contracts).next().is_none() {
        report.success(
            CheckKind::Contracts,
            format!("{} contracts are consistent", registry.len()),
        );
    }

    report
}

/// Print a component check report the same way [`BuildGuard::run_with`]
/// prints a build check.
pub fn print_report<W: Write>(out: &mut W, title: &str, report: &BuildCheckReport) -> Result<()> {
    heading(out, title)?;
    for kind in [CheckKind::ComponentSources, CheckKind::Contracts] {
        let lines: Vec<CheckLine> = report.lines_for(kind).cloned().collect();
        info(out, kind.description())?;
        print_lines(out, &lines)?;
    }
    print_summary(out, report)
}

fn write_line<W: Write>(out: &mut W, line: &str) -> Result<()> {
    writeln!(out, "{line}").map_err(|e| Error::io(Path::new("<output>"), &e))
}

fn heading<W: Write>(out: &mut W, text: &str) -> Result<()> {
    write_line(out, &text.cyan().to_string())
}

fn info<W: Write>(out: &mut W, text: &str) -> Result<()> {
    write_line(out, &format!("[INFO] {text}").blue().to_string())
}

fn print_lines<W: Write>(out: &mut W, lines: &[CheckLine]) -> Result<()> {
    lines.iter().try_for_each(|line| write_line(out, &line.render()))
}

fn print_summary<W: Write>(out: &mut W, report: &BuildCheckReport) -> Result<()> {
    write_line(out, "")?;
    heading(out, "=== Validation summary ===")?;
    report
        .summary_lines()
        .iter()
        .try_for_each(|line| write_line(out, line))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::logger::{LoggerOptions, MemorySink};

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok();
        }
        fs::write(path, content).ok();
    }

    fn quiet_logger() -> Logger {
        Logger::new(LoggerOptions::default(), Arc::new(MemorySink::new()))
    }

    #[test]
    fn test_empty_tree_fails_with_every_check_reported() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let guard = BuildGuard::new(dir.path(), GuardConfig::default());
        let report = guard.check();

        // 7 missing client files, 2 unreadable imports, 4 required and 1
        // optional config file missing
        assert_eq!(report.warning_count, 8);
        assert_eq!(report.error_count, 6);
        assert_eq!(report.success_count, 0);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_run_with_prints_headings_and_summary() {
        colored::control::set_override(false);
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let guard = BuildGuard::new(dir.path(), GuardConfig::default());
        let mut out = Vec::new();

        let report = guard
            .run_with(&mut out)
            .unwrap_or_else(|e| panic!("run_with: {e}"));
        let text = String::from_utf8_lossy(&out);

        assert!(text.starts_with("=== Starting build validation ==="));
        assert_eq!(text.matches("[INFO] Checking").count(), 4);
        assert!(text.contains(&format!("{} errors", report.error_count)));
        assert!(text.trim_end().ends_with("The build cannot continue."));
    }

    #[test]
    fn test_check_components_reports_directive_and_boundary() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        write(dir.path(), "button.tsx", "export const Button = () => null;");
        write(dir.path(), "page.tsx", "import { Button } from './button';");
        let contracts = vec![
            ComponentContract::new("Button", "button.tsx").client(true),
            ComponentContract::new("Page", "page.tsx").with_imports(["Button"]),
        ];

        let report = check_components(dir.path(), &contracts, &quiet_logger());

        assert_eq!(report.lines_for(CheckKind::ComponentSources).count(), 2);
        let contract_lines: Vec<_> = report.lines_for(CheckKind::Contracts).collect();
        assert_eq!(contract_lines.len(), 2);
        assert!(contract_lines[0].message.contains("use client"));
        assert!(contract_lines[1].message.contains("Server component imports client component"));
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_missing_source_is_reported_once() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        write(dir.path(), "page.tsx", "import { Button } from './button';");
        let contracts = vec![
            ComponentContract::new("Button", "button.tsx"),
            ComponentContract::new("Page", "page.tsx").with_imports(["Button"]),
        ];

        let report = check_components(dir.path(), &contracts, &quiet_logger());

        assert_eq!(report.error_count, 1, "{:#?}", report.lines);
        assert!(report.lines[0].message.contains("source file not found"));
        let contract_lines: Vec<_> = report.lines_for(CheckKind::Contracts).collect();
        assert_eq!(contract_lines.len(), 1);
        assert!(contract_lines[0].message.contains("2 contracts are consistent"));
    }

    #[test]
    fn test_check_components_clean() {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        write(
            dir.path(),
            "card.tsx",
            "'use client';\nconst Card = () => null;\nCard.Header = Header;\nCard.Body = Body;",
        );
        let contracts = vec![ComponentContract::new("Card", "card.tsx")
            .client(true)
            .with_sub_components(["Header", "Body"])];

        let report = check_components(dir.path(), &contracts, &quiet_logger());

        assert_eq!(report.error_count, 0);
        assert_eq!(report.success_count, 2);
    }
}
