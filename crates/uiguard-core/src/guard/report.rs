//! Aggregated outcome of a build check run.

use std::fmt;

use colored::Colorize;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter};

/// Which check produced a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CheckKind {
    ClientDirectives,
    PageScan,
    Imports,
    ConfigFiles,
    ComponentSources,
    Contracts,
}

impl CheckKind {
    /// Heading printed before the check runs.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ClientDirectives => "Checking \"use client\" directives...",
            Self::PageScan => "Checking \"use client\" directives in all pages...",
            Self::Imports => "Checking imports in the representative page...",
            Self::ConfigFiles => "Checking critical configuration files...",
            Self::ComponentSources => "Checking component sources against their contracts...",
            Self::Contracts => "Checking contract references...",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "UPPERCASE")]
pub enum CheckOutcome {
    Success,
    Warning,
    Error,
}

/// One running line of output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckLine {
    pub check: CheckKind,
    pub outcome: CheckOutcome,
    pub message: String,
}

impl CheckLine {
    /// ANSI-colored rendering, `[OUTCOME] message`.
    #[must_use]
    pub fn render(&self) -> String {
        let text = format!("[{}] {}", self.outcome, self.message);
        match self.outcome {
            CheckOutcome::Success => text.green().to_string(),
            CheckOutcome::Warning => text.yellow().to_string(),
            CheckOutcome::Error => text.red().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    PassWithWarnings,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "All checks passed."),
            Self::PassWithWarnings => {
                write!(f, "Warnings were found, but the build can continue.")
            }
            Self::Fail => write!(f, "Errors were detected. The build cannot continue."),
        }
    }
}

/// Counters plus every line, in the order the checks produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildCheckReport {
    pub success_count: usize,
    pub warning_count: usize,
    pub error_count: usize,
    pub lines: Vec<CheckLine>,
}

impl BuildCheckReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, check: CheckKind, outcome: CheckOutcome, message: impl Into<String>) {
        match outcome {
            CheckOutcome::Success => self.success_count += 1,
            CheckOutcome::Warning => self.warning_count += 1,
            CheckOutcome::Error => self.error_count += 1,
        }
        self.lines.push(CheckLine {
            check,
            outcome,
            message: message.into(),
        });
    }

    pub fn success(&mut self, check: CheckKind, message: impl Into<String>) {
        self.record(check, CheckOutcome::Success, message);
    }

    pub fn warning(&mut self, check: CheckKind, message: impl Into<String>) {
        self.record(check, CheckOutcome::Warning, message);
    }

    pub fn error(&mut self, check: CheckKind, message: impl Into<String>) {
        self.record(check, CheckOutcome::Error, message);
    }

    /// Lines produced by one check.
    pub fn lines_for(&self, check: CheckKind) -> impl Iterator<Item = &CheckLine> {
        self.lines.iter().filter(move |line| line.check == check)
    }

    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        if self.error_count > 0 {
            Verdict::Fail
        } else if self.warning_count > 0 {
            Verdict::PassWithWarnings
        } else {
            Verdict::Pass
        }
    }

    /// 1 when any check failed, 0 otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.error_count > 0 {
            1
        } else {
            0
        }
    }

    /// The three counter lines and the verdict line.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let verdict = self.verdict();
        let verdict_line = match verdict {
            Verdict::Pass => format!("[INFO] {verdict}").blue().to_string(),
            Verdict::PassWithWarnings => format!("[WARNING] {verdict}").yellow().to_string(),
            Verdict::Fail => format!("[ERROR] {verdict}").red().to_string(),
        };
        vec![
            format!("{} successes", self.success_count).green().to_string(),
            format!("{} warnings", self.warning_count).yellow().to_string(),
            format!("{} errors", self.error_count).red().to_string(),
            verdict_line,
        ]
    }
}
