//! Cleanup rules.
//!
//! Each [`Rule`] walks the whole [`DirectorySet`], flags files by a key or
//! predicate, and hands every flagged item to the [`PolicyExecutor`].
//! Scanning, hashing and grouping for a rule finish before any of its
//! effects run. A [`RuleSet`] runs the active rules in a fixed order:
//!
//! 1. missing in main directory
//! 2. same content
//! 3. same name
//! 4. empty
//! 5. unusual permissions
//! 6. forbidden name
//! 7. temporary
//!
//! # Example
//!
//! ```no_run
//! use clean_files::actions::{ActionMode, PolicyExecutor, TerminalConfirmer};
//! use clean_files::config::Settings;
//! use clean_files::rules::{Rule, RuleContext, RuleSet};
//! use clean_files::scanner::DirectorySet;
//! use std::path::Path;
//!
//! let dirs = DirectorySet::resolve(Path::new("/photos"), &[]).unwrap();
//! let settings = Settings::default();
//! let ctx = RuleContext::new(&dirs, &settings);
//!
//! let rules = RuleSet::new().with(Rule::Empty, ActionMode::Confirm);
//! let mut confirmer = TerminalConfirmer::stdio();
//! let summary = rules.run(&ctx, &mut PolicyExecutor::new(&mut confirmer));
//! println!("{} failure(s)", summary.failure_count());
//! ```

mod missing;
mod per_file;
mod redundant;

use std::fmt;

use crate::actions::{ActionMode, ActionReport, PolicyExecutor};
use crate::config::Settings;
use crate::scanner::{DirectorySet, Hasher, ScanError};

pub use missing::missing_in_main;
pub use per_file::{empty, forbidden_name, temporary, unusual_permissions};
pub use redundant::{same_content, same_name};

/// A cleanup rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Move files whose content is absent from the main directory into it
    Missing,
    /// Delete all but the oldest of files with identical content
    SameContent,
    /// Delete all but the newest of files with the same name
    SameName,
    /// Delete zero-byte files
    Empty,
    /// Reset permission bits to the configured mode
    UnusualPermissions,
    /// Replace forbidden characters in file names
    ForbiddenName,
    /// Delete files ending with a temporary suffix
    Temporary,
}

impl Rule {
    /// All rules, in execution order.
    pub const ALL: [Rule; 7] = [
        Rule::Missing,
        Rule::SameContent,
        Rule::SameName,
        Rule::Empty,
        Rule::UnusualPermissions,
        Rule::ForbiddenName,
        Rule::Temporary,
    ];

    /// Command-line flag name for the rule.
    #[must_use]
    pub fn flag(self) -> &'static str {
        match self {
            Self::Missing => "missing-in-main-dir",
            Self::SameContent => "same-content",
            Self::SameName => "same-name",
            Self::Empty => "empty",
            Self::UnusualPermissions => "unusual-permissions",
            Self::ForbiddenName => "forbidden-name",
            Self::Temporary => "temporary",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Missing => 0,
            Self::SameContent => 1,
            Self::SameName => 2,
            Self::Empty => 3,
            Self::UnusualPermissions => 4,
            Self::ForbiddenName => 5,
            Self::Temporary => 6,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.flag())
    }
}

/// Inputs shared by every rule of a run.
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    /// Directories to scan
    pub dirs: &'a DirectorySet,
    /// Validated configuration
    pub settings: &'a Settings,
    /// Content hasher
    pub hasher: Hasher,
}

impl<'a> RuleContext<'a> {
    /// Context with the default hasher.
    #[must_use]
    pub fn new(dirs: &'a DirectorySet, settings: &'a Settings) -> Self {
        Self {
            dirs,
            settings,
            hasher: Hasher::new(),
        }
    }
}

/// Run a single rule.
pub fn run_rule(
    rule: Rule,
    mode: ActionMode,
    ctx: &RuleContext<'_>,
    executor: &mut PolicyExecutor<'_>,
) -> ActionReport {
    log::debug!("Running rule {} (mode {})", rule, mode);
    match rule {
        Rule::Missing => missing_in_main(ctx, mode, executor),
        Rule::SameContent => same_content(ctx, mode, executor),
        Rule::SameName => same_name(ctx, mode, executor),
        Rule::Empty => empty(ctx, mode, executor),
        Rule::UnusualPermissions => unusual_permissions(ctx, mode, executor),
        Rule::ForbiddenName => forbidden_name(ctx, mode, executor),
        Rule::Temporary => temporary(ctx, mode, executor),
    }
}

/// Action mode per rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleSet {
    modes: [ActionMode; 7],
}

impl RuleSet {
    /// Every rule set to [`ActionMode::Skip`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`RuleSet::set`].
    #[must_use]
    pub fn with(mut self, rule: Rule, mode: ActionMode) -> Self {
        self.set(rule, mode);
        self
    }

    /// Set the mode of a rule.
    pub fn set(&mut self, rule: Rule, mode: ActionMode) {
        self.modes[rule.index()] = mode;
    }

    /// Mode of a rule.
    #[must_use]
    pub fn mode(&self, rule: Rule) -> ActionMode {
        self.modes[rule.index()]
    }

    /// Rules whose mode is not Skip, in execution order.
    pub fn active(&self) -> impl Iterator<Item = (Rule, ActionMode)> + '_ {
        Rule::ALL
            .into_iter()
            .map(|rule| (rule, self.mode(rule)))
            .filter(|(_, mode)| mode.is_active())
    }

    /// Run the active rules in order.
    pub fn run(&self, ctx: &RuleContext<'_>, executor: &mut PolicyExecutor<'_>) -> RunSummary {
        let mut summary = RunSummary::default();
        for (rule, mode) in self.active() {
            let report = run_rule(rule, mode, ctx, executor);
            log::info!("{}: {}", rule, report.summary());
            summary.reports.push(RuleReport { rule, mode, report });
        }
        summary
    }
}

/// Outcome of one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleReport {
    /// The rule that ran
    pub rule: Rule,
    /// Mode it ran in
    pub mode: ActionMode,
    /// Counters and failures
    pub report: ActionReport,
}

/// Outcome of a run, one report per active rule in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Per-rule reports
    pub reports: Vec<RuleReport>,
}

impl RunSummary {
    /// Total per-file failures across all rules.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.reports.iter().map(|r| r.report.failure_count()).sum()
    }

    /// Whether any rule recorded a failure.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Total effects applied across all rules.
    #[must_use]
    pub fn total_applied(&self) -> usize {
        self.reports.iter().map(|r| r.report.applied).sum()
    }

    /// Report for a rule, if it ran.
    #[must_use]
    pub fn get(&self, rule: Rule) -> Option<&ActionReport> {
        self.reports
            .iter()
            .find(|r| r.rule == rule)
            .map(|r| &r.report)
    }
}

fn record_scan_failures(report: &mut ActionReport, errors: impl IntoIterator<Item = ScanError>) {
    for error in errors {
        report.record_failure(error.path().to_path_buf(), &error);
    }
}
