//! clean-files - directory cleanup tool
//!
//! Scans a main directory plus any number of extra directories and applies
//! cleanup rules: files missing from the main directory, duplicate content,
//! duplicate names, empty files, unusual permissions, forbidden characters
//! in names and temporary files. Each rule runs in `y` (apply), `n` (skip)
//! or `ask` (confirm each item) mode.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod rules;
pub mod scanner;

use anyhow::Result;
use yansi::Paint;

use crate::actions::{PolicyExecutor, TerminalConfirmer};
use crate::cli::Cli;
use crate::config::Config;
use crate::error::ExitCode;
use crate::rules::{RuleContext, RunSummary};
use crate::scanner::DirectorySet;

/// Run the application with parsed arguments.
///
/// # Errors
///
/// Returns an error for an invalid configuration or main directory.
/// Per-file failures are not errors; they yield
/// [`ExitCode::PartialSuccess`].
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let settings = Config::load(cli.config_file.as_deref())?.into_settings()?;
    log::debug!("Settings: {:?}", settings);

    let dirs = DirectorySet::resolve(&cli.main_dir, &cli.dirs)?;
    log::info!(
        "Main directory: {} ({} extra)",
        dirs.main().display(),
        dirs.others().len()
    );

    let rules = cli.rule_set();
    if rules.active().next().is_none() {
        log::info!("No rules selected, nothing to do");
        return Ok(ExitCode::Success);
    }

    let ctx = RuleContext::new(&dirs, &settings);
    let mut confirmer = TerminalConfirmer::stdio();
    let mut executor = PolicyExecutor::new(&mut confirmer);
    let summary = rules.run(&ctx, &mut executor);

    if !cli.quiet {
        print_summary(&summary);
    }

    if summary.has_failures() {
        for report in &summary.reports {
            for (path, message) in &report.report.failures {
                log::debug!("{}: {} ({})", report.rule, path.display(), message);
            }
        }
        Ok(ExitCode::PartialSuccess)
    } else {
        Ok(ExitCode::Success)
    }
}

fn print_summary(summary: &RunSummary) {
    for report in &summary.reports {
        println!("{:<20} {}", report.rule.bold(), report.report.summary());
    }
    let failures = summary.failure_count();
    if failures == 0 {
        println!("{} {} change(s)", "Done:".green().bold(), summary.total_applied());
    } else {
        println!(
            "{} {} change(s), {} failure(s)",
            "Done:".yellow().bold(),
            summary.total_applied(),
            failures
        );
    }
}
