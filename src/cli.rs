//! Command-line interface definitions for clean-files.
//!
//! This module defines all CLI arguments using the clap derive API. Every
//! cleanup rule has its own flag taking `y`, `n` or `ask`; a bare flag means
//! `ask` and an absent flag means `n`.
//!
//! # Example
//!
//! ```bash
//! # Ask before removing empty files under ~/photos
//! clean-files --main-dir ~/photos --empty
//!
//! # Move everything missing from ~/photos in from a backup, no questions
//! clean-files --main-dir ~/photos --dir /mnt/backup --missing-in-main-dir y
//!
//! # Verbose mode for debugging
//! clean-files -v --main-dir ~/photos --same-content ask
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::actions::ActionMode;
use crate::rules::{Rule, RuleSet};

/// Clean up a set of directories.
///
/// Finds files missing from the main directory, duplicate content or names,
/// empty and temporary files, unusual permissions and forbidden characters
/// in file names, and fixes them on request.
#[derive(Debug, Parser)]
#[command(name = "clean-files")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as JSON
    #[arg(long)]
    pub json_errors: bool,

    /// Main directory to clean up and move missing files into
    #[arg(long, value_name = "PATH")]
    pub main_dir: PathBuf,

    /// Additional directory to clean up (can be specified multiple times)
    #[arg(long = "dir", value_name = "PATH")]
    pub dirs: Vec<PathBuf>,

    /// Config file to use instead of ~/.clean_files
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Find files that are not present in the main directory
    #[arg(long, value_enum, value_name = "MODE", num_args = 0..=1, default_value = "n", default_missing_value = "ask")]
    pub missing_in_main_dir: ActionMode,

    /// Find sets of files with the same content
    #[arg(long, value_enum, value_name = "MODE", num_args = 0..=1, default_value = "n", default_missing_value = "ask")]
    pub same_content: ActionMode,

    /// Find sets of files with the same name
    #[arg(long, value_enum, value_name = "MODE", num_args = 0..=1, default_value = "n", default_missing_value = "ask")]
    pub same_name: ActionMode,

    /// Find temporary files
    #[arg(long, value_enum, value_name = "MODE", num_args = 0..=1, default_value = "n", default_missing_value = "ask")]
    pub temporary: ActionMode,

    /// Find files that are empty
    #[arg(long, value_enum, value_name = "MODE", num_args = 0..=1, default_value = "n", default_missing_value = "ask")]
    pub empty: ActionMode,

    /// Find files with unusual access permissions
    #[arg(long, value_enum, value_name = "MODE", num_args = 0..=1, default_value = "n", default_missing_value = "ask")]
    pub unusual_permissions: ActionMode,

    /// Find files with forbidden characters in their file name
    #[arg(long, value_enum, value_name = "MODE", num_args = 0..=1, default_value = "n", default_missing_value = "ask")]
    pub forbidden_name: ActionMode,
}

impl Cli {
    /// Rule modes selected on the command line.
    #[must_use]
    pub fn rule_set(&self) -> RuleSet {
        RuleSet::new()
            .with(Rule::Missing, self.missing_in_main_dir)
            .with(Rule::SameContent, self.same_content)
            .with(Rule::SameName, self.same_name)
            .with(Rule::Empty, self.empty)
            .with(Rule::UnusualPermissions, self.unusual_permissions)
            .with(Rule::ForbiddenName, self.forbidden_name)
            .with(Rule::Temporary, self.temporary)
    }
}
