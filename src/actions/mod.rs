//! File actions module.
//!
//! This module provides functionality for:
//! - The three-way action mode (apply / skip / confirm)
//! - Interactive confirmation behind the [`Confirmer`] trait
//! - File effects: delete, rename, move, chmod
//!
//! # Example
//!
//! ```no_run
//! use clean_files::actions::{ActionMode, ActionReport, Effect, PolicyExecutor, TerminalConfirmer};
//! use std::path::PathBuf;
//!
//! let mut confirmer = TerminalConfirmer::stdio();
//! let mut executor = PolicyExecutor::new(&mut confirmer);
//! let mut report = ActionReport::default();
//!
//! let effect = Effect::Delete { path: PathBuf::from("/tmp/empty.txt") };
//! executor.execute(ActionMode::Confirm, "file /tmp/empty.txt is empty - delete?", &[effect], &mut report);
//! println!("{}", report.summary());
//! ```

pub mod confirm;
pub mod effects;
pub mod policy;

use std::fmt;

use clap::ValueEnum;

// Re-export commonly used types
pub use confirm::{parse_answer, Confirmer, ScriptedConfirmer, TerminalConfirmer};
pub use effects::{
    change_permissions, delete_file, move_file, rename_file, ActionError, Effect,
};
pub use policy::{ActionReport, Decision, PolicyExecutor};

/// How a rule treats the items it flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ActionMode {
    /// Perform every effect without asking
    #[value(name = "y")]
    Apply,
    /// Never perform effects
    #[default]
    #[value(name = "n")]
    Skip,
    /// Ask before each effect
    #[value(name = "ask")]
    Confirm,
}

impl ActionMode {
    /// Whether a rule in this mode needs to run at all.
    #[must_use]
    pub fn is_active(self) -> bool {
        self != Self::Skip
    }
}

impl fmt::Display for ActionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apply => write!(f, "y"),
            Self::Skip => write!(f, "n"),
            Self::Confirm => write!(f, "ask"),
        }
    }
}
