//! Action-mode resolution and effect execution.
//!
//! [`PolicyExecutor::execute`] takes a flagged item (one or more
//! [`Effect`]s sharing a single prompt) and, depending on the
//! [`ActionMode`], performs it, skips it, or asks the [`Confirmer`].

use std::path::PathBuf;

use super::confirm::Confirmer;
use super::effects::Effect;
use super::ActionMode;

/// Outcome of resolving an action mode for one flagged item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Perform the effects.
    Apply,
    /// Mode is Skip; nothing is done.
    Skip,
    /// The confirmer answered no.
    Declined,
}

/// Tally of what happened to the flagged items of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionReport {
    /// Items presented to the policy (a group counts once)
    pub flagged: usize,
    /// Effects performed successfully
    pub applied: usize,
    /// Items the confirmer declined
    pub declined: usize,
    /// Items left alone because the mode was Skip
    pub skipped: usize,
    /// Per-file failures (path, message), from scanning or from effects
    pub failures: Vec<(PathBuf, String)>,
}

impl ActionReport {
    /// Number of failures.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if nothing failed.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Record a per-file failure.
    pub fn record_failure(&mut self, path: impl Into<PathBuf>, message: impl ToString) {
        self.failures.push((path.into(), message.to_string()));
    }

    /// Human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut text = format!(
            "{} flagged, {} applied, {} declined, {} skipped",
            self.flagged, self.applied, self.declined, self.skipped
        );
        if !self.all_succeeded() {
            text.push_str(&format!(", {} failed", self.failure_count()));
        }
        text
    }
}

/// Resolves action modes and performs effects.
pub struct PolicyExecutor<'a> {
    confirmer: &'a mut dyn Confirmer,
}

impl<'a> PolicyExecutor<'a> {
    /// Create an executor that asks `confirmer` in Confirm mode.
    pub fn new(confirmer: &'a mut dyn Confirmer) -> Self {
        Self { confirmer }
    }

    /// Decide whether a flagged item should be acted on.
    pub fn decide(&mut self, mode: ActionMode, prompt: &str) -> Decision {
        match mode {
            ActionMode::Apply => Decision::Apply,
            ActionMode::Skip => Decision::Skip,
            ActionMode::Confirm => {
                if self.confirmer.confirm(prompt) {
                    Decision::Apply
                } else {
                    Decision::Declined
                }
            }
        }
    }

    /// Resolve the mode for one flagged item and perform its effects.
    ///
    /// Effect failures are logged and recorded in `report`; remaining
    /// effects of the same item still run.
    pub fn execute(
        &mut self,
        mode: ActionMode,
        prompt: &str,
        effects: &[Effect],
        report: &mut ActionReport,
    ) -> Decision {
        report.flagged += 1;
        let decision = self.decide(mode, prompt);

        match decision {
            Decision::Apply => {
                for effect in effects {
                    match effect.apply() {
                        Ok(()) => report.applied += 1,
                        Err(e) => {
                            log::warn!("Failed to {}: {}", effect.describe(), e);
                            report.record_failure(effect.path(), e);
                        }
                    }
                }
            }
            Decision::Skip => {
                report.skipped += 1;
                for effect in effects {
                    log::debug!("Would {}", effect.describe());
                }
            }
            Decision::Declined => {
                report.declined += 1;
                log::debug!("Declined: {}", prompt);
            }
        }

        decision
    }
}
