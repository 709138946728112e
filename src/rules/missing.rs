//! Missing-in-main-directory rule.

use crate::actions::{ActionMode, ActionReport, Effect, PolicyExecutor};
use crate::duplicates::find_missing;

use super::{record_scan_failures, RuleContext};

/// Move files whose content is absent from the main directory into it,
/// keeping their path relative to their own root.
pub fn missing_in_main(
    ctx: &RuleContext<'_>,
    mode: ActionMode,
    executor: &mut PolicyExecutor<'_>,
) -> ActionReport {
    let scan = find_missing(ctx.dirs, &ctx.hasher);
    let mut report = ActionReport::default();
    record_scan_failures(&mut report, scan.failures);

    for entry in &scan.entries {
        let prompt = format!(
            "file {} does not exist in main directory - move to {}?",
            entry.file.path.display(),
            entry.destination.display()
        );
        let effect = Effect::Move {
            from: entry.file.path.clone(),
            to: entry.destination.clone(),
        };
        executor.execute(mode, &prompt, std::slice::from_ref(&effect), &mut report);
    }
    report
}
