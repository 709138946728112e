//! Duplicate-content and duplicate-name rules.
//!
//! Both prompt once per group and, on approval, delete every member
//! except the representative.

use crate::actions::{ActionMode, ActionReport, Effect, PolicyExecutor};
use crate::duplicates::{find_same_content, find_same_name, Group, Keep};

use super::{record_scan_failures, RuleContext};

/// Collapse files with identical content, keeping the oldest.
pub fn same_content(
    ctx: &RuleContext<'_>,
    mode: ActionMode,
    executor: &mut PolicyExecutor<'_>,
) -> ActionReport {
    let (files, errors) = ctx.dirs.collect_files();
    let mut report = ActionReport::default();
    record_scan_failures(&mut report, errors);

    let grouping = find_same_content(files, &ctx.hasher);
    for (path, error) in &grouping.failures {
        report.record_failure(path.clone(), error);
    }
    log::debug!(
        "Same content: {} file(s), {} group(s)",
        grouping.stats.total_files,
        grouping.stats.groups
    );

    resolve_groups(&grouping.groups, Keep::Oldest, "content", mode, executor, &mut report);
    report
}

/// Collapse files sharing a base name, keeping the newest.
pub fn same_name(
    ctx: &RuleContext<'_>,
    mode: ActionMode,
    executor: &mut PolicyExecutor<'_>,
) -> ActionReport {
    let (files, errors) = ctx.dirs.collect_files();
    let mut report = ActionReport::default();
    record_scan_failures(&mut report, errors);

    let grouping = find_same_name(files);
    log::debug!(
        "Same name: {} file(s), {} group(s)",
        grouping.stats.total_files,
        grouping.stats.groups
    );

    resolve_groups(&grouping.groups, Keep::Newest, "name", mode, executor, &mut report);
    report
}

fn resolve_groups<K>(
    groups: &[Group<K>],
    keep: Keep,
    shared: &str,
    mode: ActionMode,
    executor: &mut PolicyExecutor<'_>,
    report: &mut ActionReport,
) {
    let which = match keep {
        Keep::Oldest => "oldest",
        Keep::Newest => "newest",
    };

    for group in groups {
        let Some(kept) = group.representative(keep) else {
            continue;
        };
        let effects: Vec<Effect> = group
            .redundant(keep)
            .into_iter()
            .map(|file| Effect::Delete {
                path: file.path.clone(),
            })
            .collect();

        let members = group
            .files
            .iter()
            .map(|f| f.path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let prompt = format!(
            "files [{}] have the same {} - only keep the {} one: {}?",
            members,
            shared,
            which,
            kept.path.display()
        );

        executor.execute(mode, &prompt, &effects, report);
    }
}
