//! Rules that flag files one at a time: empty, temporary, unusual
//! permissions and forbidden names.

use crate::actions::{ActionMode, ActionReport, Effect, PolicyExecutor};
use crate::scanner::FileRecord;

use super::{record_scan_failures, RuleContext};

/// Delete zero-byte files.
pub fn empty(
    ctx: &RuleContext<'_>,
    mode: ActionMode,
    executor: &mut PolicyExecutor<'_>,
) -> ActionReport {
    flag_each(ctx, mode, executor, |file| {
        (file.size == 0).then(|| {
            Ok((
                format!("file {} is empty - delete?", file.path.display()),
                Effect::Delete {
                    path: file.path.clone(),
                },
            ))
        })
    })
}

/// Delete files whose name ends with a configured temporary suffix.
pub fn temporary(
    ctx: &RuleContext<'_>,
    mode: ActionMode,
    executor: &mut PolicyExecutor<'_>,
) -> ActionReport {
    let settings = ctx.settings;
    flag_each(ctx, mode, executor, |file| {
        settings.is_temporary(file.file_name()).then(|| {
            Ok((
                format!("file {} is temporary - delete?", file.path.display()),
                Effect::Delete {
                    path: file.path.clone(),
                },
            ))
        })
    })
}

/// Reset permission bits that differ from the configured mode.
pub fn unusual_permissions(
    ctx: &RuleContext<'_>,
    mode: ActionMode,
    executor: &mut PolicyExecutor<'_>,
) -> ActionReport {
    let target = ctx.settings.permissions;
    flag_each(ctx, mode, executor, |file| {
        (file.permissions != target).then(|| {
            Ok((
                format!(
                    "file {} has unusual permissions {:o} - change to {:o}?",
                    file.path.display(),
                    file.permissions,
                    target
                ),
                Effect::Chmod {
                    path: file.path.clone(),
                    mode: target,
                },
            ))
        })
    })
}

/// Rename files whose name contains a forbidden character.
///
/// Bytes of the name that are not valid UTF-8 are kept as they are.
pub fn forbidden_name(
    ctx: &RuleContext<'_>,
    mode: ActionMode,
    executor: &mut PolicyExecutor<'_>,
) -> ActionReport {
    let settings = ctx.settings;
    flag_each(ctx, mode, executor, |file| {
        let name = file.file_name();
        if !settings.has_forbidden(name) {
            return None;
        }
        let Some(new_name) = settings.sanitize_file_name(name) else {
            return Some(Err("file name is not valid Unicode".to_string()));
        };
        Some(Ok((
            format!(
                "file {} contains forbidden characters - rename to {}?",
                file.path.display(),
                new_name.to_string_lossy()
            ),
            Effect::Rename {
                from: file.path.clone(),
                to: file.path.with_file_name(&new_name),
            },
        )))
    })
}

/// Walk everything, collect flagged items, then run them through the
/// executor one by one.
///
/// `flag` returns `Some(Err(_))` for a file that needs fixing but cannot
/// be handled; it is recorded as a failure and left alone.
fn flag_each<F>(
    ctx: &RuleContext<'_>,
    mode: ActionMode,
    executor: &mut PolicyExecutor<'_>,
    mut flag: F,
) -> ActionReport
where
    F: FnMut(&FileRecord) -> Option<Result<(String, Effect), String>>,
{
    let (files, errors) = ctx.dirs.collect_files();
    let mut report = ActionReport::default();
    record_scan_failures(&mut report, errors);

    let mut flagged: Vec<(String, Effect)> = Vec::new();
    for file in &files {
        match flag(file) {
            Some(Ok(item)) => flagged.push(item),
            Some(Err(message)) => {
                log::warn!("Skipping {}: {}", file.path.display(), message);
                report.record_failure(file.path.clone(), message);
            }
            None => {}
        }
    }
    log::debug!("{} of {} file(s) flagged", flagged.len(), files.len());

    for (prompt, effect) in &flagged {
        executor.execute(mode, prompt, std::slice::from_ref(effect), &mut report);
    }
    report
}
