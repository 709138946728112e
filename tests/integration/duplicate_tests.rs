use clean_files::actions::{ActionMode, PolicyExecutor, ScriptedConfirmer};
use clean_files::config::Settings;
use clean_files::duplicates::{find_same_content, find_same_name, Keep};
use clean_files::rules::{run_rule, Rule, RuleContext};
use clean_files::scanner::{DirectorySet, Hasher, Walker};
use filetime::{set_file_mtime, FileTime};
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_identical_bytes_grouped_together() {
    let dir = tempdir().unwrap();
    for name in ["a.txt", "b.txt", "c.txt"] {
        File::create(dir.path().join(name))
            .unwrap()
            .write_all(b"duplicate")
            .unwrap();
    }
    fs::write(dir.path().join("d.txt"), b"duplicatE").unwrap();

    let (files, errors) = Walker::new(dir.path()).collect();
    assert!(errors.is_empty());

    let grouping = find_same_content(files, &Hasher::new());
    assert_eq!(grouping.groups.len(), 1);
    assert_eq!(grouping.groups[0].len(), 3);
    assert_eq!(grouping.stats.eliminated_unique, 1);
    assert!(grouping
        .groups[0]
        .files
        .iter()
        .all(|f| !f.path.ends_with("d.txt")));
}

#[test]
fn test_old_log_survives_new_log() {
    let dir = tempdir().unwrap();
    let old = dir.path().join("old.log");
    let new = dir.path().join("new.log");
    fs::write(&old, b"log line\n").unwrap();
    fs::write(&new, b"log line\n").unwrap();
    set_file_mtime(&old, FileTime::from_unix_time(1_600_000_000, 0)).unwrap();
    set_file_mtime(&new, FileTime::from_unix_time(1_700_000_000, 0)).unwrap();

    let (files, _) = Walker::new(dir.path()).collect();
    let grouping = find_same_content(files, &Hasher::new());
    let kept = grouping.groups[0].representative(Keep::Oldest).unwrap();
    assert!(kept.path.ends_with("old.log"));

    let dirs = DirectorySet::resolve(dir.path(), &[]).unwrap();
    let settings = Settings::default();
    let ctx = RuleContext::new(&dirs, &settings);
    let mut confirmer = ScriptedConfirmer::default();
    let mut executor = PolicyExecutor::new(&mut confirmer);
    let report = run_rule(Rule::SameContent, ActionMode::Apply, &ctx, &mut executor);

    assert_eq!(report.applied, 1);
    assert!(old.exists());
    assert!(!new.exists());
}

#[test]
fn test_same_name_across_subdirectories() {
    let dir = tempdir().unwrap();
    for sub in ["2019", "2020", "2021"] {
        fs::create_dir(dir.path().join(sub)).unwrap();
        fs::write(dir.path().join(sub).join("summary.pdf"), sub.as_bytes()).unwrap();
    }
    set_file_mtime(
        dir.path().join("2020/summary.pdf"),
        FileTime::from_unix_time(3_000, 0),
    )
    .unwrap();
    set_file_mtime(
        dir.path().join("2019/summary.pdf"),
        FileTime::from_unix_time(1_000, 0),
    )
    .unwrap();
    set_file_mtime(
        dir.path().join("2021/summary.pdf"),
        FileTime::from_unix_time(2_000, 0),
    )
    .unwrap();

    let (files, _) = Walker::new(dir.path()).collect();
    let grouping = find_same_name(files);
    assert_eq!(grouping.groups.len(), 1);
    assert_eq!(grouping.groups[0].key.as_os_str(), "summary.pdf");

    let dirs = DirectorySet::resolve(dir.path(), &[]).unwrap();
    let settings = Settings::default();
    let ctx = RuleContext::new(&dirs, &settings);
    let mut confirmer = ScriptedConfirmer::new([true]);
    let report = {
        let mut executor = PolicyExecutor::new(&mut confirmer);
        run_rule(Rule::SameName, ActionMode::Confirm, &ctx, &mut executor)
    };

    assert_eq!(report.flagged, 1);
    assert_eq!(report.applied, 2);
    assert!(dir.path().join("2020/summary.pdf").exists());
    assert!(!dir.path().join("2019/summary.pdf").exists());
    assert!(!dir.path().join("2021/summary.pdf").exists());
    assert_eq!(confirmer.prompts().len(), 1);
}

#[test]
fn test_duplicate_cleanup_is_idempotent() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("copy")).unwrap();
    fs::write(dir.path().join("photo.jpg"), b"\xff\xd8 image").unwrap();
    fs::write(dir.path().join("copy/photo.jpg"), b"\xff\xd8 image").unwrap();
    fs::write(dir.path().join("copy/photo (1).jpg"), b"\xff\xd8 image").unwrap();
    fs::write(dir.path().join("notes.txt"), b"unrelated").unwrap();

    let dirs = DirectorySet::resolve(dir.path(), &[]).unwrap();
    let settings = Settings::default();
    let ctx = RuleContext::new(&dirs, &settings);
    let mut confirmer = ScriptedConfirmer::default();
    let mut executor = PolicyExecutor::new(&mut confirmer);

    run_rule(Rule::SameContent, ActionMode::Apply, &ctx, &mut executor);
    let (after_first, _) = Walker::new(dirs.main()).collect();

    let second = run_rule(Rule::SameContent, ActionMode::Apply, &ctx, &mut executor);
    let (after_second, _) = Walker::new(dirs.main()).collect();

    assert_eq!(second.flagged, 0);
    assert_eq!(after_first.len(), 2);
    let first_paths: Vec<_> = after_first.iter().map(|f| f.path.clone()).collect();
    let second_paths: Vec<_> = after_second.iter().map(|f| f.path.clone()).collect();
    assert_eq!(first_paths, second_paths);
}

#[test]
fn test_declined_group_keeps_every_member() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.bin"), b"same").unwrap();
    fs::write(dir.path().join("b.bin"), b"same").unwrap();

    let dirs = DirectorySet::resolve(dir.path(), &[]).unwrap();
    let settings = Settings::default();
    let ctx = RuleContext::new(&dirs, &settings);
    let mut confirmer = ScriptedConfirmer::new([false]);
    let report = {
        let mut executor = PolicyExecutor::new(&mut confirmer);
        run_rule(Rule::SameContent, ActionMode::Confirm, &ctx, &mut executor)
    };

    assert_eq!(report.declined, 1);
    assert_eq!(report.applied, 0);
    assert!(dir.path().join("a.bin").exists());
    assert!(dir.path().join("b.bin").exists());
    assert!(confirmer.prompts()[0].contains("have the same content"));
}
