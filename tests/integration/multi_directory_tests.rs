use clean_files::actions::{ActionMode, PolicyExecutor, ScriptedConfirmer};
use clean_files::config::Settings;
use clean_files::rules::{run_rule, Rule, RuleContext};
use clean_files::scanner::{DirectorySet, PathError};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_duplicates_found_across_directories() {
    let main = tempdir().unwrap();
    let side = tempdir().unwrap();
    fs::write(main.path().join("a.txt"), b"dup").unwrap();
    fs::write(side.path().join("b.txt"), b"dup").unwrap();

    let dirs = DirectorySet::resolve(main.path(), &[side.path().to_path_buf()]).unwrap();
    let settings = Settings::default();
    let ctx = RuleContext::new(&dirs, &settings);
    let mut confirmer = ScriptedConfirmer::default();
    let mut executor = PolicyExecutor::new(&mut confirmer);
    let report = run_rule(Rule::SameContent, ActionMode::Skip, &ctx, &mut executor);

    assert_eq!(report.flagged, 1);
    assert_eq!(report.skipped, 1);
    assert!(main.path().join("a.txt").exists());
    assert!(side.path().join("b.txt").exists());
}

#[test]
fn test_nested_directory_scanned_once() {
    let main = tempdir().unwrap();
    let sub = main.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("only.txt"), b"one").unwrap();

    let dirs = DirectorySet::resolve(main.path(), &[sub.clone()]).unwrap();
    assert!(dirs.others().is_empty());

    let (files, errors) = dirs.collect_files();
    assert!(errors.is_empty());
    assert_eq!(files.len(), 1);
}

#[test]
fn test_duplicate_extra_directory_dropped() {
    let main = tempdir().unwrap();
    let side = tempdir().unwrap();

    let dirs = DirectorySet::resolve(
        main.path(),
        &[side.path().to_path_buf(), side.path().to_path_buf()],
    )
    .unwrap();
    assert_eq!(dirs.others().len(), 1);
    assert_eq!(dirs.all().count(), 2);
}

#[test]
fn test_missing_extra_directory_ignored() {
    let main = tempdir().unwrap();
    let gone = main.path().join("..").join("definitely-not-here-4711");

    let dirs = DirectorySet::resolve(main.path(), &[gone]).unwrap();
    assert!(dirs.others().is_empty());
}

#[test]
fn test_main_directory_must_exist() {
    let dir = tempdir().unwrap();
    let result = DirectorySet::resolve(&dir.path().join("nope"), &[]);
    assert!(matches!(result, Err(PathError::NotFound(_))));
}

#[test]
fn test_main_directory_must_be_directory() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.txt");
    fs::write(&file, b"x").unwrap();

    let result = DirectorySet::resolve(&file, &[]);
    assert!(matches!(result, Err(PathError::NotADirectory(_))));
}
