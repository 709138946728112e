use clean_files::actions::{ActionMode, PolicyExecutor, ScriptedConfirmer};
use clean_files::config::Settings;
use clean_files::duplicates::find_missing;
use clean_files::rules::{run_rule, Rule, RuleContext};
use clean_files::scanner::{DirectorySet, Hasher};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn run_missing(dirs: &DirectorySet, mode: ActionMode, answers: Vec<bool>) -> (clean_files::actions::ActionReport, Vec<String>) {
    let settings = Settings::default();
    let ctx = RuleContext::new(dirs, &settings);
    let mut confirmer = ScriptedConfirmer::new(answers);
    let report = {
        let mut executor = PolicyExecutor::new(&mut confirmer);
        run_rule(Rule::Missing, mode, &ctx, &mut executor)
    };
    (report, confirmer.prompts().to_vec())
}

#[test]
fn test_only_absent_content_is_moved() {
    let main = tempdir().unwrap();
    let side = tempdir().unwrap();
    write(main.path(), "a.txt", b"X");
    write(side.path(), "b.txt", b"X");
    write(side.path(), "c.txt", b"Y");

    let dirs = DirectorySet::resolve(main.path(), &[side.path().to_path_buf()]).unwrap();
    let scan = find_missing(&dirs, &Hasher::new());
    assert_eq!(scan.main_hashes, 1);
    assert_eq!(scan.checked, 2);
    assert_eq!(scan.entries.len(), 1);
    assert!(scan.entries[0].file.path.ends_with("c.txt"));
    assert_eq!(scan.entries[0].destination, dirs.main().join("c.txt"));

    let (report, _) = run_missing(&dirs, ActionMode::Apply, vec![]);

    assert_eq!(report.applied, 1);
    assert!(side.path().join("b.txt").exists());
    assert!(!side.path().join("c.txt").exists());
    assert_eq!(fs::read(main.path().join("c.txt")).unwrap(), b"Y");
    assert_eq!(fs::read(main.path().join("a.txt")).unwrap(), b"X");
}

#[test]
fn test_sub_path_is_preserved() {
    let main = tempdir().unwrap();
    let side = tempdir().unwrap();
    write(side.path(), "2024/trips/beach.jpg", b"sand");

    let dirs = DirectorySet::resolve(main.path(), &[side.path().to_path_buf()]).unwrap();
    let (report, _) = run_missing(&dirs, ActionMode::Apply, vec![]);

    assert!(report.all_succeeded());
    assert_eq!(
        fs::read(main.path().join("2024/trips/beach.jpg")).unwrap(),
        b"sand"
    );
}

#[test]
fn test_root_name_repeated_in_path_is_not_rewritten() {
    let main = tempdir().unwrap();
    let side = tempdir().unwrap();
    let side_name = side
        .path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned();
    let rel = format!("{}/inner.txt", side_name);
    write(side.path(), &rel, b"nested");

    let dirs = DirectorySet::resolve(main.path(), &[side.path().to_path_buf()]).unwrap();
    run_missing(&dirs, ActionMode::Apply, vec![]);

    assert!(main.path().join(&side_name).join("inner.txt").exists());
}

#[test]
fn test_destination_exists_is_reported_and_rule_continues() {
    let main = tempdir().unwrap();
    let side = tempdir().unwrap();
    write(main.path(), "clash.txt", b"main copy");
    write(side.path(), "clash.txt", b"side copy");
    write(side.path(), "fresh.txt", b"new");

    let dirs = DirectorySet::resolve(main.path(), &[side.path().to_path_buf()]).unwrap();
    let (report, _) = run_missing(&dirs, ActionMode::Apply, vec![]);

    assert_eq!(report.flagged, 2);
    assert_eq!(report.applied, 1);
    assert_eq!(report.failure_count(), 1);
    assert!(report.failures[0].0.ends_with("clash.txt"));

    assert_eq!(fs::read(main.path().join("clash.txt")).unwrap(), b"main copy");
    assert_eq!(fs::read(side.path().join("clash.txt")).unwrap(), b"side copy");
    assert!(main.path().join("fresh.txt").exists());
}

#[test]
fn test_confirm_prompts_name_destination() {
    let main = tempdir().unwrap();
    let side = tempdir().unwrap();
    write(side.path(), "one.txt", b"1");
    write(side.path(), "two.txt", b"2");

    let dirs = DirectorySet::resolve(main.path(), &[side.path().to_path_buf()]).unwrap();
    let (report, prompts) = run_missing(&dirs, ActionMode::Confirm, vec![true, false]);

    assert_eq!(report.applied, 1);
    assert_eq!(report.declined, 1);
    assert!(main.path().join("one.txt").exists());
    assert!(side.path().join("two.txt").exists());
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("does not exist in main directory"));
    assert!(prompts[0].ends_with(&format!(
        "move to {}?",
        dirs.main().join("one.txt").display()
    )));
}

#[test]
fn test_no_extra_directories_flags_nothing() {
    let main = tempdir().unwrap();
    write(main.path(), "a.txt", b"A");

    let dirs = DirectorySet::resolve(main.path(), &[]).unwrap();
    let (report, _) = run_missing(&dirs, ActionMode::Apply, vec![]);

    assert_eq!(report.flagged, 0);
    assert!(main.path().join("a.txt").exists());
}
