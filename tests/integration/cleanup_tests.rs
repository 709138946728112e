use clean_files::actions::{ActionMode, PolicyExecutor, ScriptedConfirmer};
use clean_files::config::Settings;
use clean_files::rules::{Rule, RuleContext, RuleSet};
use clean_files::scanner::DirectorySet;
use std::fs;
use tempfile::tempdir;

fn run(dirs: &DirectorySet, settings: &Settings, rules: RuleSet) -> clean_files::rules::RunSummary {
    let ctx = RuleContext::new(dirs, settings);
    let mut confirmer = ScriptedConfirmer::default();
    let mut executor = PolicyExecutor::new(&mut confirmer);
    rules.run(&ctx, &mut executor)
}

#[test]
fn test_empty_file_deleted() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("zero.dat"), b"").unwrap();
    fs::write(dir.path().join("one.dat"), b"1").unwrap();

    let dirs = DirectorySet::resolve(dir.path(), &[]).unwrap();
    let summary = run(
        &dirs,
        &Settings::default(),
        RuleSet::new().with(Rule::Empty, ActionMode::Apply),
    );

    assert_eq!(summary.get(Rule::Empty).unwrap().applied, 1);
    assert!(!dir.path().join("zero.dat").exists());
    assert!(dir.path().join("one.dat").exists());
}

#[cfg(unix)]
#[test]
fn test_forbidden_characters_replaced() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("report*.csv"), b"a,b").unwrap();
    fs::write(dir.path().join("what?.txt"), b"?").unwrap();
    fs::write(dir.path().join("fine.txt"), b"ok").unwrap();

    let dirs = DirectorySet::resolve(dir.path(), &[]).unwrap();
    let summary = run(
        &dirs,
        &Settings::default(),
        RuleSet::new().with(Rule::ForbiddenName, ActionMode::Apply),
    );

    assert_eq!(summary.get(Rule::ForbiddenName).unwrap().flagged, 2);
    assert_eq!(fs::read(dir.path().join("report_.csv")).unwrap(), b"a,b");
    assert!(dir.path().join("what_.txt").exists());
    assert!(dir.path().join("fine.txt").exists());
    assert!(!dir.path().join("report*.csv").exists());
}

#[cfg(unix)]
#[test]
fn test_permissions_follow_settings() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let private = dir.path().join("private.key");
    fs::write(&private, b"secret").unwrap();
    fs::set_permissions(&private, fs::Permissions::from_mode(0o644)).unwrap();

    let settings = Settings {
        permissions: 0o600,
        ..Settings::default()
    };
    let dirs = DirectorySet::resolve(dir.path(), &[]).unwrap();
    let summary = run(
        &dirs,
        &settings,
        RuleSet::new().with(Rule::UnusualPermissions, ActionMode::Apply),
    );

    assert_eq!(summary.total_applied(), 1);
    let mode = fs::metadata(&private).unwrap().permissions().mode() & 0o7777;
    assert_eq!(mode, 0o600);
}

#[test]
fn test_temporary_files_deleted() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("build")).unwrap();
    fs::write(dir.path().join("draft.txt~"), b"old").unwrap();
    fs::write(dir.path().join("build/out.tmp"), b"partial").unwrap();
    fs::write(dir.path().join("draft.txt"), b"current").unwrap();

    let dirs = DirectorySet::resolve(dir.path(), &[]).unwrap();
    let summary = run(
        &dirs,
        &Settings::default(),
        RuleSet::new().with(Rule::Temporary, ActionMode::Apply),
    );

    assert_eq!(summary.total_applied(), 2);
    assert!(dir.path().join("draft.txt").exists());
    assert!(!dir.path().join("draft.txt~").exists());
    assert!(!dir.path().join("build/out.tmp").exists());
}

#[test]
fn test_every_rule_on_empty_tree() {
    let main = tempdir().unwrap();
    let side = tempdir().unwrap();
    let dirs = DirectorySet::resolve(main.path(), &[side.path().to_path_buf()]).unwrap();

    let mut rules = RuleSet::new();
    for rule in Rule::ALL {
        rules.set(rule, ActionMode::Apply);
    }
    let summary = run(&dirs, &Settings::default(), rules);

    assert_eq!(summary.reports.len(), 7);
    for report in &summary.reports {
        assert_eq!(report.report.flagged, 0, "{}", report.rule);
    }
    assert!(!summary.has_failures());
}

#[test]
fn test_rules_run_in_fixed_order() {
    let main = tempdir().unwrap();
    let side = tempdir().unwrap();
    // An empty temporary file is removed by the empty rule before the
    // temporary rule runs
    fs::write(main.path().join("blank.tmp"), b"").unwrap();
    fs::write(side.path().join("extra.txt"), b"only here").unwrap();

    let dirs = DirectorySet::resolve(main.path(), &[side.path().to_path_buf()]).unwrap();
    let rules = RuleSet::new()
        .with(Rule::Temporary, ActionMode::Apply)
        .with(Rule::Empty, ActionMode::Apply)
        .with(Rule::Missing, ActionMode::Apply);
    let summary = run(&dirs, &Settings::default(), rules);

    let order: Vec<Rule> = summary.reports.iter().map(|r| r.rule).collect();
    assert_eq!(order, vec![Rule::Missing, Rule::Empty, Rule::Temporary]);
    assert_eq!(summary.get(Rule::Empty).unwrap().applied, 1);
    assert_eq!(summary.get(Rule::Temporary).unwrap().flagged, 0);
    assert!(main.path().join("extra.txt").exists());
}

#[test]
fn test_skip_mode_rules_do_not_run() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty.txt"), b"").unwrap();

    let dirs = DirectorySet::resolve(dir.path(), &[]).unwrap();
    let summary = run(&dirs, &Settings::default(), RuleSet::new());

    assert!(summary.reports.is_empty());
    assert!(dir.path().join("empty.txt").exists());
}
