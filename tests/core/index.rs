use purview::core::config::{CONFIG_FILE_NAME, ScanConfig, load_scan_config};
use purview::core::error::PurviewError;
use purview::core::index::PolicyIndex;
use std::fs;
use tempfile::tempdir;

#[test]
fn build_indexes_policies_at_every_depth() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();

    fs::write(root.join("AGENTS.md"), "Root policy A\n").expect("write root policy");
    fs::create_dir_all(root.join("django/app")).expect("mkdir django/app");
    fs::write(root.join("django/AGENTS.md"), "Django policy B\n").expect("write django policy");
    fs::create_dir_all(root.join("react")).expect("mkdir react");
    fs::create_dir_all(root.join("django/app/deep/deeper")).expect("mkdir deep");
    fs::write(
        root.join("django/app/deep/deeper/AGENTS.md"),
        "Deep policy\n",
    )
    .expect("write deep policy");

    let index = PolicyIndex::build(root, &ScanConfig::default()).expect("build");
    assert_eq!(index.len(), 3);

    let canonical_root = fs::canonicalize(root).expect("canonical root");
    assert_eq!(index.root(), canonical_root);

    let root_policy = index.get(&canonical_root).expect("root policy indexed");
    assert_eq!(root_policy.content, "Root policy A\n");
    assert!(root_policy.symlink_target.is_none());
    assert_eq!(root_policy.digest.len(), 64);

    let django_policy = index
        .get(&canonical_root.join("django"))
        .expect("django policy indexed");
    assert_eq!(django_policy.content, "Django policy B\n");

    // react/ has no policy of its own.
    assert!(index.get(&canonical_root.join("react")).is_none());
}

#[test]
fn content_is_loaded_eagerly_at_build_time() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    fs::write(root.join("AGENTS.md"), "before\n").expect("write policy");

    let index = PolicyIndex::build(root, &ScanConfig::default()).expect("build");
    fs::write(root.join("AGENTS.md"), "after\n").expect("rewrite policy");

    // The old snapshot still serves the content it was built from.
    let canonical_root = fs::canonicalize(root).expect("canonical root");
    assert_eq!(
        index.get(&canonical_root).expect("entry").content,
        "before\n"
    );

    // A rebuild picks up the new content as a fresh value.
    let rebuilt = index.rebuild(&ScanConfig::default()).expect("rebuild");
    assert_eq!(
        rebuilt.get(&canonical_root).expect("entry").content,
        "after\n"
    );
    assert_ne!(index.fingerprint(), rebuilt.fingerprint());
}

#[test]
fn fingerprints_agree_across_rebuilds_of_an_unchanged_tree() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    fs::write(root.join("AGENTS.md"), "A\n").expect("write root policy");
    fs::create_dir_all(root.join("django")).expect("mkdir django");
    fs::write(root.join("django/AGENTS.md"), "B\n").expect("write django policy");

    let first = PolicyIndex::build(root, &ScanConfig::default()).expect("first build");
    let second = first.rebuild(&ScanConfig::default()).expect("second build");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.len(), second.len());
}

#[test]
fn ignored_directories_are_never_indexed() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    for dir in [".git", "target", "node_modules"] {
        fs::create_dir_all(root.join(dir)).expect("mkdir ignored");
        fs::write(root.join(dir).join("AGENTS.md"), "hidden\n").expect("write hidden policy");
    }
    fs::create_dir_all(root.join("src")).expect("mkdir src");
    fs::write(root.join("src/AGENTS.md"), "visible\n").expect("write visible policy");

    let index = PolicyIndex::build(root, &ScanConfig::default()).expect("build");
    assert_eq!(index.len(), 1);
    let canonical_root = fs::canonicalize(root).expect("canonical root");
    assert!(index.get(&canonical_root.join("src")).is_some());
}

#[test]
fn two_policy_files_in_one_directory_is_ambiguous() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    fs::write(root.join("AGENTS.md"), "one\n").expect("write first");
    fs::write(root.join("GUIDE.md"), "two\n").expect("write second");

    let config = ScanConfig {
        policy_filenames: vec!["AGENTS.md".to_string(), "GUIDE.md".to_string()],
        ..ScanConfig::default()
    };
    let result = PolicyIndex::build(root, &config);
    match result {
        Err(PurviewError::AmbiguousPolicy(msg)) => {
            assert!(msg.contains("AGENTS.md"), "message names first file: {}", msg);
            assert!(msg.contains("GUIDE.md"), "message names second file: {}", msg);
        }
        other => panic!("expected AmbiguousPolicy, got {:?}", other.map(|i| i.len())),
    }
}

#[test]
fn missing_scan_root_is_not_found() {
    let tmp = tempdir().expect("tempdir");
    let result = PolicyIndex::build(&tmp.path().join("absent"), &ScanConfig::default());
    assert!(matches!(result, Err(PurviewError::NotFound(_))));
}

#[test]
fn config_file_changes_which_filenames_match() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    fs::write(
        root.join(CONFIG_FILE_NAME),
        "[scan]\npolicy_filenames = [\"GUIDE.md\"]\n",
    )
    .expect("write config");
    fs::write(root.join("AGENTS.md"), "ignored under this config\n").expect("write agents");
    fs::write(root.join("GUIDE.md"), "matched\n").expect("write guide");

    let config = load_scan_config(root).expect("load config");
    let index = PolicyIndex::build(root, &config).expect("build");
    assert_eq!(index.len(), 1);
    let canonical_root = fs::canonicalize(root).expect("canonical root");
    let policy = index.get(&canonical_root).expect("entry");
    assert!(policy.file_path.ends_with("GUIDE.md"));
}

#[test]
fn invalid_config_file_fails_validation() {
    let tmp = tempdir().expect("tempdir");
    fs::write(tmp.path().join(CONFIG_FILE_NAME), "not = [valid\n").expect("write bad config");
    let result = load_scan_config(tmp.path());
    assert!(matches!(result, Err(PurviewError::ValidationError(_))));
}

#[test]
fn custom_ignore_list_replaces_defaults() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    fs::write(
        root.join(CONFIG_FILE_NAME),
        "[scan]\nignore_dirs = [\"vendor\"]\n",
    )
    .expect("write config");
    fs::create_dir_all(root.join("vendor")).expect("mkdir vendor");
    fs::write(root.join("vendor/AGENTS.md"), "vendored\n").expect("write vendored policy");
    fs::create_dir_all(root.join("target")).expect("mkdir target");
    fs::write(root.join("target/AGENTS.md"), "generated\n").expect("write generated policy");

    let config = load_scan_config(root).expect("load config");
    let index = PolicyIndex::build(root, &config).expect("build");

    let canonical_root = fs::canonicalize(root).expect("canonical root");
    // vendor/ is now ignored; target/ is not, because the list replaces
    // the defaults rather than extending them.
    assert!(index.get(&canonical_root.join("vendor")).is_none());
    assert!(index.get(&canonical_root.join("target")).is_some());
}

#[test]
fn scan_report_carries_fingerprint_and_entries() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    fs::write(root.join("AGENTS.md"), "A\n").expect("write policy");

    let index = PolicyIndex::build(root, &ScanConfig::default()).expect("build");
    let report = index.scan_report();
    assert_eq!(report.fingerprint, index.fingerprint());
    assert_eq!(report.policies.len(), 1);

    let json = serde_json::to_string_pretty(&report).expect("serialize report");
    assert!(json.contains("fingerprint"));
    assert!(json.contains("AGENTS.md"));
}
