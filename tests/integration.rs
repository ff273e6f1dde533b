use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn clip_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("clip");
    path
}

const EXPORT: &str = "\
The Compound Effect (Darren Hardy)
- Your Highlight Location 626-626 | Added on Friday, December 11, 2020 1:42:54 PM

Become very conscious of every choice you make today so you can begin to make smarter choices moving forward.
==========
The Compound Effect (Darren Hardy)
- Your Highlight Location 636-637 | Added on Friday, December 11, 2020 1:45:14 PM

The biggest difference between successful people and unsuccessful people is that successful people are willing to do what unsuccessful people are not.
==========
The Compound Effect (Darren Hardy)
- Your Note Location 548 | Added on Friday, December 11, 2020 1:24:32 PM

All winners are trackers.
==========
Pro Git (Scott Chacon;Ben Straub)
- Your Highlight Location 2868-2871 | Added on Saturday, April 18, 2020 11:21:19 AM

comparing the content of the newly-fetched featureA branch with her local copy of the same branch: $ git log featureA..origin/featureA
==========
";

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    fs::write(root.join("My Clippings.txt"), EXPORT).unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/clip.sqlite"
"#,
        root.display()
    );

    let config_path = config_dir.join("clip.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_clip(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = clip_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run clip binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn export_path(config_path: &Path) -> String {
    config_path
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("My Clippings.txt")
        .to_str()
        .unwrap()
        .to_string()
}

#[test]
fn test_init_creates_database() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_clip(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_clip(&config_path, &["init"]);
    let (_, _, success2) = run_clip(&config_path, &["init"]);
    assert!(success1 && success2);
}

#[test]
fn test_import_counts() {
    let (_tmp, config_path) = setup_test_env();
    let export = export_path(&config_path);

    run_clip(&config_path, &["init"]);
    let (stdout, stderr, success) = run_clip(&config_path, &["import", &export]);
    assert!(
        success,
        "import failed: stdout={}, stderr={}",
        stdout, stderr
    );
    assert!(stdout.contains("blocks: 4"), "stdout={}", stdout);
    assert!(stdout.contains("notes imported: 1"), "stdout={}", stdout);
    assert!(
        stdout.contains("highlights imported: 3"),
        "stdout={}",
        stdout
    );
    assert!(
        stdout.contains("duplicates skipped: 0"),
        "stdout={}",
        stdout
    );
    assert!(stdout.contains("failed blocks: 0"), "stdout={}", stdout);
}

#[test]
fn test_reimport_is_idempotent() {
    let (_tmp, config_path) = setup_test_env();
    let export = export_path(&config_path);

    run_clip(&config_path, &["init"]);
    run_clip(&config_path, &["import", &export]);
    let (stdout, _, success) = run_clip(&config_path, &["import", &export]);
    assert!(success);
    assert!(stdout.contains("notes imported: 0"), "stdout={}", stdout);
    assert!(
        stdout.contains("highlights imported: 0"),
        "stdout={}",
        stdout
    );
    assert!(
        stdout.contains("duplicates skipped: 4"),
        "stdout={}",
        stdout
    );

    // The store holds the same rows as after one import.
    let (stats, _, _) = run_clip(&config_path, &["stats"]);
    assert!(stats.contains("Highlights: 3"), "stats={}", stats);
    assert!(stats.contains("Notes:      1"), "stats={}", stats);
}

#[test]
fn test_dry_run_writes_nothing() {
    let (_tmp, config_path) = setup_test_env();
    let export = export_path(&config_path);

    run_clip(&config_path, &["init"]);
    let (stdout, _, success) = run_clip(&config_path, &["import", &export, "--dry-run"]);
    assert!(success);
    assert!(stdout.contains("(dry-run)"));

    let (stats, _, _) = run_clip(&config_path, &["stats"]);
    assert!(stats.contains("Highlights: 0"), "stats={}", stats);
}

#[test]
fn test_import_limit() {
    let (_tmp, config_path) = setup_test_env();
    let export = export_path(&config_path);

    run_clip(&config_path, &["init"]);
    let (stdout, _, success) = run_clip(&config_path, &["import", &export, "--limit", "2"]);
    assert!(success);
    assert!(stdout.contains("blocks: 2"), "stdout={}", stdout);
    assert!(
        stdout.contains("highlights imported: 2"),
        "stdout={}",
        stdout
    );
}

#[test]
fn test_malformed_block_is_skipped_not_fatal() {
    let (tmp, config_path) = setup_test_env();

    // Second block has text where the blank separator line must be.
    let export = "\
Good Book (Author)
- Your Highlight Location 10-12 | Added on Saturday, April 18, 2020 11:21:19 AM

good content
==========
Bad Book (Author)
- Your Highlight Location 20-22 | Added on Saturday, April 18, 2020 11:21:19 AM
no blank line here
content
==========
";
    let path = tmp.path().join("mixed.txt");
    fs::write(&path, export).unwrap();

    run_clip(&config_path, &["init"]);
    let (stdout, stderr, success) = run_clip(&config_path, &["import", path.to_str().unwrap()]);
    assert!(success, "import aborted: {}", stderr);
    assert!(
        stdout.contains("highlights imported: 1"),
        "stdout={}",
        stdout
    );
    assert!(stdout.contains("failed blocks: 1"), "stdout={}", stdout);
    assert!(stderr.contains("Bad Book (Author)"), "stderr={}", stderr);
}

#[test]
fn test_list_orders_by_location() {
    let (_tmp, config_path) = setup_test_env();
    let export = export_path(&config_path);

    run_clip(&config_path, &["init"]);
    run_clip(&config_path, &["import", &export]);

    let (stdout, _, success) = run_clip(
        &config_path,
        &["list", "The Compound Effect (Darren Hardy)"],
    );
    assert!(success);
    assert!(stdout.contains("2 highlights"), "stdout={}", stdout);

    let first = stdout.find("[626-626]").expect("first highlight missing");
    let second = stdout.find("[636-637]").expect("second highlight missing");
    assert!(first < second, "highlights out of book order: {}", stdout);
    // The note is not part of the highlight listing.
    assert!(!stdout.contains("All winners are trackers."));
}

#[test]
fn test_list_json() {
    let (_tmp, config_path) = setup_test_env();
    let export = export_path(&config_path);

    run_clip(&config_path, &["init"]);
    run_clip(&config_path, &["import", &export]);

    let (stdout, _, success) = run_clip(
        &config_path,
        &["list", "Pro Git (Scott Chacon;Ben Straub)", "--json"],
    );
    assert!(success);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON output");
    let highlights = parsed.as_array().unwrap();
    assert_eq!(highlights.len(), 1);
    assert_eq!(highlights[0]["start_location"], 2868);
    assert_eq!(highlights[0]["end_location"], 2871);
    assert_eq!(highlights[0]["added_at"], "2020-04-18T11:21:19Z");
}

#[test]
fn test_titles_lists_both_books() {
    let (_tmp, config_path) = setup_test_env();
    let export = export_path(&config_path);

    run_clip(&config_path, &["init"]);
    run_clip(&config_path, &["import", &export]);

    let (stdout, _, success) = run_clip(&config_path, &["titles"]);
    assert!(success);
    assert!(stdout.contains("The Compound Effect (Darren Hardy)  (2 highlights, 1 notes)"));
    assert!(stdout.contains("Pro Git (Scott Chacon;Ben Straub)  (1 highlights, 0 notes)"));
}
