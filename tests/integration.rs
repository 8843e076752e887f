//! End-to-end CLI tests against the built `hbchat` binary.
//!
//! Each test writes a temp config plus a plain-text handbook and drives
//! the binary with `std::process::Command`. No network access: the `ask`
//! test points the model endpoint at a closed local port and asserts the
//! failure surfaces cleanly.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn hbchat_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("hbchat");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    fs::create_dir_all(root.join("config")).unwrap();
    fs::create_dir_all(root.join("data")).unwrap();

    fs::write(
        root.join("data").join("handbook.txt"),
        "Employees receive 15 days of paid vacation annually. \
         Remote work requires manager approval. \
         Health insurance enrollment opens every November. \
         Expense reports are due within 30 days of purchase.",
    )
    .unwrap();

    let config_content = format!(
        r#"[document]
path = "{}/data/handbook.txt"

[chunking]
max_chars = 40

[retrieval]
top_k = 3

[model]
base_url = "http://127.0.0.1:9/v1"
model = "test-model"

[server]
bind = "127.0.0.1:7332"
"#,
        root.display()
    );

    let config_path = root.join("config").join("hbchat.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_hbchat(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = hbchat_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run hbchat binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_chunks_reports_stats() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_hbchat(&config_path, &["chunks"]);
    assert!(success, "chunks failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("chunks:"));
    assert!(stdout.contains("bound: 40 chars"));
}

#[test]
fn test_retrieve_finds_vacation_chunk() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_hbchat(&config_path, &["retrieve", "vacation policy"]);
    assert!(
        success,
        "retrieve failed: stdout={}, stderr={}",
        stdout, stderr
    );
    assert!(
        stdout.contains("vacation annually"),
        "expected the vacation chunk, got: {}",
        stdout
    );
    assert!(
        !stdout.contains("Health insurance"),
        "unrelated chunk must not be retrieved: {}",
        stdout
    );
}

#[test]
fn test_retrieve_stopword_query_no_matches() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_hbchat(&config_path, &["retrieve", "is it a"]);
    assert!(success);
    assert!(stdout.contains("No matching chunks."));
}

#[test]
fn test_retrieve_missing_document_degrades() {
    let (_tmp, config_path) = setup_test_env();
    let root = _tmp.path();
    fs::remove_file(root.join("data").join("handbook.txt")).unwrap();

    let (stdout, _, success) = run_hbchat(&config_path, &["retrieve", "vacation"]);
    assert!(success, "missing document must not be a hard error");
    assert!(stdout.contains("Document unavailable"));
}

#[test]
fn test_retrieve_limit_flag() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) =
        run_hbchat(&config_path, &["retrieve", "days vacation work", "--limit", "1"]);
    assert!(success);
    let result_lines = stdout
        .lines()
        .filter(|l| l.starts_with(|c: char| c.is_ascii_digit()))
        .count();
    assert_eq!(result_lines, 1, "limit 1 must yield one result: {}", stdout);
}

#[test]
fn test_ask_unreachable_endpoint_fails_cleanly() {
    let (_tmp, config_path) = setup_test_env();

    // Port 9 (discard) is closed; the model call must fail and the process
    // exit non-zero without panicking.
    let (stdout, stderr, success) = run_hbchat(&config_path, &["ask", "hello"]);
    assert!(!success, "ask must fail without an endpoint: {}", stdout);
    assert!(
        !stderr.contains("panicked"),
        "failure must be an error, not a panic: {}",
        stderr
    );
}

#[test]
fn test_invalid_config_rejected() {
    let (_tmp, config_path) = setup_test_env();
    let content = fs::read_to_string(&config_path).unwrap();
    fs::write(
        &config_path,
        content.replace("max_chars = 40", "max_chars = 0"),
    )
    .unwrap();

    let (_, stderr, success) = run_hbchat(&config_path, &["chunks"]);
    assert!(!success);
    assert!(stderr.contains("max_chars"));
}
