//! Integration tests for the spanview CLI
//!
//! These run the real binary against temporary trace files. The viewer
//! itself needs a terminal, so only the non-interactive subcommands are
//! exercised here.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const TWO_SPANS: &str = r#"[
  {
    "api_name": "/orders",
    "operation_name": "request",
    "start_time_microsecond": "1000",
    "duration_microseconds": "50",
    "status": 0,
    "children": [
      {
        "operation_name": "db.query",
        "start_time_microsecond": 1010,
        "duration_microseconds": 60,
        "status": 1
      }
    ]
  }
]"#;

/// Helper to run spanview with an isolated working directory
fn run_spanview(args: &[&str], cwd: &Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_spanview"))
        .args(args)
        .current_dir(cwd)
        .env_remove("SPANVIEW_LOG")
        .output()
        .expect("Failed to execute spanview")
}

/// Helper to get stdout as string
fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Helper to get stderr as string
fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn write_trace(dir: &TempDir, contents: &str) -> String {
    let path = dir.path().join("trace.json");
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().to_string()
}

// =============================================================================
// Basic Command Tests
// =============================================================================

#[test]
fn test_help_command() {
    let dir = TempDir::new().unwrap();
    let output = run_spanview(&["--help"], dir.path());

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("spanview"));
    assert!(out.contains("normalize"));
    assert!(out.contains("chain"));
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    let output = run_spanview(&["--version"], dir.path());

    assert!(output.status.success());
    assert!(stdout(&output).contains("spanview"));
}

// =============================================================================
// Normalize / Stats
// =============================================================================

#[test]
fn test_normalize_file() {
    let dir = TempDir::new().unwrap();
    let path = write_trace(&dir, TWO_SPANS);
    let output = run_spanview(&["normalize", &path], dir.path());

    assert!(output.status.success(), "normalize failed: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["startUs"], 1000);
    assert_eq!(json["totalUs"], 70);
    assert_eq!(json["nodes"][0]["id"], "node-0");
    assert_eq!(json["nodes"][0]["children"][0]["id"], "node-0-0");
    assert_eq!(json["nodes"][0]["children"][0]["componentTag"], "db");
    assert_eq!(json["nodes"][0]["children"][0]["error"], true);
}

#[test]
fn test_normalize_sample() {
    let dir = TempDir::new().unwrap();
    let output = run_spanview(&["normalize", "--compact"], dir.path());

    assert!(output.status.success(), "normalize failed: {}", stderr(&output));
    let out = stdout(&output);
    assert_eq!(out.trim().lines().count(), 1);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["startUs"], 1771774855030459_i64);
    assert_eq!(json["totalUs"], 2834889);
}

#[test]
fn test_stats_file() {
    let dir = TempDir::new().unwrap();
    let path = write_trace(&dir, TWO_SPANS);
    let output = run_spanview(&["stats", &path], dir.path());

    assert!(output.status.success(), "stats failed: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Spans:    2"), "got: {}", out);
    assert!(out.contains("0.07ms"), "got: {}", out);
    assert!(out.contains("db"));
}

#[test]
fn test_invalid_trace_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_trace(&dir, "{ not json");
    let output = run_spanview(&["normalize", &path], dir.path());

    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid JSON"));
}

#[test]
fn test_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let output = run_spanview(&["stats", "does-not-exist.json"], dir.path());

    assert!(!output.status.success());
    assert!(stderr(&output).contains("does-not-exist.json"));
}

// =============================================================================
// Shell Completion Tests
// =============================================================================

#[test]
fn test_completion_bash() {
    let dir = TempDir::new().unwrap();
    let output = run_spanview(&["completion", "bash"], dir.path());

    assert!(
        output.status.success(),
        "completion bash failed: {}",
        stderr(&output)
    );
    assert!(stdout(&output).contains("spanview"));
}

#[test]
fn test_completion_zsh() {
    let dir = TempDir::new().unwrap();
    let output = run_spanview(&["completion", "zsh"], dir.path());

    assert!(output.status.success());
    assert!(
        stdout(&output).contains("#compdef spanview"),
        "zsh completion should contain #compdef"
    );
}
