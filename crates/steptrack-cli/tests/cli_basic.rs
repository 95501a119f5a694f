//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data directory
//! and verify exit codes and outputs.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "steptrack-cli", "--quiet", "--"])
        .args(args)
        .env("STEPTRACK_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_help() {
    let (_, _, code) = run_cli(&["--help"]);
    assert_eq!(code, 0, "help failed");
}

#[test]
fn test_activity_load_and_status() {
    let (stdout, _, code) = run_cli(&["activity", "load", "cli-smoke"]);
    assert_eq!(code, 0, "activity load failed");
    assert!(stdout.contains("loaded 'cli-smoke'"));

    let (stdout, _, code) = run_cli(&["status", "cli-smoke"]);
    assert_eq!(code, 0, "status failed");
    assert!(stdout.contains("TOTAL"));
}

#[test]
fn test_step_start_and_status_json() {
    let (stdout, _, code) = run_cli(&["step", "start", "cli-smoke-steps", "IMPLEMENT"]);
    assert_eq!(code, 0, "step start failed");
    assert!(stdout.contains("recorded IMPLEMENT"));

    let (_, _, code) = run_cli(&["step", "pause", "cli-smoke-steps"]);
    assert_eq!(code, 0, "step pause failed");

    let (stdout, _, code) = run_cli(&["status", "cli-smoke-steps", "--json"]);
    assert_eq!(code, 0, "status --json failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("status JSON");
    let events = parsed.as_array().expect("array of events");
    assert!(events
        .iter()
        .any(|e| e["step"] == "IMPLEMENT" && e["activity"] == "cli-smoke-steps"));
}

#[test]
fn test_unknown_step_is_rejected() {
    let (_, stderr, code) = run_cli(&["step", "start", "cli-smoke", "FROBNICATE"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown step"));
}

#[test]
fn test_activity_list() {
    let (_, _, code) = run_cli(&["activity", "list", "--limit", "3"]);
    assert_eq!(code, 0, "activity list failed");
}

#[test]
fn test_summary() {
    let (_, _, code) = run_cli(&["summary"]);
    assert_eq!(code, 0, "summary failed");
}
