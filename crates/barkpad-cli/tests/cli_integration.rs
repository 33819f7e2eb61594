//! Integration tests for the barkpad CLI.
//!
//! Every run gets its own working directory and config directory so the
//! developer's `.env` and config file never leak in.
//!
//! Run with: `cargo test --package barkpad-cli --test cli_integration`

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const BARKPAD_VARS: [&str; 4] = [
    "BARKPAD_SEED",
    "BARKPAD_LIT",
    "BARKPAD_UNLIT",
    "BARKPAD_FAST",
];

fn barkpad(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_barkpad"));
    cmd.current_dir(dir)
        .env("BARKPAD_CONFIG_DIR", dir.join("config"))
        .env_remove("RUST_LOG");
    for var in BARKPAD_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Helper to run barkpad with given arguments.
fn run_barkpad(dir: &Path, args: &[&str]) -> Output {
    barkpad(dir)
        .args(args)
        .output()
        .expect("Failed to execute barkpad command")
}

/// Helper to run barkpad with text piped to stdin.
fn run_barkpad_with_input(dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = barkpad(dir)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn barkpad");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().expect("Failed to wait for barkpad")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn solve_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let mut full = vec!["solve", "--json"];
    full.extend_from_slice(args);
    let output = run_barkpad(dir, &full);
    assert!(output.status.success(), "barkpad solve should succeed");
    let report = serde_json::from_slice(&output.stdout);
    report.expect("solve --json should print JSON")
}

// =============================================================================
// Solve Command Tests
// =============================================================================

#[test]
fn test_solve_json_shape() {
    let temp = TempDir::new().unwrap();
    let report = solve_json(temp.path(), &["--seed", "7"]);

    assert_eq!(report["seed"], 7);
    assert_eq!(report["solution"].as_array().unwrap().len(), 5);
    let layout = &report["layout"];
    assert_eq!(layout["configuration"].as_array().unwrap().len(), 4);
    assert_eq!(layout["cue_order"].as_array().unwrap().len(), 5);
    let command = report["press_command"].as_str().unwrap();
    assert!(command.starts_with("press "));
}

#[test]
fn test_solve_is_reproducible_with_seed() {
    let temp = TempDir::new().unwrap();
    let first = solve_json(temp.path(), &["--seed", "99", "--lit", "BOB,FRK"]);
    let second = solve_json(temp.path(), &["--seed", "99", "--lit", "BOB,FRK"]);
    assert_eq!(first, second);
}

#[test]
fn test_solve_seed_from_env() {
    let temp = TempDir::new().unwrap();
    let from_flag = solve_json(temp.path(), &["--seed", "3"]);

    let output = barkpad(temp.path())
        .env("BARKPAD_SEED", "3")
        .args(["solve", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let from_env: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(from_flag, from_env);
}

#[test]
fn test_solve_text_output() {
    let temp = TempDir::new().unwrap();
    let output = run_barkpad(temp.path(), &["solve", "--seed", "5"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Barkpad Layout"));
    assert!(text.contains("Solution:"));
    assert!(text.contains("Command:   press "));
}

#[test]
fn test_solve_rejects_unknown_indicator() {
    let temp = TempDir::new().unwrap();
    let output = run_barkpad(temp.path(), &["solve", "--lit", "NOPE"]);
    assert!(!output.status.success());
}

// =============================================================================
// Play Command Tests
// =============================================================================

#[test]
fn test_play_solves_with_piped_presses() {
    let temp = TempDir::new().unwrap();
    let report = solve_json(temp.path(), &["--seed", "21"]);
    let command = report["press_command"].as_str().unwrap();

    let output = run_barkpad_with_input(
        temp.path(),
        &["play", "--seed", "21", "--fast", "--no-cues"],
        &format!("{command}\n"),
    );
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("SOLVED"));
    assert!(!text.contains("STRIKE"));
    assert!(text.contains("Session over: solved with 0 strike(s)"));
}

#[test]
fn test_play_malformed_command_is_ignored() {
    let temp = TempDir::new().unwrap();
    let output = run_barkpad_with_input(
        temp.path(),
        &["play", "--seed", "4", "--no-cues"],
        "press middle\nselect\nquit\n",
    );
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Ignored:"));
    assert!(!text.contains("STRIKE"));
    assert!(text.contains("Session over: unsolved with 0 strike(s)"));
}

#[test]
fn test_play_force_solve() {
    let temp = TempDir::new().unwrap();
    let output = run_barkpad_with_input(
        temp.path(),
        &["play", "--seed", "8", "--no-cues"],
        "solve\nsolve\n",
    );
    assert!(output.status.success());

    let text = stdout(&output);
    assert_eq!(text.matches("SOLVED").count(), 1);
    assert!(text.contains("Already solved"));
}

#[test]
fn test_play_wrong_press_strikes() {
    let temp = TempDir::new().unwrap();
    let report = solve_json(temp.path(), &["--seed", "12"]);
    let first = report["solution"][0].as_str().unwrap();
    let positions = ["top_left", "top_right", "bottom_left", "bottom_right"];
    let wrong = positions.iter().position(|p| *p != first).unwrap() + 1;

    let output = run_barkpad_with_input(
        temp.path(),
        &["play", "--seed", "12", "--no-cues"],
        &format!("{wrong}\nshut up\n"),
    );
    assert!(output.status.success());

    let text = stdout(&output);
    assert_eq!(text.matches("STRIKE").count(), 1);
    assert!(text.contains("Session over: unsolved with 1 strike(s)"));
}

#[test]
fn test_play_rejects_invalid_puzzle_config() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("puzzle.json");
    std::fs::write(&path, r#"{"max_command_tokens": 0}"#).unwrap();

    let path_arg = path.to_str().unwrap();

    let output = run_barkpad(
        temp.path(),
        &["play", "--seed", "2", "--puzzle-config", path_arg],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("max_command_tokens"));
}

#[test]
fn test_play_uses_puzzle_config_token_limit() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("puzzle.json");
    std::fs::write(&path, r#"{"max_command_tokens": 2}"#).unwrap();
    let path_arg = path.to_str().unwrap();

    let output = run_barkpad_with_input(
        temp.path(),
        &[
            "play",
            "--seed",
            "2",
            "--no-cues",
            "--puzzle-config",
            path_arg,
        ],
        "press 1 2 3\nquit\n",
    );
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Ignored:"));
    assert!(!text.contains("STRIKE"));
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
fn test_config_path_honours_override() {
    let temp = TempDir::new().unwrap();
    let output = run_barkpad(temp.path(), &["config", "path"]);
    assert!(output.status.success());
    assert!(stdout(&output).trim().ends_with("config.json"));
    let config_dir = temp.path().join("config").display().to_string();
    assert!(stdout(&output).contains(&config_dir));
}

#[test]
fn test_config_set_then_get() {
    let temp = TempDir::new().unwrap();

    let output = run_barkpad(temp.path(), &["config", "set", "lit", "bob,frk"]);
    assert!(output.status.success());
    assert!(temp.path().join("config/config.json").exists());

    let output = run_barkpad(temp.path(), &["config", "get", "lit"]);
    assert_eq!(stdout(&output).trim(), "BOB,FRK");

    let output = run_barkpad(temp.path(), &["config", "set", "seed", "77"]);
    assert!(output.status.success());
    let report = solve_json(temp.path(), &[]);
    assert_eq!(report["seed"], 77);
}

#[test]
fn test_config_rejects_unknown_key_and_label() {
    let temp = TempDir::new().unwrap();
    let unknown_key = run_barkpad(temp.path(), &["config", "set", "colour", "red"]);
    assert!(!unknown_key.status.success());
    let extended_label = run_barkpad(temp.path(), &["config", "set", "unlit", "KEY"]);
    assert!(!extended_label.status.success());
    assert!(!temp.path().join("config/config.json").exists());
}

#[test]
fn test_config_reset() {
    let temp = TempDir::new().unwrap();
    run_barkpad(temp.path(), &["config", "set", "fast", "true"]);
    let output = run_barkpad(temp.path(), &["config", "reset"]);
    assert!(output.status.success());

    let output = run_barkpad(temp.path(), &["config", "get", "fast"]);
    assert_eq!(stdout(&output).trim(), "false");
}
