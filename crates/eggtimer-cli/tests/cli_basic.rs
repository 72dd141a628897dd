//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command with `HOME` pointed at `home` and return output.
fn run_cli_in(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "eggtimer-cli", "--"])
        .args(args)
        .env("HOME", home)
        .env_remove("EGGTIMER_ENV")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let home = tempfile::tempdir().expect("temp home");
    run_cli_in(home.path(), args)
}

#[test]
fn test_format_pads_minutes_and_seconds() {
    let (code, stdout, _) = run_cli(&["format", "725"]);
    assert_eq!(code, 0, "format failed");
    assert_eq!(stdout.trim(), "12:05");

    let (_, stdout, _) = run_cli(&["format", "3661"]);
    assert_eq!(stdout.trim(), "61:01");
}

#[test]
fn test_presets_list() {
    let (code, stdout, _) = run_cli(&["presets"]);
    assert_eq!(code, 0, "presets failed");
    assert!(stdout.contains("Soft") && stdout.contains("06:00"));
    assert!(stdout.contains("Medium") && stdout.contains("08:00"));
    assert!(stdout.contains("Hard") && stdout.contains("12:00"));
}

#[test]
fn test_presets_json() {
    let (code, stdout, _) = run_cli(&["presets", "--json"]);
    assert_eq!(code, 0, "presets --json failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let rows = parsed.as_array().expect("array");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["name"], "Soft");
    assert_eq!(rows[0]["seconds"], 360);
    assert_eq!(rows[2]["seconds"], 720);
}

#[test]
fn test_custom_zero_is_rejected() {
    let (code, _, stderr) = run_cli(&["custom", "--minutes", "0", "--seconds", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
}

#[test]
fn test_start_unknown_target_is_rejected() {
    let (code, _, stderr) = run_cli(&["start", "poached"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("neither a preset nor MM:SS"), "stderr: {stderr}");
}

#[test]
fn test_short_countdown_completes() {
    let home = tempfile::tempdir().expect("temp home");
    let (code, _, _) = run_cli_in(home.path(), &["config", "set", "alert.pulses", "1"]);
    assert_eq!(code, 0, "config set failed");

    let (code, stdout, _) = run_cli_in(home.path(), &["start", "0:01"]);
    assert_eq!(code, 0, "countdown failed");
    assert!(stdout.contains("00:00"), "stdout: {stdout}");
    assert!(stdout.contains("Time's up!"), "stdout: {stdout}");
}

#[test]
fn test_start_refuses_broken_config() {
    let home = tempfile::tempdir().expect("temp home");
    let dir = home.path().join(".config/eggtimer");
    std::fs::create_dir_all(&dir).expect("config dir");

    std::fs::write(
        dir.join("config.toml"),
        "[timer]\ntick_interval_ms = 0\n[alert]\nenabled = false\n",
    )
    .expect("write config");
    let (code, stdout, stderr) = run_cli_in(home.path(), &["start", "0:01"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:") && stderr.contains("tick_interval_ms"), "stderr: {stderr}");
    assert!(!stdout.contains("Time's up!"), "stdout: {stdout}");

    std::fs::write(dir.join("config.toml"), "[alert\nenabled = false\n").expect("write config");
    let (code, _, stderr) = run_cli_in(home.path(), &["custom", "--seconds", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Failed to parse configuration"), "stderr: {stderr}");
}

#[test]
fn test_config_roundtrip_through_cli() {
    let home = tempfile::tempdir().expect("temp home");

    let (code, stdout, _) = run_cli_in(home.path(), &["config", "get", "timer.tick_interval_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "100");

    let (code, _, _) = run_cli_in(home.path(), &["config", "set", "timer.tick_interval_ms", "250"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli_in(home.path(), &["config", "get", "timer.tick_interval_ms"]);
    assert_eq!(stdout.trim(), "250");

    let (code, _, stderr) = run_cli_in(home.path(), &["config", "set", "timer.tick_interval_ms", "9000"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("tick_interval_ms"), "stderr: {stderr}");

    assert!(home.path().join(".config/eggtimer/config.toml").exists());
}
