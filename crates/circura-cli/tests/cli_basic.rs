//! Basic CLI E2E tests.
//!
//! Tests invoke the built `circura` binary against a throwaway data
//! directory and verify outputs.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_circura"))
        .args(args)
        .env("CIRCURA_DATA_DIR", data_dir)
        .env_remove("CIRCURA_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Run a CLI command, expect success and return stdout.
fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let (code, stdout, stderr) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command failed: {:?}\n{}", args, stderr);
    stdout
}

fn parse_json(json: &str) -> serde_json::Value {
    serde_json::from_str(json).expect("Failed to parse JSON output")
}

#[test]
fn test_settings_defaults() {
    let dir = TempDir::new().unwrap();
    let settings = parse_json(&run_cli_success(dir.path(), &["settings", "get"]));
    assert_eq!(settings["timer_length"], 25);
    assert_eq!(settings["notifications_enabled"], false);
}

#[test]
fn test_settings_persist_between_runs() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["settings", "set-length", "40"]);
    run_cli_success(dir.path(), &["settings", "set-notifications", "true"]);

    let settings = parse_json(&run_cli_success(dir.path(), &["settings", "get"]));
    assert_eq!(settings["timer_length"], 40);
    assert_eq!(settings["notifications_enabled"], true);
}

#[test]
fn test_non_positive_length_reads_as_default() {
    let dir = TempDir::new().unwrap();
    let out = run_cli_success(dir.path(), &["settings", "set-length", "-5"]);
    assert!(out.contains("25"));
}

#[test]
fn test_timer_status_uses_stored_length() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["settings", "set-length", "5"]);

    let snapshot = parse_json(&run_cli_success(dir.path(), &["timer", "status"]));
    assert_eq!(snapshot["formatted"], "05:00");
    assert_eq!(snapshot["is_running"], false);
    assert_eq!(snapshot["total_seconds"], 300);
}

#[test]
fn test_stats_on_empty_log() {
    let dir = TempDir::new().unwrap();
    let stats = parse_json(&run_cli_success(dir.path(), &["stats"]));
    assert_eq!(stats["total_sessions"], 0);
    assert_eq!(stats["total_minutes_focused"], 0);
    assert_eq!(stats["daily_streak"], 0);

    let sessions = parse_json(&run_cli_success(dir.path(), &["sessions", "list"]));
    assert_eq!(sessions, serde_json::json!([]));
}

#[test]
fn test_timer_run_records_a_session() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["config", "set", "quotes.enabled", "false"]);

    // A zero-minute countdown clamps to a single second.
    let out = run_cli_success(dir.path(), &["timer", "run", "--minutes", "0"]);
    assert!(out.contains("session 1/1 complete"));

    let sessions = parse_json(&run_cli_success(dir.path(), &["sessions", "list"]));
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["duration"], 1);

    let stats = parse_json(&run_cli_success(dir.path(), &["stats"]));
    assert_eq!(stats["total_sessions"], 1);
    assert_eq!(stats["daily_streak"], 1);
}

#[test]
fn test_timer_run_shows_alert_for_last_session() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["config", "set", "quotes.enabled", "false"]);
    run_cli_success(dir.path(), &["settings", "set-notifications", "true"]);

    let (code, stdout, stderr) = run_cli(dir.path(), &["timer", "run", "--minutes", "0"]);
    assert_eq!(code, 0, "{stderr}");
    assert!(stdout.contains("session 1/1 complete"));
    assert_eq!(stderr.matches("Time's up!").count(), 1);

    let (code, stdout, stderr) =
        run_cli(dir.path(), &["timer", "run", "--minutes", "0", "--sessions", "2"]);
    assert_eq!(code, 0, "{stderr}");
    assert!(stdout.contains("session 2/2 complete"));
    assert_eq!(stderr.matches("Time's up!").count(), 2);
}

#[test]
fn test_slow_quote_endpoint_does_not_hold_the_countdown() {
    // Connections queue in the backlog but are never answered.
    let silent = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/api/random", silent.local_addr().unwrap());

    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["config", "set", "quotes.endpoint", &endpoint]);
    run_cli_success(dir.path(), &["config", "set", "quotes.refresh_secs", "1"]);

    let started = std::time::Instant::now();
    let out = run_cli_success(dir.path(), &["timer", "run", "--minutes", "0"]);
    assert!(out.contains("session 1/1 complete"));
    assert!(started.elapsed() < std::time::Duration::from_secs(8));
}

#[test]
fn test_timer_run_without_notifications_stays_quiet() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["config", "set", "quotes.enabled", "false"]);

    let (code, _, stderr) = run_cli(dir.path(), &["timer", "run", "--minutes", "0"]);
    assert_eq!(code, 0);
    assert!(!stderr.contains("Time's up!"));
}

#[test]
fn test_config_get_and_set() {
    let dir = TempDir::new().unwrap();
    assert_eq!(
        run_cli_success(dir.path(), &["config", "get", "quotes.enabled"]).trim(),
        "true"
    );
    run_cli_success(dir.path(), &["config", "set", "quotes.refresh_secs", "90"]);
    assert_eq!(
        run_cli_success(dir.path(), &["config", "get", "quotes.refresh_secs"]).trim(),
        "90"
    );
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_list_and_path() {
    let dir = TempDir::new().unwrap();
    let path = run_cli_success(dir.path(), &["config", "path"]);
    assert_eq!(
        path.trim(),
        dir.path().join("config.toml").display().to_string()
    );

    let listed = run_cli_success(dir.path(), &["config", "list"]);
    assert!(listed.contains("[quotes]"));
    assert!(listed.contains("refresh_secs = 60"));
}

#[test]
fn test_config_set_refuses_to_replace_a_broken_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "quotes = [").unwrap();

    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "quotes.refresh_secs", "5"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("config.toml")).unwrap(),
        "quotes = ["
    );
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "ui.dark_mode", "true"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));

    let (code, _, _) = run_cli(dir.path(), &["config", "get", "ui.dark_mode"]);
    assert_ne!(code, 0);
}
