//! Basic CLI E2E tests.
//!
//! Each test runs the built `timeflow` binary against its own temporary data
//! directory and checks stdout, stderr and the exit code.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    run_cli_with_stdin(data_dir, args, "")
}

fn run_cli_with_stdin(data_dir: &Path, args: &[&str], stdin: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_timeflow"))
        .args(args)
        .env("TIMEFLOW_DATA_DIR", data_dir)
        .env_remove("TIMEFLOW_LOG")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    {
        let mut input = child.stdin.take().expect("stdin is piped");
        input.write_all(stdin.as_bytes()).expect("Failed to write stdin");
    }
    let output = child.wait_with_output().expect("Failed to wait for CLI");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// A data dir with alerts switched off so tests never spawn audio players.
fn quiet_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "notifications.enabled", "false"]);
    assert_eq!(code, 0, "config set failed: {stderr}");
    dir
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).unwrap_or_else(|e| panic!("invalid JSON ({e}): {stdout}"))
}

fn list(dir: &Path) -> Vec<serde_json::Value> {
    let (stdout, _, code) = run_cli(dir, &["timer", "list", "--json"]);
    assert_eq!(code, 0);
    json(&stdout).as_array().cloned().unwrap()
}

#[test]
fn test_add_countdown_and_list() {
    let dir = quiet_dir();
    let (stdout, _, code) = run_cli(
        dir.path(),
        &["timer", "add", "--title", "Write report", "--minutes", "1", "--seconds", "30"],
    );
    assert_eq!(code, 0);
    let event = json(&stdout);
    assert_eq!(event["type"], "TimerAdded");
    assert_eq!(event["total_duration"], 90);

    let timers = list(dir.path());
    assert_eq!(timers.len(), 1);
    assert_eq!(timers[0]["title"], "Write report");
    assert_eq!(timers[0]["type"], "COUNTDOWN");
    assert_eq!(timers[0]["status"], "RUNNING");
    assert_eq!(timers[0]["remainingTime"], 90);
}

#[test]
fn test_list_table_shows_clock() {
    let dir = quiet_dir();
    run_cli(dir.path(), &["timer", "add", "--hours", "1", "--minutes", "5"]);
    let (stdout, _, code) = run_cli(dir.path(), &["timer", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("1:05:00"), "{stdout}");
    assert!(stdout.contains("Untitled task"), "{stdout}");
}

#[test]
fn test_empty_list() {
    let dir = quiet_dir();
    let (stdout, _, code) = run_cli(dir.path(), &["timer", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No timers."));
    assert!(list(dir.path()).is_empty());
}

#[test]
fn test_newest_first() {
    let dir = quiet_dir();
    run_cli(dir.path(), &["timer", "add", "--title", "first", "--seconds", "10"]);
    run_cli(dir.path(), &["timer", "stopwatch", "--title", "second"]);
    let timers = list(dir.path());
    assert_eq!(timers[0]["title"], "second");
    assert_eq!(timers[0]["type"], "STOPWATCH");
    assert_eq!(timers[1]["title"], "first");
}

#[test]
fn test_quick_start_preset() {
    let dir = quiet_dir();
    let (_, _, code) = run_cli(dir.path(), &["timer", "quick", "deep-work"]);
    assert_eq!(code, 0);
    let timers = list(dir.path());
    assert_eq!(timers[0]["title"], "Deep work");
    assert_eq!(timers[0]["totalDuration"], 3600);
    assert_eq!(timers[0]["mood"], "energy");

    let (_, _, code) = run_cli(dir.path(), &["timer", "quick", "nap"]);
    assert_ne!(code, 0);
}

#[test]
fn test_tick_to_completion() {
    let dir = quiet_dir();
    run_cli(dir.path(), &["timer", "add", "--title", "Tea", "--seconds", "3"]);

    let (stdout, _, code) = run_cli(dir.path(), &["timer", "tick", "--count", "2"]);
    assert_eq!(code, 0);
    let events = json(&stdout);
    assert_eq!(events.as_array().unwrap().len(), 2);
    assert_eq!(list(dir.path())[0]["remainingTime"], 1);

    let (stdout, _, _) = run_cli(dir.path(), &["timer", "tick"]);
    let events = json(&stdout);
    assert_eq!(events[0]["type"], "TimerCompleted");
    assert_eq!(events[0]["title"], "Tea");
    assert_eq!(list(dir.path())[0]["status"], "COMPLETED");

    // Nothing running: ticks produce nothing.
    let (stdout, _, _) = run_cli(dir.path(), &["timer", "tick"]);
    assert_eq!(json(&stdout), serde_json::json!([]));
}

#[test]
fn test_zero_duration_completes_on_first_tick() {
    let dir = quiet_dir();
    run_cli(dir.path(), &["timer", "add", "--minutes", "-5"]);
    let timers = list(dir.path());
    assert_eq!(timers[0]["totalDuration"], 0);
    assert_eq!(timers[0]["status"], "RUNNING");

    let (stdout, _, _) = run_cli(dir.path(), &["timer", "tick"]);
    assert_eq!(json(&stdout)[0]["type"], "TimerCompleted");
}

#[test]
fn test_toggle_reset_delete_by_prefix() {
    let dir = quiet_dir();
    run_cli(dir.path(), &["timer", "add", "--seconds", "30"]);
    let id = list(dir.path())[0]["id"].as_str().unwrap().to_string();
    let prefix = &id[..8];

    let (stdout, _, code) = run_cli(dir.path(), &["timer", "toggle", prefix]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["status"], "PAUSED");

    run_cli(dir.path(), &["timer", "tick", "--count", "5"]);
    assert_eq!(list(dir.path())[0]["remainingTime"], 30);

    let (stdout, _, _) = run_cli(dir.path(), &["timer", "reset", prefix]);
    assert_eq!(json(&stdout)["type"], "TimerReset");
    assert_eq!(list(dir.path())[0]["status"], "IDLE");

    let (_, _, code) = run_cli(dir.path(), &["timer", "delete", &id]);
    assert_eq!(code, 0);
    assert!(list(dir.path()).is_empty());
}

#[test]
fn test_unknown_id_is_not_an_error() {
    let dir = quiet_dir();
    run_cli(dir.path(), &["timer", "add", "--seconds", "30"]);
    let (stdout, stderr, code) = run_cli(dir.path(), &["timer", "toggle", "no-such-id"]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("no timer matches"));
    assert_eq!(list(dir.path())[0]["status"], "RUNNING");
}

#[test]
fn test_clear_completed() {
    let dir = quiet_dir();
    run_cli(dir.path(), &["timer", "add", "--title", "long", "--seconds", "100"]);
    run_cli(dir.path(), &["timer", "add", "--title", "short", "--seconds", "1"]);
    run_cli(dir.path(), &["timer", "tick"]);

    let (stdout, _, code) = run_cli(dir.path(), &["timer", "clear-completed"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["removed"], 1);
    let timers = list(dir.path());
    assert_eq!(timers.len(), 1);
    assert_eq!(timers[0]["title"], "long");
}

#[test]
fn test_config_get_set() {
    let dir = quiet_dir();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "notifications.enabled"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "false");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "defaults.color", "emerald"]);
    assert_eq!(code, 0);
    run_cli(dir.path(), &["timer", "stopwatch"]);
    let timers = list(dir.path());
    assert_eq!(timers[0]["color"], "bg-emerald-500");
    assert_eq!(timers[0]["title"], "Focus session");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "ticker.speed", "2"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown configuration key"));

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "nope"]);
    assert_eq!(code, 1);
}

#[test]
fn test_permission_roundtrip() {
    let dir = quiet_dir();
    let (stdout, _, _) = run_cli(dir.path(), &["permission", "status"]);
    assert_eq!(stdout.trim(), "default");

    let (stdout, _, code) = run_cli(dir.path(), &["permission", "grant"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "granted");
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "notifications.permission"]);
    assert_eq!(stdout.trim(), "granted");

    run_cli(dir.path(), &["permission", "deny"]);
    let (stdout, _, _) = run_cli(dir.path(), &["permission", "status"]);
    assert_eq!(stdout.trim(), "denied");
}

#[test]
fn test_run_until_idle_completes_countdown() {
    let dir = quiet_dir();
    run_cli(dir.path(), &["config", "set", "ticker.period_ms", "10"]);
    run_cli(dir.path(), &["timer", "add", "--title", "Sprint", "--seconds", "3"]);

    let (stdout, stderr, code) = run_cli(dir.path(), &["run", "--until-idle"]);
    assert_eq!(code, 0, "{stderr}");
    let events: Vec<serde_json::Value> = stdout.lines().map(json).collect();
    assert_eq!(events[0]["type"], "Snapshot");
    let completed: Vec<_> = events
        .iter()
        .filter(|e| e["type"] == "TimerCompleted")
        .collect();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0]["title"], "Sprint");
    assert_eq!(list(dir.path())[0]["status"], "COMPLETED");
}

#[test]
fn test_run_accepts_stdin_commands() {
    let dir = quiet_dir();
    let (stdout, stderr, code) =
        run_cli_with_stdin(dir.path(), &["run"], "quick pomodoro\nbogus\nlist\nquit\n");
    assert_eq!(code, 0, "{stderr}");
    assert!(stderr.contains("unknown command"));

    let events: Vec<serde_json::Value> = stdout.lines().map(json).collect();
    let added = events.iter().position(|e| e["type"] == "TimerAdded").unwrap();
    let last_snapshot = events.iter().rposition(|e| e["type"] == "Snapshot").unwrap();
    // Output follows the order things happened in.
    assert!(added < last_snapshot, "{stdout}");
    assert_eq!(events[last_snapshot]["timers"][0]["title"], "Pomodoro focus");

    assert_eq!(list(dir.path()).len(), 1);
}

#[test]
fn test_run_until_idle_exits_when_nothing_runs() {
    let dir = quiet_dir();
    let (stdout, _, code) = run_cli(dir.path(), &["run", "--until-idle"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.lines().count(), 1);
}
