//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_focusquest"))
        .args(args)
        .env("FOCUSQUEST_DATA_DIR", data_dir)
        .env_remove("FOCUSQUEST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("{args:?} printed non-JSON ({e}): {stdout}"))
}

#[test]
fn test_task_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();

    let created = run_json(
        data,
        &[
            "task",
            "add",
            "Read chapter 3",
            "--priority",
            "high",
            "--method",
            "priority-quadrant",
            "--quadrant",
            "urgent-important",
        ],
    );
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["method"], "priority-quadrant");
    assert_eq!(created["quadrant"], "urgent-important");

    let filtered = run_json(data, &["task", "list", "--method", "timed-focus"]);
    assert!(filtered.as_array().unwrap().is_empty());
    let all = run_json(data, &["task", "list"]);
    assert_eq!(all.as_array().unwrap().len(), 1);

    let event = run_json(data, &["task", "complete", &id]);
    assert_eq!(event["type"], "TaskCompleted");
    assert!(run_json(data, &["task", "list"]).as_array().unwrap().is_empty());

    let summary = run_json(data, &["task", "summary"]);
    assert_eq!(summary["completed_today"], 1);

    let (_, _, code) = run_cli(data, &["task", "restore", &id]);
    assert_eq!(code, 0);
    let restored = run_json(data, &["task", "list"]);
    assert_eq!(restored[0]["completed"], false);
}

#[test]
fn test_unknown_task_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["task", "complete", "missing"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("task not found: missing"));
}

#[test]
fn test_time_block_rejects_reversed_range() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &[
            "task",
            "add",
            "Deep work",
            "--method",
            "time-block",
            "--block-start",
            "11:00",
            "--block-end",
            "09:00",
        ],
    );
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_goal_milestones_reach_trophy() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();

    let goal = run_json(
        data,
        &["goal", "add", "Finish thesis", "--deadline", "2099-01-01", "--milestone", "draft"],
    );
    let goal_id = goal["id"].as_str().unwrap().to_string();
    let milestone_id = goal["milestones"][0]["id"].as_str().unwrap().to_string();

    let (stdout, stderr, code) = run_cli(data, &["goal", "toggle", &goal_id, &milestone_id]);
    assert_eq!(code, 0, "{stderr}");
    assert!(stderr.contains("Goal achieved: Finish thesis"));
    let toggled: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(toggled["completedAt"].is_string());

    let listed = run_json(data, &["goal", "list"]);
    assert_eq!(listed[0]["progress"], 100);
    assert_eq!(listed[0]["achieved"], true);
}

#[test]
fn test_blank_titles_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();

    let (_, stderr, code) = run_cli(data, &["task", "add", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.contains("'title' must not be empty"), "{stderr}");

    let (_, stderr, code) = run_cli(data, &["goal", "add", "", "--deadline", "2099-01-01"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("'title' must not be empty"), "{stderr}");

    let created = run_json(data, &["task", "add", "Keep me"]);
    let id = created["id"].as_str().unwrap().to_string();
    let (_, stderr, code) = run_cli(data, &["task", "update", &id, "--title", " "]);
    assert_eq!(code, 1);
    assert!(stderr.contains("'title' must not be empty"), "{stderr}");
    assert_eq!(run_json(data, &["task", "list"])[0]["title"], "Keep me");
}

#[test]
fn test_stats_start_empty() {
    let dir = tempfile::tempdir().unwrap();
    let stats = run_json(dir.path(), &["stats", "show"]);
    assert_eq!(stats["streak"], 0);
    assert_eq!(stats["totalSessions"], 0);

    let heatmap = run_json(dir.path(), &["stats", "heatmap", "--days", "14"]);
    assert_eq!(heatmap["cells"].as_array().unwrap().len(), 14);
}

#[test]
fn test_timer_status_and_start() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();

    let status = run_json(data, &["timer", "status"]);
    assert_eq!(status["phase"], "focus");
    assert_eq!(status["running"], false);
    assert_eq!(status["display"], "25:00");

    let started = run_json(data, &["timer", "start"]);
    assert_eq!(started["type"], "TimerStarted");
    assert_eq!(run_json(data, &["timer", "status"])["running"], true);

    let reset = run_json(data, &["timer", "reset"]);
    assert_eq!(reset["type"], "TimerReset");
    assert_eq!(run_json(data, &["timer", "status"])["running"], false);
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();

    let (_, _, code) = run_cli(data, &["config", "set", "timer.focus_minutes", "50"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(data, &["config", "get", "timer.focus_minutes"]);
    assert_eq!(stdout.trim(), "50");

    let (_, stderr, code) = run_cli(data, &["config", "set", "timer.break_minutes", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("timer.break_minutes"));

    assert_eq!(run_json(data, &["timer", "status"])["display"], "50:00");
}

#[test]
fn test_prefs_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path();

    assert_eq!(run_json(data, &["prefs", "show"])["showWelcome"], false);
    let (_, _, code) = run_cli(data, &["prefs", "theme", "neon"]);
    assert_eq!(code, 0);
    run_cli(data, &["prefs", "onboard"]);

    let prefs = run_json(data, &["prefs", "show"]);
    assert_eq!(prefs["theme"], "neon");
    assert_eq!(prefs["showWelcome"], true);

    run_cli(data, &["prefs", "welcome"]);
    assert_eq!(run_json(data, &["prefs", "show"])["showWelcome"], false);
}

#[test]
fn test_chat_rejects_blank_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["chat", "ask", "  "]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_completions_bash() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("focusquest"));
}
