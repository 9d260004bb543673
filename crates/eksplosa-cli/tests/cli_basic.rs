//! Basic CLI E2E tests.
//!
//! Tests run the built binary with HOME pointed at a temporary directory so
//! config and progress never touch the real user data.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str], stdin: Option<&str>) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_eksplosa"))
        .args(args)
        .env("HOME", home)
        .env_remove("EKSPLOSA_ENV")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    {
        let mut pipe = child.stdin.take().unwrap();
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).unwrap();
        }
    }

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (stdout, stderr, code)
}

#[test]
fn test_provinces_list_builtin() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["provinces", "list", "--builtin", "--json"], None);
    assert_eq!(code, 0);
    let page: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(page["total"], 1);
    assert_eq!(page["has_more"], false);
    assert!(stdout.contains("Jawa Timur"));
}

#[test]
fn test_provinces_show_unknown_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["provinces", "show", "99", "--builtin"], None);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_provinces_show_lists_quiz_links() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["provinces", "show", "jawa-timur", "--builtin"], None);
    assert_eq!(code, 0);
    assert!(stdout.contains("Bahasa di Provinsi Jawa Timur"));
    assert!(stdout.contains("/pages/quizPage.html?language=1&province=1"));
}

#[test]
fn test_quiz_link() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["quiz", "link", "--language", "3", "--province", "1"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "/pages/quizPage.html?language=3&province=1");

    let (_, stderr, code) = run_cli(home.path(), &["quiz", "link", "--province", "1"], None);
    assert_eq!(code, 1);
    assert!(stderr.contains("language"));
}

#[test]
fn test_quiz_play_saves_progress() {
    let home = tempfile::tempdir().unwrap();
    let args = [
        "quiz", "play", "--builtin", "--language", "1", "--province", "1", "--no-wait",
    ];
    let (stdout, stderr, code) = run_cli(home.path(), &args, Some("Aku\nlagi\nnedha\nq\n"));
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("Wah Selamat!"));
    assert!(stdout.contains("score: 1"));

    let (stdout, _, code) = run_cli(home.path(), &["progress", "show", "--json"], None);
    assert_eq!(code, 0);
    let progress: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(progress["completed"], serde_json::json!(["1a"]));
    assert_eq!(progress["last_level"]["1"], "1a");

    let (stdout, _, code) = run_cli(
        home.path(),
        &["quiz", "levels", "--builtin", "--link", "?language=1&province=1", "--json"],
        None,
    );
    assert_eq!(code, 0);
    let levels: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(levels[0]["completed"], true);
    assert_eq!(levels[1]["active"], true);
    assert_eq!(levels[2]["accessible"], false);

    let (_, _, code) = run_cli(home.path(), &["progress", "reset"], None);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(home.path(), &["progress", "show"], None);
    assert!(stdout.contains("no completed levels"));
}

#[test]
fn test_quiz_play_wrong_answer_keeps_score() {
    let home = tempfile::tempdir().unwrap();
    let args = [
        "quiz", "play", "--builtin", "--language", "1", "--province", "1", "--no-wait", "--dry-run",
    ];
    let (stdout, _, code) = run_cli(home.path(), &args, Some("nedha\nlagi\nAku\nq\n"));
    assert_eq!(code, 0);
    assert!(stdout.contains("Tetap Semangat!"));
    assert!(stdout.contains("score: 0"));
}

#[test]
fn test_quiz_play_json_events() {
    let home = tempfile::tempdir().unwrap();
    let args = [
        "quiz", "play", "--builtin", "--language", "1", "--province", "1", "--no-wait", "--dry-run",
        "--json",
    ];
    let (stdout, _, code) = run_cli(home.path(), &args, Some("q\n"));
    assert_eq!(code, 0);
    let types: Vec<String> = stdout
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["type"].as_str().unwrap().to_string())
        .collect();
    assert!(types.contains(&"LevelStarted".to_string()));
    assert!(types.contains(&"QuestionPresented".to_string()));
}

#[test]
fn test_carousel_simulate() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(
        home.path(),
        &["carousel", "simulate", "drag:600:300", "next", "goto:99", "resize:375:375"],
        None,
    );
    assert_eq!(code, 0);
    let steps: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[0]["index"], 1);
    assert_eq!(steps[0]["transform"]["offset"], -260.0);
    assert_eq!(steps[1]["index"], 2);
    assert_eq!(steps[2]["index"], 4);
    assert_eq!(steps[3]["transform"]["transition_ms"], 0);
}

#[test]
fn test_config_set_and_get() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["config", "set", "quiz.feedback_delay_ms", "900"], None);
    assert_eq!(code, 0);
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "quiz.feedback_delay_ms"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "900");

    let (_, stderr, code) = run_cli(home.path(), &["config", "get", "quiz.nope"], None);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_section_reset() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "set", "quiz.feedback_delay_ms", "900"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "quiz.feedback_delay_ms = 900");
    let (_, _, code) = run_cli(home.path(), &["config", "set", "carousel.breakpoint_px", "640"], None);
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(home.path(), &["config", "reset", "--section", "quiz"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "[quiz] reset to defaults");

    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "quiz.feedback_delay_ms"], None);
    assert_eq!(stdout.trim(), "1500");
    let (stdout, _, code) = run_cli(home.path(), &["config", "show", "--section", "carousel", "--json"], None);
    assert_eq!(code, 0);
    let carousel: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(carousel["breakpoint_px"], 640.0);

    let (stdout, _, code) = run_cli(home.path(), &["config", "path"], None);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("config.toml"));
}
