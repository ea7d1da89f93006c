//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory.

use std::path::Path;
use std::process::Command;

const GEMINI_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

/// Run a CLI command against `home` and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_habitquest"))
        .args(args)
        .env("HABITQUEST_HOME", home)
        .env("GEMINI_API_KEY", "test-key")
        .env_remove("HABITQUEST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "CLI command failed {:?}: {}", args, stderr);
    stdout
}

/// Strip the "Habit created: <id>" line and parse the JSON body.
fn created_habit(stdout: &str) -> serde_json::Value {
    let body = stdout.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
    serde_json::from_str(body).expect("habit JSON")
}

#[test]
fn test_habit_commands_require_login() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["habit", "list"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Not signed in"), "stderr: {stderr}");
}

#[test]
fn test_login_and_whoami() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["auth", "login", "alice"]);
    let who = run_cli_success(home.path(), &["auth", "whoami"]);
    assert_eq!(who.trim(), "alice");
    run_cli_success(home.path(), &["auth", "logout"]);
    let (_, _, code) = run_cli(home.path(), &["auth", "whoami"]);
    assert_ne!(code, 0);
}

#[test]
fn test_habit_add_and_list() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["auth", "login", "alice"]);
    let out = run_cli_success(
        home.path(),
        &["habit", "add", "Morning Run", "--icon", "flame", "--duration", "10"],
    );
    assert!(out.starts_with("Habit created: "));
    let habit = created_habit(&out);
    assert_eq!(habit["name"], "Morning Run");
    assert_eq!(habit["icon"], "Flame");
    assert_eq!(habit["streak"], 0);

    let list = run_cli_success(home.path(), &["habit", "list"]);
    let parsed: serde_json::Value = serde_json::from_str(&list).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["progress"]["goal"], 10);
}

#[test]
fn test_habit_add_rejects_unknown_icon() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["auth", "login", "alice"]);
    let (_, stderr, code) = run_cli(home.path(), &["habit", "add", "Run", "--icon", "rocket"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown icon"));
}

#[test]
fn test_habit_toggle_reaches_milestone() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["auth", "login", "alice"]);
    let habit = created_habit(&run_cli_success(home.path(), &["habit", "add", "Read"]));
    let id = habit["id"].as_str().unwrap().to_string();

    for date in ["2024-05-19", "2024-05-20"] {
        run_cli_success(home.path(), &["habit", "toggle", &id, "--date", date]);
    }
    let out = run_cli_success(home.path(), &["habit", "toggle", &id, "--date", "2024-05-21"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["completed"], true);
    assert_eq!(parsed["habit"]["streak"], 3);
    assert_eq!(parsed["habit"]["longest_streak"], 3);
    assert_eq!(parsed["milestone"]["streak"], 3);

    // Un-marking is silent and keeps the longest streak.
    let out = run_cli_success(home.path(), &["habit", "toggle", &id, "--date", "2024-05-21"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["completed"], false);
    assert_eq!(parsed["habit"]["streak"], 0);
    assert_eq!(parsed["habit"]["longest_streak"], 3);
    assert!(parsed["milestone"].is_null());
}

#[test]
fn test_habit_toggle_rejects_bad_date() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["auth", "login", "alice"]);
    let habit = created_habit(&run_cli_success(home.path(), &["habit", "add", "Read"]));
    let id = habit["id"].as_str().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["habit", "toggle", id, "--date", "21/05/2024"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("expected YYYY-MM-DD"));
}

#[test]
fn test_unknown_habit_is_not_found() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["auth", "login", "alice"]);
    let (_, stderr, code) = run_cli(home.path(), &["habit", "toggle", "missing"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Habit not found: missing"));
}

#[test]
fn test_habits_are_scoped_to_user() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["auth", "login", "alice"]);
    let habit = created_habit(&run_cli_success(home.path(), &["habit", "add", "Read"]));
    let id = habit["id"].as_str().unwrap().to_string();

    run_cli_success(home.path(), &["auth", "login", "bob"]);
    let list = run_cli_success(home.path(), &["habit", "list"]);
    assert_eq!(list.trim(), "[]");
    let (_, _, code) = run_cli(home.path(), &["habit", "show", &id]);
    assert_ne!(code, 0);
}

#[test]
fn test_habit_share_and_delete() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["auth", "login", "alice"]);
    let habit = created_habit(&run_cli_success(home.path(), &["habit", "add", "Meditate"]));
    let id = habit["id"].as_str().unwrap().to_string();

    let share = run_cli_success(home.path(), &["habit", "share", &id]);
    assert!(share.contains("0-day streak for my habit \"Meditate\""));

    run_cli_success(home.path(), &["habit", "delete", &id]);
    let (_, _, code) = run_cli(home.path(), &["habit", "delete", &id]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_get_set() {
    let home = tempfile::tempdir().unwrap();
    let value = run_cli_success(home.path(), &["config", "get", "milestones.thresholds"]);
    assert_eq!(value.trim(), "[3,7,14,30,50,100]");

    run_cli_success(home.path(), &["config", "set", "milestones.thresholds", "[2, 4]"]);
    let value = run_cli_success(home.path(), &["config", "get", "milestones.thresholds"]);
    assert_eq!(value.trim(), "[2,4]");

    let (_, _, code) = run_cli(home.path(), &["config", "get", "nope.key"]);
    assert_ne!(code, 0);
}

#[test]
fn test_icons_and_completions() {
    let home = tempfile::tempdir().unwrap();
    let icons = run_cli_success(home.path(), &["habit", "icons"]);
    let parsed: serde_json::Value = serde_json::from_str(&icons).unwrap();
    assert_eq!(parsed["icons"].as_array().unwrap().len(), 10);
    assert_eq!(parsed["colors"][0], "#FFA500");

    let script = run_cli_success(home.path(), &["completions", "bash"]);
    assert!(script.contains("habitquest"));
}

#[test]
fn test_store_failures_print_generic_message() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["auth", "login", "alice"]);
    run_cli_success(home.path(), &["habit", "add", "Read"]);

    let conn = rusqlite::Connection::open(home.path().join("habitquest.db")).unwrap();
    conn.execute("UPDATE habits SET completion_dates = 'oops'", [])
        .unwrap();
    drop(conn);

    let (_, stderr, code) = run_cli(home.path(), &["habit", "list"]);
    assert_ne!(code, 0);
    assert!(
        stderr.contains("Failed to load habits. Please try again."),
        "stderr: {stderr}"
    );
    assert!(!stderr.contains("Corrupt row"), "stderr: {stderr}");
}

/// Serve a fixed three-item answer on a local mock model endpoint.
fn mock_gemini(server: &mut mockito::Server, hits: usize) -> mockito::Mock {
    let text = r#"{"suggestions": ["1. Walk", "2. Read", "3. Sleep"]}"#;
    server
        .mock("POST", GEMINI_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": text }] } }]
            })
            .to_string(),
        )
        .expect(hits)
        .create()
}

fn point_at(home: &Path, server: &mockito::Server) {
    let url = server.url();
    run_cli_success(home, &["config", "set", "suggestions.endpoint", &url]);
}

#[test]
fn test_suggest_requires_login_before_asking_model() {
    let home = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let mock = mock_gemini(&mut server, 0);
    point_at(home.path(), &server);

    let (_, stderr, code) = run_cli(
        home.path(),
        &["suggest", "--interests", "x", "--goals", "y"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("Not signed in"), "stderr: {stderr}");
    mock.assert();
}

#[test]
fn test_suggest_lists_and_adopts() {
    let home = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let mock = mock_gemini(&mut server, 2);
    point_at(home.path(), &server);
    run_cli_success(home.path(), &["auth", "login", "alice"]);

    let out = run_cli_success(
        home.path(),
        &["suggest", "--interests", "x", "--goals", "y"],
    );
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        parsed["suggestions"],
        serde_json::json!(["Walk", "Read", "Sleep"])
    );

    let out = run_cli_success(
        home.path(),
        &["suggest", "--interests", "x", "--goals", "y", "--add", "2"],
    );
    let created: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(created[0]["name"], "Read");
    assert_eq!(
        created[0]["description"],
        "AI Suggested Habit. Edit to add your own description."
    );
    mock.assert();
}

#[test]
fn test_suggest_with_bad_position_adds_nothing() {
    let home = tempfile::tempdir().unwrap();
    let mut server = mockito::Server::new();
    let mock = mock_gemini(&mut server, 1);
    point_at(home.path(), &server);
    run_cli_success(home.path(), &["auth", "login", "alice"]);

    let (_, stderr, code) = run_cli(
        home.path(),
        &["suggest", "--interests", "x", "--goals", "y", "--add", "1", "--add", "9"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("no suggestion #9 (got 3)"), "stderr: {stderr}");
    mock.assert();

    let list = run_cli_success(home.path(), &["habit", "list"]);
    assert_eq!(list.trim(), "[]");
}
