//! Integration tests for the `wf` CLI.
//!
//! Each test points `wf` at a temp data directory (and a config path that
//! does not exist, so defaults apply), runs it as a subprocess, and checks
//! stdout, stderr, and the files it leaves behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use pretty_assertions::assert_eq;

/// Get the path to the built `wf` binary.
fn wf_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("wf");
    path
}

/// Run `wf` against `dir`, returning (stdout, stderr, success).
fn run_wf(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(wf_bin())
        .arg("-C")
        .arg(dir.join("data"))
        .arg("--config")
        .arg(dir.join("config.toml"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run wf");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `wf` expecting success, return stdout.
fn run_wf_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_wf(dir, args);
    if !success {
        panic!("wf {:?} failed:\nstdout: {}\nstderr: {}", args, stdout, stderr);
    }
    stdout
}

fn read_document(dir: &Path) -> serde_json::Value {
    let text = fs::read_to_string(dir.join("data/rows/1.json")).unwrap();
    let row: serde_json::Value = serde_json::from_str(&text).unwrap();
    row["content"].clone()
}

/// Add a task and return its id
fn add(dir: &Path, day: &str, time: &str, title: &str) -> String {
    run_wf_ok(dir, &["add", day, time, title]).trim().to_string()
}

// ---------------------------------------------------------------------------
// Boards
// ---------------------------------------------------------------------------

#[test]
fn test_first_run_creates_default_board() {
    let tmp = tempfile::TempDir::new().unwrap();

    let out = run_wf_ok(tmp.path(), &["boards"]);
    assert!(out.starts_with("* Semana Padrão  (b_"));
    assert!(out.contains("0 tasks"));

    let doc = read_document(tmp.path());
    assert_eq!(doc["boards"].as_array().unwrap().len(), 1);
    assert_eq!(doc["activeBoardId"], doc["boards"][0]["id"]);
    assert_eq!(doc["boards"][0]["days"].as_object().unwrap().len(), 7);
}

#[test]
fn test_board_lifecycle() {
    let tmp = tempfile::TempDir::new().unwrap();

    let week_a = run_wf_ok(tmp.path(), &["board", "new", "Week A"]).trim().to_string();
    assert!(week_a.starts_with("b_"));
    add(tmp.path(), "mon", "09:00", "Standup");
    run_wf_ok(tmp.path(), &["board", "dup", "Week A", "Week B"]);
    run_wf_ok(tmp.path(), &["board", "rename", &week_a, "Week A1"]);

    let out = run_wf_ok(tmp.path(), &["boards", "--json"]);
    let boards: serde_json::Value = serde_json::from_str(&out).unwrap();
    let names: Vec<&str> = boards
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Semana Padrão", "Week A1", "Week B"]);
    assert_eq!(boards[2]["active"], true);
    assert_eq!(boards[2]["tasks"], 1);

    run_wf_ok(tmp.path(), &["board", "rm", "Week B", "--yes"]);
    let out = run_wf_ok(tmp.path(), &["boards"]);
    assert!(!out.contains("Week B"));
    assert!(out.starts_with("* Semana Padrão"));
}

#[test]
fn test_board_rm_without_yes_is_cancelled() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_wf_ok(tmp.path(), &["board", "new", "Week A"]);

    // stdin is closed, so the prompt reads an empty answer
    let (stdout, stderr, success) = run_wf(tmp.path(), &["board", "rm", "Week A"]);
    assert!(success);
    assert!(stderr.contains("Delete board 'Week A' and its 0 tasks? [y/n]"));
    assert!(stdout.contains("cancelled"));
    assert!(run_wf_ok(tmp.path(), &["boards"]).contains("Week A"));
}

#[test]
fn test_unknown_board_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_wf(tmp.path(), &["board", "use", "Nope"]);
    assert!(!success);
    assert!(stderr.contains("error: board not found: Nope"));
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[test]
fn test_tasks_are_sorted_by_time() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_wf_ok(tmp.path(), &["board", "new", "Week A"]);
    add(tmp.path(), "1", "09:00", "Standup");
    add(tmp.path(), "monday", "08:00", "Coffee");

    let out = run_wf_ok(tmp.path(), &["tasks", "--day", "mon"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Week A");
    assert_eq!(lines[1], "Monday:");
    assert!(lines[2].starts_with("  [ ] 08:00  Coffee  t_"));
    assert!(lines[3].starts_with("  [ ] 09:00  Standup  t_"));
}

#[test]
fn test_tasks_json_has_every_day() {
    let tmp = tempfile::TempDir::new().unwrap();
    add(tmp.path(), "fri", "17:00", "Review");

    let out = run_wf_ok(tmp.path(), &["tasks", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let days = parsed["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[5]["name"], "Friday");
    assert_eq!(days[5]["tasks"][0]["title"], "Review");
    assert_eq!(days[5]["tasks"][0]["done"], false);
}

#[test]
fn test_toggle_flips_done() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = add(tmp.path(), "tue", "09:00", "Standup");

    let out = run_wf_ok(tmp.path(), &["toggle", "tue", &id]);
    assert_eq!(out.trim(), format!("{} done", id));
    assert_eq!(read_document(tmp.path())["boards"][0]["days"]["2"][0]["done"], true);

    let out = run_wf_ok(tmp.path(), &["toggle", "tue", &id]);
    assert_eq!(out.trim(), format!("{} not done", id));
}

#[test]
fn test_edit_resorts_bucket() {
    let tmp = tempfile::TempDir::new().unwrap();
    let late = add(tmp.path(), "wed", "10:00", "Late");
    add(tmp.path(), "wed", "09:00", "Early");

    run_wf_ok(tmp.path(), &["edit", "wed", &late, "--time", "07:00", "--title", "Earliest"]);
    let doc = read_document(tmp.path());
    let bucket = &doc["boards"][0]["days"]["3"];
    assert_eq!(bucket[0]["title"], "Earliest");
    assert_eq!(bucket[0]["id"], late.as_str());
    assert_eq!(bucket[1]["title"], "Early");
}

#[test]
fn test_rm_task() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = add(tmp.path(), "thu", "09:00", "Standup");

    run_wf_ok(tmp.path(), &["rm", "thu", &id, "--yes"]);
    let doc = read_document(tmp.path());
    assert!(doc["boards"][0]["days"]["4"].as_array().unwrap().is_empty());

    let (_, stderr, success) = run_wf(tmp.path(), &["rm", "thu", &id, "--yes"]);
    assert!(!success);
    assert!(stderr.contains("task not found"));
}

#[test]
fn test_invalid_time_is_rejected() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_wf(tmp.path(), &["add", "mon", "9am", "Coffee"]);
    assert!(!success);
    assert!(stderr.contains("expected HH:MM"));
}

#[test]
fn test_template_copies_day() {
    let tmp = tempfile::TempDir::new().unwrap();
    let coffee = add(tmp.path(), "mon", "08:00", "Coffee");
    add(tmp.path(), "mon", "09:00", "Standup");
    add(tmp.path(), "tue", "08:30", "Gym");
    run_wf_ok(tmp.path(), &["toggle", "mon", &coffee]);

    let out = run_wf_ok(tmp.path(), &["template", "mon", "tue"]);
    assert_eq!(out.trim(), "copied 2 tasks from Monday to Tuesday");

    let doc = read_document(tmp.path());
    let tuesday = doc["boards"][0]["days"]["2"].as_array().unwrap();
    let titles: Vec<&str> = tuesday.iter().map(|t| t["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["Coffee", "Gym", "Standup"]);
    assert!(tuesday.iter().all(|t| t["done"] == false));
    assert_ne!(tuesday[0]["id"], coffee.as_str());
}

#[test]
fn test_template_from_empty_day_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_wf(tmp.path(), &["template", "sun", "mon"]);
    assert!(!success);
    assert!(stderr.contains("error: Sunday has no tasks to copy"));
}

// ---------------------------------------------------------------------------
// Diagram
// ---------------------------------------------------------------------------

#[test]
fn test_diagram_chains_tasks() {
    let tmp = tempfile::TempDir::new().unwrap();
    let a = add(tmp.path(), "sat", "07:00", "Wake up");
    let b = add(tmp.path(), "sat", "07:30", "Breakfast");
    let c = add(tmp.path(), "sat", "08:00", "Commute");
    run_wf_ok(tmp.path(), &["toggle", "sat", &a]);

    let out = run_wf_ok(tmp.path(), &["diagram", "--day", "6", "--theme", "dark"]);
    assert!(out.starts_with("%%{init:"));
    assert!(out.contains("\"primaryColor\":\"#161b22\""));
    assert!(out.contains("flowchart TD\n"));
    assert!(out.contains(&format!("    T6_{}[\"07:00 - Wake up\"]\n", a)));
    assert!(out.contains(&format!("    class T6_{} done\n", a)));
    assert!(out.contains(&format!("    T6_{} --> T6_{}\n", a, b)));
    assert!(out.contains(&format!("    T6_{} --> T6_{}\n", b, c)));
    assert_eq!(out.matches("-->").count(), 2);
}

#[test]
fn test_diagram_empty_day_placeholder() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_wf_ok(tmp.path(), &["diagram", "--day", "sun"]);
    assert_eq!(out, "graph TD\n    A[\"No tasks for today.\"];\n");
}

// ---------------------------------------------------------------------------
// Preferences, recovery, locations
// ---------------------------------------------------------------------------

#[test]
fn test_theme_preference() {
    let tmp = tempfile::TempDir::new().unwrap();
    assert_eq!(run_wf_ok(tmp.path(), &["theme"]).trim(), "light");
    run_wf_ok(tmp.path(), &["theme", "dark"]);
    assert_eq!(run_wf_ok(tmp.path(), &["theme"]).trim(), "dark");

    let prefs = fs::read_to_string(tmp.path().join("data/.prefs.json")).unwrap();
    assert!(prefs.contains("\"dark\""));
}

#[test]
fn test_unreadable_document_falls_back_and_is_recorded() {
    let tmp = tempfile::TempDir::new().unwrap();
    let rows = tmp.path().join("data/rows");
    fs::create_dir_all(&rows).unwrap();
    fs::write(
        rows.join("1.json"),
        r#"{"id": 1, "content": {"boards": "not a list"}}"#,
    )
    .unwrap();

    let out = run_wf_ok(tmp.path(), &["boards"]);
    assert!(out.contains("Semana Padrão"));

    let out = run_wf_ok(tmp.path(), &["recovery"]);
    assert!(out.contains("[load] unreadable document"));

    let out = run_wf_ok(tmp.path(), &["recovery", "--clear"]);
    assert_eq!(out.trim(), "cleared 1 recovery entry");
    assert_eq!(run_wf_ok(tmp.path(), &["recovery"]).trim(), "No recovery entries.");
}

#[test]
fn test_where_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_wf_ok(tmp.path(), &["where", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let data = tmp.path().join("data");
    assert_eq!(parsed["data"], data.display().to_string());
    assert_eq!(parsed["document"], data.join("rows/1.json").display().to_string());
    assert_eq!(parsed["log"], data.join("weekflow.log").display().to_string());
}

#[test]
fn test_malformed_config_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[store\nrow_id = ").unwrap();
    let (_, stderr, success) = run_wf(tmp.path(), &["boards"]);
    assert!(!success);
    assert!(stderr.contains("error: could not parse"));
}
