use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join("projects.json")
}

fn run(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_goalplan"))
        .args(args)
        .env("GOALPLAN_STORE_PATH", store_path(dir))
        .env("GOALPLAN_CONFIG_PATH", dir.path().join("config.json"))
        .env_remove("GOALPLAN_LOG")
        .output()
        .expect("failed to run goalplan")
}

fn run_json(dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = run(dir, args);
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Five tasks from 2026-01-01 to 2026-01-11:
/// milestone-1 holds task-0-0 and task-0-1, milestone-3 holds task-2-0.
fn seed(dir: &TempDir) -> serde_json::Value {
    run_json(
        dir,
        &[
            "new", "Thesis", "--start", "2026-01-01", "--deadline", "2026-01-11", "--task", "Research",
            "--task", "Outline", "--task", "Draft", "--task", "Revise", "--task", "Submit", "--json",
        ],
    )
}

#[test]
fn done_toggles_and_rolls_up_progress() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    let project = run_json(&dir, &["done", "task-0-0", "--json"]);
    assert_eq!(project["milestones"][0]["tasks"][0]["completed"], true);
    assert_eq!(project["milestones"][0]["progress"], 50);
    assert_eq!(project["progress"], 17);

    let output = run(&dir, &["done", "task-0-0"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Reopened task task-0-0 (0% overall)"));
}

#[test]
fn done_with_unknown_task_fails() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    let output = run(&dir, &["done", "task-9-9"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: invalid_input - task not found"));
}

#[test]
fn date_moves_task_and_refits_milestone() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    let project = run_json(&dir, &["date", "task-0-1", "--end", "2026-01-05", "--json"]);
    let milestone = &project["milestones"][0];
    assert_eq!(milestone["tasks"][1]["end_date"], "2026-01-05");
    assert_eq!(milestone["start_date"], "2026-01-01");
    assert_eq!(milestone["end_date"], "2026-01-05");
    assert_eq!(project["milestones"][1]["start_date"], "2026-01-04");
}

#[test]
fn date_requires_an_edge() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    let output = run(&dir, &["date", "task-0-1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: invalid_input - a start or end date is required"));
}

#[test]
fn date_moves_both_edges_at_once() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    let project = run_json(
        &dir,
        &["date", "task-0-0", "--start", "2026-01-08", "--end", "2026-01-09", "--json"],
    );
    let milestone = &project["milestones"][0];
    assert_eq!(milestone["tasks"][0]["start_date"], "2026-01-08");
    assert_eq!(milestone["tasks"][0]["end_date"], "2026-01-09");
    assert_eq!(milestone["start_date"], "2026-01-02");
    assert_eq!(milestone["end_date"], "2026-01-09");
}

#[test]
fn milestone_date_leaves_tasks_alone() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    let project = run_json(
        &dir,
        &["milestone-date", "milestone-2", "--start", "2026-01-05", "--json"],
    );
    let milestone = &project["milestones"][1];
    assert_eq!(milestone["start_date"], "2026-01-05");
    assert_eq!(milestone["tasks"][0]["start_date"], "2026-01-04");
}

#[test]
fn add_move_rename_and_remove_tasks() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    let added = run_json(
        &dir,
        &["add-task", "Proofread", "--milestone", "milestone-3", "--json"],
    );
    let task_id = added["task"]["id"].as_str().unwrap().to_string();
    assert_eq!(added["task"]["start_date"], "2026-01-07");
    let tasks = added["project"]["milestones"][2]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[1]["title"], "Proofread");

    let moved = run_json(&dir, &["move-task", &task_id, "0", "--json"]);
    assert_eq!(moved["milestones"][2]["tasks"][0]["title"], "Proofread");
    assert_eq!(moved["milestones"][2]["tasks"][1]["title"], "Submit");

    let renamed = run_json(&dir, &["rename-task", &task_id, "Final proofread", "--json"]);
    assert_eq!(renamed["milestones"][2]["tasks"][0]["title"], "Final proofread");

    let removed = run_json(&dir, &["remove-task", &task_id, "--json"]);
    let tasks = removed["milestones"][2]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Submit");
}

#[test]
fn move_task_out_of_range_fails() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    let output = run(&dir, &["move-task", "task-0-0", "5"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("index out of range"));
}

#[test]
fn status_can_be_set_or_derived() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    let project = run_json(&dir, &["status", "completed", "--json"]);
    assert_eq!(project["status"], "completed");

    // Every task ended in January 2026, so open work is overdue.
    let project = run_json(&dir, &["status", "--json"]);
    assert_eq!(project["status"], "struggling");

    let output = run(&dir, &["status", "sleeping"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: invalid_input"));
}

#[test]
fn replan_keeps_completed_tasks() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    run_json(&dir, &["done", "task-0-0", "--json"]);

    let project = run_json(
        &dir,
        &["replan", "--start", "2026-02-01", "--deadline", "2026-02-11", "--json"],
    );
    assert_eq!(project["start_date"], "2026-02-01");
    assert_eq!(project["deadline"], "2026-02-11");
    assert_eq!(project["milestones"][0]["start_date"], "2026-02-01");
    assert_eq!(project["milestones"][0]["tasks"][0]["title"], "Research");
    assert_eq!(project["milestones"][0]["tasks"][0]["completed"], true);
    assert_eq!(project["milestones"][2]["end_date"], "2026-02-11");
}
