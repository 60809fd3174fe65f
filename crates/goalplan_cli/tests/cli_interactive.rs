use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join("projects.json")
}

fn run_session(dir: &TempDir, input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_goalplan"))
        .env("GOALPLAN_STORE_PATH", store_path(dir))
        .env("GOALPLAN_CONFIG_PATH", dir.path().join("config.json"))
        .env_remove("GOALPLAN_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn goalplan");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin.write_all(input.as_bytes()).expect("write stdin");
    }

    child.wait_with_output().expect("wait for goalplan")
}

#[test]
fn interactive_help_and_errors_keep_the_loop_alive() {
    let dir = TempDir::new().unwrap();
    let output = run_session(&dir, "help\nfrobnicate\nshow\n\"unterminated\nlist\nexit\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("No projects yet"));
    assert!(stderr.contains("ERROR: invalid_input"));
    assert!(stderr.contains("no active project"));
    assert!(stderr.contains("unterminated quote"));
}

#[test]
fn interactive_commands_share_the_store() {
    let dir = TempDir::new().unwrap();
    let input = concat!(
        "new \"Run a 10k\" --start 2026-01-01 --deadline 2026-01-11 --task \"Buy shoes\" --task Train\n",
        "done task-0-0\n",
        "show\n",
        "quit\n",
        "list\n",
    );
    let output = run_session(&dir, input);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Created project: Run a 10k"));
    assert!(stdout.contains("Completed task task-0-0 (50% overall)"));
    assert!(stdout.contains("Buy shoes"));
    assert!(!stdout.contains("No projects yet"));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store_path(&dir)).unwrap()).unwrap();
    assert_eq!(stored["projects"][0]["milestones"][0]["tasks"][0]["completed"], true);
}
