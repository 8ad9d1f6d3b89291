use assert_cmd::Command;
use predicates::str::contains;
use serde_json::json;
use std::path::Path;

fn write_json(dir: &Path, name: &str, value: serde_json::Value) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
    path
}

fn split_label_detections() -> serde_json::Value {
    json!([
        {"text": "Ali", "score": 0.9, "bounds": {"x": 10, "y": 10, "w": 40, "h": 20}},
        {"text": "ce", "score": 0.9, "bounds": {"x": 52, "y": 10, "w": 20, "h": 20}},
    ])
}

#[test]
fn merge_lists_reconstructed_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(dir.path(), "detections.json", split_label_detections());

    let mut cmd = Command::cargo_bin("listsense").unwrap();
    cmd.arg("merge")
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("1 entries:"))
        .stdout(contains("Alice @ (46, 20)"));
}

#[test]
fn merge_json_output_is_machine_readable() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(dir.path(), "detections.json", split_label_detections());

    let mut cmd = Command::cargo_bin("listsense").unwrap();
    let output = cmd.arg("merge").arg(&path).arg("--json").output().unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["text"], "Alice");
    assert_eq!(entries[0]["click_x"], 46);
}

#[test]
fn merge_threshold_flag_filters_detections() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(dir.path(), "detections.json", split_label_detections());

    let mut cmd = Command::cargo_bin("listsense").unwrap();
    cmd.arg("merge")
        .arg(&path)
        .args(["--threshold", "0.95"])
        .assert()
        .success()
        .stdout(contains("0 entries:"));
}

#[test]
fn merge_rejects_unreadable_input_with_exit_2() {
    let mut cmd = Command::cargo_bin("listsense").unwrap();
    cmd.arg("merge")
        .arg("no_such_file.json")
        .assert()
        .code(2);
}

#[test]
fn match_succeeds_on_fullwidth_variant() {
    let mut cmd = Command::cargo_bin("listsense").unwrap();
    cmd.args(["match", "旅人(测试)", "旅人 （测试）"])
        .assert()
        .success()
        .stdout(contains("match"));
}

#[test]
fn match_fails_with_exit_1_on_distant_names() {
    let mut cmd = Command::cargo_bin("listsense").unwrap();
    cmd.args(["match", "Alice", "Bob"]).assert().code(1);
}

#[test]
fn match_json_reports_similarity_and_verdict() {
    let mut cmd = Command::cargo_bin("listsense").unwrap();
    let output = cmd
        .args(["match", "Alice", "Alice", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["similarity"], 1.0);
    assert_eq!(report["matched"], true);
}

#[test]
fn run_executes_a_scripted_batch() {
    let dir = tempfile::tempdir().unwrap();
    let script = json!({
        "targets": [{"name": "Alice", "gift_option": "all"}],
        "viewport": {
            "frames": [
                {"detections": [
                    {"text": "Alice", "score": 0.9, "bounds": {"x": 10, "y": 10, "w": 40, "h": 20}}
                ]}
            ]
        }
    });
    let path = write_json(dir.path(), "script.json", script);

    let mut cmd = Command::cargo_bin("listsense").unwrap();
    cmd.arg("run")
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("Batch completed:"))
        .stdout(contains("task: invite_selected"));
}

#[test]
fn run_reports_cancellation_with_exit_1() {
    let dir = tempfile::tempdir().unwrap();
    let script = json!({
        "targets": [{"name": "Ghost", "gift_option": "none"}],
        "viewport": {
            "frames": [{}, {}],
            "stop_after_polls": 1
        }
    });
    let path = write_json(dir.path(), "script.json", script);

    let mut cmd = Command::cargo_bin("listsense").unwrap();
    cmd.arg("run")
        .arg(&path)
        .assert()
        .code(1)
        .stdout(contains("Batch cancelled:"));
}

#[test]
fn run_json_summary_counts_host_activity() {
    let dir = tempfile::tempdir().unwrap();
    let script = json!({
        "targets": [{"name": "Ghost", "gift_option": "none"}],
        "viewport": {
            "frames": [{"at_top": true}, {"at_bottom": true}]
        }
    });
    let path = write_json(dir.path(), "script.json", script);

    let mut cmd = Command::cargo_bin("listsense").unwrap();
    let output = cmd.arg("run").arg(&path).arg("--json").output().unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["completed"], true);
    assert_eq!(summary["scroll_downs"], 1);
    assert_eq!(summary["clicks"].as_array().unwrap().len(), 0);
}

#[test]
fn run_honors_an_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(&config_path, "[tasks]\nfollow_up = \"custom_flow\"\n").unwrap();

    let script = json!({
        "targets": [{"name": "Alice", "gift_option": "none"}],
        "viewport": {
            "frames": [
                {"detections": [
                    {"text": "Alice", "score": 0.9, "bounds": {"x": 10, "y": 10, "w": 40, "h": 20}}
                ]}
            ]
        }
    });
    let script_path = write_json(dir.path(), "script.json", script);

    let mut cmd = Command::cargo_bin("listsense").unwrap();
    cmd.arg("run")
        .arg(&script_path)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(contains("task: custom_flow"));
}
