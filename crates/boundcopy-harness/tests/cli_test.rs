// cli_test.rs
// Drives the boundcopy-harness binary end to end: matrix runs with reports and
// logs, capacity resolution from the environment, and non-zero exits for bad
// capacities, failing fixtures and malformed logs.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use boundcopy_harness::structured_log::validate_log_line;

fn unique_tmp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let dir = std::env::temp_dir().join(format!("{prefix}-{}-{nanos}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn harness() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_boundcopy-harness"));
    cmd.env_remove("BOUNDCOPY_CAPACITY");
    cmd
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn read_json(path: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("read {}: {e}", path.display()));
    serde_json::from_str(&raw).expect("report JSON should parse")
}

#[test]
fn run_matrix_writes_reports_and_a_valid_log() {
    let dir = unique_tmp_dir("boundcopy-cli-matrix");
    let log = dir.join("logs/matrix.log.jsonl");
    let report = dir.join("matrix.md");

    let output = harness()
        .args(["run-matrix", "--capacity", "8", "--run-id", "cli"])
        .arg("--log")
        .arg(&log)
        .arg("--report")
        .arg(&report)
        .output()
        .expect("harness run-matrix should execute");
    assert!(output.status.success(), "run-matrix failed: {}", stderr(&output));

    let markdown = std::fs::read_to_string(&report).expect("markdown report written");
    assert!(markdown.contains("- Capacity: 8 bytes"));
    let json = read_json(&dir.join("matrix.json"));
    assert_eq!(json["capacity"], 8);
    assert_eq!(json["total"], 7 + 2 * 8);
    assert_eq!(json["failed"], 0);

    let content = std::fs::read_to_string(&log).expect("log written");
    let last = content.lines().last().expect("log is not empty");
    let entry = validate_log_line(last, 1).expect("last line validates");
    assert_eq!(entry.event, "report_written");
    let refs = entry.artifact_refs.expect("report paths referenced");
    assert_eq!(refs.len(), 2);
    assert!(refs[1].ends_with("matrix.json"));

    let output = harness()
        .arg("validate-log")
        .arg("--log")
        .arg(&log)
        .output()
        .expect("harness validate-log should execute");
    assert!(output.status.success(), "validate-log failed: {}", stderr(&output));
    assert!(stderr(&output).contains("0 error(s)"));

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn capacity_falls_back_to_environment() {
    let dir = unique_tmp_dir("boundcopy-cli-env");
    let report = dir.join("env.md");

    let output = harness()
        .env("BOUNDCOPY_CAPACITY", "0x4")
        .arg("run-matrix")
        .arg("--log")
        .arg(dir.join("env.log.jsonl"))
        .arg("--report")
        .arg(&report)
        .output()
        .expect("harness run-matrix should execute");
    assert!(output.status.success(), "run-matrix failed: {}", stderr(&output));
    assert_eq!(read_json(&dir.join("env.json"))["capacity"], 4);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn zero_capacity_exits_non_zero() {
    let output = harness()
        .args(["run-matrix", "--capacity", "0"])
        .output()
        .expect("harness run-matrix should execute");
    assert!(!output.status.success(), "zero capacity should be rejected");
    assert!(stderr(&output).contains("InvalidCapacity"), "{}", stderr(&output));
}

#[test]
fn unallocatable_capacity_exits_non_zero() {
    let dir = unique_tmp_dir("boundcopy-cli-huge");
    let log = dir.join("huge.log.jsonl");

    let output = harness()
        .args(["run-matrix", "--capacity", &usize::MAX.to_string()])
        .arg("--log")
        .arg(&log)
        .output()
        .expect("harness run-matrix should execute");
    assert!(!output.status.success(), "huge capacity should fail cleanly");
    assert!(stderr(&output).contains("AllocationFailed"), "{}", stderr(&output));

    let content = std::fs::read_to_string(&log).expect("log written");
    let last = content.lines().last().expect("log is not empty");
    assert_eq!(validate_log_line(last, 1).unwrap().event, "matrix_abort");

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn verify_exits_non_zero_on_wrong_expectation() {
    let dir = unique_tmp_dir("boundcopy-cli-verify");
    let fixture = serde_json::json!({
        "version": "v1",
        "family": "boundary",
        "capacity": 4,
        "cases": [
            {
                "name": "one_over_claimed_complete",
                "input": { "len": 5 },
                "expected": { "copy": { "outcome": "Complete" }, "length": 5 }
            }
        ]
    });
    std::fs::write(dir.join("wrong.v1.json"), fixture.to_string()).expect("write fixture");
    let report = dir.join("verify.md");

    let output = harness()
        .arg("verify")
        .arg("--fixture")
        .arg(&dir)
        .arg("--report")
        .arg(&report)
        .args(["--timestamp", "2026-10-17T00:00:00Z"])
        .output()
        .expect("harness verify should execute");
    assert!(!output.status.success(), "wrong expectation should fail");
    assert!(stderr(&output).contains("FAIL one_over_claimed_complete"));

    let json = read_json(&dir.join("verify.json"));
    assert_eq!(json["timestamp"], "2026-10-17T00:00:00Z");
    assert_eq!(json["summary"]["failed"], 1);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn validate_log_rejects_malformed_lines() {
    let dir = unique_tmp_dir("boundcopy-cli-badlog");
    let log = dir.join("bad.log.jsonl");
    std::fs::write(
        &log,
        "{\"timestamp\":\"t\",\"trace_id\":\"a::b::001\",\"level\":\"info\",\"event\":\"case\",\"capacity\":4,\"length\":5}\n",
    )
    .expect("write log");

    let output = harness()
        .arg("validate-log")
        .arg("--log")
        .arg(&log)
        .output()
        .expect("harness validate-log should execute");
    assert!(!output.status.success(), "invalid log should fail validation");
    assert!(stderr(&output).contains("1 error(s)"));

    let _ = std::fs::remove_dir_all(dir);
}
