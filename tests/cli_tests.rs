//! Runs the `tyinfer` binary against scenario files on disk.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

const COLLECTIONS: &str = include_str!("../scenarios/collections.json");

fn run_tyinfer(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tyinfer"))
        .args(args)
        .env_remove("TYINFER_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tyinfer")
}

fn write_scenario(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("create scenario");
    file.write_all(contents.as_bytes()).expect("write scenario");
    path.to_string_lossy().to_string()
}

#[test]
fn text_report_lists_every_call() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_scenario(dir.path(), "collections.json", COLLECTIONS);

    let output = run_tyinfer(&["--pretty", "false", &path]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8");

    assert!(stdout.contains("call asList: 1 candidate"));
    assert!(stdout.contains("call print: 3 candidates"));
    assert!(stdout.contains("<T> List<T> Arrays.asList(T...)  {T -> Number}"));
    assert!(stdout.contains("result: Map<String, Integer>"));
    assert!(!stdout.contains('\u{1b}'));
}

#[test]
fn json_report_with_call_filter() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_scenario(dir.path(), "collections.json", COLLECTIONS);

    let output = run_tyinfer(&["--format", "json", "--call", "max", "--call", "print", &path]);
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");

    let calls = report.as_array().expect("array of calls");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0]["id"], "max");
    assert_eq!(calls[0]["result"], "Integer");
    assert_eq!(calls[0]["candidates"][0]["substitution"]["T"], "Integer");
    assert_eq!(calls[1]["id"], "print");
    assert_eq!(calls[1]["ambiguous"], false);
    assert_eq!(calls[1]["candidates"][0]["applicability"], "exact");
    assert_eq!(calls[1]["candidates"][0]["signature"], "void Printer.print(Object)");
}

#[test]
fn best_effort_flag_overrides_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_scenario(dir.path(), "collections.json", COLLECTIONS);

    let output = run_tyinfer(&["--format", "json", "--bestEffort", "--call", "bareEmpty", &path]);
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report[0]["candidates"][0]["substitution"]["T"], "? extends Object");
}

#[test]
fn missing_file_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("missing.json");

    let output = run_tyinfer(&[missing.to_str().expect("utf-8 path")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf-8");
    assert!(stderr.contains("failed to read scenario"));
}

#[test]
fn invalid_scenario_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_scenario(
        dir.path(),
        "broken.json",
        r#"{ "methods": [{ "name": "m", "params": ["Map<String"] }] }"#,
    );

    let output = run_tyinfer(&[&path]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf-8");
    assert!(stderr.contains("failed to load scenario"));
}

#[test]
fn unknown_call_filter_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_scenario(dir.path(), "collections.json", COLLECTIONS);

    let output = run_tyinfer(&["--call", "nope", &path]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf-8");
    assert!(stderr.contains("unknown call `nope`"));
}
