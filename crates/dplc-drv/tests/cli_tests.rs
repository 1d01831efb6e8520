//! End-to-end tests for the `dplc` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn dplc() -> Command {
    Command::cargo_bin("dplc").expect("binary builds")
}

#[test]
fn test_compiles_to_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("demo.dpl");
    std::fs::write(
        &input,
        "pack \"demo\" namespace demo { func Load() { Say(\"Hi\") } }",
    )
    .unwrap();
    let out = dir.path().join("dist");

    dplc()
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("wrote"));

    let load = std::fs::read_to_string(out.join("data/demo/function/load.mcfunction")).unwrap();
    assert_eq!(load, "say \"Hi\"\n");
    assert!(out.join("pack.mcmeta").exists());
    assert!(out.join("data/minecraft/tags/function/load.json").exists());
}

#[test]
fn test_errors_fail_with_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.dpl");
    std::fs::write(&input, "pack \"p\" namespace n { global int x = \"nope\" }").unwrap();

    dplc()
        .arg(&input)
        .arg("--output")
        .arg(dir.path().join("dist"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("compilation failed"));
}

#[test]
fn test_missing_input_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();

    dplc()
        .arg(dir.path().join("nope.dpl"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn test_emit_symbols_prints_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("demo.dpl");
    std::fs::write(
        &input,
        "pack \"demo\" namespace demo { global int score = 0 func Load() { } }",
    )
    .unwrap();

    let assert = dplc().arg(&input).arg("--emit-symbols").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["demo"]["title"], "demo");
    assert_eq!(value["demo"]["variables"], serde_json::json!(["score"]));
    assert_eq!(value["demo"]["functions"], serde_json::json!(["load"]));
}

#[test]
fn test_quiet_suppresses_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("warn.dpl");
    // unknown item property warns but compiles
    std::fs::write(
        &input,
        "pack \"p\" namespace n { Item x { base_id = \"m:a\"; odd = 1; } }",
    )
    .unwrap();

    dplc()
        .arg(&input)
        .arg("--output")
        .arg(dir.path().join("dist"))
        .arg("--quiet")
        .assert()
        .success()
        .stderr(predicate::str::contains("warning").not());
}
