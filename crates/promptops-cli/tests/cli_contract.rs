//! Exit codes and report output of the `promptops` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const SUITE: &str = r#"version: 1
suite: offline
model: echo-model
settings:
  seed: 11
  parallel: 2
tests:
  - name: drop-expected
    prompt: alpha beta gamma
    expected_result: alpha beta gamma
    perturb_text: delta epsilon
    pass_condition: decrease
  - name: no-perturbation
    prompt: alpha beta gamma
    expected_result: alpha beta gamma
    pass_condition: decrease
"#;

fn promptops() -> Command {
    let mut cmd = Command::cargo_bin("promptops").unwrap();
    cmd.env_remove("PROMPTOPS_BASE_URL").env("RUST_LOG", "warn");
    cmd
}

#[test]
fn init_then_validate() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("suite.yaml");

    promptops()
        .args(["init", "--path"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    promptops()
        .args(["init", "--path"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    promptops()
        .args(["validate", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("2 test(s)"));
}

#[test]
fn validate_rejects_bad_version() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "version: 9\nsuite: s\ntests: []\n").unwrap();

    promptops()
        .args(["validate", "--config"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unsupported config version 9"));
}

#[test]
fn missing_api_key_is_fatal_before_running() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("suite.yaml");
    fs::write(&path, SUITE).unwrap();

    promptops()
        .env_remove("OPENAI_API_KEY")
        .args(["run", "--quiet", "--config"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn offline_run_writes_report() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("suite.yaml");
    let out = dir.path().join("out/report.json");
    let junit = dir.path().join("junit.xml");
    fs::write(&path, SUITE).unwrap();

    promptops()
        .args(["run", "--quiet", "--provider", "echo", "--embedder", "fake", "--config"])
        .arg(&path)
        .arg("--output")
        .arg(&out)
        .arg("--junit")
        .arg(&junit)
        .assert()
        .success()
        .stderr(predicate::str::contains("Results: pass=1 fail=0 skip=1 error=0"));

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(report["suite"], "offline");
    assert_eq!(report["seed"], "11");

    let first = &report["summaries"][0];
    assert_eq!(first["name"], "drop-expected");
    assert_eq!(first["model_name"], "echo-model");
    assert_eq!(first["response_original"], "alpha beta gamma");
    assert_eq!(first["response_perturb"], "delta epsilon");
    assert_eq!(first["fail"], false);
    assert!(first["score_original"].as_f64().unwrap() > first["score_perturb"].as_f64().unwrap());

    let second = &report["summaries"][1];
    assert!(second["perturb_text"].is_null());
    assert!(second["score_perturb"].is_null());
    assert_eq!(second["fail"], false);

    let xml = fs::read_to_string(&junit).unwrap();
    assert!(xml.contains(r#"tests="2" failures="0" errors="0""#));
}

const FAILING_SUITE: &str = r#"version: 1
suite: fragile
model: echo-model
tests:
  - name: drop-under-increase
    capability: typo-robustness
    prompt: alpha beta gamma
    expected_result: alpha beta gamma
    perturb_text: delta epsilon
    pass_condition: increase
"#;

#[test]
fn failing_case_exits_one() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("suite.yaml");
    fs::write(&path, FAILING_SUITE).unwrap();

    promptops()
        .args(["run", "--quiet", "--provider", "echo", "--embedder", "fake", "--config"])
        .arg(&path)
        .arg("--output")
        .arg(dir.path().join("report.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("FAIL  drop-under-increase"))
        .stderr(predicate::str::contains("typo-robustness: pass=0 fail=1 skip=0"))
        .stderr(predicate::str::contains("Results: pass=0 fail=1 skip=0 error=0"));
}

#[test]
fn errored_case_without_failures_exits_three() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("suite.yaml");
    let junit = dir.path().join("reports/ci/junit.xml");
    fs::write(&path, FAILING_SUITE).unwrap();

    // Nothing listens on the discard port, so the classifier call errors.
    promptops()
        .args(["run", "--quiet", "--embedder", "fake", "--provider", "classifier"])
        .args(["--classifier-url", "http://127.0.0.1:9/classify", "--timeout-seconds", "10"])
        .arg("--config")
        .arg(&path)
        .arg("--output")
        .arg(dir.path().join("report.json"))
        .arg("--junit")
        .arg(&junit)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("ERROR drop-under-increase"))
        .stderr(predicate::str::contains("Results: pass=0 fail=0 skip=0 error=1"));

    let xml = fs::read_to_string(&junit).unwrap();
    assert!(xml.contains(r#"tests="1" failures="0" errors="1""#));
}
