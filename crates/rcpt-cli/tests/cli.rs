//! End-to-end CLI tests over recognized-text fixtures.

use assert_cmd::Command;
use predicates::prelude::*;

const WALMART: &str = "WALMART SUPERCENTER\nDate: 12/15/2023\nMilk 4.99\nBread 2.99\nSubtotal 7.98\nTax 0.64\nTotal 8.62\n";

fn rcpt() -> Command {
    Command::cargo_bin("rcpt").unwrap()
}

#[test]
fn process_outputs_json_with_extracted_fields() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("walmart.txt");
    std::fs::write(&input, WALMART).unwrap();

    rcpt()
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("WALMART SUPERCENTER"))
        .stdout(predicate::str::contains("8.62"))
        .stdout(predicate::str::contains("Groceries"));
}

#[test]
fn process_text_format_renders_summary() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("walmart.txt");
    std::fs::write(&input, WALMART).unwrap();

    rcpt()
        .arg("process")
        .arg(&input)
        .args(["--format", "text", "--no-classify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merchant: WALMART SUPERCENTER"))
        .stdout(predicate::str::contains("Total:"));
}

#[test]
fn process_missing_input_fails() {
    rcpt()
        .arg("process")
        .arg("does-not-exist.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn batch_writes_summary_csv() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), WALMART).unwrap();
    std::fs::write(dir.path().join("b.txt"), "").unwrap();
    let out = dir.path().join("out");

    rcpt()
        .arg("batch")
        .arg(format!("{}/*.txt", dir.path().display()))
        .args(["--summary", "--no-classify"])
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success();

    let summary = std::fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.contains("WALMART SUPERCENTER"));
    assert!(summary.lines().count() >= 3);
}

#[test]
fn config_show_prints_defaults() {
    rcpt()
        .arg("config")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("remote_timeout_ms"));
}
