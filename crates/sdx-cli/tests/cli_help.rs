use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("sdx")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("repl"))
        .stdout(predicate::str::contains("symptoms"))
        .stdout(predicate::str::contains("diagnose"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("--service-url"));
}

#[test]
fn test_diagnose_help_shows_symptom_flag() {
    cargo_bin_cmd!("sdx")
        .args(["diagnose", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--symptom"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_diagnose_requires_a_symptom() {
    cargo_bin_cmd!("sdx")
        .arg("diagnose")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--symptom"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("sdx")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
