//! Integration tests for the intercore binary
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

mod utils;

use predicates::prelude::*;
use serial_test::serial;
use utils::cpu_arg;

#[test]
fn test_help_mentions_gnuplot() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("intercore");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--samples"))
        .stdout(predicate::str::contains("gnuplot"));
}

#[test]
fn test_rejects_zero_samples() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("intercore");
    cmd.arg("-s").arg("0");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Sample count must be at least 1"));
}

#[test]
fn test_rejects_positional_arguments() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("intercore");
    cmd.arg("extra");

    cmd.assert().failure();
}

#[test]
fn test_rejects_malformed_cpu_list() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("intercore");
    cmd.arg("--cpus").arg("zero-one");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid CPU list"));
}

#[test]
fn test_rejects_cpu_outside_affinity_mask() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("intercore");
    cmd.arg("--cpus").arg("0,100000");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not in the allowed CPU set"));
}

#[test]
fn test_single_cpu_is_rejected() {
    let Some(cpus) = cpu_arg(1) else { return };
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("intercore");
    cmd.arg("--cpus").arg(cpus);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Need at least 2 CPUs"));
}

#[test]
#[serial]
fn test_text_matrix_for_two_cpus() {
    let Some(cpus) = cpu_arg(2) else { return };
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("intercore");
    cmd.arg("-s").arg("20").arg("--cpus").arg(&cpus);

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with(" CPU"));
    let row0: Vec<u64> = lines[1].split_whitespace().skip(1).map(|v| v.parse().unwrap()).collect();
    let row1: Vec<u64> = lines[2].split_whitespace().skip(1).map(|v| v.parse().unwrap()).collect();
    assert_eq!(row0[0], 0);
    assert_eq!(row1[1], 0);
    assert_eq!(row0[1], row1[0]);
}

#[test]
#[serial]
fn test_plot_script_write_mode() {
    let Some(cpus) = cpu_arg(2) else { return };
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("intercore");
    cmd.args(["-p", "-w", "-s", "5", "-n", "testbox", "--cpus", &cpus]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("set terminal pngcairo"))
        .stdout(predicate::str::contains(
            "testbox : Inter-core one-way write latency between CPU cores",
        ))
        .stdout(predicate::str::contains("$data << EOD"));
}

#[test]
#[serial]
fn test_json_output_to_file() {
    let Some(cpus) = cpu_arg(2) else { return };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matrix.json");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("intercore");
    cmd.args(["--format", "json", "-s", "5", "--cpus", &cpus])
        .arg("-o")
        .arg(&path);
    cmd.assert().success().stdout(predicate::str::is_empty());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["protocol"], "flag-exchange");
    assert_eq!(json["samples"], 5);
    assert_eq!(json["cpus"].as_array().unwrap().len(), 2);
    assert_eq!(json["latency_ns"][0][1], json["latency_ns"][1][0]);
}

#[test]
#[serial]
fn test_csv_output() {
    let Some(cpus) = cpu_arg(2) else { return };
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("intercore");
    cmd.args(["--format", "csv", "-s", "5", "--cpus", &cpus]);

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("cpu,"));
}

#[test]
#[serial]
fn test_debug_flag_logs_to_stderr() {
    let Some(cpus) = cpu_arg(2) else { return };
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("intercore");
    cmd.args(["--debug", "-s", "5", "--cpus", &cpus]);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("building latency matrix"));
}
