//! CLI end-to-end tests
//!
//! These tests run the termpack binary against temporary files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TERMS: &str = "\
cons(pair(a,1),cons(pair(b,2),nil))
cons(pair(a,1),nil)

[pair(a,1), pair(b,2)]
\"quoted name\"(x)
";

const CANONICAL: &str = "\
cons(pair(a,1),cons(pair(b,2),nil))
cons(pair(a,1),nil)
[pair(a,1),pair(b,2)]
\"quoted name\"(x)
";

/// Get the path to the termpack binary
fn termpack_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_termpack"))
}

fn termpack(dir: &Path) -> Command {
    let mut cmd = Command::new(termpack_bin());
    cmd.current_dir(dir)
        .env_remove("TERMPACK_CONFIG")
        .env_remove("TERMPACK_VERBOSE")
        .env_remove("RUST_LOG");
    cmd
}

fn write_terms(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("terms.txt");
    std::fs::write(&path, TERMS).unwrap();
    path
}

fn pack(dir: &TempDir, extra: &[&str]) -> PathBuf {
    let input = write_terms(dir);
    let output = dir.path().join("terms.stp");
    termpack(dir.path())
        .arg("pack")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(extra)
        .assert()
        .success()
        .stdout(predicate::str::contains("Packed 4 terms"));
    output
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    termpack(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage").and(predicate::str::contains("pack")));
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    termpack(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("termpack"));
}

#[test]
fn test_pack_then_unpack() {
    let dir = TempDir::new().unwrap();
    let packed = pack(&dir, &[]);

    termpack(dir.path())
        .arg("unpack")
        .arg(&packed)
        .assert()
        .success()
        .stdout(CANONICAL);
}

#[test]
fn test_unpack_to_file() {
    let dir = TempDir::new().unwrap();
    let packed = pack(&dir, &["--window", "64"]);
    let output = dir.path().join("out.txt");

    termpack(dir.path())
        .arg("unpack")
        .arg(&packed)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(output).unwrap(), CANONICAL);
}

#[test]
fn test_inspect_json_reports_window() {
    let dir = TempDir::new().unwrap();
    let packed = pack(&dir, &["--window", "128", "--lookahead", "16"]);

    let output = termpack(dir.path())
        .arg("inspect")
        .arg(&packed)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["window_size"], 128);
    assert_eq!(report["terms"], 4);
    assert_eq!(report["version"], "1.0");
    assert!(report["back_references"].as_u64().unwrap() > 0);
}

#[test]
fn test_inspect_text() {
    let dir = TempDir::new().unwrap();
    let packed = pack(&dir, &[]);

    termpack(dir.path())
        .arg("inspect")
        .arg(&packed)
        .assert()
        .success()
        .stdout(predicate::str::contains("window size:        1024"))
        .stdout(predicate::str::contains("terms:              4"));
}

#[test]
fn test_config_file_sets_window() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("termpack.toml"), "[lz]\nwindow_size = 32\n").unwrap();
    let packed = pack(&dir, &[]);

    termpack(dir.path())
        .arg("inspect")
        .arg(&packed)
        .assert()
        .success()
        .stdout(predicate::str::contains("window size:        32"));
}

#[test]
fn test_pack_reports_parse_error_line() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.txt");
    std::fs::write(&input, "f(a)\ng(b,\n").unwrap();

    termpack(dir.path())
        .arg("pack")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("bad.stp"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.txt:2"));
}

#[test]
fn test_pack_rejects_invalid_window() {
    let dir = TempDir::new().unwrap();
    let input = write_terms(&dir);

    termpack(dir.path())
        .arg("pack")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("terms.stp"))
        .arg("--window")
        .arg("2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("window_size"));
}

#[test]
fn test_pack_refuses_overwrite_without_force() {
    let dir = TempDir::new().unwrap();
    let packed = pack(&dir, &[]);
    let input = dir.path().join("terms.txt");

    termpack(dir.path())
        .arg("pack")
        .arg(&input)
        .arg("-o")
        .arg(&packed)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    termpack(dir.path())
        .arg("pack")
        .arg(&input)
        .arg("-o")
        .arg(&packed)
        .arg("--force")
        .assert()
        .success();
}

#[test]
fn test_unpack_rejects_plain_text() {
    let dir = TempDir::new().unwrap();
    let input = write_terms(&dir);

    termpack(dir.path())
        .arg("unpack")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bad magic number"));
}

#[test]
fn test_missing_input() {
    let dir = TempDir::new().unwrap();

    termpack(dir.path())
        .arg("inspect")
        .arg("nope.stp")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_unpack_fails_on_truncated_file() {
    let dir = TempDir::new().unwrap();
    let packed = pack(&dir, &[]);
    let bytes = std::fs::read(&packed).unwrap();
    std::fs::write(&packed, &bytes[..bytes.len() - 2]).unwrap();

    termpack(dir.path())
        .arg("unpack")
        .arg(&packed)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed or truncated payload"));

    termpack(dir.path())
        .arg("inspect")
        .arg(&packed)
        .assert()
        .failure();
}
