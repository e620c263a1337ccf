#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn st() -> Command {
    let mut cmd = cargo_bin_cmd!("stutra");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_stutra.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn init_db(db_path: &str) {
    st().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Bob (#1, section A) and Alice (#2, sections A and B).
/// Alice is marked present then washroom on 2024-01-19; Bob has no entries.
pub fn init_db_with_roster(db_path: &str) {
    init_db(db_path);

    st().args([
        "--db", db_path, "student", "add", "--name", "Bob", "--admission", "1002", "--section",
        "A",
    ])
    .assert()
    .success();

    st().args([
        "--db",
        db_path,
        "student",
        "add",
        "--name",
        "Alice",
        "--admission",
        "1001",
        "--section",
        "A",
        "--section",
        "B",
    ])
    .assert()
    .success();

    st().args([
        "--db",
        db_path,
        "mark",
        "2",
        "present",
        "--date",
        "2024-01-19",
        "--at",
        "100",
    ])
    .assert()
    .success();

    st().args([
        "--db",
        db_path,
        "mark",
        "2",
        "washroom",
        "--date",
        "2024-01-19",
        "--at",
        "200",
    ])
    .assert()
    .success();
}
