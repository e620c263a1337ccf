mod common;
use common::{init_db_with_roster, setup_test_db, st, temp_out};
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::Path;

#[test]
fn test_export_single_date_csv_exact() {
    let db_path = setup_test_db("export_single_date");
    init_db_with_roster(&db_path);
    let out = temp_out("export_single_date", "csv");

    st().args(["--db", &db_path, "export", "--date", "2024-01-19", "--file", &out])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).expect("read exported csv");
    assert_eq!(
        content,
        "\"Student Name\",\"Roll Number\",\"19/01/2024\"\n\
         \"Alice\",\"1\",\"P\"\n\
         \"Bob\",\"2\",\"A\"\n"
    );
}

#[test]
fn test_export_range_defaults_to_absent() {
    let db_path = setup_test_db("export_range_absent");
    init_db_with_roster(&db_path);
    let out = temp_out("export_range_absent", "csv");

    st().args([
        "--db",
        &db_path,
        "export",
        "--from",
        "2024-01-19",
        "--to",
        "2024-01-20",
        "--file",
        &out,
    ])
    .assert()
    .success();

    let content = fs::read_to_string(&out).expect("read exported csv");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "\"Student Name\",\"Roll Number\",\"19/01/2024\",\"20/01/2024\""
    );
    assert_eq!(lines[1], "\"Alice\",\"1\",\"P\",\"A\"");
    assert_eq!(lines[2], "\"Bob\",\"2\",\"A\",\"A\"");
}

#[test]
fn test_export_rejects_ranges_over_31_days() {
    let db_path = setup_test_db("export_range_too_large");
    init_db_with_roster(&db_path);
    let out = temp_out("export_range_too_large", "csv");

    st().args([
        "--db",
        &db_path,
        "export",
        "--from",
        "2024-01-01",
        "--to",
        "2024-02-05",
        "--file",
        &out,
    ])
    .assert()
    .failure()
    .stderr(contains("cannot exceed 31 days"));

    assert!(!Path::new(&out).exists());

    // a whole 31-day month is fine
    st().args([
        "--db", &db_path, "export", "--range", "2024-01", "--file", &out, "--force",
    ])
    .assert()
    .success();
    let content = fs::read_to_string(&out).expect("read exported csv");
    assert!(content.starts_with("\"Student Name\",\"Roll Number\",\"01/01/2024\""));
    assert!(content.lines().next().unwrap().ends_with("\"31/01/2024\""));
}

#[test]
fn test_export_rejects_invalid_dates() {
    let db_path = setup_test_db("export_invalid_date");
    init_db_with_roster(&db_path);
    let out = temp_out("export_invalid_date", "csv");

    st().args(["--db", &db_path, "export", "--date", "2024-02-30", "--file", &out])
        .assert()
        .failure()
        .stderr(contains("2024-02-30"));

    st().args([
        "--db",
        &db_path,
        "export",
        "--from",
        "2024-01-20",
        "--to",
        "2024-01-19",
        "--file",
        &out,
    ])
    .assert()
    .failure()
    .stderr(contains("after end date"));

    assert!(!Path::new(&out).exists());
}

#[test]
fn test_export_section_filter_renumbers() {
    let db_path = setup_test_db("export_section_filter");
    init_db_with_roster(&db_path);

    st().args([
        "--db",
        &db_path,
        "export",
        "--date",
        "2024-01-19",
        "--section",
        "B",
        "--stdout",
    ])
    .assert()
    .success()
    .stdout(contains("\"Alice\",\"1\",\"P\""))
    .stdout(contains("Bob").not());

    st().args([
        "--db",
        &db_path,
        "export",
        "--date",
        "2024-01-19",
        "--section",
        "C",
        "--stdout",
    ])
    .assert()
    .success()
    .stdout("\"Student Name\",\"Roll Number\",\"19/01/2024\"\n");
}

#[test]
fn test_export_json_format() {
    let db_path = setup_test_db("export_json");
    init_db_with_roster(&db_path);
    let out = temp_out("export_json", "json");

    st().args([
        "--db",
        &db_path,
        "export",
        "--date",
        "2024-01-19",
        "--format",
        "json",
        "--file",
        &out,
    ])
    .assert()
    .success();

    let v: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("read json")).expect("parse json");
    assert_eq!(v["dates"][0], "2024-01-19");
    assert_eq!(v["rows"][0]["name"], "Alice");
    assert_eq!(v["rows"][0]["statuses"][0], "P");
    assert_eq!(v["rows"][1]["statuses"][0], "A");
}

#[test]
fn test_export_is_repeatable() {
    let db_path = setup_test_db("export_repeatable");
    init_db_with_roster(&db_path);

    let first = st()
        .args(["--db", &db_path, "export", "--date", "2024-01-19", "--stdout"])
        .output()
        .expect("run export");
    let second = st()
        .args(["--db", &db_path, "export", "--date", "2024-01-19", "--stdout"])
        .output()
        .expect("run export");

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_latest_mark_wins() {
    let db_path = setup_test_db("export_latest_wins");
    init_db_with_roster(&db_path);

    // recorded later in time, but with an older timestamp: must not win
    st().args([
        "--db",
        &db_path,
        "mark",
        "2",
        "absent",
        "--date",
        "2024-01-19",
        "--at",
        "150",
    ])
    .assert()
    .success();

    st().args(["--db", &db_path, "export", "--date", "2024-01-19", "--stdout"])
        .assert()
        .success()
        .stdout(contains("\"Alice\",\"1\",\"P\""));

    st().args([
        "--db",
        &db_path,
        "mark",
        "2",
        "absent",
        "--date",
        "2024-01-19",
        "--at",
        "300",
    ])
    .assert()
    .success();

    st().args(["--db", &db_path, "export", "--date", "2024-01-19", "--stdout"])
        .assert()
        .success()
        .stdout(contains("\"Alice\",\"1\",\"A\""));
}
