//! Integration tests for the parse, normalize, check and init-config flows.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn schedule_parse_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_schedule-parse"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("parser")
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(schedule_parse_bin())
        .args(args)
        .output()
        .expect("failed to run schedule-parse")
}

fn schedule_path() -> String {
    fixture("test_schedule.inc").to_string_lossy().into_owned()
}

// ---- parse ----

#[test]
fn test_parse_csv_to_stdout() {
    let input = schedule_path();
    let output = run(&["parse", "--input", &input]);

    assert!(
        output.status.success(),
        "parse failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 15);
    assert!(lines[0].starts_with("Date,Well name,Local grid name,I,J,"));
    assert!(lines[11].starts_with("01 SEP 2018,W3,LGR1,"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Parsed 14 row(s)"), "summary missing: {stderr}");
}

#[test]
fn test_parse_writes_output_file_with_options() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("schedule.csv");
    let input = schedule_path();

    let output = run(&[
        "parse",
        "--input",
        &input,
        "--output",
        out.to_str().unwrap(),
        "--delimiter",
        ";",
        "--write-index",
        "--chunk-size",
        "10",
    ]);
    assert!(
        output.status.success(),
        "parse failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output.stdout.is_empty());

    let csv = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 15);
    assert!(lines[0].starts_with(";Date;Well name;"));
    assert!(lines[1].starts_with("0;;W1;;10.0;10.0;"));
    assert!(lines[14].starts_with("13;01 DEC 2018;"));
}

#[test]
fn test_parse_json_without_empty_dates() {
    let input = schedule_path();
    let output = run(&["parse", "--input", &input, "--format", "json", "--no-empty-dates"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let rows: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("Invalid JSON output: {e}\n{stdout}"));
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|row| !row["Well name"].is_null()));
}

#[test]
fn test_parse_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("from_config.csv");
    let config = dir.path().join("run.yml");
    fs::write(
        &config,
        format!(
            "input: {}\noutput: {}\nparser:\n  chunk_size: 7\nexport:\n  write_header: false\n",
            schedule_path(),
            out.display()
        ),
    )
    .unwrap();

    let output = run(&["parse", "--config", config.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "parse failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let csv = fs::read_to_string(&out).unwrap();
    assert_eq!(csv.lines().count(), 14);
    assert!(csv.starts_with(",W1,,10.0"));
}

#[test]
fn test_parse_abort_on_malformed_record() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.inc");
    fs::write(
        &input,
        "DATES\n01 JUN 2018 /\n/\nCOMPDAT\n'W1' 10 10 1 3 OPEN /\n/\nEND\n",
    )
    .unwrap();

    let output = run(&[
        "parse",
        "--input",
        input.to_str().unwrap(),
        "--on-malformed",
        "abort",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed COMPDAT record"), "{stderr}");

    let output = run(&["parse", "--input", input.to_str().unwrap()]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1 skipped"), "{stderr}");
}

#[test]
fn test_parse_require_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("open_ended.inc");
    fs::write(&input, "DATES\n01 JUN 2018 /\n/\n").unwrap();

    let output = run(&["parse", "--input", input.to_str().unwrap(), "--require-end"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no END marker"), "{stderr}");
}

// ---- input contract ----

#[test]
fn test_empty_file_is_rejected() {
    let input = fixture("empty_file.inc");
    let output = run(&["parse", "--input", input.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: "), "{stderr}");
    assert!(stderr.contains("is empty"), "{stderr}");
}

#[test]
fn test_wrong_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("schedule.txt");
    fs::write(&input, "END\n").unwrap();

    let output = run(&["check", "--input", input.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("expected .inc"));
}

#[test]
fn test_missing_input_is_reported() {
    let output = run(&["parse"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No input file given"));
}

// ---- normalize / check / init-config ----

#[test]
fn test_normalize_prints_lines() {
    let input = schedule_path();
    let output = run(&["normalize", "--input", &input]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 30);
    assert_eq!(lines[0], "COMPDAT");
    assert_eq!(lines[29], "END");
}

#[test]
fn test_check_reports_json() {
    let input = schedule_path();
    let output = run(&["check", "--input", &input, "--json"]);
    assert!(
        output.status.success(),
        "check failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["diagnostics"]["records"], 10);
    assert_eq!(report["diagnostics"]["date_only_records"], 4);
    assert_eq!(report["diagnostics"]["terminated"], true);
    assert!(report["issues"].as_array().unwrap().is_empty());
}

#[test]
fn test_check_flags_out_of_order_dates() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("backwards.inc");
    fs::write(
        &input,
        "DATES\n01 JUL 2018 /\n/\nDATES\n01 JUN 2018 /\n/\nEND\n",
    )
    .unwrap();

    let output = run(&["check", "--input", input.to_str().unwrap()]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Issue:"), "{stdout}");
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 validation issue(s)"));
}

#[test]
fn test_init_config_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.yml");

    let output = run(&["init-config", "--output", path.to_str().unwrap()]);
    assert!(output.status.success());
    let yaml = fs::read_to_string(&path).unwrap();
    assert!(yaml.contains("on_malformed: skip"));
    assert!(yaml.contains("write_index: false"));

    let output = run(&["init-config", "--output", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--force"));
}
