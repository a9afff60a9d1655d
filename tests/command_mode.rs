//! Integration tests for command mode (-c/--command flag)

use std::path::PathBuf;
use std::process::Command;

fn run_command(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_gridsheet"))
        .env_remove("GRIDSHEET_LOG")
        .args(args)
        .output()
        .expect("Failed to execute gridsheet");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("gridsheet_{}_{}.json", name, std::process::id()))
}

#[test]
fn test_aggregates_over_populated_cells() {
    let (stdout, _, code) = run_command(&[
        "-c", "set 10", "-c", "goto A2", "-c", "set 20", "-c", "goto A3", "-c", "set abc",
        "-c", "fn SUM", "-c", "fn COUNT", "-c", "fn MAX", "-c", "fn MIN", "-c", "fn AVERAGE",
    ]);
    assert_eq!(code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines.contains(&"SUM = 30"), "stdout: {}", stdout);
    assert!(lines.contains(&"COUNT = 2"));
    assert!(lines.contains(&"MAX = 20"));
    assert!(lines.contains(&"MIN = 10"));
    assert!(lines.contains(&"AVERAGE = 10"));
}

#[test]
fn test_set_reports_address() {
    let (stdout, _, code) = run_command(&["-c", "goto C20", "-c", "set hello"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "Jumped to C20\nC20 = hello");
}

#[test]
fn test_invalid_input_fails() {
    let (_, stderr, code) = run_command(&["-c", "set hello world"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Error:"), "stderr: {}", stderr);
}

#[test]
fn test_unknown_command_fails() {
    let (_, stderr, code) = run_command(&["-c", "frobnicate"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("frobnicate"), "stderr: {}", stderr);
}

#[test]
fn test_stops_at_first_error() {
    let (stdout, _, code) = run_command(&["-c", "set 1", "-c", "goto ZZ1", "-c", "set 2"]);
    assert_eq!(code, 1);
    assert_eq!(stdout.trim(), "A1 = 1");
}

#[test]
fn test_text_functions() {
    let (stdout, _, code) = run_command(&["-c", "set Hello", "-c", "fn UPPER", "-c", "copy"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("UPPER: 1 cell changed"), "stdout: {}", stdout);
    assert!(stdout.contains("Copied 'HELLO'"));
}

#[test]
fn test_find_and_replace() {
    let (stdout, _, code) = run_command(&[
        "-c", "set concatenate", "-c", "replace cat dog", "-c", "copy",
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Replaced 'cat' in 1 cells"));
    assert!(stdout.contains("Copied 'condogenate'"));
}

#[test]
fn test_sheets_listing() {
    let (stdout, _, code) = run_command(&["-c", "new", "-c", "sheets"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "Created Sheet 2\n1:Sheet 1  2:Sheet 2*");
}

#[test]
fn test_export_then_reopen() {
    let path = temp_path("roundtrip");
    let path_str = path.to_string_lossy().to_string();

    let (stdout, _, code) = run_command(&[
        "-c", "set 42", "-c", "bold", "-c", "bg #abcdef", "-o", &path_str,
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("A1: bold on"));
    assert!(stdout.contains("A1: background #abcdef"));
    assert!(stdout.contains(&format!("Exported to {}", path_str)));

    let written = std::fs::read_to_string(&path).expect("export file");
    assert!(written.contains("\"A1\""));
    assert!(written.contains("#abcdef"));

    let (stdout, _, code) = run_command(&[&path_str, "-c", "copy", "-c", "fn SUM"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Copied '42'"), "stdout: {}", stdout);
    assert!(stdout.contains("SUM = 42"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_import_malformed_file_fails() {
    let path = temp_path("malformed");
    std::fs::write(&path, "{ not json").expect("write temp file");
    let (_, stderr, code) = run_command(&["-c", &format!("import {}", path.display())]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Error:"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_help_lists_commands() {
    let (stdout, _, code) = run_command(&["-c", "help"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Commands"));
    assert!(stdout.contains("replace"));
}
