/// Command-line tests for pep-audit
///
/// These run the built binary and only cover paths that finish before any
/// request is made, so no network access is needed.
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pep-audit"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run pep-audit {}: {}", args.join(" "), e))
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_help_lists_modes() {
    let output = run(&["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    for mode in ["whats-new", "latest-versions", "download", "pep"] {
        assert!(text.contains(mode), "help should mention {}:\n{}", mode, text);
    }
    assert!(text.contains("--clear-cache"));
    assert!(text.contains("--output"));
}

#[test]
fn test_unknown_mode_is_rejected() {
    let output = run(&["peps"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("peps"));
}

#[test]
fn test_missing_mode_is_rejected() {
    let output = run(&[]);
    assert!(!output.status.success());
}

#[test]
fn test_unknown_output_format_is_rejected() {
    let output = run(&["pep", "--output", "xml"]);
    assert!(!output.status.success());
}

#[test]
fn test_conflicting_cache_flags_exit_with_one() {
    let output = run(&["pep", "--clear-cache", "--no-cache"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("--clear-cache"));
}

#[test]
fn test_zero_limit_exits_with_one() {
    let output = run(&["pep", "--limit", "0"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_missing_status_table_exits_with_one() {
    let output = run(&["pep", "--status-table", "/nonexistent/pep-audit/status.toml"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("does not exist"));
}

#[test]
fn test_invalid_status_table_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("status.toml");
    std::fs::write(&table, "expected = \"not a table\"\n").unwrap();

    let output = run(&["pep", "--status-table", table.to_str().unwrap(), "--cache-dir", dir.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Configuration error"));
}

#[test]
#[ignore] // Requires network access
fn test_clear_cache_keeps_stdout_to_result_rows() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&["latest-versions", "-c", "--cache-dir", dir.path().to_str().unwrap()]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(!text.contains("Cleared page cache"), "cache notice on stdout:\n{}", text);
    assert_eq!(text.lines().next(), Some("Documentation link Version Status"));
}
