//! CLI smoke tests for the non-interactive path.

use pretty_assertions::assert_eq as pretty_assert_eq;

use crate::run_rulegen;

#[test]
fn test_help_exits_zero() {
    let (exit_code, stdout, _stderr) = run_rulegen(&["--help"]);

    pretty_assert_eq!(exit_code, 0, "--help should exit 0");
    assert!(
        stdout.contains("--type") && stdout.contains("--rules"),
        "help should list the generation flags, got: {stdout}"
    );
}

#[test]
fn test_unknown_rule_warns_and_writes_found_rule() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().to_str().unwrap();

    let (exit_code, stdout, _stderr) = run_rulegen(&[
        "--type",
        "cursor",
        "--interactive",
        "false",
        "--rules",
        "Jest Setup,Nonexistent Rule",
        "--project",
        project,
    ]);

    pretty_assert_eq!(exit_code, 0, "unknown names are skipped, not fatal");
    assert!(
        stdout.contains("skipping unknown rule: Nonexistent Rule"),
        "expected a warning naming the unknown rule, got: {stdout}"
    );
    assert!(
        dir.path().join(".cursor/rules/jest-setup.mdc").exists(),
        "the found rule should still be written"
    );
    assert!(
        !dir.path().join(".windsurfrules").exists(),
        "--type cursor must not write windsurf output"
    );
}

#[test]
fn test_unknown_trailing_arguments_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().to_str().unwrap();

    let (exit_code, _stdout, stderr) = run_rulegen(&[
        "--type",
        "cursor",
        "--interactive",
        "false",
        "--rules",
        "Jest Setup",
        "--project",
        project,
        "extra-arg",
        "--unknown-flag",
    ]);

    pretty_assert_eq!(exit_code, 0, "extra arguments should be ignored, got: {stderr}");
    assert!(dir.path().join(".cursor/rules/jest-setup.mdc").exists());
}
