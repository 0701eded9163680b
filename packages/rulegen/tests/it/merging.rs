//! Append-merge behavior through the full write path.

use pretty_assertions::assert_eq as pretty_assert_eq;

use rulegen::persist::{
    MERGE_SEPARATOR, Outcome, Resolution, write_rule_file,
};
use rulegen::render::{MAX_OUTPUT_SIZE, TRUNCATION_NOTICE, TargetSystem};

use crate::Always;

#[test]
fn test_append_merges_with_separator() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".windsurfrules");
    std::fs::write(&path, "# Old\n\n- existing rule\n").unwrap();

    let result = write_rule_file(
        &path,
        "# New\n\n- fresh rule\n",
        TargetSystem::Windsurf,
        false,
        &Always(Resolution::Append),
    );

    pretty_assert_eq!(result.outcome, Outcome::Merged);
    let written = std::fs::read_to_string(&path).unwrap();
    pretty_assert_eq!(
        written,
        format!("# Old\n\n- existing rule\n{MERGE_SEPARATOR}# New\n\n- fresh rule\n")
    );
}

#[test]
fn test_append_respects_size_cap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".windsurfrules");
    // 80KB existing, well under the 90% short-circuit.
    std::fs::write(&path, "x".repeat(80 * 1024)).unwrap();

    let new = format!("{}\n", "y".repeat(99)).repeat(400); // 40KB of lines
    let result = write_rule_file(
        &path,
        &new,
        TargetSystem::Windsurf,
        false,
        &Always(Resolution::Append),
    );

    pretty_assert_eq!(result.outcome, Outcome::Merged);
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.len() <= MAX_OUTPUT_SIZE + TRUNCATION_NOTICE.len());
    assert!(written.contains(TRUNCATION_NOTICE));
    // Some of the new content made it in before the cut.
    assert!(written.contains(&"y".repeat(99)));
}

#[test]
fn test_append_to_nearly_full_file_adds_notice_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".windsurfrules");
    let existing = "x".repeat(99 * 1024);
    std::fs::write(&path, &existing).unwrap();

    let result = write_rule_file(
        &path,
        "new content that will not fit",
        TargetSystem::Windsurf,
        false,
        &Always(Resolution::Append),
    );

    pretty_assert_eq!(result.outcome, Outcome::Merged);
    let written = std::fs::read_to_string(&path).unwrap();
    pretty_assert_eq!(written, format!("{existing}{TRUNCATION_NOTICE}"));
}

#[test]
fn test_overwrite_replaces_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".windsurfrules");
    std::fs::write(&path, "old body").unwrap();

    let result = write_rule_file(
        &path,
        "new body",
        TargetSystem::Windsurf,
        false,
        &Always(Resolution::Overwrite),
    );

    pretty_assert_eq!(result.outcome, Outcome::Written);
    pretty_assert_eq!(std::fs::read_to_string(&path).unwrap(), "new body");
}
