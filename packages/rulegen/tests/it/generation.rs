//! End-to-end generation into temporary project directories.

use indoc::indoc;
use pretty_assertions::assert_eq as pretty_assert_eq;

use rulegen::catalog::Rule;
use rulegen::generate::{BatchOptions, run_batch};
use rulegen::persist::{Outcome, Resolution, WarnAndOverwrite};
use rulegen::render::TargetSystem;
use rulegen::resolve::Resolver;

use crate::{Always, fixture_catalog};

fn rules(category: &str) -> Vec<Rule> {
    fixture_catalog().get(category).unwrap().rules.clone()
}

#[test]
fn test_windsurf_generation_buckets_rule_lines() {
    let dir = tempfile::tempdir().unwrap();
    let jest = vec![rules("Testing")[0].clone()];
    let options = BatchOptions {
        project_root: dir.path(),
        force: false,
        conflicts: &WarnAndOverwrite,
    };

    let mut resolver = Resolver::new();
    let results = run_batch(
        &mut resolver,
        "Testing",
        &jest,
        &[TargetSystem::Windsurf],
        &options,
    )
    .unwrap();

    pretty_assert_eq!(results.len(), 1);
    pretty_assert_eq!(results[0].outcome, Outcome::Written);

    let written = std::fs::read_to_string(dir.path().join(".windsurfrules")).unwrap();
    pretty_assert_eq!(
        written,
        indoc! {"
            # Jest Setup

            <project_setup>
            - Setup coverage
            </project_setup>

            <uncategorized>
            - Write unit tests
            </uncategorized>

        "}
    );
}

#[test]
fn test_cursor_generation_writes_slugged_files() {
    let dir = tempfile::tempdir().unwrap();
    // Referenced by the content only when it exists in the project.
    std::fs::write(dir.path().join("package.json"), "{}").unwrap();

    let options = BatchOptions {
        project_root: dir.path(),
        force: false,
        conflicts: &WarnAndOverwrite,
    };

    let mut resolver = Resolver::new();
    let results = run_batch(
        &mut resolver,
        "Testing",
        &rules("Testing"),
        &[TargetSystem::Cursor],
        &options,
    )
    .unwrap();

    pretty_assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.outcome == Outcome::Written));

    let jest = std::fs::read_to_string(dir.path().join(".cursor/rules/jest-setup.mdc")).unwrap();
    assert!(jest.starts_with("# Jest Setup\n"));
    assert!(jest.contains("description: \"Use Jest\""));
    assert!(jest.contains("## Rules\n- Write unit tests\n- Setup coverage\n"));

    assert!(
        dir.path()
            .join(".cursor/rules/testing-library.mdc")
            .exists()
    );
}

#[test]
fn test_default_description_when_content_has_none() {
    let dir = tempfile::tempdir().unwrap();
    let library = vec![rules("Testing")[1].clone()];
    let options = BatchOptions {
        project_root: dir.path(),
        force: false,
        conflicts: &WarnAndOverwrite,
    };

    let mut resolver = Resolver::new();
    run_batch(
        &mut resolver,
        "Testing",
        &library,
        &[TargetSystem::Cursor],
        &options,
    )
    .unwrap();

    let written =
        std::fs::read_to_string(dir.path().join(".cursor/rules/testing-library.mdc")).unwrap();
    assert!(written.contains("description: \"Generated Cursor rule\""));
}

#[test]
fn test_cancel_skips_and_preserves_existing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".windsurfrules");
    std::fs::write(&path, "# Existing\n\n- keep me\n").unwrap();

    let jest = vec![rules("Testing")[0].clone()];
    let options = BatchOptions {
        project_root: dir.path(),
        force: false,
        conflicts: &Always(Resolution::Cancel),
    };

    let mut resolver = Resolver::new();
    let results = run_batch(
        &mut resolver,
        "Testing",
        &jest,
        &[TargetSystem::Windsurf],
        &options,
    )
    .unwrap();

    pretty_assert_eq!(results[0].outcome, Outcome::Skipped);
    assert!(results[0].success());
    pretty_assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "# Existing\n\n- keep me\n"
    );
}

#[test]
fn test_force_overwrites_without_consulting_resolver() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".windsurfrules");
    std::fs::write(&path, "stale").unwrap();

    let jest = vec![rules("Testing")[0].clone()];
    let options = BatchOptions {
        project_root: dir.path(),
        force: true,
        // Would skip the write if it were consulted.
        conflicts: &Always(Resolution::Cancel),
    };

    let mut resolver = Resolver::new();
    let results = run_batch(
        &mut resolver,
        "Testing",
        &jest,
        &[TargetSystem::Windsurf],
        &options,
    )
    .unwrap();

    pretty_assert_eq!(results[0].outcome, Outcome::Written);
    assert!(
        std::fs::read_to_string(&path)
            .unwrap()
            .starts_with("# Jest Setup")
    );
}

#[test]
fn test_fetch_failure_aborts_batch_before_later_rules() {
    let dir = tempfile::tempdir().unwrap();
    let sourceless = Rule {
        name: "Broken Rule".to_string(),
        description: String::new(),
        content: None,
        raw_url: None,
    };
    let batch = vec![rules("Testing")[0].clone(), sourceless, rules("Testing")[1].clone()];
    let options = BatchOptions {
        project_root: dir.path(),
        force: false,
        conflicts: &WarnAndOverwrite,
    };

    let mut resolver = Resolver::new();
    let err = run_batch(
        &mut resolver,
        "Testing",
        &batch,
        &[TargetSystem::Cursor],
        &options,
    )
    .unwrap_err();

    assert!(err.to_string().contains("Broken Rule"));
    // The rule before the failure was written; the one after was not reached.
    assert!(dir.path().join(".cursor/rules/jest-setup.mdc").exists());
    assert!(!dir.path().join(".cursor/rules/testing-library.mdc").exists());
}
