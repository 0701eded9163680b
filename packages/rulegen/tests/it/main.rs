//! Integration tests for the rule generation pipeline.
//!
//! These tests drive the library end to end without a terminal:
//! - navigation traces through the state machine
//! - batch generation into temporary project directories
//! - conflict handling and the size-bounded merge

mod cli;
mod generation;
mod merging;
mod navigation;

use std::path::Path;
use std::process::{Command, Stdio};

use rulegen::catalog::{Catalog, Category, Rule, RuleContent, StructuredContent};
use rulegen::persist::{ConflictResolver, ExistingFile, Resolution};

/// Run the rulegen binary and return (exit_code, stdout, stderr).
pub fn run_rulegen(args: &[&str]) -> (i32, String, String) {
    let status = Command::new("cargo")
        .args(["build", "--quiet", "-p", "rulegen"])
        .status()
        .expect("failed to build rulegen");
    assert!(status.success(), "cargo build failed");

    let mut cmd_args = vec!["run", "--quiet", "-p", "rulegen", "--"];
    cmd_args.extend(args);

    let output = Command::new("cargo")
        .args(&cmd_args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to run rulegen");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

/// Scripted conflict resolver that always answers the same way.
pub struct Always(pub Resolution);

impl ConflictResolver for Always {
    fn resolve(&self, _path: &Path, _existing: &ExistingFile) -> Resolution {
        self.0
    }
}

/// A small catalog with inline content only, so no test touches the network.
pub fn fixture_catalog() -> Catalog {
    let mut catalog = Catalog::default();
    catalog.insert(
        "Testing",
        Category {
            description: "Test tooling".to_string(),
            rules: vec![
                structured_rule(
                    "Jest Setup",
                    "Unit testing with Jest",
                    Some("Use Jest"),
                    &["Write unit tests", "Setup coverage"],
                ),
                structured_rule(
                    "Testing Library",
                    "User-centric component tests",
                    None,
                    &["Query by role", "Avoid implementation details"],
                ),
            ],
        },
    );
    catalog.insert(
        "React",
        Category {
            description: "React patterns".to_string(),
            rules: vec![structured_rule(
                "React Hooks",
                "Custom hook conventions",
                None,
                &["Prefix hooks with use", "Keep hooks at the top level"],
            )],
        },
    );
    catalog
}

pub fn structured_rule(
    name: &str,
    description: &str,
    content_description: Option<&str>,
    lines: &[&str],
) -> Rule {
    Rule {
        name: name.to_string(),
        description: description.to_string(),
        content: Some(RuleContent::Structured(StructuredContent {
            description: content_description.map(str::to_string),
            rules: lines.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })),
        raw_url: None,
    }
}
