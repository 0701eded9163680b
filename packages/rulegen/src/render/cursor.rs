//! Annotated snippet format for the cursor target.

use std::fmt::Write;
use std::path::Path;

use crate::catalog::{Rule, RuleContent};

/// Fallback description when a rule's content carries none.
const DEFAULT_DESCRIPTION: &str = "Generated Cursor rule";

/// Render a rule as an annotated `.mdc` snippet.
///
/// File references are emitted only for files that actually exist under the
/// project root; dangling references are dropped silently.
pub fn render(rule: &Rule, content: &RuleContent, project_root: &Path) -> String {
    let mut out = format!("# {}\n", rule.name);
    let _ = writeln!(out, "description: \"{}\"\n", description(content));

    if let RuleContent::Structured(structured) = content {
        if !structured.patterns.is_empty() {
            out.push_str("patterns:\n");
            for pattern in &structured.patterns {
                let _ = writeln!(out, "  - \"{pattern}\"");
            }
            out.push('\n');
        }

        let files = existing_files(&structured.files, project_root);
        if !files.is_empty() {
            for file in files {
                let _ = writeln!(out, "@file {file}");
            }
            out.push('\n');
        }
    }

    out.push_str("## Rules\n");
    match content {
        RuleContent::Structured(structured) => {
            for item in &structured.rules {
                let _ = writeln!(out, "- {item}");
            }
        }
        RuleContent::Text(text) => out.push_str(text),
    }

    out
}

fn description(content: &RuleContent) -> &str {
    match content {
        RuleContent::Structured(structured) => {
            structured.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION)
        }
        RuleContent::Text(_) => DEFAULT_DESCRIPTION,
    }
}

fn existing_files<'a>(files: &'a [String], project_root: &Path) -> Vec<&'a str> {
    files
        .iter()
        .filter(|file| project_root.join(file).exists())
        .map(String::as_str)
        .collect()
}
