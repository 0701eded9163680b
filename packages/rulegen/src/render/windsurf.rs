//! Sectioned markdown format for the windsurf target.

use std::fmt::Write;

use crate::catalog::{Rule, RuleContent};

use super::{MAX_OUTPUT_SIZE, TRUNCATION_NOTICE};

/// Section buckets in presentation order.
const BUCKETS: [&str; 5] = [
    "coding_guidelines",
    "project_setup",
    "best_practices",
    "conventions",
    "uncategorized",
];

/// Render a rule as sectioned markdown.
///
/// Structured rules are sorted into keyword buckets and emitted as tagged
/// sections; free text is appended line by line under the size cap.
pub fn render(rule: &Rule, content: &RuleContent) -> String {
    let mut out = format!("# {}\n\n", rule.name);

    match content {
        RuleContent::Structured(structured) => {
            for (bucket, items) in categorize(&structured.rules) {
                let _ = writeln!(out, "<{bucket}>");
                for item in items {
                    let _ = writeln!(out, "- {item}");
                }
                let _ = writeln!(out, "</{bucket}>\n");
            }
        }
        RuleContent::Text(text) => append_capped(&mut out, text),
    }

    out
}

/// Sort rule lines into the five keyword buckets; first match wins.
///
/// Returns only the non-empty buckets, in presentation order.
pub fn categorize(rules: &[String]) -> Vec<(&'static str, Vec<&str>)> {
    let mut buckets: Vec<(&'static str, Vec<&str>)> =
        BUCKETS.iter().map(|bucket| (*bucket, Vec::new())).collect();

    for rule in rules {
        buckets[bucket_index(rule)].1.push(rule.as_str());
    }

    buckets.retain(|(_, items)| !items.is_empty());
    buckets
}

fn bucket_index(rule: &str) -> usize {
    let lower = rule.to_lowercase();
    if lower.contains("code") || lower.contains("programming") {
        0
    } else if lower.contains("setup") || lower.contains("install") {
        1
    } else if lower.contains("practice") || lower.contains("pattern") {
        2
    } else if lower.contains("convention") || lower.contains("standard") {
        3
    } else {
        4
    }
}

/// Append trimmed non-empty lines while tracking cumulative size; once a
/// line would push past the cap, stop and note the truncation instead.
fn append_capped(out: &mut String, text: &str) {
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        // +1 for the newline this line will carry.
        if out.len() + line.len() + 1 > MAX_OUTPUT_SIZE {
            out.push_str(TRUNCATION_NOTICE);
            return;
        }
        out.push_str(line);
        out.push('\n');
    }
}
