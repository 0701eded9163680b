//! Schema types for the rule catalog.

use serde::{Deserialize, Serialize};

/// A named grouping of rules, usually a technology area.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Category {
    /// Human-readable description of the category.
    #[serde(default)]
    pub description: String,

    /// The rules in this category, in catalog order.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// A named snippet of IDE assistant guidance.
///
/// Content is either inline (`content`) or lazily fetched from `rawUrl`;
/// the resolver guarantees one of the two is turned into a [`RuleContent`]
/// before anything is rendered.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Rule {
    /// Display name, unique within its category (not globally).
    pub name: String,

    /// Short description shown in selection lists.
    #[serde(default)]
    pub description: String,

    /// Inline content, if the catalog ships it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<RuleContent>,

    /// Remote source for the content, fetched on first use.
    #[serde(default, rename = "rawUrl", skip_serializing_if = "Option::is_none")]
    pub raw_url: Option<String>,
}

impl Rule {
    /// Filename-safe identifier derived from the display name.
    pub fn slug(&self) -> String {
        slug(&self.name)
    }

    /// Text the search sub-flow matches against: name, description, and a
    /// stringified form of the content.
    pub fn search_text(&self) -> String {
        let content = self
            .content
            .as_ref()
            .map(RuleContent::as_search_text)
            .unwrap_or_default();
        format!("{}\n{}\n{}", self.name, self.description, content)
    }
}

/// Rule content, either structured or free text.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RuleContent {
    Structured(StructuredContent),
    Text(String),
}

impl RuleContent {
    /// Stringified form used for searching and relevance scoring.
    pub fn as_search_text(&self) -> String {
        match self {
            RuleContent::Structured(structured) => {
                serde_json::to_string(structured).unwrap_or_default()
            }
            RuleContent::Text(text) => text.clone(),
        }
    }
}

/// The structured shape of rule content.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StructuredContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Glob patterns the rule applies to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,

    /// Project files referenced by the rule; only files that actually exist
    /// are carried into the output.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,

    /// The guidance lines themselves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,
}

/// Derive a URL/filename-safe identifier from a rule name.
///
/// Lowercases, collapses every run of non-alphanumerics into a single
/// hyphen, and trims leading/trailing hyphens. Pure and stable: the same
/// name always yields the same slug, and slugs are fixed points.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    out
}
