//! Target systems and output rendering.
//!
//! Two formats: the annotated snippet format for cursor (`.mdc` files, one
//! per rule) and the sectioned markdown format for windsurf (a single
//! `.windsurfrules` file). Each target owns its output-path convention and
//! the grammar used to classify existing on-disk content.

use std::path::{Path, PathBuf};

use derive_more::Display;
use pulldown_cmark::{Event, Parser, Tag};

use crate::catalog::{Rule, RuleContent};

pub mod cursor;
pub mod windsurf;

/// Maximum size of any generated artifact.
pub const MAX_OUTPUT_SIZE: usize = 100 * 1024;

/// Appended whenever content is dropped to stay under [`MAX_OUTPUT_SIZE`].
pub const TRUNCATION_NOTICE: &str =
    "\n\n> Remaining content truncated to stay within the size limit.\n";

/// One of the supported IDE integrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TargetSystem {
    #[display("cursor")]
    Cursor,
    #[display("windsurf")]
    Windsurf,
}

impl TargetSystem {
    pub const ALL: [TargetSystem; 2] = [TargetSystem::Cursor, TargetSystem::Windsurf];

    /// Conventional output location for a rule, relative to the project
    /// root. Cursor gets one file per rule; windsurf collects everything in
    /// a single fixed file. The two never overlap.
    pub fn output_path(&self, project_root: &Path, slug: &str) -> PathBuf {
        match self {
            TargetSystem::Cursor => project_root
                .join(".cursor")
                .join("rules")
                .join(format!("{slug}.mdc")),
            TargetSystem::Windsurf => project_root.join(".windsurfrules"),
        }
    }

    /// Render a rule's resolved content for this target.
    pub fn render(&self, rule: &Rule, content: &RuleContent, project_root: &Path) -> String {
        match self {
            TargetSystem::Cursor => cursor::render(rule, content, project_root),
            TargetSystem::Windsurf => windsurf::render(rule, content),
        }
    }

    /// Classify existing on-disk content as well-formed for this target.
    ///
    /// The append-merge conflict resolution is only offered for well-formed
    /// files.
    pub fn is_valid(&self, content: &str) -> bool {
        match self {
            // The annotated format leads with its `# name` header line.
            TargetSystem::Cursor => first_block_is_heading(content),
            // Valid means at least one block-level markdown token.
            TargetSystem::Windsurf => has_block_token(content),
        }
    }
}

fn has_block_token(content: &str) -> bool {
    Parser::new(content).any(|event| matches!(&event, Event::Start(tag) if is_block_tag(tag)))
}

fn first_block_is_heading(content: &str) -> bool {
    Parser::new(content)
        .find_map(|event| match event {
            Event::Start(tag) if is_block_tag(&tag) => {
                Some(matches!(tag, Tag::Heading { .. }))
            }
            _ => None,
        })
        .unwrap_or(false)
}

fn is_block_tag(tag: &Tag) -> bool {
    matches!(
        tag,
        Tag::Paragraph
            | Tag::Heading { .. }
            | Tag::BlockQuote(_)
            | Tag::CodeBlock(_)
            | Tag::List(_)
            | Tag::Item
            | Tag::Table(_)
            | Tag::HtmlBlock
    )
}
