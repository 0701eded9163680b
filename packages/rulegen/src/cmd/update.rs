//! Rebuild the catalog data file from an upstream rule index.
//!
//! The index is a markdown document (the awesome-cursorrules README by
//! default) whose sections list rules as links. Each link becomes a
//! `rawUrl`-backed rule; content is fetched lazily at generation time, not
//! here.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use color_eyre::eyre::{Context, Result, bail};
use color_print::cprintln;
use indicatif::ProgressBar;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use rulegen::catalog::{self, Category, Rule};

const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/PatrickJS/awesome-cursorrules/main/README.md";

#[derive(Args, Clone, Debug)]
pub struct Config {
    /// URL of the markdown rule index to read.
    #[arg(long, default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Which section of the index to import.
    #[arg(long, default_value = "Frontend Frameworks and Libraries")]
    pub section: String,

    /// Catalog file to update.
    #[arg(long, default_value = "rules.json")]
    pub output: PathBuf,
}

pub fn main(config: Config) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Fetching {}", config.source));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let body = fetch(&config.source);
    spinner.finish_and_clear();
    let body = body?;

    let rules = extract_section_rules(&body, &config.section, &config.source);
    if rules.is_empty() {
        bail!("no rules found under section '{}'", config.section);
    }
    let count = rules.len();

    // Refresh the imported category in place; other categories in the output
    // file are untouched.
    let mut existing = catalog::load_from(&config.output);
    existing.insert(
        config.section.clone(),
        Category {
            description: config.section.clone(),
            rules,
        },
    );

    let serialized = serde_json::to_string_pretty(&existing).context("serialize catalog")?;
    if fs::read_to_string(&config.output).is_ok_and(|current| current == serialized) {
        cprintln!("<dim>{} already up to date</dim>", config.output.display());
        return Ok(());
    }

    fs::write(&config.output, serialized)
        .with_context(|| format!("write {}", config.output.display()))?;
    cprintln!(
        "<green>✓</green> imported {} rules into {}",
        count,
        config.output.display()
    );
    Ok(())
}

fn fetch(source: &str) -> Result<String> {
    reqwest::blocking::get(source)
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .with_context(|| format!("fetch rule index from {source}"))
}

/// Pull the rules out of one section of the index.
///
/// A rule is a list-item link inside the section: the link text is the rule
/// name, the destination its content URL, and any text after the link its
/// description. The section ends at the next heading.
fn extract_section_rules(markdown: &str, section: &str, source: &str) -> Vec<Rule> {
    let mut rules = Vec::new();

    let mut in_heading = false;
    let mut heading_text = String::new();
    let mut in_section = false;
    let mut in_link = false;
    let mut current: Option<Rule> = None;
    let mut trailing = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                in_heading = true;
                heading_text.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                in_heading = false;
                in_section = heading_text.trim() == section;
            }
            Event::Start(Tag::Link { dest_url, .. }) if in_section => {
                in_link = true;
                current = Some(Rule {
                    name: String::new(),
                    description: String::new(),
                    content: None,
                    raw_url: Some(resolve_url(source, &dest_url)),
                });
            }
            Event::End(TagEnd::Link) if in_section => in_link = false,
            Event::End(TagEnd::Item) if in_section => {
                if let Some(mut rule) = current.take()
                    && !rule.name.is_empty()
                {
                    rule.description = trailing
                        .trim()
                        .trim_start_matches(['-', ':'])
                        .trim()
                        .to_string();
                    rules.push(rule);
                }
                trailing.clear();
            }
            Event::Text(text) if in_heading => heading_text.push_str(&text),
            Event::Text(text) if in_section => {
                if in_link {
                    if let Some(rule) = current.as_mut() {
                        rule.name.push_str(&text);
                    }
                } else if current.is_some() {
                    trailing.push_str(&text);
                }
            }
            _ => {}
        }
    }

    rules
}

/// Resolve a link destination against the index's own URL. Absolute URLs
/// pass through; relative paths are joined onto the index's directory.
fn resolve_url(source: &str, dest: &str) -> String {
    if dest.starts_with("http://") || dest.starts_with("https://") {
        return dest.to_string();
    }
    let base = source.rsplit_once('/').map_or(source, |(base, _)| base);
    format!("{base}/{}", dest.trim_start_matches("./"))
}
