//! Lazy rule content resolution with per-run memoization.

use std::collections::HashMap;

use crate::catalog::{Rule, RuleContent, StructuredContent};
use crate::{Error, Result};

/// Resolves rule content, fetching `rawUrl`-backed bodies at most once per
/// rule per run.
///
/// The cache is keyed by rule identity (category + slug) rather than mutated
/// in place on the rule, so catalog values stay immutable.
pub struct Resolver {
    client: reqwest::blocking::Client,
    cache: HashMap<String, RuleContent>,
}

impl Resolver {
    pub fn new() -> Self {
        Resolver {
            client: reqwest::blocking::Client::new(),
            cache: HashMap::new(),
        }
    }

    /// Ensure `rule` has content, returning it.
    ///
    /// Inline content returns immediately with no network access. Remote
    /// content is fetched once and memoized for the rest of the run. Fetch
    /// failures are not retried here; retry policy belongs to the catalog
    /// build step.
    #[tracing::instrument(skip(self, rule), fields(rule = %rule.name))]
    pub fn resolve(&mut self, category: &str, rule: &Rule) -> Result<RuleContent> {
        if let Some(content) = &rule.content {
            return Ok(content.clone());
        }

        let key = format!("{category}/{}", rule.slug());
        if let Some(content) = self.cache.get(&key) {
            tracing::debug!(%key, "content cache hit");
            return Ok(content.clone());
        }

        let url = rule.raw_url.as_deref().ok_or_else(|| {
            Error::Validation(format!(
                "rule '{}' has neither inline content nor a source URL",
                rule.name
            ))
        })?;

        let body = self.fetch(&rule.name, url)?;
        let content = parse_fetched(&body);
        self.cache.insert(key, content.clone());
        Ok(content)
    }

    fn fetch(&self, rule: &str, url: &str) -> Result<String> {
        let fetch_err = |reason: String| Error::Fetch {
            rule: rule.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| fetch_err(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP status {status}")));
        }

        response.text().map_err(|e| fetch_err(e.to_string()))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a fetched rule body, YAML first with a plain-text fallback.
///
/// Prose can deserialize as a YAML mapping with none of the fields this
/// schema cares about; a parse that carries no description, patterns, or
/// rules is treated as text so nothing renders empty.
fn parse_fetched(body: &str) -> RuleContent {
    match serde_yaml::from_str::<StructuredContent>(body) {
        Ok(structured)
            if structured.description.is_some()
                || !structured.patterns.is_empty()
                || !structured.rules.is_empty() =>
        {
            RuleContent::Structured(structured)
        }
        _ => RuleContent::Text(body.to_string()),
    }
}
