//! Catalog model and loading operations.

use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::io::ErrorKind;
use std::path::Path;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tap::TapFallible;

pub use schema::*;

mod schema;

/// Default catalog shipped with the binary.
const DEFAULT_CATALOG: &str = include_str!("../data/rules.json");

/// The full category → rules data set driving navigation.
///
/// Loaded once at process start and passed by value into the navigator and
/// resolver; immutable for the run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: BTreeMap<String, Category>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.categories.values().all(|c| c.rules.is_empty())
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Category)> {
        self.categories.iter().map(|(name, data)| (name.as_str(), data))
    }

    /// Look a rule up by display name across all categories.
    ///
    /// Names are compared case-insensitively after trimming, since this
    /// backs the `--rules` flag where names arrive comma-separated.
    pub fn find_rule(&self, name: &str) -> Option<(&str, &Rule)> {
        let wanted = name.trim().to_lowercase();
        self.iter().find_map(|(category, data)| {
            data.rules
                .iter()
                .find(|rule| rule.name.to_lowercase() == wanted)
                .map(|rule| (category, rule))
        })
    }

    pub fn insert(&mut self, name: impl Into<String>, category: Category) {
        self.categories.insert(name.into(), category);
    }

    /// Merge another catalog into this one.
    ///
    /// New categories are added; existing categories get the other source's
    /// rules appended and keep their own description unless it was empty.
    pub fn extend_from(&mut self, other: Catalog) {
        for (name, data) in other.categories {
            match self.categories.get_mut(&name) {
                Some(existing) => {
                    if existing.description.is_empty() {
                        existing.description = data.description;
                    }
                    existing.rules.extend(data.rules);
                }
                None => {
                    self.categories.insert(name, data);
                }
            }
        }
    }
}

/// Get the project directories for the application.
#[tracing::instrument]
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "rulegen", "rulegen")
}

/// Load the catalog from all sources.
///
/// Loading order (all additive):
/// 1. The default catalog embedded in the binary
/// 2. User-level `rules.json` from `ProjectDirs::config_dir()` if it exists
/// 3. `rules.json` in the project root, or `override_path` when given
#[tracing::instrument]
pub fn load_all(project_root: &Path, override_path: Option<&Path>) -> Catalog {
    let mut catalog = parse_source(Path::new("<built-in>"), DEFAULT_CATALOG);

    if let Some(dirs) = project_dirs() {
        let user_catalog = dirs.config_dir().join("rules.json");
        catalog.extend_from(load_from(&user_catalog));
    }

    match override_path {
        Some(path) => catalog.extend_from(load_from(path)),
        None => catalog.extend_from(load_from(&project_root.join("rules.json"))),
    }

    catalog
}

/// Load a catalog from a single JSON file.
///
/// A missing or malformed source degrades to an empty catalog rather than
/// failing the run; the categories from that source are simply unavailable.
#[tracing::instrument]
pub fn load_from(path: &Path) -> Catalog {
    let content = match read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Catalog::default(),
        Err(e) => {
            tracing::warn!(?path, error = %e, "reading catalog source");
            return Catalog::default();
        }
    };

    parse_source(path, &content)
}

fn parse_source(path: &Path, content: &str) -> Catalog {
    serde_json::from_str::<Catalog>(content)
        .tap_ok(|catalog| {
            tracing::debug!(?path, categories = catalog.categories.len(), "parsed catalog source");
        })
        .unwrap_or_else(|e| {
            tracing::warn!(?path, error = %e, "malformed catalog source, treating as empty");
            Catalog::default()
        })
}
