//! Navigation state machine over the rule catalog.
//!
//! The machine is pure: each transition consumes the current state plus a
//! resolved user choice and yields either the next state or a terminal
//! generate action. The binary's session loop owns all prompting, so feeding
//! a scripted sequence of events replays a session deterministically.

use itertools::Itertools;

use crate::catalog::{Catalog, Rule};
use crate::render::TargetSystem;
use crate::{Error, Result};

/// Which prompt the session is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Category,
    Rule,
    Ide,
}

/// Current position in the category → rule → target hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct NavState {
    pub mode: Mode,
    /// Human-readable path of the selections so far, joined with " > ".
    pub breadcrumb: String,
    pub category: Option<String>,
    pub rules: Vec<Rule>,
}

impl NavState {
    /// The root of the hierarchy: category selection, nothing chosen.
    pub fn root() -> Self {
        NavState {
            mode: Mode::Category,
            breadcrumb: String::new(),
            category: None,
            rules: Vec::new(),
        }
    }
}

/// A resolved user choice fed into [`Navigator::transition`].
#[derive(Debug, Clone)]
pub enum NavEvent {
    /// A category was picked at the category prompt.
    PickCategory(String),
    /// One or more rules were checked at the rule prompt.
    PickRules(Vec<Rule>),
    /// A search or project-suggestion hit was selected; jumps straight to
    /// target selection with that singleton rule.
    SearchHit { category: String, rule: Rule },
    /// Target systems were checked and the selection confirmed.
    Confirm(Vec<TargetSystem>),
    /// Back out one level.
    Back,
}

/// A fully resolved (category, rules, target systems) triple.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub category: String,
    pub rules: Vec<Rule>,
    pub targets: Vec<TargetSystem>,
}

/// Result of a transition: either a new state or a terminal generate action.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Next(NavState),
    Generate(Selection),
}

/// The navigation state machine, closed over an immutable catalog.
pub struct Navigator {
    catalog: Catalog,
}

impl Navigator {
    pub fn new(catalog: Catalog) -> Self {
        Navigator { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Apply one event to the current state.
    ///
    /// Validation failures leave the caller's state untouched; the session
    /// loop reports them and re-prompts in place.
    #[tracing::instrument(skip(self, state), fields(mode = ?state.mode))]
    pub fn transition(&self, state: &NavState, event: NavEvent) -> Result<Step> {
        match (state.mode, event) {
            (Mode::Category, NavEvent::PickCategory(name)) => {
                if self.catalog.get(&name).is_none() {
                    return Err(Error::Validation(format!("unknown category '{name}'")));
                }
                Ok(Step::Next(NavState {
                    mode: Mode::Rule,
                    breadcrumb: name.clone(),
                    category: Some(name),
                    rules: Vec::new(),
                }))
            }

            (Mode::Category | Mode::Rule, NavEvent::SearchHit { category, rule }) => {
                Ok(Step::Next(NavState {
                    mode: Mode::Ide,
                    breadcrumb: format!("{category} > {}", rule.name),
                    category: Some(category),
                    rules: vec![rule],
                }))
            }

            (Mode::Rule, NavEvent::Back) => Ok(Step::Next(NavState::root())),

            (Mode::Rule, NavEvent::PickRules(rules)) => {
                if rules.is_empty() {
                    return Err(Error::Validation(
                        "you must select at least one rule".to_string(),
                    ));
                }
                let category = state
                    .category
                    .clone()
                    .ok_or_else(|| Error::Validation("no category selected".to_string()))?;
                let names = rules.iter().map(|rule| rule.name.as_str()).join(", ");
                Ok(Step::Next(NavState {
                    mode: Mode::Ide,
                    breadcrumb: format!("{category} > {names}"),
                    category: Some(category),
                    rules,
                }))
            }

            (Mode::Ide, NavEvent::Back) => {
                let category = state
                    .category
                    .clone()
                    .ok_or_else(|| Error::Validation("no category selected".to_string()))?;
                Ok(Step::Next(NavState {
                    mode: Mode::Rule,
                    breadcrumb: category.clone(),
                    category: Some(category),
                    rules: Vec::new(),
                }))
            }

            (Mode::Ide, NavEvent::Confirm(targets)) => {
                if targets.is_empty() {
                    return Err(Error::Validation(
                        "you must select at least one target system".to_string(),
                    ));
                }
                if state.rules.is_empty() {
                    return Err(Error::Validation("no rules selected".to_string()));
                }
                Ok(Step::Generate(Selection {
                    category: state.category.clone().unwrap_or_default(),
                    rules: state.rules.clone(),
                    targets,
                }))
            }

            (mode, event) => Err(Error::Validation(format!(
                "unexpected {event:?} in {mode:?} state"
            ))),
        }
    }
}

/// Minimum length of a usable search term.
pub const MIN_SEARCH_TERM: usize = 2;

/// Scope of a search: the whole catalog or a single category.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchScope {
    All,
    Category(String),
}

/// A search result pairing a rule with its category.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub category: String,
    pub rule: Rule,
}

/// Case-insensitive substring search over rule names, descriptions, and
/// stringified structured content.
///
/// Terms shorter than [`MIN_SEARCH_TERM`] characters are rejected with a
/// validation error so the caller can re-prompt without changing state.
pub fn search(catalog: &Catalog, term: &str, scope: &SearchScope) -> Result<Vec<SearchHit>> {
    let term = term.trim();
    if term.chars().count() < MIN_SEARCH_TERM {
        return Err(Error::Validation(format!(
            "search term must be at least {MIN_SEARCH_TERM} characters"
        )));
    }
    let needle = term.to_lowercase();

    let mut hits = Vec::new();
    for (category, data) in catalog.iter() {
        if let SearchScope::Category(scoped) = scope
            && scoped != category
        {
            continue;
        }
        for rule in &data.rules {
            if rule.search_text().to_lowercase().contains(&needle) {
                hits.push(SearchHit {
                    category: category.to_string(),
                    rule: rule.clone(),
                });
            }
        }
    }
    Ok(hits)
}
