//! Interactive session loop.
//!
//! All prompting lives here; the navigation logic itself is the pure state
//! machine in [`rulegen::navigator`]. Each prompt produces a [`NavEvent`],
//! the navigator validates it, and the loop either moves to the next prompt
//! or runs a generation batch and returns to the top.

use std::io::ErrorKind;
use std::path::Path;

use color_eyre::eyre::Result;
use color_print::cprintln;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, MultiSelect, Select};
use itertools::Itertools;

use rulegen::catalog::Catalog;
use rulegen::detect::relevant_rules;
use rulegen::generate::{BatchOptions, run_batch};
use rulegen::navigator::{
    MIN_SEARCH_TERM, Mode, NavEvent, NavState, Navigator, SearchHit, SearchScope, Step, search,
};
use rulegen::persist::{ConflictResolver, ExistingFile, Resolution};
use rulegen::render::TargetSystem;
use rulegen::resolve::Resolver;

use super::{Config, report};

/// What a prompt round produced.
enum Flow {
    /// A choice to feed into the navigator.
    Event(NavEvent),
    /// Re-show the current prompt (e.g. a search with no hits).
    Stay,
    /// The user asked to leave.
    Exit,
}

/// Run the interactive loop until the user exits.
pub fn run(catalog: Catalog, config: &Config) -> Result<()> {
    let navigator = Navigator::new(catalog);
    let mut resolver = Resolver::new();
    let mut state = NavState::root();

    welcome();

    loop {
        let flow = match state.mode {
            Mode::Category => category_prompt(&navigator, &config.project)?,
            Mode::Rule => rule_prompt(&navigator, &state)?,
            Mode::Ide => target_prompt(&state)?,
        };

        let event = match flow {
            Flow::Event(event) => event,
            Flow::Stay => continue,
            Flow::Exit => break,
        };

        match navigator.transition(&state, event) {
            Ok(Step::Next(next)) => state = next,
            Ok(Step::Generate(selection)) => {
                let options = BatchOptions {
                    project_root: &config.project,
                    force: config.force,
                    conflicts: &PromptConflicts,
                };
                match run_batch(
                    &mut resolver,
                    &selection.category,
                    &selection.rules,
                    &selection.targets,
                    &options,
                ) {
                    Ok(results) => report(&results),
                    // A failed batch does not end the session.
                    Err(error) => cprintln!("<red>{}</red>", error),
                }
                // Back to the top for another round.
                state = NavState::root();
            }
            Err(error) => {
                cprintln!("<red>{}</red>", error);
                // Bad selections leave the state alone; the same prompt comes
                // back around.
            }
        }
    }

    cprintln!("<dim>Bye.</dim>");
    Ok(())
}

fn welcome() {
    cprintln!("<bold>rulegen</bold> - generate AI assistant rule files for your project");
    cprintln!("<dim>Pick a category, choose rules, then choose which IDE files to write.</dim>");
    println!();
}

/// Top-level prompt: categories plus search, project suggestions, and exit.
fn category_prompt(navigator: &Navigator, project_root: &Path) -> Result<Flow> {
    let categories = navigator.catalog().category_names().collect_vec();

    let mut items = Vec::with_capacity(categories.len() + 3);
    for category in &categories {
        let description = navigator
            .catalog()
            .get(category)
            .map(|data| data.description.as_str())
            .unwrap_or_default();
        items.push(format!("{category} - {description}"));
    }
    items.push("Search all rules".to_string());
    items.push("Suggest rules for this project".to_string());
    items.push("Exit".to_string());

    let Some(choice) = prompt_guard(
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Select a category")
            .items(&items)
            .default(0)
            .interact_opt(),
    )?
    else {
        return Ok(Flow::Exit);
    };

    match choice {
        i if i < categories.len() => Ok(Flow::Event(NavEvent::PickCategory(
            categories[i].to_string(),
        ))),
        i if i == categories.len() => search_flow(navigator, SearchScope::All),
        i if i == categories.len() + 1 => project_flow(navigator, project_root),
        _ => Ok(Flow::Exit),
    }
}

/// Rule prompt for the current category: multi-select with back and a
/// category-scoped search escape hatch.
fn rule_prompt(navigator: &Navigator, state: &NavState) -> Result<Flow> {
    let Some(category) = state.category.as_deref() else {
        return Ok(Flow::Event(NavEvent::Back));
    };
    let Some(data) = navigator.catalog().get(category) else {
        return Ok(Flow::Event(NavEvent::Back));
    };

    let actions = ["< Back", "Search this category"];
    let mut items = actions.iter().map(|s| s.to_string()).collect_vec();
    items.extend(
        data.rules
            .iter()
            .map(|rule| format!("{} - {}", rule.name, rule.description)),
    );

    let Some(checked) = prompt_guard(
        MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("[{}] Select rules (space to toggle)", state.breadcrumb))
            .items(&items)
            .interact_opt(),
    )?
    else {
        return Ok(Flow::Event(NavEvent::Back));
    };

    if checked.contains(&0) {
        return Ok(Flow::Event(NavEvent::Back));
    }
    if checked.contains(&1) {
        return search_flow(navigator, SearchScope::Category(category.to_string()));
    }

    let rules = checked
        .into_iter()
        .map(|i| data.rules[i - actions.len()].clone())
        .collect_vec();
    Ok(Flow::Event(NavEvent::PickRules(rules)))
}

/// Target prompt: which IDE files to write for the selected rules.
fn target_prompt(state: &NavState) -> Result<Flow> {
    let items = TargetSystem::ALL.map(|target| target.to_string());

    let Some(checked) = prompt_guard(
        MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("[{}] Select target systems", state.breadcrumb))
            .items(&items)
            .interact_opt(),
    )?
    else {
        return Ok(Flow::Event(NavEvent::Back));
    };

    if checked.is_empty() {
        // The navigator rejects this and the prompt is shown again.
        return Ok(Flow::Event(NavEvent::Confirm(Vec::new())));
    }

    let targets: Vec<TargetSystem> = checked.into_iter().map(|i| TargetSystem::ALL[i]).collect();

    let summary = format!(
        "Generate {} rule file(s) for {}?",
        state.rules.len() * targets.len(),
        targets.iter().join(", ")
    );
    let Some(confirmed) = prompt_guard(
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt(summary)
            .items(&["Generate", "< Back"])
            .default(0)
            .interact_opt(),
    )?
    else {
        return Ok(Flow::Event(NavEvent::Back));
    };

    if confirmed != 0 {
        return Ok(Flow::Event(NavEvent::Back));
    }
    Ok(Flow::Event(NavEvent::Confirm(targets)))
}

/// Actions shown before the hits in the search-results list. Clear search
/// discards the hits and prompts for a fresh term.
const SEARCH_MENU_ACTIONS: [&str; 2] = ["< Back", "Clear search"];

fn search_menu_items(hits: &[SearchHit]) -> Vec<String> {
    let mut items = SEARCH_MENU_ACTIONS
        .iter()
        .map(|action| action.to_string())
        .collect_vec();
    items.extend(
        hits.iter()
            .map(|hit| format!("{} > {} - {}", hit.category, hit.rule.name, hit.rule.description)),
    );
    items
}

/// Search prompt plus hit selection. A hit jumps straight to the target
/// prompt for that single rule; clear search loops back to the term input.
fn search_flow(navigator: &Navigator, scope: SearchScope) -> Result<Flow> {
    loop {
        let Some(term) = prompt_guard(
            Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt("Search term")
                .validate_with(|input: &String| {
                    if input.trim().chars().count() >= MIN_SEARCH_TERM {
                        Ok(())
                    } else {
                        Err(format!("enter at least {MIN_SEARCH_TERM} characters"))
                    }
                })
                .interact_text()
                .map(Some),
        )?
        else {
            return Ok(Flow::Stay);
        };

        let hits = search(navigator.catalog(), &term, &scope)?;
        if hits.is_empty() {
            cprintln!("<yellow>No rules match '{}'.</yellow>", term.trim());
            return Ok(Flow::Stay);
        }

        let items = search_menu_items(&hits);
        let Some(choice) = prompt_guard(
            Select::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("{} matching rules", hits.len()))
                .items(&items)
                .default(0)
                .interact_opt(),
        )?
        else {
            return Ok(Flow::Stay);
        };

        match choice {
            0 => return Ok(Flow::Stay),
            1 => continue,
            i => {
                let Some(hit) = hits.into_iter().nth(i - SEARCH_MENU_ACTIONS.len()) else {
                    return Ok(Flow::Stay);
                };
                return Ok(Flow::Event(NavEvent::SearchHit {
                    category: hit.category,
                    rule: hit.rule,
                }));
            }
        }
    }
}

/// Rank catalog rules against the project's dependency manifest and offer
/// the matches.
fn project_flow(navigator: &Navigator, project_root: &Path) -> Result<Flow> {
    let matches = relevant_rules(navigator.catalog(), project_root);
    if matches.rules.is_empty() {
        cprintln!("<yellow>No rules match this project's technologies.</yellow>");
        return Ok(Flow::Stay);
    }

    cprintln!(
        "<dim>Detected: {}</dim>",
        matches.technologies.iter().join(", ")
    );

    let mut items = vec!["< Back".to_string()];
    items.extend(matches.rules.iter().map(|ranked| {
        format!(
            "{} > {} <{}>",
            ranked.category,
            ranked.rule.name,
            ranked.project_match.join(", ")
        )
    }));

    let Some(choice) = prompt_guard(
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Suggested rules for this project")
            .items(&items)
            .default(0)
            .interact_opt(),
    )?
    else {
        return Ok(Flow::Stay);
    };

    if choice == 0 {
        return Ok(Flow::Stay);
    }
    let Some(ranked) = matches.rules.into_iter().nth(choice - 1) else {
        return Ok(Flow::Stay);
    };
    Ok(Flow::Event(NavEvent::SearchHit {
        category: ranked.category,
        rule: ranked.rule,
    }))
}

/// Map a prompt result into an optional value, treating Ctrl-C (an
/// interrupted read) like an explicit cancel instead of an error.
fn prompt_guard<T>(result: dialoguer::Result<Option<T>>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(value),
        Err(dialoguer::Error::IO(e)) if e.kind() == ErrorKind::Interrupted => Ok(None),
        Err(dialoguer::Error::IO(e)) => Err(e.into()),
    }
}

/// Conflict resolution backed by a prompt.
///
/// Appending is only offered when the existing file parses as well-formed
/// for the target; a failed prompt reads as cancel so the file survives.
struct PromptConflicts;

impl ConflictResolver for PromptConflicts {
    fn resolve(&self, path: &Path, existing: &ExistingFile) -> Resolution {
        cprintln!("<yellow>{} already exists.</yellow>", path.display());

        let mut items = vec!["Overwrite"];
        if existing.is_valid {
            items.push("Append to existing content");
        }
        items.push("Cancel");

        let choice = prompt_guard(
            Select::with_theme(&ColorfulTheme::default())
                .with_prompt("How should this be handled?")
                .items(&items)
                .default(0)
                .interact_opt(),
        );

        match choice {
            Ok(Some(0)) => Resolution::Overwrite,
            Ok(Some(1)) if existing.is_valid => Resolution::Append,
            _ => Resolution::Cancel,
        }
    }
}
