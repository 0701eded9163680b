//! Generate rule files from the catalog.
//!
//! Interactive by default when attached to a terminal; `--rules` or
//! `--interactive=false` switches to a scripted batch run suitable for CI.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use color_print::cprintln;
use itertools::Itertools;

use rulegen::catalog::{self, Catalog, Rule};
use rulegen::generate::{BatchOptions, run_batch};
use rulegen::persist::{GenerationResult, Outcome, WarnAndOverwrite};
use rulegen::render::TargetSystem;
use rulegen::resolve::Resolver;

mod session;

#[derive(Args, Clone, Debug)]
pub struct Config {
    /// Which IDE integration to generate rule files for.
    #[arg(long = "type", value_enum, default_value = "all")]
    pub rule_type: RuleType,

    /// Rule names to generate, comma-separated. Implies a non-interactive run.
    #[arg(long, value_delimiter = ',')]
    pub rules: Vec<String>,

    /// Prompt for selections interactively.
    #[arg(
        long,
        action = clap::ArgAction::Set,
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub interactive: bool,

    /// Overwrite existing files without prompting.
    #[arg(long)]
    pub force: bool,

    /// Path to an additional catalog file (defaults to `rules.json` in the
    /// project root when present).
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Project root to generate into.
    #[arg(long, default_value = ".")]
    pub project: PathBuf,

    /// Extra arguments, accepted and ignored.
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    pub passthrough: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleType {
    Cursor,
    Windsurf,
    All,
}

impl RuleType {
    pub fn targets(self) -> Vec<TargetSystem> {
        match self {
            RuleType::Cursor => vec![TargetSystem::Cursor],
            RuleType::Windsurf => vec![TargetSystem::Windsurf],
            RuleType::All => TargetSystem::ALL.to_vec(),
        }
    }
}

pub fn main(config: Config) -> Result<()> {
    if !config.passthrough.is_empty() {
        tracing::debug!(args = ?config.passthrough, "ignoring unrecognized arguments");
    }

    let catalog = catalog::load_all(&config.project, config.catalog.as_deref());
    if catalog.is_empty() {
        bail!("no rules available in any catalog source");
    }

    let interactive = config.interactive && config.rules.is_empty();
    if interactive {
        if std::io::stdin().is_terminal() {
            return session::run(catalog, &config);
        }
        tracing::warn!("stdin is not a terminal, falling back to non-interactive mode");
    }

    run_non_interactive(&catalog, &config)
}

/// Scripted run: generate the named rules (or the whole catalog) for the
/// requested targets with no prompting.
fn run_non_interactive(catalog: &Catalog, config: &Config) -> Result<()> {
    let selected = select_rules(catalog, &config.rules);
    if selected.is_empty() {
        bail!("no matching rules to generate");
    }

    let targets = config.rule_type.targets();
    let options = BatchOptions {
        project_root: &config.project,
        force: config.force,
        conflicts: &WarnAndOverwrite,
    };

    let mut resolver = Resolver::new();
    let mut results = Vec::new();
    for (category, rules) in &selected.iter().chunk_by(|(category, _)| *category) {
        let rules = rules.map(|&(_, rule)| (*rule).clone()).collect_vec();
        results.extend(
            run_batch(&mut resolver, category, &rules, &targets, &options)
                .with_context(|| format!("generate rules in category '{category}'"))?,
        );
    }

    report(&results);
    Ok(())
}

/// Resolve `--rules` names against the catalog, or take every rule when no
/// names were given. Unknown names are skipped with a warning.
fn select_rules<'a>(catalog: &'a Catalog, names: &[String]) -> Vec<(&'a str, &'a Rule)> {
    if names.is_empty() {
        return catalog
            .iter()
            .flat_map(|(category, data)| data.rules.iter().map(move |rule| (category, rule)))
            .collect();
    }

    let mut selected = Vec::new();
    for name in names {
        match catalog.find_rule(name) {
            Some(hit) => selected.push(hit),
            None => cprintln!("<yellow>⚠ WARNING: skipping unknown rule: {}</yellow>", name.trim()),
        }
    }
    selected
}

/// Print one line per artifact with its outcome.
pub fn report(results: &[GenerationResult]) {
    for result in results {
        let path = result.file_path.display();
        match &result.outcome {
            Outcome::Written => cprintln!("<green>✓</green> {}", path),
            Outcome::Merged => cprintln!("<green>✓</green> {} <dim>(merged)</dim>", path),
            Outcome::Skipped => cprintln!("<yellow>⚠</yellow> {} <dim>(skipped)</dim>", path),
            Outcome::Failed(error) => cprintln!("<red>✗</red> {}: {}", path, error),
        }
    }

    let written = results.iter().filter(|r| r.success()).count();
    let failed = results.len() - written;
    if failed > 0 {
        cprintln!("<red>{} of {} files failed</red>", failed, results.len());
    }
}
