//! Batch generation: resolve each rule's content, render it for every
//! requested target, and persist the artifacts.

use std::path::{Path, PathBuf};

use crate::catalog::Rule;
use crate::persist::{self, ConflictResolver, GenerationResult};
use crate::render::TargetSystem;
use crate::resolve::Resolver;
use crate::Result;

/// Options shared by every write in a batch.
pub struct BatchOptions<'a> {
    pub project_root: &'a Path,
    pub force: bool,
    pub conflicts: &'a dyn ConflictResolver,
}

/// Generate artifacts for every (rule, target) pair in the selection.
///
/// Content resolution is fail-fast: a fetch or validation error aborts the
/// batch before any further rule is touched. Persistence failures do not
/// abort; each lands in its result as a failed outcome so one bad path does
/// not block the rest of the batch.
#[tracing::instrument(skip_all, fields(category = %category, rules = rules.len()))]
pub fn run_batch(
    resolver: &mut Resolver,
    category: &str,
    rules: &[Rule],
    targets: &[TargetSystem],
    options: &BatchOptions<'_>,
) -> Result<Vec<GenerationResult>> {
    let mut results = Vec::with_capacity(rules.len() * targets.len());

    for rule in rules {
        let content = resolver.resolve(category, rule)?;
        for target in targets {
            let path = output_path(target, options.project_root, rule);
            let rendered = target.render(rule, &content, options.project_root);
            results.push(persist::write_rule_file(
                &path,
                &rendered,
                *target,
                options.force,
                options.conflicts,
            ));
        }
    }

    Ok(results)
}

fn output_path(target: &TargetSystem, project_root: &Path, rule: &Rule) -> PathBuf {
    target.output_path(project_root, &rule.slug())
}
