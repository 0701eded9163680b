//! File persistence engine with conflict resolution and bounded merging.
//!
//! Every artifact is assembled in memory and written with a single call, so
//! a file is either fully updated or untouched. Concurrent external writers
//! to the same output path are out of scope and unguarded.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::render::{MAX_OUTPUT_SIZE, TRUNCATION_NOTICE, TargetSystem};
use crate::{Error, Result};

/// Separator placed between existing and appended content.
pub const MERGE_SEPARATOR: &str = "\n\n---\n\n";

/// Existing on-disk content at an output path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExistingFile {
    pub exists: bool,
    /// Whether the existing text is well-formed for the target's format.
    pub is_valid: bool,
    pub content: Option<String>,
}

/// How a conflict with an existing file should be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Overwrite,
    Append,
    Cancel,
}

/// Decides what to do when an output file already exists.
///
/// The binary wires this to an interactive prompt; non-interactive runs and
/// tests supply scripted implementations.
pub trait ConflictResolver {
    fn resolve(&self, path: &Path, existing: &ExistingFile) -> Resolution;
}

/// Fallback resolver for environments without prompting capability: warn,
/// then overwrite, as if `--force` had been passed.
#[derive(Debug, Clone, Copy, Default)]
pub struct WarnAndOverwrite;

impl ConflictResolver for WarnAndOverwrite {
    fn resolve(&self, path: &Path, _existing: &ExistingFile) -> Resolution {
        tracing::warn!(
            path = %path.display(),
            "output file exists, overwriting (no prompt available)"
        );
        Resolution::Overwrite
    }
}

/// Outcome of one write request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Written fresh, or overwritten.
    Written,
    /// Existing content merged with the new content.
    Merged,
    /// The user declined the write; not a failure.
    Skipped,
    /// An I/O failure; nothing on disk changed partially.
    Failed(String),
}

/// Result of one generation request for one (rule, target) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub file_path: PathBuf,
    pub outcome: Outcome,
}

impl GenerationResult {
    pub fn success(&self) -> bool {
        !matches!(self.outcome, Outcome::Failed(_))
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Read and classify whatever is currently at `path`.
pub fn classify_existing(path: &Path, target: TargetSystem) -> ExistingFile {
    match fs::read_to_string(path) {
        Ok(content) => ExistingFile {
            exists: true,
            is_valid: target.is_valid(&content),
            content: Some(content),
        },
        Err(e) if e.kind() == ErrorKind::NotFound => ExistingFile::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "reading existing output file");
            // Unreadable counts as present-but-invalid so the caller still
            // gets a say before it is replaced.
            ExistingFile {
                exists: true,
                is_valid: false,
                content: None,
            }
        }
    }
}

/// Write rendered content to its output path, resolving conflicts.
///
/// `force` skips conflict detection entirely. Otherwise an existing file is
/// classified and the resolver picks overwrite, append (a size-bounded
/// merge), or cancel; cancel reports a skipped outcome, not a failure.
#[tracing::instrument(skip(content, conflicts), fields(path = %path.display()))]
pub fn write_rule_file(
    path: &Path,
    content: &str,
    target: TargetSystem,
    force: bool,
    conflicts: &dyn ConflictResolver,
) -> GenerationResult {
    let done = |outcome: Outcome| GenerationResult {
        file_path: path.to_path_buf(),
        outcome,
    };

    let mut assembled = content.to_string();
    let mut outcome = Outcome::Written;

    if !force {
        let existing = classify_existing(path, target);
        if existing.exists {
            match conflicts.resolve(path, &existing) {
                Resolution::Cancel => return done(Outcome::Skipped),
                Resolution::Overwrite => {}
                Resolution::Append => {
                    assembled = merge(&existing.content.unwrap_or_default(), content);
                    outcome = Outcome::Merged;
                }
            }
        }
    }

    match write_atomic(path, &assembled) {
        Ok(()) => done(outcome),
        Err(e) => done(Outcome::Failed(e.to_string())),
    }
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let io_err = |source| Error::Persistence {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)
}

/// Merge new content onto existing content within the size cap.
///
/// The merged artifact never exceeds [`MAX_OUTPUT_SIZE`] plus the length of
/// one truncation notice.
pub fn merge(existing: &str, new: &str) -> String {
    // Existing content already beyond 90% of the cap: only note the
    // truncation, merge nothing.
    if existing.len() > MAX_OUTPUT_SIZE * 9 / 10 {
        return format!("{existing}{TRUNCATION_NOTICE}");
    }

    let budget = MAX_OUTPUT_SIZE - existing.len() - MERGE_SEPARATOR.len();
    if new.len() <= budget {
        return format!("{existing}{MERGE_SEPARATOR}{new}");
    }

    let mut truncated = String::with_capacity(budget);
    for line in new.lines() {
        if truncated.len() + line.len() + 1 > budget {
            break;
        }
        truncated.push_str(line);
        truncated.push('\n');
    }
    truncated.push_str(TRUNCATION_NOTICE);
    format!("{existing}{MERGE_SEPARATOR}{truncated}")
}
