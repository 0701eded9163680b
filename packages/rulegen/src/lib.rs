//! Core library for rulegen, used by its CLI.
//!
//! Everything interactive lives in the binary; this library is prompt-free
//! so navigation, rendering, and persistence can be exercised directly in
//! tests.

use std::path::PathBuf;

pub mod catalog;
pub mod detect;
pub mod generate;
pub mod navigator;
pub mod persist;
pub mod render;
pub mod resolve;

/// Error taxonomy for the core.
///
/// None of these are fatal to a session: validation errors re-prompt, and
/// fetch and persistence errors abort the current batch and return control
/// to the category prompt.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad or missing user selection.
    #[error("invalid selection: {0}")]
    Validation(String),

    /// Remote rule content unavailable.
    #[error("failed to fetch content for rule '{rule}': {reason}")]
    Fetch { rule: String, reason: String },

    /// Filesystem failure while writing an output artifact.
    #[error("failed to write {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
