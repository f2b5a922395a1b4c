//! Output-location types for generated sound effects.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fully resolved output location for one generated sound effect.
///
/// Computed fresh per request and never persisted. `full_path` is always
/// absolute, regardless of how the directory hint was supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Absolute directory the file will be written into.
    pub directory: PathBuf,

    /// Final filename including extension and any `_vN` version suffix.
    pub filename: String,

    /// `directory` joined with `filename`.
    pub full_path: PathBuf,
}

/// Successful generation outcome returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Absolute path of the newly written audio file.
    pub absolute_path: PathBuf,
}
