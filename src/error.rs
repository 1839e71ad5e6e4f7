//! Error types for h3a.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for h3a.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Invalid tag format: {0:?}")]
    InvalidTagFormat(String),

    #[error("Invalid tag pattern {pattern:?}: {source}")]
    InvalidTagPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Generated tag {tag:?} is incompatible with tag pattern: {pattern:?}")]
    TagPatternMismatch { tag: String, pattern: String },

    #[error("Invalid glob pattern {pattern:?}: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    // Plan errors
    #[error("Destination file exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("Overwriting source file(s): {}", join_paths(.0))]
    SameRunConflict(Vec<PathBuf>),

    // Execute errors
    #[error("Failed to copy {} to {}: {source}", .src.display(), .dest.display())]
    Copy {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Aborted by user")]
    Aborted,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // YAML errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
