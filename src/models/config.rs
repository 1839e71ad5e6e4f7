//! Configuration model.
//!
//! The configuration file is YAML, by default `h3a.yaml` next to the files
//! being archived. Every key except `include` is optional.

use crate::core::tag;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Default config file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "h3a.yaml";

/// Default strftime format of the destination tag.
pub const DEFAULT_TAG_FORMAT: &str = "_v%Y%m%d-%H%M%S";

/// Default regex matching tags rendered by [`DEFAULT_TAG_FORMAT`].
pub const DEFAULT_TAG_PATTERN: &str = r"_v\d{8}-\d{6}";

/// Upper bound for the default worker count.
const MAX_DEFAULT_THREADS: usize = 16;

/// Default worker count: available CPUs, capped at 16.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(MAX_DEFAULT_THREADS)
}

fn default_tag_format() -> String {
    DEFAULT_TAG_FORMAT.to_string()
}

fn default_tag_pattern() -> String {
    DEFAULT_TAG_PATTERN.to_string()
}

/// What to do when a destination file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnConflict {
    /// Abort planning.
    #[default]
    Error,
    /// Leave the file out of the plan.
    Skip,
    /// Copy over the existing destination.
    Overwrite,
}

impl fmt::Display for OnConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnConflict::Error => write!(f, "error"),
            OnConflict::Skip => write!(f, "skip"),
            OnConflict::Overwrite => write!(f, "overwrite"),
        }
    }
}

/// Archiving configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Glob patterns of files to archive, relative to the root directory.
    pub include: Vec<String>,
    /// Shell-style patterns of root-relative paths to leave out.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// strftime format of the tag inserted into destination names.
    #[serde(default = "default_tag_format")]
    pub tag_format: String,
    /// Regex a rendered tag must fully match.
    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,
    /// Policy for existing destination files.
    #[serde(default)]
    pub on_conflict: OnConflict,
    /// Maximum number of concurrent copies.
    #[serde(default = "default_threads")]
    pub threads: usize,
}

impl Config {
    /// Create a configuration with the given include patterns and defaults elsewhere.
    pub fn new<I, S>(include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
            tag_format: default_tag_format(),
            tag_pattern: default_tag_pattern(),
            on_conflict: OnConflict::default(),
            threads: default_threads(),
        }
    }

    /// Parse and validate a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(crate::Error::Config("threads must be at least 1".to_string()));
        }
        tag::compile_pattern(&self.tag_pattern)?;
        Ok(())
    }
}

/// Load configuration from a YAML file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config = Config::from_yaml_str(&content)?;
    tracing::debug!("Loaded config from {:?}: {:?}", path, config);
    Ok(config)
}

struct KeyDoc {
    key: &'static str,
    type_name: &'static str,
    required: bool,
    help: String,
}

fn key_docs() -> Vec<KeyDoc> {
    vec![
        KeyDoc {
            key: "include",
            type_name: "list of strings",
            required: true,
            help: "An array of glob patterns to include.".to_string(),
        },
        KeyDoc {
            key: "exclude",
            type_name: "list of strings",
            required: false,
            help: "An array of glob patterns to exclude. (default: [])".to_string(),
        },
        KeyDoc {
            key: "tag_format",
            type_name: "string",
            required: false,
            help: format!(
                "The strftime format of the dest tag. (default: {:?})",
                DEFAULT_TAG_FORMAT
            ),
        },
        KeyDoc {
            key: "tag_pattern",
            type_name: "string",
            required: false,
            help: format!(
                "A regex pattern to match existing dest tags. (default: {:?})",
                DEFAULT_TAG_PATTERN
            ),
        },
        KeyDoc {
            key: "on_conflict",
            type_name: "one of error, skip, overwrite",
            required: false,
            help: format!(
                "The action of existing dest files. (default: {:?})",
                OnConflict::default().to_string()
            ),
        },
        KeyDoc {
            key: "threads",
            type_name: "integer",
            required: false,
            help: format!(
                "The number of maximum threads to use. (default: {})",
                default_threads()
            ),
        },
    ]
}

/// Describe every config key, its type and its default.
pub fn format_config_help() -> String {
    let mut help = String::new();
    for doc in key_docs() {
        let optional = if doc.required { "" } else { ", optional" };
        help.push_str(&format!(
            "{} ({}{}):\n    {}\n",
            doc.key, doc.type_name, optional, doc.help
        ));
    }
    help
}
