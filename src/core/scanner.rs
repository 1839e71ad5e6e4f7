//! Source file discovery.
//!
//! Expands include patterns against a root directory, keeps regular files and
//! drops anything whose root-relative path matches an exclude pattern.

use crate::Result;
use glob::{MatchOptions, Pattern};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Options for include patterns: `*` stays within one path component and
/// does not match hidden names.
const INCLUDE_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Options for exclude patterns: shell-style, `*` also matches `/`.
const EXCLUDE_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Result of collecting source files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Absolute paths of candidate files. Iteration order is unspecified.
    pub files: HashSet<PathBuf>,
    /// Number of matched files dropped by exclude patterns.
    pub excluded: usize,
}

/// Compiled exclude patterns.
#[derive(Debug, Default)]
pub struct ExcludeSet {
    patterns: Vec<Pattern>,
}

impl ExcludeSet {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| crate::Error::InvalidGlob {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Whether a root-relative path matches any exclude pattern.
    pub fn is_match(&self, relative: &Path) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_path_with(relative, EXCLUDE_OPTIONS))
    }
}

/// Turn an include pattern into the absolute glob patterns to expand.
///
/// A trailing `**` also gets a `**/*` form so files below it are listed.
fn expand_include(root_dir: &Path, pattern: &str) -> Vec<String> {
    let full = if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        let root = Pattern::escape(&root_dir.to_string_lossy());
        format!("{}{}{}", root.trim_end_matches('/'), std::path::MAIN_SEPARATOR, pattern)
    };

    let mut expanded = vec![full.clone()];
    if full.ends_with("**") {
        expanded.push(format!("{}/*", full));
    }
    expanded
}

/// Collect candidate source files under `root_dir`.
pub fn collect_source_files(
    root_dir: &Path,
    include: &[String],
    exclude: &[String],
) -> Result<ScanResult> {
    let root_dir = if root_dir.is_absolute() {
        root_dir.to_path_buf()
    } else {
        std::env::current_dir()?.join(root_dir)
    };
    let exclude_set = ExcludeSet::new(exclude)?;
    let mut result = ScanResult::default();
    let mut excluded: HashSet<PathBuf> = HashSet::new();

    for include_pattern in include {
        for pattern in expand_include(&root_dir, include_pattern) {
            let entries = glob::glob_with(&pattern, INCLUDE_OPTIONS).map_err(|source| {
                crate::Error::InvalidGlob {
                    pattern: include_pattern.clone(),
                    source,
                }
            })?;

            for entry in entries {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        tracing::warn!("Failed to read {:?}: {}", e.path(), e.error());
                        continue;
                    }
                };
                if result.files.contains(&path) || excluded.contains(&path) || !path.is_file() {
                    continue;
                }

                let relative = path.strip_prefix(&root_dir).unwrap_or(&path);
                if exclude_set.is_match(relative) {
                    tracing::debug!("Excluded: {}", relative.display());
                    excluded.insert(path);
                    continue;
                }

                result.files.insert(path);
            }
        }
    }

    result.excluded = excluded.len();
    tracing::debug!(
        "Collected {} source files under {:?} ({} excluded)",
        result.files.len(),
        root_dir,
        result.excluded
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_include_relative() {
        let expanded = expand_include(Path::new("/data"), "*.txt");
        assert_eq!(expanded, vec![format!("/data{}*.txt", std::path::MAIN_SEPARATOR)]);
    }

    #[test]
    fn test_expand_include_trailing_recursive() {
        let expanded = expand_include(Path::new("/data"), "baz/**");
        assert_eq!(expanded.len(), 2);
        assert!(expanded[1].ends_with("baz/**/*"));
    }

    #[test]
    fn test_expand_include_escapes_root() {
        let expanded = expand_include(Path::new("/data/[x]"), "*.txt");
        assert!(expanded[0].starts_with("/data/[[]x[]]"));
    }

    #[test]
    fn test_exclude_star_crosses_directories() {
        let set = ExcludeSet::new(&["baz/*".to_string()]).unwrap();
        assert!(set.is_match(Path::new("baz/c/1.txt")));
        assert!(!set.is_match(Path::new("foo.txt")));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let result = ExcludeSet::new(&["a[".to_string()]);
        assert!(matches!(result, Err(crate::Error::InvalidGlob { .. })));
    }
}
