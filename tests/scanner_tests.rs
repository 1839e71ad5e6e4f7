//! Integration tests for the scanner module.
//!
//! Tests cover:
//! - Flat and recursive include patterns
//! - Exclude patterns
//! - Hidden files

use h3a::core::scanner::collect_source_files;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn strings(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| p.to_string()).collect()
}

fn setup() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("baz/c")).unwrap();
    for file in [
        "foo.txt",
        "bar.txt",
        "notes.md",
        ".env.txt",
        "baz/a.txt",
        "baz/c/0.txt",
        "baz/c/1.txt",
    ] {
        fs::write(root.join(file), file).unwrap();
    }
    temp_dir
}

fn relative(root: &Path, files: &HashSet<PathBuf>) -> HashSet<String> {
    files
        .iter()
        .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().into_owned())
        .collect()
}

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_flat_pattern_stays_in_root() {
    let temp_dir = setup();
    let root = temp_dir.path();

    let result = collect_source_files(root, &strings(&["*.txt"]), &[]).unwrap();

    assert_eq!(relative(root, &result.files), set(&["foo.txt", "bar.txt"]));
    assert!(result.files.iter().all(|f| f.is_absolute()));
}

#[test]
fn test_recursive_pattern() {
    let temp_dir = setup();
    let root = temp_dir.path();

    let result = collect_source_files(root, &strings(&["**/*.txt"]), &[]).unwrap();

    assert_eq!(
        relative(root, &result.files),
        set(&["foo.txt", "bar.txt", "baz/a.txt", "baz/c/0.txt", "baz/c/1.txt"])
    );
}

#[test]
fn test_trailing_recursive_pattern_lists_files() {
    let temp_dir = setup();
    let root = temp_dir.path();

    let result = collect_source_files(root, &strings(&["baz/**"]), &[]).unwrap();

    assert_eq!(
        relative(root, &result.files),
        set(&["baz/a.txt", "baz/c/0.txt", "baz/c/1.txt"])
    );
}

#[test]
fn test_exclude_patterns() {
    let temp_dir = setup();
    let root = temp_dir.path();

    let result = collect_source_files(
        root,
        &strings(&["**/*.txt", "*.md"]),
        &strings(&["baz/c/*", "*.md"]),
    )
    .unwrap();

    assert_eq!(
        relative(root, &result.files),
        set(&["foo.txt", "bar.txt", "baz/a.txt"])
    );
    assert_eq!(result.excluded, 3);
}

#[test]
fn test_directories_are_ignored() {
    let temp_dir = setup();
    let root = temp_dir.path();

    let result = collect_source_files(root, &strings(&["baz", "baz/c"]), &[]).unwrap();

    assert!(result.files.is_empty());
}

#[test]
fn test_explicit_hidden_file() {
    let temp_dir = setup();
    let root = temp_dir.path();

    let result = collect_source_files(root, &strings(&[".env.txt"]), &[]).unwrap();

    assert_eq!(relative(root, &result.files), set(&[".env.txt"]));
}

#[test]
fn test_invalid_include_pattern() {
    let temp_dir = setup();
    let result = collect_source_files(temp_dir.path(), &strings(&["a[.txt"]), &[]);
    assert!(result.is_err());
}
