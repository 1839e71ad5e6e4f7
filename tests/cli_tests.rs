//! End-to-end tests of the archive command.

use clap::Parser;
use h3a::cli::args::Cli;
use h3a::cli::commands::run::run;
use h3a::logging::LogSink;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

fn names(dir: &std::path::Path) -> HashSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn setup() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("foo.txt"), "foo").unwrap();
    fs::write(root.join("bar.txt"), "bar").unwrap();
    fs::create_dir(root.join("baz")).unwrap();
    fs::write(root.join("baz").join("blah.txt"), "blah").unwrap();
    fs::write(root.join("h3a.yaml"), "include:\n  - foo.txt\n").unwrap();
    temp_dir
}

#[tokio::test]
async fn test_cli_simple() {
    let temp_dir = setup();
    let root = temp_dir.path().canonicalize().unwrap();
    let config = root.join("h3a.yaml");

    let cli = Cli::try_parse_from(["h3a", "-y", "-c", config.to_str().unwrap()]).unwrap();
    let plan = run(&cli, LogSink::in_memory()).await.unwrap();

    assert_eq!(plan.len(), 1);
    let item = &plan.items()[0];
    assert_eq!(item.id, 1);
    assert_eq!(item.src, root.join("foo.txt"));
    assert_eq!(item.dest.parent(), Some(root.as_path()));
    let dest_name = item.dest.file_name().unwrap().to_string_lossy().into_owned();
    assert!(Regex::new(r"^foo_v\d{8}-\d{6}\.txt$").unwrap().is_match(&dest_name));
    assert!(!item.overwrite_flag);

    let expected: HashSet<String> = ["foo.txt", "bar.txt", "baz", "h3a.yaml", dest_name.as_str()]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names(&root), expected);
    assert_eq!(names(&root.join("baz")), ["blah.txt".to_string()].into_iter().collect());
    assert_eq!(fs::read_to_string(&item.dest).unwrap(), "foo");
}

#[tokio::test]
async fn test_cli_dry_run_writes_plan_only() {
    let temp_dir = setup();
    let root = temp_dir.path().canonicalize().unwrap();
    let config = root.join("h3a.yaml");
    let output = root.join("out").join("plan.json");

    let cli = Cli::try_parse_from([
        "h3a",
        "-d",
        "-c",
        config.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();
    let plan = run(&cli, LogSink::in_memory()).await.unwrap();

    assert_eq!(plan.len(), 1);
    assert!(!plan.items()[0].dest.exists());
    let saved = h3a::models::plan::load_plan(&output).unwrap();
    assert_eq!(saved, plan);
}

#[tokio::test]
async fn test_cli_threads_override() {
    let temp_dir = setup();
    let root = temp_dir.path().canonicalize().unwrap();
    fs::write(root.join("h3a.yaml"), "include:\n  - '*.txt'\nthreads: 1\n").unwrap();
    let config = root.join("h3a.yaml");

    let cli = Cli::try_parse_from(["h3a", "-y", "-t", "4", "-c", config.to_str().unwrap()]).unwrap();
    let plan = run(&cli, LogSink::in_memory()).await.unwrap();

    assert_eq!(plan.len(), 2);
    assert!(plan.iter().all(|item| item.dest.exists()));
}

#[tokio::test]
async fn test_cli_missing_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("h3a.yaml");

    let cli = Cli::try_parse_from(["h3a", "-y", "-c", config.to_str().unwrap()]).unwrap();
    assert!(run(&cli, LogSink::in_memory()).await.is_err());
}
