//! Command line argument definitions.

use crate::models::config::DEFAULT_CONFIG_FILE;
use clap::Parser;
use std::path::PathBuf;

/// A simple script for file archiving.
#[derive(Parser, Debug)]
#[command(name = "h3a")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long = "config", value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub skip_confirm: bool,

    /// Number of threads to use
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: Option<u16>,

    /// Print plan and exit
    #[arg(short, long)]
    pub dry_run: bool,

    /// Also write the generated plan as JSON to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,

    /// Describe the config file keys and exit
    #[arg(long)]
    pub help_config: bool,
}
