//! h3a CLI
//!
//! A command-line tool for archiving files under timestamp-tagged names.

use clap::Parser;
use h3a::cli::{args::Cli, commands::run};
use h3a::logging::{self, LogSink};
use h3a::models::config::format_config_help;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    if cli.help_config {
        print!("{}", format_config_help());
        return Ok(());
    }

    // One sink per run, shared by the global subscriber and the run context
    let sink = LogSink::stderr();
    logging::init_logging(cli.verbose, sink.clone());

    run::run(&cli, sink).await?;

    Ok(())
}
