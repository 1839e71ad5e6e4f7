//! Archive command implementation.
//!
//! Loads the config, builds the plan, prints it and, after confirmation,
//! executes it.

use crate::cli::args::Cli;
use crate::core::context::Context;
use crate::core::executor;
use crate::core::planner;
use crate::logging::LogSink;
use crate::models::config::load_config;
use crate::models::plan::{save_plan, Plan};
use crate::Result;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Run the archiver as configured by `cli`, returning the generated plan.
pub async fn run(cli: &Cli, log_sink: LogSink) -> Result<Plan> {
    let config_path = resolve_config_path(&cli.config)?;
    tracing::debug!("Config file path: {:?}", config_path);

    let mut config = load_config(&config_path)?;
    if let Some(threads) = cli.threads {
        config.threads = usize::from(threads);
    }

    let context = Context::new(cli.verbose, config.threads, log_sink);
    let root_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let plan = planner::build_plan(&config, root_dir, &context)?;
    print_plan(&plan);

    if let Some(output) = &cli.output {
        save_plan(&plan, output)?;
    }

    if cli.dry_run || plan.is_empty() {
        return Ok(plan);
    }

    if !cli.skip_confirm {
        let stdin = io::stdin();
        if !confirm("Continue?", &mut stdin.lock(), &mut io::stdout())? {
            return Err(crate::Error::Aborted);
        }
    }

    executor::execute_plan(&plan, &context).await?;
    Ok(plan)
}

fn resolve_config_path(path: &Path) -> Result<std::path::PathBuf> {
    if !path.is_file() {
        return Err(crate::Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }
    Ok(std::fs::canonicalize(path)?)
}

fn print_plan(plan: &Plan) {
    println!("{}", "Generated plan:".bold());
    if plan.is_empty() {
        println!("  {}", "Nothing to archive.".dimmed());
    }
    for item in plan {
        println!("- {}", item);
    }
}

/// Ask a yes/no question. Anything but `y` or `yes` counts as no.
pub fn confirm<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "{} [y/N]: ", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
