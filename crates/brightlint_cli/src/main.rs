//! brightlint CLI
//!
//! Configurable style checker for JavaScript sources.

mod cli;
mod commands;
mod fix;
mod output;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{run_init, run_lint, run_rules};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

/// Runs the selected command. `Ok(true)` means lint errors remain.
fn run(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Commands::Lint {
            patterns,
            format,
            fix,
            dry_run,
            timings,
        } => run_lint(cli, patterns, *format, *fix, *dry_run, *timings),
        Commands::Init { force } => run_init(cli.config.as_deref(), *force).map(|_| false),
        Commands::Rules => run_rules(cli).map(|_| false),
    }
}
