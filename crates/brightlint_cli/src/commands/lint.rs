//! Lint command implementation

use std::path::Path;

use brightlint_core::{Linter, LinterConfig};
use miette::{IntoDiagnostic, Result};
use tracing::info;

use crate::cli::{Cli, OutputFormat};
use crate::fix::{apply_fixes, output_fix_summary};
use crate::output::output_results;

pub fn run_lint(
    cli: &Cli,
    patterns: &[String],
    format: OutputFormat,
    fix: bool,
    dry_run: bool,
    timings: bool,
) -> Result<bool> {
    let mut config = load_config(cli.config.as_deref())?;
    if timings {
        config.timings = true;
    }
    let timings_enabled = config.timings;

    let linter = Linter::new(config).into_diagnostic()?;
    let files = linter.discover_files(patterns).into_diagnostic()?;

    if fix {
        let fix_summary = apply_fixes(&linter, &files, dry_run);
        output_fix_summary(&fix_summary, dry_run, format);
    }

    // after fixing, this reports what is left
    let (results, failures) = linter.lint_files(&files).into_diagnostic()?;

    if !failures.is_empty() {
        eprintln!("\n{} file(s) failed to lint:", failures.len());
        for (path, error) in &failures {
            eprintln!("  {}: {}", path.display(), error);
        }
    }

    let has_errors = output_results(&results, format, timings_enabled)?;

    Ok(has_errors || !failures.is_empty())
}

/// Loads the configuration given on the command line, or the nearest one
/// above the working directory, or the recommended preset.
pub fn load_config(path: Option<&Path>) -> Result<LinterConfig> {
    if let Some(path) = path {
        return LinterConfig::from_file(path).into_diagnostic();
    }

    let cwd = std::env::current_dir().into_diagnostic()?;
    if let Some(path) = LinterConfig::discover(&cwd) {
        info!("Using config: {}", path.display());
        return LinterConfig::from_file(&path).into_diagnostic();
    }

    info!("No config file found, using the recommended rules");
    Ok(LinterConfig::recommended())
}
