//! Fix application logic

use std::path::PathBuf;

use brightlint_core::Linter;
use tracing::error;

use crate::cli::OutputFormat;

/// Summary of applied fixes.
pub struct FixSummary {
    pub total_fixes: usize,
    pub files_fixed: usize,
    pub fixes_by_file: Vec<(PathBuf, usize)>,
    pub errors: Vec<(PathBuf, String)>,
}

/// Runs the fix loop over every file. With `dry_run` nothing is written.
pub fn apply_fixes(linter: &Linter, files: &[PathBuf], dry_run: bool) -> FixSummary {
    let mut total_fixes = 0;
    let mut files_fixed = 0;
    let mut fixes_by_file = Vec::new();
    let mut errors = Vec::new();

    for path in files {
        match linter.fix_file(path, dry_run) {
            Ok(outcome) => {
                if outcome.is_modified() {
                    fixes_by_file.push((path.clone(), outcome.fixes_applied));
                    total_fixes += outcome.fixes_applied;
                    files_fixed += 1;
                }
            }
            Err(e) => {
                error!("Failed to fix {}: {}", path.display(), e);
                errors.push((path.clone(), e.to_string()));
            }
        }
    }

    FixSummary {
        total_fixes,
        files_fixed,
        fixes_by_file,
        errors,
    }
}

/// Outputs the fix summary. JSON output keeps stdout for the results.
pub fn output_fix_summary(summary: &FixSummary, dry_run: bool, format: OutputFormat) {
    if format == OutputFormat::Json {
        for (path, count) in &summary.fixes_by_file {
            eprintln!("{}: {} fixes", path.display(), count);
        }
        return;
    }

    if summary.total_fixes == 0 && summary.errors.is_empty() {
        println!("No fixable issues found.");
        return;
    }

    if summary.total_fixes > 0 {
        let action = if dry_run { "Would fix" } else { "Fixed" };

        println!(
            "\n{} {} issues in {} files:",
            action, summary.total_fixes, summary.files_fixed
        );
        print_fix_list(&summary.fixes_by_file);

        if dry_run {
            println!("\nRun without --dry-run to apply fixes.");
        }
    }

    if !summary.errors.is_empty() {
        eprintln!("\nFailed to fix {} file(s):", summary.errors.len());
        for (path, err) in &summary.errors {
            eprintln!("  {}: {}", path.display(), err);
        }
    }
}

fn print_fix_list(fixes_by_file: &[(PathBuf, usize)]) {
    for (path, count) in fixes_by_file {
        println!("  {}: {} fixes", path.display(), count);
    }
}
