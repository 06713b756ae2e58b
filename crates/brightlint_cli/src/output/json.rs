//! JSON output formatter

use brightlint_core::LintResult;
use miette::{IntoDiagnostic, Result};

pub fn output_json(results: &[LintResult]) -> Result<()> {
    let output: Vec<_> = results
        .iter()
        .map(|r| {
            serde_json::json!({
                "path": r.path.display().to_string(),
                "diagnostics": r.diagnostics,
            })
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}
