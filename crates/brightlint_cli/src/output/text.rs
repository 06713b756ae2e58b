//! Text output formatter

use std::collections::HashMap;
use std::time::Duration;

use brightlint_core::{Diagnostic, LintResult, LintSummary};

pub fn output_text(results: &[LintResult], timings: bool) {
    for result in results {
        if result.diagnostics.is_empty() {
            continue;
        }

        println!("\n{}:", result.path.display());
        for diag in &result.diagnostics {
            println!(
                "  {} {} [{}]: {}",
                position(diag),
                diag.severity.as_str(),
                diag.rule_id,
                diag.message
            );
        }
    }

    let summary = LintSummary::from_results(results);

    println!();
    println!(
        "Checked {} files, found {} issues ({} errors, {} fixable)",
        summary.files_checked, summary.total_diagnostics, summary.errors, summary.fixable
    );

    if timings {
        output_timings(results);
    }
}

/// `line:column`, both 1-based, falling back to the byte offset.
fn position(diag: &Diagnostic) -> String {
    match &diag.loc {
        Some(loc) => format!("{}:{}", loc.start.line, loc.start.column + 1),
        None => format!("@{}", diag.span.start),
    }
}

fn output_timings(results: &[LintResult]) {
    let mut total_duration = Duration::new(0, 0);
    let mut rule_timings: HashMap<&str, Duration> = HashMap::new();

    for timings in results.iter().filter_map(|r| r.timings.as_ref()) {
        for (rule, duration) in timings {
            *rule_timings.entry(rule.as_str()).or_default() += *duration;
            total_duration += *duration;
        }
    }

    if !rule_timings.is_empty() {
        println!("\nPerformance Timings:");
        println!("{:<30} | {:<15} | {:<10}", "Rule", "Duration", "%");
        println!("{:-<30}-+-{:-<15}-+-{:-<10}", "", "", "");

        let mut sorted_timings: Vec<_> = rule_timings.into_iter().collect();
        sorted_timings.sort_by(|a, b| b.1.cmp(&a.1));

        for (rule, duration) in sorted_timings {
            let percentage = if total_duration.as_secs_f64() > 0.0 {
                (duration.as_secs_f64() / total_duration.as_secs_f64()) * 100.0
            } else {
                0.0
            };
            println!("{:<30} | {:<15?} | {:<10.1}%", rule, duration, percentage);
        }
        println!("{:-<30}-+-{:-<15}-+-{:-<10}", "", "", "");
        println!("{:<30} | {:<15?}", "Total", total_duration);
    }
}
