//! Lint result types.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::{Diagnostic, Severity};

/// Result of linting a single file.
#[derive(Debug)]
pub struct LintResult {
    /// Path to the linted file.
    pub path: PathBuf,

    /// Diagnostics found in the file.
    pub diagnostics: Vec<Diagnostic>,

    /// Time spent in each rule, when timing is enabled.
    pub timings: Option<HashMap<String, Duration>>,
}

impl LintResult {
    /// Creates a new lint result.
    pub fn new(path: PathBuf, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            path,
            diagnostics,
            timings: None,
        }
    }

    pub fn with_timings(mut self, timings: HashMap<String, Duration>) -> Self {
        self.timings = Some(timings);
        self
    }

    /// Returns true if any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns the number of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Returns the number of diagnostics carrying a fix.
    pub fn fixable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.fix.is_some()).count()
    }
}

/// Summary of linting multiple files.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LintSummary {
    /// Total files processed.
    pub files_checked: usize,

    /// Total diagnostics found.
    pub total_diagnostics: usize,

    /// Error-severity diagnostics.
    pub errors: usize,

    /// Diagnostics that carry a fix.
    pub fixable: usize,

    /// Files with at least one error.
    pub files_with_errors: usize,
}

impl LintSummary {
    /// Creates a summary from results.
    pub fn from_results(results: &[LintResult]) -> Self {
        let mut summary = Self::default();

        for result in results {
            summary.files_checked += 1;
            summary.total_diagnostics += result.diagnostics.len();
            summary.errors += result.error_count();
            summary.fixable += result.fixable_count();
            if result.has_errors() {
                summary.files_with_errors += 1;
            }
        }

        summary
    }
}
