//! Single file linting logic.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use brightlint_parser::Parser;
use tracing::{debug, warn};

use crate::Diagnostic;
use crate::error::LinterError;
use crate::fix::{FixCoordinator, FixResult};
use crate::fixer::{FixerResult, apply_fixes_to_content};
use crate::runner::RuleRunner;

pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Per-rule time spent on one file.
pub type RuleTimings = HashMap<String, Duration>;

/// Outcome of fixing one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// The source after every accepted pass.
    pub content: String,
    /// Fixes applied across all passes.
    pub fixes_applied: usize,
    /// How the fix loop ended.
    pub status: FixResult,
}

impl FixOutcome {
    pub fn is_modified(&self) -> bool {
        self.fixes_applied > 0
    }
}

/// Reads a source file, rejecting non-regular and oversized files.
pub fn read_source(path: &Path) -> Result<String, LinterError> {
    let metadata = fs::metadata(path).map_err(|e| {
        LinterError::file(format!(
            "Failed to read metadata for {}: {}",
            path.display(),
            e
        ))
    })?;

    if !metadata.is_file() {
        return Err(LinterError::file(format!(
            "Not a regular file: {}",
            path.display()
        )));
    }

    if metadata.len() > MAX_FILE_SIZE {
        return Err(LinterError::file(format!(
            "File size exceeds limit of {} bytes: {}",
            MAX_FILE_SIZE,
            path.display()
        )));
    }

    fs::read_to_string(path)
        .map_err(|e| LinterError::file(format!("Failed to read {}: {}", path.display(), e)))
}

/// Sorts diagnostics by position and drops repeated reports of the same
/// rule, span and message.
///
/// Nested nodes of one kind (chained operators, `else if`) make a rule see
/// the same token pair more than once.
pub(crate) fn normalize_diagnostics(mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    diagnostics.sort_by(|a, b| {
        (a.span, &a.rule_id, &a.message).cmp(&(b.span, &b.rule_id, &b.message))
    });
    diagnostics.dedup_by(|a, b| {
        a.span == b.span && a.rule_id == b.rule_id && a.message == b.message
    });
    diagnostics
}

/// Parses `source` and runs every rule over it once.
pub fn lint_source(
    parser: &dyn Parser,
    runner: &RuleRunner,
    source: &str,
    timings_enabled: bool,
) -> Result<(Vec<Diagnostic>, Option<RuleTimings>), LinterError> {
    let tree = parser.parse(source)?;

    if timings_enabled {
        let (diagnostics, timings) = runner.run_timed(&tree);
        Ok((normalize_diagnostics(diagnostics), Some(timings)))
    } else {
        Ok((normalize_diagnostics(runner.run(&tree)), None))
    }
}

/// Applies the fixes of `diagnostics` one at a time, keeping each only if
/// the result still parses.
fn apply_parseable_fixes(
    parser: &dyn Parser,
    content: &str,
    diagnostics: &[Diagnostic],
) -> FixerResult {
    let mut accepted: Vec<Diagnostic> = Vec::new();
    let mut result = FixerResult::unchanged(content.to_string());

    for diagnostic in diagnostics.iter().filter(|d| d.fix.is_some()) {
        accepted.push(diagnostic.clone());
        let candidate = apply_fixes_to_content(content, &accepted);
        if candidate.fixes_applied > result.fixes_applied
            && parser.parse(&candidate.fixed_content).is_ok()
        {
            result = candidate;
        } else {
            debug!("Dropping fix for '{}' at {:?}", diagnostic.rule_id, diagnostic.span);
            accepted.pop();
        }
    }

    result
}

/// Lints and fixes `source` until stable.
///
/// Each pass applies the non-overlapping fixes of a fresh lint. When the
/// batch no longer parses, the fixes are retried one at a time and only
/// those that keep the source parseable are kept.
pub fn fix_source(
    parser: &dyn Parser,
    runner: &RuleRunner,
    source: &str,
) -> Result<FixOutcome, LinterError> {
    parser.parse(source)?;

    let mut content = source.to_string();
    let mut fixes_applied = 0;
    let status = FixCoordinator::new().apply_fixes_iterative(&mut content, |current| {
        let tree = match parser.parse(current) {
            Ok(tree) => tree,
            Err(e) => {
                warn!("Stopping fixes, content no longer parses: {}", e);
                return None;
            }
        };

        let diagnostics = normalize_diagnostics(runner.run(&tree));
        let mut result = apply_fixes_to_content(current, &diagnostics);
        if !result.modified {
            return None;
        }

        if let Err(e) = parser.parse(&result.fixed_content) {
            warn!("Batch of {} fixes breaks parsing, retrying one by one: {}", result.fixes_applied, e);
            result = apply_parseable_fixes(parser, current, &diagnostics);
            if !result.modified {
                return None;
            }
        }

        debug!("Applied {} fixes", result.fixes_applied);
        fixes_applied += result.fixes_applied;
        Some(result.fixed_content)
    });

    Ok(FixOutcome {
        content,
        fixes_applied,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{NoUndefinedReturn, SpacingManage};
    use crate::runner::ConfiguredRule;
    use crate::{Fix, Severity};
    use brightlint_ast::{NodeId, NodeKind, Span};
    use brightlint_parser::JavaScriptParser;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    use crate::rule::{Rule, RuleContext, RuleMeta};

    fn runner(rules: Vec<Box<dyn Rule>>) -> RuleRunner {
        RuleRunner::new(
            rules
                .into_iter()
                .map(|rule| ConfiguredRule::new(rule, Severity::Error))
                .collect(),
        )
    }

    static BREAKER: RuleMeta = RuleMeta {
        name: "breaker",
        description: "Emits a fix that breaks the program",
        fixable: true,
    };

    struct Breaker;

    impl Rule for Breaker {
        fn meta(&self) -> &'static RuleMeta {
            &BREAKER
        }

        fn node_kinds(&self) -> Vec<NodeKind> {
            vec![NodeKind::Program]
        }

        fn check(&self, node: NodeId, ctx: &mut RuleContext<'_, '_>) {
            let start = ctx.tree().span(node).start;
            ctx.report(Span::new(start, start), "broken", Some(Fix::insert(start, "{")));
        }
    }

    #[test]
    fn test_normalize_diagnostics_dedups_and_sorts() {
        let diagnostics = vec![
            Diagnostic::new("b", "m", Span::new(4, 5)),
            Diagnostic::new("a", "m", Span::new(0, 1)),
            Diagnostic::new("b", "m", Span::new(4, 5)),
            Diagnostic::new("a", "other", Span::new(0, 1)),
        ];

        let normalized = normalize_diagnostics(diagnostics);

        assert_eq!(
            normalized,
            vec![
                Diagnostic::new("a", "m", Span::new(0, 1)),
                Diagnostic::new("a", "other", Span::new(0, 1)),
                Diagnostic::new("b", "m", Span::new(4, 5)),
            ]
        );
    }

    #[test]
    fn test_lint_source_reports_and_times() {
        let runner = runner(vec![Box::new(NoUndefinedReturn)]);
        let (diagnostics, timings) = lint_source(
            &JavaScriptParser::new(),
            &runner,
            "function f() { return undefined; }",
            true,
        )
        .unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert!(timings.unwrap().contains_key("no-undefined-return"));
    }

    #[test]
    fn test_lint_source_rejects_invalid_syntax() {
        let runner = runner(vec![Box::new(NoUndefinedReturn)]);
        let result = lint_source(&JavaScriptParser::new(), &runner, "function (", false);

        assert!(matches!(result, Err(LinterError::Parse(_))));
    }

    #[test]
    fn test_fix_source_runs_until_stable() {
        let spacing = SpacingManage::from_options(&[json!("="), json!({"before": true, "after": true})]);
        let runner = runner(vec![Box::new(NoUndefinedReturn), Box::new(spacing)]);

        let outcome = fix_source(
            &JavaScriptParser::new(),
            &runner,
            "let a=1;\nfunction f() { return undefined; }",
        )
        .unwrap();

        assert_eq!(outcome.content, "let a = 1;\nfunction f() { return; }");
        assert_eq!(outcome.fixes_applied, 3);
        assert!(outcome.status.is_converged());
    }

    #[test]
    fn test_fix_source_discards_unparseable_output() {
        let runner = runner(vec![Box::new(Breaker)]);
        let outcome = fix_source(&JavaScriptParser::new(), &runner, "a();").unwrap();

        assert_eq!(outcome.content, "a();");
        assert!(!outcome.is_modified());
        assert_eq!(outcome.status, FixResult::Converged { iterations: 1 });
    }

    #[test]
    fn test_fix_source_keeps_parseable_fixes() {
        let breaker: Box<dyn Rule> = Box::new(Breaker);
        let spacing = SpacingManage::from_options(&[json!("="), json!({"before": true, "after": true})]);
        let runner = runner(vec![breaker, Box::new(spacing)]);

        let outcome = fix_source(&JavaScriptParser::new(), &runner, "let b=1;").unwrap();

        assert_eq!(outcome.content, "let b = 1;");
        assert_eq!(outcome.fixes_applied, 2);
        assert!(outcome.status.is_converged());
    }

    #[test]
    fn test_read_source_rejects_directory() {
        let temp_dir = tempdir().unwrap();
        let err = read_source(temp_dir.path()).unwrap_err();

        assert!(err.to_string().contains("Not a regular file"));
    }

    #[test]
    fn test_read_source_missing_file() {
        let temp_dir = tempdir().unwrap();
        let err = read_source(&temp_dir.path().join("missing.js")).unwrap_err();

        assert!(matches!(err, LinterError::File(_)));
    }
}
