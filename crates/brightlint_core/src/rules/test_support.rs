//! Helpers for running a single rule over a snippet in unit tests.

use std::ops::ControlFlow;

use brightlint_ast::visitor::{VisitResult, Visitor, walk_tree};
use brightlint_ast::{NodeId, NodeKind, SyntaxTree};
use brightlint_parser::{JavaScriptParser, Parser};

use crate::file_linter::normalize_diagnostics;
use crate::fix::FixCoordinator;
use crate::fixer::apply_fixes_to_content;
use crate::rule::{Rule, RuleContext};
use crate::{Diagnostic, Severity};

struct Collect<'r> {
    rule: &'r dyn Rule,
    kinds: Vec<NodeKind>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Visitor<'a> for Collect<'_> {
    fn enter_node(&mut self, tree: &SyntaxTree<'a>, id: NodeId) -> VisitResult {
        if self.kinds.contains(&tree.kind(id)) {
            let mut ctx = RuleContext::new(
                tree,
                self.rule.meta().name,
                Severity::Error,
                &mut self.diagnostics,
            );
            self.rule.check(id, &mut ctx);
        }
        ControlFlow::Continue(())
    }
}

/// Every diagnostic the rule reports, duplicates included, ordered by span.
pub(crate) fn lint_raw(rule: &dyn Rule, source: &str) -> Vec<Diagnostic> {
    let tree = JavaScriptParser::new()
        .parse(source)
        .unwrap_or_else(|e| panic!("failed to parse {source:?}: {e}"));
    let mut collect = Collect {
        rule,
        kinds: rule.node_kinds(),
        diagnostics: Vec::new(),
    };
    let _ = walk_tree(&mut collect, &tree);

    let mut diagnostics = collect.diagnostics;
    diagnostics.sort_by_key(|d| d.span);
    diagnostics
}

/// Diagnostics as the linter reports them: deduplicated and sorted.
pub(crate) fn lint(rule: &dyn Rule, source: &str) -> Vec<Diagnostic> {
    normalize_diagnostics(lint_raw(rule, source))
}

/// First-pass diagnostics and the source after fixing until stable.
pub(crate) fn lint_and_fix(rule: &dyn Rule, source: &str) -> (Vec<Diagnostic>, String) {
    let diagnostics = lint(rule, source);

    let mut output = source.to_string();
    FixCoordinator::new().apply_fixes_iterative(&mut output, |current| {
        let result = apply_fixes_to_content(current, &lint(rule, current));
        result.modified.then_some(result.fixed_content)
    });

    (diagnostics, output)
}
