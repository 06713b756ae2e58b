//! The rule contract.
//!
//! A rule declares the node kinds it listens to and is called once for every
//! node of those kinds during a single pre-order traversal. Rules are built
//! once per configuration and shared read-only across files, so all
//! per-file state lives in the [`RuleContext`].

use brightlint_ast::{NodeId, NodeKind, Span, SyntaxTree};

use crate::{Diagnostic, Fix, Severity};

/// Static description of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMeta {
    pub name: &'static str,
    pub description: &'static str,
    /// Whether the rule can emit fixes.
    pub fixable: bool,
}

pub trait Rule: Send + Sync {
    fn meta(&self) -> &'static RuleMeta;

    /// Node kinds this rule wants to be called for.
    fn node_kinds(&self) -> Vec<NodeKind>;

    /// Checks one node and reports through `ctx`.
    fn check(&self, node: NodeId, ctx: &mut RuleContext<'_, '_>);
}

/// Per-visit view of the tree plus the report sink.
pub struct RuleContext<'r, 'a> {
    tree: &'r SyntaxTree<'a>,
    rule_id: &'static str,
    severity: Severity,
    diagnostics: &'r mut Vec<Diagnostic>,
}

impl<'r, 'a> RuleContext<'r, 'a> {
    pub fn new(
        tree: &'r SyntaxTree<'a>,
        rule_id: &'static str,
        severity: Severity,
        diagnostics: &'r mut Vec<Diagnostic>,
    ) -> Self {
        Self {
            tree,
            rule_id,
            severity,
            diagnostics,
        }
    }

    /// The tree being checked. The returned reference outlives the context
    /// borrow, so tokens can be held across calls to [`RuleContext::report`].
    pub fn tree(&self) -> &'r SyntaxTree<'a> {
        self.tree
    }

    pub fn rule_id(&self) -> &'static str {
        self.rule_id
    }

    /// Records a diagnostic at `span` with an optional fix.
    pub fn report(&mut self, span: Span, message: impl Into<String>, fix: Option<Fix>) {
        let mut diagnostic = Diagnostic::new(self.rule_id, message, span)
            .with_severity(self.severity)
            .with_location(self.tree.location(span));
        if let Some(fix) = fix {
            diagnostic = diagnostic.with_fix(fix);
        }
        self.diagnostics.push(diagnostic);
    }
}
