//! Brace placement.
//!
//! Checks whether the opening and closing braces of brace-bearing nodes
//! (class bodies, blocks, object literals and `export { ... }` lists) sit on
//! a new line or on the same line as the preceding token.
//!
//! Options map node kinds to `{start, end}` placements:
//!
//! ```json
//! ["IfStatement", {"start": "same-line-required", "end": "new-line-required"},
//!  "FinalStatement", {"start": "new-line-required"}]
//! ```
//!
//! Blocks have no configuration of their own in most styles, so a block
//! without a `BlockStatement` directive borrows the directive of the
//! statement that owns it. Blocks directly under a `try` use the
//! `TryStatement` directive, except the `finally` block, which is configured
//! through the `FinalStatement` selector only.

use brightlint_ast::{NodeId, NodeKind, Span, SyntaxTree, Token};
use serde::Deserialize;
use serde_json::Value;

use crate::Fix;
use crate::policy::{PolicyTable, pair_directives};
use crate::rule::{Rule, RuleContext, RuleMeta};

/// Selector for the `finally` block of a `try` statement.
pub const FINALLY_SELECTOR: &str = "FinalStatement";

pub(crate) static META: RuleMeta = RuleMeta {
    name: "curly-brace-manage",
    description: "Managing brackets style for different nodes",
    fixable: true,
};

/// Required line relationship between a brace and the token before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Placement {
    #[serde(rename = "new-line-required", alias = "new")]
    NewLine,
    #[serde(rename = "same-line-required", alias = "same")]
    SameLine,
    /// Same line after a one-line header, new line after a multi-line one.
    #[serde(
        rename = "new-line-if-header-multiline",
        alias = "new_for_long_declaration"
    )]
    NewLineIfHeaderMultiline,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct BraceEffect {
    pub start: Option<Placement>,
    pub end: Option<Placement>,
}

impl BraceEffect {
    fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

pub struct CurlyBraceManage {
    policies: PolicyTable<BraceEffect>,
}

impl CurlyBraceManage {
    pub fn new(policies: PolicyTable<BraceEffect>) -> Self {
        Self { policies }
    }

    pub fn from_options(options: &[Value]) -> Self {
        let policies = pair_directives::<BraceEffect>(META.name, options)
            .into_iter()
            .filter(|directive| !directive.effect.is_empty())
            .collect();
        Self::new(policies)
    }

    /// Finds the directive for a brace-bearing node and the node it is
    /// reported against.
    fn resolve(&self, tree: &SyntaxTree<'_>, node: NodeId) -> Option<(NodeId, &BraceEffect)> {
        let kind = tree.kind(node);
        let parent = tree.parent(node);

        if kind == NodeKind::BlockStatement {
            if parent.is_some_and(|p| tree.kind(p) == NodeKind::TryStatement) {
                let selector = if tree.field(node) == Some("finalizer") {
                    FINALLY_SELECTOR
                } else {
                    NodeKind::TryStatement.as_str()
                };
                return self.policies.lookup(selector).map(|effect| (node, effect));
            }

            if let Some(effect) = self.policies.lookup(kind.as_str()) {
                return Some((node, effect));
            }
            return parent.and_then(|parent| self.resolve(tree, parent));
        }

        if let Some(effect) = self.policies.lookup(kind.as_str()) {
            return Some((node, effect));
        }

        // catch bodies share the try statement's policy
        if kind == NodeKind::CatchClause
            && parent.is_some_and(|p| tree.kind(p) == NodeKind::TryStatement)
        {
            return self
                .policies
                .lookup(NodeKind::TryStatement.as_str())
                .map(|effect| (node, effect));
        }

        None
    }

    fn check_brace<'a>(
        &self,
        ctx: &mut RuleContext<'_, 'a>,
        subject: NodeId,
        brace: &Token<'a>,
        placement: Placement,
    ) {
        let tree = ctx.tree();
        let Some(before) = tree.token_before(brace) else {
            return;
        };
        let same_line = before.same_line_as(brace);

        let wants_new_line = match placement {
            Placement::NewLine => true,
            Placement::SameLine => false,
            Placement::NewLineIfHeaderMultiline => {
                let Some(first) = tree.first_token(subject) else {
                    return;
                };
                first.loc.start.line != before.loc.end.line
            }
            Placement::Unrecognized => return,
        };

        if wants_new_line != same_line {
            return;
        }

        let kind = tree.kind(subject);
        let (message, fix) = if wants_new_line {
            // A line break after these keywords ends the statement.
            let fix = (!matches!(before.text, "return" | "throw" | "yield"))
                .then(|| Fix::insert(brace.span.start, "\n"));
            (format!("{kind} requires a new line for brace"), fix)
        } else {
            (
                format!("{kind} does not need a new line for brace"),
                Some(Fix::new(Span::new(before.span.end, brace.span.start), " ")),
            )
        };
        ctx.report(brace.span, message, fix);
    }
}

impl Rule for CurlyBraceManage {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn node_kinds(&self) -> Vec<NodeKind> {
        if self.policies.is_empty() {
            return Vec::new();
        }
        NodeKind::ALL
            .iter()
            .copied()
            .filter(NodeKind::is_brace_bearing)
            .collect()
    }

    fn check(&self, node: NodeId, ctx: &mut RuleContext<'_, '_>) {
        let tree = ctx.tree();

        // `export const x = {}` owns no braces of its own
        if tree.kind(node) == NodeKind::ExportNamedDeclaration {
            let opens_list = tree
                .first_token(node)
                .and_then(|first| tree.token_after(first))
                .is_some_and(|next| next.is("{"));
            if !opens_list {
                return;
            }
        }

        let Some((subject, effect)) = self.resolve(tree, node) else {
            return;
        };

        if let Some(placement) = effect.start {
            if let Some(open) = tree.first_token_matching(node, |t| t.is_brace()) {
                self.check_brace(ctx, subject, open, placement);
            }
        }

        // the header rule has no meaning for closing braces
        if let Some(placement) = effect.end.filter(|p| *p != Placement::NewLineIfHeaderMultiline) {
            if let Some(close) = tree.last_token_matching(node, |t| t.is_brace()) {
                self.check_brace(ctx, subject, close, placement);
            }
        }
    }
}
