//! Prefers `!x` / `x` over comparisons against `0`, `null` and `undefined`.

use brightlint_ast::{NodeData, NodeId, NodeKind, SyntaxTree};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::Fix;
use crate::rule::{Rule, RuleContext, RuleMeta};

pub(crate) static META: RuleMeta = RuleMeta {
    name: "prefer-simple-null-checks",
    description: "Checks for null, undefined and 0 by only one method",
    fixable: true,
};

const MESSAGE: &str = "Use '!' instead for null checks";

/// Which comparisons are reported. `strict*` fields cover `===`/`!==`, the
/// others `==`/`!=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NullCheckOptions {
    pub zero_eq: bool,
    pub strict_zero_eq: bool,
    pub null_eq: bool,
    pub strict_null_eq: bool,
    pub undef_eq: bool,
    pub strict_undef_eq: bool,
}

impl Default for NullCheckOptions {
    fn default() -> Self {
        Self {
            zero_eq: true,
            strict_zero_eq: true,
            null_eq: false,
            strict_null_eq: false,
            undef_eq: false,
            strict_undef_eq: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct PreferSimpleNullChecks {
    options: NullCheckOptions,
}

impl PreferSimpleNullChecks {
    pub fn new(options: NullCheckOptions) -> Self {
        Self { options }
    }

    pub fn from_options(options: &[Value]) -> Self {
        let options = match options.first() {
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|error| {
                warn!(rule = META.name, %error, "Ignoring malformed options");
                NullCheckOptions::default()
            }),
            None => NullCheckOptions::default(),
        };
        Self::new(options)
    }

    /// The operand to keep, if the comparison should be simplified.
    fn simplified_operand(
        &self,
        tree: &SyntaxTree<'_>,
        left: NodeId,
        right: NodeId,
        strict: bool,
    ) -> Option<NodeId> {
        let other = |node: NodeId| if node == left { right } else { left };
        let options = &self.options;
        let mut operand = None;

        let undefined = [left, right].into_iter().find(|&node| {
            tree.kind(node) == NodeKind::Identifier && tree.text(node) == "undefined"
        });
        if let Some(undefined) = undefined {
            if (strict && options.strict_undef_eq) || (!strict && options.undef_eq) {
                operand = Some(other(undefined));
            }
        }

        let literal = [left, right]
            .into_iter()
            .find(|&node| tree.kind(node) == NodeKind::Literal);
        if let Some(literal) = literal {
            let text = tree.text(literal);
            let zero = is_zero(text) && if strict { options.strict_zero_eq } else { options.zero_eq };
            let null = text == "null" && if strict { options.strict_null_eq } else { options.null_eq };
            if zero || null {
                operand = Some(other(literal));
            }
        }

        operand
    }
}

/// Returns true for numeric literals equal to zero. BigInt literals are
/// never equal to a number under `===`, so they are excluded.
fn is_zero(text: &str) -> bool {
    let text = text.replace('_', "");
    if text.ends_with('n') {
        return false;
    }

    let lower = text.to_ascii_lowercase();
    let radix = match lower.get(..2) {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    match radix {
        Some(radix) => u128::from_str_radix(&lower[2..], radix).is_ok_and(|value| value == 0),
        None => lower.parse::<f64>().is_ok_and(|value| value == 0.0),
    }
}

/// Operands that can take a `!` prefix or replace a comparison as-is.
fn is_simple(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Identifier
            | NodeKind::Literal
            | NodeKind::TemplateLiteral
            | NodeKind::ThisExpression
            | NodeKind::ArrayExpression
            | NodeKind::MemberExpression
            | NodeKind::CallExpression
            | NodeKind::NewExpression
    )
}

impl Rule for PreferSimpleNullChecks {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn node_kinds(&self) -> Vec<NodeKind> {
        vec![NodeKind::BinaryExpression]
    }

    fn check(&self, node: NodeId, ctx: &mut RuleContext<'_, '_>) {
        let tree = ctx.tree();
        let NodeData::Operator(operator) = tree.data(node) else {
            return;
        };
        if !matches!(operator, "==" | "===" | "!=" | "!==") {
            return;
        }
        let (Some(left), Some(right)) = (
            tree.child_by_field(node, "left"),
            tree.child_by_field(node, "right"),
        ) else {
            return;
        };

        let strict = operator.len() == 3;
        let Some(operand) = self.simplified_operand(tree, left, right, strict) else {
            return;
        };

        let text = tree.text(operand);
        let text = if is_simple(tree.kind(operand)) {
            text.to_string()
        } else {
            format!("({text})")
        };
        let replacement = if operator.starts_with('!') {
            text
        } else {
            format!("!{text}")
        };

        let span = tree.span(node);
        ctx.report(span, MESSAGE, Some(Fix::new(span, replacement)));
    }
}
