use brightlint_ast::{NodeId, NodeKind};

use crate::Fix;
use crate::rule::{Rule, RuleContext, RuleMeta};

pub(crate) static META: RuleMeta = RuleMeta {
    name: "no-undefined-return",
    description: "Do not return undefined",
    fixable: true,
};

/// Reports `return undefined;`, however deeply parenthesized.
#[derive(Debug, Default)]
pub struct NoUndefinedReturn;

impl Rule for NoUndefinedReturn {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn node_kinds(&self) -> Vec<NodeKind> {
        vec![NodeKind::ReturnStatement]
    }

    fn check(&self, node: NodeId, ctx: &mut RuleContext<'_, '_>) {
        let tree = ctx.tree();
        let returns_undefined = tree.children(node).first().is_some_and(|&argument| {
            tree.kind(argument) == NodeKind::Identifier && tree.text(argument) == "undefined"
        });

        if returns_undefined {
            let span = tree.span(node);
            ctx.report(
                span,
                r#"Do not return "undefined" statement"#,
                Some(Fix::new(span, "return;")),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{lint, lint_and_fix};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_parenthesized_returns() {
        let (diagnostics, output) = lint_and_fix(
            &NoUndefinedReturn,
            "function a(){return undefined; return (undefined); return ((((((undefined))))));}",
        );

        assert_eq!(diagnostics.len(), 3);
        assert_eq!(output, "function a(){return; return; return;}");
        assert_eq!(diagnostics[0].message, r#"Do not return "undefined" statement"#);
    }

    #[test]
    fn test_without_semicolon() {
        let (_, output) = lint_and_fix(&NoUndefinedReturn, "function a() {\n  return undefined\n}");
        assert_eq!(output, "function a() {\n  return;\n}");
    }

    #[rstest]
    #[case("function a() { return; }")]
    #[case("function a() { return null; }")]
    #[case("function a() { return undefined.x; }")]
    #[case("function a() { return void 0; }")]
    #[case("function a() { return undefinedValue; }")]
    fn test_valid(#[case] source: &str) {
        assert!(lint(&NoUndefinedReturn, source).is_empty());
    }
}
