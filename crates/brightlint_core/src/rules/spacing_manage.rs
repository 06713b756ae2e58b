//! Whitespace around operators and keywords.
//!
//! Options map a token spelling to the required spacing on each side:
//!
//! ```json
//! ["=", {"before": true, "after": true}, "if", {"after": true}]
//! ```
//!
//! `true` requires at least one character of whitespace between the token
//! and its neighbour, `false` requires the two to touch. A missing side is
//! not checked.
//!
//! Each spelling is attached to the node kinds that can contain it when the
//! rule is built, so a visit only runs the checks relevant to that kind.
//! Removing whitespace is refused when it would merge the neighbours into a
//! different token (`typeof x`, `a - -b`); such violations are reported
//! without a fix.

use std::collections::HashMap;

use brightlint_ast::{NodeData, NodeId, NodeKind, Span, SyntaxTree, Token};
use serde::Deserialize;
use serde_json::Value;

use super::adjacency::{adjacent, can_join, gap};
use crate::Fix;
use crate::policy::{PolicyTable, pair_directives};
use crate::rule::{Rule, RuleContext, RuleMeta};

pub(crate) static META: RuleMeta = RuleMeta {
    name: "spacing-manage",
    description: "Customizes needed spaces for keywords, nodes and operators",
    fixable: true,
};

const BINARY_OPERATORS: &[&str] = &[
    "==", "!=", "===", "!==", "<", "<=", ">", ">=", "<<", ">>", ">>>", "+", "-", "*", "/", "%",
    "**", "^", "&", "|", "in", "instanceof", "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=",
    ">>=", ">>>=", "|=", "^=", "&=", "&&=", "||=", "??=", "||", "&&", "??",
];

const UNARY_OPERATORS: &[&str] = &["-", "+", "!", "~", "typeof", "void", "delete"];

const UPDATE_OPERATORS: &[&str] = &["++", "--"];

/// Whether whitespace is required before and after a token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SpacingEffect {
    pub before: Option<bool>,
    pub after: Option<bool>,
}

impl SpacingEffect {
    fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }
}

/// How occurrences of a spelling are found in a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Locate {
    /// The node's first token, or the token after a leading `async`.
    Leading,
    /// The last matching token of the node.
    Trailing,
    /// Every matching token of the node.
    Inside,
    /// Every matching token, if the node's operator is the spelling.
    Operator,
    /// The first token, if the node's operator is the spelling.
    LeadingOperator,
    /// The `?` or `:` between the operands of a conditional expression.
    Conditional,
}

#[derive(Debug, Clone)]
struct Check {
    spelling: String,
    effect: SpacingEffect,
    locate: Locate,
}

pub struct SpacingManage {
    listeners: HashMap<NodeKind, Vec<Check>>,
}

impl SpacingManage {
    pub fn new(policies: PolicyTable<SpacingEffect>) -> Self {
        let mut entries: Vec<_> = policies
            .iter()
            .filter(|(_, effect)| !effect.is_empty())
            .collect();
        entries.sort_by_key(|(spelling, _)| *spelling);

        let mut listeners: HashMap<NodeKind, Vec<Check>> = HashMap::new();
        for (spelling, effect) in entries {
            for (kind, locate) in targets(spelling) {
                listeners.entry(kind).or_default().push(Check {
                    spelling: spelling.to_string(),
                    effect: *effect,
                    locate,
                });
            }
        }

        Self { listeners }
    }

    pub fn from_options(options: &[Value]) -> Self {
        let policies = pair_directives::<SpacingEffect>(META.name, options)
            .into_iter()
            .collect();
        Self::new(policies)
    }

    fn run_check<'a>(&self, ctx: &mut RuleContext<'_, 'a>, node: NodeId, check: &Check) {
        let tree = ctx.tree();
        let spelling = check.spelling.as_str();

        let occurrences: Vec<&Token<'a>> = match check.locate {
            Locate::Leading => leading_token(tree, node, spelling).into_iter().collect(),
            Locate::Trailing => tree
                .last_token_matching(node, |t| t.is(spelling))
                .into_iter()
                .collect(),
            Locate::Inside => tokens_inside(tree, node, spelling),
            Locate::Operator if has_operator(tree, node, spelling) => {
                tokens_inside(tree, node, spelling)
            }
            Locate::LeadingOperator if has_operator(tree, node, spelling) => tree
                .first_token(node)
                .filter(|t| t.is(spelling))
                .into_iter()
                .collect(),
            Locate::Conditional => conditional_token(tree, node, spelling)
                .into_iter()
                .collect(),
            Locate::Operator | Locate::LeadingOperator => Vec::new(),
        };

        for token in occurrences {
            if let Some(space) = check.effect.before {
                if let Some(left) = tree.token_before(token) {
                    check_pair(ctx, left, token, space);
                }
            }
            if let Some(space) = check.effect.after {
                if let Some(right) = tree.token_after(token) {
                    check_pair(ctx, token, right, space);
                }
            }
        }
    }
}

/// Node kinds and lookup modes for a configured spelling.
fn targets(spelling: &str) -> Vec<(NodeKind, Locate)> {
    use NodeKind::*;

    let mut targets = match spelling {
        "catch" => vec![(CatchClause, Locate::Leading)],
        "async" => vec![
            (ArrowFunctionExpression, Locate::Leading),
            (FunctionExpression, Locate::Leading),
            (FunctionDeclaration, Locate::Leading),
        ],
        "switch" => vec![(SwitchStatement, Locate::Leading)],
        "case" => vec![(SwitchCase, Locate::Leading)],
        "function" => vec![(FunctionDeclaration, Locate::Leading)],
        "while" => vec![
            (WhileStatement, Locate::Leading),
            (DoWhileStatement, Locate::Trailing),
        ],
        "do" => vec![(DoWhileStatement, Locate::Leading)],
        "try" | "finally" => vec![(TryStatement, Locate::Inside)],
        "if" | "else" => vec![(IfStatement, Locate::Inside)],
        "for" | "in" | "of" => vec![
            (ForStatement, Locate::Inside),
            (ForInStatement, Locate::Inside),
            (ForOfStatement, Locate::Inside),
        ],
        "=" => vec![(VariableDeclarator, Locate::Inside)],
        "," => vec![(SequenceExpression, Locate::Inside)],
        "?" | ":" => vec![(ConditionalExpression, Locate::Conditional)],
        _ => Vec::new(),
    };

    if BINARY_OPERATORS.contains(&spelling) {
        targets.extend([
            (BinaryExpression, Locate::Operator),
            (LogicalExpression, Locate::Operator),
            (AssignmentExpression, Locate::Operator),
        ]);
    }
    if UNARY_OPERATORS.contains(&spelling) {
        targets.push((UnaryExpression, Locate::LeadingOperator));
    }
    if UPDATE_OPERATORS.contains(&spelling) {
        targets.push((UpdateExpression, Locate::Operator));
    }

    targets
}

fn has_operator(tree: &SyntaxTree<'_>, node: NodeId, spelling: &str) -> bool {
    matches!(tree.data(node), NodeData::Operator(operator) if operator == spelling)
}

fn leading_token<'t, 'a>(tree: &'t SyntaxTree<'a>, node: NodeId, spelling: &str) -> Option<&'t Token<'a>> {
    let first = tree.first_token(node)?;
    if first.is(spelling) {
        return Some(first);
    }
    if first.is("async") {
        return tree.token_after(first).filter(|t| t.is(spelling));
    }
    None
}

/// Matching tokens strictly inside the node plus its first and last token.
fn tokens_inside<'t, 'a>(tree: &'t SyntaxTree<'a>, node: NodeId, spelling: &str) -> Vec<&'t Token<'a>> {
    let (Some(first), Some(last)) = (tree.first_token(node), tree.last_token(node)) else {
        return Vec::new();
    };

    let mut tokens = tree.tokens_between(first, last, |t| t.is(spelling));
    if first.is(spelling) {
        tokens.push(first);
    }
    if first.index != last.index && last.is(spelling) {
        tokens.push(last);
    }
    tokens
}

fn conditional_token<'t, 'a>(tree: &'t SyntaxTree<'a>, node: NodeId, spelling: &str) -> Option<&'t Token<'a>> {
    let (left, right) = match spelling {
        "?" => ("test", "consequent"),
        _ => ("consequent", "alternate"),
    };
    let left = tree.last_token(tree.child_by_field(node, left)?)?;
    let right = tree.first_token(tree.child_by_field(node, right)?)?;
    tree.tokens_between(left, right, |t| t.is(spelling))
        .into_iter()
        .next()
}

/// Reports when the spacing between two neighbouring tokens is wrong.
fn check_pair<'a>(ctx: &mut RuleContext<'_, 'a>, left: &Token<'a>, right: &Token<'a>, space_required: bool) {
    let touching = adjacent(left, right);
    if space_required != touching {
        return;
    }

    let span = Span::new(left.span.start, right.span.end);
    if space_required {
        let message = format!("Need space between '{}' and '{}'", left.text, right.text);
        ctx.report(span, message, Some(Fix::insert(left.span.end, " ")));
    } else {
        let message = format!("Do not need space between '{}' and '{}'", left.text, right.text);
        let fix = can_join(left, right).then(|| Fix::delete(gap(left, right)));
        ctx.report(span, message, fix);
    }
}

impl Rule for SpacingManage {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn node_kinds(&self) -> Vec<NodeKind> {
        self.listeners.keys().copied().collect()
    }

    fn check(&self, node: NodeId, ctx: &mut RuleContext<'_, '_>) {
        let Some(checks) = self.listeners.get(&ctx.tree().kind(node)) else {
            return;
        };
        for check in checks {
            self.run_check(ctx, node, check);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{lint, lint_and_fix, lint_raw};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn rule(options: Value) -> SpacingManage {
        SpacingManage::from_options(options.as_array().unwrap())
    }

    #[rstest]
    #[case("const a=1; const b=4;", json!(["=", {"before": false, "after": false}]))]
    #[case("const a =1; const b =4;", json!(["=", {"before": true, "after": false}]))]
    #[case("const a = 1; const b = 4;", json!(["=", {"before": true, "after": true}]))]
    #[case("const a = 1;", json!(["=", {}]))]
    #[case("const a=1;", json!(["="]))]
    fn test_valid(#[case] source: &str, #[case] options: Value) {
        assert!(lint_raw(&rule(options), source).is_empty());
    }

    #[rstest]
    #[case("const a=1; const b=4;", json!(["=", {"before": true, "after": true}]), 4, "const a = 1; const b = 4;")]
    #[case("const a=1; const b=4;", json!(["=", {"after": true}]), 2, "const a= 1; const b= 4;")]
    #[case("const a=1; const b=4;", json!(["=", {"before": true}]), 2, "const a =1; const b =4;")]
    #[case("const a = 1; const b = 4;", json!(["=", {"after": false, "before": false}]), 4, "const a=1; const b=4;")]
    #[case("const a = 1; const b = 4;", json!(["=", {"before": false}]), 2, "const a= 1; const b= 4;")]
    #[case("const a = 1; const b = 4;", json!(["=", {"after": false}]), 2, "const a =1; const b =4;")]
    #[case(
        "if (true && false && 1 != 2) {}",
        json!(["&&", {"before": false, "after": false}]),
        6,
        "if (true&&false&&1 != 2) {}"
    )]
    #[case(
        "if ('1' < 2 || '1' > 2 && 5 == 4 || 5 === 5 && 5 !== 8 || 6 != {}) {}",
        json!([
            "<", {"before": false, "after": false},
            ">", {"before": false, "after": false},
            "||", {"before": false, "after": false},
            "&&", {"before": false, "after": false},
            "==", {"before": false, "after": false},
            "===", {"before": false, "after": false},
            "!==", {"before": false, "after": false},
            "!=", {"before": false, "after": false}
        ]),
        28,
        "if ('1'<2||'1'>2&&5==4||5===5&&5!==8||6!={}) {}"
    )]
    #[case(
        "try{}catch{}finally{}",
        json!([
            "try", {"before": true, "after": true},
            "catch", {"before": true, "after": true},
            "finally", {"before": true, "after": true}
        ]),
        5,
        "try {} catch {} finally {}"
    )]
    #[case(
        "const t=typeof(12);delete(t.log);try{}catch{}finally{}; void[];",
        json!([
            "typeof", {"before": true, "after": true},
            "delete", {"before": true, "after": true},
            "try", {"before": true, "after": true},
            "catch", {"before": true, "after": true},
            "finally", {"before": true, "after": true},
            "void", {"before": true, "after": true}
        ]),
        11,
        "const t= typeof (12); delete (t.log); try {} catch {} finally {}; void [];"
    )]
    #[case(
        "const a=2;if(a===2){}else if(false){}",
        json!(["if", {"before": true, "after": true}, "else", {"before": true, "after": true}]),
        5,
        "const a=2; if (a===2){} else if (false){}"
    )]
    #[case(
        "async function a(){}; const b =async()=>{};",
        json!(["async", {"before": true, "after": true}]),
        2,
        "async function a(){}; const b = async ()=>{};"
    )]
    #[case(
        "switch('123'){case '123':}",
        json!(["switch", {"before": true, "after": true}, "case", {"before": true, "after": true}]),
        2,
        "switch ('123'){ case '123':}"
    )]
    #[case(
        "for(let a in(array)){};for(let a of(array)){}",
        json!([
            "for", {"before": true, "after": true},
            "in", {"before": true, "after": true},
            "of", {"before": true, "after": true}
        ]),
        5,
        "for (let a in (array)){}; for (let a of (array)){}"
    )]
    #[case(
        "do{}while(a)",
        json!(["do", {"after": true}, "while", {"before": true, "after": true}]),
        3,
        "do {} while (a)"
    )]
    #[case("while(a){}", json!(["while", {"after": true}]), 1, "while (a){}")]
    #[case("x=a?b:c;", json!(["?", {"before": true, "after": true}, ":", {"before": true, "after": true}]), 4, "x=a ? b : c;")]
    #[case("a,b;", json!([",", {"after": true}]), 1, "a, b;")]
    #[case("!a;", json!(["!", {"after": true}]), 1, "! a;")]
    #[case("i ++;", json!(["++", {"before": false}]), 1, "i++;")]
    #[case("x += 1;", json!(["+=", {"before": false, "after": false}]), 2, "x+=1;")]
    #[case("`a` in x;", json!(["in", {"before": false}]), 1, "`a`in x;")]
    #[case("'a' in x;", json!(["in", {"before": false}]), 1, "'a'in x;")]
    fn test_invalid(
        #[case] source: &str,
        #[case] options: Value,
        #[case] errors: usize,
        #[case] output: &str,
    ) {
        let rule = rule(options);
        assert_eq!(lint_raw(&rule, source).len(), errors);

        let (_, fixed) = lint_and_fix(&rule, source);
        assert_eq!(fixed, output);
        assert!(lint(&rule, &fixed).is_empty());
    }

    #[test]
    fn test_messages_name_both_tokens() {
        let diagnostics = lint(&rule(json!(["=", {"before": true, "after": false}])), "a= 1;");
        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();

        assert_eq!(
            messages,
            vec![
                "Need space between 'a' and '='",
                "Do not need space between '=' and '1'",
            ]
        );
        assert_eq!(diagnostics[0].span, Span::new(0, 2));
        assert_eq!(diagnostics[1].span, Span::new(1, 4));
    }

    #[rstest]
    #[case::keyword_then_identifier("typeof x;", json!(["typeof", {"after": false}]))]
    #[case::function_name("function f() {}", json!(["function", {"after": false}]))]
    #[case::unary_minus("a - -b;", json!(["-", {"after": false}]))]
    #[case::relational_keyword("a in b;", json!(["in", {"before": false}]))]
    #[case::regex_then_keyword("const r = /a/ in x;", json!(["in", {"before": false}]))]
    #[case::regex_then_instanceof("/a/ instanceof R;", json!(["instanceof", {"before": false}]))]
    fn test_unsafe_removal_has_no_fix(#[case] source: &str, #[case] options: Value) {
        let rule = rule(options);
        let diagnostics = lint(&rule, source);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].fix.is_none());
        let (_, fixed) = lint_and_fix(&rule, source);
        assert_eq!(fixed, source);
    }

    #[test]
    fn test_comments_count_as_space() {
        let rule = rule(json!(["=", {"before": false}]));
        let (diagnostics, fixed) = lint_and_fix(&rule, "a /* c */= 1;");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(fixed, "a= 1;");
    }

    #[test]
    fn test_async_function_declaration_keyword() {
        let source = "async function f() {}";
        assert!(lint_raw(&rule(json!(["function", {"before": true}])), source).is_empty());

        let diagnostics = lint(&rule(json!(["function", {"before": false}])), source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].span, Span::new(0, 14));
        assert!(diagnostics[0].fix.is_none());
    }

    #[test]
    fn test_operator_must_match_node() {
        // `-` is configured, but the only binary node uses `+`
        let rule = rule(json!(["-", {"before": true}]));
        assert!(lint_raw(&rule, "a+b;").is_empty());
    }

    #[test]
    fn test_nested_do_while_uses_own_keyword() {
        let rule = rule(json!(["while", {"before": true}]));
        let diagnostics = lint(&rule, "do { while (a) {} }while (b)");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].span, Span::new(18, 24));
    }

    #[test]
    fn test_listens_only_to_relevant_kinds() {
        let rule = rule(json!(["catch", {"after": true}, "dangling"]));
        assert_eq!(rule.node_kinds(), vec![NodeKind::CatchClause]);
    }
}
