//! JavaScript parser built on `tree-sitter-javascript`.
//!
//! The concrete tree is converted in a single walk. Named grammar nodes map to
//! ESTree kinds, anonymous leaves become tokens, and grammar-only wrappers
//! such as `else_clause` or `parenthesized_expression` are flattened into
//! their parent so that their tokens belong to the ESTree node that owns them.

use brightlint_ast::{NodeData, NodeKind, Span, SyntaxTree, TokenKind, TreeBuilder};
use tree_sitter::Node;

use crate::{ParseError, Parser};

/// JavaScript and JSX parser.
pub struct JavaScriptParser;

impl JavaScriptParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JavaScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for JavaScriptParser {
    fn name(&self) -> &str {
        "javascript"
    }

    fn extensions(&self) -> &[&str] {
        &["js", "mjs", "cjs", "jsx"]
    }

    fn parse<'a>(&self, source: &'a str) -> Result<SyntaxTree<'a>, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|e| ParseError::internal(format!("failed to load JavaScript grammar: {e}")))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::internal("tree-sitter returned no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(match first_error(root) {
                Some(node) if node.is_missing() => ParseError::invalid_source_at(
                    format!("missing `{}`", node.kind()),
                    node.start_byte(),
                ),
                Some(node) => ParseError::invalid_source_at(
                    format!("unexpected syntax at byte {}", node.start_byte()),
                    node.start_byte(),
                ),
                None => ParseError::invalid_source("source contains syntax errors"),
            });
        }

        let mut converter = Converter::new(source);
        converter.program(root);
        Ok(converter.builder.finish())
    }
}

/// Depth-first search for the first error or missing node.
fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn span_of(node: Node<'_>) -> Span {
    Span::new(node.start_byte() as u32, node.end_byte() as u32)
}

/// Wrapper nodes with no ESTree counterpart.
fn is_flattened(kind: &str) -> bool {
    matches!(
        kind,
        "else_clause"
            | "finally_clause"
            | "switch_body"
            | "export_clause"
            | "arguments"
            | "formal_parameters"
            | "class_heritage"
            | "parenthesized_expression"
            | "template_substitution"
    )
}

/// Field given to the children of a flattened wrapper that has none of its own.
fn wrapper_field(kind: &str) -> Option<&'static str> {
    match kind {
        "else_clause" => Some("alternate"),
        "finally_clause" => Some("finalizer"),
        "switch_body" => Some("cases"),
        "export_clause" => Some("specifiers"),
        "arguments" => Some("arguments"),
        "formal_parameters" => Some("params"),
        "class_heritage" => Some("superClass"),
        _ => None,
    }
}

/// Nodes that become a single token even though the grammar gives them
/// children.
fn is_atomic(kind: &str) -> bool {
    matches!(kind, "string" | "regex" | "number" | "jsx_text")
}

/// Maps a grammar field name to its ESTree spelling.
fn estree_field(parent: NodeKind, field: &'static str) -> &'static str {
    use NodeKind::*;

    match (parent, field) {
        (_, "consequence") => "consequent",
        (_, "alternative") => "alternate",
        (_, "condition") => "test",
        (_, "parameters") => "params",
        (ForStatement, "initializer") => "init",
        (ForStatement, "increment") => "update",
        (CatchClause, "parameter") => "param",
        (TryStatement, "body") => "block",
        (SwitchStatement, "value") => "discriminant",
        (SwitchStatement, "body") => "cases",
        (SwitchCase, "value") => "test",
        (VariableDeclarator, "name") => "id",
        (VariableDeclarator, "value") => "init",
        (FunctionDeclaration | FunctionExpression | ClassDeclaration | ClassExpression, "name") => {
            "id"
        }
        (ExportSpecifier, "name") => "local",
        (ExportSpecifier, "alias") => "exported",
        (CallExpression | NewExpression, "function" | "constructor") => "callee",
        (MemberExpression, "index") => "property",
        (_, other) => other,
    }
}

fn token_kind(node: Node<'_>, text: &str) -> TokenKind {
    match node.kind() {
        "identifier"
        | "property_identifier"
        | "shorthand_property_identifier"
        | "shorthand_property_identifier_pattern"
        | "private_property_identifier"
        | "statement_identifier"
        | "undefined" => TokenKind::Identifier,
        "this" | "super" | "import" => TokenKind::Keyword,
        "true" | "false" => TokenKind::Boolean,
        "null" => TokenKind::Null,
        "number" => TokenKind::Numeric,
        "string" => TokenKind::String,
        "regex" => TokenKind::RegularExpression,
        "jsx_text" | "html_character_reference" => TokenKind::JsxText,
        _ if node.is_named() => {
            if text.starts_with(|c: char| c.is_alphanumeric() || c == '_' || c == '$') {
                TokenKind::Identifier
            } else {
                TokenKind::Punctuator
            }
        }
        _ if text.chars().all(|c| c.is_ascii_alphabetic()) => TokenKind::Keyword,
        _ => TokenKind::Punctuator,
    }
}

/// Anonymous child whose grammar kind is `text` (`async`, `*`, `of`, ...).
fn anonymous_child<'t>(node: Node<'t>, text: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find(|child| !child.is_named() && child.kind() == text)
}

struct Converter<'a> {
    source: &'a str,
    builder: TreeBuilder<'a>,
}

impl<'a> Converter<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            builder: TreeBuilder::new(source),
        }
    }

    fn program(&mut self, root: Node<'_>) {
        let span = Span::new(0, self.source.len() as u32);
        self.builder
            .start_node(NodeKind::Program, span, None, NodeData::None);
        self.children(root, NodeKind::Program, None);
        self.builder.finish_node();
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        self.source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or_default()
    }

    fn children(&mut self, node: Node<'_>, parent: NodeKind, inherited: Option<&'static str>) {
        let mut cursor = node.walk();
        if !cursor.goto_first_child() {
            return;
        }
        loop {
            let child = cursor.node();
            let field = inherited.or_else(|| cursor.field_name().map(|name| estree_field(parent, name)));
            self.visit(child, parent, field);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    fn visit(&mut self, node: Node<'_>, parent: NodeKind, field: Option<&'static str>) {
        let grammar_kind = node.kind();

        if matches!(grammar_kind, "comment" | "html_comment" | "hash_bang_line") {
            self.builder.push_comment(span_of(node));
            return;
        }

        let nested_sequence =
            grammar_kind == "sequence_expression" && parent == NodeKind::SequenceExpression;
        if is_flattened(grammar_kind) || nested_sequence {
            let field = field.or(wrapper_field(grammar_kind));
            self.children(node, parent, field);
            return;
        }

        if grammar_kind == "template_string" {
            self.template(node, field);
            return;
        }

        let kind = self.node_kind(node);
        if node.child_count() == 0 || is_atomic(grammar_kind) {
            self.leaf(node, kind, field);
            return;
        }

        if !node.is_named() {
            self.children(node, parent, field);
            return;
        }

        let data = self.node_data(node, kind);
        self.builder.start_node(kind, span_of(node), field, data);
        self.children(node, kind, None);
        self.builder.finish_node();
    }

    fn leaf(&mut self, node: Node<'_>, kind: NodeKind, field: Option<&'static str>) {
        let span = span_of(node);
        if span.is_empty() {
            return;
        }

        let wrap = node.is_named() && kind != NodeKind::Unknown;
        if wrap {
            self.builder.start_node(kind, span, field, NodeData::None);
        }
        let token = token_kind(node, self.text(node));
        self.builder.push_token(token, span);
        if wrap {
            self.builder.finish_node();
        }
    }

    /// Splits a template literal into `` `..${ ``, expression tokens and
    /// `` }..` `` chunks.
    fn template(&mut self, node: Node<'_>, field: Option<&'static str>) {
        let span = span_of(node);
        self.builder
            .start_node(NodeKind::TemplateLiteral, span, field, NodeData::None);

        let mut chunk_start = span.start;
        let mut cursor = node.walk();
        let substitutions: Vec<_> = node
            .children(&mut cursor)
            .filter(|child| child.kind() == "template_substitution")
            .collect();

        for substitution in substitutions {
            let sub = span_of(substitution);
            self.builder
                .push_token(TokenKind::Template, Span::new(chunk_start, sub.start + 2));

            let mut inner = substitution.walk();
            let expressions: Vec<_> = substitution
                .children(&mut inner)
                .filter(|child| child.is_named())
                .collect();
            for expression in expressions {
                self.visit(expression, NodeKind::TemplateLiteral, Some("expressions"));
            }

            chunk_start = sub.end.saturating_sub(1);
        }

        self.builder
            .push_token(TokenKind::Template, Span::new(chunk_start, span.end));
        self.builder.finish_node();
    }

    fn operator(&self, node: Node<'_>) -> Option<&'a str> {
        node.child_by_field_name("operator")
            .map(|operator| self.text(operator))
    }

    fn node_kind(&self, node: Node<'_>) -> NodeKind {
        use NodeKind::*;

        match node.kind() {
            "program" => Program,
            "expression_statement" => ExpressionStatement,
            "statement_block" => BlockStatement,
            "class_static_block" => StaticBlock,
            "empty_statement" => EmptyStatement,
            "debugger_statement" => DebuggerStatement,
            "with_statement" => WithStatement,
            "return_statement" => ReturnStatement,
            "labeled_statement" => LabeledStatement,
            "break_statement" => BreakStatement,
            "continue_statement" => ContinueStatement,
            "if_statement" => IfStatement,
            "switch_statement" => SwitchStatement,
            "switch_case" | "switch_default" => SwitchCase,
            "throw_statement" => ThrowStatement,
            "try_statement" => TryStatement,
            "catch_clause" => CatchClause,
            "while_statement" => WhileStatement,
            "do_statement" => DoWhileStatement,
            "for_statement" => ForStatement,
            "for_in_statement" => {
                if anonymous_child(node, "of").is_some() {
                    ForOfStatement
                } else {
                    ForInStatement
                }
            }
            "function_declaration" | "generator_function_declaration" => FunctionDeclaration,
            "function_expression" | "function" | "generator_function" => FunctionExpression,
            "arrow_function" => ArrowFunctionExpression,
            "lexical_declaration" | "variable_declaration" => VariableDeclaration,
            "variable_declarator" => VariableDeclarator,
            "class_declaration" => ClassDeclaration,
            "class" => ClassExpression,
            "class_body" => ClassBody,
            "method_definition" => MethodDefinition,
            "field_definition" => PropertyDefinition,
            "import_statement" => ImportDeclaration,
            "export_statement" => {
                if anonymous_child(node, "default").is_some() {
                    ExportDefaultDeclaration
                } else if anonymous_child(node, "*").is_some() {
                    ExportAllDeclaration
                } else {
                    ExportNamedDeclaration
                }
            }
            "export_specifier" => ExportSpecifier,
            "identifier"
            | "property_identifier"
            | "shorthand_property_identifier"
            | "shorthand_property_identifier_pattern"
            | "private_property_identifier"
            | "statement_identifier"
            | "undefined" => Identifier,
            "this" => ThisExpression,
            "super" => Super,
            "number" | "string" | "regex" | "true" | "false" | "null" => Literal,
            "template_string" => TemplateLiteral,
            "array" => ArrayExpression,
            "object" => ObjectExpression,
            "pair" | "pair_pattern" => Property,
            "spread_element" => SpreadElement,
            "unary_expression" => UnaryExpression,
            "update_expression" => UpdateExpression,
            "binary_expression" => match self.operator(node) {
                Some("&&" | "||" | "??") => LogicalExpression,
                _ => BinaryExpression,
            },
            "assignment_expression" | "augmented_assignment_expression" => AssignmentExpression,
            "ternary_expression" => ConditionalExpression,
            "sequence_expression" => SequenceExpression,
            "call_expression" => CallExpression,
            "new_expression" => NewExpression,
            "member_expression" | "subscript_expression" => MemberExpression,
            "await_expression" => AwaitExpression,
            "yield_expression" => YieldExpression,
            "object_pattern" => ObjectPattern,
            "array_pattern" => ArrayPattern,
            "assignment_pattern" | "object_assignment_pattern" => AssignmentPattern,
            "rest_pattern" => RestElement,
            "jsx_element" | "jsx_self_closing_element" => JSXElement,
            "jsx_expression" => JSXExpressionContainer,
            _ => Unknown,
        }
    }

    fn node_data(&self, node: Node<'_>, kind: NodeKind) -> NodeData<'a> {
        match kind {
            NodeKind::UnaryExpression
            | NodeKind::UpdateExpression
            | NodeKind::BinaryExpression
            | NodeKind::LogicalExpression => {
                self.operator(node).map_or(NodeData::None, NodeData::Operator)
            }
            NodeKind::AssignmentExpression if node.kind() == "assignment_expression" => {
                NodeData::Operator("=")
            }
            NodeKind::AssignmentExpression => {
                self.operator(node).map_or(NodeData::None, NodeData::Operator)
            }
            NodeKind::VariableDeclaration => {
                let mut cursor = node.walk();
                if cursor.goto_first_child() {
                    NodeData::Declaration(self.text(cursor.node()))
                } else {
                    NodeData::None
                }
            }
            kind if kind.is_function() => NodeData::Function {
                is_async: anonymous_child(node, "async").is_some(),
                is_generator: anonymous_child(node, "*").is_some(),
            },
            _ => NodeData::None,
        }
    }
}
