//! Enforces a short alias for the CommonJS `exports` object.
//!
//! Reports assignments to `exports` / `module.exports`, ES `export` lists
//! and declarations, and alias declarations that are not `const <alias>`.
//! Where possible, the fix rewrites the export as one `<alias>.name = value;`
//! statement per exported binding.

use brightlint_ast::{NodeData, NodeId, NodeKind, SyntaxTree};
use serde_json::Value;

use super::alias_option;
use crate::Fix;
use crate::rule::{Rule, RuleContext, RuleMeta};

pub(crate) static META: RuleMeta = RuleMeta {
    name: "exports-alias",
    description: "Use special alias for 'exports' directive",
    fixable: true,
};

const EXPORTS: &str = "exports";
const MODULE: &str = "module";

pub struct ExportsAlias {
    alias: String,
    message: String,
}

impl ExportsAlias {
    pub fn new(alias: impl Into<String>) -> Self {
        let alias = alias.into();
        let message = format!("Use should use '{alias}' alias for '{EXPORTS}' directive");
        Self { alias, message }
    }

    pub fn from_options(options: &[Value]) -> Self {
        Self::new(alias_option(META.name, options))
    }

    fn check_assignment(&self, ctx: &mut RuleContext<'_, '_>, node: NodeId) {
        let tree = ctx.tree();
        if tree.data(node) != NodeData::Operator("=") {
            return;
        }
        let (Some(left), Some(right)) = (
            tree.child_by_field(node, "left"),
            tree.child_by_field(node, "right"),
        ) else {
            return;
        };

        let target = if is_identifier(tree, left, EXPORTS) {
            left
        } else if is_module_exports(tree, left) {
            right
        } else {
            return;
        };

        let fix = match tree.kind(right) {
            NodeKind::Identifier => Some(Fix::new(tree.span(right), self.alias.as_str())),
            NodeKind::ObjectExpression => self.object_assignments(tree, right).map(|text| {
                // replace the whole statement so its `;` is not left behind
                let replaced = tree
                    .parent(node)
                    .filter(|&parent| tree.kind(parent) == NodeKind::ExpressionStatement)
                    .unwrap_or(node);
                Fix::new(tree.span(replaced), text)
            }),
            _ => None,
        };

        ctx.report(tree.span(target), self.message.as_str(), fix);
    }

    fn check_export(&self, ctx: &mut RuleContext<'_, '_>, node: NodeId) {
        let tree = ctx.tree();

        // `export { a } from "./a"` has no local binding to assign
        let fix = if tree.child_by_field(node, "source").is_some() {
            None
        } else if let Some(declaration) = tree.child_by_field(node, "declaration") {
            declared_names(tree, declaration).map(|names| {
                let mut text = tree.text(declaration).to_string();
                for name in names {
                    text.push('\n');
                    text.push_str(&self.assignment(name, name));
                }
                text
            })
        } else {
            self.specifier_assignments(tree, node)
        };

        let span = tree.span(node);
        ctx.report(span, self.message.as_str(), fix.map(|text| Fix::new(span, text)));
    }

    fn check_declaration(&self, ctx: &mut RuleContext<'_, '_>, node: NodeId) {
        let tree = ctx.tree();
        if tree.field(node) == Some("init") {
            return;
        }
        let Some((id, _)) = single_exports_declarator(tree, node) else {
            return;
        };

        let is_const = tree.data(node) == NodeData::Declaration("const");
        if tree.text(id) != self.alias || !is_const {
            let text = format!("const {} = {EXPORTS};", self.alias);
            let span = tree.span(node);
            ctx.report(span, self.message.as_str(), Some(Fix::new(span, text)));
        }
    }

    fn assignment(&self, name: &str, value: &str) -> String {
        format!("{}.{name} = {value};", self.alias)
    }

    /// `E.key = value;` lines for an object literal, or `None` if a member
    /// cannot be expressed that way.
    fn object_assignments(&self, tree: &SyntaxTree<'_>, object: NodeId) -> Option<String> {
        let mut lines = Vec::new();
        for &member in tree.children(object) {
            let line = match tree.kind(member) {
                NodeKind::Identifier => self.assignment(tree.text(member), tree.text(member)),
                NodeKind::Property => {
                    let key = tree.child_by_field(member, "key")?;
                    let value = tree.text(tree.child_by_field(member, "value")?);
                    match tree.kind(key) {
                        NodeKind::Identifier => self.assignment(tree.text(key), value),
                        NodeKind::Literal => format!("{}[{}] = {value};", self.alias, tree.text(key)),
                        _ => return None,
                    }
                }
                _ => return None,
            };
            lines.push(line);
        }
        Some(lines.join("\n"))
    }

    fn specifier_assignments(&self, tree: &SyntaxTree<'_>, export: NodeId) -> Option<String> {
        let mut lines = Vec::new();
        for &specifier in tree.children(export) {
            if tree.kind(specifier) != NodeKind::ExportSpecifier {
                continue;
            }
            let local = tree.child_by_field(specifier, "local")?;
            let exported = tree.child_by_field(specifier, "exported").unwrap_or(local);
            if tree.kind(exported) != NodeKind::Identifier {
                return None;
            }
            lines.push(self.assignment(tree.text(exported), tree.text(local)));
        }
        Some(lines.join("\n"))
    }
}

fn is_identifier(tree: &SyntaxTree<'_>, node: NodeId, name: &str) -> bool {
    tree.kind(node) == NodeKind::Identifier && tree.text(node) == name
}

fn is_module_exports(tree: &SyntaxTree<'_>, node: NodeId) -> bool {
    tree.kind(node) == NodeKind::MemberExpression
        && tree
            .child_by_field(node, "object")
            .is_some_and(|object| is_identifier(tree, object, MODULE))
        && tree
            .child_by_field(node, "property")
            .is_some_and(|property| is_identifier(tree, property, EXPORTS))
}

/// The `(id, init)` of a declaration of the form `<kind> X = exports`.
pub(crate) fn single_exports_declarator(
    tree: &SyntaxTree<'_>,
    declaration: NodeId,
) -> Option<(NodeId, NodeId)> {
    let mut declarators = tree
        .children(declaration)
        .iter()
        .filter(|&&child| tree.kind(child) == NodeKind::VariableDeclarator);
    let declarator = *declarators.next()?;
    if declarators.next().is_some() {
        return None;
    }

    let id = tree.child_by_field(declarator, "id")?;
    let init = tree.child_by_field(declarator, "init")?;
    (tree.kind(id) == NodeKind::Identifier && is_identifier(tree, init, EXPORTS)).then_some((id, init))
}

/// Names bound by an exported declaration.
fn declared_names<'a>(tree: &SyntaxTree<'a>, declaration: NodeId) -> Option<Vec<&'a str>> {
    match tree.kind(declaration) {
        NodeKind::FunctionDeclaration | NodeKind::ClassDeclaration => {
            let id = tree.child_by_field(declaration, "id")?;
            Some(vec![tree.text(id)])
        }
        NodeKind::VariableDeclaration => tree
            .children(declaration)
            .iter()
            .filter(|&&child| tree.kind(child) == NodeKind::VariableDeclarator)
            .map(|&declarator| {
                let id = tree.child_by_field(declarator, "id")?;
                (tree.kind(id) == NodeKind::Identifier).then(|| tree.text(id))
            })
            .collect(),
        _ => None,
    }
}

impl Rule for ExportsAlias {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn node_kinds(&self) -> Vec<NodeKind> {
        vec![
            NodeKind::AssignmentExpression,
            NodeKind::ExportNamedDeclaration,
            NodeKind::VariableDeclaration,
        ]
    }

    fn check(&self, node: NodeId, ctx: &mut RuleContext<'_, '_>) {
        match ctx.tree().kind(node) {
            NodeKind::AssignmentExpression => self.check_assignment(ctx, node),
            NodeKind::ExportNamedDeclaration => self.check_export(ctx, node),
            NodeKind::VariableDeclaration => self.check_declaration(ctx, node),
            _ => {}
        }
    }
}
