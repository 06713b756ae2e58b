use brightlint_ast::{NodeData, NodeId, NodeKind, SyntaxTree};
use serde_json::Value;

use super::alias_option;
use super::exports_alias::single_exports_declarator;
use crate::Fix;
use crate::rule::{Rule, RuleContext, RuleMeta};

pub(crate) static META: RuleMeta = RuleMeta {
    name: "default-exports-alias",
    description: "Creates alias for 'exports' directive on top of the file",
    fixable: true,
};

const MESSAGE: &str = "Default alias for 'exports' directive";

/// Requires a top-level `const <alias> = exports;` in files that export
/// anything, and renames a differently named top-level alias.
pub struct DefaultExportsAlias {
    alias: String,
}

impl DefaultExportsAlias {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
        }
    }

    pub fn from_options(options: &[Value]) -> Self {
        Self::new(alias_option(META.name, options))
    }

    /// Whether any `<alias>.x = ...` assignment or `export` declaration
    /// exists anywhere in the file.
    fn exports_anything(&self, tree: &SyntaxTree<'_>) -> bool {
        tree.node_ids().any(|node| match tree.kind(node) {
            NodeKind::ExportNamedDeclaration => true,
            NodeKind::AssignmentExpression => tree
                .child_by_field(node, "left")
                .is_some_and(|left| member_of(tree, left, &self.alias)),
            _ => false,
        })
    }

    fn rename(&self, ctx: &mut RuleContext<'_, '_>, statements: &[NodeId], id: NodeId) {
        let tree = ctx.tree();
        let old = tree.text(id);
        ctx.report(tree.span(id), MESSAGE, Some(Fix::new(tree.span(id), self.alias.as_str())));

        for &statement in statements {
            if tree.kind(statement) != NodeKind::ExpressionStatement {
                continue;
            }
            let object = tree
                .children(statement)
                .first()
                .filter(|&&expression| tree.kind(expression) == NodeKind::AssignmentExpression)
                .and_then(|&assignment| tree.child_by_field(assignment, "left"))
                .filter(|&left| member_of(tree, left, old))
                .and_then(|left| tree.child_by_field(left, "object"));

            if let Some(object) = object {
                let span = tree.span(object);
                ctx.report(span, MESSAGE, Some(Fix::new(span, self.alias.as_str())));
            }
        }
    }
}

/// Returns true for `<object>.x` where `object` is the identifier `name`.
fn member_of(tree: &SyntaxTree<'_>, node: NodeId, name: &str) -> bool {
    tree.kind(node) == NodeKind::MemberExpression
        && tree.child_by_field(node, "object").is_some_and(|object| {
            tree.kind(object) == NodeKind::Identifier && tree.text(object) == name
        })
}

impl Rule for DefaultExportsAlias {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn node_kinds(&self) -> Vec<NodeKind> {
        vec![NodeKind::Program]
    }

    fn check(&self, node: NodeId, ctx: &mut RuleContext<'_, '_>) {
        let tree = ctx.tree();
        let statements = tree.children(node);

        let declared = statements.iter().filter_map(|&statement| {
            let is_const = tree.kind(statement) == NodeKind::VariableDeclaration
                && tree.data(statement) == NodeData::Declaration("const");
            if !is_const {
                return None;
            }
            single_exports_declarator(tree, statement).map(|(id, _)| id)
        });

        let mut already_declared = false;
        for id in declared {
            already_declared = true;
            if tree.text(id) != self.alias {
                self.rename(ctx, statements, id);
            }
        }
        if already_declared {
            return;
        }

        let Some(&first) = statements.first() else {
            return;
        };
        if self.exports_anything(tree) {
            let text = format!("const {} = exports;\n", self.alias);
            let start = tree.span(first).start;
            ctx.report(tree.span(first), MESSAGE, Some(Fix::insert(start, text)));
        }
    }
}
