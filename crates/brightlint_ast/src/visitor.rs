//! Depth-first traversal over a [`SyntaxTree`].
//!
//! [`walk_tree`] drives a [`Visitor`] in pre-order, calling
//! [`Visitor::enter_node`] before a node's children and
//! [`Visitor::exit_node`] after them. The walk is iterative, so deeply nested
//! sources cannot overflow the stack.
//!
//! # Example
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use brightlint_ast::{NodeData, NodeId, NodeKind, Span, SyntaxTree, TreeBuilder};
//! use brightlint_ast::visitor::{VisitResult, Visitor, walk_tree};
//!
//! struct KindCollector(Vec<NodeKind>);
//!
//! impl<'a> Visitor<'a> for KindCollector {
//!     fn enter_node(&mut self, tree: &SyntaxTree<'a>, id: NodeId) -> VisitResult {
//!         self.0.push(tree.kind(id));
//!         ControlFlow::Continue(())
//!     }
//! }
//!
//! let mut builder = TreeBuilder::new(";");
//! builder.start_node(NodeKind::Program, Span::new(0, 1), None, NodeData::None);
//! builder.start_node(NodeKind::EmptyStatement, Span::new(0, 1), None, NodeData::None);
//! let tree = builder.finish();
//!
//! let mut collector = KindCollector(Vec::new());
//! walk_tree(&mut collector, &tree);
//! assert_eq!(collector.0, vec![NodeKind::Program, NodeKind::EmptyStatement]);
//! ```

use std::ops::ControlFlow;

use crate::{NodeId, SyntaxTree};

/// Result of a visit. `Break` stops the whole traversal.
pub type VisitResult = ControlFlow<()>;

/// Read-only tree visitor. Both hooks default to continuing.
pub trait Visitor<'a> {
    fn enter_node(&mut self, _tree: &SyntaxTree<'a>, _id: NodeId) -> VisitResult {
        ControlFlow::Continue(())
    }

    fn exit_node(&mut self, _tree: &SyntaxTree<'a>, _id: NodeId) -> VisitResult {
        ControlFlow::Continue(())
    }
}

enum Step {
    Enter(NodeId),
    Exit(NodeId),
}

/// Walks the whole tree from the root.
pub fn walk_tree<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, tree: &SyntaxTree<'a>) -> VisitResult {
    walk_from(visitor, tree, tree.root())
}

/// Walks the subtree rooted at `start`.
pub fn walk_from<'a, V: Visitor<'a> + ?Sized>(
    visitor: &mut V,
    tree: &SyntaxTree<'a>,
    start: NodeId,
) -> VisitResult {
    let mut stack = vec![Step::Enter(start)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(id) => {
                visitor.enter_node(tree, id)?;
                stack.push(Step::Exit(id));
                stack.extend(tree.children(id).iter().rev().map(|child| Step::Enter(*child)));
            }
            Step::Exit(id) => visitor.exit_node(tree, id)?,
        }
    }
    ControlFlow::Continue(())
}
