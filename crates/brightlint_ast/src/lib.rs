//! # brightlint_ast
//!
//! Syntax tree and token model for BrightLint.
//!
//! This crate is the access layer every rule works through. A parsed source
//! file is a [`SyntaxTree`]: an arena of ESTree-shaped nodes, the token stream
//! they cover, and the comments that sit between tokens.
//!
//! ## Architecture
//!
//! - Nodes are stored in one `Vec` in pre-order and addressed by [`NodeId`]
//! - Each node knows its parent, so ancestor walks are cheap
//! - Each node records the range of tokens it spans, so first/last token
//!   lookups are constant time
//! - Tokens and comments borrow their text from the source
//!
//! ## Example
//!
//! ```rust
//! use brightlint_ast::{NodeData, NodeKind, Span, TokenKind, TreeBuilder};
//!
//! let source = "{}";
//! let mut builder = TreeBuilder::new(source);
//! builder.start_node(NodeKind::Program, Span::new(0, 2), None, NodeData::None);
//! let block = builder.start_node(NodeKind::BlockStatement, Span::new(0, 2), None, NodeData::None);
//! builder.push_token(TokenKind::Punctuator, Span::new(0, 1));
//! builder.push_token(TokenKind::Punctuator, Span::new(1, 2));
//! let tree = builder.finish();
//!
//! assert_eq!(tree.first_token(block).map(|t| t.text), Some("{"));
//! assert_eq!(tree.last_token(block).map(|t| t.text), Some("}"));
//! ```

mod kind;
mod span;
mod token;
mod tree;
pub mod visitor;

pub use kind::NodeKind;
pub use span::{LineIndex, Location, Position, Span};
pub use token::{Token, TokenKind};
pub use tree::{NodeData, NodeId, SyntaxNode, SyntaxTree, TreeBuilder};

// Re-export commonly used visitor items for convenience
pub use visitor::{VisitResult, Visitor, walk_tree};
