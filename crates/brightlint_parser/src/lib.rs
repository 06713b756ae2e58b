//! # brightlint_parser
//!
//! Parser layer for BrightLint.
//!
//! This crate provides:
//! - A `Parser` trait for source-to-tree conversion
//! - `JavaScriptParser`, built on `tree-sitter-javascript`
//!
//! ## Architecture
//!
//! tree-sitter produces a concrete syntax tree. The JavaScript parser walks it
//! once and emits ESTree-shaped nodes, the token stream and the comment list
//! into a [`brightlint_ast::SyntaxTree`]. Grammar-only wrapper nodes are
//! flattened so that rules see the node shapes ESLint users know.
//!
//! ## Example
//!
//! ```rust
//! use brightlint_ast::NodeKind;
//! use brightlint_parser::{JavaScriptParser, Parser};
//!
//! let parser = JavaScriptParser::new();
//! let tree = parser.parse("if (a) {}").unwrap();
//! let statement = tree.children(tree.root())[0];
//! assert_eq!(tree.kind(statement), NodeKind::IfStatement);
//! ```

mod error;
mod javascript;
mod traits;

pub use error::ParseError;
pub use javascript::JavaScriptParser;
pub use traits::Parser;
