//! Parser trait definition.

use brightlint_ast::SyntaxTree;

use crate::ParseError;

/// Trait for parsing source text into a [`SyntaxTree`].
///
/// The returned tree borrows from `source`, so tokens and node text can be
/// handed to rules without copying.
///
/// # Example
///
/// ```rust,ignore
/// use brightlint_parser::Parser;
/// use brightlint_ast::SyntaxTree;
///
/// struct MyParser;
///
/// impl Parser for MyParser {
///     fn name(&self) -> &str {
///         "my-parser"
///     }
///
///     fn extensions(&self) -> &[&str] {
///         &["myext"]
///     }
///
///     fn parse<'a>(&self, source: &'a str) -> Result<SyntaxTree<'a>, ParseError> {
///         todo!()
///     }
/// }
/// ```
pub trait Parser: Send + Sync {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Returns the file extensions this parser handles, without the leading dot.
    fn extensions(&self) -> &[&str];

    /// Parses the source text.
    ///
    /// Sources containing syntax errors are rejected rather than linted.
    fn parse<'a>(&self, source: &'a str) -> Result<SyntaxTree<'a>, ParseError>;

    /// Returns true if this parser can handle the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
