//! Lexical tokens.

use serde::Serialize;

use crate::{Location, Span};

/// The lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Punctuator,
    Numeric,
    String,
    Boolean,
    Null,
    /// A template chunk such as `` `a${ `` or `` }b` ``.
    Template,
    RegularExpression,
    JsxText,
    Comment,
}

impl TokenKind {
    /// Identifier-class tokens fuse with a neighbouring word character.
    pub const fn is_word(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Keyword
                | TokenKind::Numeric
                | TokenKind::Boolean
                | TokenKind::Null
        )
    }
}

/// A token in the source text.
///
/// Tokens borrow their text from the source and are cheap to copy. `index`
/// is the position in the tree's token stream; comments are kept in a
/// separate list and their index refers to that list instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub index: u32,
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
    pub loc: Location,
}

impl<'a> Token<'a> {
    /// Returns true if the token's text equals `text`.
    #[inline]
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }

    /// Returns true for `{` and `}`.
    #[inline]
    pub fn is_brace(&self) -> bool {
        self.kind == TokenKind::Punctuator && (self.text == "{" || self.text == "}")
    }

    /// Returns true if no bytes separate this token from `next`.
    #[inline]
    pub fn touches(&self, next: &Token<'_>) -> bool {
        self.span.end == next.span.start
    }

    /// Returns true if `next` starts on the line this token ends on.
    #[inline]
    pub fn same_line_as(&self, next: &Token<'_>) -> bool {
        self.loc.end.line == next.loc.start.line
    }
}
