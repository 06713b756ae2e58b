//! Token adjacency helpers shared by the layout rules.

use brightlint_ast::{Span, Token, TokenKind};

/// Every JavaScript punctuator.
const PUNCTUATORS: &[&str] = &[
    "{", "}", "(", ")", "[", "]", ".", "...", ";", ",", "<", ">", "<=", ">=", "==", "!=", "===",
    "!==", "+", "-", "*", "/", "%", "**", "++", "--", "<<", ">>", ">>>", "&", "|", "^", "!", "~",
    "&&", "||", "??", "?", "?.", ":", "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=",
    ">>>=", "&=", "|=", "^=", "&&=", "||=", "??=", "=>",
];

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '\\'
}

/// Returns true if the tokens touch with no gap.
pub fn adjacent(left: &Token<'_>, right: &Token<'_>) -> bool {
    left.touches(right)
}

/// The bytes between two tokens.
pub fn gap(left: &Token<'_>, right: &Token<'_>) -> Span {
    left.span.gap_to(&right.span)
}

/// Returns true if `left` and `right` still lex as the same two tokens once
/// the text between them is removed.
pub fn can_join(left: &Token<'_>, right: &Token<'_>) -> bool {
    let (Some(last), Some(first)) = (left.text.chars().last(), right.text.chars().next()) else {
        return false;
    };

    if is_identifier_char(last) && is_identifier_char(first) {
        return false;
    }

    // `/a/ in x` would read `in` as regex flags
    if left.kind == TokenKind::RegularExpression && is_identifier_char(first) {
        return false;
    }

    // `1 .toString()` and `a . 5`
    if (left.kind == TokenKind::Numeric && first == '.') || (last == '.' && first.is_ascii_digit()) {
        return false;
    }

    // `/` followed by `/` or `*` opens a comment
    if last == '/' && (first == '/' || first == '*') {
        return false;
    }

    if left.kind == TokenKind::Punctuator && right.kind == TokenKind::Punctuator {
        return !fuses(left.text, right.text);
    }

    true
}

/// Returns true if `left` immediately followed by `right` would lex as a
/// punctuator longer than `left`.
fn fuses(left: &str, right: &str) -> bool {
    PUNCTUATORS.iter().any(|punctuator| {
        punctuator.len() > left.len()
            && punctuator.starts_with(left)
            && right.starts_with(&punctuator[left.len()..])
    })
}
