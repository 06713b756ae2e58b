//! Node kind taxonomy.
//!
//! Kinds carry ESTree names so configuration selectors and diagnostic
//! messages read the same way they do in the JavaScript ecosystem.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! node_kinds {
    ($($variant:ident),* $(,)?) => {
        /// The kind of a syntax node.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum NodeKind {
            $($variant,)*
        }

        impl NodeKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$variant,)*];

            /// Returns the ESTree name of this kind.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(NodeKind::$variant => stringify!($variant),)*
                }
            }

            /// Resolves an ESTree name. Unknown names return `None`.
            pub fn from_name(name: &str) -> Option<NodeKind> {
                match name {
                    $(stringify!($variant) => Some(NodeKind::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

node_kinds! {
    Program,

    // Statements
    BlockStatement,
    StaticBlock,
    ExpressionStatement,
    EmptyStatement,
    DebuggerStatement,
    WithStatement,
    ReturnStatement,
    LabeledStatement,
    BreakStatement,
    ContinueStatement,
    IfStatement,
    SwitchStatement,
    SwitchCase,
    ThrowStatement,
    TryStatement,
    CatchClause,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    ForInStatement,
    ForOfStatement,

    // Declarations
    FunctionDeclaration,
    VariableDeclaration,
    VariableDeclarator,
    ClassDeclaration,
    ClassBody,
    MethodDefinition,
    PropertyDefinition,
    ImportDeclaration,
    ExportNamedDeclaration,
    ExportDefaultDeclaration,
    ExportAllDeclaration,
    ExportSpecifier,

    // Expressions
    Identifier,
    Literal,
    TemplateLiteral,
    ThisExpression,
    Super,
    ArrayExpression,
    ObjectExpression,
    Property,
    SpreadElement,
    FunctionExpression,
    ArrowFunctionExpression,
    ClassExpression,
    UnaryExpression,
    UpdateExpression,
    BinaryExpression,
    LogicalExpression,
    AssignmentExpression,
    ConditionalExpression,
    SequenceExpression,
    CallExpression,
    NewExpression,
    MemberExpression,
    AwaitExpression,
    YieldExpression,

    // Patterns
    ObjectPattern,
    ArrayPattern,
    AssignmentPattern,
    RestElement,

    // JSX
    JSXElement,
    JSXExpressionContainer,

    // No ESTree counterpart
    Unknown,
}

impl NodeKind {
    /// Kinds that may directly own a `{ ... }` pair.
    pub const fn is_brace_bearing(&self) -> bool {
        matches!(
            self,
            NodeKind::ClassBody
                | NodeKind::BlockStatement
                | NodeKind::ObjectExpression
                | NodeKind::ExportNamedDeclaration
        )
    }

    /// Function-like kinds.
    pub const fn is_function(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration
                | NodeKind::FunctionExpression
                | NodeKind::ArrowFunctionExpression
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_name(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(NodeKind::from_name("FinalStatement"), None);
        assert_eq!(NodeKind::from_name("ifstatement"), None);
    }

    #[test]
    fn test_brace_bearing() {
        assert!(NodeKind::BlockStatement.is_brace_bearing());
        assert!(NodeKind::ExportNamedDeclaration.is_brace_bearing());
        assert!(!NodeKind::IfStatement.is_brace_bearing());
        assert!(!NodeKind::ObjectPattern.is_brace_bearing());
    }

    #[test]
    fn test_serializes_as_estree_name() {
        let json = serde_json::to_string(&NodeKind::IfStatement).unwrap();
        assert_eq!(json, r#""IfStatement""#);
    }
}
