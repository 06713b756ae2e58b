//! Arena-backed syntax tree and token access.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`]. Each
//! node records its parent id, so ancestor queries never need back pointers.
//! Every node also records the inclusive range of token-stream indices it
//! covers, which makes first/last token lookups O(1) and scans over a node's
//! tokens O(k).

use crate::{LineIndex, Location, NodeKind, Span, Token, TokenKind};

/// Index of a node in its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the raw index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node-specific payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeData<'a> {
    #[default]
    None,
    /// Operator spelling of unary, update, binary, logical and assignment
    /// expressions.
    Operator(&'a str),
    /// `var`, `let` or `const`.
    Declaration(&'a str),
    /// Function-like nodes.
    Function { is_async: bool, is_generator: bool },
}

/// A node in the syntax tree.
#[derive(Debug, Clone)]
pub struct SyntaxNode<'a> {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// The role this node plays in its parent (`left`, `body`, `finalizer`, ...).
    pub field: Option<&'static str>,
    pub data: NodeData<'a>,
    tokens: Option<(u32, u32)>,
}

impl SyntaxNode<'_> {
    /// Inclusive range of token indices covered by this node.
    pub fn token_range(&self) -> Option<(u32, u32)> {
        self.tokens
    }
}

/// A parsed source file: nodes, tokens and comments.
#[derive(Debug, Clone)]
pub struct SyntaxTree<'a> {
    source: &'a str,
    nodes: Vec<SyntaxNode<'a>>,
    tokens: Vec<Token<'a>>,
    comments: Vec<Token<'a>>,
    lines: LineIndex,
}

impl<'a> SyntaxTree<'a> {
    /// The source text the tree was built from.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// The root node. Trees always contain at least the program node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in pre-order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode<'a> {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    pub fn data(&self, id: NodeId) -> NodeData<'a> {
        self.node(id).data
    }

    pub fn field(&self, id: NodeId) -> Option<&'static str> {
        self.node(id).field
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// First child that plays `field` in `id`.
    pub fn child_by_field(&self, id: NodeId, field: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.field(*child) == Some(field))
    }

    /// Iterates over the ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |current| self.parent(*current))
    }

    /// Source text covered by the node.
    pub fn text(&self, id: NodeId) -> &'a str {
        self.span(id).slice(self.source).unwrap_or_default()
    }

    /// Source text covered by a span.
    pub fn slice(&self, span: Span) -> &'a str {
        span.slice(self.source).unwrap_or_default()
    }

    /// The token stream, comments excluded.
    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    pub fn comments(&self) -> &[Token<'a>] {
        &self.comments
    }

    pub fn token(&self, index: u32) -> Option<&Token<'a>> {
        self.tokens.get(index as usize)
    }

    /// Tokens covered by the node, in source order.
    pub fn node_tokens(&self, id: NodeId) -> &[Token<'a>] {
        match self.node(id).tokens {
            Some((first, last)) => &self.tokens[first as usize..=last as usize],
            None => &[],
        }
    }

    pub fn first_token(&self, id: NodeId) -> Option<&Token<'a>> {
        self.node(id).tokens.and_then(|(first, _)| self.token(first))
    }

    pub fn last_token(&self, id: NodeId) -> Option<&Token<'a>> {
        self.node(id).tokens.and_then(|(_, last)| self.token(last))
    }

    /// First token of the node satisfying `predicate`.
    pub fn first_token_matching(
        &self,
        id: NodeId,
        predicate: impl Fn(&Token<'a>) -> bool,
    ) -> Option<&Token<'a>> {
        self.node_tokens(id).iter().find(|token| predicate(token))
    }

    /// Last token of the node satisfying `predicate`.
    pub fn last_token_matching(
        &self,
        id: NodeId,
        predicate: impl Fn(&Token<'a>) -> bool,
    ) -> Option<&Token<'a>> {
        self.node_tokens(id).iter().rev().find(|token| predicate(token))
    }

    /// The token immediately before `token`, skipping comments.
    pub fn token_before(&self, token: &Token<'a>) -> Option<&Token<'a>> {
        token.index.checked_sub(1).and_then(|index| self.token(index))
    }

    /// The token immediately after `token`, skipping comments.
    pub fn token_after(&self, token: &Token<'a>) -> Option<&Token<'a>> {
        self.token(token.index + 1)
    }

    /// Tokens strictly between `first` and `last` that satisfy `predicate`.
    pub fn tokens_between(
        &self,
        first: &Token<'a>,
        last: &Token<'a>,
        predicate: impl Fn(&Token<'a>) -> bool,
    ) -> Vec<&Token<'a>> {
        let start = first.index as usize + 1;
        let end = last.index as usize;
        if start >= end {
            return Vec::new();
        }
        self.tokens[start..end]
            .iter()
            .filter(|token| predicate(token))
            .collect()
    }

    /// Comments lying inside `span`.
    pub fn comments_in(&self, span: Span) -> impl Iterator<Item = &Token<'a>> + '_ {
        self.comments
            .iter()
            .filter(move |comment| comment.span.start >= span.start && comment.span.end <= span.end)
    }

    /// Line/column location of a span.
    pub fn location(&self, span: Span) -> Location {
        self.lines.location(span)
    }
}

/// Incrementally builds a [`SyntaxTree`] in pre-order.
///
/// Nodes are opened with [`TreeBuilder::start_node`] and closed with
/// [`TreeBuilder::finish_node`]; tokens pushed in between belong to every
/// open node.
#[derive(Debug)]
pub struct TreeBuilder<'a> {
    source: &'a str,
    nodes: Vec<SyntaxNode<'a>>,
    tokens: Vec<Token<'a>>,
    comments: Vec<Token<'a>>,
    lines: LineIndex,
    open: Vec<(NodeId, u32)>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            nodes: Vec::new(),
            tokens: Vec::new(),
            comments: Vec::new(),
            lines: LineIndex::new(source),
            open: Vec::new(),
        }
    }

    /// Opens a node as a child of the innermost open node.
    pub fn start_node(
        &mut self,
        kind: NodeKind,
        span: Span,
        field: Option<&'static str>,
        data: NodeData<'a>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let parent = self.open.last().map(|(parent, _)| *parent);
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        self.nodes.push(SyntaxNode {
            kind,
            span,
            parent,
            children: Vec::new(),
            field,
            data,
            tokens: None,
        });
        self.open.push((id, self.tokens.len() as u32));
        id
    }

    /// Closes the innermost open node.
    pub fn finish_node(&mut self) {
        if let Some((id, first)) = self.open.pop() {
            let count = self.tokens.len() as u32;
            if count > first {
                self.nodes[id.index()].tokens = Some((first, count - 1));
            }
        }
    }

    /// Appends a token. Empty or out-of-range spans are ignored.
    pub fn push_token(&mut self, kind: TokenKind, span: Span) {
        let Some(text) = span.slice(self.source).filter(|text| !text.is_empty()) else {
            return;
        };
        let token = Token {
            index: self.tokens.len() as u32,
            kind,
            text,
            span,
            loc: self.lines.location(span),
        };
        self.tokens.push(token);
    }

    /// Records a comment outside the token stream.
    pub fn push_comment(&mut self, span: Span) {
        let Some(text) = span.slice(self.source) else {
            return;
        };
        let comment = Token {
            index: self.comments.len() as u32,
            kind: TokenKind::Comment,
            text,
            span,
            loc: self.lines.location(span),
        };
        self.comments.push(comment);
    }

    /// Closes any nodes left open and returns the tree.
    pub fn finish(mut self) -> SyntaxTree<'a> {
        while !self.open.is_empty() {
            self.finish_node();
        }
        if self.nodes.is_empty() {
            self.start_node(
                NodeKind::Program,
                Span::new(0, self.source.len() as u32),
                None,
                NodeData::None,
            );
            self.finish_node();
        }
        SyntaxTree {
            source: self.source,
            nodes: self.nodes,
            tokens: self.tokens,
            comments: self.comments,
            lines: self.lines,
        }
    }
}
