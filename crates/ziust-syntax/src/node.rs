//! Nodes and elements of the concrete syntax tree.
//! 具体语法树的节点与元素。

use std::fmt::Write;

use ziust_common::{BytePos, Span};
use ziust_lexer::{Token, TokenKind};

use crate::NodeKind;

/// A child of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Node(Node),
    Token(Token),
    /// A required token the parser inserted during recovery. It covers no
    /// source text.
    Missing { kind: TokenKind, at: BytePos },
}

impl Element {
    pub fn span(&self) -> Span {
        match self {
            Element::Node(node) => node.span,
            Element::Token(token) => token.span,
            Element::Missing { at, .. } => Span::empty_at(*at),
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Element::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Element::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Element::Missing { .. })
    }

    /// Source text of this element; empty for missing tokens.
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        match self {
            Element::Missing { .. } => "",
            _ => &source[self.span().range()],
        }
    }

    /// Whether this element contributes to the span of its parent.
    fn has_extent(&self) -> bool {
        match self {
            Element::Node(node) => !node.span.is_empty(),
            Element::Token(token) => !token.span.is_empty(),
            Element::Missing { .. } => false,
        }
    }
}

/// A syntax node: kind tag, ordered children and named fields.
///
/// `fields` maps a field name to a child index; one name may appear several
/// times (e.g. every `member` of a struct).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Element>,
    pub fields: Vec<(&'static str, usize)>,
    pub span: Span,
}

impl Node {
    /// Build a node. The span runs from the first to the last child that
    /// covers source text; a node without such children is zero-width at `at`.
    pub fn new(
        kind: NodeKind,
        children: Vec<Element>,
        fields: Vec<(&'static str, usize)>,
        at: BytePos,
    ) -> Self {
        let mut covered = children.iter().filter(|c| c.has_extent()).map(Element::span);
        let span = match covered.next() {
            Some(first) => covered.fold(first, Span::merge),
            None => Span::empty_at(at),
        };
        Self {
            kind,
            children,
            fields,
            span,
        }
    }

    /// The first child stored under `field`.
    pub fn child_by_field(&self, field: &str) -> Option<&Element> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .and_then(|&(_, index)| self.children.get(index))
    }

    /// The first child node stored under `field`.
    pub fn node_by_field(&self, field: &str) -> Option<&Node> {
        self.fields
            .iter()
            .filter(|(name, _)| *name == field)
            .find_map(|&(_, index)| self.children.get(index).and_then(Element::as_node))
    }

    pub fn children_by_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.fields
            .iter()
            .filter(move |(name, _)| *name == field)
            .filter_map(|&(_, index)| self.children.get(index))
    }

    /// The field name attached to child `index`, if any.
    pub fn field_of(&self, index: usize) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|&&(_, i)| i == index)
            .map(|&(name, _)| name)
    }

    pub fn node_children(&self) -> impl DoubleEndedIterator<Item = &Node> {
        self.children.iter().filter_map(Element::as_node)
    }

    pub fn first_child_of_kind(&self, kind: NodeKind) -> Option<&Node> {
        self.node_children().find(|n| n.kind == kind)
    }

    /// This node and every node below it, in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Every token below this node, in document order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        collect_tokens(self, &mut out);
        out
    }

    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        &source[self.span.range()]
    }

    /// True if an `ERROR` node or a missing token occurs anywhere below.
    pub fn has_error(&self) -> bool {
        self.descendants().any(|node| {
            node.kind.is_error() || node.children.iter().any(Element::is_missing)
        })
    }

    /// Render as an S-expression. Named tokens show as `(kind)`, anonymous
    /// tokens only when they carry a field.
    pub fn to_sexp(&self, source: &str) -> String {
        let mut out = String::new();
        self.write_sexp(source, &mut out);
        out
    }

    fn write_sexp(&self, source: &str, out: &mut String) {
        out.push('(');
        out.push_str(self.kind.as_str());
        for (index, child) in self.children.iter().enumerate() {
            let field = self.field_of(index);
            let shown = match child {
                Element::Node(_) | Element::Missing { .. } => true,
                Element::Token(token) => token.kind.is_named() || field.is_some(),
            };
            if !shown {
                continue;
            }
            out.push(' ');
            if let Some(field) = field {
                out.push_str(field);
                out.push_str(": ");
            }
            match child {
                Element::Node(node) => node.write_sexp(source, out),
                Element::Token(token) if token.kind.is_named() => {
                    let _ = write!(out, "({})", token.kind.name());
                }
                Element::Token(token) => {
                    let _ = write!(out, "{:?}", token.text(source));
                }
                Element::Missing { kind, .. } => {
                    let _ = write!(out, "(MISSING {:?})", kind.name());
                }
            }
        }
        out.push(')');
    }
}

fn collect_tokens<'a>(node: &'a Node, out: &mut Vec<&'a Token>) {
    for child in &node.children {
        match child {
            Element::Node(inner) => collect_tokens(inner, out),
            Element::Token(token) => out.push(token),
            Element::Missing { .. } => {}
        }
    }
}

/// Preorder iterator over a subtree, see [`Node::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        self.stack.extend(node.node_children().rev());
        Some(node)
    }
}
