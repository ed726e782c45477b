//! The result of a parse.

use serde::Serialize;
use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct, Serializer};
use ziust_diagnostic::Diagnostic;
use ziust_lexer::Token;

use crate::{Element, Node, NodeKind};

/// A parsed source buffer.
///
/// Owns the source, every token (trivia included), the root `module` node
/// and the diagnostics ordered by byte offset.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    source: String,
    tokens: Vec<Token>,
    root: Node,
    diagnostics: Vec<Diagnostic>,
}

impl SyntaxTree {
    pub fn new(
        source: String,
        tokens: Vec<Token>,
        root: Node,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Self {
        diagnostics.sort_by_key(Diagnostic::offset);
        Self {
            source,
            tokens,
            root,
            diagnostics,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// All tokens in document order, trivia included, ending with `Eof`.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Reconstruct the source from the token stream.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text(&self.source)).collect()
    }

    pub fn to_sexp(&self) -> String {
        self.root.to_sexp(&self.source)
    }

    /// All `ERROR` nodes, in document order.
    pub fn error_nodes(&self) -> impl Iterator<Item = &Node> {
        self.root.descendants().filter(|n| n.kind == NodeKind::Error)
    }

    /// The error node a diagnostic recovered into.
    pub fn recovered_node(&self, diagnostic: &Diagnostic) -> Option<&Node> {
        let span = diagnostic.recovered?;
        self.error_nodes().find(|n| n.span == span)
    }
}

impl Serialize for SyntaxTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SyntaxTree", 2)?;
        state.serialize_field(
            "root",
            &NodeView {
                node: &self.root,
                source: &self.source,
            },
        )?;
        state.serialize_field("diagnostics", &self.diagnostics)?;
        state.end()
    }
}

struct NodeView<'a> {
    node: &'a Node,
    source: &'a str,
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("kind", &self.node.kind)?;
        map.serialize_entry("span", &self.node.span)?;
        map.serialize_entry(
            "children",
            &ChildrenView {
                node: self.node,
                source: self.source,
            },
        )?;
        map.end()
    }
}

struct ChildrenView<'a> {
    node: &'a Node,
    source: &'a str,
}

impl Serialize for ChildrenView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.node.children.len()))?;
        for (index, child) in self.node.children.iter().enumerate() {
            seq.serialize_element(&ElementView {
                element: child,
                field: self.node.field_of(index),
                source: self.source,
            })?;
        }
        seq.end()
    }
}

struct ElementView<'a> {
    element: &'a Element,
    field: Option<&'static str>,
    source: &'a str,
}

impl Serialize for ElementView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.element {
            Element::Node(node) => {
                let mut map = serializer.serialize_map(None)?;
                if let Some(field) = self.field {
                    map.serialize_entry("field", field)?;
                }
                map.serialize_entry(
                    "node",
                    &NodeView {
                        node,
                        source: self.source,
                    },
                )?;
                map.end()
            }
            Element::Token(token) => {
                let mut map = serializer.serialize_map(None)?;
                if let Some(field) = self.field {
                    map.serialize_entry("field", field)?;
                }
                map.serialize_entry("token", token.kind.name())?;
                map.serialize_entry("text", token.text(self.source))?;
                map.serialize_entry("span", &token.span)?;
                map.end()
            }
            Element::Missing { kind, at } => {
                let mut map = serializer.serialize_map(None)?;
                if let Some(field) = self.field {
                    map.serialize_entry("field", field)?;
                }
                map.serialize_entry("missing", kind.name())?;
                map.serialize_entry("at", at)?;
                map.end()
            }
        }
    }
}
