//! Grammar symbols.

use std::fmt;

use ziust_syntax::NodeKind;

/// A nonterminal: either one that produces a node, or a hidden helper whose
/// children are spliced into the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Node(NodeKind),
    Hidden(Hidden),
}

/// Hidden nonterminals. Their names start with `_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hidden {
    Statement,
    Let,
    LetHead,
    DeferrableStatement,
    TraitMember,
    ImplMember,
    Type,
    Expression,
    UnaryExpression,
    PostfixExpression,
    MemberSuffix,
    SimpleExpression,
    Condition,
    Literal,
    Pattern,
}

impl Hidden {
    pub const ALL: [Hidden; 15] = [
        Hidden::Statement,
        Hidden::Let,
        Hidden::LetHead,
        Hidden::DeferrableStatement,
        Hidden::TraitMember,
        Hidden::ImplMember,
        Hidden::Type,
        Hidden::Expression,
        Hidden::UnaryExpression,
        Hidden::PostfixExpression,
        Hidden::MemberSuffix,
        Hidden::SimpleExpression,
        Hidden::Condition,
        Hidden::Literal,
        Hidden::Pattern,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Hidden::Statement => "_statement",
            Hidden::Let => "_let",
            Hidden::LetHead => "_let_head",
            Hidden::DeferrableStatement => "_deferrable_statement",
            Hidden::TraitMember => "_trait_member",
            Hidden::ImplMember => "_impl_member",
            Hidden::Type => "_type",
            Hidden::Expression => "_expression",
            Hidden::UnaryExpression => "_unary_expression",
            Hidden::PostfixExpression => "_postfix_expression",
            Hidden::MemberSuffix => "_member_suffix",
            Hidden::SimpleExpression => "_simple_expression",
            Hidden::Condition => "_condition",
            Hidden::Literal => "_literal",
            Hidden::Pattern => "_pattern",
        }
    }

    /// What a diagnostic calls this symbol when nothing of it could be
    /// matched ("expected type, found `;`").
    pub fn label(self) -> Option<&'static str> {
        match self {
            Hidden::Type => Some("type"),
            Hidden::Expression => Some("expression"),
            Hidden::Pattern => Some("pattern"),
            Hidden::Statement => Some("statement"),
            _ => None,
        }
    }
}

impl Symbol {
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Node(kind) => kind.as_str(),
            Symbol::Hidden(hidden) => hidden.as_str(),
        }
    }

    pub fn label(self) -> Option<&'static str> {
        match self {
            Symbol::Node(_) => None,
            Symbol::Hidden(hidden) => hidden.label(),
        }
    }

    pub fn is_hidden(self) -> bool {
        matches!(self, Symbol::Hidden(_))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<NodeKind> for Symbol {
    fn from(kind: NodeKind) -> Self {
        Symbol::Node(kind)
    }
}

impl From<Hidden> for Symbol {
    fn from(hidden: Hidden) -> Self {
        Symbol::Hidden(hidden)
    }
}
