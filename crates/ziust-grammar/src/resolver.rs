//! Conflict and precedence tables.
//! 冲突与优先级表。
//!
//! The grammar is ambiguous at a handful of points. Each such point is a
//! choice tagged with a [`Conflict`]; the parser looks the tag up in
//! [`CONFLICTS`] instead of deciding locally. Binary operators are resolved by
//! precedence climbing over [`OPERATORS`].

use ziust_lexer::{Keyword, TokenKind};
use ziust_syntax::NodeKind;

/// A point where the grammar alone admits more than one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conflict {
    /// `a.b.c` continuing a path vs. ending it and starting something else.
    PathContinuation,
    /// `if`/`loop`/`match`/block at statement position.
    StatementVsExpression,
    /// `let p = e;` vs. `let p = e else { .. }`.
    LetElse,
    /// `[`/`<` after `impl`, `struct Name`, `fn name`, ...
    PathVsParameters,
    /// The optional operand of `return`/`break`.
    ReturnOperand,
}

/// How a tagged choice picks among its alternatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// First alternative that succeeds.
    Ordered,
    /// All alternatives are tried; the one ending furthest wins, ties go to
    /// the earlier alternative.
    Longest,
    /// Like `Longest`, for prefix operands: the operand is parsed at
    /// [`PREFIX_OPERAND_PRECEDENCE`] so every binary operator binds inside it.
    Greedy,
}

pub const CONFLICTS: &[(Conflict, Resolution)] = &[
    (Conflict::PathContinuation, Resolution::Longest),
    (Conflict::StatementVsExpression, Resolution::Ordered),
    (Conflict::LetElse, Resolution::Longest),
    (Conflict::PathVsParameters, Resolution::Ordered),
    (Conflict::ReturnOperand, Resolution::Greedy),
];

pub fn resolve(conflict: Conflict) -> Resolution {
    CONFLICTS
        .iter()
        .find(|(c, _)| *c == conflict)
        .map_or(Resolution::Ordered, |&(_, resolution)| resolution)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// What follows a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Expression,
    Type,
}

/// One row of the operator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator {
    pub token: TokenKind,
    pub precedence: u8,
    pub assoc: Assoc,
    pub node: NodeKind,
    pub left_field: &'static str,
    pub right_field: &'static str,
    pub right: Operand,
}

impl Operator {
    /// Minimum precedence for the right operand.
    pub fn right_precedence(&self) -> u8 {
        match self.assoc {
            Assoc::Left => self.precedence + 1,
            Assoc::Right => self.precedence,
        }
    }
}

/// Binary operators, loosest first. Higher precedence binds tighter.
pub const OPERATORS: &[Operator] = &[
    Operator {
        token: TokenKind::PipePipe,
        precedence: 1,
        assoc: Assoc::Left,
        node: NodeKind::OrExpression,
        left_field: "left",
        right_field: "right",
        right: Operand::Expression,
    },
    Operator {
        token: TokenKind::AmpAmp,
        precedence: 2,
        assoc: Assoc::Left,
        node: NodeKind::AndExpression,
        left_field: "left",
        right_field: "right",
        right: Operand::Expression,
    },
    Operator {
        token: TokenKind::Keyword(Keyword::As),
        precedence: 3,
        assoc: Assoc::Left,
        node: NodeKind::AsExpression,
        left_field: "value",
        right_field: "type",
        right: Operand::Type,
    },
];

/// Precedence at which `return`/`break` operands are parsed.
pub const PREFIX_OPERAND_PRECEDENCE: u8 = 0;

pub fn operator(token: TokenKind) -> Option<&'static Operator> {
    OPERATORS.iter().find(|op| op.token == token)
}
