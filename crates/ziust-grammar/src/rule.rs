//! The rule algebra.
//! 规则代数。

use std::fmt;

use ziust_lexer::{Keyword, TokenKind};
use ziust_syntax::NodeKind;

use crate::resolver::Conflict;
use crate::symbol::{Hidden, Symbol};

/// A grammar rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Matches nothing, always succeeds.
    Empty,
    /// One token of exactly this kind.
    Token(TokenKind),
    /// Another nonterminal.
    Symbol(Symbol),
    Seq(Vec<Rule>),
    /// Alternatives. Untagged choices are ordered; tagged ones are resolved
    /// through the conflict table.
    Choice {
        alternatives: Vec<Rule>,
        conflict: Option<Conflict>,
    },
    /// Zero or more.
    Repeat(Box<Rule>),
    /// Attach a field name to everything the inner rule produces.
    Field(&'static str, Box<Rule>),
    /// Succeeds without consuming if the inner rule would match.
    Lookahead(Box<Rule>),
    /// Succeeds without consuming if the inner rule would not match.
    Not(Box<Rule>),
    /// Binary operators over `operand`, by the operator table.
    Infix { operand: Symbol, min_precedence: u8 },
    /// `base suffix*`, each suffix wrapping what came before into a `node`
    /// whose `field` holds the previous value.
    Postfix {
        base: Symbol,
        suffix: Box<Rule>,
        node: NodeKind,
        field: &'static str,
    },
    /// Items up to `close`, optionally separated, with error recovery.
    /// The closing token itself is not consumed.
    List {
        item: Box<Rule>,
        separator: Option<TokenKind>,
        close: TokenKind,
    },
    /// A closing delimiter that is inserted as missing when absent at a
    /// synchronization point.
    Close(TokenKind),
    /// An opaque balanced-delimiter group.
    Group,
}

impl Rule {
    /// Symbols this rule refers to directly or through nested rules.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut out = Vec::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut Vec<Symbol>) {
        match self {
            Rule::Symbol(symbol) => out.push(*symbol),
            Rule::Seq(rules) | Rule::Choice { alternatives: rules, .. } => {
                for rule in rules {
                    rule.collect_symbols(out);
                }
            }
            Rule::Repeat(inner)
            | Rule::Field(_, inner)
            | Rule::Lookahead(inner)
            | Rule::Not(inner)
            | Rule::List { item: inner, .. } => inner.collect_symbols(out),
            Rule::Infix { operand, .. } => {
                out.push(*operand);
                out.push(Symbol::Hidden(Hidden::Type));
            }
            Rule::Postfix { base, suffix, .. } => {
                out.push(*base);
                suffix.collect_symbols(out);
            }
            Rule::Empty | Rule::Token(_) | Rule::Close(_) | Rule::Group => {}
        }
    }

    /// Field names this rule can attach.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields(&self, out: &mut Vec<&'static str>) {
        match self {
            Rule::Field(name, inner) => {
                out.push(*name);
                inner.collect_fields(out);
            }
            Rule::Seq(rules) | Rule::Choice { alternatives: rules, .. } => {
                for rule in rules {
                    rule.collect_fields(out);
                }
            }
            Rule::Repeat(inner)
            | Rule::Lookahead(inner)
            | Rule::Not(inner)
            | Rule::List { item: inner, .. } => inner.collect_fields(out),
            Rule::Postfix { suffix, field, .. } => {
                out.push(*field);
                suffix.collect_fields(out);
            }
            Rule::Empty
            | Rule::Token(_)
            | Rule::Symbol(_)
            | Rule::Infix { .. }
            | Rule::Close(_)
            | Rule::Group => {}
        }
    }
}

// Builders

pub fn tok(kind: TokenKind) -> Rule {
    Rule::Token(kind)
}

pub fn kw(keyword: Keyword) -> Rule {
    Rule::Token(TokenKind::Keyword(keyword))
}

pub fn ident() -> Rule {
    Rule::Token(TokenKind::Identifier)
}

pub fn node(kind: NodeKind) -> Rule {
    Rule::Symbol(Symbol::Node(kind))
}

pub fn hidden(hidden: Hidden) -> Rule {
    Rule::Symbol(Symbol::Hidden(hidden))
}

pub fn seq(rules: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Seq(rules.into_iter().collect())
}

pub fn choice(alternatives: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Choice {
        alternatives: alternatives.into_iter().collect(),
        conflict: None,
    }
}

pub fn choice_in(conflict: Conflict, alternatives: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Choice {
        alternatives: alternatives.into_iter().collect(),
        conflict: Some(conflict),
    }
}

pub fn opt(rule: Rule) -> Rule {
    choice([rule, Rule::Empty])
}

pub fn opt_in(conflict: Conflict, rule: Rule) -> Rule {
    choice_in(conflict, [rule, Rule::Empty])
}

pub fn rep(rule: Rule) -> Rule {
    Rule::Repeat(Box::new(rule))
}

pub fn field(name: &'static str, rule: Rule) -> Rule {
    Rule::Field(name, Box::new(rule))
}

pub fn lookahead(rule: Rule) -> Rule {
    Rule::Lookahead(Box::new(rule))
}

pub fn not(rule: Rule) -> Rule {
    Rule::Not(Box::new(rule))
}

pub fn infix(operand: Hidden, min_precedence: u8) -> Rule {
    Rule::Infix {
        operand: Symbol::Hidden(operand),
        min_precedence,
    }
}

pub fn postfix(base: Hidden, suffix: Rule, node: NodeKind, field: &'static str) -> Rule {
    Rule::Postfix {
        base: Symbol::Hidden(base),
        suffix: Box::new(suffix),
        node,
        field,
    }
}

pub fn list(item: Rule, separator: Option<TokenKind>, close: TokenKind) -> Rule {
    Rule::List {
        item: Box::new(item),
        separator,
        close,
    }
}

pub fn close(kind: TokenKind) -> Rule {
    Rule::Close(kind)
}

pub fn group() -> Rule {
    Rule::Group
}

/// `open list(item, sep, close) close`, the closer insertable.
pub fn delimited(open: TokenKind, item: Rule, separator: Option<TokenKind>, closer: TokenKind) -> Rule {
    seq([tok(open), list(item, separator, closer), close(closer)])
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Empty => f.write_str("()"),
            Rule::Token(TokenKind::Identifier) => f.write_str("IDENT"),
            Rule::Token(TokenKind::Number) => f.write_str("NUMBER"),
            Rule::Token(TokenKind::String) => f.write_str("STRING"),
            Rule::Token(TokenKind::ValueLiteral) => f.write_str("VALUE_LITERAL"),
            Rule::Token(TokenKind::Label) => f.write_str("LABEL"),
            Rule::Token(kind) => write!(f, "'{}'", kind.name()),
            Rule::Symbol(symbol) => write!(f, "{symbol}"),
            Rule::Seq(rules) => {
                f.write_str("(")?;
                for (i, rule) in rules.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{rule}")?;
                }
                f.write_str(")")
            }
            Rule::Choice {
                alternatives,
                conflict,
            } => {
                if let [rule, Rule::Empty] = alternatives.as_slice() {
                    write!(f, "{rule}?")?;
                } else {
                    f.write_str("(")?;
                    for (i, rule) in alternatives.iter().enumerate() {
                        if i > 0 {
                            f.write_str(" | ")?;
                        }
                        write!(f, "{rule}")?;
                    }
                    f.write_str(")")?;
                }
                match conflict {
                    Some(conflict) => write!(f, "@{conflict:?}"),
                    None => Ok(()),
                }
            }
            Rule::Repeat(inner) => write!(f, "{inner}*"),
            Rule::Field(name, inner) => write!(f, "{name}:{inner}"),
            Rule::Lookahead(inner) => write!(f, "&{inner}"),
            Rule::Not(inner) => write!(f, "!{inner}"),
            Rule::Infix {
                operand,
                min_precedence,
            } => write!(f, "infix({operand}, {min_precedence})"),
            Rule::Postfix {
                base,
                suffix,
                node,
                field,
            } => write!(f, "postfix({base}, {suffix}) -> {node}({field})"),
            Rule::List {
                item,
                separator,
                close,
            } => match separator {
                Some(sep) => write!(f, "list({item}, '{}', '{}')", sep.name(), close.name()),
                None => write!(f, "list({item}, -, '{}')", close.name()),
            },
            Rule::Close(kind) => write!(f, "'{}'", kind.name()),
            Rule::Group => f.write_str("group"),
        }
    }
}
