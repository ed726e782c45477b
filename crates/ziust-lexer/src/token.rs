//! Token definitions for Ziust.

use std::fmt;

use serde::Serialize;
use ziust_common::Span;

/// A token with its kind and span.
///
/// Tokens do not own their text; use [`Token::text`] with the source the
/// token was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The source text covered by this token.
    /// 此 token 覆盖的源码文本。
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        &source[self.span.range()]
    }
}

/// The reason a span of input could not be lexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, thiserror::Error)]
pub enum LexErrorKind {
    #[default]
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("malformed number literal")]
    MalformedNumber,
}

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Literals
    Identifier,
    Keyword(Keyword),
    Number,
    String,
    /// `true`, `false`, `null` or `undefined`
    ValueLiteral,
    /// `'name`
    Label,

    // Delimiters
    LBrace,   // {
    RBrace,   // }
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Lt,       // <
    Gt,       // >

    // Punctuation
    Comma,      // ,
    Semicolon,  // ;
    Colon,      // :
    ColonColon, // ::
    Dot,        // .
    DotDot,     // ..
    DotStar,    // .*
    DotAmp,     // .&
    Eq,         // =
    FatArrow,   // =>
    Arrow,      // ->
    Amp,        // &
    AmpAmp,     // &&
    Pipe,       // |
    PipePipe,   // ||
    Bang,       // !
    Question,   // ?
    Star,       // *
    Plus,       // +
    Hash,       // #
    At,         // @

    // Trivia
    Whitespace,
    Comment,

    // Special
    Error(LexErrorKind),
    Eof,
}

impl TokenKind {
    /// Whitespace and comments: kept for round-trip, invisible to the grammar.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    pub fn is_keyword(&self) -> bool {
        matches!(self, TokenKind::Keyword(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TokenKind::Error(_))
    }

    /// Tokens that show up by kind in a rendered tree.
    pub fn is_named(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::ValueLiteral
                | TokenKind::Label
                | TokenKind::Error(_)
        )
    }

    /// Returns true for `{`, `(` and `[`.
    pub fn is_opening_delimiter(&self) -> bool {
        matches!(
            self,
            TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket
        )
    }

    /// Returns true for `}`, `)` and `]`.
    pub fn is_closing_delimiter(&self) -> bool {
        matches!(
            self,
            TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket
        )
    }

    /// The closer matching an opening delimiter.
    pub fn matching_closer(&self) -> Option<TokenKind> {
        match self {
            TokenKind::LBrace => Some(TokenKind::RBrace),
            TokenKind::LParen => Some(TokenKind::RParen),
            TokenKind::LBracket => Some(TokenKind::RBracket),
            TokenKind::Lt => Some(TokenKind::Gt),
            _ => None,
        }
    }

    /// Stable name used in rendered trees and expectation lists.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Keyword(kw) => kw.as_str(),
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::ValueLiteral => "value_literal",
            TokenKind::Label => "label",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::ColonColon => "::",
            TokenKind::Dot => ".",
            TokenKind::DotDot => "..",
            TokenKind::DotStar => ".*",
            TokenKind::DotAmp => ".&",
            TokenKind::Eq => "=",
            TokenKind::FatArrow => "=>",
            TokenKind::Arrow => "->",
            TokenKind::Amp => "&",
            TokenKind::AmpAmp => "&&",
            TokenKind::Pipe => "|",
            TokenKind::PipePipe => "||",
            TokenKind::Bang => "!",
            TokenKind::Question => "?",
            TokenKind::Star => "*",
            TokenKind::Plus => "+",
            TokenKind::Hash => "#",
            TokenKind::At => "@",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Comment => "comment",
            TokenKind::Error(_) => "error",
            TokenKind::Eof => "end of input",
        }
    }

    /// Human readable form for "expected ..." messages: punctuation and
    /// keywords are quoted, everything else is described.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string literal",
            TokenKind::ValueLiteral => "literal",
            TokenKind::Label => "label",
            TokenKind::Keyword(kw) => kw.quoted(),
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Colon => "`:`",
            TokenKind::ColonColon => "`::`",
            TokenKind::Dot => "`.`",
            TokenKind::DotDot => "`..`",
            TokenKind::DotStar => "`.*`",
            TokenKind::DotAmp => "`.&`",
            TokenKind::Eq => "`=`",
            TokenKind::FatArrow => "`=>`",
            TokenKind::Arrow => "`->`",
            TokenKind::Amp => "`&`",
            TokenKind::AmpAmp => "`&&`",
            TokenKind::Pipe => "`|`",
            TokenKind::PipePipe => "`||`",
            TokenKind::Bang => "`!`",
            TokenKind::Question => "`?`",
            TokenKind::Star => "`*`",
            TokenKind::Plus => "`+`",
            TokenKind::Hash => "`#`",
            TokenKind::At => "`@`",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Comment => "comment",
            TokenKind::Error(_) => "invalid token",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// The closed keyword set.
/// 关键字集合（封闭）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    Pub,
    Struct,
    Enum,
    Type,
    Trait,
    Impl,
    For,
    Const,
    Fn,
    Let,
    Else,
    If,
    Match,
    Loop,
    While,
    In,
    Return,
    Break,
    Continue,
    Defer,
    Errdefer,
    Test,
    As,
    Mut,
}

impl Keyword {
    pub const ALL: [Keyword; 24] = [
        Keyword::Pub,
        Keyword::Struct,
        Keyword::Enum,
        Keyword::Type,
        Keyword::Trait,
        Keyword::Impl,
        Keyword::For,
        Keyword::Const,
        Keyword::Fn,
        Keyword::Let,
        Keyword::Else,
        Keyword::If,
        Keyword::Match,
        Keyword::Loop,
        Keyword::While,
        Keyword::In,
        Keyword::Return,
        Keyword::Break,
        Keyword::Continue,
        Keyword::Defer,
        Keyword::Errdefer,
        Keyword::Test,
        Keyword::As,
        Keyword::Mut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Pub => "pub",
            Keyword::Struct => "struct",
            Keyword::Enum => "enum",
            Keyword::Type => "type",
            Keyword::Trait => "trait",
            Keyword::Impl => "impl",
            Keyword::For => "for",
            Keyword::Const => "const",
            Keyword::Fn => "fn",
            Keyword::Let => "let",
            Keyword::Else => "else",
            Keyword::If => "if",
            Keyword::Match => "match",
            Keyword::Loop => "loop",
            Keyword::While => "while",
            Keyword::In => "in",
            Keyword::Return => "return",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
            Keyword::Defer => "defer",
            Keyword::Errdefer => "errdefer",
            Keyword::Test => "test",
            Keyword::As => "as",
            Keyword::Mut => "mut",
        }
    }

    fn quoted(&self) -> &'static str {
        match self {
            Keyword::Pub => "`pub`",
            Keyword::Struct => "`struct`",
            Keyword::Enum => "`enum`",
            Keyword::Type => "`type`",
            Keyword::Trait => "`trait`",
            Keyword::Impl => "`impl`",
            Keyword::For => "`for`",
            Keyword::Const => "`const`",
            Keyword::Fn => "`fn`",
            Keyword::Let => "`let`",
            Keyword::Else => "`else`",
            Keyword::If => "`if`",
            Keyword::Match => "`match`",
            Keyword::Loop => "`loop`",
            Keyword::While => "`while`",
            Keyword::In => "`in`",
            Keyword::Return => "`return`",
            Keyword::Break => "`break`",
            Keyword::Continue => "`continue`",
            Keyword::Defer => "`defer`",
            Keyword::Errdefer => "`errdefer`",
            Keyword::Test => "`test`",
            Keyword::As => "`as`",
            Keyword::Mut => "`mut`",
        }
    }

    /// Returns the keyword for an identifier-shaped lexeme, if any.
    pub fn from_ident(s: &str) -> Option<Keyword> {
        Keyword::ALL.into_iter().find(|kw| kw.as_str() == s)
    }
}

/// Returns true if `s` is one of the value literals.
pub(crate) fn is_value_literal(s: &str) -> bool {
    matches!(s, "true" | "false" | "null" | "undefined")
}
