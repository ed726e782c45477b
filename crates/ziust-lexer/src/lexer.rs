//! The lexer implementation.
//! 词法分析器实现。
//!
//! Scanning is done by a `logos` state machine over [`RawToken`]; the
//! [`Lexer`] wrapper classifies words into keywords and value literals,
//! turns scan failures into error tokens and records a diagnostic for each.

use logos::Logos;
use ziust_common::Span;
use ziust_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode, Label};

use crate::token::{Keyword, LexErrorKind, Token, TokenKind, is_value_literal};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
enum RawToken {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,
    #[token("//", line_comment)]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Word,
    #[regex(r"'[A-Za-z_$][A-Za-z0-9_$]*")]
    Label,
    #[regex(r"[0-9]+", decimal)]
    Decimal,
    #[regex(r"0[bB][01]+|0[oO][0-7]+|0[xX][0-9a-fA-F]+", radix)]
    Radix,
    #[token("\"", string)]
    String,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token(".")]
    Dot,
    #[token("..")]
    DotDot,
    #[token(".*")]
    DotStar,
    #[token(".&")]
    DotAmp,
    #[token("=")]
    Eq,
    #[token("=>")]
    FatArrow,
    #[token("->")]
    Arrow,
    #[token("&")]
    Amp,
    #[token("&&")]
    AmpAmp,
    #[token("|")]
    Pipe,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("#")]
    Hash,
    #[token("@")]
    At,

    // Catch-all (lowest priority)
    #[regex(r".", priority = 0)]
    Unexpected,
}

fn line_comment(lex: &mut logos::Lexer<'_, RawToken>) {
    let rest = lex.remainder();
    let end = rest.find(['\n', '\r']).unwrap_or(rest.len());
    lex.bump(end);
}

/// Block comments run to the first `*/`; they do not nest.
fn block_comment(lex: &mut logos::Lexer<'_, RawToken>) -> Result<(), LexErrorKind> {
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => {
            lex.bump(rest.len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

fn string(lex: &mut logos::Lexer<'_, RawToken>) -> Result<(), LexErrorKind> {
    let rest = lex.remainder();
    let mut chars = rest.char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '"' => {
                lex.bump(i + 1);
                return Ok(());
            }
            _ => {}
        }
    }
    lex.bump(rest.len());
    Err(LexErrorKind::UnterminatedString)
}

/// Extends a run of digits with an optional fraction and exponent.
///
/// A number written directly after `.` is a tuple index and never takes a
/// fraction, so `t.0.1` lexes as two indices.
fn decimal(lex: &mut logos::Lexer<'_, RawToken>) -> Result<(), LexErrorKind> {
    let start = lex.span().start;
    let after_dot = lex.source()[..start].ends_with('.');
    if lex.slice().len() > 1 && lex.slice().starts_with('0') {
        return malformed(lex);
    }

    let rest = lex.remainder().as_bytes();
    let mut len = 0;
    if !after_dot && rest.first() == Some(&b'.') && rest.get(1).is_some_and(u8::is_ascii_digit) {
        len = 1 + count_digits(&rest[1..]);
    }
    if matches!(rest.get(len), Some(b'e' | b'E')) {
        let mut exp = len + 1;
        if matches!(rest.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let digits = count_digits(&rest[exp.min(rest.len())..]);
        if digits > 0 {
            len = exp + digits;
        }
    }
    lex.bump(len);
    reject_trailing_word(lex)
}

fn radix(lex: &mut logos::Lexer<'_, RawToken>) -> Result<(), LexErrorKind> {
    reject_trailing_word(lex)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// `12ab`, `0x` and `0b102` are a single malformed number, not a number
/// followed by a word.
fn reject_trailing_word(lex: &mut logos::Lexer<'_, RawToken>) -> Result<(), LexErrorKind> {
    let tail = lex
        .remainder()
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'$')
        .count();
    if tail == 0 {
        return Ok(());
    }
    lex.bump(tail);
    Err(LexErrorKind::MalformedNumber)
}

fn malformed(lex: &mut logos::Lexer<'_, RawToken>) -> Result<(), LexErrorKind> {
    let _ = reject_trailing_word(lex);
    Err(LexErrorKind::MalformedNumber)
}

/// The Ziust lexer.
///
/// `Lexer` is an iterator of tokens (trivia included) that ends with a single
/// [`TokenKind::Eof`]; [`Lexer::tokenize`] drains it and hands back the
/// diagnostics collected along the way.
pub struct Lexer<'src> {
    source: &'src str,
    raw: logos::Lexer<'src, RawToken>,
    diagnostics: Vec<Diagnostic>,
    done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            raw: RawToken::lexer(source),
            diagnostics: Vec::new(),
            done: false,
        }
    }

    /// Tokenize the entire source.
    /// 对整个源码进行词法分析。
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let tokens = self.by_ref().collect();
        (tokens, self.diagnostics)
    }

    /// Diagnostics produced so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn classify(&self, raw: RawToken, text: &str) -> TokenKind {
        match raw {
            RawToken::Whitespace => TokenKind::Whitespace,
            RawToken::LineComment | RawToken::BlockComment => TokenKind::Comment,
            RawToken::Word => {
                if let Some(kw) = Keyword::from_ident(text) {
                    TokenKind::Keyword(kw)
                } else if is_value_literal(text) {
                    TokenKind::ValueLiteral
                } else {
                    TokenKind::Identifier
                }
            }
            RawToken::Label => TokenKind::Label,
            RawToken::Decimal | RawToken::Radix => TokenKind::Number,
            RawToken::String => TokenKind::String,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Colon => TokenKind::Colon,
            RawToken::ColonColon => TokenKind::ColonColon,
            RawToken::Dot => TokenKind::Dot,
            RawToken::DotDot => TokenKind::DotDot,
            RawToken::DotStar => TokenKind::DotStar,
            RawToken::DotAmp => TokenKind::DotAmp,
            RawToken::Eq => TokenKind::Eq,
            RawToken::FatArrow => TokenKind::FatArrow,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::Amp => TokenKind::Amp,
            RawToken::AmpAmp => TokenKind::AmpAmp,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::PipePipe => TokenKind::PipePipe,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Question => TokenKind::Question,
            RawToken::Star => TokenKind::Star,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Hash => TokenKind::Hash,
            RawToken::At => TokenKind::At,
            RawToken::Unexpected => TokenKind::Error(LexErrorKind::UnexpectedCharacter),
        }
    }

    /// Record a diagnostic for an error token.
    /// 为错误 token 记录诊断信息。
    fn report(&mut self, kind: LexErrorKind, span: Span) {
        let text = &self.source[span.range()];
        let (code, message, label) = match kind {
            LexErrorKind::UnexpectedCharacter => (
                ErrorCode::UnexpectedCharacter,
                format!("unexpected character `{}`", text.escape_debug()),
                "unexpected character here",
            ),
            LexErrorKind::UnterminatedString => (
                ErrorCode::UnterminatedString,
                kind.to_string(),
                "string starts here",
            ),
            LexErrorKind::UnterminatedComment => (
                ErrorCode::UnterminatedComment,
                kind.to_string(),
                "comment starts here",
            ),
            LexErrorKind::MalformedNumber => (
                ErrorCode::InvalidNumber,
                format!("malformed number literal `{}`", text),
                "not a valid number",
            ),
        };
        let label_span = match kind {
            LexErrorKind::UnterminatedString | LexErrorKind::UnterminatedComment => {
                Span::new(span.start, span.start.offset(1))
            }
            _ => span,
        };
        self.diagnostics.push(
            Diagnostic::error(DiagnosticKind::Lexer, span, message)
                .with_code(code)
                .with_label(Label::new(label_span, label)),
        );
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let Some(result) = self.raw.next() else {
            self.done = true;
            let end = self.source.len();
            return Some(Token::new(TokenKind::Eof, Span::from_usize(end, end)));
        };
        let range = self.raw.span();
        let span = Span::from_usize(range.start, range.end);
        let kind = match result {
            Ok(RawToken::Unexpected) => {
                self.report(LexErrorKind::UnexpectedCharacter, span);
                TokenKind::Error(LexErrorKind::UnexpectedCharacter)
            }
            Ok(raw) => self.classify(raw, self.raw.slice()),
            Err(err) => {
                self.report(err, span);
                TokenKind::Error(err)
            }
        };
        Some(Token::new(kind, span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, _) = Lexer::new(source).tokenize();
        tokens
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("struct structs errdefer _x $y"),
            vec![
                TokenKind::Keyword(Keyword::Struct),
                TokenKind::Identifier,
                TokenKind::Keyword(Keyword::Errdefer),
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_value_literals() {
        assert_eq!(
            kinds("true null undefined truthy"),
            vec![
                TokenKind::ValueLiteral,
                TokenKind::ValueLiteral,
                TokenKind::ValueLiteral,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tuple_index_has_no_fraction() {
        let (tokens, diagnostics) = Lexer::new("t.0.1 2.5").tokenize();
        assert!(diagnostics.is_empty());
        let texts: Vec<_> = tokens
            .iter()
            .filter(|t| !t.kind.is_trivia() && t.kind != TokenKind::Eof)
            .map(|t| t.text("t.0.1 2.5"))
            .collect();
        assert_eq!(texts, vec!["t", ".", "0", ".", "1", "2.5"]);
    }

    #[test]
    fn test_exponent_and_radix() {
        let source = "1e10 2.5E-3 1E+3 0b101 0o17 0xFF 0B1 0O7 0X1f";
        let (tokens, diagnostics) = Lexer::new(source).tokenize();
        assert!(diagnostics.is_empty());
        let numbers: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Number)
            .map(|t| t.text(source))
            .collect();
        assert_eq!(
            numbers,
            vec!["1e10", "2.5E-3", "1E+3", "0b101", "0o17", "0xFF", "0B1", "0O7", "0X1f"]
        );
    }

    #[test]
    fn test_malformed_numbers() {
        for source in ["007", "0x", "0X", "12ab", "0b102", "0B2"] {
            let (tokens, diagnostics) = Lexer::new(source).tokenize();
            assert_eq!(
                tokens[0].kind,
                TokenKind::Error(LexErrorKind::MalformedNumber),
                "{source}"
            );
            assert_eq!(tokens[0].span.len(), source.len(), "{source}");
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].code, Some(ErrorCode::InvalidNumber));
        }
    }

    #[test]
    fn test_unterminated_string() {
        let (tokens, diagnostics) = Lexer::new("\"abc\\\"").tokenize();
        assert_eq!(
            tokens[0].kind,
            TokenKind::Error(LexErrorKind::UnterminatedString)
        );
        assert_eq!(diagnostics[0].code, Some(ErrorCode::UnterminatedString));
    }

    #[test]
    fn test_unexpected_character_is_one_char() {
        let (tokens, diagnostics) = Lexer::new("a ^ é").tokenize();
        let errors: Vec<_> = tokens.iter().filter(|t| t.kind.is_error()).collect();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].span.len(), 'é'.len_utf8());
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_tokens_cover_source() {
        let source = "fn f() { /* c */ x.* // tail\n}";
        let (tokens, _) = Lexer::new(source).tokenize();
        let text: String = tokens.iter().map(|t| t.text(source)).collect();
        assert_eq!(text, source);
    }
}
