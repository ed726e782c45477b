//! Error recovery support for the parser.
//!
//! Recovery needs two things: the keywords that start a statement, where
//! skipping stops, and for every token the closing delimiter of the bracket
//! around it, which bounds how far skipping may go.

use ziust_lexer::{Keyword, Token, TokenKind};

/// Keywords that start a new statement.
pub const STMT_STARTS: &[Keyword] = &[
    Keyword::Pub,
    Keyword::Struct,
    Keyword::Enum,
    Keyword::Type,
    Keyword::Trait,
    Keyword::Impl,
    Keyword::Const,
    Keyword::Fn,
    Keyword::Let,
    Keyword::Defer,
    Keyword::Errdefer,
    Keyword::Test,
    Keyword::If,
    Keyword::For,
    Keyword::While,
    Keyword::Loop,
    Keyword::Match,
    Keyword::Return,
    Keyword::Break,
    Keyword::Continue,
];

/// Check if a token starts a statement.
pub fn is_stmt_start(kind: TokenKind) -> bool {
    match kind {
        TokenKind::Keyword(kw) => STMT_STARTS.contains(&kw),
        _ => false,
    }
}

/// A place a missing closer may be inserted: end of input, a closing
/// delimiter or the start of the next statement.
pub fn is_close_point(kind: TokenKind) -> bool {
    kind == TokenKind::Eof || kind.is_closing_delimiter() || is_stmt_start(kind)
}

/// Bracket kinds tracked for recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterKind {
    Paren,   // )
    Bracket, // ]
    Brace,   // }
}

impl DelimiterKind {
    pub fn from_opening(kind: TokenKind) -> Option<DelimiterKind> {
        match kind {
            TokenKind::LParen => Some(DelimiterKind::Paren),
            TokenKind::LBracket => Some(DelimiterKind::Bracket),
            TokenKind::LBrace => Some(DelimiterKind::Brace),
            _ => None,
        }
    }

    pub fn from_closing(kind: TokenKind) -> Option<DelimiterKind> {
        match kind {
            TokenKind::RParen => Some(DelimiterKind::Paren),
            TokenKind::RBracket => Some(DelimiterKind::Bracket),
            TokenKind::RBrace => Some(DelimiterKind::Brace),
            _ => None,
        }
    }

    pub fn closing_token(&self) -> TokenKind {
        match self {
            DelimiterKind::Paren => TokenKind::RParen,
            DelimiterKind::Bracket => TokenKind::RBracket,
            DelimiterKind::Brace => TokenKind::RBrace,
        }
    }
}

/// Bracket structure of a token stream, computed once before parsing.
///
/// A closer matching an opener deeper in the stack force-closes the openers
/// above it; a closer matching nothing is stray and ignored.
/// 在解析前一次性计算的括号结构。
#[derive(Debug, Clone, Default)]
pub struct BracketMap {
    /// For openers: index of the closer that ends them.
    closer: Vec<Option<usize>>,
    /// For every token: index of the closer of the innermost bracket around
    /// it. A matched closer maps to itself.
    enclosing: Vec<Option<usize>>,
}

impl BracketMap {
    /// `tokens` are significant tokens only.
    pub fn new(tokens: &[Token]) -> Self {
        let mut closer = vec![None; tokens.len()];
        let mut stack: Vec<(DelimiterKind, usize)> = Vec::new();

        for (index, token) in tokens.iter().enumerate() {
            if let Some(kind) = DelimiterKind::from_opening(token.kind) {
                stack.push((kind, index));
            } else if let Some(kind) = DelimiterKind::from_closing(token.kind) {
                let Some(depth) = stack.iter().rposition(|&(open, _)| open == kind) else {
                    continue;
                };
                for (_, open) in stack.drain(depth..) {
                    closer[open] = Some(index);
                }
            }
        }

        let mut enclosing = vec![None; tokens.len()];
        let mut open: Vec<Option<usize>> = Vec::new();
        for index in 0..tokens.len() {
            if open.last() == Some(&Some(index)) {
                enclosing[index] = Some(index);
                while open.last() == Some(&Some(index)) {
                    open.pop();
                }
                continue;
            }
            enclosing[index] = open.last().copied().flatten();
            if DelimiterKind::from_opening(tokens[index].kind).is_some() {
                open.push(closer[index]);
            }
        }

        Self { closer, enclosing }
    }

    /// The closer of an opener, if it has one.
    pub fn closer_of(&self, index: usize) -> Option<usize> {
        self.closer.get(index).copied().flatten()
    }

    /// The closer bounding recovery at `index`; `None` means end of input.
    pub fn limit(&self, index: usize) -> Option<usize> {
        self.enclosing.get(index).copied().flatten()
    }

    /// True if the token at `index` closes some opener.
    pub fn is_matched_closer(&self, index: usize) -> bool {
        self.limit(index) == Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ziust_lexer::Lexer;

    fn significant(source: &str) -> Vec<Token> {
        let (tokens, _) = Lexer::new(source).tokenize();
        tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect()
    }

    #[test]
    fn test_is_stmt_start() {
        assert!(is_stmt_start(TokenKind::Keyword(Keyword::Let)));
        assert!(is_stmt_start(TokenKind::Keyword(Keyword::Errdefer)));
        assert!(!is_stmt_start(TokenKind::Keyword(Keyword::Else)));
        assert!(!is_stmt_start(TokenKind::Plus));
    }

    #[test]
    fn test_nested_brackets() {
        // { ( a ) b }
        let map = BracketMap::new(&significant("{ ( a ) b }"));
        assert_eq!(map.closer_of(0), Some(5));
        assert_eq!(map.closer_of(1), Some(3));
        assert_eq!(map.limit(2), Some(3));
        assert_eq!(map.limit(4), Some(5));
        assert_eq!(map.limit(1), Some(5));
        assert!(map.is_matched_closer(3));
        assert_eq!(map.limit(6), None);
    }

    #[test]
    fn test_force_close_and_stray() {
        // { ( a } ) b
        let map = BracketMap::new(&significant("{ ( a } ) b"));
        assert_eq!(map.closer_of(0), Some(3));
        assert_eq!(map.closer_of(1), Some(3));
        assert_eq!(map.limit(2), Some(3));
        assert!(!map.is_matched_closer(4));
        assert_eq!(map.limit(5), None);
    }

    #[test]
    fn test_unclosed_opener() {
        let map = BracketMap::new(&significant("( a"));
        assert_eq!(map.closer_of(0), None);
        assert_eq!(map.limit(1), None);
    }
}
