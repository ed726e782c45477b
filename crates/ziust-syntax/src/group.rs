//! Balanced-delimiter scanning for macro and attribute bodies.
//! 宏与属性主体的括号平衡扫描。
//!
//! A group is opaque: nothing inside it is parsed. Openers of the group's own
//! kind nest, everything else (other brackets included) is raw text. String
//! literals are single tokens, so delimiters inside them never affect
//! balance.

use ziust_common::{BytePos, Span};
use ziust_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode, Label};
use ziust_lexer::{Token, TokenKind};

use crate::{Element, MAX_NESTING, Node, NodeKind};

/// The four bracket forms a group can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupDelimiter {
    Paren,
    Brace,
    Bracket,
    Angle,
}

impl GroupDelimiter {
    pub fn from_opener(kind: TokenKind) -> Option<GroupDelimiter> {
        match kind {
            TokenKind::LParen => Some(GroupDelimiter::Paren),
            TokenKind::LBrace => Some(GroupDelimiter::Brace),
            TokenKind::LBracket => Some(GroupDelimiter::Bracket),
            TokenKind::Lt => Some(GroupDelimiter::Angle),
            _ => None,
        }
    }

    pub fn open(self) -> TokenKind {
        match self {
            GroupDelimiter::Paren => TokenKind::LParen,
            GroupDelimiter::Brace => TokenKind::LBrace,
            GroupDelimiter::Bracket => TokenKind::LBracket,
            GroupDelimiter::Angle => TokenKind::Lt,
        }
    }

    pub fn close(self) -> TokenKind {
        match self {
            GroupDelimiter::Paren => TokenKind::RParen,
            GroupDelimiter::Brace => TokenKind::RBrace,
            GroupDelimiter::Bracket => TokenKind::RBracket,
            GroupDelimiter::Angle => TokenKind::Gt,
        }
    }
}

/// Result of [`scan_group`].
#[derive(Debug, Clone)]
pub struct GroupScan {
    pub node: Node,
    /// Index of the first token after the group.
    pub end: usize,
    pub diagnostics: Vec<Diagnostic>,
}

struct Frame {
    delimiter: GroupDelimiter,
    opener: Span,
    children: Vec<Element>,
}

/// Scan a group starting at `tokens[start]`.
///
/// `tokens` holds significant tokens only and ends with `Eof`. Returns `None`
/// if `tokens[start]` does not open a group. A group still open at end of
/// input is closed with a missing token and an unclosed-delimiter diagnostic.
/// Groups nested past [`MAX_NESTING`] are kept as flat `ERROR` nodes.
pub fn scan_group(tokens: &[Token], start: usize) -> Option<GroupScan> {
    let first = *tokens.get(start)?;
    let delimiter = GroupDelimiter::from_opener(first.kind)?;
    let mut stack = vec![Frame {
        delimiter,
        opener: first.span,
        children: vec![Element::Token(first)],
    }];
    let mut diagnostics = Vec::new();
    let mut pos = start + 1;

    loop {
        let token = match tokens.get(pos) {
            Some(token) if token.kind != TokenKind::Eof => *token,
            eof => {
                let at = eof.map_or(first.span.end, |t| t.span.start);
                return Some(close_at_eof(stack, at, pos, diagnostics));
            }
        };
        pos += 1;

        let depth = stack.len();
        let Some(frame) = stack.last_mut() else {
            return None;
        };
        if token.kind == frame.delimiter.open() {
            let delimiter = frame.delimiter;
            if depth >= MAX_NESTING {
                let (error, next) = flatten(tokens, pos - 1, delimiter);
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticKind::Parser,
                        token.span,
                        "delimiters nested too deeply",
                    )
                    .with_code(ErrorCode::NestingTooDeep)
                    .with_recovered(error.span),
                );
                frame.children.push(Element::Node(error));
                pos = next;
                continue;
            }
            stack.push(Frame {
                delimiter,
                opener: token.span,
                children: vec![Element::Token(token)],
            });
        } else if token.kind == frame.delimiter.close() {
            frame.children.push(Element::Token(token));
            let node = finish(stack.pop()?);
            match stack.last_mut() {
                Some(parent) => parent.children.push(Element::Node(node)),
                None => {
                    return Some(GroupScan {
                        node,
                        end: pos,
                        diagnostics,
                    });
                }
            }
        } else {
            frame.children.push(Element::Token(token));
        }
    }
}

/// Swallow the group opened at `tokens[start]` token by token, up to its
/// balancing closer or end of input.
fn flatten(tokens: &[Token], start: usize, delimiter: GroupDelimiter) -> (Node, usize) {
    let mut children = Vec::new();
    let mut balance = 0usize;
    let mut pos = start;
    while let Some(&token) = tokens.get(pos) {
        if token.kind == TokenKind::Eof {
            break;
        }
        pos += 1;
        children.push(Element::Token(token));
        if token.kind == delimiter.open() {
            balance += 1;
        } else if token.kind == delimiter.close() {
            balance = balance.saturating_sub(1);
            if balance == 0 {
                break;
            }
        }
    }
    let at = tokens.get(start).map_or(BytePos::ZERO, |t| t.span.start);
    (Node::new(NodeKind::Error, children, vec![], at), pos)
}

fn finish(frame: Frame) -> Node {
    Node::new(NodeKind::Group, frame.children, vec![], frame.opener.start)
}

fn close_at_eof(
    mut stack: Vec<Frame>,
    at: BytePos,
    end: usize,
    mut diagnostics: Vec<Diagnostic>,
) -> GroupScan {
    let unclosed = diagnostics.len();
    let mut closed: Option<Node> = None;
    while let Some(mut frame) = stack.pop() {
        if let Some(inner) = closed.take() {
            frame.children.push(Element::Node(inner));
        }
        let close = frame.delimiter.close();
        frame.children.push(Element::Missing { kind: close, at });
        diagnostics.push(
            Diagnostic::error(
                DiagnosticKind::Parser,
                Span::empty_at(at),
                format!("unclosed delimiter: expected {}", close.describe()),
            )
            .with_code(ErrorCode::UnclosedDelimiter)
            .with_label(Label::new(frame.opener, "unclosed delimiter opened here")),
        );
        closed = Some(finish(frame));
    }
    diagnostics[unclosed..].reverse();
    GroupScan {
        node: closed.unwrap_or_else(|| Node::new(NodeKind::Group, vec![], vec![], at)),
        end,
        diagnostics,
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
    fn test_nested_same_kind() {
        let tokens = significant("(a (b) [c) d");
        let scan = scan_group(&tokens, 0).unwrap();
        assert!(scan.diagnostics.is_empty());
        assert_eq!(scan.end, 8);
        let nested: Vec<_> = scan.node.node_children().collect();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].span, Span::from_usize(3, 6));
    }

    #[test]
    fn test_strings_are_atomic() {
        let source = r#"{ ")" "}" }"#;
        let tokens = significant(source);
        let scan = scan_group(&tokens, 0).unwrap();
        assert_eq!(scan.node.span.range(), 0..source.len());
        assert!(scan.diagnostics.is_empty());
    }

    #[test]
    fn test_angle_group() {
        let tokens = significant("<T, <U>> x");
        let scan = scan_group(&tokens, 0).unwrap();
        assert_eq!(scan.end, 7);
    }

    #[test]
    fn test_unclosed_group() {
        let tokens = significant("[a [b");
        let scan = scan_group(&tokens, 0).unwrap();
        assert_eq!(scan.diagnostics.len(), 2);
        assert_eq!(scan.diagnostics[0].code, Some(ErrorCode::UnclosedDelimiter));
        assert!(scan.node.has_error());
        assert_eq!(scan.end, tokens.len() - 1);
    }

    #[test]
    fn test_nesting_past_the_limit_is_flattened() {
        let depth = MAX_NESTING + 50;
        let source = format!("{}x{} y", "(".repeat(depth), ")".repeat(depth));
        let tokens = significant(&source);
        let scan = scan_group(&tokens, 0).unwrap();
        assert_eq!(scan.end, tokens.len() - 2);
        assert_eq!(scan.node.span.range(), 0..2 * depth + 1);
        assert_eq!(scan.diagnostics.len(), 1);
        assert_eq!(scan.diagnostics[0].code, Some(ErrorCode::NestingTooDeep));
        assert_eq!(scan.diagnostics[0].offset(), MAX_NESTING);

        let groups = scan.node.descendants().filter(|n| n.kind == NodeKind::Group).count();
        assert_eq!(groups, MAX_NESTING);
        let error = scan.node.descendants().find(|n| n.kind.is_error()).unwrap();
        assert_eq!(error.span, Span::from_usize(MAX_NESTING, 2 * depth + 1 - MAX_NESTING));
        assert!(error.node_children().next().is_none());
    }

    #[test]
    fn test_unclosed_past_the_limit() {
        let source = "{".repeat(MAX_NESTING + 3);
        let tokens = significant(&source);
        let scan = scan_group(&tokens, 0).unwrap();
        assert_eq!(scan.end, tokens.len() - 1);
        let codes: Vec<_> = scan.diagnostics.iter().filter_map(|d| d.code).collect();
        assert_eq!(codes.len(), MAX_NESTING + 1);
        assert!(codes.contains(&ErrorCode::NestingTooDeep));
    }

    #[test]
    fn test_not_an_opener() {
        let tokens = significant("x");
        assert!(scan_group(&tokens, 0).is_none());
    }
}
