//! The packrat driver.
//! Packrat 解析驱动。
//!
//! Rules from the grammar are interpreted top-down. Every symbol application
//! is memoized by (token position, symbol), so alternatives that share a
//! prefix never re-parse it and the worst case stays polynomial. Evaluation
//! has no side effects besides the memo: a rule returns what it produced,
//! including any diagnostics raised by recovery inside it, and a discarded
//! alternative takes its diagnostics with it.
//!
//! Expected-token information is kept as a single "farthest failure": the
//! furthest position any terminal failed at and what was expected there.
//! It is what list recovery reports.

use std::collections::{BTreeSet, HashMap};
use std::convert::Infallible;
use std::time::{Duration, Instant};

use ziust_common::{BytePos, Span};
use ziust_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode, Label};
use ziust_grammar::resolver::{self, Operand, Resolution};
use ziust_grammar::{Grammar, Hidden, Rule, Symbol};
use ziust_lexer::{Token, TokenKind};
use ziust_syntax::{Element, MAX_NESTING, Node, NodeKind, scan_group};

use crate::ParseError;
use crate::recovery::{BracketMap, is_close_point, is_stmt_start};

/// Longer expectation lists are reported as "unexpected ...".
const MAX_LISTED_EXPECTATIONS: usize = 5;
const DEADLINE_CHECK_INTERVAL: u64 = 256;

/// Limits on how much work a parse may do.
pub(crate) trait Budget {
    type Error;

    fn check(&mut self, steps: u64) -> Result<(), Self::Error>;
}

/// No limit; a parse under it cannot be cancelled.
pub(crate) struct Unlimited;

impl Budget for Unlimited {
    type Error = Infallible;

    fn check(&mut self, _steps: u64) -> Result<(), Infallible> {
        Ok(())
    }
}

/// A step budget and/or a deadline.
pub(crate) struct Limited {
    max_steps: Option<u64>,
    deadline: Option<Instant>,
}

impl Limited {
    pub(crate) fn new(max_steps: Option<u64>, deadline: Option<Duration>) -> Self {
        Self {
            max_steps,
            deadline: deadline.map(|d| Instant::now() + d),
        }
    }
}

impl Budget for Limited {
    type Error = ParseError;

    fn check(&mut self, steps: u64) -> Result<(), ParseError> {
        if let Some(max) = self.max_steps {
            if steps > max {
                return Err(ParseError::Cancelled { steps: max });
            }
        }
        if let Some(deadline) = self.deadline {
            if steps % DEADLINE_CHECK_INTERVAL == 1 && Instant::now() >= deadline {
                return Err(ParseError::DeadlineExceeded);
            }
        }
        Ok(())
    }
}

/// An element together with the field it is stored under.
#[derive(Debug, Clone)]
struct Piece {
    field: Option<&'static str>,
    element: Element,
}

impl Piece {
    fn new(element: Element) -> Self {
        Self {
            field: None,
            element,
        }
    }
}

/// A successful match: where it ended and what it produced.
#[derive(Debug, Clone)]
struct Parsed {
    end: usize,
    pieces: Vec<Piece>,
    diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    fn empty(pos: usize) -> Self {
        Self {
            end: pos,
            pieces: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn token(token: Token, pos: usize) -> Self {
        Self {
            end: pos + 1,
            pieces: vec![Piece::new(Element::Token(token))],
            diagnostics: Vec::new(),
        }
    }

    fn extend(&mut self, other: Parsed) {
        self.end = other.end;
        self.pieces.extend(other.pieces);
        self.diagnostics.extend(other.diagnostics);
    }

    fn with_field(mut self, name: &'static str) -> Self {
        for piece in &mut self.pieces {
            piece.field = Some(name);
        }
        self
    }
}

fn build_node(kind: NodeKind, pieces: Vec<Piece>, at: BytePos) -> Node {
    let mut children = Vec::with_capacity(pieces.len());
    let mut fields = Vec::new();
    for (index, piece) in pieces.into_iter().enumerate() {
        if let Some(name) = piece.field {
            fields.push((name, index));
        }
        children.push(piece.element);
    }
    Node::new(kind, children, fields, at)
}

/// The furthest position a match failed at, and what would have been
/// accepted there.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Failure {
    pos: usize,
    expected: BTreeSet<&'static str>,
}

impl Failure {
    fn new(pos: usize, expected: &'static str) -> Self {
        Self {
            pos,
            expected: BTreeSet::from([expected]),
        }
    }

    fn unexpected(pos: usize) -> Self {
        Self {
            pos,
            expected: BTreeSet::new(),
        }
    }

    fn merge(a: Option<Failure>, b: Option<Failure>) -> Option<Failure> {
        match (a, b) {
            (None, other) | (other, None) => other,
            (Some(mut a), Some(b)) => {
                if b.pos > a.pos {
                    Some(b)
                } else {
                    if b.pos == a.pos {
                        a.expected.extend(b.expected);
                    }
                    Some(a)
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Memo {
    result: Option<Parsed>,
    failure: Option<Failure>,
}

type Outcome<T, B> = Result<T, <B as Budget>::Error>;

/// Interprets the grammar over one token stream.
pub(crate) struct Engine<'a, B: Budget> {
    grammar: &'static Grammar,
    source: &'a str,
    /// Significant tokens, ending with `Eof`.
    tokens: &'a [Token],
    brackets: BracketMap,
    memo: HashMap<(usize, Symbol), Memo>,
    farthest: Option<Failure>,
    budget: B,
    steps: u64,
    depth: usize,
}

impl<'a, B: Budget> Engine<'a, B> {
    pub(crate) fn new(
        grammar: &'static Grammar,
        source: &'a str,
        tokens: &'a [Token],
        budget: B,
    ) -> Self {
        Self {
            grammar,
            source,
            tokens,
            brackets: BracketMap::new(tokens),
            memo: HashMap::new(),
            farthest: None,
            budget,
            steps: 0,
            depth: 0,
        }
    }

    pub(crate) fn steps(&self) -> u64 {
        self.steps
    }

    /// Parse the whole input into the root `module` node.
    pub(crate) fn run(&mut self) -> Outcome<(Node, Vec<Diagnostic>), B> {
        let parsed = match self.grammar.rule(self.grammar.start()) {
            Some(rule) => self.eval(rule, 0)?,
            None => None,
        };
        let parsed = parsed.unwrap_or_else(|| Parsed::empty(0));
        let mut root = build_node(NodeKind::Module, parsed.pieces, BytePos::ZERO);
        root.span = Span::from_usize(0, self.source.len());
        Ok((root, parsed.diagnostics))
    }

    fn eval(&mut self, rule: &Rule, pos: usize) -> Outcome<Option<Parsed>, B> {
        self.steps += 1;
        self.budget.check(self.steps)?;

        match rule {
            Rule::Empty => Ok(Some(Parsed::empty(pos))),
            Rule::Token(kind) => Ok(self.expect(*kind, pos)),
            Rule::Symbol(symbol) => self.symbol(*symbol, pos),
            Rule::Seq(rules) => {
                let mut out = Parsed::empty(pos);
                for rule in rules {
                    match self.eval(rule, out.end)? {
                        Some(next) => out.extend(next),
                        None => return Ok(None),
                    }
                }
                Ok(Some(out))
            }
            Rule::Choice {
                alternatives,
                conflict,
            } => {
                let resolution = conflict.map_or(Resolution::Ordered, resolver::resolve);
                self.choice(alternatives, resolution, pos)
            }
            Rule::Repeat(inner) => {
                let saved = self.farthest.clone();
                let mut out = Parsed::empty(pos);
                while let Some(next) = self.eval(inner, out.end)? {
                    if next.end == out.end {
                        break;
                    }
                    out.extend(next);
                }
                self.forget_trailing(saved, out.end);
                Ok(Some(out))
            }
            Rule::Field(name, inner) => Ok(self.eval(inner, pos)?.map(|p| p.with_field(*name))),
            Rule::Lookahead(inner) => Ok(self.eval(inner, pos)?.map(|_| Parsed::empty(pos))),
            Rule::Not(inner) => {
                let saved = self.farthest.clone();
                let matched = self.eval(inner, pos)?.is_some();
                self.farthest = saved;
                Ok((!matched).then(|| Parsed::empty(pos)))
            }
            Rule::Infix {
                operand,
                min_precedence,
            } => self.infix(*operand, *min_precedence, pos),
            Rule::Postfix {
                base,
                suffix,
                node,
                field,
            } => self.postfix(*base, suffix, *node, *field, pos),
            Rule::List {
                item,
                separator,
                close,
            } => self.list(item, *separator, *close, pos).map(Some),
            Rule::Close(kind) => Ok(self.close(*kind, pos)),
            Rule::Group => Ok(self.group(pos)),
        }
    }

    fn symbol(&mut self, symbol: Symbol, pos: usize) -> Outcome<Option<Parsed>, B> {
        let key = (pos, symbol);
        if let Some(memo) = self.memo.get(&key) {
            let memo = memo.clone();
            self.farthest = Failure::merge(self.farthest.take(), memo.failure);
            return Ok(memo.result);
        }
        let Some(rule) = self.grammar.rule(symbol) else {
            return Ok(None);
        };
        // Only node symbols deepen the tree; hidden ones pass through.
        let nests = matches!(symbol, Symbol::Node(_));
        if nests && self.depth >= MAX_NESTING {
            self.fail(pos, "shallower nesting");
            return Ok(None);
        }

        let outer = self.farthest.take();
        self.depth += usize::from(nests);
        let result = self.eval(rule, pos);
        self.depth -= usize::from(nests);
        let result = result?.map(|parsed| self.reduce(symbol, parsed, pos));

        let mut local = self.farthest.take();
        if result.is_none() {
            if let Some(label) = symbol.label() {
                if local.as_ref().is_none_or(|f| f.pos <= pos) {
                    local = Some(Failure::new(pos, label));
                }
            }
        }
        self.memo.insert(
            key,
            Memo {
                result: result.clone(),
                failure: local.clone(),
            },
        );
        self.farthest = Failure::merge(outer, local);
        Ok(result)
    }

    /// Wrap what a node symbol produced into its node; hidden symbols pass
    /// their children through.
    fn reduce(&self, symbol: Symbol, parsed: Parsed, pos: usize) -> Parsed {
        match symbol {
            Symbol::Hidden(_) => parsed,
            Symbol::Node(kind) => Parsed {
                end: parsed.end,
                pieces: vec![Piece::new(Element::Node(build_node(
                    kind,
                    parsed.pieces,
                    self.offset(pos),
                )))],
                diagnostics: parsed.diagnostics,
            },
        }
    }

    fn choice(
        &mut self,
        alternatives: &[Rule],
        resolution: Resolution,
        pos: usize,
    ) -> Outcome<Option<Parsed>, B> {
        match resolution {
            Resolution::Ordered => {
                for alternative in alternatives {
                    if let Some(parsed) = self.eval(alternative, pos)? {
                        return Ok(Some(parsed));
                    }
                }
                Ok(None)
            }
            Resolution::Longest | Resolution::Greedy => {
                let mut best: Option<Parsed> = None;
                for alternative in alternatives {
                    if let Some(parsed) = self.eval(alternative, pos)? {
                        if best.as_ref().is_none_or(|b| parsed.end > b.end) {
                            best = Some(parsed);
                        }
                    }
                }
                Ok(best)
            }
        }
    }

    /// Precedence climbing over the operator table.
    fn infix(&mut self, operand: Symbol, min_precedence: u8, pos: usize) -> Outcome<Option<Parsed>, B> {
        let Some(mut left) = self.symbol(operand, pos)? else {
            return Ok(None);
        };
        loop {
            let token = self.token(left.end);
            let Some(op) = resolver::operator(token.kind) else {
                break;
            };
            if op.precedence < min_precedence {
                break;
            }
            let right = match op.right {
                Operand::Expression => self.infix(operand, op.right_precedence(), left.end + 1)?,
                Operand::Type => self.symbol(Symbol::Hidden(Hidden::Type), left.end + 1)?,
            };
            let Some(right) = right else {
                break;
            };
            let operator_pos = left.end;
            let mut combined = left.with_field(op.left_field);
            combined.extend(Parsed::token(token, operator_pos));
            combined.extend(right.with_field(op.right_field));
            left = self.reduce(Symbol::Node(op.node), combined, pos);
        }
        Ok(Some(left))
    }

    fn postfix(
        &mut self,
        base: Symbol,
        suffix: &Rule,
        node: NodeKind,
        field: &'static str,
        pos: usize,
    ) -> Outcome<Option<Parsed>, B> {
        let saved = self.farthest.clone();
        let Some(mut value) = self.symbol(base, pos)? else {
            return Ok(None);
        };
        while let Some(next) = self.eval(suffix, value.end)? {
            if next.end == value.end {
                break;
            }
            let mut combined = value.with_field(field);
            combined.extend(next);
            value = self.reduce(Symbol::Node(node), combined, pos);
        }
        self.forget_trailing(saved, value.end);
        Ok(Some(value))
    }

    /// A recovering list. Never fails: anything an item cannot match is
    /// skipped into an `ERROR` node with one diagnostic.
    fn list(
        &mut self,
        item: &Rule,
        separator: Option<TokenKind>,
        close: TokenKind,
        pos: usize,
    ) -> Outcome<Parsed, B> {
        let limit = self.brackets.limit(pos);
        let item_field = match item {
            Rule::Field(name, _) => Some(*name),
            _ => None,
        };
        let mut out = Parsed::empty(pos);

        loop {
            let at = out.end;
            if self.list_ends(at, close, limit) {
                break;
            }
            let outer = self.farthest.take();
            let failure = match self.eval(item, at)? {
                Some(parsed) if parsed.end > at => {
                    out.extend(parsed);
                    let next = self.token(out.end);
                    let Some(separator) = separator else {
                        self.farthest = Failure::merge(outer, self.farthest.take());
                        continue;
                    };
                    if next.kind == separator {
                        out.extend(Parsed::token(next, out.end));
                        self.farthest = Failure::merge(outer, self.farthest.take());
                        continue;
                    }
                    if self.list_ends(out.end, close, limit)
                        || is_stmt_start(next.kind)
                        || self.brackets.is_matched_closer(out.end)
                    {
                        self.farthest = Failure::merge(outer, self.farthest.take());
                        break;
                    }
                    match self.farthest.take() {
                        Some(failure) if failure.pos > out.end => failure,
                        _ => Failure {
                            pos: out.end,
                            expected: BTreeSet::from([separator.describe(), close.describe()]),
                        },
                    }
                }
                _ => {
                    let failure = self
                        .farthest
                        .take()
                        .unwrap_or_else(|| Failure::unexpected(at));
                    if separator.is_some()
                        && is_stmt_start(self.token(at).kind)
                        && failure.pos <= at
                    {
                        self.farthest = Failure::merge(outer, Some(failure));
                        break;
                    }
                    failure
                }
            };
            let recovered = self.recover(&mut out, &failure, separator, close, limit, item_field);
            self.farthest = outer;
            if !recovered {
                break;
            }
        }
        Ok(out)
    }

    fn list_ends(&self, pos: usize, close: TokenKind, limit: Option<usize>) -> bool {
        let kind = self.token(pos).kind;
        kind == TokenKind::Eof || kind == close || Some(pos) == limit
    }

    /// Skip the tokens at `out.end` into an `ERROR` node and report
    /// `failure`. Returns false if nothing could be skipped.
    fn recover(
        &mut self,
        out: &mut Parsed,
        failure: &Failure,
        separator: Option<TokenKind>,
        close: TokenKind,
        limit: Option<usize>,
        field: Option<&'static str>,
    ) -> bool {
        let start = out.end;
        let (error_end, resume) = self.skip(start, separator, close, limit);
        if resume == start {
            return false;
        }

        let skipped: Vec<Element> = self.tokens[start..error_end]
            .iter()
            .map(|token| Element::Token(*token))
            .collect();
        let node = Node::new(NodeKind::Error, skipped, vec![], self.offset(start));
        let span = node.span;
        out.pieces.push(Piece {
            field,
            element: Element::Node(node),
        });
        if resume > error_end {
            out.pieces.push(Piece::new(Element::Token(self.token(error_end))));
        }
        out.end = resume;

        // Lexer errors are already reported by the lexer.
        if !self.token(failure.pos).kind.is_error() {
            out.diagnostics
                .push(self.syntax_error(failure).with_recovered(span));
        }
        tracing::debug!(
            position = usize::from(span.start),
            skipped = error_end - start,
            "recovered from syntax error"
        );
        true
    }

    /// Find where skipping from `start` stops. Returns the end of the
    /// skipped range and the position to resume at; they differ when a
    /// separator ends the skip, which stays in the list.
    fn skip(
        &self,
        start: usize,
        separator: Option<TokenKind>,
        close: TokenKind,
        limit: Option<usize>,
    ) -> (usize, usize) {
        let mut pos = start;
        loop {
            let kind = self.token(pos).kind;
            if kind == TokenKind::Eof || kind == close || Some(pos) == limit {
                return (pos, pos);
            }
            if pos > start && is_stmt_start(kind) {
                return (pos, pos);
            }
            if Some(kind) == separator {
                return if pos == start {
                    (pos + 1, pos + 1)
                } else {
                    (pos, pos + 1)
                };
            }
            // Nested brackets are skipped whole.
            pos = match self.brackets.closer_of(pos) {
                Some(closer) if Some(closer) != limit => closer + 1,
                _ => pos + 1,
            };
            if separator.is_none() && kind == TokenKind::Semicolon {
                return (pos, pos);
            }
        }
    }

    /// A closing delimiter; inserted as missing at a close point.
    fn close(&mut self, kind: TokenKind, pos: usize) -> Option<Parsed> {
        let token = self.token(pos);
        if token.kind == kind {
            return Some(Parsed::token(token, pos));
        }
        if !is_close_point(token.kind) {
            self.fail(pos, kind.describe());
            return None;
        }
        let at = self.previous_end(pos);
        let diagnostic = Diagnostic::error(
            DiagnosticKind::Parser,
            Span::empty_at(at),
            format!(
                "unclosed delimiter: expected {}, found {}",
                kind.describe(),
                self.describe_found(token)
            ),
        )
        .with_code(ErrorCode::UnclosedDelimiter)
        .with_label(Label::new(
            token.span,
            format!("expected {} before this", kind.describe()),
        ));
        Some(Parsed {
            end: pos,
            pieces: vec![Piece::new(Element::Missing { kind, at })],
            diagnostics: vec![diagnostic],
        })
    }

    fn group(&mut self, pos: usize) -> Option<Parsed> {
        match scan_group(self.tokens, pos) {
            Some(scan) => Some(Parsed {
                end: scan.end,
                pieces: vec![Piece::new(Element::Node(scan.node))],
                diagnostics: scan.diagnostics,
            }),
            None => {
                self.fail(pos, "delimited group");
                None
            }
        }
    }

    fn expect(&mut self, kind: TokenKind, pos: usize) -> Option<Parsed> {
        let token = self.token(pos);
        if token.kind == kind {
            Some(Parsed::token(token, pos))
        } else {
            self.fail(pos, kind.describe());
            None
        }
    }

    fn fail(&mut self, pos: usize, expected: &'static str) {
        self.farthest = Failure::merge(self.farthest.take(), Some(Failure::new(pos, expected)));
    }

    /// Optional continuations (another path segment, another suffix) that
    /// fail right where the match ended say nothing about the error.
    fn forget_trailing(&mut self, saved: Option<Failure>, end: usize) {
        if self.farthest.as_ref().is_none_or(|f| f.pos <= end) {
            self.farthest = saved;
        }
    }

    fn syntax_error(&self, failure: &Failure) -> Diagnostic {
        let token = self.token(failure.pos);
        let found = self.describe_found(token);
        let expected: Vec<&str> = failure.expected.iter().copied().collect();
        let message = if expected.is_empty() || expected.len() > MAX_LISTED_EXPECTATIONS {
            format!("unexpected {found}")
        } else {
            format!("expected {}, found {found}", join_alternatives(&expected))
        };
        let code = if failure.expected.contains("type") {
            ErrorCode::ExpectedType
        } else if failure.expected.contains("expression") {
            ErrorCode::ExpectedExpression
        } else if failure.expected.contains("pattern") {
            ErrorCode::ExpectedPattern
        } else if failure.expected.contains("`;`") {
            ErrorCode::MissingSemicolon
        } else {
            ErrorCode::UnexpectedToken
        };
        Diagnostic::error(DiagnosticKind::Parser, token.span, message)
            .with_code(code)
            .with_label(Label::new(token.span, "unexpected token"))
    }

    fn describe_found(&self, token: Token) -> String {
        match token.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("`{}`", token.text(self.source)),
        }
    }

    fn token(&self, pos: usize) -> Token {
        match self.tokens.get(pos).or(self.tokens.last()) {
            Some(token) => *token,
            None => Token::new(TokenKind::Eof, Span::from_usize(self.source.len(), self.source.len())),
        }
    }

    fn offset(&self, pos: usize) -> BytePos {
        self.token(pos).span.start
    }

    fn previous_end(&self, pos: usize) -> BytePos {
        match pos.checked_sub(1).and_then(|p| self.tokens.get(p)) {
            Some(token) => token.span.end,
            None => self.offset(pos),
        }
    }
}

/// `a`, `a or b`, `a, b or c`.
fn join_alternatives(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    }
}
