//! Parser for Ziust.
//! Ziust 解析器。
//!
//! Turns source text into a [`SyntaxTree`]. Parsing never fails on bad
//! input: every malformed region becomes an `ERROR` node or a missing token
//! together with a diagnostic, and the tree still covers every byte of the
//! source. The only failure is running out of the budget set in
//! [`ParseOptions`].

mod engine;
mod error;
mod options;
mod recovery;

pub use error::ParseError;
pub use options::ParseOptions;
pub use recovery::{BracketMap, DelimiterKind, STMT_STARTS, is_close_point, is_stmt_start};

use ziust_diagnostic::Diagnostic;
use ziust_grammar::GRAMMAR;
use ziust_lexer::{LexErrorKind, Lexer, Token, TokenKind};
use ziust_syntax::{Node, NodeKind, SyntaxTree};

use crate::engine::{Budget, Engine, Limited, Unlimited};

/// Parse `source` with no budget.
pub fn parse(source: &str) -> SyntaxTree {
    match parse_source(source, "<input>", Unlimited) {
        Ok(tree) => tree,
        Err(never) => match never {},
    }
}

/// Parse `source` under `options`.
pub fn parse_with(source: &str, options: &ParseOptions) -> Result<SyntaxTree, ParseError> {
    let budget = Limited::new(options.max_steps, options.deadline);
    parse_source(source, options.display_name(), budget).inspect_err(|error| {
        tracing::warn!(source = options.display_name(), %error, "parse cancelled");
    })
}

fn parse_source<B: Budget>(source: &str, name: &str, budget: B) -> Result<SyntaxTree, B::Error> {
    tracing::debug!(source = name, bytes = source.len(), "parse started");

    let (tokens, lexer_diagnostics) = Lexer::new(source).tokenize();
    let significant: Vec<Token> = tokens
        .iter()
        .copied()
        .filter(|token| !token.kind.is_trivia())
        .collect();

    let mut engine = Engine::new(&GRAMMAR, source, &significant, budget);
    let (root, parser_diagnostics) = engine.run()?;

    let mut diagnostics = settle_lexer_diagnostics(&root, lexer_diagnostics);
    diagnostics.extend(parser_diagnostics);
    tracing::debug!(
        source = name,
        steps = engine.steps(),
        diagnostics = diagnostics.len(),
        "parse finished"
    );
    Ok(SyntaxTree::new(source.to_string(), tokens, root, diagnostics))
}

/// Reconcile lexer diagnostics with the finished tree.
///
/// Stray characters inside a macro or attribute group are part of its raw
/// text and are not reported. Any other lexer error that landed inside an
/// `ERROR` node points at that node.
fn settle_lexer_diagnostics(root: &Node, diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    let mut opaque = Vec::new();
    let mut errors = Vec::new();
    for node in root.descendants() {
        match node.kind {
            NodeKind::Group => opaque.extend(
                node.children
                    .iter()
                    .filter_map(|child| child.as_token())
                    .filter(|token| {
                        token.kind == TokenKind::Error(LexErrorKind::UnexpectedCharacter)
                    })
                    .map(|token| token.span),
            ),
            NodeKind::Error => errors.push(node.span),
            _ => {}
        }
    }

    diagnostics
        .into_iter()
        .filter(|diag| !opaque.contains(&diag.span))
        .map(|diag| match errors.iter().find(|span| span.contains(diag.span)) {
            Some(span) => {
                let span = *span;
                diag.with_recovered(span)
            }
            None => diag,
        })
        .collect()
}
