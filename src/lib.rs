//! Ziust front end.
//! Ziust 前端。
//!
//! Umbrella crate that re-exports the workspace members so tools can depend
//! on a single package:
//! - `common`: spans and byte positions
//! - `diagnostic`: diagnostics and rendering
//! - `lexer`: tokens and the lexer
//! - `syntax`: the concrete syntax tree
//! - `grammar`: the rule catalog and conflict table
//! - `parser`: the parse driver

pub use ziust_common as common;
pub use ziust_diagnostic as diagnostic;
pub use ziust_grammar as grammar;
pub use ziust_lexer as lexer;
pub use ziust_parser as parser;
pub use ziust_syntax as syntax;

pub use ziust_parser::{ParseError, ParseOptions, parse, parse_with};
pub use ziust_syntax::{Element, Node, NodeKind, SyntaxTree};
