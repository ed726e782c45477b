//! Lexical analysis for Ziust.
//! Ziust 词法分析模块。
//!
//! This crate provides the lexer that converts source code into tokens.
//! Whitespace and comments are kept in the stream as trivia so that the
//! concatenated token texts always reproduce the input.
//! 本 crate 提供词法分析器，将源代码转换为 token 序列；空白与注释作为
//! trivia 保留，以便完整还原输入文本。

mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{Keyword, LexErrorKind, Token, TokenKind};
