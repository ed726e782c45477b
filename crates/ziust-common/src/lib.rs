//! Common utilities and data structures for Ziust.
//!
//! This crate provides the foundational position types shared by the lexer,
//! the syntax tree and the parser:
//! - `BytePos`: a byte offset into a source buffer
//! - `Span`: a half-open byte range

mod span;

pub use span::{BytePos, Span};
