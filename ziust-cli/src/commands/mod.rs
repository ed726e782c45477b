//! CLI command implementations.

pub mod check;
pub mod grammar;
pub mod parse;
pub mod tokens;
