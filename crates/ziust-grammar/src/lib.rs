//! Grammar of Ziust as data.
//!
//! Every nonterminal is a [`Rule`] value built from a small algebra
//! (sequence, choice, optional, repeat, field, precedence and a few
//! recovery-aware forms). The parser interprets these rules; ambiguities the
//! rules leave open are settled by the tables in [`resolver`].

mod rule;
mod rules;
mod symbol;

pub mod resolver;

pub use rule::*;
pub use rules::{GRAMMAR, Grammar};
pub use symbol::{Hidden, Symbol};
