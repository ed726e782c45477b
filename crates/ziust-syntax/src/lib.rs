//! Concrete syntax tree for Ziust.
//!
//! This crate defines the tree the parser produces: tagged nodes with named
//! fields, the tokens they cover, and the balanced-delimiter scanner used for
//! macro and attribute bodies. Node kind and field names are a stable
//! contract for tooling built on top of the tree.

mod group;
mod kinds;
mod node;
mod tree;

pub use group::{GroupDelimiter, GroupScan, scan_group};
pub use kinds::NodeKind;
pub use node::{Element, Node};
pub use tree::SyntaxTree;

/// How deep nodes may nest. The parser fails a rule past this depth and the
/// group scanner flattens anything deeper into an `ERROR` node.
/// 节点嵌套的最大深度。
pub const MAX_NESTING: usize = 128;
