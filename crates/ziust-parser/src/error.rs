//! Errors that abort a parse.

use thiserror::Error;

/// A parse that was cancelled by its budget. No tree is produced.
///
/// Malformed input is never an error here; it yields a tree with
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("parse cancelled after {steps} steps")]
    Cancelled { steps: u64 },
    #[error("parse deadline exceeded")]
    DeadlineExceeded,
}
