//! Token-level tree equivalence.
//!
//! Two trees are equivalent when they were produced from the same sequence
//! of tokens. Whitespace, comments and line endings do not matter; every
//! token kind and lexeme does.

use crate::lexer::Token;

/// Whether two token streams are equivalent.
pub(crate) fn tokens_equivalent(left: &[Token<'_>], right: &[Token<'_>]) -> bool {
    first_difference(left, right).is_none()
}

/// Index of the first token at which the two streams differ.
///
/// When one stream is a prefix of the other, the index is the length of the
/// shorter one.
pub(crate) fn first_difference(left: &[Token<'_>], right: &[Token<'_>]) -> Option<usize> {
    let mismatch = left
        .iter()
        .zip(right)
        .position(|(l, r)| l.kind != r.kind || l.lexeme != r.lexeme);
    match mismatch {
        Some(index) => Some(index),
        None if left.len() != right.len() => Some(left.len().min(right.len())),
        None => None,
    }
}
