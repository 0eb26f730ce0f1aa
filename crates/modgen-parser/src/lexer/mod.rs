//! Lexical analysis for C#-shaped source.

mod cursor;
mod lexer;
mod token;

pub use lexer::{Lexer, tokenize};
pub use token::{Token, TokenKind, lookup_keyword};
