//! modgen parser crate.
//!
//! Lexer and parser for the C#-shaped program units that module classes are
//! written in, and that generated registration code is emitted as. It includes:
//! - Lexical analysis (tokenization, trivia skipping)
//! - Syntax tree definitions allocated in a `bumpalo` arena
//! - A lenient parser that always produces a tree and collects errors
//! - A document-order node walker
//! - Token-level tree equivalence
//!
//! Member bodies and expressions are captured as source text, not parsed into
//! expression trees.
//!
//! # Example
//!
//! ```
//! use modgen_parser::SyntaxTree;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let source = r#"
//!     namespace Game
//!     {
//!         public partial class Commands : ModuleBase
//!         {
//!             [Command("ping")]
//!             public Task Ping() => Task.CompletedTask;
//!         }
//!     }
//! "#;
//!
//! let tree = SyntaxTree::parse(&arena, "Commands.cs", source);
//! assert!(tree.errors().is_empty());
//! assert_eq!(tree.type_declarations().count(), 1);
//! ```

pub mod ast;
pub mod lexer;

pub use ast::{Parser, SyntaxNode, SyntaxTree};
pub use lexer::{Lexer, Token, TokenKind};
