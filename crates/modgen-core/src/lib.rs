//! Shared building blocks for the modgen workspace.
//!
//! Everything here is used by more than one phase of the pipeline:
//!
//! - [`Span`] for source locations
//! - the [`error`] hierarchy (lexing, parsing, symbol declaration, generator output)
//! - [`Diagnostic`] values reported by the host and by generators
//! - [`SourceText`], the encoded form of a generated program unit
//! - [`Accessibility`], [`Modifiers`] and [`TypeKind`] shared by syntax and symbols

mod accessibility;
pub mod diagnostics;
pub mod error;
mod modifiers;
mod source_text;
mod span;
mod type_kind;

pub use accessibility::Accessibility;
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Location};
pub use error::{
    GeneratorError, LexError, ModgenError, ParseError, ParseErrorKind, ParseErrors, SymbolError,
};
pub use modifiers::Modifiers;
pub use source_text::{SourceText, TextEncoding};
pub use span::Span;
pub use type_kind::TypeKind;
