//! Unified error types for modgen.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ModgenError (top-level wrapper)
//! ├── LexError        - Lexer/tokenization errors
//! ├── ParseError      - Parser errors (with ParseErrorKind)
//! ├── SymbolError     - Type declaration/merging errors
//! └── GeneratorError  - Rejected generator output
//! ```
//!
//! None of these abort a generator pass. Lex and parse errors are collected on
//! the syntax tree, symbol errors on the compilation, and generator errors are
//! returned to the generator that caused them.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Lexer Errors
// ============================================================================

/// Errors that occur during lexical analysis (tokenization).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// An unexpected character was encountered.
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    /// A string or character literal was not properly terminated.
    #[error("unterminated string at {span}")]
    UnterminatedString { span: Span },

    /// A raw string literal was not properly terminated.
    #[error("unterminated raw string at {span}")]
    UnterminatedRawString { span: Span },

    /// A block comment was not properly terminated.
    #[error("unterminated comment at {span}")]
    UnterminatedComment { span: Span },
}

impl LexError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
            LexError::UnterminatedString { span } => *span,
            LexError::UnterminatedRawString { span } => *span,
            LexError::UnterminatedComment { span } => *span,
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Categories of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The lexer rejected part of the input.
    Lexical,
    /// A specific token was expected but not found.
    ExpectedToken,
    /// An unexpected token was encountered.
    UnexpectedToken,
    /// Unexpected end of file.
    UnexpectedEof,
    /// An expression was expected.
    ExpectedExpression,
    /// A type was expected.
    ExpectedType,
    /// A declaration was expected.
    ExpectedDeclaration,
    /// A type member was expected.
    ExpectedMember,
    /// Function parameters were expected.
    ExpectedParameters,
    /// An identifier was expected.
    ExpectedIdentifier,
    /// Mismatched delimiter (parentheses, brackets, braces).
    MismatchedDelimiter,
    /// Invalid modifier for this context.
    InvalidModifier,
}

impl ParseErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::Lexical => "lexical error",
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
            ParseErrorKind::ExpectedExpression => "expected expression",
            ParseErrorKind::ExpectedType => "expected type",
            ParseErrorKind::ExpectedDeclaration => "expected declaration",
            ParseErrorKind::ExpectedMember => "expected member",
            ParseErrorKind::ExpectedParameters => "expected parameters",
            ParseErrorKind::ExpectedIdentifier => "expected identifier",
            ParseErrorKind::MismatchedDelimiter => "mismatched delimiter",
            ParseErrorKind::InvalidModifier => "invalid modifier",
        }
    }

    /// Stable diagnostic id for this kind.
    pub fn diagnostic_id(&self) -> &'static str {
        match self {
            ParseErrorKind::Lexical => "MG1000",
            ParseErrorKind::ExpectedToken => "MG1001",
            ParseErrorKind::UnexpectedToken => "MG1002",
            ParseErrorKind::UnexpectedEof => "MG1003",
            ParseErrorKind::ExpectedExpression => "MG1004",
            ParseErrorKind::ExpectedType => "MG1005",
            ParseErrorKind::ExpectedDeclaration => "MG1006",
            ParseErrorKind::ExpectedMember => "MG1007",
            ParseErrorKind::ExpectedParameters => "MG1008",
            ParseErrorKind::ExpectedIdentifier => "MG1009",
            ParseErrorKind::MismatchedDelimiter => "MG1010",
            ParseErrorKind::InvalidModifier => "MG1011",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parse error with location and context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    /// The category of this error.
    pub kind: ParseErrorKind,
    /// The source location where the error occurred.
    pub span: Span,
    /// A detailed error message.
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create an "expected token" error.
    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            span,
            format!("expected {expected}, found {found}"),
        )
    }

    /// Create an "unexpected token" error.
    pub fn unexpected_token(span: Span, token: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedToken,
            span,
            format!("unexpected token: {token}"),
        )
    }

    /// Create an "unexpected EOF" error.
    pub fn unexpected_eof(span: Span) -> Self {
        Self::new(ParseErrorKind::UnexpectedEof, span, "unexpected end of file")
    }

    /// Create an "expected identifier" error.
    pub fn expected_identifier(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedIdentifier,
            span,
            format!("expected identifier, found {found}"),
        )
    }

    /// Create an "expected type" error.
    pub fn expected_type(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedType,
            span,
            format!("expected type, found {found}"),
        )
    }

    /// Format the error with source context for display.
    ///
    /// Shows the relevant source line and a caret under the error location.
    pub fn display_with_source(&self, source: &str) -> String {
        let mut output = String::new();
        let line = self.span.line;
        let column = self.span.col;

        output.push_str(&format!("Error at {}:{}: {}\n", line, column, self.kind));

        if !self.message.is_empty() {
            output.push_str(&format!("  {}\n", self.message));
        }

        if let Some(line_text) = source.lines().nth(line.saturating_sub(1) as usize) {
            output.push_str("  |\n");
            output.push_str(&format!("{:>3} | {}\n", line, line_text));

            let indent = " ".repeat(column.saturating_sub(1) as usize);
            let pointer = if self.span.len <= 1 {
                "^".to_string()
            } else {
                "^".to_string() + &"~".repeat((self.span.len - 1) as usize)
            };
            output.push_str(&format!("  | {}{}\n", indent, pointer));
        }

        output
    }
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        ParseError::new(ParseErrorKind::Lexical, error.span(), error.to_string())
    }
}

/// A collection of parse errors.
///
/// Parsing continues after errors, so a tree may carry several.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

impl ParseErrors {
    /// Create a new empty error collection.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection.
    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Check if there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }

    /// Convert to a Vec of errors.
    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl From<Vec<ParseError>> for ParseErrors {
    fn from(errors: Vec<ParseError>) -> Self {
        Self { errors }
    }
}

impl std::fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}

// ============================================================================
// Symbol Errors
// ============================================================================

/// Errors raised while declaring type symbols for a compilation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolError {
    /// Two non-partial declarations share a qualified name.
    #[error("type '{name}' is declared more than once")]
    DuplicateType { name: String, span: Span },

    /// Partial declarations of one type disagree on its kind.
    #[error("partial declarations of '{name}' must all be the same kind")]
    PartialKindMismatch { name: String, span: Span },

    /// Partial declarations of one type disagree on its accessibility.
    #[error("partial declarations of '{name}' have conflicting accessibility")]
    ConflictingAccessibility { name: String, span: Span },
}

impl SymbolError {
    /// Get the span of the offending declaration.
    pub fn span(&self) -> Span {
        match self {
            SymbolError::DuplicateType { span, .. } => *span,
            SymbolError::PartialKindMismatch { span, .. } => *span,
            SymbolError::ConflictingAccessibility { span, .. } => *span,
        }
    }
}

// ============================================================================
// Generator Errors
// ============================================================================

/// Errors returned when a generator hands invalid output to the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// A source with the same hint name was already added in this pass.
    #[error("a source named '{0}' was already added")]
    DuplicateHintName(String),

    /// The hint name contains characters that are not allowed in a file name.
    #[error("'{0}' is not a valid hint name")]
    InvalidHintName(String),
}

// ============================================================================
// Unified Error
// ============================================================================

/// Top-level error wrapping every phase.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModgenError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Parses(#[from] ParseErrors),

    #[error(transparent)]
    Symbol(#[from] SymbolError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),
}
