//! Diagnostics reported by the host and by generators.

use std::fmt;

use crate::{ParseError, Span, SymbolError};

/// Severity of a [`Diagnostic`], ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticSeverity {
    Hidden,
    Info,
    Warning,
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Hidden => write!(f, "hidden"),
            DiagnosticSeverity::Info => write!(f, "info"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Error => write!(f, "error"),
        }
    }
}

/// Where a diagnostic points: a file path and a span inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub span: Span,
}

impl Location {
    pub fn new(path: impl Into<String>, span: Span) -> Self {
        Self {
            path: path.into(),
            span,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.span)
    }
}

/// A message for the user of the host, with a stable id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub id: &'static str,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn new(
        id: &'static str,
        severity: DiagnosticSeverity,
        message: impl Into<String>,
        location: Option<Location>,
    ) -> Self {
        Self {
            id,
            severity,
            message: message.into(),
            location,
        }
    }

    pub fn info(id: &'static str, message: impl Into<String>, location: Option<Location>) -> Self {
        Self::new(id, DiagnosticSeverity::Info, message, location)
    }

    pub fn warning(id: &'static str, message: impl Into<String>, location: Option<Location>) -> Self {
        Self::new(id, DiagnosticSeverity::Warning, message, location)
    }

    pub fn error(id: &'static str, message: impl Into<String>, location: Option<Location>) -> Self {
        Self::new(id, DiagnosticSeverity::Error, message, location)
    }

    /// Diagnostic for a parse error in the file at `path`.
    pub fn from_parse_error(path: &str, error: &ParseError) -> Self {
        Self::error(
            error.kind.diagnostic_id(),
            error.to_string(),
            Some(Location::new(path, error.span)),
        )
    }

    /// Diagnostic for a symbol declaration error in the file at `path`.
    pub fn from_symbol_error(path: &str, error: &SymbolError) -> Self {
        Self::error("MG2001", error.to_string(), Some(Location::new(path, error.span())))
    }

    /// Whether the severity is at least `severity`.
    pub fn is_at_least(&self, severity: DiagnosticSeverity) -> bool {
        self.severity >= severity
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{location}: {} {}: {}", self.severity, self.id, self.message),
            None => write!(f, "{} {}: {}", self.severity, self.id, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(DiagnosticSeverity::Error > DiagnosticSeverity::Warning);
        assert!(DiagnosticSeverity::Warning > DiagnosticSeverity::Info);
        assert!(DiagnosticSeverity::Info > DiagnosticSeverity::Hidden);
    }

    #[test]
    fn display_includes_location() {
        let diagnostic = Diagnostic::info(
            "MG0001",
            "skipped",
            Some(Location::new("Test0.cs", Span::new(10, 2, 5, 4))),
        );
        assert_eq!(diagnostic.to_string(), "Test0.cs:2:5: info MG0001: skipped");
        assert!(!diagnostic.is_at_least(DiagnosticSeverity::Warning));
    }
}
