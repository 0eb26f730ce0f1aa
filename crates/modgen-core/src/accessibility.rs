//! Declared accessibility of types and members.

use std::fmt;

/// Declared accessibility, as written or implied by the declaration context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accessibility {
    /// No accessibility could be determined (e.g. an unresolved type).
    #[default]
    NotApplicable,
    Private,
    /// `private protected`
    ProtectedAndInternal,
    Protected,
    Internal,
    /// `protected internal`
    ProtectedOrInternal,
    Public,
}

impl Accessibility {
    /// Whether this is `public`.
    pub fn is_public(self) -> bool {
        self == Accessibility::Public
    }
}

impl fmt::Display for Accessibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessibility::NotApplicable => write!(f, "not applicable"),
            Accessibility::Private => write!(f, "private"),
            Accessibility::ProtectedAndInternal => write!(f, "private protected"),
            Accessibility::Protected => write!(f, "protected"),
            Accessibility::Internal => write!(f, "internal"),
            Accessibility::ProtectedOrInternal => write!(f, "protected internal"),
            Accessibility::Public => write!(f, "public"),
        }
    }
}
