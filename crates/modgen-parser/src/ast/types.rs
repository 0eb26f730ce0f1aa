//! Names, type references and opaque expressions.
//!
//! Every node keeps the exact source text it was parsed from. Generators read
//! type and argument text verbatim, so the text is part of the node rather
//! than something rebuilt from its parts.

use modgen_core::Span;
use std::fmt;

/// An identifier.
///
/// `name` is the text as written, including a leading `@` for escaped
/// keywords (`@class`).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }

    /// The identifier's value: the written text without a leading `@`.
    pub fn value_text(&self) -> &'ast str {
        self.name.strip_prefix('@').unwrap_or(self.name)
    }
}

impl fmt::Debug for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ident({:?} @ {:?})", self.name, self.span)
    }
}

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// One dotted segment of a name, with its type arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NameSegment<'ast> {
    pub ident: Ident<'ast>,
    pub type_args: &'ast [TypeSyntax<'ast>],
}

impl NameSegment<'_> {
    /// Number of type arguments written on this segment.
    pub fn arity(&self) -> usize {
        self.type_args.len()
    }
}

/// A possibly qualified, possibly generic name.
///
/// Examples:
/// - `ModuleBase`
/// - `System.Collections.Generic.List<int>`
/// - `global::Demo.ModuleBase`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Name<'ast> {
    /// Alias before `::`, e.g. `global` in `global::System`.
    pub alias: Option<Ident<'ast>>,
    /// Dotted segments, never empty.
    pub segments: &'ast [NameSegment<'ast>],
    /// Source text of the whole name.
    pub text: &'ast str,
    pub span: Span,
}

impl<'ast> Name<'ast> {
    /// Whether the name starts with `global::`.
    pub fn is_global(&self) -> bool {
        self.alias.is_some_and(|alias| alias.name == "global")
    }

    /// The rightmost segment.
    pub fn last(&self) -> Option<&'ast NameSegment<'ast>> {
        self.segments.last()
    }

    /// The rightmost identifier without `@` or type arguments.
    ///
    /// `System.Collections.Generic.List<int>` has simple name `List`.
    pub fn simple_name(&self) -> &'ast str {
        self.segments
            .last()
            .map(|segment| segment.ident.value_text())
            .unwrap_or("")
    }

    /// Whether this name is a single identifier without qualification.
    pub fn is_simple(&self) -> bool {
        self.alias.is_none() && self.segments.len() == 1
    }
}

impl fmt::Display for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

/// A named element of a tuple type: `(int Count, string)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TupleElement<'ast> {
    pub ty: TypeSyntax<'ast>,
    pub name: Option<Ident<'ast>>,
}

/// The shape of a type reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeSyntaxKind<'ast> {
    /// A predefined type keyword: `int`, `string`, `void`, ...
    Predefined(&'ast str),
    /// A named type, possibly qualified and generic.
    Named(Name<'ast>),
    /// `T[]`, `T[,]`
    Array {
        element: &'ast TypeSyntax<'ast>,
        rank: u32,
    },
    /// `T?`
    Nullable(&'ast TypeSyntax<'ast>),
    /// `T*`
    Pointer(&'ast TypeSyntax<'ast>),
    /// `(int, string name)`
    Tuple(&'ast [TupleElement<'ast>]),
}

/// A type as written in source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeSyntax<'ast> {
    pub kind: TypeSyntaxKind<'ast>,
    /// Source text of the whole type, e.g. `Dictionary<string, int>`.
    pub text: &'ast str,
    pub span: Span,
}

impl<'ast> TypeSyntax<'ast> {
    /// The name of a named type, looking through nothing else.
    pub fn as_name(&self) -> Option<&Name<'ast>> {
        match &self.kind {
            TypeSyntaxKind::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Whether this is the `void` keyword.
    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeSyntaxKind::Predefined("void"))
    }
}

impl fmt::Display for TypeSyntax<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

/// An expression captured as a balanced token run.
///
/// Expressions are never bound; only their text and location are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprSyntax<'ast> {
    pub text: &'ast str,
    pub span: Span,
}

impl fmt::Display for ExprSyntax<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}
