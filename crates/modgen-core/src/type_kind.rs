//! Kinds of type declarations.

use std::fmt;

/// The kind of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    /// `record` or `record class`.
    Record,
    /// `record struct`.
    RecordStruct,
    Delegate,
}

impl TypeKind {
    /// Whether declarations of this kind are reference types with class semantics.
    pub fn is_class(self) -> bool {
        matches!(self, TypeKind::Class | TypeKind::Record)
    }

    /// Keyword text as written in source.
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Record => "record",
            TypeKind::RecordStruct => "record struct",
            TypeKind::Delegate => "delegate",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
