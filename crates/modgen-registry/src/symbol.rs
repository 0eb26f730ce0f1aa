//! Type symbols.

use modgen_core::{Accessibility, Modifiers, Span, TypeKind};
use petgraph::graph::NodeIndex;

use crate::SymbolHash;

/// Where a symbol was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolOrigin {
    /// Declared in one of the compilation's own syntax trees.
    Source,
    /// Declared in a metadata reference.
    Metadata,
}

/// One declaration of a type: which tree it is in and which node it is.
///
/// `node` is an opaque key chosen by the caller, stable for the life of the
/// tree (the compiler uses the address of the arena node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclarationRef {
    pub tree: usize,
    pub node: usize,
    pub span: Span,
}

/// A reference to a type from a base list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Bound to a declared type.
    Named(SymbolHash),
    /// Could not be bound. Keeps the name as written so callers can still
    /// compare by name.
    Error(ErrorType),
}

impl TypeRef {
    pub fn hash(&self) -> Option<SymbolHash> {
        match self {
            TypeRef::Named(hash) => Some(*hash),
            TypeRef::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TypeRef::Error(_))
    }
}

/// An unresolved type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorType {
    /// Last identifier of the written name, without type arguments.
    pub name: String,
    /// The full text as written, e.g. `global::Demo.ModuleBase<int>`.
    pub text: String,
    pub arity: usize,
}

/// A declared type, merged across its partial declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSymbol {
    pub hash: SymbolHash,
    /// Simple name, without arity.
    pub name: String,
    pub arity: usize,
    pub kind: TypeKind,
    pub namespace: NodeIndex,
    pub containing_type: Option<SymbolHash>,
    pub accessibility: Accessibility,
    /// Union of the modifiers on every declaration.
    pub modifiers: Modifiers,
    pub origin: SymbolOrigin,
    pub declarations: Vec<DeclarationRef>,
    /// Direct base class, once bound. `None` for types without one.
    pub base_type: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    /// Nested types by metadata name, in declaration order.
    pub nested_types: Vec<(String, SymbolHash)>,
}

impl TypeSymbol {
    /// Name with generic arity, as stored in metadata: ``Box`1``.
    pub fn metadata_name(&self) -> String {
        metadata_name(&self.name, self.arity)
    }

    /// Interfaces are abstract, as is any type declared `abstract`.
    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(Modifiers::ABSTRACT) || self.kind == TypeKind::Interface
    }

    pub fn is_sealed(&self) -> bool {
        self.modifiers.contains(Modifiers::SEALED)
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    pub fn is_partial(&self) -> bool {
        self.modifiers.contains(Modifiers::PARTIAL)
    }

    pub fn is_nested(&self) -> bool {
        self.containing_type.is_some()
    }

    pub fn declared_accessibility(&self) -> Accessibility {
        self.accessibility
    }

    /// Nested type by metadata name.
    pub fn nested_type(&self, metadata_name: &str) -> Option<SymbolHash> {
        self.nested_types
            .iter()
            .find(|(name, _)| name == metadata_name)
            .map(|(_, hash)| *hash)
    }
}

/// Metadata name for a simple name and arity.
pub fn metadata_name(name: &str, arity: usize) -> String {
    if arity == 0 {
        name.to_string()
    } else {
        format!("{name}`{arity}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_name_includes_arity() {
        assert_eq!(metadata_name("Box", 0), "Box");
        assert_eq!(metadata_name("Box", 2), "Box`2");
    }

    #[test]
    fn error_type_ref_has_no_hash() {
        let error = TypeRef::Error(ErrorType {
            name: "ModuleBase".into(),
            text: "Missing.ModuleBase".into(),
            arity: 0,
        });
        assert!(error.is_error());
        assert_eq!(error.hash(), None);
        let named = TypeRef::Named(SymbolHash::from_name("A"));
        assert_eq!(named.hash(), Some(SymbolHash::from_name("A")));
    }
}
