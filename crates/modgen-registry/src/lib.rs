//! Symbols for a modgen compilation.
//!
//! This crate stores the types declared by a compilation's syntax trees and
//! its metadata references:
//! - [`SymbolHash`], a deterministic identity computed from the qualified name
//! - [`NamespaceTree`], a `petgraph` graph of namespaces and `global using` edges
//! - [`SymbolTable`], types merged across partial declarations, with name
//!   resolution and base class chains
//!
//! Nothing here knows about syntax; the compiler crate walks the trees and
//! feeds declarations in.

mod namespace_tree;
mod symbol;
mod symbol_hash;
mod symbol_table;

pub use namespace_tree::{
    AliasTarget, NamespaceData, NamespaceEdge, NamespaceTree, ResolutionContext, ResolutionResult,
};
pub use petgraph::graph::NodeIndex;
pub use symbol::{DeclarationRef, ErrorType, SymbolOrigin, TypeRef, TypeSymbol, metadata_name};
pub use symbol_hash::SymbolHash;
pub use symbol_table::{BaseTypes, NamePart, SymbolTable, TypeDeclaration};
