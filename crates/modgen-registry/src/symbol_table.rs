//! SymbolTable - the declared types of one compilation.
//!
//! Types are stored by [`SymbolHash`]; the [`NamespaceTree`] maps names to
//! hashes for lookup. Partial declarations of the same type merge into one
//! [`TypeSymbol`].
//!
//! # Example
//!
//! ```
//! use modgen_core::{Modifiers, Span, TypeKind};
//! use modgen_registry::{
//!     DeclarationRef, NamePart, ResolutionContext, SymbolOrigin, SymbolTable, TypeDeclaration,
//! };
//!
//! let mut table = SymbolTable::new();
//! let demo = table.namespace_path(&["Demo"]);
//! let hash = table
//!     .declare_type(TypeDeclaration {
//!         namespace: demo,
//!         containing_type: None,
//!         name: "ModuleBase",
//!         arity: 0,
//!         kind: TypeKind::Class,
//!         modifiers: Modifiers::PUBLIC | Modifiers::ABSTRACT,
//!         origin: SymbolOrigin::Metadata,
//!         declaration: DeclarationRef { tree: 0, node: 0, span: Span::default() },
//!     })
//!     .unwrap();
//!
//! let ctx = ResolutionContext::new(demo);
//! let found = table.resolve_name(&[NamePart::new("ModuleBase", 0)], false, &ctx);
//! assert_eq!(found.ok(), Some(hash));
//! assert_eq!(table.qualified_name(hash), "Demo.ModuleBase");
//! ```

use petgraph::graph::NodeIndex;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use modgen_core::{Accessibility, Modifiers, SymbolError, TypeKind};

use crate::namespace_tree::{AliasTarget, NamespaceTree, ResolutionContext, ResolutionResult};
use crate::symbol::{DeclarationRef, SymbolOrigin, TypeRef, TypeSymbol, metadata_name};
use crate::SymbolHash;

/// Everything needed to declare (or extend) a type.
#[derive(Debug, Clone, Copy)]
pub struct TypeDeclaration<'a> {
    pub namespace: NodeIndex,
    pub containing_type: Option<SymbolHash>,
    pub name: &'a str,
    pub arity: usize,
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    pub origin: SymbolOrigin,
    pub declaration: DeclarationRef,
}

/// One segment of a dotted name: identifier and number of type arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamePart<'a> {
    pub name: &'a str,
    pub arity: usize,
}

impl<'a> NamePart<'a> {
    pub fn new(name: &'a str, arity: usize) -> Self {
        Self { name, arity }
    }

    fn metadata_name(&self) -> String {
        metadata_name(self.name, self.arity)
    }
}

/// Where a partially resolved dotted name currently points.
#[derive(Clone, Copy)]
enum Scope {
    Namespace(NodeIndex),
    Type(SymbolHash),
}

/// The declared types of a compilation.
#[derive(Default)]
pub struct SymbolTable {
    namespaces: NamespaceTree,
    types: FxHashMap<SymbolHash, TypeSymbol>,
    /// Declaration order, for deterministic iteration.
    order: Vec<SymbolHash>,
}

impl SymbolTable {
    /// Create an empty table with only the global namespace.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespaces(&self) -> &NamespaceTree {
        &self.namespaces
    }

    pub fn namespaces_mut(&mut self) -> &mut NamespaceTree {
        &mut self.namespaces
    }

    /// Get or create a namespace by path from the root.
    pub fn namespace_path<S: AsRef<str>>(&mut self, path: &[S]) -> NodeIndex {
        let root = self.namespaces.root();
        self.namespaces.get_or_create_path(root, path)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, hash: SymbolHash) -> Option<&TypeSymbol> {
        self.types.get(&hash)
    }

    pub fn get_mut(&mut self, hash: SymbolHash) -> Option<&mut TypeSymbol> {
        self.types.get_mut(&hash)
    }

    /// All types in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeSymbol> {
        self.order.iter().filter_map(|hash| self.types.get(hash))
    }

    // ==========================================================================
    // Declaration
    // ==========================================================================

    /// Declare a type, or merge a further partial declaration into it.
    ///
    /// Fails when a non-partial declaration collides with an existing one, or
    /// when partial declarations disagree on kind or on written accessibility.
    pub fn declare_type(&mut self, decl: TypeDeclaration<'_>) -> Result<SymbolHash, SymbolError> {
        let metadata = metadata_name(decl.name, decl.arity);
        let hash = match decl.containing_type {
            Some(containing) => SymbolHash::nested(containing, &metadata),
            None => SymbolHash::from_name(&self.namespaces.qualified_name(decl.namespace, &metadata)),
        };

        if self.types.contains_key(&hash) {
            self.merge_partial(hash, &decl)?;
            return Ok(hash);
        }

        let default_accessibility = if decl.containing_type.is_some() {
            Accessibility::Private
        } else {
            Accessibility::Internal
        };
        let symbol = TypeSymbol {
            hash,
            name: decl.name.to_string(),
            arity: decl.arity,
            kind: decl.kind,
            namespace: decl.namespace,
            containing_type: decl.containing_type,
            accessibility: decl.modifiers.accessibility().unwrap_or(default_accessibility),
            modifiers: decl.modifiers,
            origin: decl.origin,
            declarations: vec![decl.declaration],
            base_type: None,
            interfaces: Vec::new(),
            nested_types: Vec::new(),
        };

        match decl.containing_type {
            Some(containing) => {
                if let Some(outer) = self.types.get_mut(&containing) {
                    outer.nested_types.push((metadata, hash));
                }
            }
            None => {
                self.namespaces.register_type(decl.namespace, &metadata, hash);
            }
        }

        trace!(name = %symbol.name, kind = %symbol.kind, "declared type");
        self.types.insert(hash, symbol);
        self.order.push(hash);
        Ok(hash)
    }

    fn merge_partial(&mut self, hash: SymbolHash, decl: &TypeDeclaration<'_>) -> Result<(), SymbolError> {
        let qualified = self.qualified_name(hash);
        let span = decl.declaration.span;
        let Some(existing) = self.types.get_mut(&hash) else {
            return Ok(());
        };

        if !existing.is_partial() || !decl.modifiers.contains(Modifiers::PARTIAL) {
            return Err(SymbolError::DuplicateType { name: qualified, span });
        }
        if existing.kind != decl.kind {
            return Err(SymbolError::PartialKindMismatch { name: qualified, span });
        }
        if let (Some(written), Some(new)) =
            (existing.modifiers.accessibility(), decl.modifiers.accessibility())
        {
            if written != new {
                return Err(SymbolError::ConflictingAccessibility { name: qualified, span });
            }
        }

        existing.modifiers |= decl.modifiers;
        if let Some(accessibility) = existing.modifiers.accessibility() {
            existing.accessibility = accessibility;
        }
        existing.declarations.push(decl.declaration);
        Ok(())
    }

    /// Record the bound base class and interfaces of a type.
    pub fn set_base_types(&mut self, hash: SymbolHash, base_type: Option<TypeRef>, interfaces: Vec<TypeRef>) {
        if let Some(symbol) = self.types.get_mut(&hash) {
            symbol.base_type = base_type;
            symbol.interfaces = interfaces;
        }
    }

    // ==========================================================================
    // Names
    // ==========================================================================

    /// Dotted name including namespaces and containing types.
    pub fn qualified_name(&self, hash: SymbolHash) -> String {
        let Some(symbol) = self.types.get(&hash) else {
            return String::new();
        };
        match symbol.containing_type {
            Some(containing) => format!("{}.{}", self.qualified_name(containing), symbol.name),
            None => self.namespaces.qualified_name(symbol.namespace, &symbol.name),
        }
    }

    /// Simple name of a type reference, bound or not.
    pub fn simple_name<'a>(&'a self, type_ref: &'a TypeRef) -> &'a str {
        match type_ref {
            TypeRef::Named(hash) => self.types.get(hash).map_or("", |symbol| symbol.name.as_str()),
            TypeRef::Error(error) => &error.name,
        }
    }

    // ==========================================================================
    // Resolution
    // ==========================================================================

    /// Resolve a simple name: nested types of the containing types first,
    /// then aliases, then namespaces and imports.
    pub fn resolve_simple(&self, part: NamePart<'_>, ctx: &ResolutionContext) -> ResolutionResult<SymbolHash> {
        let metadata = part.metadata_name();

        let mut containing = ctx.containing_type;
        while let Some(hash) = containing {
            let Some(symbol) = self.types.get(&hash) else {
                break;
            };
            if let Some(nested) = symbol.nested_type(&metadata) {
                return ResolutionResult::Found(nested);
            }
            containing = symbol.containing_type;
        }

        if part.arity == 0 {
            if let Some(AliasTarget::Type(hash)) = ctx.alias(part.name) {
                return ResolutionResult::Found(hash);
            }
        }

        self.namespaces.resolve_type_checked(&metadata, ctx)
    }

    /// Resolve a possibly dotted name such as `Runtime.ModuleBase`.
    ///
    /// `global_alias` is true for names written with `global::`, which are
    /// looked up from the root only.
    pub fn resolve_name(
        &self,
        parts: &[NamePart<'_>],
        global_alias: bool,
        ctx: &ResolutionContext,
    ) -> ResolutionResult<SymbolHash> {
        let Some((first, rest)) = parts.split_first() else {
            return ResolutionResult::NotFound;
        };

        let mut scope = if global_alias {
            let root = self.namespaces.root();
            match self.member_of(Scope::Namespace(root), *first) {
                Some(scope) => scope,
                None => return ResolutionResult::NotFound,
            }
        } else if rest.is_empty() {
            return self.resolve_simple(*first, ctx);
        } else {
            match self.resolve_leading(*first, ctx) {
                ResolutionResult::Found(scope) => scope,
                ResolutionResult::Ambiguous(matches) => {
                    return ResolutionResult::Ambiguous(
                        matches
                            .into_iter()
                            .filter_map(|(ns, scope)| match scope {
                                Scope::Type(hash) => Some((ns, hash)),
                                Scope::Namespace(_) => None,
                            })
                            .collect(),
                    );
                }
                ResolutionResult::NotFound => return ResolutionResult::NotFound,
            }
        };

        for part in rest {
            scope = match self.member_of(scope, *part) {
                Some(next) => next,
                None => return ResolutionResult::NotFound,
            };
        }

        match scope {
            Scope::Type(hash) => ResolutionResult::Found(hash),
            Scope::Namespace(_) => ResolutionResult::NotFound,
        }
    }

    /// The first segment of a dotted name: an alias, a type or a namespace.
    fn resolve_leading(&self, part: NamePart<'_>, ctx: &ResolutionContext) -> ResolutionResult<Scope> {
        if part.arity == 0 {
            match ctx.alias(part.name) {
                Some(AliasTarget::Namespace(ns)) => return ResolutionResult::Found(Scope::Namespace(ns)),
                Some(AliasTarget::Type(hash)) => return ResolutionResult::Found(Scope::Type(hash)),
                None => {}
            }
        }

        match self.resolve_simple(part, ctx) {
            ResolutionResult::NotFound => {}
            found => return found.map(Scope::Type),
        }

        if part.arity == 0 {
            if let Some(ns) = self.namespaces.resolve_namespace(part.name, ctx) {
                return ResolutionResult::Found(Scope::Namespace(ns));
            }
        }
        ResolutionResult::NotFound
    }

    fn member_of(&self, scope: Scope, part: NamePart<'_>) -> Option<Scope> {
        let metadata = part.metadata_name();
        match scope {
            Scope::Namespace(ns) => {
                if let Some(hash) = self.namespaces.type_in(ns, &metadata) {
                    return Some(Scope::Type(hash));
                }
                if part.arity == 0 {
                    return self.namespaces.find_child(ns, part.name).map(Scope::Namespace);
                }
                None
            }
            Scope::Type(hash) => self.types.get(&hash)?.nested_type(&metadata).map(Scope::Type),
        }
    }

    // ==========================================================================
    // Inheritance
    // ==========================================================================

    /// The base class chain of a type, nearest first.
    ///
    /// Ends after an unbound base, at a type without a base, or when a type
    /// repeats.
    pub fn base_types(&self, hash: SymbolHash) -> BaseTypes<'_> {
        let mut visited = FxHashSet::default();
        visited.insert(hash);
        BaseTypes {
            table: self,
            next: self.types.get(&hash).and_then(|symbol| symbol.base_type.as_ref()),
            visited,
        }
    }

    /// Whether `hash` is `ancestor` or derives from it through base classes.
    pub fn derives_from(&self, hash: SymbolHash, ancestor: SymbolHash) -> bool {
        hash == ancestor
            || self
                .base_types(hash)
                .any(|base| base.hash() == Some(ancestor))
    }

    pub fn is_source(&self, hash: SymbolHash) -> bool {
        self.types
            .get(&hash)
            .is_some_and(|symbol| symbol.origin == SymbolOrigin::Source)
    }

    pub fn kind_of(&self, hash: SymbolHash) -> Option<TypeKind> {
        self.types.get(&hash).map(|symbol| symbol.kind)
    }
}

/// Iterator over a base class chain. See [`SymbolTable::base_types`].
pub struct BaseTypes<'a> {
    table: &'a SymbolTable,
    next: Option<&'a TypeRef>,
    visited: FxHashSet<SymbolHash>,
}

impl<'a> Iterator for BaseTypes<'a> {
    type Item = &'a TypeRef;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if let TypeRef::Named(hash) = current {
            if !self.visited.insert(*hash) {
                return None;
            }
            self.next = self
                .table
                .types
                .get(hash)
                .and_then(|symbol| symbol.base_type.as_ref());
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::ErrorType;
    use modgen_core::Span;

    fn declare(
        table: &mut SymbolTable,
        ns: NodeIndex,
        containing: Option<SymbolHash>,
        name: &str,
        modifiers: Modifiers,
    ) -> Result<SymbolHash, SymbolError> {
        table.declare_type(TypeDeclaration {
            namespace: ns,
            containing_type: containing,
            name,
            arity: 0,
            kind: TypeKind::Class,
            modifiers,
            origin: SymbolOrigin::Source,
            declaration: DeclarationRef {
                tree: 0,
                node: table.len(),
                span: Span::default(),
            },
        })
    }

    #[test]
    fn default_accessibility() {
        let mut table = SymbolTable::new();
        let ns = table.namespace_path(&["Demo"]);
        let outer = declare(&mut table, ns, None, "Outer", Modifiers::empty()).unwrap();
        let inner = declare(&mut table, ns, Some(outer), "Inner", Modifiers::empty()).unwrap();
        assert_eq!(table.get(outer).unwrap().accessibility, Accessibility::Internal);
        assert_eq!(table.get(inner).unwrap().accessibility, Accessibility::Private);
        assert_eq!(table.qualified_name(inner), "Demo.Outer.Inner");
        assert_eq!(table.get(outer).unwrap().nested_type("Inner"), Some(inner));
    }

    #[test]
    fn partial_declarations_merge() {
        let mut table = SymbolTable::new();
        let ns = table.namespace_path(&["Demo"]);
        let first = declare(&mut table, ns, None, "Module", Modifiers::PARTIAL).unwrap();
        let second = declare(
            &mut table,
            ns,
            None,
            "Module",
            Modifiers::PUBLIC | Modifiers::PARTIAL | Modifiers::ABSTRACT,
        )
        .unwrap();
        assert_eq!(first, second);
        assert_eq!(table.len(), 1);

        let symbol = table.get(first).unwrap();
        assert_eq!(symbol.declarations.len(), 2);
        assert_eq!(symbol.accessibility, Accessibility::Public);
        assert!(symbol.is_abstract());
    }

    #[test]
    fn duplicate_type_detection() {
        let mut table = SymbolTable::new();
        let ns = table.namespace_path(&["Demo"]);
        declare(&mut table, ns, None, "Module", Modifiers::PUBLIC).unwrap();
        let error = declare(&mut table, ns, None, "Module", Modifiers::PUBLIC).unwrap_err();
        assert_eq!(
            error,
            SymbolError::DuplicateType {
                name: "Demo.Module".into(),
                span: Span::default()
            }
        );
    }

    #[test]
    fn partial_accessibility_conflict() {
        let mut table = SymbolTable::new();
        let ns = table.namespace_path(&["Demo"]);
        declare(&mut table, ns, None, "M", Modifiers::PUBLIC | Modifiers::PARTIAL).unwrap();
        let error = declare(&mut table, ns, None, "M", Modifiers::INTERNAL | Modifiers::PARTIAL)
            .unwrap_err();
        assert!(matches!(error, SymbolError::ConflictingAccessibility { .. }));
    }

    #[test]
    fn partial_kind_mismatch() {
        let mut table = SymbolTable::new();
        let ns = table.namespace_path(&["Demo"]);
        declare(&mut table, ns, None, "M", Modifiers::PARTIAL).unwrap();
        let error = table
            .declare_type(TypeDeclaration {
                namespace: ns,
                containing_type: None,
                name: "M",
                arity: 0,
                kind: TypeKind::Struct,
                modifiers: Modifiers::PARTIAL,
                origin: SymbolOrigin::Source,
                declaration: DeclarationRef { tree: 1, node: 9, span: Span::default() },
            })
            .unwrap_err();
        assert!(matches!(error, SymbolError::PartialKindMismatch { .. }));
    }

    #[test]
    fn resolve_dotted_and_global_names() {
        let mut table = SymbolTable::new();
        let runtime = table.namespace_path(&["Demo", "Runtime"]);
        let commands = table.namespace_path(&["Demo", "Commands"]);
        let base = declare(&mut table, runtime, None, "ModuleBase", Modifiers::PUBLIC).unwrap();

        let ctx = ResolutionContext::new(commands);
        let relative = [NamePart::new("Runtime", 0), NamePart::new("ModuleBase", 0)];
        assert_eq!(table.resolve_name(&relative, false, &ctx).ok(), Some(base));

        let rooted = [
            NamePart::new("Demo", 0),
            NamePart::new("Runtime", 0),
            NamePart::new("ModuleBase", 0),
        ];
        assert_eq!(table.resolve_name(&rooted, true, &ctx).ok(), Some(base));
        assert!(table.resolve_name(&relative, true, &ctx).is_not_found());
        assert!(table
            .resolve_name(&[NamePart::new("ModuleBase", 0)], false, &ctx)
            .is_not_found());
    }

    #[test]
    fn resolve_nested_type_from_inside() {
        let mut table = SymbolTable::new();
        let ns = table.namespace_path(&["Demo"]);
        let outer = declare(&mut table, ns, None, "Outer", Modifiers::PUBLIC).unwrap();
        let helper = declare(&mut table, ns, Some(outer), "Helper", Modifiers::PUBLIC).unwrap();
        let inner = declare(&mut table, ns, Some(outer), "Inner", Modifiers::PUBLIC).unwrap();

        let mut ctx = ResolutionContext::new(ns);
        ctx.containing_type = Some(inner);
        assert_eq!(table.resolve_simple(NamePart::new("Helper", 0), &ctx).ok(), Some(helper));

        let dotted = [NamePart::new("Outer", 0), NamePart::new("Helper", 0)];
        assert_eq!(table.resolve_name(&dotted, false, &ResolutionContext::new(ns)).ok(), Some(helper));
    }

    #[test]
    fn resolve_through_alias() {
        let mut table = SymbolTable::new();
        let runtime = table.namespace_path(&["Demo", "Runtime"]);
        let base = declare(&mut table, runtime, None, "ModuleBase", Modifiers::PUBLIC).unwrap();
        let root = table.namespaces().root();

        let mut ctx = ResolutionContext::new(root);
        ctx.aliases.push(("R".into(), AliasTarget::Namespace(runtime)));
        ctx.aliases.push(("Base".into(), AliasTarget::Type(base)));

        let through_namespace = [NamePart::new("R", 0), NamePart::new("ModuleBase", 0)];
        assert_eq!(table.resolve_name(&through_namespace, false, &ctx).ok(), Some(base));
        assert_eq!(table.resolve_name(&[NamePart::new("Base", 0)], false, &ctx).ok(), Some(base));
    }

    #[test]
    fn base_chain_stops_at_error_type() {
        let mut table = SymbolTable::new();
        let ns = table.namespace_path(&["Demo"]);
        let a = declare(&mut table, ns, None, "A", Modifiers::PUBLIC).unwrap();
        let b = declare(&mut table, ns, None, "B", Modifiers::PUBLIC).unwrap();
        table.set_base_types(a, Some(TypeRef::Named(b)), Vec::new());
        table.set_base_types(
            b,
            Some(TypeRef::Error(ErrorType {
                name: "ModuleBase".into(),
                text: "ModuleBase".into(),
                arity: 0,
            })),
            Vec::new(),
        );

        let names: Vec<_> = table.base_types(a).map(|base| table.simple_name(base)).collect();
        assert_eq!(names, ["B", "ModuleBase"]);
        assert!(table.derives_from(a, b));
        assert!(!table.derives_from(b, a));
    }

    #[test]
    fn base_chain_cycle_terminates() {
        let mut table = SymbolTable::new();
        let ns = table.namespace_path(&["Demo"]);
        let a = declare(&mut table, ns, None, "A", Modifiers::PUBLIC).unwrap();
        let b = declare(&mut table, ns, None, "B", Modifiers::PUBLIC).unwrap();
        table.set_base_types(a, Some(TypeRef::Named(b)), Vec::new());
        table.set_base_types(b, Some(TypeRef::Named(a)), Vec::new());

        assert_eq!(table.base_types(a).count(), 1);
        assert!(!table.derives_from(a, SymbolHash::from_name("Other")));
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let mut table = SymbolTable::new();
        let ns = table.namespace_path(&["Demo"]);
        for name in ["Zeta", "Alpha", "Mid"] {
            declare(&mut table, ns, None, name, Modifiers::PUBLIC).unwrap();
        }
        let names: Vec<_> = table.iter().map(|symbol| symbol.name.as_str()).collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mid"]);
    }
}
