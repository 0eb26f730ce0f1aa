//! Declaration Pass (Pass 1) - declare every type of one syntax tree.
//!
//! This pass walks namespaces and type declarations and declares each type in
//! the [`SymbolTable`]. Base lists are not bound here: a base may be declared
//! later in the same tree or in another tree, so each base list is recorded
//! as [`PendingBases`] together with the scope it was written in.
//!
//! ## Responsibilities
//!
//! - Create namespaces (block and file-scoped) in the namespace graph
//! - Declare types and delegates, merging partial declarations
//! - Map each declaration node to its symbol for the semantic model
//! - Collect the `using` directives in scope of every base list
//! - Collect `global using` directives for the whole compilation

use modgen_core::{Diagnostic, SymbolError, TypeKind};
use modgen_parser::ast::{
    CompilationUnit, DelegateDecl, MemberDecl, NamespaceDecl, NamespaceMember, TypeDecl,
    UsingDirective,
};
use modgen_registry::{
    DeclarationRef, NodeIndex, SymbolHash, SymbolOrigin, SymbolTable, TypeDeclaration,
};
use tracing::trace;

use crate::semantic::node_key;

/// A base list waiting to be bound by the inheritance pass.
#[derive(Debug, Clone)]
pub struct PendingBases<'ast> {
    /// Index of the tree the declaration is in.
    pub tree: usize,
    pub path: &'ast str,
    pub hash: SymbolHash,
    pub decl: &'ast TypeDecl<'ast>,
    /// Namespace the declaration is written in.
    pub namespace: NodeIndex,
    pub containing_type: Option<SymbolHash>,
    /// Using directives in scope with the namespace they were written in,
    /// innermost first.
    pub usings: Vec<(NodeIndex, &'ast [UsingDirective<'ast>])>,
}

/// Output of the declaration pass for one tree.
#[derive(Debug, Default)]
pub struct DeclarationOutput<'ast> {
    /// Number of declarations processed, partial parts included.
    pub types_declared: usize,
    /// `(node key, symbol)` for every declared node.
    pub declared: Vec<(usize, SymbolHash)>,
    pub pending: Vec<PendingBases<'ast>>,
    pub global_usings: Vec<&'ast UsingDirective<'ast>>,
    /// Declaration errors (compilation continues past them).
    pub diagnostics: Vec<Diagnostic>,
}

/// Pass 1: declare the types of one tree.
pub struct DeclarationPass<'a, 'ast> {
    symbols: &'a mut SymbolTable,
    tree: usize,
    path: &'ast str,
    origin: SymbolOrigin,
    namespace: NodeIndex,
    usings: Vec<(NodeIndex, &'ast [UsingDirective<'ast>])>,
    output: DeclarationOutput<'ast>,
}

impl<'a, 'ast> DeclarationPass<'a, 'ast> {
    /// Create a pass over tree number `tree`, found at `path`.
    pub fn new(symbols: &'a mut SymbolTable, tree: usize, path: &'ast str, origin: SymbolOrigin) -> Self {
        let namespace = symbols.namespaces().root();
        Self {
            symbols,
            tree,
            path,
            origin,
            namespace,
            usings: Vec::new(),
            output: DeclarationOutput::default(),
        }
    }

    /// Run the pass over a compilation unit.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, unit: &'ast CompilationUnit<'ast>) -> DeclarationOutput<'ast> {
        self.enter_usings(unit.usings);
        for member in unit.members {
            self.visit_namespace_member(member);
        }
        self.output
    }

    fn enter_usings(&mut self, usings: &'ast [UsingDirective<'ast>]) {
        if usings.is_empty() {
            return;
        }
        for using in usings.iter().filter(|using| using.is_global) {
            self.output.global_usings.push(using);
        }
        self.usings.insert(0, (self.namespace, usings));
    }

    fn visit_namespace_member(&mut self, member: &'ast NamespaceMember<'ast>) {
        match member {
            NamespaceMember::Namespace(ns) => self.visit_namespace(ns),
            NamespaceMember::Type(decl) => self.visit_type(decl, None),
            NamespaceMember::Delegate(decl) => self.visit_delegate(decl, None),
        }
    }

    // ==========================================================================
    // Namespace
    // ==========================================================================

    fn visit_namespace(&mut self, ns: &'ast NamespaceDecl<'ast>) {
        let segments: Vec<&str> = ns
            .name
            .segments
            .iter()
            .map(|segment| segment.ident.value_text())
            .collect();

        let outer_namespace = self.namespace;
        let outer_usings = self.usings.len();
        self.namespace = self
            .symbols
            .namespaces_mut()
            .get_or_create_path(outer_namespace, &segments);
        self.enter_usings(ns.usings);

        for member in ns.members {
            self.visit_namespace_member(member);
        }

        let added = self.usings.len() - outer_usings;
        self.usings.drain(..added);
        self.namespace = outer_namespace;
    }

    // ==========================================================================
    // Types
    // ==========================================================================

    fn visit_type(&mut self, decl: &'ast TypeDecl<'ast>, containing: Option<SymbolHash>) {
        let result = self.symbols.declare_type(TypeDeclaration {
            namespace: self.namespace,
            containing_type: containing,
            name: decl.name.value_text(),
            arity: decl.arity(),
            kind: decl.kind,
            modifiers: decl.modifiers.flags,
            origin: self.origin,
            declaration: DeclarationRef {
                tree: self.tree,
                node: node_key(decl),
                span: decl.span,
            },
        });

        let hash = match result {
            Ok(hash) => hash,
            Err(error) => {
                self.report(error);
                return;
            }
        };

        self.output.types_declared += 1;
        self.output.declared.push((node_key(decl), hash));
        if !decl.base_list.is_empty() {
            self.output.pending.push(PendingBases {
                tree: self.tree,
                path: self.path,
                hash,
                decl,
                namespace: self.namespace,
                containing_type: containing,
                usings: self.usings.clone(),
            });
        }

        for member in decl.members {
            match member {
                MemberDecl::Type(nested) => self.visit_type(nested, Some(hash)),
                MemberDecl::Delegate(nested) => self.visit_delegate(nested, Some(hash)),
                _ => {}
            }
        }
    }

    fn visit_delegate(&mut self, decl: &'ast DelegateDecl<'ast>, containing: Option<SymbolHash>) {
        let result = self.symbols.declare_type(TypeDeclaration {
            namespace: self.namespace,
            containing_type: containing,
            name: decl.name.value_text(),
            arity: decl.type_params.len(),
            kind: TypeKind::Delegate,
            modifiers: decl.modifiers.flags,
            origin: self.origin,
            declaration: DeclarationRef {
                tree: self.tree,
                node: node_key(decl),
                span: decl.span,
            },
        });

        match result {
            Ok(hash) => {
                self.output.types_declared += 1;
                self.output.declared.push((node_key(decl), hash));
            }
            Err(error) => self.report(error),
        }
    }

    fn report(&mut self, error: SymbolError) {
        // Source declarations shadow referenced ones of the same name.
        if self.origin == SymbolOrigin::Metadata {
            trace!(%error, path = self.path, "referenced type shadowed by source");
            return;
        }
        self.output
            .diagnostics
            .push(Diagnostic::from_symbol_error(self.path, &error));
    }
}
