//! Compilation - syntax trees, references and the symbols declared by them.
//!
//! Building a compilation runs the symbol passes:
//!
//! ```text
//! source trees ──┐
//!                ├─► DeclarationPass (per tree) ─► InheritancePass ─► SymbolTable
//! reference trees┘
//! ```
//!
//! A compilation is immutable once built. Adding trees produces a new
//! compilation over the same arena.

use bumpalo::Bump;
use modgen_core::Diagnostic;
use modgen_parser::SyntaxTree;
use modgen_parser::ast::TypeDecl;
use modgen_registry::{SymbolHash, SymbolOrigin, SymbolTable, TypeSymbol};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::metadata::MetadataReference;
use crate::options::AnalyzerConfigOptions;
use crate::passes::{DeclarationPass, InheritancePass};
use crate::semantic::{SemanticModel, node_key};

/// Builder for [`Compilation`].
pub struct CompilationBuilder<'ast> {
    arena: &'ast Bump,
    syntax_trees: Vec<SyntaxTree<'ast>>,
    references: Vec<MetadataReference<'ast>>,
    options: AnalyzerConfigOptions,
}

impl<'ast> CompilationBuilder<'ast> {
    /// Parse `text` into the arena and add it as a source tree.
    pub fn add_source(mut self, path: &str, text: &str) -> Self {
        self.syntax_trees
            .push(SyntaxTree::parse(self.arena, path, text));
        self
    }

    pub fn add_syntax_tree(mut self, tree: SyntaxTree<'ast>) -> Self {
        self.syntax_trees.push(tree);
        self
    }

    pub fn add_syntax_trees(mut self, trees: impl IntoIterator<Item = SyntaxTree<'ast>>) -> Self {
        self.syntax_trees.extend(trees);
        self
    }

    pub fn add_reference(mut self, reference: MetadataReference<'ast>) -> Self {
        self.references.push(reference);
        self
    }

    pub fn with_options(mut self, options: AnalyzerConfigOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Compilation<'ast> {
        Compilation::new(self.arena, self.syntax_trees, self.references, self.options)
    }
}

/// A set of syntax trees bound together.
pub struct Compilation<'ast> {
    arena: &'ast Bump,
    syntax_trees: Vec<SyntaxTree<'ast>>,
    references: Vec<MetadataReference<'ast>>,
    options: AnalyzerConfigOptions,
    symbols: SymbolTable,
    /// Declaration node key to symbol.
    declared: FxHashMap<usize, SymbolHash>,
    /// Diagnostics from the symbol passes.
    declaration_diagnostics: Vec<Diagnostic>,
}

impl<'ast> Compilation<'ast> {
    pub fn builder(arena: &'ast Bump) -> CompilationBuilder<'ast> {
        CompilationBuilder {
            arena,
            syntax_trees: Vec::new(),
            references: Vec::new(),
            options: AnalyzerConfigOptions::default(),
        }
    }

    /// Bind `syntax_trees` against `references`.
    ///
    /// Source trees are declared before reference trees, so a source type
    /// shadows a referenced type with the same name.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn new(
        arena: &'ast Bump,
        syntax_trees: Vec<SyntaxTree<'ast>>,
        references: Vec<MetadataReference<'ast>>,
        options: AnalyzerConfigOptions,
    ) -> Self {
        let mut symbols = SymbolTable::new();
        let mut declared = FxHashMap::default();
        let mut pending = Vec::new();
        let mut global_usings = Vec::new();
        let mut declaration_diagnostics = Vec::new();

        let sources = syntax_trees.iter().map(|tree| (tree, SymbolOrigin::Source));
        let referenced = references
            .iter()
            .flat_map(MetadataReference::syntax_trees)
            .map(|tree| (tree, SymbolOrigin::Metadata));

        for (index, (tree, origin)) in sources.chain(referenced).enumerate() {
            let output = DeclarationPass::new(&mut symbols, index, tree.path(), origin).run(tree.root());
            declared.extend(output.declared);
            pending.extend(output.pending);
            if origin == SymbolOrigin::Source {
                global_usings.extend(output.global_usings);
            }
            declaration_diagnostics.extend(output.diagnostics);
        }

        let inheritance = InheritancePass::new(&mut symbols)
            .with_global_usings(&global_usings)
            .run(&pending);
        declaration_diagnostics.extend(inheritance.diagnostics);

        debug!(
            trees = syntax_trees.len(),
            references = references.len(),
            types = symbols.len(),
            bases_bound = inheritance.bases_bound,
            bases_unresolved = inheritance.bases_unresolved,
            "compilation built"
        );

        Self {
            arena,
            syntax_trees,
            references,
            options,
            symbols,
            declared,
            declaration_diagnostics,
        }
    }

    /// The arena trees of this compilation live in.
    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    /// Source trees, in the order they were added.
    pub fn syntax_trees(&self) -> &[SyntaxTree<'ast>] {
        &self.syntax_trees
    }

    pub fn references(&self) -> &[MetadataReference<'ast>] {
        &self.references
    }

    pub fn options(&self) -> &AnalyzerConfigOptions {
        &self.options
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Tree by declaration index: source trees first, then the trees of each
    /// reference in order.
    pub fn tree(&self, index: usize) -> Option<&SyntaxTree<'ast>> {
        match index.checked_sub(self.syntax_trees.len()) {
            None => self.syntax_trees.get(index),
            Some(offset) => self
                .references
                .iter()
                .flat_map(MetadataReference::syntax_trees)
                .nth(offset),
        }
    }

    /// Semantic model for one of this compilation's trees.
    pub fn semantic_model<'c>(&'c self, tree: &'c SyntaxTree<'ast>) -> SemanticModel<'c, 'ast> {
        SemanticModel::new(self, tree)
    }

    /// The tree a declared type declaration node belongs to.
    pub fn syntax_tree_of(&self, decl: &TypeDecl<'ast>) -> Option<&SyntaxTree<'ast>> {
        let key = node_key(decl);
        let symbol = self.declared_symbol(key)?;
        let declaration = symbol
            .declarations
            .iter()
            .find(|declaration| declaration.node == key)?;
        self.tree(declaration.tree)
    }

    pub(crate) fn declared_symbol(&self, node: usize) -> Option<&TypeSymbol> {
        let hash = self.declared.get(&node)?;
        self.symbols.get(*hash)
    }

    /// Look up a type by its full metadata name.
    ///
    /// Namespaces are separated by `.`, nested types by `+`, and generic
    /// types carry their arity: ``Demo.Outer`1+Inner``.
    pub fn get_type_by_metadata_name(&self, name: &str) -> Option<&TypeSymbol> {
        let (namespace, types) = match name.find('+') {
            Some(plus) => {
                let outer_end = name[..plus].rfind('.').map_or(0, |dot| dot + 1);
                (&name[..outer_end], &name[outer_end..])
            }
            None => match name.rfind('.') {
                Some(dot) => (&name[..dot + 1], &name[dot + 1..]),
                None => ("", name),
            },
        };

        let segments: Vec<&str> = namespace
            .trim_end_matches('.')
            .split('.')
            .filter(|segment| !segment.is_empty())
            .collect();
        let namespaces = self.symbols.namespaces();
        let ns = namespaces.get_path(&segments)?;

        let mut parts = types.split('+');
        let mut hash = namespaces.type_in(ns, parts.next()?)?;
        for nested in parts {
            hash = self.symbols.get(hash)?.nested_type(nested)?;
        }
        self.symbols.get(hash)
    }

    /// Errors from declaring and binding types.
    pub fn declaration_diagnostics(&self) -> &[Diagnostic] {
        &self.declaration_diagnostics
    }

    /// Parse errors of the source trees followed by declaration diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.syntax_trees
            .iter()
            .flat_map(SyntaxTree::diagnostics)
            .chain(self.declaration_diagnostics.iter().cloned())
            .collect()
    }

    /// A new compilation with `trees` added after the existing ones.
    pub fn add_syntax_trees(&self, trees: impl IntoIterator<Item = SyntaxTree<'ast>>) -> Compilation<'ast> {
        let mut syntax_trees = self.syntax_trees.clone();
        syntax_trees.extend(trees);
        Compilation::new(
            self.arena,
            syntax_trees,
            self.references.clone(),
            self.options.clone(),
        )
    }

    /// A new compilation with different options.
    pub fn with_options(&self, options: AnalyzerConfigOptions) -> Compilation<'ast> {
        Compilation::new(
            self.arena,
            self.syntax_trees.clone(),
            self.references.clone(),
            options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modgen_core::DiagnosticSeverity;
    use modgen_registry::TypeRef;

    const RUNTIME: &str = r#"
        namespace Demo.Runtime
        {
            public abstract class ModuleBase { }
            public class Outer<T> { public class Inner { } }
        }
    "#;

    fn runtime(arena: &Bump) -> MetadataReference<'_> {
        MetadataReference::from_sources(arena, "Demo.Runtime", [("Runtime.cs", RUNTIME)])
    }

    #[test]
    fn source_binds_against_reference() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena)
            .add_source(
                "Test0.cs",
                "using Demo.Runtime;\npublic class TestModule : ModuleBase { }",
            )
            .add_reference(runtime(&arena))
            .build();

        assert!(compilation.diagnostics().is_empty());
        let module = compilation.get_type_by_metadata_name("TestModule").unwrap();
        let base = compilation
            .get_type_by_metadata_name("Demo.Runtime.ModuleBase")
            .unwrap();
        assert_eq!(module.base_type, Some(TypeRef::Named(base.hash)));
        assert_eq!(base.origin, SymbolOrigin::Metadata);
        assert!(!compilation.symbols().is_source(base.hash));
    }

    #[test]
    fn metadata_names_with_arity_and_nesting() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena).add_reference(runtime(&arena)).build();

        let outer = compilation
            .get_type_by_metadata_name("Demo.Runtime.Outer`1")
            .unwrap();
        assert_eq!(outer.arity, 1);
        let inner = compilation
            .get_type_by_metadata_name("Demo.Runtime.Outer`1+Inner")
            .unwrap();
        assert_eq!(inner.containing_type, Some(outer.hash));
        assert!(compilation.get_type_by_metadata_name("Demo.Runtime.Outer").is_none());
        assert!(compilation.get_type_by_metadata_name("Missing.Type").is_none());
    }

    #[test]
    fn syntax_tree_of_declaration() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena)
            .add_source("Test0.cs", "class A { }")
            .add_source("Test1.cs", "partial class B { }")
            .add_source("Test2.cs", "partial class B { }")
            .build();
        for tree in compilation.syntax_trees() {
            let decl = tree.type_declarations().next().unwrap();
            assert_eq!(compilation.syntax_tree_of(decl).map(SyntaxTree::path), Some(tree.path()));
        }
    }

    #[test]
    fn tree_indexes_span_sources_and_references() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena)
            .add_source("Test0.cs", "class A { }")
            .add_reference(runtime(&arena))
            .build();
        assert_eq!(compilation.tree(0).map(SyntaxTree::path), Some("Test0.cs"));
        assert_eq!(compilation.tree(1).map(SyntaxTree::path), Some("Runtime.cs"));
        assert!(compilation.tree(2).is_none());
    }

    #[test]
    fn diagnostics_include_parse_and_symbol_errors() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena)
            .add_source("Test0.cs", "class A { }\nclass A { }")
            .add_source("Test1.cs", "class B {")
            .build();

        let diagnostics = compilation.diagnostics();
        assert!(diagnostics.iter().any(|d| d.id == "MG2001"));
        assert!(diagnostics.iter().any(|d| d.id.starts_with("MG1")));
        assert!(diagnostics.iter().all(|d| d.severity == DiagnosticSeverity::Error));
        assert_eq!(compilation.declaration_diagnostics().len(), 1);
    }

    #[test]
    fn source_type_shadows_reference() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena)
            .add_source("Test0.cs", "namespace Demo.Runtime { public abstract class ModuleBase { } }")
            .add_reference(runtime(&arena))
            .build();
        assert!(compilation.declaration_diagnostics().is_empty());
        let base = compilation
            .get_type_by_metadata_name("Demo.Runtime.ModuleBase")
            .unwrap();
        assert_eq!(base.origin, SymbolOrigin::Source);
    }

    #[test]
    fn add_syntax_trees_rebinds() {
        let arena = Bump::new();
        let first = Compilation::builder(&arena)
            .add_source("Test0.cs", "class A : B { }")
            .with_options(AnalyzerConfigOptions::new().with("k", "v"))
            .build();
        let a = first.get_type_by_metadata_name("A").unwrap();
        assert!(a.base_type.as_ref().is_some_and(TypeRef::is_error));

        let second = first.add_syntax_trees([SyntaxTree::parse(&arena, "Test1.cs", "class B { }")]);
        assert_eq!(second.syntax_trees().len(), 2);
        assert_eq!(second.options().get("k"), Some("v"));
        let a = second.get_type_by_metadata_name("A").unwrap();
        let b = second.get_type_by_metadata_name("B").unwrap();
        assert_eq!(a.base_type, Some(TypeRef::Named(b.hash)));
    }
}
