//! Semantic model: declaration nodes of one tree mapped to their symbols.

use modgen_parser::SyntaxTree;
use modgen_parser::ast::{DelegateDecl, TypeDecl};
use modgen_registry::TypeSymbol;

use crate::Compilation;

/// Key of a declaration node: its address in the arena.
///
/// Trees are never moved out of the arena, so the key is stable for as long
/// as the tree is alive and distinct for every node.
pub(crate) fn node_key<T>(node: &T) -> usize {
    std::ptr::from_ref(node).addr()
}

/// Semantic questions about one syntax tree of a compilation.
#[derive(Clone, Copy)]
pub struct SemanticModel<'c, 'ast> {
    compilation: &'c Compilation<'ast>,
    tree: &'c SyntaxTree<'ast>,
}

impl<'c, 'ast> SemanticModel<'c, 'ast> {
    pub(crate) fn new(compilation: &'c Compilation<'ast>, tree: &'c SyntaxTree<'ast>) -> Self {
        Self { compilation, tree }
    }

    pub fn compilation(&self) -> &'c Compilation<'ast> {
        self.compilation
    }

    pub fn syntax_tree(&self) -> &'c SyntaxTree<'ast> {
        self.tree
    }

    /// The symbol declared by a type declaration node.
    ///
    /// `None` when the node was not declared, e.g. a duplicate of an existing
    /// type or a node from a tree outside the compilation.
    pub fn declared_symbol(&self, decl: &TypeDecl<'ast>) -> Option<&'c TypeSymbol> {
        self.compilation.declared_symbol(node_key(decl))
    }

    /// The symbol declared by a delegate declaration node.
    pub fn declared_delegate_symbol(&self, decl: &DelegateDecl<'ast>) -> Option<&'c TypeSymbol> {
        self.compilation.declared_symbol(node_key(decl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use modgen_core::{Accessibility, TypeKind};

    #[test]
    fn declared_symbols_of_nodes() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena)
            .add_source(
                "Test0.cs",
                "namespace Demo { public abstract class A { } class B : A { public delegate void D(); } }",
            )
            .build();
        let tree = &compilation.syntax_trees()[0];
        let model = compilation.semantic_model(tree);

        let decls: Vec<_> = tree.type_declarations().collect();
        let a = model.declared_symbol(decls[0]).unwrap();
        assert_eq!(a.name, "A");
        assert!(a.is_abstract());
        assert_eq!(a.declared_accessibility(), Accessibility::Public);

        let b = model.declared_symbol(decls[1]).unwrap();
        assert_eq!(b.declared_accessibility(), Accessibility::Internal);
        assert_eq!(b.base_type.as_ref().and_then(|base| base.hash()), Some(a.hash));

        let delegate = tree
            .descendant_nodes()
            .find_map(|node| match node {
                modgen_parser::SyntaxNode::Delegate(decl) => Some(decl),
                _ => None,
            })
            .unwrap();
        let d = model.declared_delegate_symbol(delegate).unwrap();
        assert_eq!(d.kind, TypeKind::Delegate);
        assert!(d.is_nested());
    }

    #[test]
    fn node_from_another_tree_has_no_symbol() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena)
            .add_source("Test0.cs", "public class A { }")
            .build();
        let other = SyntaxTree::parse(&arena, "Other.cs", "public class A { }");
        let model = compilation.semantic_model(&compilation.syntax_trees()[0]);

        let foreign = other.type_declarations().next().unwrap();
        assert!(model.declared_symbol(foreign).is_none());
    }
}
