//! Metadata references.
//!
//! A reference stands in for a compiled library: its types are declared in
//! the compilation so names resolve against them, but its trees are never
//! shown to generators and never produce diagnostics.

use bumpalo::Bump;
use modgen_parser::SyntaxTree;

/// Types from outside the compilation, described by parsed declarations.
#[derive(Debug, Clone)]
pub struct MetadataReference<'ast> {
    display: &'ast str,
    trees: Vec<SyntaxTree<'ast>>,
}

impl<'ast> MetadataReference<'ast> {
    /// Parse `(path, text)` pairs into a reference named `display`.
    pub fn from_sources<'s>(
        arena: &'ast Bump,
        display: &str,
        sources: impl IntoIterator<Item = (&'s str, &'s str)>,
    ) -> Self {
        let trees = sources
            .into_iter()
            .map(|(path, text)| SyntaxTree::parse(arena, path, text))
            .collect();
        Self {
            display: arena.alloc_str(display),
            trees,
        }
    }

    /// A reference over trees that were already parsed.
    pub fn from_trees(arena: &'ast Bump, display: &str, trees: Vec<SyntaxTree<'ast>>) -> Self {
        Self {
            display: arena.alloc_str(display),
            trees,
        }
    }

    /// Name shown in logs, e.g. `Demo.Runtime`.
    pub fn display(&self) -> &'ast str {
        self.display
    }

    pub fn syntax_trees(&self) -> &[SyntaxTree<'ast>] {
        &self.trees
    }
}
