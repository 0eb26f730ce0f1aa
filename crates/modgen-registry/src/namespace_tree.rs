//! Namespace Tree - hierarchical storage for declared types.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: `NamespaceData` (types declared directly in that namespace)
//! - Edges: `Contains(name)` for hierarchy, `Uses` for `global using` directives
//!
//! File-level `using` directives are not edges: they only apply to the file
//! that writes them, so they travel in the [`ResolutionContext`].

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

use crate::SymbolHash;

/// Result of name resolution that may be ambiguous.
///
/// When several imported namespaces bring the same name into scope,
/// resolution is ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult<T> {
    /// Found exactly one match.
    Found(T),
    /// Found one match in each of several imported namespaces.
    Ambiguous(Vec<(NodeIndex, T)>),
    /// Not found in any searched location.
    NotFound,
}

impl<T> ResolutionResult<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, ResolutionResult::Found(_))
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ResolutionResult::Ambiguous(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolutionResult::NotFound)
    }

    /// `Some` for `Found`, `None` otherwise.
    pub fn ok(self) -> Option<T> {
        match self {
            ResolutionResult::Found(v) => Some(v),
            _ => None,
        }
    }

    /// Apply `f` to every value.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> ResolutionResult<U> {
        match self {
            ResolutionResult::Found(v) => ResolutionResult::Found(f(v)),
            ResolutionResult::Ambiguous(matches) => ResolutionResult::Ambiguous(
                matches.into_iter().map(|(ns, v)| (ns, f(v))).collect(),
            ),
            ResolutionResult::NotFound => ResolutionResult::NotFound,
        }
    }
}

/// Target of a `using Alias = ...;` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasTarget {
    Namespace(NodeIndex),
    Type(SymbolHash),
}

/// Where an unqualified name is looked up from.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    /// The namespace of the declaration being bound.
    pub current_namespace: NodeIndex,
    /// The innermost type enclosing the name, for nested type lookup.
    pub containing_type: Option<SymbolHash>,
    /// Namespaces imported by `using` directives in scope for the file.
    pub imports: Vec<NodeIndex>,
    /// `using Alias = ...;` directives in scope, innermost first.
    pub aliases: Vec<(String, AliasTarget)>,
}

impl ResolutionContext {
    pub fn new(current_namespace: NodeIndex) -> Self {
        Self {
            current_namespace,
            containing_type: None,
            imports: Vec::new(),
            aliases: Vec::new(),
        }
    }

    pub fn with_imports(mut self, imports: Vec<NodeIndex>) -> Self {
        self.imports = imports;
        self
    }

    /// The innermost alias with this name.
    pub fn alias(&self, name: &str) -> Option<AliasTarget> {
        self.aliases
            .iter()
            .find(|(alias, _)| alias == name)
            .map(|(_, target)| *target)
    }
}

/// Edge types in the namespace graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceEdge {
    /// Parent namespace contains child namespace.
    /// The String is the child's simple name.
    Contains(String),
    /// `global using` directive; the source is always the root.
    Uses,
}

/// Data stored in each namespace node.
#[derive(Debug, Default)]
pub struct NamespaceData {
    /// Types in this namespace by metadata name (`Name` or ``Name`2``).
    pub types: FxHashMap<String, SymbolHash>,
}

impl NamespaceData {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The namespace graph.
pub struct NamespaceTree {
    /// The directed graph storing all namespaces.
    graph: DiGraph<NamespaceData, NamespaceEdge>,

    /// The root (global) namespace node.
    root: NodeIndex,
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceTree {
    /// Create a new namespace tree with an empty root.
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(NamespaceData::new());
        Self { graph, root }
    }

    /// Get the root namespace node index.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Number of namespaces, the root included.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn get_namespace(&self, node: NodeIndex) -> Option<&NamespaceData> {
        self.graph.node_weight(node)
    }

    /// Find a child namespace by name.
    pub fn find_child(&self, parent: NodeIndex, name: &str) -> Option<NodeIndex> {
        self.graph.edges(parent).find_map(|edge| match edge.weight() {
            NamespaceEdge::Contains(child_name) if child_name == name => Some(edge.target()),
            _ => None,
        })
    }

    /// Get or create a child namespace.
    pub fn get_or_create_child(&mut self, parent: NodeIndex, name: &str) -> NodeIndex {
        if let Some(child) = self.find_child(parent, name) {
            return child;
        }

        let child = self.graph.add_node(NamespaceData::new());
        self.graph
            .add_edge(parent, child, NamespaceEdge::Contains(name.to_string()));
        child
    }

    /// Get or create a namespace path below `from`.
    pub fn get_or_create_path<S: AsRef<str>>(&mut self, from: NodeIndex, path: &[S]) -> NodeIndex {
        let mut current = from;
        for segment in path {
            current = self.get_or_create_child(current, segment.as_ref());
        }
        current
    }

    /// Get an existing namespace by path from the root.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeIndex> {
        let mut current = self.root;
        for segment in path {
            current = self.find_child(current, segment.as_ref())?;
        }
        Some(current)
    }

    /// Find the parent namespace of a node.
    pub fn find_parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .find(|edge| matches!(edge.weight(), NamespaceEdge::Contains(_)))
            .map(|edge| edge.source())
    }

    /// Get the simple name of a namespace node. The root has none.
    pub fn get_namespace_name(&self, node: NodeIndex) -> Option<&str> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .find_map(|edge| match edge.weight() {
                NamespaceEdge::Contains(name) => Some(name.as_str()),
                NamespaceEdge::Uses => None,
            })
    }

    /// Get the full namespace path for a node.
    pub fn get_namespace_path(&self, node: NodeIndex) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = node;

        while current != self.root {
            if let Some(name) = self.get_namespace_name(current) {
                path.push(name);
            }
            match self.find_parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }

        path.reverse();
        path
    }

    /// Dotted name of a namespace. Empty for the root.
    pub fn namespace_name(&self, node: NodeIndex) -> String {
        self.get_namespace_path(node).join(".")
    }

    /// Dotted qualified name for a symbol declared in a namespace.
    pub fn qualified_name(&self, ns_node: NodeIndex, simple_name: &str) -> String {
        let path = self.get_namespace_path(ns_node);
        if path.is_empty() {
            simple_name.to_string()
        } else {
            format!("{}.{}", path.join("."), simple_name)
        }
    }

    /// Add a `global using` directive importing `target_ns` everywhere.
    pub fn add_global_using(&mut self, target_ns: NodeIndex) {
        let root = self.root;
        let exists = self
            .graph
            .edges(root)
            .any(|edge| matches!(edge.weight(), NamespaceEdge::Uses) && edge.target() == target_ns);
        if !exists {
            self.graph.add_edge(root, target_ns, NamespaceEdge::Uses);
        }
    }

    /// Namespaces imported by `global using` directives.
    pub fn global_usings(&self) -> Vec<NodeIndex> {
        self.graph
            .edges(self.root)
            .filter(|edge| matches!(edge.weight(), NamespaceEdge::Uses))
            .map(|edge| edge.target())
            .collect()
    }

    // ========================================================================
    // Type Registration
    // ========================================================================

    /// Record a type in a namespace.
    ///
    /// Returns the hash already registered under the same metadata name, if
    /// any, in which case nothing is changed.
    pub fn register_type(
        &mut self,
        ns_node: NodeIndex,
        metadata_name: &str,
        hash: SymbolHash,
    ) -> Option<SymbolHash> {
        let ns_data = self.graph.node_weight_mut(ns_node)?;
        if let Some(existing) = ns_data.types.get(metadata_name) {
            return Some(*existing);
        }
        ns_data.types.insert(metadata_name.to_string(), hash);
        None
    }

    /// A type declared directly in `ns_node`.
    pub fn type_in(&self, ns_node: NodeIndex, metadata_name: &str) -> Option<SymbolHash> {
        self.graph.node_weight(ns_node)?.types.get(metadata_name).copied()
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve an unqualified type name from a context.
    ///
    /// Search order:
    /// 1. Current namespace
    /// 2. Parent namespaces (walking up to root)
    /// 3. Namespaces imported by the file, then by `global using` (non-transitive)
    ///
    /// Several imports bringing in different types is an ambiguity.
    pub fn resolve_type_checked(
        &self,
        metadata_name: &str,
        ctx: &ResolutionContext,
    ) -> ResolutionResult<SymbolHash> {
        // Namespace hierarchy (no ambiguity possible here)
        let mut current = Some(ctx.current_namespace);
        while let Some(ns_node) = current {
            if let Some(hash) = self.type_in(ns_node, metadata_name) {
                return ResolutionResult::Found(hash);
            }
            current = self.find_parent(ns_node);
        }

        let mut matches: Vec<(NodeIndex, SymbolHash)> = Vec::new();
        for using_ns in ctx.imports.iter().copied().chain(self.global_usings()) {
            if let Some(hash) = self.type_in(using_ns, metadata_name) {
                if !matches.iter().any(|(_, h)| *h == hash) {
                    matches.push((using_ns, hash));
                }
            }
        }

        match matches.len() {
            0 => ResolutionResult::NotFound,
            1 => ResolutionResult::Found(matches[0].1),
            _ => ResolutionResult::Ambiguous(matches),
        }
    }

    /// Resolve an unqualified type name, taking the first match on ambiguity.
    pub fn resolve_type(&self, metadata_name: &str, ctx: &ResolutionContext) -> Option<SymbolHash> {
        match self.resolve_type_checked(metadata_name, ctx) {
            ResolutionResult::Found(hash) => Some(hash),
            ResolutionResult::Ambiguous(matches) => matches.first().map(|(_, hash)| *hash),
            ResolutionResult::NotFound => None,
        }
    }

    /// Resolve the first segment of a namespace name.
    ///
    /// Namespaces are looked up as children of the current namespace and
    /// then of each enclosing one, so `Runtime` inside `namespace Demo`
    /// finds `Demo.Runtime`.
    pub fn resolve_namespace(&self, name: &str, ctx: &ResolutionContext) -> Option<NodeIndex> {
        let mut current = Some(ctx.current_namespace);
        while let Some(ns_node) = current {
            if let Some(child) = self.find_child(ns_node, name) {
                return Some(child);
            }
            current = self.find_parent(ns_node);
        }
        None
    }
}
