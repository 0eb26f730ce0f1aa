//! Inheritance Pass (Pass 2) - bind base lists.
//!
//! Runs once every tree has been through the declaration pass, so forward
//! references and references across trees resolve. Each base list is bound
//! in the scope it was written in: enclosing namespaces, the file's `using`
//! directives and aliases, and the compilation's `global using` directives.
//!
//! A base that cannot be bound becomes an error type that keeps the name as
//! written. For classes, the first base is the base class when it binds to a
//! class or fails to bind; every other base is an interface.

use modgen_core::{Diagnostic, Location, TypeKind};
use modgen_parser::ast::{Name, TypeSyntax, UsingDirective};
use modgen_registry::{
    AliasTarget, ErrorType, NamePart, NodeIndex, ResolutionContext, ResolutionResult, SymbolTable,
    TypeRef,
};
use tracing::debug;

use crate::passes::PendingBases;

/// Output of the inheritance pass.
#[derive(Debug, Default)]
pub struct InheritanceOutput {
    /// Number of base list entries bound to a declared type.
    pub bases_bound: usize,
    /// Number of base list entries left as error types.
    pub bases_unresolved: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Pass 2: bind the base lists collected by the declaration pass.
pub struct InheritancePass<'a> {
    symbols: &'a mut SymbolTable,
    global_aliases: Vec<(String, AliasTarget)>,
    output: InheritanceOutput,
}

impl<'a> InheritancePass<'a> {
    pub fn new(symbols: &'a mut SymbolTable) -> Self {
        Self {
            symbols,
            global_aliases: Vec::new(),
            output: InheritanceOutput::default(),
        }
    }

    /// Apply `global using` directives: namespaces become visible from every
    /// file, aliases are added to every file's aliases.
    pub fn with_global_usings(mut self, usings: &[&UsingDirective<'_>]) -> Self {
        let root = self.symbols.namespaces().root();
        for using in usings.iter().filter(|using| !using.is_static) {
            match using.alias {
                Some(alias) => {
                    if let Some(target) = self.alias_target(&using.name, root) {
                        self.global_aliases
                            .push((alias.value_text().to_string(), target));
                    }
                }
                None => {
                    if let Some(ns) = self.using_namespace(&using.name, root) {
                        self.symbols.namespaces_mut().add_global_using(ns);
                    }
                }
            }
        }
        self
    }

    /// Bind every pending base list.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, pending: &[PendingBases<'_>]) -> InheritanceOutput {
        for bases in pending {
            self.bind_bases(bases);
        }
        self.output
    }

    fn bind_bases(&mut self, pending: &PendingBases<'_>) {
        let ctx = self.context(pending);
        let is_class = pending.decl.kind.is_class();

        let mut base_type = None;
        let mut interfaces = Vec::new();
        for (index, ty) in pending.decl.base_list.iter().enumerate() {
            let bound = self.bind(ty, &ctx, pending.path);
            let is_base_class = is_class
                && index == 0
                && match &bound {
                    TypeRef::Named(hash) => self.symbols.kind_of(*hash).is_some_and(TypeKind::is_class),
                    TypeRef::Error(_) => true,
                };
            if is_base_class {
                base_type = Some(bound);
            } else {
                interfaces.push(bound);
            }
        }

        // Partial declarations each contribute; the first base class written wins.
        if let Some(symbol) = self.symbols.get(pending.hash) {
            if base_type.is_none() {
                base_type = symbol.base_type.clone();
            }
            let mut merged = symbol.interfaces.clone();
            for interface in interfaces {
                if !merged.contains(&interface) {
                    merged.push(interface);
                }
            }
            interfaces = merged;
        }
        self.symbols.set_base_types(pending.hash, base_type, interfaces);
    }

    fn bind(&mut self, ty: &TypeSyntax<'_>, ctx: &ResolutionContext, path: &str) -> TypeRef {
        let Some(name) = ty.as_name() else {
            return self.unresolved(ty.text, ty.text, 0);
        };

        let parts = name_parts(name);
        match self.symbols.resolve_name(&parts, name.is_global(), ctx) {
            ResolutionResult::Found(hash) => {
                self.output.bases_bound += 1;
                TypeRef::Named(hash)
            }
            ResolutionResult::Ambiguous(matches) => {
                let candidates: Vec<String> = matches
                    .iter()
                    .map(|(_, hash)| self.symbols.qualified_name(*hash))
                    .collect();
                self.output.diagnostics.push(Diagnostic::error(
                    "MG2002",
                    format!(
                        "'{}' is an ambiguous reference between {}",
                        ty.text,
                        candidates.join(" and ")
                    ),
                    Some(Location::new(path, ty.span)),
                ));
                self.unresolved(name.simple_name(), ty.text, last_arity(name))
            }
            ResolutionResult::NotFound => {
                debug!(base = ty.text, path, "base type not found");
                self.unresolved(name.simple_name(), ty.text, last_arity(name))
            }
        }
    }

    fn unresolved(&mut self, name: &str, text: &str, arity: usize) -> TypeRef {
        self.output.bases_unresolved += 1;
        TypeRef::Error(ErrorType {
            name: name.to_string(),
            text: text.to_string(),
            arity,
        })
    }

    // ==========================================================================
    // Scope
    // ==========================================================================

    fn context(&self, pending: &PendingBases<'_>) -> ResolutionContext {
        let mut ctx = ResolutionContext::new(pending.namespace);
        ctx.containing_type = pending.containing_type;

        for (ns, usings) in &pending.usings {
            for using in usings.iter() {
                if using.is_static || using.is_global {
                    continue;
                }
                match using.alias {
                    Some(alias) => {
                        if let Some(target) = self.alias_target(&using.name, *ns) {
                            ctx.aliases.push((alias.value_text().to_string(), target));
                        }
                    }
                    None => {
                        if let Some(target) = self.using_namespace(&using.name, *ns) {
                            ctx.imports.push(target);
                        }
                    }
                }
            }
        }
        ctx.aliases.extend(self.global_aliases.iter().cloned());
        ctx
    }

    /// The namespace a `using` names, looked up from the namespace the
    /// directive is written in outwards.
    fn using_namespace(&self, name: &Name<'_>, from: NodeIndex) -> Option<NodeIndex> {
        let namespaces = self.symbols.namespaces();
        let segments: Vec<&str> = name
            .segments
            .iter()
            .map(|segment| segment.ident.value_text())
            .collect();
        if name.is_global() {
            return namespaces.get_path(&segments);
        }

        let mut scope = Some(from);
        while let Some(ns) = scope {
            let found = segments
                .iter()
                .try_fold(ns, |current, segment| namespaces.find_child(current, segment));
            if found.is_some() {
                return found;
            }
            scope = namespaces.find_parent(ns);
        }
        None
    }

    fn alias_target(&self, name: &Name<'_>, from: NodeIndex) -> Option<AliasTarget> {
        if let Some(ns) = self.using_namespace(name, from) {
            return Some(AliasTarget::Namespace(ns));
        }
        let ctx = ResolutionContext::new(from);
        self.symbols
            .resolve_name(&name_parts(name), name.is_global(), &ctx)
            .ok()
            .map(AliasTarget::Type)
    }
}

/// Dotted segments of a name. An alias qualifier other than `global` is the
/// first part.
fn name_parts<'ast>(name: &Name<'ast>) -> Vec<NamePart<'ast>> {
    let mut parts = Vec::with_capacity(name.segments.len() + 1);
    if let Some(alias) = name.alias.filter(|_| !name.is_global()) {
        parts.push(NamePart::new(alias.value_text(), 0));
    }
    parts.extend(
        name.segments
            .iter()
            .map(|segment| NamePart::new(segment.ident.value_text(), segment.arity())),
    );
    parts
}

fn last_arity(name: &Name<'_>) -> usize {
    name.last().map_or(0, |segment| segment.arity())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::{DeclarationOutput, DeclarationPass};
    use bumpalo::Bump;
    use modgen_parser::SyntaxTree;
    use modgen_registry::{SymbolHash, SymbolOrigin};

    fn bind_all(sources: &[&str]) -> (SymbolTable, InheritanceOutput) {
        let arena = Bump::new();
        let trees: Vec<_> = sources
            .iter()
            .enumerate()
            .map(|(i, text)| SyntaxTree::parse(&arena, &format!("Test{i}.cs"), text))
            .collect();

        let mut symbols = SymbolTable::new();
        let outputs: Vec<DeclarationOutput<'_>> = trees
            .iter()
            .enumerate()
            .map(|(i, tree)| {
                DeclarationPass::new(&mut symbols, i, tree.path(), SymbolOrigin::Source).run(tree.root())
            })
            .collect();

        let pending: Vec<_> = outputs.iter().flat_map(|o| o.pending.iter().cloned()).collect();
        let global_usings: Vec<_> = outputs.iter().flat_map(|o| o.global_usings.iter().copied()).collect();
        let output = InheritancePass::new(&mut symbols)
            .with_global_usings(&global_usings)
            .run(&pending);
        (symbols, output)
    }

    fn hash(name: &str) -> SymbolHash {
        SymbolHash::from_name(name)
    }

    #[test]
    fn binds_base_through_using() {
        let (symbols, output) = bind_all(&[
            "namespace Demo.Runtime { public abstract class ModuleBase { } }",
            "using Demo.Runtime;\nnamespace Demo.Commands { public class A : ModuleBase { } }",
        ]);
        assert!(output.diagnostics.is_empty());
        assert_eq!(output.bases_bound, 1);

        let a = symbols.get(hash("Demo.Commands.A")).unwrap();
        assert_eq!(a.base_type, Some(TypeRef::Named(hash("Demo.Runtime.ModuleBase"))));
    }

    #[test]
    fn forward_reference_in_same_namespace() {
        let (symbols, _) = bind_all(&["namespace Demo { class A : B { } class B { } }"]);
        let a = symbols.get(hash("Demo.A")).unwrap();
        assert_eq!(a.base_type, Some(TypeRef::Named(hash("Demo.B"))));
    }

    #[test]
    fn unresolved_base_keeps_simple_name() {
        let (symbols, output) = bind_all(&["public class A : Missing.ModuleBase { }"]);
        assert_eq!(output.bases_unresolved, 1);

        let a = symbols.get(hash("A")).unwrap();
        match &a.base_type {
            Some(TypeRef::Error(error)) => {
                assert_eq!(error.name, "ModuleBase");
                assert_eq!(error.text, "Missing.ModuleBase");
            }
            other => panic!("expected error base, got {other:?}"),
        }
    }

    #[test]
    fn interface_first_is_not_base_class() {
        let (symbols, _) = bind_all(&[
            "interface IRun { }\nclass Base { }\nclass A : IRun { }\nclass B : Base, IRun { }",
        ]);
        let a = symbols.get(hash("A")).unwrap();
        assert_eq!(a.base_type, None);
        assert_eq!(a.interfaces, [TypeRef::Named(hash("IRun"))]);

        let b = symbols.get(hash("B")).unwrap();
        assert_eq!(b.base_type, Some(TypeRef::Named(hash("Base"))));
        assert_eq!(b.interfaces, [TypeRef::Named(hash("IRun"))]);
    }

    #[test]
    fn struct_bases_are_interfaces() {
        let (symbols, _) = bind_all(&["interface IRun { }\nstruct S : IRun { }"]);
        let s = symbols.get(hash("S")).unwrap();
        assert_eq!(s.base_type, None);
        assert_eq!(s.interfaces.len(), 1);
    }

    #[test]
    fn alias_and_global_qualified_bases() {
        let (symbols, output) = bind_all(&[
            "namespace Demo.Runtime { public abstract class ModuleBase { } }",
            r#"
            using Rt = Demo.Runtime;
            using Base = Demo.Runtime.ModuleBase;
            class A : Rt.ModuleBase { }
            class B : Base { }
            class C : global::Demo.Runtime.ModuleBase { }
            class D : Rt::ModuleBase { }
            "#,
        ]);
        assert!(output.diagnostics.is_empty());
        let module_base = TypeRef::Named(hash("Demo.Runtime.ModuleBase"));
        for name in ["A", "B", "C", "D"] {
            let symbol = symbols.get(hash(name)).unwrap();
            assert_eq!(symbol.base_type.as_ref(), Some(&module_base), "{name}");
        }
    }

    #[test]
    fn global_using_applies_to_every_file() {
        let (symbols, _) = bind_all(&[
            "global using Demo.Runtime;\nnamespace Demo.Runtime { public abstract class ModuleBase { } }",
            "namespace Demo.Commands { public class A : ModuleBase { } }",
        ]);
        let a = symbols.get(hash("Demo.Commands.A")).unwrap();
        assert_eq!(a.base_type, Some(TypeRef::Named(hash("Demo.Runtime.ModuleBase"))));
    }

    #[test]
    fn ambiguous_base_is_reported() {
        let (symbols, output) = bind_all(&[
            "namespace One { public class Base { } }\nnamespace Two { public class Base { } }",
            "using One;\nusing Two;\nclass A : Base { }",
        ]);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].id, "MG2002");
        assert!(symbols.get(hash("A")).unwrap().base_type.as_ref().is_some_and(TypeRef::is_error));
    }

    #[test]
    fn nested_type_base_resolves_sibling() {
        let (symbols, _) = bind_all(&["class Outer { class Helper { } class Inner : Helper { } }"]);
        let outer = hash("Outer");
        let inner = symbols.get(SymbolHash::nested(outer, "Inner")).unwrap();
        assert_eq!(
            inner.base_type,
            Some(TypeRef::Named(SymbolHash::nested(outer, "Helper")))
        );
    }

    #[test]
    fn partial_parts_contribute_bases() {
        let (symbols, _) = bind_all(&[
            "class Base { }\ninterface IRun { }\npartial class A : Base { }",
            "partial class A : IRun { }",
        ]);
        let a = symbols.get(hash("A")).unwrap();
        assert_eq!(a.base_type, Some(TypeRef::Named(hash("Base"))));
        assert_eq!(a.interfaces, [TypeRef::Named(hash("IRun"))]);
    }
}
