//! Candidate validation against the compilation.
//!
//! A candidate is a module when it was declared, is concrete, is public and
//! derives, directly or through other classes, from the configured base
//! type. Every failed check is a [`SkipReason`].

use modgen_compiler::{Compilation, SemanticModel};
use modgen_core::{Diagnostic, Location};
use modgen_parser::ast::TypeDecl;
use modgen_registry::{SymbolTable, TypeRef, TypeSymbol};
use thiserror::Error;

use crate::options::{ModuleGeneratorOptions, TypeMatch};

/// Why a candidate produced no source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("type '{0}' was not declared in the compilation")]
    NotDeclared(String),
    #[error("module '{0}' is abstract")]
    Abstract(String),
    #[error("module '{0}' is not public")]
    NotPublic(String),
    #[error("type '{name}' does not derive from '{base_type}'")]
    MissingBase { name: String, base_type: String },
    #[error("module '{name}' has no methods marked with [{marker}]")]
    NoCommands { name: String, marker: String },
}

impl SkipReason {
    pub fn diagnostic_id(&self) -> &'static str {
        match self {
            SkipReason::Abstract(_) => "MG0001",
            SkipReason::NotPublic(_) => "MG0002",
            SkipReason::MissingBase { .. } => "MG0003",
            SkipReason::NoCommands { .. } => "MG0004",
            SkipReason::NotDeclared(_) => "MG0005",
        }
    }

    /// An `Info` diagnostic at `location`.
    pub fn to_diagnostic(&self, location: Option<Location>) -> Diagnostic {
        Diagnostic::info(self.diagnostic_id(), self.to_string(), location)
    }
}

/// A candidate that passed validation.
#[derive(Clone, Copy)]
pub struct ModuleType<'c, 'ast> {
    pub decl: &'ast TypeDecl<'ast>,
    pub symbol: &'c TypeSymbol,
    pub model: SemanticModel<'c, 'ast>,
}

impl<'c, 'ast> ModuleType<'c, 'ast> {
    /// Namespace of the module, empty for the global namespace.
    pub fn namespace(&self) -> String {
        self.model
            .compilation()
            .symbols()
            .namespaces()
            .namespace_name(self.symbol.namespace)
    }
}

/// Check `candidate` against the compilation.
pub fn validate_candidate<'c, 'ast>(
    compilation: &'c Compilation<'ast>,
    candidate: &'ast TypeDecl<'ast>,
    options: &ModuleGeneratorOptions,
) -> Result<ModuleType<'c, 'ast>, SkipReason> {
    let name = candidate.name.value_text();
    let not_declared = || SkipReason::NotDeclared(name.to_string());

    let tree = compilation.syntax_tree_of(candidate).ok_or_else(not_declared)?;
    let model = compilation.semantic_model(tree);
    let symbol = model.declared_symbol(candidate).ok_or_else(not_declared)?;

    if symbol.is_abstract() {
        return Err(SkipReason::Abstract(name.to_string()));
    }
    if !symbol.declared_accessibility().is_public() {
        return Err(SkipReason::NotPublic(name.to_string()));
    }

    let symbols = compilation.symbols();
    let derives = symbols
        .base_types(symbol.hash)
        .any(|base| base_matches(symbols, base, options));
    if !derives {
        return Err(SkipReason::MissingBase {
            name: name.to_string(),
            base_type: options.base_type.clone(),
        });
    }

    Ok(ModuleType {
        decl: candidate,
        symbol,
        model,
    })
}

fn base_matches(symbols: &SymbolTable, base: &TypeRef, options: &ModuleGeneratorOptions) -> bool {
    match options.base_type_match {
        TypeMatch::Simple => symbols.simple_name(base) == options.base_type,
        TypeMatch::Qualified => base
            .hash()
            .is_some_and(|hash| symbols.qualified_name(hash) == options.base_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use modgen_parser::SyntaxTree;

    use crate::runtime;

    fn validate_all<'ast>(
        compilation: &Compilation<'ast>,
        options: &ModuleGeneratorOptions,
    ) -> Vec<(&'ast str, Result<(), SkipReason>)> {
        compilation
            .syntax_trees()
            .iter()
            .flat_map(SyntaxTree::type_declarations)
            .map(|decl| {
                let result = validate_candidate(compilation, decl, options).map(|_| ());
                (decl.name.name, result)
            })
            .collect()
    }

    #[test]
    fn accepts_direct_and_indirect_modules() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena)
            .add_source(
                "Test0.cs",
                r#"
                using Modgen.Runtime;
                namespace Demo
                {
                    public partial class Direct : ModuleBase { }
                    public abstract class Shared : ModuleBase { }
                    public class Indirect : Shared { }
                }
                "#,
            )
            .add_reference(runtime::reference(&arena))
            .build();

        let results = validate_all(&compilation, &ModuleGeneratorOptions::default());
        assert_eq!(
            results,
            [
                ("Direct", Ok(())),
                ("Shared", Err(SkipReason::Abstract("Shared".into()))),
                ("Indirect", Ok(())),
            ]
        );
    }

    #[test]
    fn rejects_non_public_and_unrelated_types() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena)
            .add_source(
                "Test0.cs",
                r#"
                using Modgen.Runtime;
                internal class Hidden : ModuleBase { }
                class Implicit : ModuleBase { }
                public class Plain { }
                public class Other : Plain, IDisposable { }
                "#,
            )
            .add_reference(runtime::reference(&arena))
            .build();

        let results = validate_all(&compilation, &ModuleGeneratorOptions::default());
        let missing = |name: &str| SkipReason::MissingBase {
            name: name.into(),
            base_type: "ModuleBase".into(),
        };
        assert_eq!(
            results,
            [
                ("Hidden", Err(SkipReason::NotPublic("Hidden".into()))),
                ("Implicit", Err(SkipReason::NotPublic("Implicit".into()))),
                ("Plain", Err(missing("Plain"))),
                ("Other", Err(missing("Other"))),
            ]
        );
    }

    #[test]
    fn unresolved_base_matches_by_simple_name() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena)
            .add_source("Test0.cs", "public class M : Somewhere.ModuleBase { }")
            .build();

        let simple = validate_all(&compilation, &ModuleGeneratorOptions::default());
        assert_eq!(simple, [("M", Ok(()))]);

        let options = ModuleGeneratorOptions::default()
            .with_base_type("Modgen.Runtime.ModuleBase")
            .with_base_type_match(TypeMatch::Qualified);
        let qualified = validate_all(&compilation, &options);
        assert!(matches!(qualified[0].1, Err(SkipReason::MissingBase { .. })));
    }

    #[test]
    fn qualified_match_uses_resolved_names() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena)
            .add_source(
                "Test0.cs",
                r#"
                namespace Fake { public abstract class ModuleBase { } }
                namespace Demo
                {
                    public class Real : Modgen.Runtime.ModuleBase { }
                    public class Impostor : Fake.ModuleBase { }
                }
                "#,
            )
            .add_reference(runtime::reference(&arena))
            .build();

        let options = ModuleGeneratorOptions::default()
            .with_base_type("Modgen.Runtime.ModuleBase")
            .with_base_type_match(TypeMatch::Qualified);
        let results = validate_all(&compilation, &options);
        assert_eq!(results[1], ("Real", Ok(())));
        assert!(matches!(results[2].1, Err(SkipReason::MissingBase { .. })));

        // By simple name both match.
        let results = validate_all(&compilation, &ModuleGeneratorOptions::default());
        assert_eq!(results[1].1, Ok(()));
        assert_eq!(results[2].1, Ok(()));
    }

    #[test]
    fn base_cycles_end_the_walk() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena)
            .add_source("Test0.cs", "public class A : B { }\npublic class B : A { }\n")
            .build();

        let results = validate_all(&compilation, &ModuleGeneratorOptions::default());
        assert!(results.iter().all(|(_, result)| matches!(result, Err(SkipReason::MissingBase { .. }))));
    }

    #[test]
    fn duplicate_declarations_are_not_declared() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena)
            .add_source("Test0.cs", "public class M : ModuleBase { }\npublic class M : ModuleBase { }\n")
            .build();

        let results = validate_all(&compilation, &ModuleGeneratorOptions::default());
        assert_eq!(results[0].1, Ok(()));
        assert_eq!(results[1].1, Err(SkipReason::NotDeclared("M".into())));
        assert_eq!(SkipReason::NotDeclared("M".into()).diagnostic_id(), "MG0005");
    }

    #[test]
    fn module_namespace() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena)
            .add_source("Test0.cs", "namespace Demo.Commands;\npublic class M : ModuleBase { }\n")
            .build();
        let decl = compilation.syntax_trees()[0].type_declarations().next().unwrap();
        let module = validate_candidate(&compilation, decl, &ModuleGeneratorOptions::default()).unwrap();
        assert_eq!(module.namespace(), "Demo.Commands");
        assert_eq!(module.symbol.name, "M");
    }

    #[test]
    fn skip_diagnostics_are_info() {
        let reason = SkipReason::NoCommands {
            name: "M".into(),
            marker: "Command".into(),
        };
        let diagnostic = reason.to_diagnostic(None);
        assert_eq!(diagnostic.id, "MG0004");
        assert_eq!(diagnostic.message, "module 'M' has no methods marked with [Command]");
        assert!(!diagnostic.is_at_least(modgen_core::DiagnosticSeverity::Warning));
    }
}
