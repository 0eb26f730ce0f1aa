//! The module registration generator.

use modgen_compiler::{GeneratorExecutionContext, GeneratorInitializationContext, SourceGenerator};
use modgen_core::Location;
use modgen_parser::ast::TypeDecl;
use tracing::debug;

use crate::emit::{emit_source, hint_name};
use crate::extract::extract_commands;
use crate::options::ModuleGeneratorOptions;
use crate::receiver::ModuleSyntaxReceiver;
use crate::render::render_module;
use crate::validate::{SkipReason, validate_candidate};

/// Generates the `AutoRegister` override of every module class.
///
/// A module class is a public, non-abstract class deriving from the base
/// type. Each of its methods carrying the marker attribute becomes one
/// registration, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ModuleGenerator {
    options: ModuleGeneratorOptions,
}

impl ModuleGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ModuleGeneratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ModuleGeneratorOptions {
        &self.options
    }

    fn generate<'ast>(
        &self,
        context: &mut GeneratorExecutionContext<'_, 'ast>,
        candidate: &'ast TypeDecl<'ast>,
        options: &ModuleGeneratorOptions,
    ) -> Result<(), SkipReason> {
        let module = validate_candidate(context.compilation(), candidate, options)?;

        let commands = extract_commands(module.decl, &options.marker);
        if commands.is_empty() {
            return Err(SkipReason::NoCommands {
                name: module.symbol.name.clone(),
                marker: options.marker.clone(),
            });
        }

        let namespace = if options.wrap_in_namespace {
            Some(module.namespace()).filter(|namespace| !namespace.is_empty())
        } else {
            None
        };
        let text = render_module(module.decl, &commands, options, namespace.as_deref());
        let hint_name = hint_name(candidate.name.value_text(), &options.file_suffix);
        emit_source(context, &hint_name, text);
        Ok(())
    }

    fn skip(
        context: &mut GeneratorExecutionContext<'_, '_>,
        candidate: &TypeDecl<'_>,
        reason: SkipReason,
        options: &ModuleGeneratorOptions,
    ) {
        debug!(name = candidate.name.name, %reason, "candidate skipped");
        if options.report_skipped {
            let location = context
                .compilation()
                .syntax_tree_of(candidate)
                .map(|tree| Location::new(tree.path(), candidate.name.span));
            context.report_diagnostic(reason.to_diagnostic(location));
        }
    }
}

impl SourceGenerator for ModuleGenerator {
    type Receiver<'ast> = ModuleSyntaxReceiver<'ast>;

    fn initialize(&self, context: &mut GeneratorInitializationContext) {
        context.register_for_syntax_notifications();
    }

    fn create_syntax_receiver<'ast>(&self) -> Self::Receiver<'ast> {
        ModuleSyntaxReceiver::new(self.options.candidates)
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn execute<'ast>(&self, context: &mut GeneratorExecutionContext<'_, 'ast>, receiver: Self::Receiver<'ast>) {
        let options = self
            .options
            .clone()
            .with_config(context.analyzer_config_options());

        for candidate in receiver.into_candidates(options.candidates) {
            if let Err(reason) = self.generate(context, candidate, &options) {
                Self::skip(context, candidate, reason, &options);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use modgen_compiler::{AnalyzerConfigOptions, Compilation, GeneratorDriver};
    use modgen_core::DiagnosticSeverity;
    use pretty_assertions::assert_eq;

    use crate::options::CandidatePolicy;
    use crate::runtime;

    const MODULES: &str = r#"
        using System.Threading.Tasks;
        using Modgen.Runtime;

        namespace Demo
        {
            public partial class First : ModuleBase
            {
                [Command("one")]
                public Task One() => Task.CompletedTask;
            }

            public abstract class Shared : ModuleBase
            {
                [Command("shared")]
                public Task Ignored() => Task.CompletedTask;
            }

            public partial class Second : ModuleBase
            {
                [Command("two")]
                public Task Two(int count) => Task.CompletedTask;
            }

            public partial class Empty : ModuleBase
            {
                public Task NotACommand() => Task.CompletedTask;
            }
        }
    "#;

    fn compile<'ast>(arena: &'ast Bump, options: AnalyzerConfigOptions) -> Compilation<'ast> {
        Compilation::builder(arena)
            .add_source("Test0.cs", MODULES)
            .add_reference(runtime::reference(arena))
            .with_options(options)
            .build()
    }

    fn hint_names(driver: &GeneratorDriver, compilation: &Compilation<'_>) -> Vec<String> {
        driver
            .run(compilation)
            .generated_sources()
            .map(|source| source.hint_name.clone())
            .collect()
    }

    #[test]
    fn one_source_per_module() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let arena = Bump::new();
        let compilation = compile(&arena, AnalyzerConfigOptions::new());
        let driver = GeneratorDriver::new().with_generator(ModuleGenerator::new());

        let result = driver.run(&compilation);
        let names: Vec<&str> = result
            .generated_sources()
            .map(|source| source.hint_name.as_str())
            .collect();
        assert_eq!(names, ["First.Generated.cs", "Second.Generated.cs"]);
        assert!(result.diagnostics().is_empty());
        assert_eq!(result.results[0].generator, "ModuleGenerator");
    }

    #[test]
    fn last_scanned_policy_from_options_and_config() {
        let arena = Bump::new();
        let compilation = compile(&arena, AnalyzerConfigOptions::new());
        let last = ModuleGenerator::with_options(
            ModuleGeneratorOptions::default().with_candidates(CandidatePolicy::LastScanned),
        );
        // The last class scanned has no commands.
        assert!(hint_names(&GeneratorDriver::new().with_generator(last), &compilation).is_empty());

        let driver = GeneratorDriver::new().with_generator(ModuleGenerator::new());
        assert_eq!(hint_names(&driver, &compilation).len(), 2);
        let configured = compile(&arena, AnalyzerConfigOptions::from_pairs([("modgen.candidates", "last")]));
        assert!(hint_names(&driver, &configured).is_empty());
    }

    #[test]
    fn skipped_candidates_reported_when_enabled() {
        let arena = Bump::new();
        let compilation = compile(
            &arena,
            AnalyzerConfigOptions::from_pairs([("modgen.report_skipped", "true")]),
        );
        let driver = GeneratorDriver::new().with_generator(ModuleGenerator::new());

        let result = driver.run(&compilation);
        let ids: Vec<&str> = result.diagnostics().iter().map(|diagnostic| diagnostic.id).collect();
        assert_eq!(ids, ["MG0001", "MG0004"]);
        assert!(
            result
                .diagnostics()
                .iter()
                .all(|diagnostic| diagnostic.severity == DiagnosticSeverity::Info)
        );

        let location = result.diagnostics()[1].location.clone().unwrap();
        assert_eq!(location.path, "Test0.cs");
        assert_eq!(result.generated_sources().count(), 2);
    }

    #[test]
    fn wrap_in_namespace_emits_namespace_block() {
        let arena = Bump::new();
        let compilation = compile(&arena, AnalyzerConfigOptions::new());
        let generator =
            ModuleGenerator::with_options(ModuleGeneratorOptions::default().with_wrap_in_namespace(true));
        let driver = GeneratorDriver::new().with_generator(generator);

        let (updated, result) = driver.run_and_update_compilation(&compilation);
        let first = result.generated_sources().next().unwrap();
        assert!(first.source_text.as_str().starts_with("namespace Demo\n{\n    public partial class First\n"));
        assert!(first.syntax_tree.errors().is_empty());
        assert_eq!(first.syntax_tree.path(), "ModuleGenerator/First.Generated.cs");

        // The generated part merges with the declared one.
        assert!(updated.diagnostics().is_empty(), "{:?}", updated.diagnostics());
        let symbol = updated.get_type_by_metadata_name("Demo.First").unwrap();
        assert_eq!(symbol.declarations.len(), 2);
    }

    #[test]
    fn same_identifier_in_two_namespaces_keeps_the_first() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena)
            .add_source(
                "Test0.cs",
                r#"
                using Modgen.Runtime;
                namespace A { public partial class M : ModuleBase { [Command("x")] void X() { } } }
                namespace B { public partial class M : ModuleBase { [Command("y")] void Y() { } } }
                "#,
            )
            .add_reference(runtime::reference(&arena))
            .build();
        let driver = GeneratorDriver::new().with_generator(ModuleGenerator::new());

        let result = driver.run(&compilation);
        let sources: Vec<_> = result.generated_sources().collect();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].hint_name, "M.Generated.cs");
        let text = sources[0].source_text.as_str();
        assert!(text.contains("Name = \"x\","));
        assert!(!text.contains("\"y\""));
        assert!(result.diagnostics().is_empty());
    }

    #[test]
    fn generator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ModuleGenerator>();
    }
}
