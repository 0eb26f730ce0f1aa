//! GeneratorDriver - runs generators over a compilation.
//!
//! ## Pass
//!
//! ```text
//! initialize (once per generator, cached)
//!     │  post-initialization sources are parsed and added to the compilation
//!     ▼
//! for each generator:
//!     create receiver ─► walk every node of every source tree ─► execute
//!     │
//!     ▼
//! parse generated sources into the arena ─► GeneratorDriverRunResult
//! ```
//!
//! Generators are not isolated from each other's output within a pass: each
//! sees the compilation as it was before the pass. Panics in a generator are
//! not caught.

use std::sync::OnceLock;

use modgen_core::{Diagnostic, Location, SourceText};
use modgen_parser::SyntaxTree;
use tracing::{debug, warn};

use crate::Compilation;
use crate::generator::{
    GeneratedSource, GeneratorExecutionContext, GeneratorInitializationContext, SourceGenerator,
    SyntaxReceiver,
};

/// Object-safe view of a [`SourceGenerator`].
trait ErasedGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    fn initialize(&self, context: &mut GeneratorInitializationContext);

    fn execute_pass<'ast>(
        &self,
        compilation: &Compilation<'ast>,
        init: &GeneratorInitializationContext,
    ) -> (Vec<GeneratedSource>, Vec<Diagnostic>);
}

impl<G: SourceGenerator + Send + Sync> ErasedGenerator for G {
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<G>())
    }

    fn initialize(&self, context: &mut GeneratorInitializationContext) {
        SourceGenerator::initialize(self, context);
    }

    fn execute_pass<'ast>(
        &self,
        compilation: &Compilation<'ast>,
        init: &GeneratorInitializationContext,
    ) -> (Vec<GeneratedSource>, Vec<Diagnostic>) {
        let mut receiver = self.create_syntax_receiver();
        if init.syntax_notifications() {
            for tree in compilation.syntax_trees() {
                for node in tree.descendant_nodes() {
                    receiver.on_visit_syntax_node(node);
                }
            }
        }

        let mut context = GeneratorExecutionContext::new(compilation, init.source_set());
        self.execute(&mut context, receiver);
        context.into_parts()
    }
}

/// `modgen_generator::ModuleGenerator` becomes `ModuleGenerator`.
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

struct GeneratorEntry {
    generator: Box<dyn ErasedGenerator>,
    init: OnceLock<GeneratorInitializationContext>,
}

impl GeneratorEntry {
    fn init(&self) -> &GeneratorInitializationContext {
        self.init.get_or_init(|| {
            let mut context = GeneratorInitializationContext::new();
            self.generator.initialize(&mut context);
            debug!(generator = self.generator.name(), "generator initialized");
            context
        })
    }
}

/// Runs a fixed set of generators.
#[derive(Default)]
pub struct GeneratorDriver {
    generators: Vec<GeneratorEntry>,
}

impl GeneratorDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`add_generator`](Self::add_generator).
    pub fn with_generator<G>(mut self, generator: G) -> Self
    where
        G: SourceGenerator + Send + Sync + 'static,
    {
        self.add_generator(generator);
        self
    }

    pub fn add_generator<G>(&mut self, generator: G)
    where
        G: SourceGenerator + Send + Sync + 'static,
    {
        self.generators.push(GeneratorEntry {
            generator: Box::new(generator),
            init: OnceLock::new(),
        });
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Run every generator once over `compilation`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run<'ast>(&self, compilation: &Compilation<'ast>) -> GeneratorDriverRunResult<'ast> {
        let arena = compilation.arena();

        let post_initialization: Vec<SyntaxTree<'ast>> = self
            .generators
            .iter()
            .flat_map(|entry| {
                let name = entry.generator.name();
                entry
                    .init()
                    .post_initialization_sources()
                    .iter()
                    .map(move |source| generated_tree(arena, name, source))
            })
            .collect();

        let augmented;
        let compilation = if post_initialization.is_empty() {
            compilation
        } else {
            augmented = compilation.add_syntax_trees(post_initialization);
            &augmented
        };

        let results = self
            .generators
            .iter()
            .map(|entry| {
                let name = entry.generator.name();
                let (sources, mut diagnostics) =
                    entry.generator.execute_pass(compilation, entry.init());

                let generated_sources = sources
                    .into_iter()
                    .map(|source| {
                        let syntax_tree = generated_tree(arena, name, &source);
                        if let Some(error) = syntax_tree.errors().iter().next() {
                            warn!(generator = name, hint_name = %source.hint_name, %error, "generated source does not parse");
                            diagnostics.push(Diagnostic::error(
                                "MG0100",
                                format!(
                                    "generator '{name}' produced source '{}' that does not parse: {error}",
                                    source.hint_name
                                ),
                                Some(Location::new(syntax_tree.path(), error.span)),
                            ));
                        }
                        GeneratedSourceResult {
                            hint_name: source.hint_name,
                            source_text: source.source_text,
                            syntax_tree,
                        }
                    })
                    .collect::<Vec<_>>();

                debug!(generator = name, sources = generated_sources.len(), "generator executed");
                GeneratorRunResult {
                    generator: name,
                    generated_sources,
                    diagnostics,
                }
            })
            .collect();

        GeneratorDriverRunResult { results }
    }

    /// Run, then return `compilation` with every generated tree added.
    pub fn run_and_update_compilation<'ast>(
        &self,
        compilation: &Compilation<'ast>,
    ) -> (Compilation<'ast>, GeneratorDriverRunResult<'ast>) {
        let result = self.run(compilation);
        let updated = compilation.add_syntax_trees(result.generated_trees().into_iter().cloned());
        (updated, result)
    }
}

fn generated_tree<'ast>(
    arena: &'ast bumpalo::Bump,
    generator: &str,
    source: &GeneratedSource,
) -> SyntaxTree<'ast> {
    let path = format!("{generator}/{}", source.hint_name);
    SyntaxTree::parse(arena, &path, source.source_text.as_str())
}

/// One source produced by a generator, parsed.
#[derive(Debug, Clone)]
pub struct GeneratedSourceResult<'ast> {
    pub hint_name: String,
    pub source_text: SourceText,
    pub syntax_tree: SyntaxTree<'ast>,
}

/// What one generator produced in a pass.
#[derive(Debug, Clone)]
pub struct GeneratorRunResult<'ast> {
    /// Type name of the generator, without its module path.
    pub generator: &'static str,
    pub generated_sources: Vec<GeneratedSourceResult<'ast>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// What every generator produced in a pass.
#[derive(Debug, Clone)]
pub struct GeneratorDriverRunResult<'ast> {
    pub results: Vec<GeneratorRunResult<'ast>>,
}

impl<'ast> GeneratorDriverRunResult<'ast> {
    /// Generated trees of every generator, in generator order.
    pub fn generated_trees(&self) -> Vec<&SyntaxTree<'ast>> {
        self.results
            .iter()
            .flat_map(|result| result.generated_sources.iter())
            .map(|source| &source.syntax_tree)
            .collect()
    }

    pub fn generated_sources(&self) -> impl Iterator<Item = &GeneratedSourceResult<'ast>> {
        self.results
            .iter()
            .flat_map(|result| result.generated_sources.iter())
    }

    /// Diagnostics of every generator, in generator order.
    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        self.results
            .iter()
            .flat_map(|result| result.diagnostics.iter())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use modgen_core::DiagnosticSeverity;
    use modgen_parser::SyntaxNode;
    use modgen_parser::ast::TypeDecl;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Emits `<Name>Info` for every class it sees.
    #[derive(Default)]
    struct EchoGenerator {
        initialized: Arc<AtomicUsize>,
    }

    #[derive(Default)]
    struct ClassCollector<'ast> {
        classes: Vec<&'ast TypeDecl<'ast>>,
        nodes: usize,
    }

    impl<'ast> SyntaxReceiver<'ast> for ClassCollector<'ast> {
        fn on_visit_syntax_node(&mut self, node: SyntaxNode<'ast>) {
            self.nodes += 1;
            if let Some(decl) = node.as_type_declaration() {
                self.classes.push(decl);
            }
        }
    }

    impl SourceGenerator for EchoGenerator {
        type Receiver<'ast> = ClassCollector<'ast>;

        fn initialize(&self, context: &mut GeneratorInitializationContext) {
            self.initialized.fetch_add(1, Ordering::SeqCst);
            context.register_for_syntax_notifications();
        }

        fn create_syntax_receiver<'ast>(&self) -> Self::Receiver<'ast> {
            ClassCollector::default()
        }

        fn execute<'ast>(
            &self,
            context: &mut GeneratorExecutionContext<'_, 'ast>,
            receiver: Self::Receiver<'ast>,
        ) {
            for class in receiver.classes {
                let name = class.name.name;
                if name.ends_with("Info") {
                    continue;
                }
                let text = format!("public class {name}Info {{ }}");
                if let Err(error) = context.add_source(&format!("{name}Info"), SourceText::from_utf8(text)) {
                    context.report_diagnostic(Diagnostic::warning("TEST01", error.to_string(), None));
                }
            }
        }
    }

    /// Adds an attribute in post-initialization and a broken source per pass.
    struct AttributeGenerator;

    impl SourceGenerator for AttributeGenerator {
        type Receiver<'ast> = ClassCollector<'ast>;

        fn initialize(&self, context: &mut GeneratorInitializationContext) {
            context
                .add_post_initialization_source("MarkerAttribute", SourceText::from_utf8("public class MarkerAttribute { }"))
                .unwrap();
        }

        fn create_syntax_receiver<'ast>(&self) -> Self::Receiver<'ast> {
            ClassCollector::default()
        }

        fn execute<'ast>(
            &self,
            context: &mut GeneratorExecutionContext<'_, 'ast>,
            receiver: Self::Receiver<'ast>,
        ) {
            assert_eq!(receiver.nodes, 0, "no syntax notifications were requested");
            assert!(
                context
                    .compilation()
                    .get_type_by_metadata_name("MarkerAttribute")
                    .is_some()
            );
            context
                .add_source("Broken", SourceText::from_utf8("public class {"))
                .unwrap();
        }
    }

    #[test]
    fn generates_per_class_in_document_order() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena)
            .add_source("Test0.cs", "class A { class B { } }")
            .add_source("Test1.cs", "class C { }")
            .build();
        let driver = GeneratorDriver::new().with_generator(EchoGenerator::default());

        let result = driver.run(&compilation);
        assert!(result.diagnostics().is_empty());
        let hints: Vec<_> = result.generated_sources().map(|s| s.hint_name.as_str()).collect();
        assert_eq!(hints, ["AInfo.cs", "BInfo.cs", "CInfo.cs"]);

        let trees = result.generated_trees();
        assert_eq!(trees[0].path(), "EchoGenerator/AInfo.cs");
        assert!(trees.iter().all(|tree| tree.errors().is_empty()));
        assert_eq!(result.results[0].generator, "EchoGenerator");
    }

    #[test]
    fn initializes_once_across_runs() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena).add_source("Test0.cs", "class A { }").build();
        let generator = EchoGenerator::default();
        let initialized = Arc::clone(&generator.initialized);
        let driver = GeneratorDriver::new().with_generator(generator);

        let first = driver.run(&compilation);
        let second = driver.run(&compilation);
        assert_eq!(initialized.load(Ordering::SeqCst), 1);
        assert_eq!(first.generated_trees().len(), 1);
        assert_eq!(second.generated_trees().len(), 1);
        assert!(first.generated_trees()[0].is_equivalent_to(second.generated_trees()[0]));
    }

    #[test]
    fn updated_compilation_contains_generated_types() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena).add_source("Test0.cs", "class A { }").build();
        let driver = GeneratorDriver::new().with_generator(EchoGenerator::default());

        let (updated, result) = driver.run_and_update_compilation(&compilation);
        assert_eq!(result.generated_trees().len(), 1);
        assert_eq!(updated.syntax_trees().len(), 2);
        assert!(updated.get_type_by_metadata_name("AInfo").is_some());
        assert!(compilation.get_type_by_metadata_name("AInfo").is_none());
    }

    #[test]
    fn post_initialization_and_unparsable_output() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena).add_source("Test0.cs", "class A { }").build();
        let driver = GeneratorDriver::new().with_generator(AttributeGenerator);

        let result = driver.run(&compilation);
        let hints: Vec<_> = result.generated_sources().map(|s| s.hint_name.as_str()).collect();
        assert_eq!(hints, ["MarkerAttribute.cs", "Broken.cs"]);

        let diagnostics = result.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id, "MG0100");
        assert!(diagnostics[0].is_at_least(DiagnosticSeverity::Error));
        assert_eq!(
            diagnostics[0].location.as_ref().map(|l| l.path.as_str()),
            Some("AttributeGenerator/Broken.cs")
        );
    }

    #[test]
    fn driver_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeneratorDriver>();
    }

    #[test]
    fn short_names() {
        assert_eq!(short_type_name("a::b::Gen"), "Gen");
        assert_eq!(short_type_name("a::Gen<b::C>"), "Gen");
        assert_eq!(short_type_name("Gen"), "Gen");
    }
}
