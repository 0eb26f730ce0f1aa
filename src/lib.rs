//! modgen: command registration for module classes.
//!
//! Module classes derive from `ModuleBase` and mark their command methods
//! with `[Command]`. modgen compiles them, and for every module generates a
//! partial fragment that overrides `AutoRegister` with one registration per
//! command.
//!
//! The workspace is split by phase:
//!
//! - [`parser`]: lexer, parser and syntax trees
//! - [`registry`]: type symbols and namespaces
//! - [`compiler`]: compilations and the generator driver
//! - [`generator`]: the module generator and the runtime declarations
//!
//! [`ModuleBuild`] runs all of them over a set of sources.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use modgen::ModuleBuild;
//!
//! let arena = Bump::new();
//! let mut build = ModuleBuild::new(&arena);
//! build
//!     .add_source(
//!         "Ping.cs",
//!         r#"
//!         using Modgen.Runtime;
//!         public partial class Ping : ModuleBase
//!         {
//!             [Command("ping")]
//!             public void Run() { }
//!         }
//!         "#,
//!     )
//!     .unwrap();
//!
//! let output = build.build();
//! let names: Vec<&str> = output.generated_sources().map(|s| s.hint_name.as_str()).collect();
//! assert_eq!(names, ["Ping.Generated.cs"]);
//! ```

use bumpalo::Bump;
use modgen_compiler::{
    AnalyzerConfigOptions, Compilation, GeneratedSourceResult, GeneratorDriver, GeneratorDriverRunResult,
};
use modgen_core::{Diagnostic, ModgenError};
use modgen_generator::{ModuleGenerator, ModuleGeneratorOptions, runtime};
use modgen_parser::SyntaxTree;
use tracing::debug;

pub use modgen_compiler as compiler;
pub use modgen_core as core;
pub use modgen_generator as generator;
pub use modgen_parser as parser;
pub use modgen_registry as registry;

pub mod prelude {
    pub use crate::{BuildOutput, ModuleBuild};
    pub use modgen_compiler::{
        AnalyzerConfigOptions, Compilation, GeneratorDriver, GeneratorDriverRunResult, MetadataReference,
        SourceGenerator, SyntaxReceiver,
    };
    pub use modgen_core::{Diagnostic, DiagnosticSeverity, ModgenError, SourceText};
    pub use modgen_generator::{CandidatePolicy, ModuleGenerator, ModuleGeneratorOptions, TypeMatch};
    pub use modgen_parser::SyntaxTree;
}

/// Sources compiled against the runtime and run through [`ModuleGenerator`].
pub struct ModuleBuild<'ast> {
    arena: &'ast Bump,
    sources: Vec<SyntaxTree<'ast>>,
    options: ModuleGeneratorOptions,
    config: AnalyzerConfigOptions,
}

impl<'ast> ModuleBuild<'ast> {
    pub fn new(arena: &'ast Bump) -> Self {
        Self {
            arena,
            sources: Vec::new(),
            options: ModuleGeneratorOptions::default(),
            config: AnalyzerConfigOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ModuleGeneratorOptions) -> Self {
        self.options = options;
        self
    }

    /// Options visible to generators through the compilation.
    pub fn with_config(mut self, config: AnalyzerConfigOptions) -> Self {
        self.config = config;
        self
    }

    /// Parse and add a source. Fails when the source does not parse.
    pub fn add_source(&mut self, path: &str, text: &str) -> Result<(), ModgenError> {
        let tree = SyntaxTree::parse(self.arena, path, text);
        if !tree.errors().is_empty() {
            return Err(tree.errors().clone().into());
        }
        self.sources.push(tree);
        Ok(())
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Compile the sources and run the generator.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(self) -> BuildOutput<'ast> {
        let input = Compilation::builder(self.arena)
            .add_syntax_trees(self.sources)
            .add_reference(runtime::reference(self.arena))
            .with_options(self.config)
            .build();

        let driver = GeneratorDriver::new().with_generator(ModuleGenerator::with_options(self.options));
        let (compilation, result) = driver.run_and_update_compilation(&input);
        debug!(
            sources = input.syntax_trees().len(),
            generated = result.generated_trees().len(),
            "module build finished"
        );

        BuildOutput {
            input,
            compilation,
            result,
        }
    }
}

/// What [`ModuleBuild::build`] produced.
pub struct BuildOutput<'ast> {
    input: Compilation<'ast>,
    compilation: Compilation<'ast>,
    result: GeneratorDriverRunResult<'ast>,
}

impl<'ast> BuildOutput<'ast> {
    /// The compilation of the added sources alone.
    pub fn input(&self) -> &Compilation<'ast> {
        &self.input
    }

    /// The compilation with the generated sources added.
    pub fn compilation(&self) -> &Compilation<'ast> {
        &self.compilation
    }

    pub fn run_result(&self) -> &GeneratorDriverRunResult<'ast> {
        &self.result
    }

    pub fn generated_sources(&self) -> impl Iterator<Item = &GeneratedSourceResult<'ast>> {
        self.result.generated_sources()
    }

    /// Diagnostics of the final compilation followed by generator
    /// diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self.compilation.diagnostics();
        diagnostics.extend(self.result.diagnostics().into_iter().cloned());
        diagnostics
    }
}
