//! modgen compiler crate.
//!
//! The host side of source generation: it binds syntax trees into a
//! [`Compilation`] and drives [`SourceGenerator`]s over it.
//!
//! ## Architecture
//!
//! - **Pass 1 (Declaration)**: declare the types of every tree, merging partial declarations
//! - **Pass 2 (Inheritance)**: bind base lists once every type is known
//! - **Generation**: walk every node into each generator's receiver, then execute it
//!
//! ## Modules
//!
//! - [`compilation`]: trees, references, options and the symbol table they produce
//! - [`semantic`]: declaration nodes mapped back to their symbols
//! - [`generator`]: the generator contract and the contexts passed to it
//! - [`driver`]: runs generators and parses what they produce
//! - [`passes`]: the two symbol passes
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use modgen_compiler::{Compilation, MetadataReference};
//!
//! let arena = Bump::new();
//! let runtime = MetadataReference::from_sources(
//!     &arena,
//!     "Runtime",
//!     [("ModuleBase.cs", "namespace Demo { public abstract class ModuleBase { } }")],
//! );
//! let compilation = Compilation::builder(&arena)
//!     .add_source("Test0.cs", "namespace Demo { public class Echo : ModuleBase { } }")
//!     .add_reference(runtime)
//!     .build();
//!
//! let tree = &compilation.syntax_trees()[0];
//! let model = compilation.semantic_model(tree);
//! let decl = tree.type_declarations().next().unwrap();
//! let symbol = model.declared_symbol(decl).unwrap();
//! let base = symbol.base_type.as_ref().unwrap();
//! assert_eq!(compilation.symbols().simple_name(base), "ModuleBase");
//! ```

pub mod compilation;
pub mod driver;
pub mod generator;
mod metadata;
mod options;
pub mod passes;
pub mod semantic;

pub use compilation::{Compilation, CompilationBuilder};
pub use driver::{
    GeneratedSourceResult, GeneratorDriver, GeneratorDriverRunResult, GeneratorRunResult,
};
pub use generator::{
    GeneratedSource, GeneratorExecutionContext, GeneratorInitializationContext, SourceGenerator,
    SyntaxReceiver, normalize_hint_name,
};
pub use metadata::MetadataReference;
pub use options::AnalyzerConfigOptions;
pub use semantic::SemanticModel;
