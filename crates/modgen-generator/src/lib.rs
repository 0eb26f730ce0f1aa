//! modgen generator crate.
//!
//! [`ModuleGenerator`] finds module classes (public, concrete classes
//! deriving from `ModuleBase`) and generates, for each, a partial fragment
//! overriding `AutoRegister` with one registration per method marked
//! `[Command]`.
//!
//! ## Pipeline
//!
//! 1. [`ModuleSyntaxReceiver`] collects class declarations during the walk
//! 2. [`validate_candidate`] checks each against the compilation
//! 3. [`extract_commands`] reads the marked methods
//! 4. [`render_module`] writes the fragment
//! 5. the fragment is added as `<Identifier>.Generated.cs`
//!
//! Candidates that fail a step are skipped; with `report_skipped` the reason
//! is reported as an `Info` diagnostic.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use modgen_compiler::{Compilation, GeneratorDriver};
//! use modgen_generator::{ModuleGenerator, runtime};
//!
//! let arena = Bump::new();
//! let compilation = Compilation::builder(&arena)
//!     .add_source(
//!         "Echo.cs",
//!         r#"
//!         using Modgen.Runtime;
//!         public partial class Echo : ModuleBase
//!         {
//!             [Command("echo")]
//!             public void Run(string text) { }
//!         }
//!         "#,
//!     )
//!     .add_reference(runtime::reference(&arena))
//!     .build();
//!
//! let driver = GeneratorDriver::new().with_generator(ModuleGenerator::new());
//! let result = driver.run(&compilation);
//! let source = result.generated_sources().next().unwrap();
//! assert_eq!(source.hint_name, "Echo.Generated.cs");
//! assert!(source.source_text.as_str().contains("typeof(string),"));
//! ```

mod emit;
mod extract;
mod generator;
mod options;
mod receiver;
mod render;
pub mod runtime;
mod validate;
mod writer;

pub use emit::hint_name;
pub use extract::{CommandMethodDescriptor, extract_commands};
pub use generator::ModuleGenerator;
pub use options::{
    BASE_TYPE_KEY, BASE_TYPE_MATCH_KEY, CANDIDATES_KEY, CandidatePolicy, InvalidOptionValue, MARKER_KEY,
    ModuleGeneratorOptions, REPORT_SKIPPED_KEY, TypeMatch, WRAP_IN_NAMESPACE_KEY,
};
pub use receiver::ModuleSyntaxReceiver;
pub use render::{render_module, type_header};
pub use validate::{ModuleType, SkipReason, validate_candidate};
pub use writer::IndentedWriter;
