//! Source generator contract.
//!
//! A generator is driven in two phases per pass:
//!
//! 1. Every node of every source tree is shown to a fresh [`SyntaxReceiver`]
//!    created for the pass, in document order.
//! 2. [`SourceGenerator::execute`] receives the compilation and the receiver
//!    by value, and adds sources to the [`GeneratorExecutionContext`].
//!
//! Receivers only live for one pass, so candidates never leak between
//! compilations.

use modgen_core::{Diagnostic, GeneratorError, SourceText};
use modgen_parser::SyntaxNode;

use crate::Compilation;
use crate::options::AnalyzerConfigOptions;

/// Collects nodes of interest while the driver walks the syntax trees.
pub trait SyntaxReceiver<'ast> {
    /// Called once per node, parents before children.
    fn on_visit_syntax_node(&mut self, node: SyntaxNode<'ast>);
}

/// A generator that adds sources to a compilation.
pub trait SourceGenerator {
    /// The receiver this generator collects candidates with.
    type Receiver<'ast>: SyntaxReceiver<'ast>;

    /// Called once, before the first pass.
    fn initialize(&self, context: &mut GeneratorInitializationContext);

    /// A fresh receiver for one pass.
    fn create_syntax_receiver<'ast>(&self) -> Self::Receiver<'ast>;

    /// Produce sources from what the receiver collected.
    fn execute<'ast>(
        &self,
        context: &mut GeneratorExecutionContext<'_, 'ast>,
        receiver: Self::Receiver<'ast>,
    );
}

/// A source added by a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    /// Unique name within the generator, always ending in `.cs`.
    pub hint_name: String,
    pub source_text: SourceText,
}

/// Sources added by one generator, with hint names checked.
#[derive(Debug, Clone, Default)]
pub(crate) struct SourceSet {
    sources: Vec<GeneratedSource>,
}

impl SourceSet {
    fn add(&mut self, hint_name: &str, source_text: SourceText) -> Result<(), GeneratorError> {
        let hint_name = normalize_hint_name(hint_name)?;
        if self
            .sources
            .iter()
            .any(|source| source.hint_name.eq_ignore_ascii_case(&hint_name))
        {
            return Err(GeneratorError::DuplicateHintName(hint_name));
        }
        self.sources.push(GeneratedSource {
            hint_name,
            source_text,
        });
        Ok(())
    }

    pub(crate) fn as_slice(&self) -> &[GeneratedSource] {
        &self.sources
    }
}

/// Check a hint name and append `.cs` unless it already ends with it.
///
/// Hint names are made of letters, digits, `_`, `.` and `-`.
pub fn normalize_hint_name(hint_name: &str) -> Result<String, GeneratorError> {
    let valid = !hint_name.is_empty()
        && !hint_name.starts_with('.')
        && hint_name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if !valid {
        return Err(GeneratorError::InvalidHintName(hint_name.to_string()));
    }

    let has_extension = hint_name.len() >= 3
        && hint_name
            .get(hint_name.len() - 3..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".cs"));
    if has_extension {
        Ok(hint_name.to_string())
    } else {
        Ok(format!("{hint_name}.cs"))
    }
}

/// Passed to [`SourceGenerator::initialize`].
#[derive(Debug, Clone, Default)]
pub struct GeneratorInitializationContext {
    syntax_notifications: bool,
    post_initialization: SourceSet,
}

impl GeneratorInitializationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the driver to walk the syntax trees into this generator's
    /// receiver. Without this, receivers see no nodes.
    pub fn register_for_syntax_notifications(&mut self) {
        self.syntax_notifications = true;
    }

    pub fn syntax_notifications(&self) -> bool {
        self.syntax_notifications
    }

    /// Add a source that does not depend on the compilation, such as an
    /// attribute definition. It is part of the compilation every pass sees.
    pub fn add_post_initialization_source(
        &mut self,
        hint_name: &str,
        source_text: SourceText,
    ) -> Result<(), GeneratorError> {
        self.post_initialization.add(hint_name, source_text)
    }

    pub fn post_initialization_sources(&self) -> &[GeneratedSource] {
        self.post_initialization.as_slice()
    }

    pub(crate) fn source_set(&self) -> SourceSet {
        self.post_initialization.clone()
    }
}

/// Passed to [`SourceGenerator::execute`].
pub struct GeneratorExecutionContext<'c, 'ast> {
    compilation: &'c Compilation<'ast>,
    sources: SourceSet,
    diagnostics: Vec<Diagnostic>,
}

impl<'c, 'ast> GeneratorExecutionContext<'c, 'ast> {
    /// A context whose hint names must not clash with `sources`.
    pub(crate) fn new(compilation: &'c Compilation<'ast>, sources: SourceSet) -> Self {
        Self {
            compilation,
            sources,
            diagnostics: Vec::new(),
        }
    }

    /// The compilation being generated for.
    pub fn compilation(&self) -> &'c Compilation<'ast> {
        self.compilation
    }

    pub fn analyzer_config_options(&self) -> &'c AnalyzerConfigOptions {
        self.compilation.options()
    }

    /// Add a generated source.
    ///
    /// Fails when the hint name is invalid or was already used by this
    /// generator (compared case-insensitively, after appending `.cs`).
    pub fn add_source(&mut self, hint_name: &str, source_text: SourceText) -> Result<(), GeneratorError> {
        self.sources.add(hint_name, source_text)
    }

    pub fn report_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Sources added so far.
    pub fn sources(&self) -> &[GeneratedSource] {
        self.sources.as_slice()
    }

    pub(crate) fn into_parts(self) -> (Vec<GeneratedSource>, Vec<Diagnostic>) {
        (self.sources.sources, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;

    #[test]
    fn hint_names_get_cs_extension() {
        assert_eq!(normalize_hint_name("Echo.Generated").unwrap(), "Echo.Generated.cs");
        assert_eq!(normalize_hint_name("Echo.Generated.cs").unwrap(), "Echo.Generated.cs");
        assert_eq!(normalize_hint_name("Echo.CS").unwrap(), "Echo.CS");
        assert_eq!(normalize_hint_name("my-file_1").unwrap(), "my-file_1.cs");
    }

    #[test]
    fn invalid_hint_names() {
        for name in ["", "a b", "dir/file", ".hidden", "x*y"] {
            assert_eq!(
                normalize_hint_name(name),
                Err(GeneratorError::InvalidHintName(name.to_string())),
                "{name:?}"
            );
        }
    }

    #[test]
    fn duplicate_hint_names_are_case_insensitive() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena).build();
        let mut context = GeneratorExecutionContext::new(&compilation, SourceSet::default());

        context
            .add_source("Echo.Generated", SourceText::from_utf8("class A { }"))
            .unwrap();
        let error = context
            .add_source("echo.generated.cs", SourceText::from_utf8("class B { }"))
            .unwrap_err();
        assert_eq!(error, GeneratorError::DuplicateHintName("echo.generated.cs".into()));

        let (sources, diagnostics) = context.into_parts();
        assert_eq!(sources.len(), 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn post_initialization_names_are_reserved() {
        let arena = Bump::new();
        let compilation = Compilation::builder(&arena).build();
        let mut init = GeneratorInitializationContext::new();
        init.add_post_initialization_source("Attr", SourceText::from_utf8("class Attr { }"))
            .unwrap();
        assert!(!init.syntax_notifications());

        let mut context = GeneratorExecutionContext::new(&compilation, init.source_set());
        assert!(context.add_source("attr.cs", SourceText::from_utf8("")).is_err());
        assert_eq!(context.sources().len(), 1);
    }
}
