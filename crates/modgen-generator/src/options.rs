//! Generator options.
//!
//! Options are set in code with the `with_*` builders and can be overridden
//! per compilation through [`AnalyzerConfigOptions`]:
//!
//! | key                         | values               |
//! |-----------------------------|----------------------|
//! | `modgen.base_type`          | type name            |
//! | `modgen.base_type_match`    | `simple`, `qualified`|
//! | `modgen.marker`             | attribute name       |
//! | `modgen.candidates`         | `all`, `last`        |
//! | `modgen.wrap_in_namespace`  | `true`, `false`      |
//! | `modgen.report_skipped`     | `true`, `false`      |

use std::fmt;
use std::str::FromStr;

use modgen_compiler::AnalyzerConfigOptions;
use thiserror::Error;
use tracing::warn;

pub const BASE_TYPE_KEY: &str = "modgen.base_type";
pub const BASE_TYPE_MATCH_KEY: &str = "modgen.base_type_match";
pub const MARKER_KEY: &str = "modgen.marker";
pub const CANDIDATES_KEY: &str = "modgen.candidates";
pub const WRAP_IN_NAMESPACE_KEY: &str = "modgen.wrap_in_namespace";
pub const REPORT_SKIPPED_KEY: &str = "modgen.report_skipped";

/// An option value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found '{found}'")]
pub struct InvalidOptionValue {
    pub expected: &'static str,
    pub found: String,
}

impl InvalidOptionValue {
    fn new(expected: &'static str, found: &str) -> Self {
        Self {
            expected,
            found: found.to_string(),
        }
    }
}

/// How base types are compared with the configured base type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeMatch {
    /// Compare simple names. Unresolved bases still match by the name
    /// they were written with.
    #[default]
    Simple,
    /// Compare fully qualified names of resolved bases.
    Qualified,
}

impl FromStr for TypeMatch {
    type Err = InvalidOptionValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("simple") {
            Ok(TypeMatch::Simple)
        } else if s.eq_ignore_ascii_case("qualified") {
            Ok(TypeMatch::Qualified)
        } else {
            Err(InvalidOptionValue::new("'simple' or 'qualified'", s))
        }
    }
}

impl fmt::Display for TypeMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeMatch::Simple => f.write_str("simple"),
            TypeMatch::Qualified => f.write_str("qualified"),
        }
    }
}

/// Which scanned classes are considered in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidatePolicy {
    /// Every class, in scan order.
    #[default]
    All,
    /// Only the last class scanned.
    LastScanned,
}

impl FromStr for CandidatePolicy {
    type Err = InvalidOptionValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(CandidatePolicy::All)
        } else if s.eq_ignore_ascii_case("last") {
            Ok(CandidatePolicy::LastScanned)
        } else {
            Err(InvalidOptionValue::new("'all' or 'last'", s))
        }
    }
}

impl fmt::Display for CandidatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidatePolicy::All => f.write_str("all"),
            CandidatePolicy::LastScanned => f.write_str("last"),
        }
    }
}

/// Options for [`ModuleGenerator`](crate::ModuleGenerator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGeneratorOptions {
    /// Name of the base class modules derive from.
    pub base_type: String,
    pub base_type_match: TypeMatch,
    /// Name of the attribute marking command methods, as written.
    pub marker: String,
    pub candidates: CandidatePolicy,
    /// Signature of the overridden hook, without modifiers.
    pub hook_signature: String,
    /// Element type of the returned array.
    pub collection_type: String,
    pub builder_type: String,
    /// Appended to the type identifier to form the hint name.
    pub file_suffix: String,
    pub indent: String,
    /// Emit the fragment inside the namespace of the module.
    pub wrap_in_namespace: bool,
    /// Report an `Info` diagnostic for every skipped candidate.
    pub report_skipped: bool,
}

impl Default for ModuleGeneratorOptions {
    fn default() -> Self {
        Self {
            base_type: "ModuleBase".to_string(),
            base_type_match: TypeMatch::Simple,
            marker: "Command".to_string(),
            candidates: CandidatePolicy::All,
            hook_signature: "IEnumerable<CommandInfo> AutoRegister()".to_string(),
            collection_type: "CommandInfo".to_string(),
            builder_type: "CommandInfoBuilder".to_string(),
            file_suffix: ".Generated".to_string(),
            indent: "    ".to_string(),
            wrap_in_namespace: false,
            report_skipped: false,
        }
    }
}

impl ModuleGeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default options overridden by `config`.
    pub fn from_config(config: &AnalyzerConfigOptions) -> Self {
        Self::default().with_config(config)
    }

    /// Override these options with the values set in `config`.
    ///
    /// Invalid values are logged and leave the option unchanged.
    pub fn with_config(mut self, config: &AnalyzerConfigOptions) -> Self {
        if let Some(value) = non_empty(config, BASE_TYPE_KEY) {
            self.base_type = value.to_string();
        }
        if let Some(value) = parsed(config, BASE_TYPE_MATCH_KEY) {
            self.base_type_match = value;
        }
        if let Some(value) = non_empty(config, MARKER_KEY) {
            self.marker = value.to_string();
        }
        if let Some(value) = parsed(config, CANDIDATES_KEY) {
            self.candidates = value;
        }
        if let Some(value) = parsed::<bool>(config, WRAP_IN_NAMESPACE_KEY) {
            self.wrap_in_namespace = value;
        }
        if let Some(value) = parsed::<bool>(config, REPORT_SKIPPED_KEY) {
            self.report_skipped = value;
        }
        self
    }

    pub fn with_base_type(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = base_type.into();
        self
    }

    pub fn with_base_type_match(mut self, base_type_match: TypeMatch) -> Self {
        self.base_type_match = base_type_match;
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn with_candidates(mut self, candidates: CandidatePolicy) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn with_hook_signature(mut self, hook_signature: impl Into<String>) -> Self {
        self.hook_signature = hook_signature.into();
        self
    }

    pub fn with_collection_type(mut self, collection_type: impl Into<String>) -> Self {
        self.collection_type = collection_type.into();
        self
    }

    pub fn with_builder_type(mut self, builder_type: impl Into<String>) -> Self {
        self.builder_type = builder_type.into();
        self
    }

    pub fn with_file_suffix(mut self, file_suffix: impl Into<String>) -> Self {
        self.file_suffix = file_suffix.into();
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_wrap_in_namespace(mut self, wrap_in_namespace: bool) -> Self {
        self.wrap_in_namespace = wrap_in_namespace;
        self
    }

    pub fn with_report_skipped(mut self, report_skipped: bool) -> Self {
        self.report_skipped = report_skipped;
        self
    }
}

fn non_empty<'a>(config: &'a AnalyzerConfigOptions, key: &str) -> Option<&'a str> {
    let value = config.get(key)?;
    if value.is_empty() {
        warn!(key, "ignoring empty option value");
        return None;
    }
    Some(value)
}

fn parsed<T>(config: &AnalyzerConfigOptions, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = config.get(key)?;
    let value = value.to_ascii_lowercase();
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(error) => {
            warn!(key, %error, "ignoring invalid option value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_runtime() {
        let options = ModuleGeneratorOptions::default();
        assert_eq!(options.base_type, "ModuleBase");
        assert_eq!(options.marker, "Command");
        assert_eq!(options.candidates, CandidatePolicy::All);
        assert_eq!(options.base_type_match, TypeMatch::Simple);
        assert_eq!(options.indent, "    ");
        assert!(!options.wrap_in_namespace);
        assert!(!options.report_skipped);
    }

    #[test]
    fn config_overrides_explicit_options() {
        let config = AnalyzerConfigOptions::from_pairs([
            (BASE_TYPE_KEY, "Demo.Runtime.ModuleBase"),
            (BASE_TYPE_MATCH_KEY, "Qualified"),
            (MARKER_KEY, " Verb "),
            (CANDIDATES_KEY, "last"),
            (WRAP_IN_NAMESPACE_KEY, "TRUE"),
        ]);
        let options = ModuleGeneratorOptions::new()
            .with_marker("Command")
            .with_report_skipped(true)
            .with_config(&config);

        assert_eq!(options.base_type, "Demo.Runtime.ModuleBase");
        assert_eq!(options.base_type_match, TypeMatch::Qualified);
        assert_eq!(options.marker, "Verb");
        assert_eq!(options.candidates, CandidatePolicy::LastScanned);
        assert!(options.wrap_in_namespace);
        // Not in the config, so the explicit value stays.
        assert!(options.report_skipped);
    }

    #[test]
    fn invalid_config_values_are_ignored() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let config = AnalyzerConfigOptions::from_pairs([
            (BASE_TYPE_KEY, "  "),
            (BASE_TYPE_MATCH_KEY, "fuzzy"),
            (CANDIDATES_KEY, "first"),
            (REPORT_SKIPPED_KEY, "yes"),
        ]);
        let options = ModuleGeneratorOptions::from_config(&config);
        assert_eq!(options, ModuleGeneratorOptions::default());
    }

    #[test]
    fn parse_errors_name_the_expected_values() {
        let error = "fuzzy".parse::<TypeMatch>().unwrap_err();
        assert_eq!(error.to_string(), "expected 'simple' or 'qualified', found 'fuzzy'");
        assert_eq!("LAST".parse::<CandidatePolicy>(), Ok(CandidatePolicy::LastScanned));
        assert_eq!(CandidatePolicy::LastScanned.to_string(), "last");
    }
}
