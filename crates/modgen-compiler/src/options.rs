//! Analyzer configuration options.
//!
//! A flat string key/value map attached to a compilation, the way build
//! properties reach generators. Keys are compared case-insensitively;
//! interpretation of values is left to the reader.

use rustc_hash::FxHashMap;

/// Key/value options visible to generators through the compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzerConfigOptions {
    values: FxHashMap<String, String>,
}

impl AnalyzerConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs. Later pairs win.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut options = Self::new();
        for (key, value) in pairs {
            options.insert(key, value);
        }
        options
    }

    /// Set a value, returning the previous one.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.values
            .insert(key.as_ref().to_ascii_lowercase(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// The value for `key`, trimmed.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_ascii_lowercase())
            .map(|value| value.trim())
    }

    /// `true`/`false` in any case. `None` when the key is missing or the
    /// value is neither.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        let value = self.get(key)?;
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys in sorted order, for stable output.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_case_insensitive() {
        let options = AnalyzerConfigOptions::new().with("ModGen.Marker", "Verb");
        assert_eq!(options.get("modgen.marker"), Some("Verb"));
        assert_eq!(options.get("MODGEN.MARKER"), Some("Verb"));
        assert_eq!(options.get("modgen.base_type"), None);
    }

    #[test]
    fn bool_values() {
        let options = AnalyzerConfigOptions::from_pairs([
            ("a", "TRUE"),
            ("b", " false "),
            ("c", "yes"),
        ]);
        assert_eq!(options.get_bool("a"), Some(true));
        assert_eq!(options.get_bool("b"), Some(false));
        assert_eq!(options.get_bool("c"), None);
        assert_eq!(options.get_bool("d"), None);
    }

    #[test]
    fn later_pairs_win() {
        let options = AnalyzerConfigOptions::from_pairs([("k", "1"), ("K", "2")]);
        assert_eq!(options.len(), 1);
        assert_eq!(options.get("k"), Some("2"));
        assert_eq!(options.keys(), ["k"]);
    }
}
