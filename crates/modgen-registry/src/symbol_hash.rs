//! Deterministic identity for type symbols.
//!
//! A [`SymbolHash`] is computed from a type's qualified metadata name, so the
//! same declaration gets the same identity in every compilation and a base
//! type can be referred to before it is declared.

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain marker for type hashes.
const TYPE_DOMAIN: u64 = 0x2fac10b63a6cc57c;

/// Separator mixed in between a containing type and a nested name.
const NESTED_SEP: u64 = 0x4bc94d6bd06053ad;

/// A 64-bit identity for a type symbol.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SymbolHash(pub u64);

impl SymbolHash {
    /// Hash of a top-level type from its qualified metadata name.
    ///
    /// ```
    /// use modgen_registry::SymbolHash;
    ///
    /// let a = SymbolHash::from_name("Demo.Commands.TestModule");
    /// assert_eq!(a, SymbolHash::from_name("Demo.Commands.TestModule"));
    /// assert_ne!(a, SymbolHash::from_name("Demo.Commands.TestModule`1"));
    /// ```
    #[inline]
    pub fn from_name(qualified_metadata_name: &str) -> Self {
        SymbolHash(TYPE_DOMAIN ^ xxh64(qualified_metadata_name.as_bytes(), 0))
    }

    /// Hash of a type nested in `containing`.
    #[inline]
    pub fn nested(containing: SymbolHash, metadata_name: &str) -> Self {
        let hash = containing
            .0
            .wrapping_mul(NESTED_SEP)
            .wrapping_add(xxh64(metadata_name.as_bytes(), 0));
        SymbolHash(hash)
    }
}

impl fmt::Debug for SymbolHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolHash({:#018x})", self.0)
    }
}

impl fmt::Display for SymbolHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_differs_from_top_level() {
        let outer = SymbolHash::from_name("Demo.Outer");
        let nested = SymbolHash::nested(outer, "Inner");
        assert_ne!(nested, SymbolHash::from_name("Demo.Outer.Inner"));
        assert_ne!(nested, SymbolHash::from_name("Inner"));
        assert_eq!(nested, SymbolHash::nested(outer, "Inner"));
    }

    #[test]
    fn debug_is_hex() {
        let hash = SymbolHash(0xff);
        assert_eq!(format!("{hash:?}"), "SymbolHash(0x00000000000000ff)");
    }
}
