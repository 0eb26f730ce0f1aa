//! Encoded program-unit text.

use std::fmt;

/// Text encodings a [`SourceText`] can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
}

/// The text of one program unit together with its encoding.
///
/// Generated sources are stored as encoded bytes, the way they would be
/// written to disk. Only UTF-8 is supported, so decoding is infallible.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceText {
    bytes: Vec<u8>,
    encoding: TextEncoding,
}

impl SourceText {
    /// Encode `text` with the given encoding.
    pub fn new(text: impl Into<String>, encoding: TextEncoding) -> Self {
        match encoding {
            TextEncoding::Utf8 => Self {
                bytes: text.into().into_bytes(),
                encoding,
            },
        }
    }

    /// Encode `text` as UTF-8.
    pub fn from_utf8(text: impl Into<String>) -> Self {
        Self::new(text, TextEncoding::Utf8)
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// The encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The decoded text.
    pub fn as_str(&self) -> &str {
        match self.encoding {
            // Constructed only from `String`, so always valid UTF-8.
            TextEncoding::Utf8 => std::str::from_utf8(&self.bytes).unwrap_or_default(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceText")
            .field("encoding", &self.encoding)
            .field("text", &self.as_str())
            .finish()
    }
}

impl fmt::Display for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
