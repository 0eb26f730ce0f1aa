use modgen_core::Span;

/// Position of a cursor: byte offset plus line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

/// A cursor over source text that tracks position.
///
/// Provides character access with peek/advance semantics and tracks the byte
/// offset, line and column as it advances.
pub struct Cursor<'src> {
    /// The source text being scanned.
    source: &'src str,
    /// Remaining source text (slice starting at current position).
    rest: &'src str,
    /// Current byte offset from start of source.
    offset: u32,
    /// Current line number (1-indexed).
    line: u32,
    /// Current column number (1-indexed, byte-based).
    column: u32,
}

impl<'src> Cursor<'src> {
    /// Create a new cursor at the start of the source.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Current position.
    #[inline]
    pub fn mark(&self) -> Mark {
        Mark {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    /// Span from `start` to the current position.
    #[inline]
    pub fn span_from(&self, start: Mark) -> Span {
        Span::new(start.offset, start.line, start.column, self.offset - start.offset)
    }

    /// Peek at the current character without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        let first = *self.rest.as_bytes().first()?;
        if first < 128 {
            Some(first as char)
        } else {
            self.rest.chars().next()
        }
    }

    /// Peek at the nth character ahead (0 = current).
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Check if the current character satisfies a predicate.
    #[inline]
    pub fn check(&self, f: impl Fn(char) -> bool) -> bool {
        self.peek().is_some_and(f)
    }

    /// Check if the upcoming text matches the given string.
    #[inline]
    pub fn check_str(&self, s: &str) -> bool {
        self.rest.starts_with(s)
    }

    /// Consume the current character and advance.
    ///
    /// Returns the consumed character, or `None` at EOF.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        let len = ch.len_utf8();
        self.rest = &self.rest[len..];
        self.offset += len as u32;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += len as u32;
        }

        Some(ch)
    }

    /// Advance by `n` bytes. `n` must land on a character boundary.
    pub fn advance_bytes(&mut self, n: usize) {
        debug_assert!(self.rest.is_char_boundary(n));

        for ch in self.rest[..n].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += ch.len_utf8() as u32;
            }
        }

        self.rest = &self.rest[n..];
        self.offset += n as u32;
    }

    /// Consume if the current character matches.
    #[inline]
    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume characters while the predicate matches.
    ///
    /// Returns the consumed slice.
    pub fn eat_while(&mut self, f: impl Fn(char) -> bool) -> &'src str {
        let start = self.offset as usize;
        while self.check(&f) {
            self.advance();
        }
        &self.source[start..self.offset as usize]
    }

    /// Count how many times `ch` repeats starting at the current position.
    pub fn count_run(&self, ch: char) -> usize {
        self.rest.chars().take_while(|&c| c == ch).count()
    }

    /// Get a slice of source from a starting offset to current position.
    #[inline]
    pub fn slice_from(&self, start: u32) -> &'src str {
        &self.source[start as usize..self.offset as usize]
    }
}

/// Check if a character can start an identifier.
#[inline]
pub fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

/// Check if a character can continue an identifier.
#[inline]
pub fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cursor = Cursor::new("hello");
        assert_eq!(cursor.peek(), Some('h'));
        assert_eq!(cursor.mark().offset, 0);

        assert_eq!(cursor.advance(), Some('h'));
        assert_eq!(cursor.peek(), Some('e'));
        assert_eq!(cursor.mark().offset, 1);
    }

    #[test]
    fn cursor_eat_while() {
        let mut cursor = Cursor::new("aaabbb");

        assert_eq!(cursor.eat_while(|c| c == 'a'), "aaa");
        assert_eq!(cursor.eat_while(|c| c == 'b'), "bbb");
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn cursor_utf8_columns_count_bytes() {
        let mut cursor = Cursor::new("héllo");

        cursor.advance();
        cursor.advance();
        let mark = cursor.mark();
        assert_eq!(mark.offset, 3);
        assert_eq!(mark.column, 4);
    }

    #[test]
    fn cursor_line_tracking() {
        let mut cursor = Cursor::new("ab\ncd");
        cursor.advance_bytes(3);
        let mark = cursor.mark();
        assert_eq!(mark.line, 2);
        assert_eq!(mark.column, 1);
    }

    #[test]
    fn span_from_mark() {
        let mut cursor = Cursor::new("  class");
        cursor.advance_bytes(2);
        let start = cursor.mark();
        cursor.eat_while(is_ident_continue);
        let span = cursor.span_from(start);
        assert_eq!(span, Span::new(2, 1, 3, 5));
        assert_eq!(cursor.slice_from(start.offset), "class");
    }

    #[test]
    fn count_run_of_quotes() {
        let cursor = Cursor::new("\"\"\"\"x");
        assert_eq!(cursor.count_run('"'), 4);
        assert!(cursor.check_str("\"\"\""));
    }

    #[test]
    fn unicode_identifiers() {
        assert!(is_ident_start('é'));
        assert!(is_ident_start('_'));
        assert!(!is_ident_start('1'));
        assert!(is_ident_continue('1'));
        assert!(!is_ident_continue('-'));
    }
}
