//! Lexer for the source language.
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s, dispatching
//! on the first character of each token. Whitespace, comments and
//! preprocessor lines are trivia and never produce tokens.
//!
//! All lexemes are copied into the arena, so the token stream outlives the
//! source string.

use bumpalo::Bump;
use modgen_core::{LexError, Span};

use super::cursor::{Cursor, Mark, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind, lookup_keyword};

/// Lexer for one program unit.
///
/// The `'src` lifetime is the source string being lexed (temporary).
/// The `'ast` lifetime is the arena where token lexemes are allocated (persists).
pub struct Lexer<'src, 'ast> {
    /// Low-level character cursor.
    cursor: Cursor<'src>,
    /// Arena for allocating token lexemes.
    arena: &'ast Bump,
    /// Accumulated errors.
    errors: Vec<LexError>,
}

/// Lex a whole program unit.
///
/// The returned tokens always end with a single [`TokenKind::Eof`].
pub fn tokenize<'ast>(source: &str, arena: &'ast Bump) -> (Vec<Token<'ast>>, Vec<LexError>) {
    let mut lexer = Lexer::new(source, arena);
    let mut tokens = Vec::with_capacity(source.len() / 4 + 1);
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }
    (tokens, lexer.take_errors())
}

impl<'src, 'ast> Lexer<'src, 'ast> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str, arena: &'ast Bump) -> Self {
        Self {
            cursor: Cursor::new(source),
            arena,
            errors: Vec::new(),
        }
    }

    /// Take accumulated errors, leaving an empty vec.
    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Consume and return the next token.
    ///
    /// Returns [`TokenKind::Eof`] forever once the input is exhausted.
    pub fn next_token(&mut self) -> Token<'ast> {
        self.skip_trivia();

        let start = self.cursor.mark();
        let Some(first) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, "", self.cursor.span_from(start));
        };

        match first {
            '"' => self.scan_string(start),
            '\'' => self.scan_char(start),
            '@' => self.scan_at(start),
            '$' => self.scan_interpolated(start),
            c if c.is_ascii_digit() => self.scan_number(start),
            '.' if self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_number(start)
            }
            c if is_ident_start(c) => self.scan_identifier(start),
            _ => self.scan_punctuation(start),
        }
    }

    // =========================================
    // Trivia
    // =========================================

    /// Skip whitespace, comments, preprocessor lines and a leading BOM.
    fn skip_trivia(&mut self) {
        if self.cursor.check_str("\u{FEFF}") {
            self.cursor.advance_bytes('\u{FEFF}'.len_utf8());
        }

        loop {
            match self.cursor.peek() {
                Some(c) if c.is_whitespace() => {
                    self.cursor.advance();
                }
                Some('#') => self.skip_line(),
                Some('/') if self.cursor.peek_nth(1) == Some('/') => self.skip_line(),
                Some('/') if self.cursor.peek_nth(1) == Some('*') => self.skip_block_comment(),
                _ => return,
            }
        }
    }

    fn skip_line(&mut self) {
        self.cursor.eat_while(|c| c != '\n');
    }

    fn skip_block_comment(&mut self) {
        let start = self.cursor.mark();
        self.cursor.advance_bytes(2);
        loop {
            match self.cursor.advance() {
                None => {
                    let span = self.cursor.span_from(start);
                    self.errors.push(LexError::UnterminatedComment { span });
                    return;
                }
                Some('*') if self.cursor.eat('/') => return,
                Some(_) => {}
            }
        }
    }

    // =========================================
    // Token construction
    // =========================================

    /// Create a token from `start` to the current position.
    /// Copies the lexeme into the arena.
    fn make_token(&self, kind: TokenKind, start: Mark) -> Token<'ast> {
        let lexeme = self.arena.alloc_str(self.cursor.slice_from(start.offset));
        Token::new(kind, lexeme, self.cursor.span_from(start))
    }

    /// Create an error token covering the consumed input and record the error.
    fn make_error(&mut self, error: LexError, start: Mark) -> Token<'ast> {
        self.errors.push(error);
        self.make_token(TokenKind::Error, start)
    }

    /// Finish a literal whose body was scanned by `result`.
    fn finish_literal(
        &mut self,
        kind: TokenKind,
        start: Mark,
        result: Result<(), LexError>,
    ) -> Token<'ast> {
        match result {
            Ok(()) => self.make_token(kind, start),
            Err(error) => self.make_error(error, start),
        }
    }

    // =========================================
    // Identifiers
    // =========================================

    fn scan_identifier(&mut self, start: Mark) -> Token<'ast> {
        let text = self.cursor.eat_while(is_ident_continue);
        let kind = lookup_keyword(text).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, start)
    }

    /// `@` starts a verbatim string, a verbatim interpolated string or an
    /// escaped identifier.
    fn scan_at(&mut self, start: Mark) -> Token<'ast> {
        match self.cursor.peek_nth(1) {
            Some('"') => {
                self.cursor.advance_bytes(2);
                let result = self.scan_verbatim_body(start);
                self.finish_literal(TokenKind::StringLiteral, start, result)
            }
            Some('$') if self.cursor.peek_nth(2) == Some('"') => {
                self.cursor.advance_bytes(3);
                let result = self.scan_interpolated_body(start, true);
                self.finish_literal(TokenKind::StringLiteral, start, result)
            }
            Some(c) if is_ident_start(c) => {
                self.cursor.advance();
                self.cursor.eat_while(is_ident_continue);
                self.make_token(TokenKind::Identifier, start)
            }
            _ => {
                self.cursor.advance();
                let span = self.cursor.span_from(start);
                self.make_error(LexError::UnexpectedChar { ch: '@', span }, start)
            }
        }
    }

    // =========================================
    // Strings
    // =========================================

    /// Scan a string starting with `"`: regular or raw.
    fn scan_string(&mut self, start: Mark) -> Token<'ast> {
        let quotes = self.cursor.count_run('"');
        let result = if quotes >= 3 {
            self.cursor.advance_bytes(quotes);
            self.scan_raw_body(start, quotes)
        } else {
            self.cursor.advance();
            self.scan_regular_body(start, '"')
        };
        self.finish_literal(TokenKind::StringLiteral, start, result)
    }

    fn scan_char(&mut self, start: Mark) -> Token<'ast> {
        self.cursor.advance();
        let result = self.scan_regular_body(start, '\'');
        self.finish_literal(TokenKind::CharLiteral, start, result)
    }

    /// Scan `$"..."`, `$@"..."` or `$"""..."""` (with any number of `$`).
    fn scan_interpolated(&mut self, start: Mark) -> Token<'ast> {
        let dollars = self.cursor.count_run('$');
        self.cursor.advance_bytes(dollars);

        let result = if self.cursor.check_str("\"\"\"") {
            let quotes = self.cursor.count_run('"');
            self.cursor.advance_bytes(quotes);
            self.scan_raw_body(start, quotes)
        } else if self.cursor.eat('"') {
            self.scan_interpolated_body(start, false)
        } else if self.cursor.check_str("@\"") {
            self.cursor.advance_bytes(2);
            self.scan_interpolated_body(start, true)
        } else {
            let span = self.cursor.span_from(start);
            Err(LexError::UnexpectedChar { ch: '$', span })
        };
        self.finish_literal(TokenKind::StringLiteral, start, result)
    }

    /// Body of a regular string or character literal, after the opening quote.
    fn scan_regular_body(&mut self, start: Mark, quote: char) -> Result<(), LexError> {
        loop {
            match self.cursor.peek() {
                None | Some('\n') | Some('\r') => return Err(self.unterminated(start)),
                Some('\\') => {
                    self.cursor.advance();
                    if self.cursor.check(|c| c != '\n') {
                        self.cursor.advance();
                    }
                }
                Some(c) => {
                    self.cursor.advance();
                    if c == quote {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Body of a verbatim string, after `@"`. Quotes are escaped by doubling.
    fn scan_verbatim_body(&mut self, start: Mark) -> Result<(), LexError> {
        loop {
            match self.cursor.advance() {
                None => return Err(self.unterminated(start)),
                Some('"') if !self.cursor.eat('"') => return Ok(()),
                Some(_) => {}
            }
        }
    }

    /// Body of a raw string: ends at the first run of at least `quotes` quotes.
    fn scan_raw_body(&mut self, start: Mark, quotes: usize) -> Result<(), LexError> {
        loop {
            match self.cursor.peek() {
                None => {
                    return Err(LexError::UnterminatedRawString {
                        span: self.cursor.span_from(start),
                    });
                }
                Some('"') => {
                    let run = self.cursor.count_run('"');
                    self.cursor.advance_bytes(run);
                    if run >= quotes {
                        return Ok(());
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Body of an interpolated string, after the opening quote.
    fn scan_interpolated_body(&mut self, start: Mark, verbatim: bool) -> Result<(), LexError> {
        loop {
            match self.cursor.peek() {
                None => return Err(self.unterminated(start)),
                Some('\n') | Some('\r') if !verbatim => return Err(self.unterminated(start)),
                Some('\\') if !verbatim => {
                    self.cursor.advance();
                    if self.cursor.check(|c| c != '\n') {
                        self.cursor.advance();
                    }
                }
                Some('"') => {
                    self.cursor.advance();
                    if !(verbatim && self.cursor.eat('"')) {
                        return Ok(());
                    }
                }
                Some('{') => {
                    self.cursor.advance();
                    if !self.cursor.eat('{') {
                        self.scan_hole(start)?;
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// An interpolation hole, after its `{`. Nested literals are skipped whole.
    fn scan_hole(&mut self, start: Mark) -> Result<(), LexError> {
        let mut depth = 1usize;
        loop {
            let Some(c) = self.cursor.peek() else {
                return Err(self.unterminated(start));
            };
            match c {
                '{' => {
                    depth += 1;
                    self.cursor.advance();
                }
                '}' => {
                    depth -= 1;
                    self.cursor.advance();
                    if depth == 0 {
                        return Ok(());
                    }
                }
                '"' | '\'' | '@' | '$' => {
                    if self.next_token().kind == TokenKind::Error {
                        let error = self.errors.pop();
                        return Err(error.unwrap_or_else(|| self.unterminated(start)));
                    }
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn unterminated(&self, start: Mark) -> LexError {
        LexError::UnterminatedString {
            span: self.cursor.span_from(start),
        }
    }

    // =========================================
    // Numbers
    // =========================================

    fn scan_number(&mut self, start: Mark) -> Token<'ast> {
        let radix_prefix = self.cursor.peek() == Some('0')
            && matches!(self.cursor.peek_nth(1), Some('x' | 'X' | 'b' | 'B'));

        if radix_prefix {
            self.cursor.advance_bytes(2);
            self.cursor.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
            self.eat_integer_suffix();
            return self.make_token(TokenKind::IntegerLiteral, start);
        }

        let mut is_real = false;
        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');

        if self.cursor.peek() == Some('.') && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            is_real = true;
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        }

        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            let exponent_digit = match self.cursor.peek_nth(1) {
                Some('+' | '-') => self.cursor.peek_nth(2),
                other => other,
            };
            if exponent_digit.is_some_and(|c| c.is_ascii_digit()) {
                is_real = true;
                self.cursor.advance();
                if matches!(self.cursor.peek(), Some('+' | '-')) {
                    self.cursor.advance();
                }
                self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
            }
        }

        if matches!(self.cursor.peek(), Some('f' | 'F' | 'd' | 'D' | 'm' | 'M')) {
            self.cursor.advance();
            is_real = true;
        } else if !is_real {
            self.eat_integer_suffix();
        }

        let kind = if is_real {
            TokenKind::RealLiteral
        } else {
            TokenKind::IntegerLiteral
        };
        self.make_token(kind, start)
    }

    /// `u`, `l`, `ul` or `lu` in any case.
    fn eat_integer_suffix(&mut self) {
        let is_suffix = |c: char| matches!(c, 'u' | 'U' | 'l' | 'L');
        if self.cursor.check(is_suffix) {
            self.cursor.advance();
            if self.cursor.check(is_suffix) {
                self.cursor.advance();
            }
        }
    }

    // =========================================
    // Punctuation
    // =========================================

    fn scan_punctuation(&mut self, start: Mark) -> Token<'ast> {
        let Some(c) = self.cursor.advance() else {
            return Token::new(TokenKind::Eof, "", Span::point(start.offset, start.line, start.column));
        };

        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' if self.cursor.eat(':') => TokenKind::ColonColon,
            ':' => TokenKind::Colon,
            '?' => TokenKind::Question,
            '=' if self.cursor.eat('>') => TokenKind::Arrow,
            '=' => TokenKind::Equal,
            '<' => TokenKind::Less,
            '>' => TokenKind::Greater,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '&' => TokenKind::Amp,
            '|' => TokenKind::Pipe,
            '^' => TokenKind::Caret,
            '!' => TokenKind::Bang,
            '~' => TokenKind::Tilde,
            ch => {
                let span = self.cursor.span_from(start);
                return self.make_error(LexError::UnexpectedChar { ch, span }, start);
            }
        };
        self.make_token(kind, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let arena = Bump::new();
        let (tokens, errors) = tokenize(source, &arena);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        tokens.iter().map(|t| t.kind).collect()
    }

    fn lexemes(source: &str) -> Vec<String> {
        let arena = Bump::new();
        let (tokens, _) = tokenize(source, &arena);
        tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| t.lexeme.to_string())
            .collect()
    }

    #[test]
    fn class_header() {
        use TokenKind::*;
        assert_eq!(
            kinds("public partial class TestModule : ModuleBase { }"),
            vec![Public, Identifier, Class, Identifier, Colon, Identifier, LeftBrace, RightBrace, Eof]
        );
    }

    #[test]
    fn trivia_is_skipped() {
        let source = "// line\n#nullable enable\n/* block\n comment */ class";
        assert_eq!(kinds(source), vec![TokenKind::Class, TokenKind::Eof]);
    }

    #[test]
    fn bom_is_skipped() {
        assert_eq!(kinds("\u{FEFF}using"), vec![TokenKind::Using, TokenKind::Eof]);
    }

    #[test]
    fn compound_punctuation() {
        use TokenKind::*;
        assert_eq!(
            kinds("global::System x => y >> z"),
            vec![
                Identifier, ColonColon, Identifier, Identifier, Arrow, Identifier, Greater, Greater,
                Identifier, Eof
            ]
        );
    }

    #[test]
    fn string_forms() {
        let source = r#""a\"b" @"c""d" $"x{y}z" $@"{a}""" """raw "quoted" text""" 'c' '\n'"#;
        assert_eq!(
            lexemes(source),
            vec![
                r#""a\"b""#,
                r#"@"c""d""#,
                r#"$"x{y}z""#,
                r#"$@"{a}""""#,
                r#""""raw "quoted" text""""#,
                "'c'",
                r"'\n'",
            ]
        );
    }

    #[test]
    fn interpolation_holes_with_nested_strings() {
        let source = r#"$"{(flag ? "}" : $"{inner}")} done" next"#;
        assert_eq!(
            lexemes(source),
            vec![r#"$"{(flag ? "}" : $"{inner}")} done""#, "next"]
        );
    }

    #[test]
    fn escaped_identifiers() {
        let arena = Bump::new();
        let (tokens, _) = tokenize("@class @partial", &arena);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "@class");
        assert!(!tokens[1].is_contextual("partial"));
    }

    #[test]
    fn numbers() {
        use TokenKind::*;
        assert_eq!(
            kinds("42 0xFF_FF 0b1010 10UL 3.14 1e10 2.5f 1m .5 1_000"),
            vec![
                IntegerLiteral,
                IntegerLiteral,
                IntegerLiteral,
                IntegerLiteral,
                RealLiteral,
                RealLiteral,
                RealLiteral,
                RealLiteral,
                RealLiteral,
                IntegerLiteral,
                Eof
            ]
        );
    }

    #[test]
    fn member_access_on_integer_is_not_real() {
        use TokenKind::*;
        assert_eq!(kinds("1.ToString"), vec![IntegerLiteral, Dot, Identifier, Eof]);
    }

    #[test]
    fn spans_track_lines() {
        let arena = Bump::new();
        let (tokens, _) = tokenize("class\n  Foo", &arena);
        assert_eq!(tokens[1].span, Span::new(8, 2, 3, 3));
    }

    #[test]
    fn unterminated_string_reports_error() {
        let arena = Bump::new();
        let (tokens, errors) = tokenize("\"abc\nclass", &arena);
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[1].kind, TokenKind::Class);
        assert!(matches!(errors[0], LexError::UnterminatedString { .. }));
    }

    #[test]
    fn unterminated_comment_reports_error() {
        let arena = Bump::new();
        let (tokens, errors) = tokenize("class /* never closed", &arena);
        assert_eq!(tokens.len(), 2);
        assert!(matches!(errors[0], LexError::UnterminatedComment { .. }));
    }

    #[test]
    fn unexpected_character() {
        let arena = Bump::new();
        let mut lexer = Lexer::new("`", &arena);
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Error);
        assert!(lexer.has_errors());
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn lexemes_outlive_source() {
        let arena = Bump::new();
        let tokens = {
            let source = String::from("namespace Demo");
            tokenize(&source, &arena).0
        };
        assert_eq!(tokens[1].lexeme, "Demo");
    }
}
