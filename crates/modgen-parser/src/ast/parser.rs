//! Parser state and token navigation.
//!
//! The parser owns the whole token buffer so it can look ahead and
//! backtrack freely. Declaration, type and expression parsing live in
//! `decl_parser`, `type_parser` and `expr_parser`.

use bumpalo::Bump;
use modgen_core::{ParseError, ParseErrorKind, ParseErrors, Span};

use crate::ast::decl::CompilationUnit;
use crate::lexer::{Token, TokenKind, tokenize};

/// Recursive-descent parser over a fully lexed program unit.
///
/// Errors are collected rather than returned: a parse always produces a
/// [`CompilationUnit`], with unparsable declarations skipped.
pub struct Parser<'ast> {
    pub(crate) arena: &'ast Bump,
    /// Source text, allocated in the arena. Node text slices point into it.
    pub(crate) source: &'ast str,
    pub(crate) buffer: Vec<Token<'ast>>,
    pub(crate) position: usize,
    pub(crate) errors: ParseErrors,
}

/// Everything a parse produces.
pub struct ParseOutput<'ast> {
    pub root: &'ast CompilationUnit<'ast>,
    pub tokens: &'ast [Token<'ast>],
    pub errors: ParseErrors,
}

impl<'ast> Parser<'ast> {
    /// Create a parser. `source` must already live in `arena`.
    pub fn new(source: &'ast str, arena: &'ast Bump) -> Self {
        let (mut buffer, lex_errors) = tokenize(source, arena);
        buffer.retain(|token| token.kind != TokenKind::Error);
        let mut errors = ParseErrors::new();
        for error in lex_errors {
            errors.push(error.into());
        }
        Self {
            arena,
            source,
            buffer,
            position: 0,
            errors,
        }
    }

    /// Parse a program unit.
    ///
    /// The source is copied into the arena first.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse(source: &str, arena: &'ast Bump) -> ParseOutput<'ast> {
        let source = arena.alloc_str(source);
        Parser::new(source, arena).finish()
    }

    /// Parse the compilation unit and hand back the tree, tokens and errors.
    pub fn finish(mut self) -> ParseOutput<'ast> {
        let unit = self.parse_compilation_unit();
        let root = self.arena.alloc(unit);
        let tokens = self.arena.alloc_slice_copy(&self.buffer);
        ParseOutput {
            root,
            tokens,
            errors: self.errors,
        }
    }

    // =========================================
    // Token navigation
    // =========================================

    /// The current token. Past the end this is the final EOF token.
    #[inline]
    pub(crate) fn peek(&self) -> Token<'ast> {
        self.peek_nth(0)
    }

    /// The token `n` positions ahead of the current one.
    #[inline]
    pub(crate) fn peek_nth(&self, n: usize) -> Token<'ast> {
        let last = self.buffer.len().saturating_sub(1);
        self.buffer[(self.position + n).min(last)]
    }

    /// Consume the current token.
    pub(crate) fn advance(&mut self) -> Token<'ast> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    #[inline]
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Check for a contextual keyword such as `partial` or `where`.
    #[inline]
    pub(crate) fn check_contextual(&self, word: &str) -> bool {
        self.peek().is_contextual(word)
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub(crate) fn eat_contextual(&mut self, word: &str) -> Option<Token<'ast>> {
        if self.check_contextual(word) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume a token of the given kind or fail.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token<'ast>, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let found = self.peek();
        if found.kind == TokenKind::Eof {
            return Err(ParseError::unexpected_eof(found.span));
        }
        Err(ParseError::expected_token(
            found.span,
            kind.description(),
            found.kind.description(),
        ))
    }

    /// Span of the most recently consumed token.
    pub(crate) fn previous_span(&self) -> Span {
        match self.position.checked_sub(1) {
            Some(index) => self.buffer[index].span,
            None => self.peek().span,
        }
    }

    /// Span from `start` through the most recently consumed token.
    pub(crate) fn span_from(&self, start: Span) -> Span {
        if self.position == 0 {
            return start;
        }
        start.merge(self.previous_span())
    }

    /// Source text from `start` through the most recently consumed token.
    pub(crate) fn text_from(&self, start: Span) -> &'ast str {
        let end = self.previous_span().end().max(start.offset);
        &self.source[start.offset as usize..end as usize]
    }

    // =========================================
    // Errors and recovery
    // =========================================

    pub(crate) fn error(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Error for a token that cannot start what was expected.
    pub(crate) fn unexpected(&self, kind: ParseErrorKind, what: &str) -> ParseError {
        let found = self.peek();
        if found.kind == TokenKind::Eof {
            return ParseError::unexpected_eof(found.span);
        }
        ParseError::new(
            kind,
            found.span,
            format!("expected {what}, found {}", found.kind.description()),
        )
    }

    /// Consume one token, or a whole bracketed group when it opens one.
    ///
    /// Stray closers inside the group are reported and skipped.
    pub(crate) fn skip_balanced(&mut self) {
        let mut stack: Vec<TokenKind> = Vec::new();
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => {
                    if let Some(open) = stack.last() {
                        self.error(ParseError::new(
                            ParseErrorKind::MismatchedDelimiter,
                            token.span,
                            format!("unclosed {}", open.description()),
                        ));
                    }
                    return;
                }
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                    stack.push(token.kind);
                }
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    match stack.last().copied() {
                        Some(open) if closer_of(open) == token.kind => {
                            stack.pop();
                        }
                        Some(open) => {
                            self.error(ParseError::new(
                                ParseErrorKind::MismatchedDelimiter,
                                token.span,
                                format!(
                                    "expected {} to close {}, found {}",
                                    closer_of(open).description(),
                                    open.description(),
                                    token.kind.description()
                                ),
                            ));
                        }
                        None => {}
                    }
                }
                _ => {}
            }
            self.advance();
            if stack.is_empty() {
                return;
            }
        }
    }

    /// Skip to the end of the current declaration.
    ///
    /// Stops after a `;` or a braced block, or before a `}` that closes the
    /// enclosing body. Always makes progress unless at such a `}` or EOF.
    pub(crate) fn synchronize(&mut self) {
        loop {
            match self.peek().kind {
                TokenKind::Eof | TokenKind::RightBrace => return,
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::LeftBrace => {
                    self.skip_balanced();
                    self.eat(TokenKind::Semicolon);
                    return;
                }
                _ => self.skip_balanced(),
            }
        }
    }
}

/// The closing delimiter for an opening one.
pub(crate) fn closer_of(open: TokenKind) -> TokenKind {
    match open {
        TokenKind::LeftParen => TokenKind::RightParen,
        TokenKind::LeftBracket => TokenKind::RightBracket,
        _ => TokenKind::RightBrace,
    }
}
