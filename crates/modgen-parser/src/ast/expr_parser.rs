//! Expression capture.
//!
//! Expressions are not modelled. An expression is the longest balanced run
//! of tokens before a terminator at nesting depth zero, and is kept as its
//! source text. This is enough for attribute arguments, defaults,
//! initializers and expression bodies, which are only ever read as text.
//!
//! A captured run is still checked for shapes no expression can take: a
//! leading binary or assignment operator, a trailing one, and two operands
//! side by side (`"a" "b"`). Such a run is consumed and reported as
//! [`ParseErrorKind::ExpectedExpression`].

use modgen_core::{ParseError, ParseErrorKind};

use super::parser::Parser;
use crate::ast::types::ExprSyntax;
use crate::lexer::{Token, TokenKind};

/// Contextual words that may sit between two operands.
const OPERAND_JOINERS: &[&str] = &[
    "and", "or", "not", "with", "when", "await", "select", "where", "orderby", "group", "by", "let", "on",
    "equals", "into", "ascending", "descending",
];

impl<'ast> Parser<'ast> {
    /// Capture an expression.
    ///
    /// Stops before any of `terminators`, a `;`, or a closing delimiter at
    /// depth zero. Generic argument lists (`Dictionary<string, int>`) are
    /// consumed whole so their commas do not end the expression.
    pub(crate) fn parse_expression(
        &mut self,
        terminators: &[TokenKind],
    ) -> Result<ExprSyntax<'ast>, ParseError> {
        let start = self.peek().span;
        let begin = self.position;

        loop {
            let kind = self.peek().kind;
            if terminators.contains(&kind)
                || matches!(
                    kind,
                    TokenKind::Eof
                        | TokenKind::Semicolon
                        | TokenKind::RightParen
                        | TokenKind::RightBracket
                        | TokenKind::RightBrace
                )
            {
                break;
            }

            let follows_name = self.position > begin
                && self.buffer[self.position - 1].kind == TokenKind::Identifier;
            match self.scan_type_argument_list(0) {
                Some(end) if follows_name && self.ends_type_argument_list(end) => {
                    self.position += end;
                }
                _ => self.skip_balanced(),
            }
        }

        if self.position == begin {
            return Err(self.unexpected(ParseErrorKind::ExpectedExpression, "expression"));
        }
        if let Some(offender) = malformed_at(&self.buffer[begin..self.position]) {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedExpression,
                offender.span,
                format!("expected expression, found {}", offender.kind.description()),
            ));
        }

        Ok(ExprSyntax {
            text: self.text_from(start),
            span: self.span_from(start),
        })
    }

    /// Whether the token `offset` ahead can follow a generic argument list
    /// in an expression. `a < b, c > d` is two comparisons, not a generic name.
    fn ends_type_argument_list(&self, offset: usize) -> bool {
        matches!(
            self.peek_nth(offset).kind,
            TokenKind::LeftParen
                | TokenKind::RightParen
                | TokenKind::RightBracket
                | TokenKind::RightBrace
                | TokenKind::Colon
                | TokenKind::Semicolon
                | TokenKind::Comma
                | TokenKind::Dot
                | TokenKind::Question
                | TokenKind::Eof
        )
    }
}

/// The first token of `run` that no expression could have there.
fn malformed_at<'a, 'ast>(run: &'a [Token<'ast>]) -> Option<&'a Token<'ast>> {
    let first = run.first()?;
    if cannot_start(first.kind) {
        return Some(first);
    }
    let last = run.last()?;
    if cannot_end(last.kind) {
        return Some(last);
    }

    let mut depth = 0usize;
    let mut previous: Option<&Token<'ast>> = None;
    for token in run {
        if depth == 0 && previous.is_some_and(|previous| adjacent_operands(previous, token)) {
            return Some(token);
        }
        match token.kind {
            TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
            TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
        previous = Some(token);
    }
    None
}

fn cannot_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Equal
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Pipe
            | TokenKind::Less
            | TokenKind::Greater
            | TokenKind::Question
            | TokenKind::Colon
            | TokenKind::ColonColon
            | TokenKind::Dot
            | TokenKind::Arrow
    )
}

fn cannot_end(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Equal
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Pipe
            | TokenKind::Caret
            | TokenKind::Amp
            | TokenKind::Less
            | TokenKind::Colon
            | TokenKind::ColonColon
            | TokenKind::Dot
            | TokenKind::Arrow
    )
}

/// Two operands with nothing joining them: `"a" "b"`, `1 x`, `Name "a"`.
fn adjacent_operands(previous: &Token<'_>, token: &Token<'_>) -> bool {
    let is_joiner = |token: &Token<'_>| {
        token.kind == TokenKind::Identifier && OPERAND_JOINERS.contains(&token.lexeme)
    };
    match (previous.kind.is_literal(), token.kind.is_literal()) {
        (true, true) => true,
        (true, false) => token.kind == TokenKind::Identifier && !is_joiner(token),
        (false, true) => previous.kind == TokenKind::Identifier && !is_joiner(previous),
        (false, false) => false,
    }
}
