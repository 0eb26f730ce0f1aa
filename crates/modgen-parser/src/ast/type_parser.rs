//! Type and name parsing.
//!
//! Implements parsing of:
//! - identifiers and dotted, generic, alias-qualified names
//! - predefined types (`int`, `string`, ...)
//! - tuple types
//! - nullable, pointer and array suffixes
//!
//! None of these functions record errors themselves; they return them, so
//! callers can parse speculatively and backtrack.

use bumpalo::collections::Vec as BVec;
use modgen_core::{ParseError, Span};

use super::parser::Parser;
use crate::ast::types::{Ident, Name, NameSegment, TupleElement, TypeSyntax, TypeSyntaxKind};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse an identifier.
    pub(crate) fn parse_ident(&mut self) -> Result<Ident<'ast>, ParseError> {
        let token = self.peek();
        if token.kind == TokenKind::Identifier {
            self.advance();
            return Ok(Ident::new(token.lexeme, token.span));
        }
        if token.kind == TokenKind::Eof {
            return Err(ParseError::unexpected_eof(token.span));
        }
        Err(ParseError::expected_identifier(
            token.span,
            token.kind.description(),
        ))
    }

    /// Parse a name.
    ///
    /// Grammar: `(IDENT '::')? IDENT TYPEARGS? ('.' IDENT TYPEARGS?)*`
    ///
    /// Examples:
    /// - `ModuleBase`
    /// - `System.Collections.Generic.List<int>`
    /// - `global::Demo.ModuleBase`
    pub(crate) fn parse_name(&mut self) -> Result<Name<'ast>, ParseError> {
        let start = self.peek().span;

        let alias = if self.check(TokenKind::Identifier)
            && self.peek_nth(1).kind == TokenKind::ColonColon
        {
            let alias = self.parse_ident()?;
            self.advance();
            Some(alias)
        } else {
            None
        };

        let mut segments = BVec::new_in(self.arena);
        loop {
            let ident = self.parse_ident()?;
            let type_args = if self.check(TokenKind::Less) {
                self.parse_type_args()?
            } else {
                &[]
            };
            segments.push(NameSegment { ident, type_args });

            if self.check(TokenKind::Dot) && self.peek_nth(1).kind == TokenKind::Identifier {
                self.advance();
            } else {
                break;
            }
        }

        Ok(Name {
            alias,
            segments: segments.into_bump_slice(),
            text: self.text_from(start),
            span: self.span_from(start),
        })
    }

    /// Parse a type.
    ///
    /// Grammar: `(PREDEFINED | NAME | TUPLE) ('?' | '*' | '[' ','* ']')*`
    pub fn parse_type(&mut self) -> Result<TypeSyntax<'ast>, ParseError> {
        let start = self.peek().span;
        let mut ty = self.parse_type_base(start)?;

        loop {
            let kind = match self.peek().kind {
                TokenKind::Question => {
                    self.advance();
                    TypeSyntaxKind::Nullable(self.arena.alloc(ty))
                }
                TokenKind::Star => {
                    self.advance();
                    TypeSyntaxKind::Pointer(self.arena.alloc(ty))
                }
                TokenKind::LeftBracket
                    if matches!(
                        self.peek_nth(1).kind,
                        TokenKind::RightBracket | TokenKind::Comma
                    ) =>
                {
                    self.advance();
                    let mut rank = 1;
                    while self.eat(TokenKind::Comma).is_some() {
                        rank += 1;
                    }
                    self.expect(TokenKind::RightBracket)?;
                    TypeSyntaxKind::Array {
                        element: self.arena.alloc(ty),
                        rank,
                    }
                }
                _ => break,
            };
            ty = TypeSyntax {
                kind,
                text: self.text_from(start),
                span: self.span_from(start),
            };
        }

        Ok(ty)
    }

    /// Parse a type, restoring the position when it fails.
    pub(crate) fn try_parse_type(&mut self) -> Option<TypeSyntax<'ast>> {
        let saved = self.position;
        match self.parse_type() {
            Ok(ty) => Some(ty),
            Err(_) => {
                self.position = saved;
                None
            }
        }
    }

    fn parse_type_base(&mut self, start: Span) -> Result<TypeSyntax<'ast>, ParseError> {
        let token = self.peek();
        let kind = match token.kind {
            kind if kind.is_predefined_type() => {
                self.advance();
                TypeSyntaxKind::Predefined(token.lexeme)
            }
            TokenKind::LeftParen => TypeSyntaxKind::Tuple(self.parse_tuple_elements()?),
            TokenKind::Identifier => TypeSyntaxKind::Named(self.parse_name()?),
            TokenKind::Eof => return Err(ParseError::unexpected_eof(token.span)),
            _ => {
                return Err(ParseError::expected_type(
                    token.span,
                    token.kind.description(),
                ));
            }
        };

        Ok(TypeSyntax {
            kind,
            text: self.text_from(start),
            span: self.span_from(start),
        })
    }

    /// Grammar: `'(' TYPE IDENT? (',' TYPE IDENT?)+ ')'`
    fn parse_tuple_elements(&mut self) -> Result<&'ast [TupleElement<'ast>], ParseError> {
        self.expect(TokenKind::LeftParen)?;

        let mut elements = BVec::new_in(self.arena);
        loop {
            let ty = self.parse_type()?;
            let name = if self.check(TokenKind::Identifier) {
                Some(self.parse_ident()?)
            } else {
                None
            };
            elements.push(TupleElement { ty, name });

            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RightParen)?;

        if elements.len() < 2 {
            return Err(ParseError::expected_token(
                self.previous_span(),
                "',' between tuple elements",
                "')'",
            ));
        }
        Ok(elements.into_bump_slice())
    }

    /// Grammar: `'<' (TYPE (',' TYPE)*)? '>'`
    pub(crate) fn parse_type_args(&mut self) -> Result<&'ast [TypeSyntax<'ast>], ParseError> {
        self.expect(TokenKind::Less)?;

        let mut args = BVec::new_in(self.arena);
        if !self.check(TokenKind::Greater) {
            args.push(self.parse_type()?);
            while self.eat(TokenKind::Comma).is_some() {
                args.push(self.parse_type()?);
            }
        }
        self.expect(TokenKind::Greater)?;

        Ok(args.into_bump_slice())
    }

    /// If the token `offset` ahead opens a type argument list, the offset of
    /// the token after its closing `>`.
    ///
    /// Only tokens that can appear inside type arguments are accepted, so a
    /// less-than comparison is never mistaken for a list.
    pub(crate) fn scan_type_argument_list(&self, offset: usize) -> Option<usize> {
        if self.peek_nth(offset).kind != TokenKind::Less {
            return None;
        }
        let mut depth = 0usize;
        let mut index = offset;
        loop {
            let kind = self.peek_nth(index).kind;
            match kind {
                TokenKind::Less => depth += 1,
                TokenKind::Greater => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(index + 1);
                    }
                }
                TokenKind::Identifier
                | TokenKind::Comma
                | TokenKind::Dot
                | TokenKind::ColonColon
                | TokenKind::Question
                | TokenKind::Star
                | TokenKind::LeftBracket
                | TokenKind::RightBracket
                | TokenKind::LeftParen
                | TokenKind::RightParen => {}
                kind if kind.is_predefined_type() => {}
                _ => return None,
            }
            index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;

    fn parse_type<'ast>(arena: &'ast Bump, source: &str) -> TypeSyntax<'ast> {
        let mut parser = Parser::new(arena.alloc_str(source), arena);
        let ty = parser.parse_type().unwrap();
        assert!(parser.is_eof(), "trailing input after {}", ty.text);
        ty
    }

    #[test]
    fn predefined_type() {
        let arena = Bump::new();
        let ty = parse_type(&arena, "string");
        assert_eq!(ty.kind, TypeSyntaxKind::Predefined("string"));
        assert_eq!(ty.text, "string");
    }

    #[test]
    fn generic_type_keeps_written_text() {
        let arena = Bump::new();
        let ty = parse_type(&arena, "Dictionary<string,  List<int>>");
        assert_eq!(ty.text, "Dictionary<string,  List<int>>");
        let name = ty.as_name().unwrap();
        assert_eq!(name.simple_name(), "Dictionary");
        assert_eq!(name.segments[0].arity(), 2);
    }

    #[test]
    fn qualified_global_name() {
        let arena = Bump::new();
        let ty = parse_type(&arena, "global::Demo.Runtime.ModuleBase");
        let name = ty.as_name().unwrap();
        assert!(name.is_global());
        assert_eq!(name.segments.len(), 3);
        assert_eq!(name.simple_name(), "ModuleBase");
    }

    #[test]
    fn suffixes() {
        let arena = Bump::new();
        let ty = parse_type(&arena, "int?[,]");
        assert_eq!(ty.text, "int?[,]");
        match ty.kind {
            TypeSyntaxKind::Array { element, rank } => {
                assert_eq!(rank, 2);
                assert!(matches!(element.kind, TypeSyntaxKind::Nullable(_)));
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn tuple_type() {
        let arena = Bump::new();
        let ty = parse_type(&arena, "(int Count, string)");
        match ty.kind {
            TypeSyntaxKind::Tuple(elements) => {
                assert_eq!(elements.len(), 2);
                assert_eq!(elements[0].name.map(|n| n.name), Some("Count"));
                assert!(elements[1].name.is_none());
            }
            other => panic!("expected tuple, got {other:?}"),
        }
    }

    #[test]
    fn keyword_is_not_a_type() {
        let arena = Bump::new();
        let mut parser = Parser::new(arena.alloc_str("class"), &arena);
        assert!(parser.try_parse_type().is_none());
        assert_eq!(parser.position, 0);
    }

    #[test]
    fn type_argument_scan() {
        let arena = Bump::new();
        let parser = Parser::new(arena.alloc_str("IFoo<List<int>, string>.Bar"), &arena);
        assert_eq!(parser.scan_type_argument_list(1), Some(9));

        let parser = Parser::new(arena.alloc_str("a < b + c"), &arena);
        assert_eq!(parser.scan_type_argument_list(1), None);
    }
}
