//! Declaration parsing.
//!
//! Implements parsing of:
//! - compilation units, `using` directives and namespaces
//! - type declarations, delegates and enum bodies
//! - members (methods, constructors, fields, properties, events, indexers, operators)
//! - attribute lists, modifiers, parameters, type parameters and constraints
//!
//! Errors inside a declaration are recorded and the parser skips to the end
//! of that declaration, so one bad member never hides the rest of the file.

use bumpalo::collections::Vec as BVec;
use modgen_core::{Modifiers, ParseError, ParseErrorKind, Span, TypeKind};

use super::parser::Parser;
use crate::ast::decl::*;
use crate::ast::types::{ExprSyntax, Ident, Name, NameSegment, TypeSyntax};
use crate::lexer::{Token, TokenKind};

/// Contextual words that act as modifiers before a declaration.
const CONTEXTUAL_MODIFIERS: &[&str] = &["partial", "async", "required", "file"];

/// Directives and members collected from a unit or namespace body.
struct Declarations<'ast> {
    usings: &'ast [UsingDirective<'ast>],
    attribute_lists: &'ast [AttributeList<'ast>],
    members: &'ast [NamespaceMember<'ast>],
}

impl<'ast> Parser<'ast> {
    // =========================================
    // Compilation units and namespaces
    // =========================================

    /// Parse a whole program unit. Never fails; errors are recorded.
    pub(crate) fn parse_compilation_unit(&mut self) -> CompilationUnit<'ast> {
        let start = self.peek().span;
        let declarations = self.parse_declarations(false);
        CompilationUnit {
            usings: declarations.usings,
            attribute_lists: declarations.attribute_lists,
            members: declarations.members,
            span: self.span_from(start),
        }
    }

    /// Parse `using` directives, global attribute lists and namespace members
    /// until EOF, or until the closing `}` when `braced`.
    fn parse_declarations(&mut self, braced: bool) -> Declarations<'ast> {
        let mut usings = BVec::new_in(self.arena);
        let mut attribute_lists = BVec::new_in(self.arena);
        let mut members = BVec::new_in(self.arena);

        loop {
            if self.is_eof() || (braced && self.check(TokenKind::RightBrace)) {
                break;
            }

            let before = self.position;
            if self.check(TokenKind::RightBrace) {
                let token = self.advance();
                self.error(ParseError::unexpected_token(token.span, "'}'"));
            } else if self.is_extern_alias() {
                self.synchronize();
            } else if self.is_using_directive() {
                match self.parse_using_directive() {
                    Ok(using) => usings.push(using),
                    Err(error) => self.recover(error),
                }
            } else if self.is_global_attribute_list() {
                match self.parse_attribute_list() {
                    Ok(list) => attribute_lists.push(list),
                    Err(error) => self.recover(error),
                }
            } else {
                match self.parse_namespace_member() {
                    Ok(member) => members.push(member),
                    Err(error) => self.recover(error),
                }
            }

            if self.position == before && !self.check(TokenKind::RightBrace) {
                self.advance();
            }
        }

        Declarations {
            usings: usings.into_bump_slice(),
            attribute_lists: attribute_lists.into_bump_slice(),
            members: members.into_bump_slice(),
        }
    }

    /// Record an error and skip the rest of the declaration.
    fn recover(&mut self, error: ParseError) {
        self.error(error);
        self.synchronize();
    }

    /// Record an error for a missing closing token without failing the declaration.
    fn expect_closing(&mut self, kind: TokenKind) {
        if let Err(error) = self.expect(kind) {
            self.error(error);
        }
    }

    fn is_extern_alias(&self) -> bool {
        self.check(TokenKind::Extern) && self.peek_nth(1).is_contextual("alias")
    }

    fn is_using_directive(&self) -> bool {
        self.check(TokenKind::Using)
            || (self.check_contextual("global") && self.peek_nth(1).kind == TokenKind::Using)
    }

    fn is_global_attribute_list(&self) -> bool {
        let target = self.peek_nth(1);
        self.check(TokenKind::LeftBracket)
            && (target.is_contextual("assembly") || target.is_contextual("module"))
            && self.peek_nth(2).kind == TokenKind::Colon
    }

    /// Grammar: `'global'? 'using' 'static'? (IDENT '=')? NAME ';'`
    fn parse_using_directive(&mut self) -> Result<UsingDirective<'ast>, ParseError> {
        let start = self.peek().span;
        let is_global = self.eat_contextual("global").is_some();
        self.expect(TokenKind::Using)?;
        let is_static = self.eat(TokenKind::Static).is_some();

        let alias = if self.check(TokenKind::Identifier) && self.peek_nth(1).kind == TokenKind::Equal {
            let alias = self.parse_ident()?;
            self.advance();
            Some(alias)
        } else {
            None
        };

        let name = self.parse_name()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(UsingDirective {
            is_global,
            is_static,
            alias,
            name,
            span: self.span_from(start),
        })
    }

    fn parse_namespace_member(&mut self) -> Result<NamespaceMember<'ast>, ParseError> {
        let start = self.peek().span;
        let attribute_lists = self.parse_attribute_lists()?;
        let modifiers = self.parse_modifiers();

        if self.check(TokenKind::Namespace) {
            return Ok(NamespaceMember::Namespace(self.parse_namespace(start)?));
        }
        if self.check(TokenKind::Delegate) {
            let delegate = self.parse_delegate(start, attribute_lists, modifiers)?;
            return Ok(NamespaceMember::Delegate(delegate));
        }
        if self.at_type_keyword() {
            let decl = self.parse_type_decl(start, attribute_lists, modifiers)?;
            return Ok(NamespaceMember::Type(decl));
        }

        Err(self.unexpected(ParseErrorKind::ExpectedDeclaration, "type or namespace declaration"))
    }

    /// Grammar: `'namespace' NAME (';' DECLS | '{' DECLS '}' ';'?)`
    fn parse_namespace(&mut self, start: Span) -> Result<NamespaceDecl<'ast>, ParseError> {
        self.expect(TokenKind::Namespace)?;
        let name = self.parse_name()?;

        let is_file_scoped = self.eat(TokenKind::Semicolon).is_some();
        let declarations = if is_file_scoped {
            self.parse_declarations(false)
        } else {
            self.expect(TokenKind::LeftBrace)?;
            let declarations = self.parse_declarations(true);
            self.expect_closing(TokenKind::RightBrace);
            self.eat(TokenKind::Semicolon);
            declarations
        };

        if !declarations.attribute_lists.is_empty() {
            self.error(ParseError::new(
                ParseErrorKind::UnexpectedToken,
                declarations.attribute_lists[0].span,
                "global attributes must precede namespace declarations",
            ));
        }

        Ok(NamespaceDecl {
            name,
            is_file_scoped,
            usings: declarations.usings,
            members: declarations.members,
            span: self.span_from(start),
        })
    }

    // =========================================
    // Modifiers and attributes
    // =========================================

    /// Parse declaration modifiers, keyword and contextual.
    pub(crate) fn parse_modifiers(&mut self) -> ModifierList<'ast> {
        let mut flags = Modifiers::empty();
        let mut tokens = BVec::new_in(self.arena);

        loop {
            let token = self.peek();
            let is_modifier = token.kind.is_modifier()
                || (token.kind == TokenKind::Ref && self.ref_is_type_modifier())
                || self.is_contextual_modifier();
            if !is_modifier {
                break;
            }
            self.advance();
            if let Some(flag) = Modifiers::from_keyword(token.lexeme) {
                if flags.contains(flag) {
                    self.error(ParseError::new(
                        ParseErrorKind::InvalidModifier,
                        token.span,
                        format!("duplicate modifier '{}'", token.lexeme),
                    ));
                }
                flags |= flag;
            }
            tokens.push(ident_of(token));
        }

        ModifierList {
            flags,
            tokens: tokens.into_bump_slice(),
        }
    }

    /// `ref struct`, `ref partial struct`, `ref readonly struct`.
    fn ref_is_type_modifier(&self) -> bool {
        let next = self.peek_nth(1);
        matches!(next.kind, TokenKind::Struct | TokenKind::Readonly) || next.is_contextual("partial")
    }

    /// Whether the current token is a contextual modifier rather than a name.
    ///
    /// `partial class`, `async Task Run()` and `required string Name` use the
    /// word as a modifier; `partial Build()` and `async = 1` do not.
    fn is_contextual_modifier(&mut self) -> bool {
        let token = self.peek();
        if token.kind != TokenKind::Identifier || !CONTEXTUAL_MODIFIERS.contains(&token.lexeme) {
            return false;
        }

        let next = self.peek_nth(1);
        match next.kind {
            kind if kind.is_modifier() => true,
            TokenKind::Class
            | TokenKind::Struct
            | TokenKind::Interface
            | TokenKind::Enum
            | TokenKind::Delegate
            | TokenKind::Event
            | TokenKind::Void
            | TokenKind::Ref
            | TokenKind::Implicit
            | TokenKind::Explicit => true,
            TokenKind::Identifier
                if next.lexeme == "record" || CONTEXTUAL_MODIFIERS.contains(&next.lexeme) =>
            {
                true
            }
            _ => {
                let saved = self.position;
                self.advance();
                let declares = self.try_parse_type().is_some()
                    && matches!(
                        self.peek().kind,
                        TokenKind::Identifier | TokenKind::This | TokenKind::Operator
                    );
                self.position = saved;
                declares
            }
        }
    }

    /// Parse zero or more attribute lists.
    pub(crate) fn parse_attribute_lists(&mut self) -> Result<&'ast [AttributeList<'ast>], ParseError> {
        let mut lists = BVec::new_in(self.arena);
        while self.check(TokenKind::LeftBracket) {
            lists.push(self.parse_attribute_list()?);
        }
        Ok(lists.into_bump_slice())
    }

    /// Grammar: `'[' (TARGET ':')? ATTRIBUTE (',' ATTRIBUTE)* ','? ']'`
    fn parse_attribute_list(&mut self) -> Result<AttributeList<'ast>, ParseError> {
        let start = self.peek().span;
        self.expect(TokenKind::LeftBracket)?;

        let next = self.peek();
        let target = if (next.kind == TokenKind::Identifier || next.kind.is_keyword())
            && self.peek_nth(1).kind == TokenKind::Colon
        {
            self.advance();
            self.advance();
            Some(ident_of(next))
        } else {
            None
        };

        let mut attributes = BVec::new_in(self.arena);
        while !self.check(TokenKind::RightBracket) {
            attributes.push(self.parse_attribute()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RightBracket)?;

        Ok(AttributeList {
            target,
            attributes: attributes.into_bump_slice(),
            span: self.span_from(start),
        })
    }

    /// Grammar: `NAME ('(' (ARGUMENT (',' ARGUMENT)*)? ')')?`
    fn parse_attribute(&mut self) -> Result<Attribute<'ast>, ParseError> {
        let start = self.peek().span;
        let name = self.parse_name()?;

        let argument_list = if self.check(TokenKind::LeftParen) {
            Some(self.parse_attribute_arguments()?)
        } else {
            None
        };

        Ok(Attribute {
            name,
            argument_list,
            span: self.span_from(start),
        })
    }

    fn parse_attribute_arguments(&mut self) -> Result<AttributeArgumentList<'ast>, ParseError> {
        let start = self.peek().span;
        self.expect(TokenKind::LeftParen)?;

        let mut arguments = BVec::new_in(self.arena);
        if !self.check(TokenKind::RightParen) {
            loop {
                arguments.push(self.parse_attribute_argument());
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;

        Ok(AttributeArgumentList {
            arguments: arguments.into_bump_slice(),
            span: self.span_from(start),
        })
    }

    /// Parse one argument. A missing expression is recorded as an error and
    /// leaves `expression` empty; the argument itself is always produced.
    fn parse_attribute_argument(&mut self) -> AttributeArgument<'ast> {
        let start = self.peek().span;
        let begin = self.position;

        let mut name_equals = None;
        let mut name_colon = None;
        if self.is_named_argument(TokenKind::Equal) {
            name_equals = Some(ident_of(self.advance()));
            self.advance();
        } else if self.is_named_argument(TokenKind::Colon) {
            name_colon = Some(ident_of(self.advance()));
            self.advance();
        }

        let expression = match self.parse_expression(&[TokenKind::Comma]) {
            Ok(expression) => Some(expression),
            Err(error) => {
                self.error(error);
                None
            }
        };

        let span = if self.position == begin {
            Span::point(start.offset, start.line, start.col)
        } else {
            self.span_from(start)
        };

        AttributeArgument {
            name_equals,
            name_colon,
            expression,
            span,
        }
    }

    /// `Name = value` or `name: value`, but not `a == b`.
    fn is_named_argument(&self, separator: TokenKind) -> bool {
        self.check(TokenKind::Identifier)
            && self.peek_nth(1).kind == separator
            && self.peek_nth(2).kind != TokenKind::Equal
    }

    // =========================================
    // Type declarations
    // =========================================

    /// Whether the current token starts a type declaration.
    fn at_type_keyword(&self) -> bool {
        match self.peek().kind {
            TokenKind::Class | TokenKind::Struct | TokenKind::Interface | TokenKind::Enum => true,
            TokenKind::Identifier if self.check_contextual("record") => {
                let next = self.peek_nth(1);
                match next.kind {
                    TokenKind::Class | TokenKind::Struct => true,
                    TokenKind::Identifier => {
                        let after = self.peek_nth(2);
                        matches!(
                            after.kind,
                            TokenKind::LeftParen
                                | TokenKind::LeftBrace
                                | TokenKind::Less
                                | TokenKind::Colon
                                | TokenKind::Semicolon
                        ) || after.is_contextual("where")
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// Parse a type declaration after its attributes and modifiers.
    ///
    /// Grammar: `KIND IDENT TYPEPARAMS? PARAMS? (':' BASE (',' BASE)*)? WHERE* (BODY | ';')`
    fn parse_type_decl(
        &mut self,
        start: Span,
        attribute_lists: &'ast [AttributeList<'ast>],
        modifiers: ModifierList<'ast>,
    ) -> Result<TypeDecl<'ast>, ParseError> {
        let keyword = self.advance();
        let kind = match keyword.kind {
            TokenKind::Class => TypeKind::Class,
            TokenKind::Struct => TypeKind::Struct,
            TokenKind::Interface => TypeKind::Interface,
            TokenKind::Enum => TypeKind::Enum,
            _ if self.eat(TokenKind::Struct).is_some() => TypeKind::RecordStruct,
            _ => {
                self.eat(TokenKind::Class);
                TypeKind::Record
            }
        };

        let name = self.parse_ident()?;
        let type_params = self.parse_optional_type_params()?;
        let parameter_list = if self.check(TokenKind::LeftParen) {
            Some(self.parse_parameter_list()?)
        } else {
            None
        };

        let mut base_list = BVec::new_in(self.arena);
        if self.eat(TokenKind::Colon).is_some() {
            loop {
                base_list.push(self.parse_type()?);
                // Record base arguments: `record B(int X) : A(X);`
                if self.check(TokenKind::LeftParen) {
                    self.skip_balanced();
                }
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        let constraints = self.parse_constraint_clauses()?;

        let members: &'ast [MemberDecl<'ast>] = if self.eat(TokenKind::Semicolon).is_some() {
            &[]
        } else {
            self.expect(TokenKind::LeftBrace)?;
            let members = if kind == TypeKind::Enum {
                self.parse_enum_members()
            } else {
                self.parse_members()
            };
            self.expect_closing(TokenKind::RightBrace);
            self.eat(TokenKind::Semicolon);
            members
        };

        Ok(TypeDecl {
            attribute_lists,
            modifiers,
            kind,
            name,
            type_params,
            parameter_list,
            base_list: base_list.into_bump_slice(),
            constraints,
            members,
            span: self.span_from(start),
        })
    }

    /// Grammar: `'delegate' TYPE IDENT TYPEPARAMS? PARAMS WHERE* ';'`
    fn parse_delegate(
        &mut self,
        start: Span,
        attribute_lists: &'ast [AttributeList<'ast>],
        modifiers: ModifierList<'ast>,
    ) -> Result<DelegateDecl<'ast>, ParseError> {
        self.expect(TokenKind::Delegate)?;
        let return_type = self.parse_type()?;
        let name = self.parse_ident()?;
        let type_params = self.parse_optional_type_params()?;
        let params = self.parse_parameter_list()?;
        let constraints = self.parse_constraint_clauses()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(DelegateDecl {
            attribute_lists,
            modifiers,
            return_type,
            name,
            type_params,
            params,
            constraints,
            span: self.span_from(start),
        })
    }

    /// Grammar: `('<' ATTRS? ('in' | 'out')? IDENT (',' ...)* '>')?`
    fn parse_optional_type_params(&mut self) -> Result<&'ast [TypeParameter<'ast>], ParseError> {
        if !self.check(TokenKind::Less) {
            return Ok(&[]);
        }
        self.advance();

        let mut params = BVec::new_in(self.arena);
        loop {
            let start = self.peek().span;
            let attribute_lists = self.parse_attribute_lists()?;
            let variance = match self.peek().kind {
                TokenKind::In | TokenKind::Out => Some(ident_of(self.advance())),
                _ => None,
            };
            let name = self.parse_ident()?;
            params.push(TypeParameter {
                attribute_lists,
                variance,
                name,
                span: self.span_from(start),
            });
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Greater)?;

        Ok(params.into_bump_slice())
    }

    /// Grammar: `('where' IDENT ':' CONSTRAINTS)*`
    fn parse_constraint_clauses(&mut self) -> Result<&'ast [ConstraintClause<'ast>], ParseError> {
        let mut clauses = BVec::new_in(self.arena);
        while self.check_contextual("where") {
            let start = self.peek().span;
            self.advance();
            let parameter = self.parse_ident()?;
            self.expect(TokenKind::Colon)?;

            let constraints_start = self.peek().span;
            let begin = self.position;
            while !matches!(
                self.peek().kind,
                TokenKind::LeftBrace | TokenKind::Semicolon | TokenKind::Arrow | TokenKind::Eof
            ) && !self.check_contextual("where")
            {
                self.skip_balanced();
            }
            if self.position == begin {
                return Err(self.unexpected(ParseErrorKind::ExpectedType, "constraint"));
            }

            clauses.push(ConstraintClause {
                parameter,
                constraints: self.text_from(constraints_start),
                span: self.span_from(start),
            });
        }
        Ok(clauses.into_bump_slice())
    }

    // =========================================
    // Members
    // =========================================

    /// Parse members until the closing `}` of the type body.
    fn parse_members(&mut self) -> &'ast [MemberDecl<'ast>] {
        let mut members = BVec::new_in(self.arena);
        while !self.check(TokenKind::RightBrace) && !self.is_eof() {
            let before = self.position;
            match self.parse_member() {
                Ok(Some(member)) => members.push(member),
                Ok(None) => {}
                Err(error) => self.recover(error),
            }
            if self.position == before && !self.check(TokenKind::RightBrace) {
                self.advance();
            }
        }
        members.into_bump_slice()
    }

    /// Parse enum members until the closing `}`.
    fn parse_enum_members(&mut self) -> &'ast [MemberDecl<'ast>] {
        let mut members = BVec::new_in(self.arena);
        while !self.check(TokenKind::RightBrace) && !self.is_eof() {
            match self.parse_enum_member() {
                Ok(member) => members.push(MemberDecl::EnumMember(member)),
                Err(error) => {
                    self.recover(error);
                    continue;
                }
            }
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        members.into_bump_slice()
    }

    fn parse_enum_member(&mut self) -> Result<EnumMemberDecl<'ast>, ParseError> {
        let start = self.peek().span;
        let attribute_lists = self.parse_attribute_lists()?;
        let name = self.parse_ident()?;
        let value = if self.eat(TokenKind::Equal).is_some() {
            Some(self.parse_expression(&[TokenKind::Comma])?)
        } else {
            None
        };
        Ok(EnumMemberDecl {
            attribute_lists,
            name,
            value,
            span: self.span_from(start),
        })
    }

    /// Parse one member. Stray semicolons produce `None`.
    fn parse_member(&mut self) -> Result<Option<MemberDecl<'ast>>, ParseError> {
        if self.eat(TokenKind::Semicolon).is_some() {
            return Ok(None);
        }

        let start = self.peek().span;
        let attribute_lists = self.parse_attribute_lists()?;
        let modifiers = self.parse_modifiers();

        if self.at_type_keyword() {
            let decl = self.parse_type_decl(start, attribute_lists, modifiers)?;
            return Ok(Some(MemberDecl::Type(decl)));
        }

        let member = match self.peek().kind {
            TokenKind::Delegate => {
                MemberDecl::Delegate(self.parse_delegate(start, attribute_lists, modifiers)?)
            }
            TokenKind::Tilde => self.parse_destructor(start, attribute_lists, modifiers)?,
            TokenKind::Event => self.parse_event(start, attribute_lists, modifiers)?,
            TokenKind::Implicit | TokenKind::Explicit => {
                self.parse_conversion_operator(start, attribute_lists, modifiers)?
            }
            TokenKind::Identifier if self.peek_nth(1).kind == TokenKind::LeftParen => {
                self.parse_constructor(start, attribute_lists, modifiers)?
            }
            _ => {
                let ty = self.parse_type()?;
                self.parse_typed_member(start, attribute_lists, modifiers, ty)?
            }
        };
        Ok(Some(member))
    }

    /// Members that start with a type: methods, fields, properties,
    /// indexers and operators.
    fn parse_typed_member(
        &mut self,
        start: Span,
        attribute_lists: &'ast [AttributeList<'ast>],
        modifiers: ModifierList<'ast>,
        ty: TypeSyntax<'ast>,
    ) -> Result<MemberDecl<'ast>, ParseError> {
        if self.eat(TokenKind::Operator).is_some() {
            while !self.check(TokenKind::LeftParen) && !self.is_eof() {
                self.advance();
            }
            return self.parse_other_member(OtherMemberKind::Operator, start, attribute_lists, modifiers);
        }
        if self.check(TokenKind::This) {
            return self.parse_indexer(start, attribute_lists, modifiers);
        }

        let (explicit_interface, name) = self.parse_member_name()?;

        match self.peek().kind {
            TokenKind::LeftParen | TokenKind::Less => {
                let type_params = self.parse_optional_type_params()?;
                let params = self.parse_parameter_list()?;
                let constraints = self.parse_constraint_clauses()?;
                let body = self.parse_body()?;
                Ok(MemberDecl::Method(MethodDecl {
                    attribute_lists,
                    modifiers,
                    return_type: ty,
                    explicit_interface,
                    name,
                    type_params,
                    params,
                    constraints,
                    body,
                    span: self.span_from(start),
                }))
            }
            TokenKind::LeftBrace | TokenKind::Arrow => {
                let (accessors, expression_body) = self.parse_accessors_or_expression()?;
                let initializer = if expression_body.is_none() && self.eat(TokenKind::Equal).is_some() {
                    let value = self.parse_expression(&[])?;
                    self.expect(TokenKind::Semicolon)?;
                    Some(value)
                } else {
                    None
                };
                Ok(MemberDecl::Property(PropertyDecl {
                    attribute_lists,
                    modifiers,
                    ty,
                    explicit_interface,
                    name,
                    accessors,
                    expression_body,
                    initializer,
                    span: self.span_from(start),
                }))
            }
            TokenKind::Equal | TokenKind::Comma | TokenKind::Semicolon | TokenKind::LeftBracket
                if explicit_interface.is_none() =>
            {
                let variables = self.parse_variable_declarators(name)?;
                Ok(MemberDecl::Field(FieldDecl {
                    attribute_lists,
                    modifiers,
                    ty,
                    variables,
                    span: self.span_from(start),
                }))
            }
            _ => Err(self.unexpected(ParseErrorKind::ExpectedMember, "'(', '{', '=>', '=' or ';'")),
        }
    }

    /// Parse a member name, splitting off an explicit interface qualifier.
    ///
    /// `IDisposable.Dispose` yields `(Some(IDisposable), Dispose)`.
    fn parse_member_name(&mut self) -> Result<(Option<Name<'ast>>, Ident<'ast>), ParseError> {
        let start = self.peek().span;
        let mut segments = BVec::new_in(self.arena);
        let mut interface_end = start.offset;

        loop {
            let ident = self.parse_ident()?;
            let followed_by_args = match self.scan_type_argument_list(0) {
                Some(end) => self.peek_nth(end).kind == TokenKind::Dot,
                None => false,
            };

            if self.check(TokenKind::Dot) || followed_by_args {
                let type_args = if followed_by_args {
                    self.parse_type_args()?
                } else {
                    &[]
                };
                segments.push(NameSegment { ident, type_args });
                interface_end = self.previous_span().end();
                self.advance();
                continue;
            }

            if segments.is_empty() {
                return Ok((None, ident));
            }
            let interface = Name {
                alias: None,
                segments: segments.into_bump_slice(),
                text: &self.source[start.offset as usize..interface_end as usize],
                span: Span::new(start.offset, start.line, start.col, interface_end - start.offset),
            };
            return Ok((Some(interface), ident));
        }
    }

    fn parse_constructor(
        &mut self,
        start: Span,
        attribute_lists: &'ast [AttributeList<'ast>],
        modifiers: ModifierList<'ast>,
    ) -> Result<MemberDecl<'ast>, ParseError> {
        let name = self.parse_ident()?;
        let params = self.parse_parameter_list()?;
        let initializer = if self.eat(TokenKind::Colon).is_some() {
            Some(self.parse_expression(&[TokenKind::LeftBrace, TokenKind::Arrow])?)
        } else {
            None
        };
        let body = self.parse_body()?;

        Ok(MemberDecl::Constructor(ConstructorDecl {
            attribute_lists,
            modifiers,
            name,
            params,
            initializer,
            body,
            span: self.span_from(start),
        }))
    }

    fn parse_destructor(
        &mut self,
        start: Span,
        attribute_lists: &'ast [AttributeList<'ast>],
        modifiers: ModifierList<'ast>,
    ) -> Result<MemberDecl<'ast>, ParseError> {
        self.expect(TokenKind::Tilde)?;
        self.parse_ident()?;
        self.parse_other_member(OtherMemberKind::Destructor, start, attribute_lists, modifiers)
    }

    fn parse_conversion_operator(
        &mut self,
        start: Span,
        attribute_lists: &'ast [AttributeList<'ast>],
        modifiers: ModifierList<'ast>,
    ) -> Result<MemberDecl<'ast>, ParseError> {
        self.advance();
        self.expect(TokenKind::Operator)?;
        self.parse_type()?;
        self.parse_other_member(OtherMemberKind::ConversionOperator, start, attribute_lists, modifiers)
    }

    /// Parameters and body of a destructor or operator.
    fn parse_other_member(
        &mut self,
        kind: OtherMemberKind,
        start: Span,
        attribute_lists: &'ast [AttributeList<'ast>],
        modifiers: ModifierList<'ast>,
    ) -> Result<MemberDecl<'ast>, ParseError> {
        let params = self.parse_parameter_list()?;
        self.parse_body()?;
        Ok(MemberDecl::Other(OtherMemberDecl {
            kind,
            attribute_lists,
            modifiers,
            params,
            span: self.span_from(start),
        }))
    }

    /// Grammar: `'this' '[' PARAMS ']' (ACCESSORS | '=>' EXPR ';')`
    fn parse_indexer(
        &mut self,
        start: Span,
        attribute_lists: &'ast [AttributeList<'ast>],
        modifiers: ModifierList<'ast>,
    ) -> Result<MemberDecl<'ast>, ParseError> {
        self.expect(TokenKind::This)?;
        let params = self.parse_parameters(TokenKind::LeftBracket, TokenKind::RightBracket)?;
        self.parse_accessors_or_expression()?;
        Ok(MemberDecl::Other(OtherMemberDecl {
            kind: OtherMemberKind::Indexer,
            attribute_lists,
            modifiers,
            params,
            span: self.span_from(start),
        }))
    }

    /// Grammar: `'event' TYPE (NAME ACCESSORS | DECLARATORS ';')`
    fn parse_event(
        &mut self,
        start: Span,
        attribute_lists: &'ast [AttributeList<'ast>],
        modifiers: ModifierList<'ast>,
    ) -> Result<MemberDecl<'ast>, ParseError> {
        self.expect(TokenKind::Event)?;
        let ty = self.parse_type()?;
        let (_, name) = self.parse_member_name()?;

        let (variables, accessors) = if self.check(TokenKind::LeftBrace) {
            let (accessors, _) = self.parse_accessors_or_expression()?;
            let variable = VariableDeclarator {
                name,
                initializer: None,
                span: name.span,
            };
            let variables: &'ast [VariableDeclarator<'ast>] = self.arena.alloc_slice_copy(&[variable]);
            (variables, accessors)
        } else {
            (self.parse_variable_declarators(name)?, &[][..])
        };

        Ok(MemberDecl::Event(EventDecl {
            attribute_lists,
            modifiers,
            ty,
            variables,
            accessors,
            span: self.span_from(start),
        }))
    }

    /// Declarators after the first name, through the closing `;`.
    fn parse_variable_declarators(
        &mut self,
        first: Ident<'ast>,
    ) -> Result<&'ast [VariableDeclarator<'ast>], ParseError> {
        let mut variables = BVec::new_in(self.arena);
        let mut name = first;
        loop {
            // Fixed-size buffers: `fixed byte data[16];`
            if self.check(TokenKind::LeftBracket) {
                self.skip_balanced();
            }
            let initializer = if self.eat(TokenKind::Equal).is_some() {
                Some(self.parse_expression(&[TokenKind::Comma])?)
            } else {
                None
            };
            variables.push(VariableDeclarator {
                name,
                initializer,
                span: self.span_from(name.span),
            });
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            name = self.parse_ident()?;
        }
        self.expect(TokenKind::Semicolon)?;
        Ok(variables.into_bump_slice())
    }

    /// `{ get; set; }` or `=> expr;`
    fn parse_accessors_or_expression(
        &mut self,
    ) -> Result<(&'ast [AccessorDecl<'ast>], Option<ExprSyntax<'ast>>), ParseError> {
        if self.eat(TokenKind::Arrow).is_some() {
            let expression = self.parse_expression(&[])?;
            self.expect(TokenKind::Semicolon)?;
            return Ok((&[], Some(expression)));
        }

        self.expect(TokenKind::LeftBrace)?;
        let mut accessors = BVec::new_in(self.arena);
        while !self.check(TokenKind::RightBrace) && !self.is_eof() {
            let start = self.peek().span;
            let attribute_lists = self.parse_attribute_lists()?;
            let modifiers = self.parse_modifiers();
            let keyword = self.parse_ident()?;
            let body = self.parse_body()?;
            accessors.push(AccessorDecl {
                attribute_lists,
                modifiers,
                keyword,
                body,
                span: self.span_from(start),
            });
        }
        self.expect(TokenKind::RightBrace)?;

        Ok((accessors.into_bump_slice(), None))
    }

    /// Grammar: `BLOCK | '=>' EXPR ';' | ';'`
    fn parse_body(&mut self) -> Result<Body<'ast>, ParseError> {
        match self.peek().kind {
            TokenKind::LeftBrace => {
                let start = self.peek().span;
                self.skip_balanced();
                Ok(Body::Block(self.span_from(start)))
            }
            TokenKind::Arrow => {
                self.advance();
                let expression = self.parse_expression(&[])?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Body::Expression(expression))
            }
            TokenKind::Semicolon => {
                self.advance();
                Ok(Body::None)
            }
            _ => Err(self.unexpected(ParseErrorKind::ExpectedToken, "'{', '=>' or ';'")),
        }
    }

    // =========================================
    // Parameters
    // =========================================

    pub(crate) fn parse_parameter_list(&mut self) -> Result<&'ast [Parameter<'ast>], ParseError> {
        self.parse_parameters(TokenKind::LeftParen, TokenKind::RightParen)
    }

    /// Grammar: `OPEN (PARAM (',' PARAM)*)? CLOSE`
    fn parse_parameters(
        &mut self,
        open: TokenKind,
        close: TokenKind,
    ) -> Result<&'ast [Parameter<'ast>], ParseError> {
        if !self.check(open) {
            return Err(self.unexpected(ParseErrorKind::ExpectedParameters, open.description()));
        }
        self.advance();

        let mut params = BVec::new_in(self.arena);
        if !self.check(close) {
            loop {
                params.push(self.parse_parameter()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(close)?;

        Ok(params.into_bump_slice())
    }

    /// Grammar: `ATTRS? MODIFIERS? TYPE IDENT ('=' EXPR)?`
    fn parse_parameter(&mut self) -> Result<Parameter<'ast>, ParseError> {
        let start = self.peek().span;
        let attribute_lists = self.parse_attribute_lists()?;
        let modifiers = self.parse_parameter_modifiers();
        let ty = self.parse_type()?;
        let name = self.parse_ident()?;
        let default = if self.eat(TokenKind::Equal).is_some() {
            Some(self.parse_expression(&[TokenKind::Comma])?)
        } else {
            None
        };

        Ok(Parameter {
            attribute_lists,
            modifiers,
            ty,
            name,
            default,
            span: self.span_from(start),
        })
    }

    /// `ref`, `out`, `in`, `params`, `this`, `readonly` and contextual `scoped`.
    fn parse_parameter_modifiers(&mut self) -> ModifierList<'ast> {
        let mut flags = Modifiers::empty();
        let mut tokens = BVec::new_in(self.arena);

        loop {
            let token = self.peek();
            let is_modifier = match token.kind {
                TokenKind::Ref
                | TokenKind::Out
                | TokenKind::In
                | TokenKind::Params
                | TokenKind::This
                | TokenKind::Readonly => true,
                TokenKind::Identifier if token.lexeme == "scoped" => {
                    let next = self.peek_nth(1);
                    matches!(next.kind, TokenKind::Ref | TokenKind::In | TokenKind::Out)
                        || (next.kind == TokenKind::Identifier || next.kind.is_predefined_type())
                            && self.peek_nth(2).kind == TokenKind::Identifier
                }
                _ => false,
            };
            if !is_modifier {
                break;
            }
            self.advance();
            if let Some(flag) = Modifiers::from_keyword(token.lexeme) {
                flags |= flag;
            }
            tokens.push(ident_of(token));
        }

        ModifierList {
            flags,
            tokens: tokens.into_bump_slice(),
        }
    }
}

/// An identifier node for a keyword or identifier token.
fn ident_of(token: Token<'_>) -> Ident<'_> {
    Ident::new(token.lexeme, token.span)
}
