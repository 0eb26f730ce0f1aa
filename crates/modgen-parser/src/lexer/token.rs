//! Token types for the source lexer.
//!
//! Reserved keywords get their own [`TokenKind`] variant. Contextual keywords
//! (`partial`, `record`, `where`, `async`, `global`, `var`, ...) lex as
//! [`TokenKind::Identifier`] and are recognised by the parser from their text.

use modgen_core::Span;
use std::fmt;

/// A token from the source code.
///
/// The lexeme is copied into the arena, so tokens outlive the source string
/// they were scanned from.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'ast> {
    /// The type of token.
    pub kind: TokenKind,
    /// The source text of this token (allocated in arena).
    pub lexeme: &'ast str,
    /// Location in source.
    pub span: Span,
}

impl<'ast> Token<'ast> {
    /// Create a new token.
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'ast str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }

    /// Whether this is an identifier with exactly this text.
    ///
    /// Used for contextual keywords. Escaped identifiers (`@partial`) never match.
    #[inline]
    pub fn is_contextual(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.lexeme == word
    }

    /// Whether this token can be used where a name is expected.
    #[inline]
    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// All token types of the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals
    // =========================================
    /// Integer literal: `42`, `0xFF`, `0b1010`, `10UL`
    IntegerLiteral,
    /// Real literal: `3.14`, `1e10`, `2.5f`, `1m`
    RealLiteral,
    /// Character literal: `'a'`, `'\n'`
    CharLiteral,
    /// Any string form: regular, verbatim, interpolated or raw.
    StringLiteral,

    /// Identifier, including contextual keywords and `@`-escaped names.
    Identifier,

    // =========================================
    // Keywords - Predefined types
    // =========================================
    Bool,
    Byte,
    SByte,
    Char,
    Decimal,
    Double,
    Float,
    Int,
    UInt,
    Long,
    ULong,
    Short,
    UShort,
    Object,
    String,
    Void,

    // =========================================
    // Keywords - Values
    // =========================================
    True,
    False,
    Null,
    This,
    Base,

    // =========================================
    // Keywords - Declarations
    // =========================================
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    Event,
    Namespace,
    Using,
    Operator,
    Implicit,
    Explicit,

    // =========================================
    // Keywords - Modifiers
    // =========================================
    Public,
    Private,
    Protected,
    Internal,
    Abstract,
    Sealed,
    Static,
    Virtual,
    Override,
    Readonly,
    Const,
    New,
    Extern,
    Unsafe,
    Volatile,
    Ref,
    Out,
    In,
    Params,
    Fixed,

    // =========================================
    // Keywords - Statements and expressions
    // =========================================
    As,
    Break,
    Case,
    Catch,
    Checked,
    Continue,
    Default,
    Do,
    Else,
    Finally,
    For,
    Foreach,
    Goto,
    If,
    Is,
    Lock,
    Return,
    Sizeof,
    Stackalloc,
    Switch,
    Throw,
    Try,
    Typeof,
    Unchecked,
    While,

    // =========================================
    // Punctuation
    // =========================================
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Semicolon,
    Comma,
    Dot,
    Colon,
    /// `::`
    ColonColon,
    Question,
    /// `=>`
    Arrow,
    Equal,
    Less,
    Greater,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Bang,
    Tilde,

    // =========================================
    // Special
    // =========================================
    /// End of file
    Eof,
    /// Lexer error (unrecognized input)
    Error,
}

impl TokenKind {
    /// Check if this token kind is a reserved keyword.
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        !matches!(
            self,
            IntegerLiteral
                | RealLiteral
                | CharLiteral
                | StringLiteral
                | Identifier
                | Eof
                | Error
        ) && !self.is_punctuation()
    }

    /// Check if this token kind is a literal.
    pub fn is_literal(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            IntegerLiteral | RealLiteral | CharLiteral | StringLiteral | True | False | Null
        )
    }

    /// Check if this token kind is a predefined type keyword.
    pub fn is_predefined_type(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Bool | Byte
                | SByte
                | Char
                | Decimal
                | Double
                | Float
                | Int
                | UInt
                | Long
                | ULong
                | Short
                | UShort
                | Object
                | String
                | Void
        )
    }

    /// Check if this token kind is a modifier keyword.
    ///
    /// Contextual modifiers (`partial`, `async`, `required`, `file`, `scoped`)
    /// are identifiers and not covered here.
    pub fn is_modifier(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Public
                | Private
                | Protected
                | Internal
                | Abstract
                | Sealed
                | Static
                | Virtual
                | Override
                | Readonly
                | Const
                | New
                | Extern
                | Unsafe
                | Volatile
                | Fixed
        )
    }

    /// Check if this token kind is punctuation.
    pub fn is_punctuation(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            LeftParen
                | RightParen
                | LeftBracket
                | RightBracket
                | LeftBrace
                | RightBrace
                | Semicolon
                | Comma
                | Dot
                | Colon
                | ColonColon
                | Question
                | Arrow
                | Equal
                | Less
                | Greater
                | Plus
                | Minus
                | Star
                | Slash
                | Percent
                | Amp
                | Pipe
                | Caret
                | Bang
                | Tilde
        )
    }

    /// Get the string representation of this token kind for error messages.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            IntegerLiteral => "integer literal",
            RealLiteral => "real literal",
            CharLiteral => "character literal",
            StringLiteral => "string literal",
            Identifier => "identifier",
            LeftParen => "'('",
            RightParen => "')'",
            LeftBracket => "'['",
            RightBracket => "']'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            Semicolon => "';'",
            Comma => "','",
            Dot => "'.'",
            Colon => "':'",
            ColonColon => "'::'",
            Question => "'?'",
            Arrow => "'=>'",
            Equal => "'='",
            Less => "'<'",
            Greater => "'>'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Percent => "'%'",
            Amp => "'&'",
            Pipe => "'|'",
            Caret => "'^'",
            Bang => "'!'",
            Tilde => "'~'",
            Eof => "end of file",
            Error => "invalid input",
            keyword => keyword_text(keyword).unwrap_or("keyword"),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Table of reserved keywords and their token kinds.
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("abstract", TokenKind::Abstract),
    ("as", TokenKind::As),
    ("base", TokenKind::Base),
    ("bool", TokenKind::Bool),
    ("break", TokenKind::Break),
    ("byte", TokenKind::Byte),
    ("case", TokenKind::Case),
    ("catch", TokenKind::Catch),
    ("char", TokenKind::Char),
    ("checked", TokenKind::Checked),
    ("class", TokenKind::Class),
    ("const", TokenKind::Const),
    ("continue", TokenKind::Continue),
    ("decimal", TokenKind::Decimal),
    ("default", TokenKind::Default),
    ("delegate", TokenKind::Delegate),
    ("do", TokenKind::Do),
    ("double", TokenKind::Double),
    ("else", TokenKind::Else),
    ("enum", TokenKind::Enum),
    ("event", TokenKind::Event),
    ("explicit", TokenKind::Explicit),
    ("extern", TokenKind::Extern),
    ("false", TokenKind::False),
    ("finally", TokenKind::Finally),
    ("fixed", TokenKind::Fixed),
    ("float", TokenKind::Float),
    ("for", TokenKind::For),
    ("foreach", TokenKind::Foreach),
    ("goto", TokenKind::Goto),
    ("if", TokenKind::If),
    ("implicit", TokenKind::Implicit),
    ("in", TokenKind::In),
    ("int", TokenKind::Int),
    ("interface", TokenKind::Interface),
    ("internal", TokenKind::Internal),
    ("is", TokenKind::Is),
    ("lock", TokenKind::Lock),
    ("long", TokenKind::Long),
    ("namespace", TokenKind::Namespace),
    ("new", TokenKind::New),
    ("null", TokenKind::Null),
    ("object", TokenKind::Object),
    ("operator", TokenKind::Operator),
    ("out", TokenKind::Out),
    ("override", TokenKind::Override),
    ("params", TokenKind::Params),
    ("private", TokenKind::Private),
    ("protected", TokenKind::Protected),
    ("public", TokenKind::Public),
    ("readonly", TokenKind::Readonly),
    ("ref", TokenKind::Ref),
    ("return", TokenKind::Return),
    ("sbyte", TokenKind::SByte),
    ("sealed", TokenKind::Sealed),
    ("short", TokenKind::Short),
    ("sizeof", TokenKind::Sizeof),
    ("stackalloc", TokenKind::Stackalloc),
    ("static", TokenKind::Static),
    ("string", TokenKind::String),
    ("struct", TokenKind::Struct),
    ("switch", TokenKind::Switch),
    ("this", TokenKind::This),
    ("throw", TokenKind::Throw),
    ("true", TokenKind::True),
    ("try", TokenKind::Try),
    ("typeof", TokenKind::Typeof),
    ("uint", TokenKind::UInt),
    ("ulong", TokenKind::ULong),
    ("unchecked", TokenKind::Unchecked),
    ("unsafe", TokenKind::Unsafe),
    ("ushort", TokenKind::UShort),
    ("using", TokenKind::Using),
    ("virtual", TokenKind::Virtual),
    ("void", TokenKind::Void),
    ("volatile", TokenKind::Volatile),
    ("while", TokenKind::While),
];

/// Look up a reserved keyword by its text.
///
/// Returns `None` for identifiers, including contextual keywords.
pub fn lookup_keyword(text: &str) -> Option<TokenKind> {
    // Every keyword is lowercase ASCII between 2 and 10 bytes.
    if !(2..=10).contains(&text.len()) || !text.as_bytes()[0].is_ascii_lowercase() {
        return None;
    }
    KEYWORDS
        .binary_search_by(|(word, _)| word.cmp(&text))
        .ok()
        .map(|index| KEYWORDS[index].1)
}

fn keyword_text(kind: TokenKind) -> Option<&'static str> {
    KEYWORDS
        .iter()
        .find(|(_, candidate)| *candidate == kind)
        .map(|(word, _)| *word)
}
