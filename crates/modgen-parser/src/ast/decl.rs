//! Declaration nodes.
//!
//! Provides nodes for:
//! - the compilation unit and `using` directives
//! - namespaces (block and file-scoped)
//! - type declarations (`class`, `struct`, `interface`, `record`, `enum`) and delegates
//! - members: methods, constructors, fields, properties, events, enum members
//! - attributes and parameters
//!
//! Member bodies are kept as spans (blocks) or opaque expressions; statements
//! are not modelled.

use modgen_core::{Modifiers, Span, TypeKind};
use std::fmt;

use crate::ast::types::{ExprSyntax, Ident, Name, TypeSyntax};

/// The root of a syntax tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompilationUnit<'ast> {
    pub usings: &'ast [UsingDirective<'ast>],
    /// `[assembly: ...]` and `[module: ...]` lists.
    pub attribute_lists: &'ast [AttributeList<'ast>],
    pub members: &'ast [NamespaceMember<'ast>],
    pub span: Span,
}

/// A `using` directive.
///
/// Examples:
/// - `using System;`
/// - `global using System.Linq;`
/// - `using static System.Math;`
/// - `using Alias = Demo.Commands;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsingDirective<'ast> {
    pub is_global: bool,
    pub is_static: bool,
    pub alias: Option<Ident<'ast>>,
    pub name: Name<'ast>,
    pub span: Span,
}

/// A member of a compilation unit or namespace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NamespaceMember<'ast> {
    Namespace(NamespaceDecl<'ast>),
    Type(TypeDecl<'ast>),
    Delegate(DelegateDecl<'ast>),
}

impl NamespaceMember<'_> {
    pub fn span(&self) -> Span {
        match self {
            Self::Namespace(d) => d.span,
            Self::Type(d) => d.span,
            Self::Delegate(d) => d.span,
        }
    }
}

/// A namespace declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamespaceDecl<'ast> {
    pub name: Name<'ast>,
    /// `namespace Demo;` rather than `namespace Demo { ... }`.
    pub is_file_scoped: bool,
    pub usings: &'ast [UsingDirective<'ast>],
    pub members: &'ast [NamespaceMember<'ast>],
    pub span: Span,
}

/// Modifiers of a declaration, as flags and as the tokens written.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModifierList<'ast> {
    pub flags: Modifiers,
    /// Modifier keywords in source order.
    pub tokens: &'ast [Ident<'ast>],
}

impl ModifierList<'_> {
    pub fn contains(&self, flags: Modifiers) -> bool {
        self.flags.contains(flags)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Modifier keywords separated by single spaces, in source order.
impl fmt::Display for ModifierList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(token.name)?;
        }
        Ok(())
    }
}

/// A generic type or method parameter: `T`, `in T`, `out TResult`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeParameter<'ast> {
    pub attribute_lists: &'ast [AttributeList<'ast>],
    /// `in` or `out` for variant interface parameters.
    pub variance: Option<Ident<'ast>>,
    pub name: Ident<'ast>,
    pub span: Span,
}

/// A `where T : ...` clause. Constraints are kept as text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintClause<'ast> {
    pub parameter: Ident<'ast>,
    pub constraints: &'ast str,
    pub span: Span,
}

/// A type declaration.
///
/// Example:
/// ```cs
/// [Description("echo")]
/// public partial class EchoModule : ModuleBase
/// {
///     [Command("echo")]
///     public void Echo(string text) { }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeDecl<'ast> {
    pub attribute_lists: &'ast [AttributeList<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub kind: TypeKind,
    pub name: Ident<'ast>,
    pub type_params: &'ast [TypeParameter<'ast>],
    /// Primary constructor parameters of records and classes.
    pub parameter_list: Option<&'ast [Parameter<'ast>]>,
    /// Base class and interfaces, in written order.
    pub base_list: &'ast [TypeSyntax<'ast>],
    pub constraints: &'ast [ConstraintClause<'ast>],
    pub members: &'ast [MemberDecl<'ast>],
    pub span: Span,
}

impl<'ast> TypeDecl<'ast> {
    /// Number of type parameters.
    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    /// Name as used in metadata: `Repository` or ``Repository`1``.
    pub fn metadata_name(&self) -> String {
        match self.arity() {
            0 => self.name.value_text().to_string(),
            n => format!("{}`{}", self.name.value_text(), n),
        }
    }

    /// Methods declared directly in this type, in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &'ast MethodDecl<'ast>> + use<'ast> {
        let members = self.members;
        members.iter().filter_map(|member| match member {
            MemberDecl::Method(method) => Some(method),
            _ => None,
        })
    }

    /// Types nested directly in this type.
    pub fn nested_types(&self) -> impl Iterator<Item = &'ast TypeDecl<'ast>> + use<'ast> {
        let members = self.members;
        members.iter().filter_map(|member| match member {
            MemberDecl::Type(ty) => Some(ty),
            _ => None,
        })
    }
}

/// A delegate declaration: `public delegate void Handler(string text);`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelegateDecl<'ast> {
    pub attribute_lists: &'ast [AttributeList<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub return_type: TypeSyntax<'ast>,
    pub name: Ident<'ast>,
    pub type_params: &'ast [TypeParameter<'ast>],
    pub params: &'ast [Parameter<'ast>],
    pub constraints: &'ast [ConstraintClause<'ast>],
    pub span: Span,
}

/// A member of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MemberDecl<'ast> {
    Method(MethodDecl<'ast>),
    Constructor(ConstructorDecl<'ast>),
    Field(FieldDecl<'ast>),
    Property(PropertyDecl<'ast>),
    Event(EventDecl<'ast>),
    EnumMember(EnumMemberDecl<'ast>),
    /// A nested type.
    Type(TypeDecl<'ast>),
    Delegate(DelegateDecl<'ast>),
    /// Destructors, indexers and operators.
    Other(OtherMemberDecl<'ast>),
}

impl MemberDecl<'_> {
    pub fn span(&self) -> Span {
        match self {
            Self::Method(d) => d.span,
            Self::Constructor(d) => d.span,
            Self::Field(d) => d.span,
            Self::Property(d) => d.span,
            Self::Event(d) => d.span,
            Self::EnumMember(d) => d.span,
            Self::Type(d) => d.span,
            Self::Delegate(d) => d.span,
            Self::Other(d) => d.span,
        }
    }
}

/// The body of a method-like member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Body<'ast> {
    /// `{ ... }`, kept as the span of the braces.
    Block(Span),
    /// `=> expr;`
    Expression(ExprSyntax<'ast>),
    /// Abstract, extern, interface and partial declarations: `;`
    None,
}

impl Body<'_> {
    pub fn is_none(&self) -> bool {
        matches!(self, Body::None)
    }
}

/// A method declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodDecl<'ast> {
    pub attribute_lists: &'ast [AttributeList<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub return_type: TypeSyntax<'ast>,
    /// `IDisposable` in `void IDisposable.Dispose()`.
    pub explicit_interface: Option<Name<'ast>>,
    pub name: Ident<'ast>,
    pub type_params: &'ast [TypeParameter<'ast>],
    pub params: &'ast [Parameter<'ast>],
    pub constraints: &'ast [ConstraintClause<'ast>],
    pub body: Body<'ast>,
    pub span: Span,
}

impl<'ast> MethodDecl<'ast> {
    /// Attributes from every attribute list, in source order.
    pub fn attributes(&self) -> impl Iterator<Item = &'ast Attribute<'ast>> + use<'ast> {
        let lists = self.attribute_lists;
        lists.iter().flat_map(|list| list.attributes.iter())
    }
}

/// A constructor declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstructorDecl<'ast> {
    pub attribute_lists: &'ast [AttributeList<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub name: Ident<'ast>,
    pub params: &'ast [Parameter<'ast>],
    /// `base(...)` or `this(...)` after the colon.
    pub initializer: Option<ExprSyntax<'ast>>,
    pub body: Body<'ast>,
    pub span: Span,
}

/// `name` or `name = value` in a field or event declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableDeclarator<'ast> {
    pub name: Ident<'ast>,
    pub initializer: Option<ExprSyntax<'ast>>,
    pub span: Span,
}

/// A field declaration, possibly declaring several variables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDecl<'ast> {
    pub attribute_lists: &'ast [AttributeList<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub ty: TypeSyntax<'ast>,
    pub variables: &'ast [VariableDeclarator<'ast>],
    pub span: Span,
}

/// An accessor: `get;`, `private set { ... }`, `init => x = value;`, `add { }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccessorDecl<'ast> {
    pub attribute_lists: &'ast [AttributeList<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub keyword: Ident<'ast>,
    pub body: Body<'ast>,
    pub span: Span,
}

/// A property declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyDecl<'ast> {
    pub attribute_lists: &'ast [AttributeList<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub ty: TypeSyntax<'ast>,
    pub explicit_interface: Option<Name<'ast>>,
    pub name: Ident<'ast>,
    pub accessors: &'ast [AccessorDecl<'ast>],
    /// `int Count => items.Count;`
    pub expression_body: Option<ExprSyntax<'ast>>,
    /// `string Name { get; set; } = "";`
    pub initializer: Option<ExprSyntax<'ast>>,
    pub span: Span,
}

/// An event declaration, field-like or with `add`/`remove` accessors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventDecl<'ast> {
    pub attribute_lists: &'ast [AttributeList<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub ty: TypeSyntax<'ast>,
    pub variables: &'ast [VariableDeclarator<'ast>],
    pub accessors: &'ast [AccessorDecl<'ast>],
    pub span: Span,
}

/// An enum member: `Ready`, `Done = 4`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnumMemberDecl<'ast> {
    pub attribute_lists: &'ast [AttributeList<'ast>],
    pub name: Ident<'ast>,
    pub value: Option<ExprSyntax<'ast>>,
    pub span: Span,
}

/// Kinds of members the generators never inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtherMemberKind {
    Destructor,
    Indexer,
    Operator,
    ConversionOperator,
}

/// A destructor, indexer, operator or conversion operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OtherMemberDecl<'ast> {
    pub kind: OtherMemberKind,
    pub attribute_lists: &'ast [AttributeList<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub params: &'ast [Parameter<'ast>],
    pub span: Span,
}

/// A method, constructor, delegate or indexer parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameter<'ast> {
    pub attribute_lists: &'ast [AttributeList<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub ty: TypeSyntax<'ast>,
    pub name: Ident<'ast>,
    pub default: Option<ExprSyntax<'ast>>,
    pub span: Span,
}

/// A bracketed attribute list: `[Command("echo"), Obsolete]`, `[return: NotNull]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeList<'ast> {
    /// `assembly`, `return`, ... before the colon.
    pub target: Option<Ident<'ast>>,
    pub attributes: &'ast [Attribute<'ast>],
    pub span: Span,
}

/// One attribute application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attribute<'ast> {
    /// The name as written: `Command`, `CommandAttribute`, `Demo.Command`.
    pub name: Name<'ast>,
    pub argument_list: Option<AttributeArgumentList<'ast>>,
    pub span: Span,
}

impl<'ast> Attribute<'ast> {
    /// Arguments in written order; empty when there is no argument list.
    pub fn arguments(&self) -> &'ast [AttributeArgument<'ast>] {
        self.argument_list.map(|list| list.arguments).unwrap_or(&[])
    }
}

/// The parenthesized arguments of an attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeArgumentList<'ast> {
    pub arguments: &'ast [AttributeArgument<'ast>],
    pub span: Span,
}

/// One attribute argument: positional, `Name = value` or `name: value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeArgument<'ast> {
    pub name_equals: Option<Ident<'ast>>,
    pub name_colon: Option<Ident<'ast>>,
    /// `None` when no expression could be parsed.
    pub expression: Option<ExprSyntax<'ast>>,
    pub span: Span,
}
