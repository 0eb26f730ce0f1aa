//! Uniform node view and pre-order traversal.
//!
//! [`SyntaxNode`] is a borrowed view of any declaration-level node.
//! [`DescendantNodes`] walks a subtree in document order, parents before
//! children, which is the order syntax receivers are notified in.

use modgen_core::Span;

use crate::ast::decl::*;
use crate::ast::types::TypeSyntax;

/// A reference to one node of a syntax tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyntaxNode<'ast> {
    CompilationUnit(&'ast CompilationUnit<'ast>),
    UsingDirective(&'ast UsingDirective<'ast>),
    Namespace(&'ast NamespaceDecl<'ast>),
    TypeDeclaration(&'ast TypeDecl<'ast>),
    Delegate(&'ast DelegateDecl<'ast>),
    Method(&'ast MethodDecl<'ast>),
    Constructor(&'ast ConstructorDecl<'ast>),
    Field(&'ast FieldDecl<'ast>),
    Property(&'ast PropertyDecl<'ast>),
    Event(&'ast EventDecl<'ast>),
    Accessor(&'ast AccessorDecl<'ast>),
    EnumMember(&'ast EnumMemberDecl<'ast>),
    OtherMember(&'ast OtherMemberDecl<'ast>),
    VariableDeclarator(&'ast VariableDeclarator<'ast>),
    AttributeList(&'ast AttributeList<'ast>),
    Attribute(&'ast Attribute<'ast>),
    AttributeArgument(&'ast AttributeArgument<'ast>),
    Parameter(&'ast Parameter<'ast>),
    TypeParameter(&'ast TypeParameter<'ast>),
    ConstraintClause(&'ast ConstraintClause<'ast>),
    /// A type reference: base type, return type, parameter or member type.
    TypeReference(&'ast TypeSyntax<'ast>),
}

impl<'ast> SyntaxNode<'ast> {
    /// Source location of the node.
    pub fn span(&self) -> Span {
        match self {
            Self::CompilationUnit(n) => n.span,
            Self::UsingDirective(n) => n.span,
            Self::Namespace(n) => n.span,
            Self::TypeDeclaration(n) => n.span,
            Self::Delegate(n) => n.span,
            Self::Method(n) => n.span,
            Self::Constructor(n) => n.span,
            Self::Field(n) => n.span,
            Self::Property(n) => n.span,
            Self::Event(n) => n.span,
            Self::Accessor(n) => n.span,
            Self::EnumMember(n) => n.span,
            Self::OtherMember(n) => n.span,
            Self::VariableDeclarator(n) => n.span,
            Self::AttributeList(n) => n.span,
            Self::Attribute(n) => n.span,
            Self::AttributeArgument(n) => n.span,
            Self::Parameter(n) => n.span,
            Self::TypeParameter(n) => n.span,
            Self::ConstraintClause(n) => n.span,
            Self::TypeReference(n) => n.span,
        }
    }

    /// Short name of the node kind, for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::CompilationUnit(_) => "CompilationUnit",
            Self::UsingDirective(_) => "UsingDirective",
            Self::Namespace(_) => "NamespaceDeclaration",
            Self::TypeDeclaration(_) => "TypeDeclaration",
            Self::Delegate(_) => "DelegateDeclaration",
            Self::Method(_) => "MethodDeclaration",
            Self::Constructor(_) => "ConstructorDeclaration",
            Self::Field(_) => "FieldDeclaration",
            Self::Property(_) => "PropertyDeclaration",
            Self::Event(_) => "EventDeclaration",
            Self::Accessor(_) => "AccessorDeclaration",
            Self::EnumMember(_) => "EnumMemberDeclaration",
            Self::OtherMember(_) => "MemberDeclaration",
            Self::VariableDeclarator(_) => "VariableDeclarator",
            Self::AttributeList(_) => "AttributeList",
            Self::Attribute(_) => "Attribute",
            Self::AttributeArgument(_) => "AttributeArgument",
            Self::Parameter(_) => "Parameter",
            Self::TypeParameter(_) => "TypeParameter",
            Self::ConstraintClause(_) => "TypeParameterConstraintClause",
            Self::TypeReference(_) => "Type",
        }
    }

    /// The type declaration this node is, if any.
    pub fn as_type_declaration(&self) -> Option<&'ast TypeDecl<'ast>> {
        match *self {
            Self::TypeDeclaration(decl) => Some(decl),
            _ => None,
        }
    }

    /// Direct children, in document order.
    pub fn children(&self) -> Vec<SyntaxNode<'ast>> {
        let mut children = Vec::new();
        match *self {
            Self::CompilationUnit(unit) => {
                children.extend(unit.usings.iter().map(Self::UsingDirective));
                children.extend(unit.attribute_lists.iter().map(Self::AttributeList));
                children.extend(unit.members.iter().map(Self::from_namespace_member));
            }
            Self::UsingDirective(_) => {}
            Self::Namespace(namespace) => {
                children.extend(namespace.usings.iter().map(Self::UsingDirective));
                children.extend(namespace.members.iter().map(Self::from_namespace_member));
            }
            Self::TypeDeclaration(decl) => {
                children.extend(decl.attribute_lists.iter().map(Self::AttributeList));
                children.extend(decl.type_params.iter().map(Self::TypeParameter));
                if let Some(params) = decl.parameter_list {
                    children.extend(params.iter().map(Self::Parameter));
                }
                children.extend(decl.base_list.iter().map(Self::TypeReference));
                children.extend(decl.constraints.iter().map(Self::ConstraintClause));
                children.extend(decl.members.iter().map(Self::from_member));
            }
            Self::Delegate(decl) => {
                children.extend(decl.attribute_lists.iter().map(Self::AttributeList));
                children.push(Self::TypeReference(&decl.return_type));
                children.extend(decl.type_params.iter().map(Self::TypeParameter));
                children.extend(decl.params.iter().map(Self::Parameter));
                children.extend(decl.constraints.iter().map(Self::ConstraintClause));
            }
            Self::Method(method) => {
                children.extend(method.attribute_lists.iter().map(Self::AttributeList));
                children.push(Self::TypeReference(&method.return_type));
                children.extend(method.type_params.iter().map(Self::TypeParameter));
                children.extend(method.params.iter().map(Self::Parameter));
                children.extend(method.constraints.iter().map(Self::ConstraintClause));
            }
            Self::Constructor(ctor) => {
                children.extend(ctor.attribute_lists.iter().map(Self::AttributeList));
                children.extend(ctor.params.iter().map(Self::Parameter));
            }
            Self::Field(field) => {
                children.extend(field.attribute_lists.iter().map(Self::AttributeList));
                children.push(Self::TypeReference(&field.ty));
                children.extend(field.variables.iter().map(Self::VariableDeclarator));
            }
            Self::Property(property) => {
                children.extend(property.attribute_lists.iter().map(Self::AttributeList));
                children.push(Self::TypeReference(&property.ty));
                children.extend(property.accessors.iter().map(Self::Accessor));
            }
            Self::Event(event) => {
                children.extend(event.attribute_lists.iter().map(Self::AttributeList));
                children.push(Self::TypeReference(&event.ty));
                children.extend(event.variables.iter().map(Self::VariableDeclarator));
                children.extend(event.accessors.iter().map(Self::Accessor));
            }
            Self::Accessor(accessor) => {
                children.extend(accessor.attribute_lists.iter().map(Self::AttributeList));
            }
            Self::EnumMember(member) => {
                children.extend(member.attribute_lists.iter().map(Self::AttributeList));
            }
            Self::OtherMember(member) => {
                children.extend(member.attribute_lists.iter().map(Self::AttributeList));
                children.extend(member.params.iter().map(Self::Parameter));
            }
            Self::VariableDeclarator(_) => {}
            Self::AttributeList(list) => {
                children.extend(list.attributes.iter().map(Self::Attribute));
            }
            Self::Attribute(attribute) => {
                children.extend(attribute.arguments().iter().map(Self::AttributeArgument));
            }
            Self::AttributeArgument(_) => {}
            Self::Parameter(param) => {
                children.extend(param.attribute_lists.iter().map(Self::AttributeList));
                children.push(Self::TypeReference(&param.ty));
            }
            Self::TypeParameter(param) => {
                children.extend(param.attribute_lists.iter().map(Self::AttributeList));
            }
            Self::ConstraintClause(_) | Self::TypeReference(_) => {}
        }
        children
    }

    /// This node and everything below it, in document order.
    pub fn descendants_and_self(self) -> DescendantNodes<'ast> {
        DescendantNodes { stack: vec![self] }
    }

    fn from_namespace_member(member: &'ast NamespaceMember<'ast>) -> Self {
        match member {
            NamespaceMember::Namespace(decl) => Self::Namespace(decl),
            NamespaceMember::Type(decl) => Self::TypeDeclaration(decl),
            NamespaceMember::Delegate(decl) => Self::Delegate(decl),
        }
    }

    fn from_member(member: &'ast MemberDecl<'ast>) -> Self {
        match member {
            MemberDecl::Method(decl) => Self::Method(decl),
            MemberDecl::Constructor(decl) => Self::Constructor(decl),
            MemberDecl::Field(decl) => Self::Field(decl),
            MemberDecl::Property(decl) => Self::Property(decl),
            MemberDecl::Event(decl) => Self::Event(decl),
            MemberDecl::EnumMember(decl) => Self::EnumMember(decl),
            MemberDecl::Type(decl) => Self::TypeDeclaration(decl),
            MemberDecl::Delegate(decl) => Self::Delegate(decl),
            MemberDecl::Other(decl) => Self::OtherMember(decl),
        }
    }
}

/// Pre-order iterator over a subtree.
pub struct DescendantNodes<'ast> {
    stack: Vec<SyntaxNode<'ast>>,
}

impl<'ast> Iterator for DescendantNodes<'ast> {
    type Item = SyntaxNode<'ast>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}
