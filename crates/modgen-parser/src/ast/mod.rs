//! Syntax trees for C#-shaped program units.
//!
//! This module provides:
//! - declaration and type node definitions
//! - the parser that builds them into an arena
//! - [`SyntaxNode`] and pre-order traversal
//! - [`SyntaxTree`], a parsed file with its path, text, tokens and errors
//!
//! # Example
//!
//! ```
//! use modgen_parser::SyntaxTree;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let tree = SyntaxTree::parse(&arena, "Echo.cs", "public class Echo : ModuleBase { }");
//!
//! let names: Vec<_> = tree.type_declarations().map(|decl| decl.name.name).collect();
//! assert_eq!(names, ["Echo"]);
//! ```

mod parser;
mod type_parser;
pub mod types;

mod expr_parser;

pub mod decl;
mod decl_parser;

mod equivalence;
pub mod visitor;

// Re-export error types from core
pub use modgen_core::{ParseError, ParseErrorKind, ParseErrors};

pub use decl::*;
pub use parser::{ParseOutput, Parser};
pub use types::*;
pub use visitor::{DescendantNodes, SyntaxNode};

use bumpalo::Bump;
use modgen_core::Diagnostic;

use crate::lexer::Token;

/// A parsed program unit.
///
/// Everything borrows from the arena the tree was parsed into, so trees are
/// cheap to clone and share between compilations built from the same arena.
#[derive(Debug, Clone)]
pub struct SyntaxTree<'ast> {
    path: &'ast str,
    text: &'ast str,
    root: &'ast CompilationUnit<'ast>,
    tokens: &'ast [Token<'ast>],
    errors: ParseErrors,
}

impl<'ast> SyntaxTree<'ast> {
    /// Parse `text` as the file at `path`.
    ///
    /// Always produces a tree. Syntax errors are available from [`errors`](Self::errors).
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse(arena: &'ast Bump, path: &str, text: &str) -> Self {
        let path = arena.alloc_str(path);
        let text = arena.alloc_str(text);
        let output = Parser::new(text, arena).finish();
        Self {
            path,
            text,
            root: output.root,
            tokens: output.tokens,
            errors: output.errors,
        }
    }

    pub fn path(&self) -> &'ast str {
        self.path
    }

    pub fn text(&self) -> &'ast str {
        self.text
    }

    pub fn root(&self) -> &'ast CompilationUnit<'ast> {
        self.root
    }

    /// Significant tokens, ending with EOF.
    pub fn tokens(&self) -> &'ast [Token<'ast>] {
        self.tokens
    }

    pub fn errors(&self) -> &ParseErrors {
        &self.errors
    }

    /// Every node of the tree in document order, starting with the root.
    pub fn descendant_nodes(&self) -> DescendantNodes<'ast> {
        SyntaxNode::CompilationUnit(self.root).descendants_and_self()
    }

    /// Every type declaration, nested ones included, in document order.
    pub fn type_declarations(&self) -> impl Iterator<Item = &'ast TypeDecl<'ast>> + use<'ast> {
        self.descendant_nodes()
            .filter_map(|node| node.as_type_declaration())
    }

    /// Whether both trees were parsed from the same tokens.
    pub fn is_equivalent_to(&self, other: &SyntaxTree<'_>) -> bool {
        equivalence::tokens_equivalent(self.tokens, other.tokens)
    }

    /// The first token at which this tree differs from `other`, if any.
    pub fn first_difference<'a>(&self, other: &SyntaxTree<'a>) -> Option<(Token<'ast>, Token<'a>)> {
        let index = equivalence::first_difference(self.tokens, other.tokens)?;
        let left = index.min(self.tokens.len().saturating_sub(1));
        let right = index.min(other.tokens.len().saturating_sub(1));
        Some((self.tokens[left], other.tokens[right]))
    }

    /// Parse errors as error diagnostics located in this file.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors
            .iter()
            .map(|error| Diagnostic::from_parse_error(self.path, error))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modgen_core::{Accessibility, Modifiers, TypeKind};

    fn single_type<'ast>(tree: &SyntaxTree<'ast>) -> &'ast TypeDecl<'ast> {
        let types: Vec<_> = tree.type_declarations().collect();
        assert_eq!(types.len(), 1, "expected one type declaration");
        types[0]
    }

    #[test]
    fn parse_module_with_command() {
        let arena = Bump::new();
        let tree = SyntaxTree::parse(
            &arena,
            "Test0.cs",
            r#"
            using Demo.Runtime;

            namespace Demo.Commands
            {
                public class TestModule : ModuleBase
                {
                    [Command("echo")]
                    public void Echo(string text) { }
                }
            }
            "#,
        );
        assert!(tree.errors().is_empty(), "{}", tree.errors());
        assert_eq!(tree.root().usings.len(), 1);
        assert_eq!(tree.root().usings[0].name.text, "Demo.Runtime");

        let module = single_type(&tree);
        assert_eq!(module.kind, TypeKind::Class);
        assert_eq!(module.name.name, "TestModule");
        assert_eq!(module.modifiers.flags.accessibility(), Some(Accessibility::Public));
        assert_eq!(module.base_list.len(), 1);
        assert_eq!(module.base_list[0].text, "ModuleBase");

        let methods: Vec<_> = module.methods().collect();
        assert_eq!(methods.len(), 1);
        let echo = methods[0];
        assert_eq!(echo.name.name, "Echo");
        assert_eq!(echo.params.len(), 1);
        assert_eq!(echo.params[0].ty.text, "string");
        assert_eq!(echo.params[0].name.name, "text");

        let attribute = echo.attributes().next().unwrap();
        assert_eq!(attribute.name.text, "Command");
        assert_eq!(attribute.arguments().len(), 1);
        assert_eq!(
            attribute.arguments()[0].expression.map(|e| e.text),
            Some("\"echo\"")
        );
    }

    #[test]
    fn parse_file_scoped_namespace() {
        let arena = Bump::new();
        let tree = SyntaxTree::parse(
            &arena,
            "A.cs",
            "namespace Demo.Commands;\nusing System;\npublic sealed partial class A { }\n",
        );
        assert!(tree.errors().is_empty(), "{}", tree.errors());
        match &tree.root().members[0] {
            NamespaceMember::Namespace(ns) => {
                assert!(ns.is_file_scoped);
                assert_eq!(ns.name.text, "Demo.Commands");
                assert_eq!(ns.usings.len(), 1);
                assert_eq!(ns.members.len(), 1);
            }
            other => panic!("expected namespace, got {other:?}"),
        }
        let decl = single_type(&tree);
        assert!(decl.modifiers.contains(Modifiers::SEALED | Modifiers::PARTIAL));
        assert_eq!(decl.modifiers.to_string(), "public sealed partial");
    }

    #[test]
    fn parse_members_of_every_kind() {
        let arena = Bump::new();
        let tree = SyntaxTree::parse(
            &arena,
            "Members.cs",
            r#"
            abstract class Members<T> : Base<T>, IDisposable where T : class, new()
            {
                private readonly int _count = 0, _other;
                public string Name { get; init; } = "x";
                public int Count => _count;
                public event EventHandler Changed;
                public Members(int count) : base(count) { }
                ~Members() { }
                public int this[int index] => index;
                public static Members<T> operator +(Members<T> a, Members<T> b) => a;
                public static implicit operator int(Members<T> m) => 0;
                void IDisposable.Dispose() { }
                public abstract Task<int> RunAsync<TArg>(TArg arg, CancellationToken token = default);
                public delegate void Callback(int code);
                private enum State { Idle, Busy = 2 }
            }
            "#,
        );
        assert!(tree.errors().is_empty(), "{}", tree.errors());

        let decl = tree.type_declarations().next().unwrap();
        assert_eq!(decl.arity(), 1);
        assert_eq!(decl.metadata_name(), "Members`1");
        assert_eq!(decl.constraints.len(), 1);
        assert_eq!(decl.base_list.len(), 2);

        let kinds: Vec<_> = decl
            .members
            .iter()
            .map(|member| match member {
                MemberDecl::Field(_) => "field",
                MemberDecl::Property(_) => "property",
                MemberDecl::Event(_) => "event",
                MemberDecl::Constructor(_) => "constructor",
                MemberDecl::Method(_) => "method",
                MemberDecl::Delegate(_) => "delegate",
                MemberDecl::Type(_) => "type",
                MemberDecl::EnumMember(_) => "enum member",
                MemberDecl::Other(other) => match other.kind {
                    OtherMemberKind::Destructor => "destructor",
                    OtherMemberKind::Indexer => "indexer",
                    OtherMemberKind::Operator => "operator",
                    OtherMemberKind::ConversionOperator => "conversion",
                },
            })
            .collect();
        assert_eq!(
            kinds,
            [
                "field",
                "property",
                "property",
                "event",
                "constructor",
                "destructor",
                "indexer",
                "operator",
                "conversion",
                "method",
                "method",
                "delegate",
                "type",
            ]
        );

        let methods: Vec<_> = decl.methods().collect();
        assert_eq!(
            methods[0].explicit_interface.map(|name| name.text),
            Some("IDisposable")
        );
        assert_eq!(methods[1].return_type.text, "Task<int>");
        assert_eq!(methods[1].params[1].default.map(|e| e.text), Some("default"));
        assert!(methods[1].body.is_none());

        let nested: Vec<_> = decl.nested_types().collect();
        assert_eq!(nested[0].kind, TypeKind::Enum);
        assert_eq!(nested[0].members.len(), 2);
    }

    #[test]
    fn parse_records() {
        let arena = Bump::new();
        let tree = SyntaxTree::parse(
            &arena,
            "Records.cs",
            "public record Point(int X, int Y);\npublic record struct Size(int W) : IShape;",
        );
        assert!(tree.errors().is_empty(), "{}", tree.errors());
        let kinds: Vec<_> = tree.type_declarations().map(|decl| decl.kind).collect();
        assert_eq!(kinds, [TypeKind::Record, TypeKind::RecordStruct]);
        let point = tree.type_declarations().next().unwrap();
        assert_eq!(point.parameter_list.map(|p| p.len()), Some(2));
    }

    #[test]
    fn attribute_arguments_named_and_empty() {
        let arena = Bump::new();
        let tree = SyntaxTree::parse(
            &arena,
            "Attrs.cs",
            r#"
            class A
            {
                [Command] void One() { }
                [Command()] void Two() { }
                [Command(Name = "three"), Obsolete] void Three() { }
            }
            "#,
        );
        assert!(tree.errors().is_empty(), "{}", tree.errors());
        let decl = single_type(&tree);
        let methods: Vec<_> = decl.methods().collect();

        let one = methods[0].attributes().next().unwrap();
        assert!(one.argument_list.is_none());

        let two = methods[1].attributes().next().unwrap();
        assert!(two.argument_list.is_some());
        assert!(two.arguments().is_empty());

        let three: Vec<_> = methods[2].attributes().collect();
        assert_eq!(three.len(), 2);
        let argument = three[0].arguments()[0];
        assert_eq!(argument.name_equals.map(|n| n.name), Some("Name"));
        assert_eq!(argument.expression.map(|e| e.text), Some("\"three\""));
    }

    #[test]
    fn recovers_after_bad_member() {
        let arena = Bump::new();
        let tree = SyntaxTree::parse(
            &arena,
            "Broken.cs",
            r#"
            class A
            {
                int = 4;
                void Ok() { }
            }
            class B { }
            "#,
        );
        assert!(!tree.errors().is_empty());
        let names: Vec<_> = tree.type_declarations().map(|d| d.name.name).collect();
        assert_eq!(names, ["A", "B"]);
        let a = tree.type_declarations().next().unwrap();
        assert_eq!(a.methods().map(|m| m.name.name).collect::<Vec<_>>(), ["Ok"]);

        let diagnostics = tree.diagnostics();
        assert_eq!(diagnostics.len(), tree.errors().len());
        assert!(diagnostics[0].id.starts_with("MG1"));
        assert_eq!(
            diagnostics[0].location.as_ref().map(|l| l.path.as_str()),
            Some("Broken.cs")
        );
    }

    #[test]
    fn missing_closing_brace_is_reported() {
        let arena = Bump::new();
        let tree = SyntaxTree::parse(&arena, "Open.cs", "class A { void Run() { }");
        assert_eq!(tree.errors().len(), 1);
        assert_eq!(single_type(&tree).methods().count(), 1);
    }

    #[test]
    fn equivalence_ignores_trivia() {
        let arena = Bump::new();
        let a = SyntaxTree::parse(&arena, "a.cs", "class A { int x; }");
        let b = SyntaxTree::parse(&arena, "b.cs", "class A\n{\n    // count\n    int x;\n}\n");
        let c = SyntaxTree::parse(&arena, "c.cs", "class A { long x; }");
        assert!(a.is_equivalent_to(&b));
        assert!(a.first_difference(&b).is_none());
        assert!(!a.is_equivalent_to(&c));
        let (left, right) = a.first_difference(&c).unwrap();
        assert_eq!((left.lexeme, right.lexeme), ("int", "long"));
    }
}
