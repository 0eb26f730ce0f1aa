//! Command method extraction.

use modgen_parser::ast::{MethodDecl, TypeDecl};

/// A method marked as a command, with what the registration needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMethodDescriptor<'ast> {
    pub method: &'ast str,
    /// First marker argument, verbatim: `"echo"`, `Names.Echo`.
    pub name: Option<&'ast str>,
    /// Declared parameter types, verbatim and in order.
    pub parameter_types: Vec<&'ast str>,
}

impl<'ast> CommandMethodDescriptor<'ast> {
    pub fn new(method: &'ast str, name: Option<&'ast str>, parameter_types: Vec<&'ast str>) -> Self {
        Self {
            method,
            name,
            parameter_types,
        }
    }

    /// Describe `method` when it carries an attribute written as `marker`.
    pub fn from_method(method: &'ast MethodDecl<'ast>, marker: &str) -> Option<Self> {
        let attribute = method
            .attributes()
            .find(|attribute| attribute.name.text == marker)?;

        let name = attribute
            .arguments()
            .first()
            .and_then(|argument| argument.expression)
            .map(|expression| expression.text);
        let parameter_types = method.params.iter().map(|param| param.ty.text).collect();

        Some(Self::new(method.name.name, name, parameter_types))
    }
}

/// Command methods declared in `decl`, in declaration order.
///
/// Only this declaration is searched; other partial parts of the type are
/// not.
pub fn extract_commands<'ast>(decl: &'ast TypeDecl<'ast>, marker: &str) -> Vec<CommandMethodDescriptor<'ast>> {
    decl.methods()
        .filter_map(|method| CommandMethodDescriptor::from_method(method, marker))
        .collect()
}
