//! Registration source rendering.
//!
//! A module renders as a partial fragment of its own declaration that
//! overrides the registration hook:
//!
//! ```text
//! public partial class Echo
//! {
//!     protected override IEnumerable<CommandInfo> AutoRegister()
//!     {
//!         return new CommandInfo[]
//!         {
//!             new CommandInfoBuilder()
//!             {
//!                 Name = "echo",
//!                 ParameterTypes = new Type[]
//!                 {
//!                     typeof(string),
//!                 },
//!             }.Build(),
//!         };
//!     }
//! }
//! ```

use modgen_parser::ast::TypeDecl;

use crate::extract::CommandMethodDescriptor;
use crate::options::ModuleGeneratorOptions;
use crate::writer::IndentedWriter;

/// Render the registration fragment for `decl`.
///
/// With `namespace`, the fragment is wrapped in a block namespace of that
/// name.
pub fn render_module(
    decl: &TypeDecl<'_>,
    commands: &[CommandMethodDescriptor<'_>],
    options: &ModuleGeneratorOptions,
    namespace: Option<&str>,
) -> String {
    let mut writer = IndentedWriter::new(options.indent.as_str());
    match namespace {
        Some(namespace) => {
            writer.write_line(&format!("namespace {namespace}"));
            writer.write_wrapped_indented("{", "}", |w| write_type(w, decl, commands, options));
        }
        None => write_type(&mut writer, decl, commands, options),
    }
    writer.finish()
}

/// `<modifiers> <keyword> <identifier><type parameters>`.
pub fn type_header(decl: &TypeDecl<'_>) -> String {
    let mut header = String::new();
    if !decl.modifiers.is_empty() {
        header.push_str(&decl.modifiers.to_string());
        header.push(' ');
    }
    header.push_str(decl.kind.keyword());
    header.push(' ');
    header.push_str(decl.name.name);
    if !decl.type_params.is_empty() {
        let params: Vec<&str> = decl.type_params.iter().map(|param| param.name.name).collect();
        header.push('<');
        header.push_str(&params.join(", "));
        header.push('>');
    }
    header
}

fn write_type(
    w: &mut IndentedWriter,
    decl: &TypeDecl<'_>,
    commands: &[CommandMethodDescriptor<'_>],
    options: &ModuleGeneratorOptions,
) {
    w.write_line(&type_header(decl));
    w.write_wrapped_indented("{", "}", |w| {
        w.write_line(&format!("protected override {}", options.hook_signature));
        w.write_wrapped_indented("{", "}", |w| {
            w.write_line(&format!("return new {}[]", options.collection_type));
            w.write_wrapped_indented("{", "};", |w| {
                for command in commands {
                    write_registration(w, command, options);
                }
            });
        });
    });
}

fn write_registration(w: &mut IndentedWriter, command: &CommandMethodDescriptor<'_>, options: &ModuleGeneratorOptions) {
    w.write_line(&format!("new {}()", options.builder_type));
    w.write_wrapped_indented("{", "}.Build(),", |w| {
        if let Some(name) = command.name {
            w.write_line(&format!("Name = {name},"));
        }
        if !command.parameter_types.is_empty() {
            w.write_line("ParameterTypes = new Type[]");
            w.write_wrapped_indented("{", "},", |w| {
                for ty in &command.parameter_types {
                    w.write_line(&format!("typeof({ty}),"));
                }
            });
        }
    });
}
