//! Declarations of the runtime that generated code targets.
//!
//! Module classes derive from `ModuleBase` and mark their commands with
//! `[Command]`. Generated fragments override `ModuleBase.AutoRegister` and
//! build `CommandInfo` values with `CommandInfoBuilder`.
//!
//! Add [`reference`] to a compilation so these names resolve.

use bumpalo::Bump;
use modgen_compiler::MetadataReference;

/// Namespace the runtime types are declared in.
pub const NAMESPACE: &str = "Modgen.Runtime";

pub const COMMAND_ATTRIBUTE_SOURCE: &str = r#"using System;

namespace Modgen.Runtime
{
    [AttributeUsage(AttributeTargets.Method, AllowMultiple = false, Inherited = true)]
    public sealed class CommandAttribute : Attribute
    {
        public string? Name { get; }

        public CommandAttribute()
        {
        }

        public CommandAttribute(string name)
        {
            Name = name;
        }
    }
}
"#;

pub const MODULE_BASE_SOURCE: &str = r#"using System;
using System.Collections.Generic;

namespace Modgen.Runtime
{
    public abstract class ModuleBase
    {
        protected internal virtual IEnumerable<CommandInfo> AutoRegister() => Array.Empty<CommandInfo>();
    }

    public sealed class CommandInfo
    {
    }

    public sealed class CommandInfoBuilder
    {
        public string? Name { get; set; }

        public IEnumerable<Type> ParameterTypes { get; set; } = Array.Empty<Type>();

        public CommandInfo Build() => new CommandInfo();
    }
}
"#;

/// `(path, text)` of every runtime source.
pub fn sources() -> [(&'static str, &'static str); 2] {
    [
        ("CommandAttribute.cs", COMMAND_ATTRIBUTE_SOURCE),
        ("ModuleBase.cs", MODULE_BASE_SOURCE),
    ]
}

/// The runtime as a metadata reference.
pub fn reference(arena: &Bump) -> MetadataReference<'_> {
    MetadataReference::from_sources(arena, NAMESPACE, sources())
}
