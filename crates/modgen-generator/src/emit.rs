//! Adding rendered sources to the execution context.

use modgen_compiler::GeneratorExecutionContext;
use modgen_core::SourceText;
use tracing::{info, warn};

/// Hint name for the source generated for `identifier`.
pub fn hint_name(identifier: &str, file_suffix: &str) -> String {
    format!("{identifier}{file_suffix}.cs")
}

/// Add `text` under `hint_name`.
///
/// Empty text is not added. A rejected hint name is logged and the source
/// dropped.
pub fn emit_source(context: &mut GeneratorExecutionContext<'_, '_>, hint_name: &str, text: String) {
    if text.is_empty() {
        return;
    }

    let bytes = text.len();
    match context.add_source(hint_name, SourceText::from_utf8(text)) {
        Ok(()) => info!(hint_name, bytes, "generated module registration"),
        Err(error) => warn!(hint_name, %error, "generated source rejected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_names_use_the_suffix() {
        assert_eq!(hint_name("TestModule", ".Generated"), "TestModule.Generated.cs");
        assert_eq!(hint_name("Echo", ""), "Echo.cs");
    }
}
