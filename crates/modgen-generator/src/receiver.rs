//! Candidate collection.

use modgen_compiler::SyntaxReceiver;
use modgen_core::TypeKind;
use modgen_parser::SyntaxNode;
use modgen_parser::ast::TypeDecl;
use tracing::trace;

use crate::options::CandidatePolicy;

/// Collects class declarations while the driver walks the syntax trees.
///
/// Every class is a candidate; names, modifiers and attributes are checked
/// later against the compilation.
#[derive(Debug, Clone, Default)]
pub struct ModuleSyntaxReceiver<'ast> {
    policy: CandidatePolicy,
    candidates: Vec<&'ast TypeDecl<'ast>>,
}

impl<'ast> ModuleSyntaxReceiver<'ast> {
    pub fn new(policy: CandidatePolicy) -> Self {
        Self {
            policy,
            candidates: Vec::new(),
        }
    }

    /// Candidates in scan order.
    pub fn candidates(&self) -> &[&'ast TypeDecl<'ast>] {
        &self.candidates
    }

    /// The candidates selected by `policy`.
    ///
    /// The policy may be stricter than the one the receiver collected with,
    /// when the compilation's options override it.
    pub fn into_candidates(mut self, policy: CandidatePolicy) -> Vec<&'ast TypeDecl<'ast>> {
        if policy == CandidatePolicy::LastScanned && self.candidates.len() > 1 {
            self.candidates.drain(..self.candidates.len() - 1);
        }
        self.candidates
    }
}

impl<'ast> SyntaxReceiver<'ast> for ModuleSyntaxReceiver<'ast> {
    fn on_visit_syntax_node(&mut self, node: SyntaxNode<'ast>) {
        let Some(decl) = node.as_type_declaration() else {
            return;
        };
        if decl.kind != TypeKind::Class {
            return;
        }
        if self.candidates.iter().any(|seen| std::ptr::eq(*seen, decl)) {
            return;
        }

        trace!(name = decl.name.name, span = ?decl.span, "class candidate");
        if self.policy == CandidatePolicy::LastScanned {
            self.candidates.clear();
        }
        self.candidates.push(decl);
    }
}
