//! Symbol passes, run when a compilation is built.
//!
//! - [`declaration`]: Pass 1 - declare the types of every tree
//! - [`inheritance`]: Pass 2 - bind base lists once every type is declared

pub mod declaration;
pub mod inheritance;

pub use declaration::{DeclarationOutput, DeclarationPass, PendingBases};
pub use inheritance::{InheritanceOutput, InheritancePass};
