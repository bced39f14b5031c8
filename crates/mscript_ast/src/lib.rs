//! mscript_ast: Syntax tree definitions for the mscript front end.
//!
//! This crate defines the token vocabulary (token kinds, keywords,
//! operators), the node model stored in an index arena, a visitor for
//! walking finished trees and a printer producing a stable textual dump.

pub mod node;
pub mod printer;
pub mod syntax_kind;
pub mod types;
pub mod visitor;

// Re-export key types
pub use node::*;
pub use syntax_kind::{Keyword, Operator, TokenKind};
pub use types::*;
