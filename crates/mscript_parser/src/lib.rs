//! mscript_parser: Recursive-descent parser for mscript.
//!
//! The parser pulls tokens from [`mscript_lexer::Lexer`] and builds an
//! index-arena [`mscript_ast::Ast`]. Block statements (`if`, `while`, `for`,
//! `function`) are allocated when their header is read and completed when
//! their terminator arrives, so a line never needs lookahead past its end.
//!
//! Two error policies are supported. Strict parsing stops at the first error.
//! Permissive parsing records every error, rewinds the failing statement and
//! resumes on the next line, closing any blocks still open at end of input.

mod expressions;
pub mod line_registry;
mod parser;
pub mod pending_block;
pub mod precedence;
pub mod scope;
pub mod selector;

pub use mscript_options::ParserOptions;
pub use parser::{parse, Parser, SyntaxTree, MAX_RECURSION_DEPTH};
