//! mscript_core: Core utilities for the mscript front end.
//!
//! Provides source positions and ranges, string interning, a typed node
//! arena and the small collections shared by the lexer and parser.

pub mod arena;
pub mod collections;
pub mod intern;
pub mod text;

// Re-export commonly used types
pub use arena::{Arena, Id};
pub use collections::MultiMap;
pub use intern::{InternedString, StringInterner};
pub use text::{Position, Range, TextPos, TextRange};
