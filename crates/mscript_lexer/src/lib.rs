//! mscript_lexer: Tokenizer for mscript source text.
//!
//! Produces a stream of [`Token`]s with byte spans, 1-based positions and a
//! preceding-whitespace flag. The lexer can record the tokens it hands out
//! and replay them later, which the parser uses to rewind a failed
//! statement before resynchronizing.

pub mod char_codes;
mod lexer;
mod token;

pub use lexer::{tokenize, Lexer, LexerOptions, SnapshotMode};
pub use token::Token;
