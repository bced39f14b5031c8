//! Token representation.

use mscript_ast::syntax_kind::{TokenKind, END_OF_FILE_VALUE};
use mscript_ast::types::{LiteralValue, TokenFlags};
use mscript_core::text::{Position, Range, TextRange};
use std::fmt;

/// A lexical token. Tokens are immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Decoded text: the identifier, keyword, operator, comment body or
    /// unescaped string contents.
    pub value: String,
    /// Exact source slice, for literals.
    pub raw: Option<String>,
    /// Decoded literal value, for literals.
    pub literal: Option<LiteralValue>,
    pub span: TextRange,
    pub start: Position,
    pub end: Position,
    pub flags: TokenFlags,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, span: TextRange, start: Position, end: Position) -> Self {
        Self {
            kind,
            value: value.into(),
            raw: None,
            literal: None,
            span,
            start,
            end,
            flags: TokenFlags::NONE,
        }
    }

    pub fn with_literal(mut self, raw: impl Into<String>, literal: LiteralValue) -> Self {
        self.raw = Some(raw.into());
        self.literal = Some(literal);
        self
    }

    pub fn with_flags(mut self, flags: TokenFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Stand-in for "the token before the first one". Its line is 0 so a
    /// comment on line 1 counts as starting a statement.
    pub fn start_of_input() -> Self {
        let origin = Position::new(0, 0);
        Self::new(TokenKind::EndOfFile, END_OF_FILE_VALUE, TextRange::empty(0), origin, origin)
    }

    /// The line the token starts on.
    #[inline]
    pub fn line(&self) -> u32 {
        self.start.line
    }

    /// Whether spaces or tabs directly precede the token.
    #[inline]
    pub fn after_space(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDED_BY_WHITESPACE)
    }

    #[inline]
    pub fn is(&self, kind: TokenKind, value: &str) -> bool {
        self.kind == kind && self.value == value
    }

    pub fn range(&self) -> Range {
        Range::new(self.start, self.end)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{} - {}: value = ", self.kind, self.start, self.end)?;
        match &self.raw {
            Some(raw) => write!(f, "{}]", raw),
            None => write!(f, "'{}']", self.value),
        }
    }
}
