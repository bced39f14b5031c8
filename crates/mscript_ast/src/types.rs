//! Flag types and small value types shared by tokens and nodes.

use std::fmt;

bitflags::bitflags! {
    /// Flags attached to lexical tokens.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u8 {
        const NONE                    = 0;
        /// Spaces or tabs were skipped immediately before the token.
        const PRECEDED_BY_WHITESPACE  = 1 << 0;
        /// The token spans more than one line (multi-line strings).
        const MULTI_LINE              = 1 << 1;
    }
}

bitflags::bitflags! {
    /// Flags for syntax nodes.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        const NONE         = 0;
        /// Block node whose terminator has not been seen yet.
        const PENDING      = 1 << 0;
        /// Node invented by the parser rather than read from source.
        const SYNTHESIZED  = 1 << 1;
        /// Block node closed at end of input without its terminator.
        const FORCE_CLOSED = 1 << 2;
    }
}

/// The decoded value of a literal token or node.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Nil,
}

impl LiteralValue {
    pub fn is_number(&self) -> bool {
        matches!(self, LiteralValue::Number(_))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, LiteralValue::Boolean(_))
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::String(s) => f.write_str(s),
            LiteralValue::Number(n) => write!(f, "{}", n),
            LiteralValue::Boolean(b) => write!(f, "{}", b),
            LiteralValue::Nil => f.write_str("null"),
        }
    }
}

/// What role an identifier plays where it appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    Variable,
    /// Right-hand side of `.`; never bound in a namespace.
    Property,
    Argument,
    ForInVariable,
    /// Hidden `__<name>_idx` counter of a for loop.
    ForInIdxVariable,
}

impl IdentifierKind {
    /// Whether identifiers of this kind bind a name in the active scope.
    #[inline]
    pub fn binds_name(self) -> bool {
        self != IdentifierKind::Property
    }
}
