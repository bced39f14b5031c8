//! Operator precedence for the expression parser.

use crate::selector::{groups, selectors};
use mscript_ast::syntax_kind::Operator;
use mscript_lexer::Token;

/// Expression levels, ordered from loosest to tightest binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Precedence {
    Or = 0,
    And = 1,
    Not = 2,
    Isa = 3,
    BitwiseOr = 4,
    BitwiseAnd = 5,
    Comparison = 6,
    Additive = 7,
    Shift = 8,
    Multiplicative = 9,
    UnaryMinus = 10,
    New = 11,
    AddressOf = 12,
    Power = 13,
    /// Member access, indexing, slicing and calls, down to atoms.
    Postfix = 14,
}

impl Precedence {
    /// The next tighter level. `Postfix` is its own successor.
    pub fn next(self) -> Precedence {
        match self {
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Not,
            Precedence::Not => Precedence::Isa,
            Precedence::Isa => Precedence::BitwiseOr,
            Precedence::BitwiseOr => Precedence::BitwiseAnd,
            Precedence::BitwiseAnd => Precedence::Comparison,
            Precedence::Comparison => Precedence::Additive,
            Precedence::Additive => Precedence::Shift,
            Precedence::Shift => Precedence::Multiplicative,
            Precedence::Multiplicative => Precedence::UnaryMinus,
            Precedence::UnaryMinus => Precedence::New,
            Precedence::New => Precedence::AddressOf,
            Precedence::AddressOf => Precedence::Power,
            Precedence::Power | Precedence::Postfix => Precedence::Postfix,
        }
    }

    /// Whether operators of this level build logical rather than binary
    /// expression nodes.
    pub fn is_logical(self) -> bool {
        matches!(self, Precedence::Or | Precedence::And)
    }
}

/// The infix operator `token` denotes, with the level it binds at.
pub fn infix_operator(token: &Token) -> Option<(Precedence, Operator)> {
    let level = if selectors::OR.is(token) {
        Precedence::Or
    } else if selectors::AND.is(token) {
        Precedence::And
    } else if selectors::ISA.is(token) {
        Precedence::Isa
    } else if selectors::BITWISE_OR.is(token) {
        Precedence::BitwiseOr
    } else if selectors::BITWISE_AND.is(token) {
        Precedence::BitwiseAnd
    } else if groups::COMPARISON_OPERATORS.is(token) {
        Precedence::Comparison
    } else if groups::ADDITIVE_OPERATORS.is(token) {
        Precedence::Additive
    } else if groups::SHIFT_OPERATORS.is(token) {
        Precedence::Shift
    } else if groups::MULTIPLICATIVE_OPERATORS.is(token) {
        Precedence::Multiplicative
    } else if selectors::POWER.is(token) {
        Precedence::Power
    } else {
        return None;
    };
    Some((level, Operator::from_str(&token.value)?))
}

/// The prefix operator `token` denotes, with the level it binds at.
pub fn prefix_operator(token: &Token) -> Option<(Precedence, Operator)> {
    if selectors::NOT.is(token) {
        Some((Precedence::Not, Operator::Not))
    } else if selectors::MINUS.is(token) {
        Some((Precedence::UnaryMinus, Operator::Minus))
    } else if selectors::NEW.is(token) {
        Some((Precedence::New, Operator::New))
    } else if selectors::REFERENCE.is(token) {
        Some((Precedence::AddressOf, Operator::Reference))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mscript_ast::syntax_kind::TokenKind;
    use mscript_core::text::{Position, TextRange};

    fn token(kind: TokenKind, value: &str) -> Token {
        Token::new(kind, value, TextRange::new(0, 1), Position::new(1, 1), Position::new(1, 2))
    }

    #[test]
    fn test_levels_are_ordered() {
        let mut level = Precedence::Or;
        let mut seen = vec![level];
        while level != Precedence::Postfix {
            let next = level.next();
            assert!(next > level);
            level = next;
            seen.push(level);
        }
        assert_eq!(seen.len(), 15);
    }

    #[test]
    fn test_infix_operator_lookup() {
        let shift = token(TokenKind::Punctuator, ">>>");
        assert_eq!(
            infix_operator(&shift),
            Some((Precedence::Shift, Operator::UnsignedRightShift))
        );

        let and = token(TokenKind::Keyword, "and");
        assert_eq!(infix_operator(&and), Some((Precedence::And, Operator::And)));
        assert!(Precedence::And.is_logical());
        assert!(!Precedence::Power.is_logical());

        let less = token(TokenKind::Punctuator, "<=");
        assert_eq!(infix_operator(&less).map(|(level, _)| level), Some(Precedence::Comparison));
        assert_eq!(infix_operator(&token(TokenKind::Punctuator, "@")), None);
    }

    #[test]
    fn test_prefix_operator_lookup() {
        let minus = token(TokenKind::Punctuator, "-");
        assert_eq!(prefix_operator(&minus), Some((Precedence::UnaryMinus, Operator::Minus)));
        assert_eq!(infix_operator(&minus), Some((Precedence::Additive, Operator::Minus)));

        let new = token(TokenKind::Keyword, "new");
        assert_eq!(prefix_operator(&new), Some((Precedence::New, Operator::New)));
        assert_eq!(prefix_operator(&token(TokenKind::Keyword, "isa")), None);
    }
}
