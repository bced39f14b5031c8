//! Token selectors: named (kind, value) predicates and fixed one-of groups.

use mscript_ast::syntax_kind::TokenKind;
use mscript_lexer::Token;

/// Matches a token by kind, and by value when one is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    pub kind: TokenKind,
    pub value: Option<&'static str>,
}

impl Selector {
    pub const fn new(kind: TokenKind, value: &'static str) -> Self {
        Self {
            kind,
            value: Some(value),
        }
    }

    pub const fn of_kind(kind: TokenKind) -> Self {
        Self { kind, value: None }
    }

    #[inline]
    pub fn is(&self, token: &Token) -> bool {
        self.kind == token.kind && self.value.map_or(true, |value| token.value == value)
    }

    /// Text used for this selector in diagnostics.
    pub fn describe(&self) -> &'static str {
        self.value.unwrap_or_else(|| self.kind.as_str())
    }
}

/// A fixed set of selectors; matches when any member does.
#[derive(Debug, Clone, Copy)]
pub struct SelectorGroup(&'static [Selector]);

impl SelectorGroup {
    pub const fn new(selectors: &'static [Selector]) -> Self {
        Self(selectors)
    }

    #[inline]
    pub fn is(&self, token: &Token) -> bool {
        self.0.iter().any(|selector| selector.is(token))
    }

    pub fn selectors(&self) -> &'static [Selector] {
        self.0
    }

    /// The members as a quoted, comma separated list.
    pub fn describe(&self) -> String {
        self.0
            .iter()
            .map(|selector| format!("\"{}\"", selector.describe()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub mod selectors {
    use super::Selector;
    use mscript_ast::syntax_kind::TokenKind::{self, *};

    const fn punctuator(value: &'static str) -> Selector {
        Selector::new(Punctuator, value)
    }

    const fn keyword(value: &'static str) -> Selector {
        Selector::new(Keyword, value)
    }

    pub const END_OF_LINE: Selector = Selector::of_kind(EndOfLine);
    pub const END_OF_FILE: Selector = Selector::of_kind(EndOfFile);
    pub const COMMENT: Selector = Selector::of_kind(Comment);
    pub const IDENTIFIER: Selector = Selector::of_kind(TokenKind::Identifier);

    pub const L_PARENTHESIS: Selector = punctuator("(");
    pub const R_PARENTHESIS: Selector = punctuator(")");
    pub const L_BRACE: Selector = punctuator("{");
    pub const R_BRACE: Selector = punctuator("}");
    pub const L_BRACKET: Selector = punctuator("[");
    pub const R_BRACKET: Selector = punctuator("]");
    pub const ASSIGN: Selector = punctuator("=");
    pub const ADD_SHORTHAND: Selector = punctuator("+=");
    pub const SUBTRACT_SHORTHAND: Selector = punctuator("-=");
    pub const MULTIPLY_SHORTHAND: Selector = punctuator("*=");
    pub const DIVIDE_SHORTHAND: Selector = punctuator("/=");
    pub const MODULO_SHORTHAND: Selector = punctuator("%=");
    pub const POWER_SHORTHAND: Selector = punctuator("^=");
    pub const COMMA: Selector = punctuator(",");
    pub const MEMBER_SEPARATOR: Selector = punctuator(".");
    pub const SLICE_SEPARATOR: Selector = Selector::new(SliceOperator, ":");
    pub const REFERENCE: Selector = punctuator("@");
    pub const PLUS: Selector = punctuator("+");
    pub const MINUS: Selector = punctuator("-");
    pub const TIMES: Selector = punctuator("*");
    pub const DIVIDE: Selector = punctuator("/");
    pub const MODULO: Selector = punctuator("%");
    pub const POWER: Selector = punctuator("^");
    pub const EQUAL: Selector = punctuator("==");
    pub const NOT_EQUAL: Selector = punctuator("!=");
    pub const GREATER: Selector = punctuator(">");
    pub const GREATER_EQUAL: Selector = punctuator(">=");
    pub const LESSER: Selector = punctuator("<");
    pub const LESS_EQUAL: Selector = punctuator("<=");
    pub const LEFT_SHIFT: Selector = punctuator("<<");
    pub const RIGHT_SHIFT: Selector = punctuator(">>");
    pub const UNSIGNED_RIGHT_SHIFT: Selector = punctuator(">>>");
    pub const BITWISE_OR: Selector = punctuator("|");
    pub const BITWISE_AND: Selector = punctuator("&");

    pub const FUNCTION: Selector = keyword("function");
    pub const THEN: Selector = keyword("then");
    pub const ELSE: Selector = keyword("else");
    pub const ELSE_IF: Selector = keyword("else if");
    pub const IN: Selector = keyword("in");
    pub const ISA: Selector = keyword("isa");
    pub const OR: Selector = keyword("or");
    pub const AND: Selector = keyword("and");
    pub const NOT: Selector = keyword("not");
    pub const NEW: Selector = keyword("new");
}

pub mod groups {
    use super::selectors::*;
    use super::SelectorGroup;

    /// Tokens that end a statement on the current line.
    pub const END_OF_STATEMENT: SelectorGroup =
        SelectorGroup::new(&[END_OF_LINE, COMMENT, END_OF_FILE, ELSE, ELSE_IF]);
    /// Tokens after which a block body starts on the next line.
    pub const BLOCK_END_OF_LINE: SelectorGroup =
        SelectorGroup::new(&[END_OF_LINE, COMMENT, END_OF_FILE]);
    /// Tokens that end a bare `return`.
    pub const RETURN_STATEMENT_END: SelectorGroup =
        SelectorGroup::new(&[END_OF_LINE, COMMENT, END_OF_FILE, ELSE, ELSE_IF]);
    pub const ASSIGNMENT_SHORTHAND: SelectorGroup = SelectorGroup::new(&[
        ADD_SHORTHAND,
        SUBTRACT_SHORTHAND,
        MULTIPLY_SHORTHAND,
        DIVIDE_SHORTHAND,
        MODULO_SHORTHAND,
        POWER_SHORTHAND,
    ]);
    pub const COMPARISON_OPERATORS: SelectorGroup = SelectorGroup::new(&[
        EQUAL,
        NOT_EQUAL,
        GREATER,
        GREATER_EQUAL,
        LESSER,
        LESS_EQUAL,
    ]);
    pub const ADDITIVE_OPERATORS: SelectorGroup = SelectorGroup::new(&[PLUS, MINUS]);
    pub const MULTIPLICATIVE_OPERATORS: SelectorGroup =
        SelectorGroup::new(&[TIMES, DIVIDE, MODULO]);
    pub const SHIFT_OPERATORS: SelectorGroup =
        SelectorGroup::new(&[LEFT_SHIFT, RIGHT_SHIFT, UNSIGNED_RIGHT_SHIFT]);
    pub const CALL_ARGUMENT_END: SelectorGroup = SelectorGroup::new(&[COMMA, R_PARENTHESIS]);
    pub const FUNCTION_PARAMETER_END: SelectorGroup =
        SelectorGroup::new(&[R_PARENTHESIS, END_OF_FILE]);
    /// What may follow an argument of a parenthesis-free command call.
    pub const COMMAND_ARGUMENT_END: SelectorGroup =
        SelectorGroup::new(&[COMMA, END_OF_LINE, END_OF_FILE]);
}

#[cfg(test)]
mod tests {
    use super::groups::*;
    use super::selectors::*;
    use super::*;
    use mscript_core::text::{Position, TextRange};

    fn token(kind: TokenKind, value: &str) -> Token {
        Token::new(kind, value, TextRange::new(0, 1), Position::new(1, 1), Position::new(1, 2))
    }

    #[test]
    fn test_selector_matches_kind_and_value() {
        assert!(ASSIGN.is(&token(TokenKind::Punctuator, "=")));
        assert!(!ASSIGN.is(&token(TokenKind::Punctuator, "==")));
        assert!(!ELSE.is(&token(TokenKind::Identifier, "else")));
        assert!(END_OF_LINE.is(&token(TokenKind::EndOfLine, "<eol>")));
        assert!(SLICE_SEPARATOR.is(&token(TokenKind::SliceOperator, ":")));
    }

    #[test]
    fn test_groups() {
        assert!(END_OF_STATEMENT.is(&token(TokenKind::Keyword, "else if")));
        assert!(!BLOCK_END_OF_LINE.is(&token(TokenKind::Keyword, "else")));
        assert!(COMPARISON_OPERATORS.is(&token(TokenKind::Punctuator, "<=")));
        assert!(!COMPARISON_OPERATORS.is(&token(TokenKind::Punctuator, "<<")));
        assert_eq!(COMMAND_ARGUMENT_END.describe(), "\",\", \"EOL\", \"EOF\"");
        assert_eq!(R_PARENTHESIS.describe(), ")");
    }
}
