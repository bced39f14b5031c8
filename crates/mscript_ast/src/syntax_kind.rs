//! Token kinds, keywords and operators.

use std::fmt;

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    EndOfFile,
    Identifier,
    Keyword,
    StringLiteral,
    NumericLiteral,
    BooleanLiteral,
    NilLiteral,
    Punctuator,
    SliceOperator,
    EndOfLine,
    Comment,
    Invalid,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::EndOfFile => "EOF",
            TokenKind::Identifier => "Identifier",
            TokenKind::Keyword => "Keyword",
            TokenKind::StringLiteral => "StringLiteral",
            TokenKind::NumericLiteral => "NumericLiteral",
            TokenKind::BooleanLiteral => "BooleanLiteral",
            TokenKind::NilLiteral => "NilLiteral",
            TokenKind::Punctuator => "Punctuator",
            TokenKind::SliceOperator => "SliceOperator",
            TokenKind::EndOfLine => "EOL",
            TokenKind::Comment => "Comment",
            TokenKind::Invalid => "Invalid",
        }
    }

    /// String, number, boolean and nil literals.
    #[inline]
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::StringLiteral
                | TokenKind::NumericLiteral
                | TokenKind::BooleanLiteral
                | TokenKind::NilLiteral
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reserved words, including the composite forms the lexer folds into a
/// single token (`else if`, `end if`, `end for`, `end while`, `end function`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    If,
    In,
    Or,
    And,
    End,
    For,
    Not,
    New,
    Isa,
    Else,
    Then,
    Break,
    While,
    Return,
    Function,
    Continue,
    ElseIf,
    EndIf,
    EndFor,
    EndWhile,
    EndFunction,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::In => "in",
            Keyword::Or => "or",
            Keyword::And => "and",
            Keyword::End => "end",
            Keyword::For => "for",
            Keyword::Not => "not",
            Keyword::New => "new",
            Keyword::Isa => "isa",
            Keyword::Else => "else",
            Keyword::Then => "then",
            Keyword::Break => "break",
            Keyword::While => "while",
            Keyword::Return => "return",
            Keyword::Function => "function",
            Keyword::Continue => "continue",
            Keyword::ElseIf => "else if",
            Keyword::EndIf => "end if",
            Keyword::EndFor => "end for",
            Keyword::EndWhile => "end while",
            Keyword::EndFunction => "end function",
        }
    }

    /// Look up a single-word keyword. Composite keywords are produced by the
    /// lexer and resolved with [`Keyword::from_token_value`].
    pub fn from_word(word: &str) -> Option<Keyword> {
        // Bucketed by length; most identifiers are rejected on the first check.
        match word.len() {
            2 => match word {
                "if" => Some(Keyword::If),
                "in" => Some(Keyword::In),
                "or" => Some(Keyword::Or),
                _ => None,
            },
            3 => match word {
                "and" => Some(Keyword::And),
                "end" => Some(Keyword::End),
                "for" => Some(Keyword::For),
                "not" => Some(Keyword::Not),
                "new" => Some(Keyword::New),
                "isa" => Some(Keyword::Isa),
                _ => None,
            },
            4 => match word {
                "else" => Some(Keyword::Else),
                "then" => Some(Keyword::Then),
                _ => None,
            },
            5 => match word {
                "break" => Some(Keyword::Break),
                "while" => Some(Keyword::While),
                _ => None,
            },
            6 if word == "return" => Some(Keyword::Return),
            8 => match word {
                "function" => Some(Keyword::Function),
                "continue" => Some(Keyword::Continue),
                _ => None,
            },
            _ => None,
        }
    }

    /// Resolve the value of a keyword token, composite forms included.
    pub fn from_token_value(value: &str) -> Option<Keyword> {
        match value {
            "else if" => Some(Keyword::ElseIf),
            "end if" => Some(Keyword::EndIf),
            "end for" => Some(Keyword::EndFor),
            "end while" => Some(Keyword::EndWhile),
            "end function" => Some(Keyword::EndFunction),
            _ => Keyword::from_word(value),
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operators as they appear in source and in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Plus,
    Minus,
    Asterisk,
    Slash,
    Modulo,
    Power,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    BitwiseOr,
    BitwiseAnd,
    LeftShift,
    RightShift,
    UnsignedRightShift,
    And,
    Or,
    Not,
    Isa,
    New,
    Reference,
    Member,
    Assign,
    AddShorthand,
    SubtractShorthand,
    MultiplyShorthand,
    DivideShorthand,
    ModuloShorthand,
    PowerShorthand,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Asterisk => "*",
            Operator::Slash => "/",
            Operator::Modulo => "%",
            Operator::Power => "^",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::BitwiseOr => "|",
            Operator::BitwiseAnd => "&",
            Operator::LeftShift => "<<",
            Operator::RightShift => ">>",
            Operator::UnsignedRightShift => ">>>",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::Isa => "isa",
            Operator::New => "new",
            Operator::Reference => "@",
            Operator::Member => ".",
            Operator::Assign => "=",
            Operator::AddShorthand => "+=",
            Operator::SubtractShorthand => "-=",
            Operator::MultiplyShorthand => "*=",
            Operator::DivideShorthand => "/=",
            Operator::ModuloShorthand => "%=",
            Operator::PowerShorthand => "^=",
        }
    }

    pub fn from_str(value: &str) -> Option<Operator> {
        let op = match value {
            "+" => Operator::Plus,
            "-" => Operator::Minus,
            "*" => Operator::Asterisk,
            "/" => Operator::Slash,
            "%" => Operator::Modulo,
            "^" => Operator::Power,
            "==" => Operator::Equal,
            "!=" => Operator::NotEqual,
            "<" => Operator::LessThan,
            "<=" => Operator::LessThanOrEqual,
            ">" => Operator::GreaterThan,
            ">=" => Operator::GreaterThanOrEqual,
            "|" => Operator::BitwiseOr,
            "&" => Operator::BitwiseAnd,
            "<<" => Operator::LeftShift,
            ">>" => Operator::RightShift,
            ">>>" => Operator::UnsignedRightShift,
            "and" => Operator::And,
            "or" => Operator::Or,
            "not" => Operator::Not,
            "isa" => Operator::Isa,
            "new" => Operator::New,
            "@" => Operator::Reference,
            "." => Operator::Member,
            "=" => Operator::Assign,
            "+=" => Operator::AddShorthand,
            "-=" => Operator::SubtractShorthand,
            "*=" => Operator::MultiplyShorthand,
            "/=" => Operator::DivideShorthand,
            "%=" => Operator::ModuloShorthand,
            "^=" => Operator::PowerShorthand,
            _ => return None,
        };
        Some(op)
    }

    /// The arithmetic operator a compound assignment applies.
    pub fn shorthand_base(self) -> Option<Operator> {
        match self {
            Operator::AddShorthand => Some(Operator::Plus),
            Operator::SubtractShorthand => Some(Operator::Minus),
            Operator::MultiplyShorthand => Some(Operator::Asterisk),
            Operator::DivideShorthand => Some(Operator::Slash),
            Operator::ModuloShorthand => Some(Operator::Modulo),
            Operator::PowerShorthand => Some(Operator::Power),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value carried by end-of-line tokens.
pub const END_OF_LINE_VALUE: &str = "<eol>";
/// Value carried by end-of-file tokens.
pub const END_OF_FILE_VALUE: &str = "<eof>";
/// Value carried by slice operator tokens.
pub const SLICE_SEPARATOR_VALUE: &str = ":";
