//! Lexer integration tests.
//!
//! Verifies that the lexer correctly tokenizes mscript constructs.

use mscript_ast::syntax_kind::TokenKind;
use mscript_ast::types::{LiteralValue, TokenFlags};
use mscript_core::text::Position;
use mscript_diagnostics::{ErrorPolicy, SyntaxError};
use mscript_lexer::{tokenize, Lexer, LexerOptions, Token};

/// Helper: lex all tokens up to (excluding) end of file.
fn lex_all(source: &str) -> Vec<Token> {
    let (mut tokens, errors) = tokenize(source, LexerOptions::default()).unwrap();
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    tokens.pop();
    tokens
}

/// Helper: lex all tokens as (kind, value) pairs.
fn lex_pairs(source: &str) -> Vec<(TokenKind, String)> {
    lex_all(source)
        .into_iter()
        .map(|t| (t.kind, t.value))
        .collect()
}

fn permissive() -> LexerOptions {
    LexerOptions {
        tab_width: 1,
        policy: ErrorPolicy::Permissive,
    }
}

#[test]
fn test_empty_source() {
    assert!(lex_all("").is_empty());
    assert!(lex_all("  \t ").is_empty());
}

#[test]
fn test_assignment_tokens() {
    let pairs = lex_pairs("x = 42");
    assert_eq!(
        pairs,
        vec![
            (TokenKind::Identifier, "x".to_string()),
            (TokenKind::Punctuator, "=".to_string()),
            (TokenKind::NumericLiteral, "42".to_string()),
        ]
    );
}

#[test]
fn test_numeric_literals() {
    let tokens = lex_all("3.14 .5 1e3 2E-2");
    let values: Vec<_> = tokens.iter().map(|t| t.literal.clone()).collect();
    assert_eq!(
        values,
        vec![
            Some(LiteralValue::Number(3.14)),
            Some(LiteralValue::Number(0.5)),
            Some(LiteralValue::Number(1000.0)),
            Some(LiteralValue::Number(0.02)),
        ]
    );
    assert_eq!(tokens[1].raw.as_deref(), Some(".5"));
}

#[test]
fn test_invalid_numeric_literal() {
    let (tokens, errors) = tokenize("1.2.3", permissive()).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Invalid);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message_text, "Invalid numeric literal: 1.2.3");
}

#[test]
fn test_string_with_escaped_quotes() {
    let tokens = lex_all(r#"s = "say ""hi""""#);
    let string = &tokens[2];
    assert_eq!(string.kind, TokenKind::StringLiteral);
    assert_eq!(string.value, r#"say "hi""#);
    assert_eq!(string.raw.as_deref(), Some(r#""say ""hi""""#));
    assert_eq!(string.to_string(), r#"StringLiteral[1:5 - 1:17: value = "say ""hi"""]"#);
}

#[test]
fn test_multi_line_string() {
    let tokens = lex_all("s = \"a\nb\"\nx");
    let string = &tokens[2];
    assert!(string.flags.contains(TokenFlags::MULTI_LINE));
    assert_eq!(string.start, Position::new(1, 5));
    assert_eq!(string.end, Position::new(2, 3));
    assert_eq!(tokens[4].start, Position::new(3, 1));
}

#[test]
fn test_unterminated_string_strict() {
    let mut lexer = Lexer::new("x = \"open", LexerOptions::default());
    lexer.next().unwrap();
    lexer.next().unwrap();
    let err = lexer.next().unwrap_err();
    match err {
        SyntaxError::Lexer(d) => assert_eq!(d.message_text, "Unexpected string end of file."),
        other => panic!("expected lexer error, got {:?}", other),
    }
}

#[test]
fn test_unterminated_string_resumes_after_line() {
    let (tokens, errors) = tokenize("x = \"open\ny = 1", permissive()).unwrap();
    assert_eq!(errors.len(), 1);
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Punctuator,
            TokenKind::EndOfLine,
            TokenKind::Identifier,
            TokenKind::Punctuator,
            TokenKind::NumericLiteral,
            TokenKind::EndOfFile,
        ]
    );
    assert_eq!(tokens[3].start, Position::new(2, 1));
}

#[test]
fn test_keywords_and_literals() {
    let pairs = lex_pairs("if true then x = null else return false");
    let kinds: Vec<_> = pairs.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Keyword,
            TokenKind::BooleanLiteral,
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Punctuator,
            TokenKind::NilLiteral,
            TokenKind::Keyword,
            TokenKind::Keyword,
            TokenKind::BooleanLiteral,
        ]
    );
}

#[test]
fn test_composite_keywords() {
    let pairs = lex_pairs("else if x\nend if\nend while\nend whil\nelse iffy\nend");
    let keywords: Vec<_> = pairs
        .into_iter()
        .filter(|(k, _)| *k == TokenKind::Keyword)
        .map(|(_, v)| v)
        .collect();
    assert_eq!(
        keywords,
        vec!["else if", "end if", "end while", "end whil", "else", "end"]
    );
}

#[test]
fn test_operators() {
    let values: Vec<_> = lex_pairs("a += b >>> 2 << 1 != c <= d >= e == f ^= g % h")
        .into_iter()
        .filter(|(k, _)| *k == TokenKind::Punctuator)
        .map(|(_, v)| v)
        .collect();
    assert_eq!(
        values,
        vec!["+=", ">>>", "<<", "!=", "<=", ">=", "==", "^=", "%"]
    );
}

#[test]
fn test_slice_operator_and_semicolon() {
    let pairs = lex_pairs("a[1:2]; b");
    assert_eq!(pairs[3], (TokenKind::SliceOperator, ":".to_string()));
    assert_eq!(pairs[6], (TokenKind::EndOfLine, "<eol>".to_string()));
    assert_eq!(pairs[7].1, "b");
}

#[test]
fn test_comments() {
    let tokens = lex_all("x = 1 // trailing\n// own line");
    let comments: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Comment)
        .collect();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].value, " trailing");
    assert_eq!(comments[0].start, Position::new(1, 7));
    assert_eq!(comments[1].value, " own line");
    assert_eq!(comments[1].line(), 2);
}

#[test]
fn test_whitespace_flag() {
    let tokens = lex_all("f(a) [b] -c");
    assert!(!tokens[1].after_space());
    assert!(tokens[4].after_space());
    assert!(tokens[7].after_space());
    assert!(!tokens[8].after_space());
}

#[test]
fn test_unicode_identifiers() {
    let tokens = lex_all("größe = 1");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "größe");
}

#[test]
fn test_invalid_character_permissive() {
    let (tokens, errors) = tokenize("a $ b", permissive()).unwrap();
    assert_eq!(tokens[1].kind, TokenKind::Invalid);
    assert_eq!(tokens[1].value, "$");
    assert_eq!(errors[0].message_text, "Invalid character '$' (code 36).");
    assert_eq!(tokens[2].value, "b");
}

#[test]
fn test_token_display() {
    let tokens = lex_all("while x");
    assert_eq!(tokens[0].to_string(), "Keyword[1:1 - 1:6: value = 'while']");
}
