//! Character classification used by the lexer.

use mscript_ast::syntax_kind::Keyword;

pub const SPACE: u8 = b' ';
pub const TAB: u8 = b'\t';
pub const LINE_FEED: u8 = b'\n';
pub const CARRIAGE_RETURN: u8 = b'\r';
pub const QUOTE: u8 = b'"';
pub const SLASH: u8 = b'/';
pub const DOT: u8 = b'.';
pub const SEMICOLON: u8 = b';';

#[inline]
pub fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

/// ASCII letters, `_` and any byte of a non-ASCII character.
#[inline]
pub fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

#[inline]
pub fn is_identifier_part(b: u8) -> bool {
    is_identifier_start(b) || is_digit(b)
}

#[inline]
pub fn is_end_of_line(b: u8) -> bool {
    b == LINE_FEED || b == CARRIAGE_RETURN
}

#[inline]
pub fn is_whitespace(b: u8) -> bool {
    b == SPACE || b == TAB
}

#[inline]
pub fn is_comment_start(b: u8, next: Option<u8>) -> bool {
    b == SLASH && next == Some(SLASH)
}

#[inline]
pub fn is_keyword(word: &str) -> bool {
    Keyword::from_word(word).is_some()
}

/// A `\r\n` or `\n\r` pair that counts as a single line break.
#[inline]
pub fn is_paired_line_break(b: u8, next: Option<u8>) -> bool {
    matches!(
        (b, next),
        (CARRIAGE_RETURN, Some(LINE_FEED)) | (LINE_FEED, Some(CARRIAGE_RETURN))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_classes() {
        assert!(is_identifier_start(b'_'));
        assert!(is_identifier_start(0xC3));
        assert!(!is_identifier_start(b'9'));
        assert!(is_identifier_part(b'9'));
        assert!(!is_identifier_part(b'-'));
    }

    #[test]
    fn test_line_breaks() {
        assert!(is_paired_line_break(b'\r', Some(b'\n')));
        assert!(is_paired_line_break(b'\n', Some(b'\r')));
        assert!(!is_paired_line_break(b'\n', Some(b'\n')));
        assert!(is_comment_start(b'/', Some(b'/')));
        assert!(!is_comment_start(b'/', None));
        assert!(is_keyword("isa"));
        assert!(!is_keyword("end if"));
    }
}
