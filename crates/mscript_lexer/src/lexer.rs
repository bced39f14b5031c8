//! The mscript lexer.
//!
//! Works directly on the UTF-8 bytes of the source. Every non-ASCII byte is
//! an identifier byte, so token boundaries always fall on character
//! boundaries and slicing the source is safe. Columns are byte based and
//! widened by `tab_width - 1` for every tab skipped on the current line.

use crate::char_codes::*;
use crate::token::Token;
use memchr::{memchr2, memchr3};
use mscript_ast::syntax_kind::{
    TokenKind, END_OF_FILE_VALUE, END_OF_LINE_VALUE, SLICE_SEPARATOR_VALUE,
};
use mscript_ast::types::{LiteralValue, TokenFlags};
use mscript_core::text::{Position, Range, TextPos, TextRange};
use mscript_diagnostics::{
    messages, Diagnostic, DiagnosticCollection, DiagnosticMessage, DiagnosticSource,
    ErrorPolicy, SyntaxError,
};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Settings for a single lexer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerOptions {
    /// Display width of a tab character. Values below 1 are treated as 1.
    pub tab_width: u32,
    pub policy: ErrorPolicy,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            tab_width: 1,
            policy: ErrorPolicy::Strict,
        }
    }
}

/// What the snapshot machinery is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotMode {
    Idle,
    /// Tokens handed out are being captured.
    Recording,
    /// Captured tokens are being handed out again.
    Replaying,
}

pub struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    /// Current byte offset.
    pos: usize,
    /// Byte offset where the current token starts.
    token_start: usize,
    line: u32,
    line_start: usize,
    /// Extra columns contributed by tabs on the current line.
    tab_shift: u32,
    tab_width: u32,
    policy: ErrorPolicy,
    errors: DiagnosticCollection,
    replay: VecDeque<Token>,
    recording: Option<Vec<Token>>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, options: LexerOptions) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            token_start: 0,
            line: 1,
            line_start: 0,
            tab_shift: 0,
            tab_width: options.tab_width.max(1),
            policy: options.policy,
            errors: DiagnosticCollection::new(),
            replay: VecDeque::new(),
            recording: None,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn tab_width(&self) -> u32 {
        self.tab_width
    }

    /// Lexical errors reported so far.
    pub fn errors(&self) -> &[Diagnostic] {
        self.errors.diagnostics()
    }

    pub fn take_errors(&mut self) -> Vec<Diagnostic> {
        self.errors.take()
    }

    /// Whether the source byte at `pos` is a space or tab.
    pub fn is_whitespace_at(&self, pos: TextPos) -> bool {
        self.bytes
            .get(pos as usize)
            .copied()
            .is_some_and(is_whitespace)
    }

    /// Produce the next token. At end of input this keeps returning
    /// end-of-file tokens.
    pub fn next(&mut self) -> Result<Token, SyntaxError> {
        let token = match self.replay.pop_front() {
            Some(token) => token,
            None => self.scan()?,
        };
        if let Some(recording) = self.recording.as_mut() {
            recording.push(token.clone());
        }
        Ok(token)
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Start capturing every token handed out from now on.
    pub fn record_snapshot(&mut self) {
        self.recording = Some(Vec::new());
    }

    /// Queue the captured tokens for replay, ahead of anything still
    /// waiting to be replayed.
    pub fn recover_from_snapshot(&mut self) {
        let Some(mut recorded) = self.recording.take() else {
            return;
        };
        debug!(target: "mscript::lexer", tokens = recorded.len(), "replaying snapshot");
        recorded.extend(self.replay.drain(..));
        self.replay = recorded.into();
    }

    /// Drop the capture. Tokens already queued for replay are kept.
    pub fn clear_snapshot(&mut self) {
        self.recording = None;
    }

    pub fn mode(&self) -> SnapshotMode {
        if self.recording.is_some() {
            SnapshotMode::Recording
        } else if !self.replay.is_empty() {
            SnapshotMode::Replaying
        } else {
            SnapshotMode::Idle
        }
    }

    // ========================================================================
    // Character access
    // ========================================================================

    #[inline]
    fn current_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    #[inline]
    fn position_at(&self, pos: usize) -> Position {
        let column = pos.saturating_sub(self.line_start) as u32;
        Position::new(self.line, column + self.tab_shift + 1)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.current_byte() {
            match b {
                SPACE => self.pos += 1,
                TAB => {
                    self.tab_shift += self.tab_width - 1;
                    self.pos += 1;
                }
                _ => break,
            }
        }
    }

    fn start_new_line(&mut self) {
        self.line += 1;
        self.line_start = self.pos;
        self.tab_shift = 0;
    }

    /// Build a token spanning `token_start..pos` on the current line.
    fn finish(&self, kind: TokenKind, value: impl Into<String>, after_space: bool) -> Token {
        let token = Token::new(
            kind,
            value,
            TextRange::new(self.token_start as TextPos, self.pos as TextPos),
            self.position_at(self.token_start),
            self.position_at(self.pos),
        );
        if after_space {
            token.with_flags(TokenFlags::PRECEDED_BY_WHITESPACE)
        } else {
            token
        }
    }

    fn report(
        &mut self,
        message: &DiagnosticMessage,
        args: &[&str],
        range: Range,
    ) -> Result<(), SyntaxError> {
        let span = TextRange::new(self.token_start as TextPos, self.pos as TextPos);
        let diagnostic =
            Diagnostic::with_location(DiagnosticSource::Lexer, range, span, message, args);
        self.errors.add(diagnostic.clone());
        if self.policy.is_permissive() {
            debug!(target: "mscript::lexer", at = %range.start, "{}", diagnostic.message_text);
            Ok(())
        } else {
            Err(SyntaxError::Lexer(diagnostic))
        }
    }

    // ========================================================================
    // Scanning
    // ========================================================================

    fn scan(&mut self) -> Result<Token, SyntaxError> {
        loop {
            let whitespace_start = self.pos;
            self.skip_whitespace();
            let after_space = self.pos > whitespace_start;
            self.token_start = self.pos;

            let Some(ch) = self.current_byte() else {
                return Ok(self.finish(TokenKind::EndOfFile, END_OF_FILE_VALUE, after_space));
            };

            let token = if is_comment_start(ch, self.byte_at(1)) {
                Some(self.scan_comment(after_space))
            } else if is_end_of_line(ch) {
                Some(self.scan_end_of_line(after_space))
            } else if is_identifier_start(ch) {
                Some(self.scan_identifier_or_keyword(after_space))
            } else {
                self.scan_symbol(ch, after_space)?
            };

            if let Some(token) = token {
                trace!(target: "mscript::lexer", "{}", token);
                return Ok(token);
            }
        }
    }

    /// Literals and punctuation. `None` means the input was skipped and
    /// scanning should continue.
    fn scan_symbol(&mut self, ch: u8, after_space: bool) -> Result<Option<Token>, SyntaxError> {
        let next = self.byte_at(1);
        let with_equals = next == Some(b'=');

        let value = match ch {
            QUOTE => return self.scan_string_literal(after_space),
            b'0'..=b'9' => return self.scan_numeric_literal(after_space).map(Some),
            DOT if next.is_some_and(is_digit) => {
                return self.scan_numeric_literal(after_space).map(Some)
            }
            DOT => ".",
            b':' => {
                self.pos += 1;
                return Ok(Some(self.finish(
                    TokenKind::SliceOperator,
                    SLICE_SEPARATOR_VALUE,
                    after_space,
                )));
            }
            SEMICOLON => {
                self.pos += 1;
                return Ok(Some(self.finish(TokenKind::EndOfLine, END_OF_LINE_VALUE, after_space)));
            }
            b'=' if with_equals => "==",
            b'=' => "=",
            b'!' if with_equals => "!=",
            b'<' if with_equals => "<=",
            b'<' if next == Some(b'<') => "<<",
            b'<' => "<",
            b'>' if with_equals => ">=",
            b'>' if next == Some(b'>') && self.byte_at(2) == Some(b'>') => ">>>",
            b'>' if next == Some(b'>') => ">>",
            b'>' => ">",
            b'-' if with_equals => "-=",
            b'-' => "-",
            b'+' if with_equals => "+=",
            b'+' => "+",
            b'*' if with_equals => "*=",
            b'*' => "*",
            b'/' if with_equals => "/=",
            b'/' => "/",
            b'^' if with_equals => "^=",
            b'^' => "^",
            b'%' if with_equals => "%=",
            b'%' => "%",
            b',' => ",",
            b'{' => "{",
            b'}' => "}",
            b'[' => "[",
            b']' => "]",
            b'(' => "(",
            b')' => ")",
            b'@' => "@",
            b'|' => "|",
            b'&' => "&",
            _ => return self.scan_invalid_character(ch, after_space).map(Some),
        };

        self.pos += value.len();
        Ok(Some(self.finish(TokenKind::Punctuator, value, after_space)))
    }

    fn scan_end_of_line(&mut self, after_space: bool) -> Token {
        let ch = self.bytes[self.pos];
        self.pos += if is_paired_line_break(ch, self.byte_at(1)) { 2 } else { 1 };
        let token = self.finish(TokenKind::EndOfLine, END_OF_LINE_VALUE, after_space);
        self.start_new_line();
        token
    }

    fn scan_comment(&mut self, after_space: bool) -> Token {
        let body_start = self.pos + 2;
        self.pos = match memchr2(LINE_FEED, CARRIAGE_RETURN, &self.bytes[body_start..]) {
            Some(i) => body_start + i,
            None => self.bytes.len(),
        };
        let source = self.source;
        self.finish(TokenKind::Comment, &source[body_start..self.pos], after_space)
    }

    fn scan_identifier_or_keyword(&mut self, after_space: bool) -> Token {
        let source = self.source;
        self.pos += 1;
        while self.current_byte().is_some_and(is_identifier_part) {
            self.pos += 1;
        }
        let word = &source[self.token_start..self.pos];

        if is_keyword(word) {
            let value = match word {
                "end" => self.scan_composite_end(),
                "else" => self.scan_else_if(),
                _ => word.to_string(),
            };
            return self.finish(TokenKind::Keyword, value, after_space);
        }

        match word {
            "true" | "false" => self
                .finish(TokenKind::BooleanLiteral, word, after_space)
                .with_literal(word, LiteralValue::Boolean(word == "true")),
            "null" => self
                .finish(TokenKind::NilLiteral, word, after_space)
                .with_literal(word, LiteralValue::Nil),
            _ => self.finish(TokenKind::Identifier, word, after_space),
        }
    }

    /// `end` followed by whitespace and a word folds into one keyword. The
    /// word is not validated: `end whil` still yields a keyword token.
    fn scan_composite_end(&mut self) -> String {
        if self.current_byte().is_some_and(is_whitespace) {
            let word_start = self.pos + 1;
            let mut word_end = word_start;
            while self.bytes.get(word_end).copied().is_some_and(is_identifier_part) {
                word_end += 1;
            }
            if word_end > word_start {
                self.pos = word_end;
                return format!("end {}", &self.source[word_start..word_end]);
            }
        }
        "end".to_string()
    }

    fn scan_else_if(&mut self) -> String {
        let rest = &self.bytes[self.pos..];
        let boundary = !rest.get(3).copied().is_some_and(is_identifier_part);
        if rest.starts_with(b" if") && boundary {
            self.pos += 3;
            return "else if".to_string();
        }
        "else".to_string()
    }

    fn scan_string_literal(&mut self, after_space: bool) -> Result<Option<Token>, SyntaxError> {
        let source = self.source;
        let begin = (self.line, self.line_start, self.tab_shift);
        let start = self.position_at(self.token_start);
        let mut multi_line = false;
        self.pos += 1;

        loop {
            let Some(i) = memchr3(QUOTE, LINE_FEED, CARRIAGE_RETURN, &self.bytes[self.pos..]) else {
                self.pos = self.bytes.len();
                return self.unterminated_string(start, begin);
            };
            self.pos += i;
            let ch = self.bytes[self.pos];
            if ch == QUOTE {
                if self.byte_at(1) == Some(QUOTE) {
                    self.pos += 2;
                    continue;
                }
                self.pos += 1;
                break;
            }
            self.pos += if is_paired_line_break(ch, self.byte_at(1)) { 2 } else { 1 };
            self.start_new_line();
            multi_line = true;
        }

        let raw = &source[self.token_start..self.pos];
        let value = raw[1..raw.len() - 1].replace("\"\"", "\"");
        let mut token = Token::new(
            TokenKind::StringLiteral,
            value.clone(),
            TextRange::new(self.token_start as TextPos, self.pos as TextPos),
            start,
            self.position_at(self.pos),
        )
        .with_literal(raw, LiteralValue::String(value));
        if after_space {
            token.flags |= TokenFlags::PRECEDED_BY_WHITESPACE;
        }
        if multi_line {
            token.flags |= TokenFlags::MULTI_LINE;
        }
        Ok(Some(token))
    }

    /// Report a string that runs into end of input, then resume scanning at
    /// the end of the line the string opened on.
    fn unterminated_string(
        &mut self,
        start: Position,
        (line, line_start, tab_shift): (u32, usize, u32),
    ) -> Result<Option<Token>, SyntaxError> {
        let range = Range::new(start, self.position_at(self.pos));
        self.report(&messages::UNEXPECTED_STRING_END_OF_FILE, &[], range)?;

        self.line = line;
        self.line_start = line_start;
        self.tab_shift = tab_shift;
        self.pos = match memchr2(LINE_FEED, CARRIAGE_RETURN, &self.bytes[self.token_start..]) {
            Some(i) => self.token_start + i,
            None => self.bytes.len(),
        };
        Ok(None)
    }

    fn scan_numeric_literal(&mut self, after_space: bool) -> Result<Token, SyntaxError> {
        let source = self.source;
        let mut previous = None;
        while let Some(b) = self.current_byte() {
            let exponent_sign = (b == b'+' || b == b'-') && matches!(previous, Some(b'e' | b'E'));
            if !(is_digit(b) || b == DOT || b == b'e' || b == b'E' || exponent_sign) {
                break;
            }
            previous = Some(b);
            self.pos += 1;
        }

        let raw = &source[self.token_start..self.pos];
        match raw.parse::<f64>() {
            Ok(number) => Ok(self
                .finish(TokenKind::NumericLiteral, raw, after_space)
                .with_literal(raw, LiteralValue::Number(number))),
            Err(_) => {
                let range = Range::new(self.position_at(self.token_start), self.position_at(self.pos));
                self.report(&messages::INVALID_NUMERIC_LITERAL, &[raw], range)?;
                Ok(self.finish(TokenKind::Invalid, raw, after_space))
            }
        }
    }

    fn scan_invalid_character(&mut self, ch: u8, after_space: bool) -> Result<Token, SyntaxError> {
        self.pos += 1;
        let text = char::from(ch).to_string();
        let range = Range::new(self.position_at(self.token_start), self.position_at(self.pos));
        self.report(&messages::INVALID_CHARACTER, &[&text, &ch.to_string()], range)?;
        Ok(self.finish(TokenKind::Invalid, text, after_space))
    }
}

/// Scan a whole source, returning every token up to and including the
/// first end-of-file token, plus the lexical errors.
pub fn tokenize(source: &str, options: LexerOptions) -> Result<(Vec<Token>, Vec<Diagnostic>), SyntaxError> {
    let mut lexer = Lexer::new(source, options);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next()?;
        let done = token.kind == TokenKind::EndOfFile;
        tokens.push(token);
        if done {
            break;
        }
    }
    Ok((tokens, lexer.take_errors()))
}
