//! mscript_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Every lexical and structural problem found while reading a script is
//! described by a `DiagnosticMessage` from the `messages` table, realized
//! into a `Diagnostic` with a source range. In strict mode the first
//! diagnostic is surfaced as a `SyntaxError`; in permissive mode all of them
//! are collected and parsing continues.

use mscript_core::text::{Range, TextRange};
use serde::Serialize;
use std::fmt;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// Which stage of the front end produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSource {
    Lexer,
    Parser,
}

impl fmt::Display for DiagnosticSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSource::Lexer => write!(f, "lexer"),
            DiagnosticSource::Parser => write!(f, "parser"),
        }
    }
}

/// How the lexer and parser react to a diagnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ErrorPolicy {
    /// Abort on the first error.
    #[default]
    Strict,
    /// Record every error, resynchronize and keep going.
    Permissive,
}

impl ErrorPolicy {
    #[inline]
    pub fn is_permissive(self) -> bool {
        self == ErrorPolicy::Permissive
    }
}

/// Entry in the `messages` table. `message` may hold `{0}`-style
/// placeholders.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// The file path where this diagnostic occurred, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Line/character range of the offending text.
    pub range: Option<Range>,
    /// Byte range of the offending text.
    pub span: Option<TextRange>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
    pub source: DiagnosticSource,
}

impl Diagnostic {
    /// Create a new diagnostic without location info.
    pub fn new(source: DiagnosticSource, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            range: None,
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
            source,
        }
    }

    /// Create a new diagnostic anchored at a source range.
    pub fn with_location(
        source: DiagnosticSource,
        range: Range,
        span: TextRange,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            range: Some(range),
            span: Some(span),
            ..Self::new(source, message, args)
        }
    }

    /// Attach the file the diagnostic belongs to.
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.category, DiagnosticCategory::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}:", file)?;
        }
        if let Some(range) = self.range {
            write!(f, "{}:", range.start)?;
        }
        if self.file.is_some() || self.range.is_some() {
            write!(f, " ")?;
        }
        write!(f, "{} MS{}: {}", self.category, self.code, self.message_text)
    }
}

/// Substitute `{0}`, `{1}`, ... in a message template.
pub fn format_message(template: &str, args: &[&str]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_string(), |text, (i, arg)| text.replace(&format!("{{{}}}", i), arg))
}

/// The error surfaced by strict-mode lexing and parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("{0}")]
    Lexer(Diagnostic),
    #[error("{0}")]
    Parser(Diagnostic),
}

impl SyntaxError {
    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            SyntaxError::Lexer(d) | SyntaxError::Parser(d) => d,
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        match self {
            SyntaxError::Lexer(d) | SyntaxError::Parser(d) => d,
        }
    }
}

impl From<Diagnostic> for SyntaxError {
    fn from(diagnostic: Diagnostic) -> Self {
        match diagnostic.source {
            DiagnosticSource::Lexer => SyntaxError::Lexer(diagnostic),
            DiagnosticSource::Parser => SyntaxError::Parser(diagnostic),
        }
    }
}

/// Diagnostics in the order they were reported.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend_from_slice(&mut self, diagnostics: &[Diagnostic]) {
        self.diagnostics.extend_from_slice(diagnostics);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Move every diagnostic out, leaving the collection empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Lexer errors (1000-1099)
    // ========================================================================
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1001, Error, "Invalid character '{0}' (code {1}).");
    pub const UNEXPECTED_STRING_END_OF_FILE: DiagnosticMessage = diag!(1002, Error, "Unexpected string end of file.");
    pub const INVALID_NUMERIC_LITERAL: DiagnosticMessage = diag!(1003, Error, "Invalid numeric literal: {0}");

    // ========================================================================
    // Parser errors (1100-1199)
    // ========================================================================
    pub const GOT_0_WHERE_1_IS_REQUIRED: DiagnosticMessage = diag!(1100, Error, "got {0} where \"{1}\" is required");
    pub const GOT_0_WHERE_ANY_OF_1_IS_REQUIRED: DiagnosticMessage = diag!(1101, Error, "got {0} where any of {1} is required");
    pub const GOT_0_WHERE_TYPE_1_IS_REQUIRED: DiagnosticMessage = diag!(1102, Error, "got {0} where {1} is required");
    pub const UNEXPECTED_KEYWORD_0_AT_START_OF_LINE: DiagnosticMessage = diag!(1103, Error, "unexpected keyword {0} at start of line");
    pub const UNEXPECTED_KEYWORD_0_IN_SHORTHAND_STATEMENT: DiagnosticMessage = diag!(1104, Error, "unexpected keyword {0} in shorthand statement");
    pub const NO_MATCHING_OPEN_0_BLOCK: DiagnosticMessage = diag!(1105, Error, "no matching open {0} block");
    pub const FOUND_OPEN_BLOCK_0: DiagnosticMessage = diag!(1106, Error, "found open block {0}");
    pub const PARAMETER_DEFAULT_MUST_BE_LITERAL: DiagnosticMessage = diag!(1107, Error, "parameter default value must be a literal value");
    pub const EXPECTED_ARGUMENT_RECEIVED_RIGHT_PARENTHESIS: DiagnosticMessage = diag!(1108, Error, "expected argument instead received right parenthesis");
    pub const GOT_0_WHERE_NUMBER_STRING_OR_IDENTIFIER_IS_REQUIRED: DiagnosticMessage = diag!(1109, Error, "got {0} where number, string, or identifier is required");
    pub const MAXIMUM_NESTING_DEPTH_0_EXCEEDED: DiagnosticMessage = diag!(1110, Error, "maximum nesting depth of {0} exceeded");
}
