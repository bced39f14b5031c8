//! Terminal rendering of parse diagnostics using miette.

// Fields read only by the derive macros.
#![allow(unused_assignments)]

use miette::{Diagnostic, SourceSpan};
use mscript_diagnostics::{Diagnostic as ParseDiagnostic, DiagnosticSource};

/// A parse diagnostic with its source attached.
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{message}")]
#[diagnostic(code(mscript::parse))]
pub struct SourceDiagnostic {
    pub message: String,
    #[source_code]
    pub src: miette::NamedSource<String>,
    #[label("{label}")]
    pub span: SourceSpan,
    pub label: String,
    #[help]
    pub help: Option<String>,
}

impl SourceDiagnostic {
    pub fn from_parse_diagnostic(diagnostic: &ParseDiagnostic, source_path: &str, source: &str) -> Self {
        let span = diagnostic.span.unwrap_or_default();
        let label = match diagnostic.source {
            DiagnosticSource::Lexer => "invalid text",
            DiagnosticSource::Parser => "here",
        };
        // Zero-width spans at end of input still need an in-bounds offset.
        let offset = (span.pos as usize).min(source.len());
        let length = (span.len() as usize).min(source.len() - offset);

        Self {
            message: format!("MS{}: {}", diagnostic.code, diagnostic.message_text),
            src: miette::NamedSource::new(source_path, source.to_string()),
            span: (offset, length).into(),
            label: label.to_string(),
            help: diagnostic
                .range
                .map(|range| format!("at line {}, column {}", range.start.line, range.start.character)),
        }
    }
}
