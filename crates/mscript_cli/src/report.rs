//! Per-file check results.

use mscript_ast::visitor::NodeCounter;
use mscript_diagnostics::Diagnostic;
use mscript_lexer::tokenize;
use mscript_parser::{parse, ParserOptions, SyntaxTree};
use serde::Serialize;
use tracing::{debug, warn};

/// Node statistics of a parsed file.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FileStats {
    pub statements: usize,
    pub lines: usize,
    pub functions: usize,
    pub assignments: usize,
    pub calls: usize,
    pub blocks: usize,
    pub identifiers: usize,
    pub literals: usize,
    pub comments: usize,
    pub invalid: usize,
}

impl FileStats {
    fn of(tree: &SyntaxTree, source: &str) -> Self {
        let counts = NodeCounter::count(&tree.ast, tree.root);
        Self {
            statements: tree.chunk().map_or(0, |chunk| chunk.body.len()),
            lines: source.lines().count(),
            functions: counts.functions,
            assignments: counts.assignments,
            calls: counts.calls,
            blocks: counts.blocks,
            identifiers: counts.identifiers,
            literals: counts.literals,
            comments: counts.comments,
            invalid: counts.invalid,
        }
    }
}

/// Everything printed for one input file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<FileStats>,
    #[serde(skip)]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<String>,
}

impl FileReport {
    fn failed(file: &str, error: String) -> Self {
        Self {
            file: file.to_string(),
            error: Some(error),
            diagnostics: vec![],
            stats: None,
            source: None,
            tokens: vec![],
            tree: None,
        }
    }
}

/// Read and parse one file. Never fails; IO problems land in `error`.
pub fn check_file(path: &str, options: &ParserOptions, dump_tokens: bool, dump_tree: bool) -> FileReport {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            warn!(target: "mscript::cli", file = path, error = %e, "unreadable input");
            return FileReport::failed(path, format!("Cannot read file '{}': {}", path, e));
        }
    };

    let tokens = if dump_tokens {
        match tokenize(&source, options.lexer_options()) {
            Ok((tokens, _)) => tokens.iter().map(|token| token.to_string()).collect(),
            // The parse below reports the same error.
            Err(_) => vec![],
        }
    } else {
        vec![]
    };

    let (diagnostics, stats, tree) = match parse(&source, options) {
        Ok(tree) => {
            let diagnostics = tree.diagnostics().cloned().collect();
            let printed = dump_tree.then(|| tree.print());
            (diagnostics, Some(FileStats::of(&tree, &source)), printed)
        }
        Err(err) => (vec![err.into_diagnostic()], None, None),
    };
    let diagnostics: Vec<Diagnostic> = diagnostics.into_iter().map(|diag| diag.in_file(path)).collect();

    debug!(target: "mscript::cli", file = path, errors = diagnostics.len(), "checked");

    FileReport {
        file: path.to_string(),
        error: None,
        diagnostics,
        stats,
        source: Some(source),
        tokens,
        tree,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_script(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("msc-{}-{}.ms", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_clean_file() {
        let path = temp_script("clean", "x = 1\nprint x\n");
        let report = check_file(&path, &ParserOptions::strict(), false, true);
        assert!(report.error.is_none());
        assert!(report.diagnostics.is_empty());
        let stats = report.stats.unwrap();
        assert_eq!(stats.statements, 2);
        assert_eq!(stats.assignments, 1);
        assert!(report.tree.unwrap().starts_with("Chunk"));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_errors_carry_file_name() {
        let path = temp_script("broken", "x = \ny = 2\nwhile a\n");
        let report = check_file(&path, &ParserOptions::permissive(), false, false);
        assert!(report.diagnostics.len() >= 2);
        assert!(report.diagnostics.iter().all(|diag| diag.file.as_deref() == Some(path.as_str())));

        let strict = check_file(&path, &ParserOptions::strict(), false, false);
        assert_eq!(strict.diagnostics.len(), 1);
        assert!(strict.stats.is_none());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let report = check_file("/nonexistent/missing.ms", &ParserOptions::default(), false, false);
        assert!(report.error.as_ref().unwrap().contains("Cannot read file"));
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("stats").is_none());
    }

    #[test]
    fn test_token_dump() {
        let path = temp_script("tokens", "x = 1");
        let report = check_file(&path, &ParserOptions::strict(), true, false);
        assert!(!report.tokens.is_empty());
        std::fs::remove_file(path).unwrap();
    }
}
