//! mscript_options: mscript.json parsing and parser options.
//!
//! Parses project files and provides the ParserOptions structure shared by
//! the parser and the command line driver.

use mscript_diagnostics::ErrorPolicy;
use mscript_lexer::LexerOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options controlling a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserOptions {
    /// Display width of a tab character, used for reported columns.
    pub tab_width: u32,
    /// Keep going after errors instead of stopping at the first one.
    pub permissive: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            tab_width: 1,
            permissive: false,
        }
    }
}

impl ParserOptions {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn permissive() -> Self {
        Self {
            permissive: true,
            ..Self::default()
        }
    }

    pub fn with_tab_width(mut self, tab_width: u32) -> Self {
        self.tab_width = tab_width;
        self
    }

    pub fn policy(&self) -> ErrorPolicy {
        if self.permissive {
            ErrorPolicy::Permissive
        } else {
            ErrorPolicy::Strict
        }
    }

    pub fn lexer_options(&self) -> LexerOptions {
        LexerOptions {
            tab_width: self.tab_width,
            policy: self.policy(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tab_width == 0 {
            return Err(ConfigError::InvalidTabWidth(self.tab_width));
        }
        Ok(())
    }
}

/// The mscript.json file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub parser_options: ParserOptions,
    /// Scripts to parse, relative to the directory holding the config file.
    #[serde(default)]
    pub files: Vec<String>,
}

impl ProjectConfig {
    /// The configured files resolved against `base`.
    pub fn resolve_files(&self, base: &Path) -> Vec<PathBuf> {
        self.files.iter().map(|file| base.join(file)).collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid project file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tabWidth must be at least 1, got {0}")]
    InvalidTabWidth(u32),
}

/// Parse an mscript.json file from a string.
pub fn parse_config(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig = serde_json::from_str(content)?;
    config.parser_options.validate()?;
    Ok(config)
}

/// Parse an mscript.json file from a path.
pub fn parse_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParserOptions::default();
        assert_eq!(options.tab_width, 1);
        assert_eq!(options.policy(), ErrorPolicy::Strict);
        assert_eq!(ParserOptions::permissive().policy(), ErrorPolicy::Permissive);
    }

    #[test]
    fn test_parse_config() {
        let config = parse_config(
            r#"{ "parserOptions": { "tabWidth": 4, "permissive": true }, "files": ["main.ms"] }"#,
        )
        .unwrap();
        assert_eq!(config.parser_options.tab_width, 4);
        assert!(config.parser_options.permissive);
        assert_eq!(config.files, vec!["main.ms"]);

        let lexer = config.parser_options.lexer_options();
        assert_eq!(lexer.tab_width, 4);
        assert_eq!(lexer.policy, ErrorPolicy::Permissive);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = parse_config(r#"{ "parserOptions": { "permissive": true } }"#).unwrap();
        assert_eq!(config.parser_options.tab_width, 1);
        assert!(config.files.is_empty());

        let empty = parse_config("{}").unwrap();
        assert_eq!(empty, ProjectConfig::default());
    }

    #[test]
    fn test_rejects_zero_tab_width() {
        let err = parse_config(r#"{ "parserOptions": { "tabWidth": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTabWidth(0)));
        assert!(parse_config("{ not json").is_err());
    }

    #[test]
    fn test_resolve_files() {
        let config = ProjectConfig {
            files: vec!["a.ms".into(), "lib/b.ms".into()],
            ..ProjectConfig::default()
        };
        let files = config.resolve_files(Path::new("proj"));
        assert_eq!(files, vec![PathBuf::from("proj/a.ms"), PathBuf::from("proj/lib/b.ms")]);
    }

    #[test]
    fn test_missing_file() {
        let err = parse_config_file(Path::new("/nonexistent/mscript.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
