//! msc: The mscript syntax checker CLI.
//!
//! Usage:
//!   msc [options] [file...]
//!
//! Parses each script, reports lexical and syntax errors, and can dump
//! tokens or the syntax tree.

mod diagnostic;
mod report;

use clap::Parser as ClapParser;
use diagnostic::SourceDiagnostic;
use mscript_options::{parse_config_file, ConfigError, ParserOptions, ProjectConfig};
use rayon::prelude::*;
use report::{check_file, FileReport};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use tracing::debug;

#[derive(ClapParser, Debug)]
#[command(name = "msc", about = "msc - A fast MiniScript syntax checker written in Rust", disable_version_flag = true)]
struct Cli {
    /// Script files to check.
    #[arg(value_name = "FILE")]
    files: Vec<String>,

    /// Path to mscript.json.
    #[arg(short = 'p', long = "project")]
    project: Option<String>,

    /// Stop at the first error in each file.
    #[arg(long, conflicts_with = "permissive")]
    strict: bool,

    /// Report every error in each file.
    #[arg(long)]
    permissive: bool,

    /// Display width of a tab character.
    #[arg(long = "tab-width", value_name = "N")]
    tab_width: Option<u32>,

    /// Print the syntax tree of each file.
    #[arg(long = "print-ast")]
    print_ast: bool,

    /// Print the token stream of each file.
    #[arg(long)]
    tokens: bool,

    /// Print node statistics for each file.
    #[arg(long)]
    stats: bool,

    /// Emit one JSON report per file instead of text.
    #[arg(long)]
    json: bool,

    /// Enable pretty printing for diagnostics.
    #[arg(long, default_value_t = true)]
    pretty: bool,

    /// Print the version.
    #[arg(short = 'v', long)]
    version: bool,
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const PROJECT_FILE: &str = "mscript.json";
const DEFAULT_LOG_FILTER: &str = "warn";
/// Worker stack size; deeply nested scripts recurse up to the parser's
/// nesting limit.
const WORKER_STACK_SIZE: usize = 32 * 1024 * 1024;

fn main() {
    let cli = Cli::parse();

    if cli.version {
        println!("msc Version {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    init_tracing();
    let exit_code = run_check(&cli);
    process::exit(exit_code);
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = std::env::var("MSCRIPT_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .and_then(|expr| EnvFilter::try_new(expr).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn run_check(cli: &Cli) -> i32 {
    let start = Instant::now();

    let (files, config) = match resolve_input_files(cli) {
        Ok(resolved) => resolved,
        Err(e) => {
            print_error(&e.to_string());
            return 1;
        }
    };

    if files.is_empty() {
        print_error("No input files found.");
        return 1;
    }

    let options = match resolve_options(cli, config.as_ref()) {
        Ok(options) => options,
        Err(e) => {
            print_error(&e.to_string());
            return 1;
        }
    };

    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .stack_size(WORKER_STACK_SIZE)
        .build_global()
    {
        debug!(target: "mscript::cli", error = %e, "using existing thread pool");
    }
    debug!(target: "mscript::cli", files = files.len(), permissive = options.permissive, "checking");

    let reports: Vec<FileReport> = files
        .par_iter()
        .map(|path| check_file(path, &options, cli.tokens, cli.print_ast))
        .collect();

    let use_color = cli.pretty && std::io::stderr().is_terminal();
    let mut error_count = 0;
    let mut io_failed = false;

    for report in &reports {
        if cli.json {
            match serde_json::to_string(report) {
                Ok(line) => println!("{}", line),
                Err(e) => print_error(&format!("Failed to serialize report: {}", e)),
            }
        } else {
            print_report(report, use_color, cli.stats);
        }
        error_count += report.diagnostics.len();
        io_failed |= report.error.is_some();
    }

    if error_count > 0 && !cli.json {
        let plural = if error_count == 1 { "" } else { "s" };
        if use_color {
            eprintln!("\n{}Found {} error{}.{}", RED, error_count, plural, RESET);
        } else {
            eprintln!("\nFound {} error{}.", error_count, plural);
        }
    }

    if use_color && !cli.json {
        eprintln!(
            "{}Checked {} file{} in {:.2}s.{}",
            GRAY,
            reports.len(),
            if reports.len() == 1 { "" } else { "s" },
            start.elapsed().as_secs_f64(),
            RESET
        );
    }

    if io_failed {
        1
    } else if error_count > 0 {
        2
    } else {
        0
    }
}

fn print_report(report: &FileReport, use_color: bool, stats: bool) {
    if let Some(ref error) = report.error {
        print_error(error);
        return;
    }

    for token in &report.tokens {
        println!("{}", token);
    }
    if let Some(ref tree) = report.tree {
        println!("{}", tree);
    }

    for diag in &report.diagnostics {
        match (use_color, report.source.as_deref()) {
            (true, Some(source)) => {
                let rich = SourceDiagnostic::from_parse_diagnostic(diag, &report.file, source);
                eprintln!("{:?}", miette::Report::new(rich));
            }
            _ => eprintln!("{}", diag),
        }
    }

    if stats {
        if let Some(ref counts) = report.stats {
            println!(
                "{}: {} statements, {} functions, {} assignments, {} calls, {} blocks, {} literals, {} comments",
                report.file,
                counts.statements,
                counts.functions,
                counts.assignments,
                counts.calls,
                counts.blocks,
                counts.literals,
                counts.comments
            );
        }
    }
}

fn resolve_input_files(cli: &Cli) -> Result<(Vec<String>, Option<ProjectConfig>), ConfigError> {
    if let Some(ref project) = cli.project {
        let (mut files, config) = load_files_from_project(Path::new(project))?;
        files.extend(cli.files.iter().cloned());
        Ok((files, Some(config)))
    } else if !cli.files.is_empty() {
        Ok((cli.files.clone(), None))
    } else if Path::new(PROJECT_FILE).exists() {
        let (files, config) = load_files_from_project(Path::new(PROJECT_FILE))?;
        Ok((files, Some(config)))
    } else {
        Ok((vec![], None))
    }
}

fn load_files_from_project(path: &Path) -> Result<(Vec<String>, ProjectConfig), ConfigError> {
    let config = parse_config_file(path)?;
    let root_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let files = config
        .resolve_files(&root_dir)
        .into_iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect();
    Ok((files, config))
}

/// Project options with command line overrides applied.
fn resolve_options(cli: &Cli, config: Option<&ProjectConfig>) -> Result<ParserOptions, ConfigError> {
    let mut options = config.map(|c| c.parser_options).unwrap_or_default();
    if cli.strict {
        options.permissive = false;
    }
    if cli.permissive {
        options.permissive = true;
    }
    if let Some(tab_width) = cli.tab_width {
        options.tab_width = tab_width;
    }
    options.validate()?;
    Ok(options)
}

fn print_error(msg: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("msc").chain(args.iter().copied()))
    }

    #[test]
    fn test_flag_overrides() {
        let config = ProjectConfig {
            parser_options: ParserOptions::permissive().with_tab_width(2),
            files: vec![],
        };

        let options = resolve_options(&cli(&["--strict", "a.ms"]), Some(&config)).unwrap();
        assert!(!options.permissive);
        assert_eq!(options.tab_width, 2);

        let options = resolve_options(&cli(&["--permissive", "--tab-width", "4"]), None).unwrap();
        assert!(options.permissive);
        assert_eq!(options.tab_width, 4);
    }

    #[test]
    fn test_invalid_tab_width() {
        let err = resolve_options(&cli(&["--tab-width", "0"]), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTabWidth(0)));
    }

    #[test]
    fn test_strict_conflicts_with_permissive() {
        let parsed = Cli::try_parse_from(["msc", "--strict", "--permissive"]);
        assert!(parsed.is_err());
    }
}
