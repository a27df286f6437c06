//! Command implementations for the minic CLI

use std::fs;

use crate::cli::{CliError, CliResult, ExitCode};
use crate::frontend::diagnostics::{self, Diagnostic};
use crate::frontend::{analyze, lexer, parser, typechecker};

/// Read a source file, mapping I/O failures to a CLI error.
fn read_source(file_path: &str) -> CliResult<String> {
    fs::read_to_string(file_path)
        .map_err(|e| CliError::failure(format!("error: cannot read '{file_path}': {e}")))
}

/// Print diagnostics with source context and report whether any were found.
fn report(file_path: &str, source: &str, diagnostics: &[Diagnostic]) -> ExitCode {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostics::render(file_path, source, diagnostic));
    }
    if diagnostics.is_empty() {
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "{} diagnostic{} found",
            diagnostics.len(),
            if diagnostics.len() == 1 { "" } else { "s" }
        );
        ExitCode::FAILURE
    }
}

/// Run all three passes and print every diagnostic (default command).
pub fn analyze_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let diagnostics = analyze(&source);
    if diagnostics.is_empty() {
        println!("✓ No issues found");
    }
    Ok(report(file_path, &source, &diagnostics))
}

/// Tokenize only and print the token table (debug).
pub fn lex_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let (tokens, diagnostics) = lexer::lex(&source);
    for token in &tokens {
        println!(
            "{:>4}:{:<3} {:<16} {}",
            token.line,
            token.column,
            format!("{:?}", token.kind),
            token.lexeme
        );
    }
    Ok(report(file_path, &source, &diagnostics))
}

/// Lex and parse, printing syntax and scope diagnostics only (debug).
pub fn parse_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let (tokens, _) = lexer::lex(&source);
    let diagnostics = parser::parse(&tokens);
    Ok(report(file_path, &source, &diagnostics))
}

/// Lex and type-check, printing type diagnostics only (debug).
pub fn check_types_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let (tokens, _) = lexer::lex(&source);
    let diagnostics = typechecker::check(&tokens);
    Ok(report(file_path, &source, &diagnostics))
}
