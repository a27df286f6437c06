//! CLI module for the minic compiler front end
//!
//! ## Usage
//!
//! - `minic <FILE>` - run all three passes and print every diagnostic
//! - `minic --lex <FILE>` - tokenize only, print the token table (debug)
//! - `minic --parse <FILE>` - lex + parse, print syntax/scope diagnostics (debug)
//! - `minic --types <FILE>` - lex + type-check, print type diagnostics (debug)
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros. Command
//! functions return `CliResult<T>` instead of calling `process::exit`; only
//! the top-level `run()` function handles errors and exits.

pub mod commands;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use thiserror::Error;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Carries a user-facing message and an exit code; the entry point prints
/// the message and exits with the code.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// The Mini-C compiler front end
#[derive(Parser, Debug)]
#[command(name = "minic")]
#[command(version = VERSION)]
#[command(about = "Analyze Mini-C source files and report diagnostics", long_about = None)]
pub struct Cli {
    /// File to analyze with all three passes (default action)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    // Debug/development flags
    /// Tokenize only (debug)
    #[arg(long = "lex", value_name = "FILE", conflicts_with = "file")]
    pub lex_file: Option<PathBuf>,

    /// Parse only (debug)
    #[arg(long = "parse", value_name = "FILE", conflicts_with = "file")]
    pub parse_file: Option<PathBuf>,

    /// Type-check only (debug)
    #[arg(long = "types", value_name = "FILE", conflicts_with = "file")]
    pub types_file: Option<PathBuf>,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return its exit code.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    if let Some(file) = cli.lex_file {
        return commands::lex_file(&file.to_string_lossy());
    }
    if let Some(file) = cli.parse_file {
        return commands::parse_file(&file.to_string_lossy());
    }
    if let Some(file) = cli.types_file {
        return commands::check_types_file(&file.to_string_lossy());
    }

    if let Some(file) = cli.file {
        commands::analyze_file(&file.to_string_lossy())
    } else {
        Err(CliError::failure(
            "error: no input file (try 'minic --help')",
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_default_file() {
        let cli = Cli::try_parse_from(["minic", "program.mc"]).unwrap();
        assert!(cli.file.is_some());
        assert!(cli.lex_file.is_none());
    }

    #[test]
    fn test_cli_parse_debug_flags() {
        let cli = Cli::try_parse_from(["minic", "--lex", "program.mc"]).unwrap();
        assert!(cli.lex_file.is_some());

        let cli = Cli::try_parse_from(["minic", "--parse", "program.mc"]).unwrap();
        assert!(cli.parse_file.is_some());

        let cli = Cli::try_parse_from(["minic", "--types", "program.mc"]).unwrap();
        assert!(cli.types_file.is_some());
    }

    #[test]
    fn test_cli_debug_flags_conflict_with_file() {
        assert!(Cli::try_parse_from(["minic", "program.mc", "--lex", "other.mc"]).is_err());
    }
}
