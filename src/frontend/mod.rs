//! Mini-C Compiler Frontend
//!
//! This module contains all frontend components:
//! - `lexer`: tokenization of source code
//! - `parser`: recursive-descent syntax and scope checking
//! - `typechecker`: independent flat-table type compatibility pass
//! - `symbols`: scope stack used by the parser
//! - `diagnostics`: the diagnostic record and its rendering

pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod symbols;
pub mod typechecker;

use diagnostics::Diagnostic;

/// Run all three analysis passes over a source text and merge their
/// diagnostics in pass order.
///
/// The lexer's token sequence is handed to the parser and the type checker
/// *independently*; the two passes share no state and may report the same
/// root cause twice, by design.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn analyze(source: &str) -> Vec<Diagnostic> {
    let (tokens, mut diagnostics) = lexer::lex(source);
    diagnostics.extend(parser::parse(&tokens));
    diagnostics.extend(typechecker::check(&tokens));
    diagnostics
}
