//! Diagnostics for the Mini-C front end
//!
//! Every analysis pass reports findings as plain [`Diagnostic`] records
//! appended to an ordered list. Diagnostics are never removed, merged, or
//! ranked; their order is discovery order within a pass.

/// The analysis pass a diagnostic originates from.
///
/// The parser tags its scope checks (`already declared`, `not declared`) as
/// [`Phase::Semantic`] even though they are raised during syntax-driven
/// traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lexical,
    Syntax,
    Semantic,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Lexical => write!(f, "lexical"),
            Phase::Syntax => write!(f, "syntax"),
            Phase::Semantic => write!(f, "semantic"),
        }
    }
}

/// A compile-time finding with its source location.
///
/// Line and column are 1-based. Diagnostics raised when the parser's cursor
/// has run past the end of the token sequence use the sentinel position
/// `0:0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub phase: Phase,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    pub fn new(phase: Phase, message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            phase,
            message: message.into(),
            line,
            column,
        }
    }

    pub fn lexical(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(Phase::Lexical, message, line, column)
    }

    pub fn syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(Phase::Syntax, message, line, column)
    }

    pub fn semantic(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(Phase::Semantic, message, line, column)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} error at {}:{}: {}",
            self.phase, self.line, self.column, self.message
        )
    }
}

/// Render a diagnostic with source context.
///
/// Produces a rustc-style report: a header line, a `-->` location arrow, the
/// offending source line, and a caret under the reported column. Sentinel
/// positions (line 0) render without source context.
pub fn render(file_name: &str, source: &str, diagnostic: &Diagnostic) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} error: {}\n",
        diagnostic.phase, diagnostic.message
    ));
    out.push_str(&format!(
        "  --> {}:{}:{}\n",
        file_name, diagnostic.line, diagnostic.column
    ));

    if diagnostic.line >= 1 {
        if let Some(line_text) = source.lines().nth(diagnostic.line - 1) {
            let gutter = diagnostic.line.to_string().len();
            out.push_str(&format!("  {:>gutter$} |\n", ""));
            out.push_str(&format!("  {} | {}\n", diagnostic.line, line_text));
            let pad = diagnostic.column.saturating_sub(1);
            out.push_str(&format!("  {:>gutter$} | {}^\n", "", " ".repeat(pad)));
        }
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================
