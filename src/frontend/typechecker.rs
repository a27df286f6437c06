//! Type-compatibility analysis for the Mini-C teaching language
//!
//! A second semantic pass, fully independent of the parser: it re-scans the
//! raw token sequence with a single *flat* symbol table (no scope nesting).
//! A later declaration of a name overwrites the earlier one for the rest of
//! the scan, even when, in the parser's model, the earlier declaration's
//! scope has since closed — the two passes may therefore disagree on
//! shadowed names, and that divergence is deliberate, tested behavior.

use std::collections::HashMap;

use crate::frontend::diagnostics::Diagnostic;
use crate::frontend::lexer::{Token, TokenKind};

/// Coarse type assigned to values the flat pass cannot resolve.
const UNKNOWN: &str = "unknown";

/// The fixed widening table over the language's finite type set.
///
/// `string` and `char` only accept themselves, `int` only `int`, `float`
/// accepts `int` and `float`, and `double` accepts `int`, `float`, and
/// `double`. Every other pair — including anything involving `unknown` — is
/// incompatible.
pub fn is_assignable(declared: &str, value: &str) -> bool {
    matches!(
        (declared, value),
        ("string", "string")
            | ("char", "char")
            | ("int", "int")
            | ("float", "int")
            | ("float", "float")
            | ("double", "int")
            | ("double", "float")
            | ("double", "double")
    )
}

/// Type checker state
#[derive(Debug, Default)]
pub struct TypeChecker {
    /// Flat name → declared-type table, rebuilt on every `check` call.
    symbols: HashMap<String, String>,
    diagnostics: Vec<Diagnostic>,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the token sequence for declarations and assignments and report
    /// every type incompatibility and undeclared assignment target.
    ///
    /// State is reset on entry, so an instance is reusable across
    /// sequential invocations.
    pub fn check(&mut self, tokens: &[Token]) -> Vec<Diagnostic> {
        self.symbols.clear();
        self.diagnostics.clear();

        let mut i = 0;
        while i < tokens.len() {
            // [TYPE, IDENT] — register (overwriting) the declaration, then
            // validate a directly attached `= value`.
            if tokens[i].kind.is_type_keyword()
                && i + 1 < tokens.len()
                && tokens[i + 1].kind == TokenKind::Identifier
            {
                let declared_type = tokens[i].lexeme.clone();
                let name = &tokens[i + 1];
                self.symbols
                    .insert(name.lexeme.clone(), declared_type.clone());

                if i + 3 < tokens.len() && tokens[i + 2].kind == TokenKind::Assign {
                    let value = &tokens[i + 3];
                    if declared_type == "string" && value.kind != TokenKind::StringLiteral {
                        self.diagnostics.push(Diagnostic::semantic(
                            "string variables must be assigned a double-quoted value",
                            value.line,
                            value.column,
                        ));
                    } else {
                        self.check_assignment(&declared_type, value, name.line, name.column);
                    }
                    i += 3;
                }
                i += 1;
            }
            // [IDENT, =, value] — a reassignment of a (hopefully) known name.
            else if tokens[i].kind == TokenKind::Identifier
                && i + 1 < tokens.len()
                && tokens[i + 1].kind == TokenKind::Assign
                && i + 2 < tokens.len()
            {
                let target = &tokens[i];
                if let Some(declared_type) = self.symbols.get(&target.lexeme).cloned() {
                    let value = &tokens[i + 2];
                    if declared_type == "string" && value.kind != TokenKind::StringLiteral {
                        self.diagnostics.push(Diagnostic::semantic(
                            "string variables must be assigned a double-quoted value",
                            value.line,
                            value.column,
                        ));
                    } else {
                        self.check_assignment(&declared_type, value, target.line, target.column);
                    }
                    i += 2;
                } else {
                    self.diagnostics.push(Diagnostic::semantic(
                        format!("variable '{}' has not been declared", target.lexeme),
                        target.line,
                        target.column,
                    ));
                }
                i += 1;
            } else {
                i += 1;
            }
        }

        std::mem::take(&mut self.diagnostics)
    }

    /// Resolve the value's coarse type and test it against the widening
    /// table, reporting an incompatibility at the given position.
    fn check_assignment(&mut self, declared_type: &str, value: &Token, line: usize, column: usize) {
        let value_type = match value.kind {
            TokenKind::StringLiteral => "string".to_string(),
            TokenKind::CharLiteral => "char".to_string(),
            TokenKind::IntLiteral => "int".to_string(),
            TokenKind::DecimalLiteral => "double".to_string(),
            TokenKind::Identifier => self
                .symbols
                .get(&value.lexeme)
                .cloned()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            _ => UNKNOWN.to_string(),
        };

        if !is_assignable(declared_type, &value_type) {
            self.diagnostics.push(Diagnostic::semantic(
                format!(
                    "type incompatibility: cannot assign {} (type {}) to {}",
                    value.lexeme, value_type, declared_type
                ),
                line,
                column,
            ));
        }
    }
}

/// Convenience function to type-check a token sequence.
///
/// This is a shorthand for `TypeChecker::new().check(tokens)`.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn check(tokens: &[Token]) -> Vec<Diagnostic> {
    let diagnostics = TypeChecker::new().check(tokens);
    tracing::debug!(diagnostics = diagnostics.len(), "type checking finished");
    diagnostics
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::diagnostics::Phase;
    use crate::frontend::lexer::lex;

    /// The flat pass ignores everything but its two patterns, so bare
    /// statement snippets are enough — no class wrapper required.
    fn check_source(source: &str) -> Vec<Diagnostic> {
        let (tokens, _) = lex(source);
        check(&tokens)
    }

    #[test]
    fn test_widening_table() {
        assert!(is_assignable("string", "string"));
        assert!(is_assignable("char", "char"));
        assert!(is_assignable("int", "int"));
        assert!(is_assignable("float", "int"));
        assert!(is_assignable("float", "float"));
        assert!(is_assignable("double", "int"));
        assert!(is_assignable("double", "float"));
        assert!(is_assignable("double", "double"));

        assert!(!is_assignable("int", "double"));
        assert!(!is_assignable("float", "double"));
        assert!(!is_assignable("char", "int"));
        assert!(!is_assignable("string", "char"));
        assert!(!is_assignable("int", "unknown"));
        assert!(!is_assignable("unknown", "int"));
    }

    #[test]
    fn test_matching_declarations_pass() {
        assert_eq!(check_source("int x = 5;"), vec![]);
        assert_eq!(check_source("double d = 3.5;"), vec![]);
        assert_eq!(check_source("char c = 'a';"), vec![]);
        assert_eq!(check_source("string s = \"hi\";"), vec![]);
    }

    #[test]
    fn test_int_widens_to_double() {
        assert_eq!(check_source("double d = 3;"), vec![]);
        assert_eq!(check_source("float f = 3;"), vec![]);
    }

    #[test]
    fn test_decimal_into_int_is_incompatible() {
        let diagnostics = check_source("int i = 3.5;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].phase, Phase::Semantic);
        assert_eq!(
            diagnostics[0].message,
            "type incompatibility: cannot assign 3.5 (type double) to int"
        );
    }

    #[test]
    fn test_decimal_literal_is_double_not_float() {
        // Decimal literals resolve to double, which float does not accept.
        let diagnostics = check_source("float f = 3.5;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "type incompatibility: cannot assign 3.5 (type double) to float"
        );
    }

    #[test]
    fn test_string_requires_quoted_value() {
        let diagnostics = check_source("string s = 5;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "string variables must be assigned a double-quoted value"
        );
    }

    #[test]
    fn test_string_reassignment_requires_quoted_value() {
        let diagnostics = check_source("string s = \"ok\"; s = 'c';");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "string variables must be assigned a double-quoted value"
        );
    }

    #[test]
    fn test_undeclared_assignment_target() {
        let diagnostics = check_source("x = 3;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "variable 'x' has not been declared"
        );
    }

    #[test]
    fn test_redeclaration_is_not_a_conflict_here() {
        // The flat pass simply re-registers the name; redeclaration
        // diagnostics are the parser's job.
        assert_eq!(check_source("int x; int x;"), vec![]);
    }

    #[test]
    fn test_identifier_value_resolves_through_the_table() {
        assert_eq!(check_source("int a = 5; int b = a;"), vec![]);
        assert_eq!(check_source("int a = 5; double d = a;"), vec![]);

        let diagnostics = check_source("double d = 1.5; int i = d;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "type incompatibility: cannot assign d (type double) to int"
        );
    }

    #[test]
    fn test_unregistered_identifier_value_reports_incompatibility() {
        // An undeclared name used as a *value* resolves to `unknown` and
        // fails the widening table; it is not reported as "not declared".
        let diagnostics = check_source("int i = q;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "type incompatibility: cannot assign q (type unknown) to int"
        );
    }

    #[test]
    fn test_flat_table_ignores_block_boundaries() {
        // The parser would scope the inner `string x` away; the flat table
        // keeps it, so the later reassignment resolves against `string`.
        let source = "int x = 1; if (x < 2) { string x = \"s\"; } x = 5;";
        let diagnostics = check_source(source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "string variables must be assigned a double-quoted value"
        );
    }

    #[test]
    fn test_declaration_without_assignment_registers_type() {
        let diagnostics = check_source("int a; a = 2.5;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "type incompatibility: cannot assign 2.5 (type double) to int"
        );
    }

    #[test]
    fn test_checker_instance_resets_between_calls() {
        let (first_tokens, _) = lex("int a = 5;");
        let (second_tokens, _) = lex("a = 5;");

        let mut checker = TypeChecker::new();
        assert_eq!(checker.check(&first_tokens), vec![]);
        // `a` from the previous run must not leak into this one.
        let diagnostics = checker.check(&second_tokens);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "variable 'a' has not been declared"
        );
    }

    #[test]
    fn test_check_is_idempotent() {
        let (tokens, _) = lex("int x = 1.5; string s = 2; y = 3;");
        assert_eq!(check(&tokens), check(&tokens));
    }

    #[test]
    fn test_empty_token_sequence() {
        assert_eq!(check(&[]), vec![]);
    }
}
