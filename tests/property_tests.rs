//! Property-based tests for the minic front end
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use minic::frontend::{analyze, lexer, parser, typechecker};
use proptest::prelude::*;

// =============================================================================
// Lexer properties
// =============================================================================

proptest! {
    /// Scanning is total: any string terminates without panicking.
    #[test]
    fn lex_never_panics(source in ".*") {
        let _ = lexer::lex(&source);
    }

    /// Scanning the same text twice yields identical tokens and diagnostics.
    #[test]
    fn lex_is_idempotent(source in ".*") {
        prop_assert_eq!(lexer::lex(&source), lexer::lex(&source));
    }

    /// Whitespace and comments never appear as tokens.
    #[test]
    fn lex_emits_no_whitespace_or_comment_lexemes(source in "[a-z0-9+*/ \t\n]*") {
        let (tokens, _) = lexer::lex(&source);
        for token in &tokens {
            prop_assert!(!token.lexeme.is_empty());
            prop_assert!(!token.lexeme.chars().all(char::is_whitespace));
            prop_assert!(!token.lexeme.starts_with("//"));
        }
    }

    /// Token start positions are lexicographically non-decreasing.
    #[test]
    fn lex_positions_non_decreasing(source in ".*") {
        let (tokens, _) = lexer::lex(&source);
        for pair in tokens.windows(2) {
            let a = (pair[0].line, pair[0].column);
            let b = (pair[1].line, pair[1].column);
            prop_assert!(a <= b, "positions went backwards: {:?} then {:?}", a, b);
        }
    }

    /// Positions are 1-based.
    #[test]
    fn lex_positions_are_one_based(source in ".*") {
        let (tokens, _) = lexer::lex(&source);
        for token in &tokens {
            prop_assert!(token.line >= 1);
            prop_assert!(token.column >= 1);
        }
    }
}

// =============================================================================
// Parser and type checker properties
// =============================================================================

proptest! {
    /// The parser is total over any lexed token sequence and never reports
    /// success by panicking or aborting early.
    #[test]
    fn parse_never_panics(source in ".*") {
        let (tokens, _) = lexer::lex(&source);
        let _ = parser::parse(&tokens);
    }

    /// Parsing the same unmodified token sequence twice yields identical
    /// diagnostic lists.
    #[test]
    fn parse_is_idempotent(source in ".*") {
        let (tokens, _) = lexer::lex(&source);
        prop_assert_eq!(parser::parse(&tokens), parser::parse(&tokens));
    }

    /// The flat type pass is total and idempotent as well.
    #[test]
    fn check_never_panics_and_is_idempotent(source in ".*") {
        let (tokens, _) = lexer::lex(&source);
        prop_assert_eq!(typechecker::check(&tokens), typechecker::check(&tokens));
    }

    /// The whole pipeline is total.
    #[test]
    fn analyze_never_panics(source in ".*") {
        let _ = analyze(&source);
    }
}

// =============================================================================
// Well-formed program generation
// =============================================================================

/// Identifiers that can never collide with a reserved word.
fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}".prop_filter("reserved word", |s| {
        !matches!(
            s.as_str(),
            "class"
                | "if"
                | "else"
                | "for"
                | "while"
                | "int"
                | "string"
                | "char"
                | "float"
                | "double"
                | "print"
                | "and"
                | "or"
        )
    })
}

proptest! {
    /// A well-formed int declaration inside a class is always clean.
    #[test]
    fn well_formed_int_declaration_is_clean(name in ident_strategy(), value in 0u32..1_000_000) {
        let source = format!("class A {{ int {name} = {value}; }}");
        prop_assert_eq!(analyze(&source), vec![]);
    }

    /// Integer literals widen into double without complaint.
    #[test]
    fn int_literal_widens_into_double(name in ident_strategy(), value in 0u32..1_000_000) {
        let source = format!("class A {{ double {name} = {value}; }}");
        prop_assert_eq!(analyze(&source), vec![]);
    }

    /// Decimal literals never fit an int declaration.
    #[test]
    fn decimal_literal_never_fits_int(
        name in ident_strategy(),
        whole in 0u32..10_000,
        frac in 0u32..100,
    ) {
        let source = format!("class A {{ int {name} = {whole}.{frac}; }}");
        let diagnostics = analyze(&source);
        prop_assert_eq!(diagnostics.len(), 1);
        prop_assert!(diagnostics[0].message.starts_with("type incompatibility"));
    }

    /// A counted loop over a fresh variable is always clean. The accumulator
    /// starts with an uppercase letter so the generated name cannot collide
    /// with it.
    #[test]
    fn well_formed_for_loop_is_clean(name in ident_strategy(), bound in 1u32..1000) {
        let source = format!(
            "class A {{ int Total; for (int {name} = 0; {name} < {bound}; {name}++) {{ Total = Total + {name}; }} }}"
        );
        prop_assert_eq!(analyze(&source), vec![]);
    }
}
