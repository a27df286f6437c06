//! Parser for the Mini-C teaching language
//!
//! Recursive descent over the token sequence, checking the grammar and, in
//! the same traversal, lexically-scoped declaration rules (redeclaration in
//! the innermost scope, use of undeclared names). It builds no AST: its only
//! output is the ordered diagnostic list.
//!
//! Error recovery is per-construct rather than panic-mode: a failed token
//! expectation reports one syntax diagnostic and returns from the current
//! parsing function without consuming; the enclosing statement loop then
//! retries at the unchanged cursor, and a wholly unrecognized statement
//! advances exactly one token. Every token access is bounds-checked, so a
//! cursor that runs past the end reports at the sentinel position `0:0`
//! instead of faulting.

use crate::frontend::diagnostics::Diagnostic;
use crate::frontend::lexer::{Token, TokenKind};
use crate::frontend::symbols::ScopeStack;

/// Parser state
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    scopes: ScopeStack,
    /// Defensive brace-balance counter, tracked through class and block
    /// entry/exit as a consistency check on top of the grammar itself.
    brace_depth: i32,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            scopes: ScopeStack::new(),
            brace_depth: 0,
        }
    }

    /// Parse the entire token stream and return every diagnostic found.
    ///
    /// Never panics: an empty token sequence reports a single "expected
    /// 'class' keyword" diagnostic at the sentinel position.
    pub fn parse(mut self) -> Vec<Diagnostic> {
        self.scopes.enter(); // global scope
        self.parse_class();
        self.scopes.exit();
        self.diagnostics
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.pos - 1]
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    /// Position for an error at the current cursor; `(0, 0)` past the end.
    fn error_position(&self) -> (usize, usize) {
        self.peek().map_or((0, 0), |t| (t.line, t.column))
    }

    fn syntax_error_here(&mut self, message: impl Into<String>) {
        let (line, column) = self.error_position();
        self.diagnostics
            .push(Diagnostic::syntax(message, line, column));
    }

    /// Consume the expected token kind, or report one syntax diagnostic at
    /// the offending position and leave the cursor unchanged.
    fn expect(&mut self, kind: TokenKind, message: &str) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            self.syntax_error_here(message);
            false
        }
    }

    /// Report an undeclared use unless the name resolves somewhere on the
    /// scope stack, innermost first.
    fn check_declared(&mut self, token: &Token) {
        if token.kind != TokenKind::Identifier {
            return;
        }
        if !self.scopes.is_declared(&token.lexeme) {
            self.diagnostics.push(Diagnostic::semantic(
                format!("variable '{}' has not been declared", token.lexeme),
                token.line,
                token.column,
            ));
        }
    }

    /// Declaration-check every identifier in the half-open token range
    /// `[start, self.pos)`. Used by the `for` and `while` clause re-scans;
    /// duplicates of checks already made during parsing are kept.
    fn check_identifiers_in_range(&mut self, start: usize) {
        let end = self.pos.min(self.tokens.len());
        for i in start..end {
            if self.tokens[i].kind == TokenKind::Identifier {
                let token = self.tokens[i].clone();
                self.check_declared(&token);
            }
        }
    }

    /// Register a declaration in the innermost scope, reporting a semantic
    /// diagnostic when the name is already present there. The newer binding
    /// replaces the older one either way.
    fn declare(&mut self, name_token: &Token, declared_type: &str) {
        if self.scopes.declare(&name_token.lexeme, declared_type) {
            self.diagnostics.push(Diagnostic::semantic(
                format!(
                    "variable '{}' already declared in this scope",
                    name_token.lexeme
                ),
                name_token.line,
                name_token.column,
            ));
        }
    }

    // ========================================================================
    // Class structure
    // ========================================================================

    fn parse_class(&mut self) {
        if !self.expect(TokenKind::Class, "expected 'class' keyword") {
            return;
        }
        if !self.expect(TokenKind::Identifier, "expected class name after 'class'") {
            return;
        }
        if !self.expect(TokenKind::LBrace, "expected '{' after class name") {
            return;
        }
        self.brace_depth += 1;
        self.scopes.enter();

        while !self.at_end() && !self.check(TokenKind::RBrace) {
            self.parse_statement();
        }

        if !self.expect(TokenKind::RBrace, "expected '}' to close the class") {
            return;
        }
        self.brace_depth -= 1;

        if self.brace_depth != 0 {
            self.syntax_error_here("unbalanced braces in class body");
        }

        self.scopes.exit();

        if !self.at_end() {
            self.syntax_error_here("code after class closing brace");
        }
    }

    /// Dispatch on the current token; only called when one exists.
    fn parse_statement(&mut self) {
        let Some(token) = self.peek() else {
            return;
        };
        match token.kind {
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            kind if kind.is_type_keyword() => self.parse_var_decl(),
            TokenKind::Print => self.parse_print(),
            TokenKind::Identifier => self.parse_assignment(),
            _ => {
                let lexeme = token.lexeme.clone();
                self.syntax_error_here(format!("invalid statement: '{lexeme}'"));
                self.advance();
            }
        }
    }

    // ========================================================================
    // Control structures
    // ========================================================================

    fn parse_if(&mut self) {
        if !self.expect(TokenKind::If, "expected 'if'") {
            return;
        }
        if !self.expect(TokenKind::LParen, "expected '(' after 'if'") {
            return;
        }

        self.parse_condition();

        if !self.expect(TokenKind::RParen, "expected ')' after the condition") {
            return;
        }
        if !self.expect(TokenKind::LBrace, "expected '{' to open the if body") {
            return;
        }
        self.brace_depth += 1;
        self.scopes.enter();

        while !self.at_end() && !self.check(TokenKind::RBrace) {
            self.parse_statement();
        }

        self.scopes.exit();
        if !self.expect(TokenKind::RBrace, "expected '}' to close the if body") {
            return;
        }
        self.brace_depth -= 1;
    }

    fn parse_while(&mut self) {
        if !self.expect(TokenKind::While, "expected 'while'") {
            return;
        }
        if !self.expect(TokenKind::LParen, "expected '(' after 'while'") {
            return;
        }

        let condition_start = self.pos;
        self.parse_condition();
        // Re-scan the whole condition so every identifier in it is checked,
        // not just the leading operands.
        self.check_identifiers_in_range(condition_start);

        if !self.expect(TokenKind::RParen, "expected ')' after the condition") {
            return;
        }
        if !self.expect(TokenKind::LBrace, "expected '{' to open the while body") {
            return;
        }
        self.brace_depth += 1;
        self.scopes.enter();

        while !self.at_end() && !self.check(TokenKind::RBrace) {
            self.parse_statement();
        }

        self.scopes.exit();
        if !self.expect(TokenKind::RBrace, "expected '}' to close the while body") {
            return;
        }
        self.brace_depth -= 1;
    }

    fn parse_for(&mut self) {
        if !self.expect(TokenKind::For, "expected 'for'") {
            return;
        }
        if !self.expect(TokenKind::LParen, "expected '(' after 'for'") {
            return;
        }

        // --- Initializer: a new `int` declaration, an existing identifier,
        // or empty. ---
        if self.check(TokenKind::Int) {
            self.advance();
            if !self.expect(
                TokenKind::Identifier,
                "expected identifier in the for initializer",
            ) {
                return;
            }
            let name_token = self.previous().clone();
            // The loop variable lands in the *enclosing* scope; only the
            // body below gets a scope of its own.
            self.declare(&name_token, "int");

            if self.check(TokenKind::Assign) {
                self.advance();
                let start = self.pos;
                self.parse_expression();
                self.check_identifiers_in_range(start);
            }
        } else if self.check(TokenKind::Identifier) {
            let token = self.peek().cloned();
            if let Some(token) = token {
                self.check_declared(&token);
            }
            self.advance();
            if self.check(TokenKind::Assign) {
                self.advance();
                let start = self.pos;
                self.parse_expression();
                self.check_identifiers_in_range(start);
            }
        }

        if !self.expect(TokenKind::Semicolon, "expected ';' after the for initializer") {
            return;
        }

        // --- Condition (may be empty). ---
        let condition_start = self.pos;
        if !self.check(TokenKind::Semicolon) {
            self.parse_condition();
        }
        self.check_identifiers_in_range(condition_start);

        if !self.expect(TokenKind::Semicolon, "expected ';' after the for condition") {
            return;
        }

        // --- Step (may be empty). Only `i++` and `i += expr` are
        // recognized; other forms fall through to the ')' expectation. ---
        let step_start = self.pos;
        if !self.check(TokenKind::RParen) {
            if self.expect(
                TokenKind::Identifier,
                "expected identifier in the for step",
            ) {
                let name_token = self.previous().clone();
                self.check_declared(&name_token);

                if self.check(TokenKind::Plus) {
                    self.advance();
                    if self.check(TokenKind::Plus) {
                        self.advance();
                    } else if self.check(TokenKind::Assign) {
                        self.advance();
                        self.parse_expression();
                        self.check_identifiers_in_range(step_start);
                    }
                }
            }
        }

        if !self.expect(TokenKind::RParen, "expected ')' after the for clauses") {
            return;
        }
        if !self.expect(TokenKind::LBrace, "expected '{' to open the for body") {
            return;
        }
        self.brace_depth += 1;
        self.scopes.enter();

        while !self.at_end() && !self.check(TokenKind::RBrace) {
            self.parse_statement();
        }

        self.scopes.exit();
        if !self.expect(TokenKind::RBrace, "expected '}' to close the for body") {
            return;
        }
        self.brace_depth -= 1;
    }

    // ========================================================================
    // Simple statements
    // ========================================================================

    fn parse_var_decl(&mut self) {
        // Caller guarantees the current token is a type keyword.
        let Some(type_token) = self.peek().cloned() else {
            return;
        };
        let declared_kind = type_token.kind;
        self.advance();

        if !self.expect(TokenKind::Identifier, "expected variable name") {
            return;
        }
        let name_token = self.previous().clone();
        self.declare(&name_token, &type_token.lexeme);

        if self.check(TokenKind::Assign) {
            self.advance();
            // A matching literal after '=' is consumed directly; anything
            // else is parsed as an expression and left to the independent
            // type pass.
            if declared_kind == TokenKind::CharKw && self.check(TokenKind::CharLiteral) {
                self.advance();
            } else if declared_kind == TokenKind::StringKw && self.check(TokenKind::StringLiteral)
            {
                self.advance();
            } else {
                self.parse_expression();
            }
        }

        self.expect(
            TokenKind::Semicolon,
            "expected ';' at the end of the declaration",
        );
    }

    fn parse_assignment(&mut self) {
        let Some(target) = self.peek().cloned() else {
            return;
        };
        self.advance();
        self.check_declared(&target);

        if !self.expect(TokenKind::Assign, "expected '=' in the assignment") {
            return;
        }

        self.parse_expression();

        self.expect(
            TokenKind::Semicolon,
            "expected ';' at the end of the assignment",
        );
    }

    fn parse_print(&mut self) {
        if !self.expect(TokenKind::Print, "expected 'print'") {
            return;
        }
        if !self.expect(TokenKind::LParen, "expected '(' after 'print'") {
            return;
        }

        // The argument must be a double-quoted string (possibly empty).
        if !self.check(TokenKind::StringLiteral) {
            self.syntax_error_here("expected a double-quoted string in 'print'");
            return;
        }
        self.advance();

        if !self.expect(TokenKind::RParen, "expected ')' after the print message") {
            return;
        }
        self.expect(
            TokenKind::Semicolon,
            "expected ';' at the end of the print statement",
        );
    }

    // ========================================================================
    // Conditions and expressions
    // ========================================================================

    /// `cond := operand (cmpOrLogicOp operand)*`
    ///
    /// Scanned as an operand/operator state machine up to the closing `)`
    /// (or the `;` that ends a `for` condition), so a malformed condition
    /// reports locally and keeps going.
    fn parse_condition(&mut self) {
        let mut expecting_operand = true;

        while !self.at_end() && !self.check(TokenKind::RParen) && !self.check(TokenKind::Semicolon)
        {
            if expecting_operand {
                if self.check(TokenKind::LParen) {
                    self.advance();
                    self.parse_condition();
                    if !self.expect(
                        TokenKind::RParen,
                        "expected ')' after the grouped condition",
                    ) {
                        return;
                    }
                    expecting_operand = false;
                } else if self.check(TokenKind::Identifier)
                    || self.check(TokenKind::IntLiteral)
                    || self.check(TokenKind::DecimalLiteral)
                {
                    if self.check(TokenKind::Identifier) {
                        let token = self.peek().cloned();
                        if let Some(token) = token {
                            self.check_declared(&token);
                        }
                    }
                    self.advance();
                    expecting_operand = false;
                } else {
                    let lexeme = self.peek().map(|t| t.lexeme.clone()).unwrap_or_default();
                    self.syntax_error_here(format!(
                        "expected an operand (variable or value), found '{lexeme}'"
                    ));
                    self.advance();
                }
            } else if self.peek().is_some_and(|t| {
                t.kind.is_comparison()
                    || t.kind == TokenKind::AndAnd
                    || t.kind == TokenKind::OrOr
            }) {
                self.advance();
                expecting_operand = true;
            } else {
                let lexeme = self.peek().map(|t| t.lexeme.clone()).unwrap_or_default();
                self.syntax_error_here(format!(
                    "expected a comparison or logical operator, found '{lexeme}'"
                ));
                self.advance();
            }
        }
    }

    /// `expr := term ((+|-|*|/) term)*`
    fn parse_expression(&mut self) {
        self.parse_term();

        while self.peek().is_some_and(|t| {
            matches!(
                t.kind,
                TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash
            )
        }) {
            self.advance();
            self.parse_term();
        }
    }

    /// `term := IDENT | INT | DECIMAL | CHAR | '(' expr ')'`
    fn parse_term(&mut self) {
        let Some(token) = self.peek().cloned() else {
            self.syntax_error_here("unexpected end of input in expression");
            return;
        };
        match token.kind {
            TokenKind::Identifier => {
                self.check_declared(&token);
                self.advance();
            }
            TokenKind::IntLiteral | TokenKind::DecimalLiteral | TokenKind::CharLiteral => {
                self.advance();
            }
            TokenKind::LParen => {
                self.advance();
                self.parse_expression();
                self.expect(TokenKind::RParen, "expected ')' after the expression");
            }
            // A comparison operator here ends the term silently; the caller
            // decides whether it fits.
            kind if kind.is_comparison() => {}
            _ => {
                self.syntax_error_here(format!("invalid term: '{}'", token.lexeme));
                self.advance();
            }
        }
    }
}

/// Convenience function to parse a token sequence.
///
/// This is a shorthand for `Parser::new(tokens).parse()`.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Vec<Diagnostic> {
    let diagnostics = Parser::new(tokens).parse();
    tracing::debug!(diagnostics = diagnostics.len(), "parsing finished");
    diagnostics
}

// ============================================================================
// TESTS
// ============================================================================
