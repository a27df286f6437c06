//! Lexer for the Mini-C teaching language
//!
//! Handles tokenization including:
//! - Keywords (class, if, for, while, the type keywords, print, and, or)
//! - Identifiers and literals (integer, decimal, string, character)
//! - One- and two-character operators and delimiters (maximal munch)
//! - Line comments
//!
//! Scanning never fails: malformed input produces lexical diagnostics and
//! the scan continues to end of input.

use crate::frontend::diagnostics::Diagnostic;

/// Token types for Mini-C
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // ========== Keywords ==========
    Class,
    If,
    Else,
    For,
    While,
    Int,
    StringKw,
    CharKw,
    Float,
    Double,
    Print,
    AndKw,
    OrKw,

    // ========== Identifiers and literals ==========
    Identifier,
    IntLiteral,
    DecimalLiteral,
    StringLiteral,
    CharLiteral,

    // ========== Operators ==========
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /
    Assign, // =
    AndAnd, // &&
    OrOr,   // ||
    Lt,     // <
    Gt,     // >
    LtEq,   // <=
    GtEq,   // >=
    EqEq,   // ==
    NotEq,  // !=

    // ========== Delimiters ==========
    LParen,      // (
    RParen,      // )
    LBrace,      // {
    RBrace,      // }
    Semicolon,   // ;
    DoubleQuote, // " (consumed by string scanning in practice)
    SingleQuote, // ' (consumed by char scanning in practice)
}

impl TokenKind {
    /// Type keywords that can start a variable declaration.
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Int
                | TokenKind::StringKw
                | TokenKind::CharKw
                | TokenKind::Float
                | TokenKind::Double
        )
    }

    /// Comparison operators accepted inside conditions.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::LtEq
                | TokenKind::GtEq
                | TokenKind::EqEq
                | TokenKind::NotEq
        )
    }
}

/// A token with its kind, exact source text, and 1-based start position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }
}

/// Reserved word table (case-sensitive).
fn keyword_kind(lexeme: &str) -> Option<TokenKind> {
    match lexeme {
        "class" => Some(TokenKind::Class),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "for" => Some(TokenKind::For),
        "while" => Some(TokenKind::While),
        "int" => Some(TokenKind::Int),
        "string" => Some(TokenKind::StringKw),
        "char" => Some(TokenKind::CharKw),
        "float" => Some(TokenKind::Float),
        "double" => Some(TokenKind::Double),
        "print" => Some(TokenKind::Print),
        "and" => Some(TokenKind::AndKw),
        "or" => Some(TokenKind::OrKw),
        _ => None,
    }
}

/// Two-character operator table, tried before single characters.
fn two_char_kind(first: char, second: char) -> Option<TokenKind> {
    match (first, second) {
        ('&', '&') => Some(TokenKind::AndAnd),
        ('|', '|') => Some(TokenKind::OrOr),
        ('<', '=') => Some(TokenKind::LtEq),
        ('>', '=') => Some(TokenKind::GtEq),
        ('=', '=') => Some(TokenKind::EqEq),
        ('!', '=') => Some(TokenKind::NotEq),
        _ => None,
    }
}

/// Single-character operator and delimiter table.
fn one_char_kind(c: char) -> Option<TokenKind> {
    match c {
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Star),
        '/' => Some(TokenKind::Slash),
        '=' => Some(TokenKind::Assign),
        '<' => Some(TokenKind::Lt),
        '>' => Some(TokenKind::Gt),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '{' => Some(TokenKind::LBrace),
        '}' => Some(TokenKind::RBrace),
        ';' => Some(TokenKind::Semicolon),
        '"' => Some(TokenKind::DoubleQuote),
        '\'' => Some(TokenKind::SingleQuote),
        _ => None,
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lexer state
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the entire source.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        while self.pos < self.chars.len() {
            self.scan_token();
        }
        (self.tokens, self.diagnostics)
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn scan_token(&mut self) {
        let c = self.chars[self.pos];

        // Whitespace: counted, never tokenized.
        if c.is_whitespace() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
            return;
        }

        // Line comment: skip through the end of the line.
        if c == '/' && self.peek_next() == Some('/') {
            while self.pos < self.chars.len() && self.chars[self.pos] != '\n' {
                self.pos += 1;
            }
            if self.pos < self.chars.len() {
                self.pos += 1; // consume the newline as part of the comment
            }
            self.line += 1;
            self.column = 1;
            return;
        }

        if is_ident_start(c) {
            self.scan_identifier();
            return;
        }

        if c.is_ascii_digit() {
            self.scan_number();
            return;
        }

        if c == '"' || c == '\'' {
            self.scan_quoted_literal(c);
            return;
        }

        // Two-character operators win over single characters (maximal munch).
        if let Some(next) = self.peek_next() {
            if let Some(kind) = two_char_kind(c, next) {
                let lexeme: String = [c, next].iter().collect();
                self.tokens
                    .push(Token::new(kind, lexeme, self.line, self.column));
                self.pos += 2;
                self.column += 2;
                return;
            }
        }

        if let Some(kind) = one_char_kind(c) {
            self.tokens
                .push(Token::new(kind, c.to_string(), self.line, self.column));
            self.pos += 1;
            self.column += 1;
            return;
        }

        self.diagnostics.push(Diagnostic::lexical(
            format!("unrecognized character '{c}'"),
            self.line,
            self.column,
        ));
        self.pos += 1;
        self.column += 1;
    }

    /// Maximal munch of an identifier or keyword.
    fn scan_identifier(&mut self) {
        let start = self.pos;
        let start_column = self.column;
        while self.pos < self.chars.len() && is_ident_continue(self.chars[self.pos]) {
            self.pos += 1;
        }

        let lexeme: String = self.chars[start..self.pos].iter().collect();
        self.column += self.pos - start;

        let kind = keyword_kind(&lexeme).unwrap_or(TokenKind::Identifier);
        self.tokens
            .push(Token::new(kind, lexeme, self.line, start_column));
    }

    /// Maximal munch of digits and at most one decimal point.
    ///
    /// A second `.` stops the literal at the already-consumed prefix and
    /// reports a lexical diagnostic; the extra dot is left for the next scan
    /// step.
    fn scan_number(&mut self) {
        let start = self.pos;
        let start_column = self.column;
        let mut has_dot = false;

        while self.pos < self.chars.len()
            && (self.chars[self.pos].is_ascii_digit() || self.chars[self.pos] == '.')
        {
            if self.chars[self.pos] == '.' {
                if has_dot {
                    self.diagnostics.push(Diagnostic::lexical(
                        "number with multiple decimal points",
                        self.line,
                        start_column,
                    ));
                    break;
                }
                has_dot = true;
            }
            self.pos += 1;
        }

        let lexeme: String = self.chars[start..self.pos].iter().collect();
        self.column += self.pos - start;

        let kind = if has_dot {
            TokenKind::DecimalLiteral
        } else {
            TokenKind::IntLiteral
        };
        self.tokens
            .push(Token::new(kind, lexeme, self.line, start_column));
    }

    /// Scan a `"`- or `'`-delimited literal.
    ///
    /// Embedded newlines are tracked like ordinary whitespace. Reaching end
    /// of input first reports an unterminated-literal diagnostic but, for
    /// strings, still emits a token spanning everything scanned. Character
    /// literals canonicalize `''` and reject interiors longer than one
    /// character (diagnostic, no token).
    fn scan_quoted_literal(&mut self, delimiter: char) {
        let start = self.pos;
        let start_line = self.line;
        let start_column = self.column;
        let mut interior_len = 0usize;

        self.pos += 1;
        self.column += 1;

        while self.pos < self.chars.len() && self.chars[self.pos] != delimiter {
            if self.chars[self.pos] == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
            interior_len += 1;
        }

        let closed = self.pos < self.chars.len();
        if closed {
            self.pos += 1;
            self.column += 1;
        } else {
            self.diagnostics.push(Diagnostic::lexical(
                "unterminated string literal",
                self.line,
                self.column,
            ));
        }

        let lexeme: String = self.chars[start..self.pos].iter().collect();

        if delimiter == '\'' {
            if interior_len == 0 {
                // Empty character literal canonicalizes to the two-character lexeme.
                self.tokens
                    .push(Token::new(TokenKind::CharLiteral, "''", start_line, start_column));
            } else if interior_len != 1 {
                self.diagnostics.push(Diagnostic::lexical(
                    "too many characters in character literal",
                    start_line,
                    start_column,
                ));
            } else {
                self.tokens
                    .push(Token::new(TokenKind::CharLiteral, lexeme, start_line, start_column));
            }
        } else {
            self.tokens
                .push(Token::new(TokenKind::StringLiteral, lexeme, start_line, start_column));
        }
    }
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let (tokens, diagnostics) = Lexer::new(source).tokenize();
    tracing::debug!(
        tokens = tokens.len(),
        diagnostics = diagnostics.len(),
        "lexing finished"
    );
    (tokens, diagnostics)
}

// ============================================================================
// TESTS
// ============================================================================
