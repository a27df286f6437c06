//! Scope management for the parser's declaration checks
//!
//! Lexical nesting is modeled as an owned stack of name → declared-type
//! maps. A scope is pushed on entering the class body or any `if`/`for`/
//! `while` block and popped on leaving it; lookup walks innermost →
//! outermost. Redeclaration is only ever checked against the innermost
//! scope, so shadowing an outer declaration is legal.

use std::collections::HashMap;

/// A stack of nested symbol scopes.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<HashMap<String, String>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a fresh scope.
    pub fn enter(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pop the innermost scope.
    pub fn exit(&mut self) {
        self.scopes.pop();
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Register a name in the innermost scope, replacing any previous
    /// binding there. Returns `true` if the name was already declared in
    /// that same scope.
    pub fn declare(&mut self, name: &str, declared_type: &str) -> bool {
        match self.scopes.last_mut() {
            Some(scope) => scope
                .insert(name.to_string(), declared_type.to_string())
                .is_some(),
            None => false,
        }
    }

    /// Resolve a name across the whole stack, innermost first.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).map(String::as_str))
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

// ============================================================================
// TESTS
// ============================================================================
