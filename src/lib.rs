#![forbid(unsafe_code)]
//! Mini-C Compiler Front End
//!
//! `minic` analyzes programs written in a small, C-like teaching language
//! and reports lexical, syntax, and semantic diagnostics. It generates no
//! code and executes nothing: the pipeline is scan → parse (with nested
//! scope tracking) → an independent flat-table type-compatibility pass.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: analysis findings are `Diagnostic` values, never
//!   `Err` and never panics; `Result` is reserved for the CLI boundary
//!   (unreadable files, bad arguments).
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod frontend;

pub use frontend::analyze;
pub use frontend::diagnostics;
pub use frontend::lexer;
pub use frontend::parser;
pub use frontend::symbols;
pub use frontend::typechecker;
