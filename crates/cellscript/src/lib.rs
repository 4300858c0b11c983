//! # cellscript
//!
//! An incremental compiler and evaluator for a spreadsheet-style
//! formula language: named cells (`A1`, `B7`, ...) hold literal numbers
//! or expressions over other cells; assigning a cell re-evaluates it
//! and cascades recomputation to everything that depends on it, with
//! circular dependencies detected and reported rather than looping.
//!
//! ```text
//! A1 :: 2+3*4      # A1 is 14
//! A2 :: A1/2       # A2 is 7; reassigning A1 recomputes A2
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cellscript::{compile, CompilerOptions};
//!
//! let result = compile("A1 :: 2+3*4", CompilerOptions::default());
//! assert_eq!(result.value(), 14.0);
//! assert!(result.is_ok());
//! ```
//!
//! Malformed input never panics: every phase reports into the
//! compilation's diagnostics and produces a best-effort placeholder so
//! later phases still run.

pub mod error;
pub mod prelude;
pub mod sheet;

pub use cellscript_compiler::{token_at, CompilerOptions, Token, TokenKind};
pub use cellscript_core::{Diagnostic, Severity, SourceText, Span};
pub use error::{Error, Result};
pub use sheet::{compile, Compilation, Sheet};
