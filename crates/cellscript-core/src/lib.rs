//! # cellscript-core
//!
//! Core data structures for the cellscript formula language:
//!
//! - [`Span`] — half-open byte ranges into source text
//! - [`SourceText`] — input text with a line index for line/column lookup
//! - [`Diagnostic`] / [`DiagnosticsBag`] — ordered diagnostic sink with
//!   severity gating
//!
//! Higher layers (lexer, parser, binder, evaluator) live in
//! `cellscript-compiler`; the public compile API lives in `cellscript`.

pub mod diagnostics;
pub mod source;
pub mod span;

pub use diagnostics::{Diagnostic, DiagnosticsBag, Severity};
pub use source::{Line, SourceText};
pub use span::Span;
