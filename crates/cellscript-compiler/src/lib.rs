//! # cellscript-compiler
//!
//! The analysis and evaluation pipeline for the cellscript formula
//! language:
//!
//! text → [`SourceText`] → [`lexer`] → token stream → [`parser`] →
//! syntax tree → [`binder`] → bound tree + [`DependencyScope`] →
//! [`evaluator`] → value + updated cells + diagnostics
//!
//! Every phase is fault-tolerant: malformed input produces diagnostics
//! and placeholder nodes, never a panic or an `Err`. The public compile
//! API that drives this pipeline lives in the `cellscript` crate.
//!
//! [`SourceText`]: cellscript_core::SourceText

pub mod binder;
pub mod bound;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod scope;
pub mod syntax;
pub mod token;

pub use binder::{Binder, CompilerOptions};
pub use bound::{
    BoundBinaryOperator, BoundCompilationUnit, BoundExpr, BoundStatement, BoundUnaryOperator,
};
pub use evaluator::Evaluator;
pub use lexer::{tokenize, Lexer};
pub use parser::Parser;
pub use scope::{Cell, CellId, DependencyScope};
pub use syntax::SyntaxNode;
pub use token::{token_at, Token, TokenKind};
