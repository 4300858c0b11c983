//! Bound tree
//!
//! The name-resolved counterpart of the syntax tree. Expressions refer
//! to cells by [`CellId`]; every node carries a span so the evaluator
//! can attach diagnostics to source locations.

use crate::scope::CellId;
use cellscript_core::Span;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundUnaryOperator {
    Identity,
    Negation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundBinaryOperator {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Exponentiation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoundExpr {
    NumericLiteral {
        value: f64,
        span: Span,
    },
    CellReference {
        cell: CellId,
        span: Span,
    },
    Unary {
        operator: BoundUnaryOperator,
        operand: Box<BoundExpr>,
        span: Span,
    },
    Binary {
        operator: BoundBinaryOperator,
        left: Box<BoundExpr>,
        right: Box<BoundExpr>,
        span: Span,
    },
    /// Placeholder for fragments that could not be bound; evaluates
    /// to zero.
    Error {
        span: Span,
    },
}

impl BoundExpr {
    pub fn span(&self) -> Span {
        match self {
            BoundExpr::NumericLiteral { span, .. }
            | BoundExpr::CellReference { span, .. }
            | BoundExpr::Unary { span, .. }
            | BoundExpr::Binary { span, .. }
            | BoundExpr::Error { span } => *span,
        }
    }

    /// Collect every cell this expression reads.
    pub fn collect_references(&self, into: &mut ahash::AHashSet<CellId>) {
        match self {
            BoundExpr::CellReference { cell, .. } => {
                into.insert(*cell);
            }
            BoundExpr::Unary { operand, .. } => operand.collect_references(into),
            BoundExpr::Binary { left, right, .. } => {
                left.collect_references(into);
                right.collect_references(into);
            }
            BoundExpr::NumericLiteral { .. } | BoundExpr::Error { .. } => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoundStatement {
    /// `cell :: expression`; the expression is shared with the cell's
    /// entry in the scope.
    CellAssignment {
        cell: CellId,
        expression: Rc<BoundExpr>,
        span: Span,
    },
    Block {
        statements: Vec<BoundStatement>,
        span: Span,
    },
    Expression(BoundExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundCompilationUnit {
    pub statements: Vec<BoundStatement>,
    pub span: Span,
}
