//! Evaluator
//!
//! Walks the bound tree and computes numeric values. Assigning a cell
//! stores its value and then cascades depth-first through the cell's
//! observers, re-evaluating each one transitively. Per-frame in-progress
//! markers break cycles: an observer whose evaluation frame is already
//! on the stack is skipped with a diagnostic, so evaluation always
//! terminates.

use crate::bound::{
    BoundBinaryOperator, BoundCompilationUnit, BoundExpr, BoundStatement, BoundUnaryOperator,
};
use crate::scope::{CellId, DependencyScope};
use cellscript_core::DiagnosticsBag;

pub struct Evaluator<'a> {
    scope: &'a mut DependencyScope,
    diagnostics: &'a mut DiagnosticsBag,
}

impl<'a> Evaluator<'a> {
    pub fn new(scope: &'a mut DependencyScope, diagnostics: &'a mut DiagnosticsBag) -> Self {
        Self { scope, diagnostics }
    }

    /// Evaluate every statement; the unit's value is the last
    /// statement's value. Touched cells keep their new values in the
    /// scope after the call.
    pub fn evaluate(&mut self, unit: &BoundCompilationUnit) -> f64 {
        self.scope.clear_run_markers();
        let mut value = 0.0;
        for statement in &unit.statements {
            value = self.evaluate_statement(statement);
        }
        value
    }

    fn evaluate_statement(&mut self, statement: &BoundStatement) -> f64 {
        match statement {
            BoundStatement::CellAssignment { cell, expression, .. } => {
                self.evaluate_cell_assignment(*cell, expression)
            }
            BoundStatement::Block { statements, .. } => {
                let mut value = 0.0;
                for statement in statements {
                    value = self.evaluate_statement(statement);
                }
                value
            }
            BoundStatement::Expression(expression) => self.evaluate_expression(expression),
        }
    }

    fn evaluate_cell_assignment(&mut self, cell: CellId, expression: &BoundExpr) -> f64 {
        self.scope.begin_evaluation(cell);
        let value = self.evaluate_expression(expression);
        self.scope.set_value(cell, value);
        tracing::trace!("'{}' = {}", self.scope.cell(cell).name(), value);

        // Depth-first cascade, one visit per observer edge. Observers
        // come out in id order so repeated runs report identically.
        for observer in self.scope.observers_sorted(cell) {
            if self.scope.is_evaluating(observer) {
                let observer_name = self.scope.cell(observer).name().to_string();
                let cell_name = self.scope.cell(cell).name().to_string();
                let span = self.scope.cell(observer).span();
                tracing::debug!("cycle via '{observer_name}', skipping");
                self.diagnostics
                    .circular_dependency(&observer_name, &cell_name, span);
                continue;
            }
            if let Some(expression) = self.scope.expression(observer) {
                self.evaluate_cell_assignment(observer, &expression);
            }
        }

        self.scope.finish_evaluation(cell);
        value
    }

    fn evaluate_expression(&mut self, expression: &BoundExpr) -> f64 {
        match expression {
            BoundExpr::NumericLiteral { value, .. } => *value,
            BoundExpr::CellReference { cell, .. } => self.scope.cell(*cell).value(),
            BoundExpr::Unary { operator, operand, .. } => {
                let value = self.evaluate_expression(operand);
                match operator {
                    BoundUnaryOperator::Identity => value,
                    BoundUnaryOperator::Negation => -value,
                }
            }
            BoundExpr::Binary {
                operator,
                left,
                right,
                span,
            } => {
                let left = self.evaluate_expression(left);
                let right = self.evaluate_expression(right);
                match operator {
                    BoundBinaryOperator::Addition => left + right,
                    BoundBinaryOperator::Subtraction => left - right,
                    BoundBinaryOperator::Multiplication => left * right,
                    BoundBinaryOperator::Division => {
                        if right == 0.0 {
                            // IEEE result stands; evaluation continues.
                            self.diagnostics.division_by_zero(*span);
                        }
                        left / right
                    }
                    BoundBinaryOperator::Exponentiation => left.powf(right),
                }
            }
            BoundExpr::Error { .. } => 0.0,
        }
    }
}
