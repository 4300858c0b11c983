//! Binder
//!
//! Walks the syntax tree, resolves cell names against the scope, and
//! builds the bound tree. Binding an assignment also updates the
//! dependency graph, so repeated binds against the same scope keep the
//! graph current without rebuilding it.

use crate::bound::{
    BoundBinaryOperator, BoundCompilationUnit, BoundExpr, BoundStatement, BoundUnaryOperator,
};
use crate::scope::{CellId, DependencyScope};
use crate::syntax::SyntaxNode;
use crate::token::{Token, TokenKind};
use ahash::AHashSet;
use cellscript_core::{DiagnosticsBag, SourceText, Span};
use std::rc::Rc;

/// Compiler configuration surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompilerOptions {
    /// When true, referencing an undeclared cell silently declares it
    /// with value 0 instead of reporting a diagnostic.
    pub auto_declare: bool,
}

pub struct Binder<'a> {
    source: &'a SourceText,
    scope: &'a mut DependencyScope,
    diagnostics: &'a mut DiagnosticsBag,
    options: CompilerOptions,
}

impl<'a> Binder<'a> {
    pub fn new(
        source: &'a SourceText,
        scope: &'a mut DependencyScope,
        diagnostics: &'a mut DiagnosticsBag,
        options: CompilerOptions,
    ) -> Self {
        Self {
            source,
            scope,
            diagnostics,
            options,
        }
    }

    pub fn bind_compilation_unit(&mut self, unit: &SyntaxNode) -> BoundCompilationUnit {
        let span = unit.span();
        let statements = match unit {
            SyntaxNode::CompilationUnit { statements, .. } => {
                statements.iter().map(|s| self.bind_statement(s)).collect()
            }
            // Not produced by the parser's entry point, but binding a
            // bare statement is harmless.
            other => vec![self.bind_statement(other)],
        };
        BoundCompilationUnit { statements, span }
    }

    fn bind_statement(&mut self, node: &SyntaxNode) -> BoundStatement {
        match node {
            SyntaxNode::Block { statements, .. } => BoundStatement::Block {
                statements: statements.iter().map(|s| self.bind_statement(s)).collect(),
                span: node.span(),
            },
            SyntaxNode::CellAssignment { left, right, .. } => {
                self.bind_cell_assignment(left, right, node.span())
            }
            expression => BoundStatement::Expression(self.bind_expression(expression)),
        }
    }

    fn bind_cell_assignment(
        &mut self,
        left: &SyntaxNode,
        right: &SyntaxNode,
        span: Span,
    ) -> BoundStatement {
        let SyntaxNode::CellReference { column, row } = left else {
            self.diagnostics
                .not_assignable(left.kind_name(), left.span());
            // Bind the expression anyway so its own problems surface.
            self.bind_expression(right);
            return BoundStatement::Expression(BoundExpr::Error { span });
        };

        // The expression binds first: a self-reference on the right side
        // sees the cell in its pre-assignment state.
        let expression = Rc::new(self.bind_expression(right));
        let target = self.bind_cell_reference(column, row, true);

        let mut referencing = AHashSet::new();
        expression.collect_references(&mut referencing);
        self.scope
            .rebind(target, Rc::clone(&expression), referencing, left.span());

        BoundStatement::CellAssignment {
            cell: target,
            expression,
            span,
        }
    }

    fn bind_expression(&mut self, node: &SyntaxNode) -> BoundExpr {
        match node {
            SyntaxNode::Literal(token) => self.bind_literal(token),
            SyntaxNode::CellReference { column, row } => {
                let cell = self.bind_cell_reference(column, row, false);
                BoundExpr::CellReference {
                    cell,
                    span: node.span(),
                }
            }
            SyntaxNode::UnaryExpression { operator, operand } => {
                self.bind_unary_expression(operator, operand, node.span())
            }
            SyntaxNode::BinaryExpression {
                left,
                operator,
                right,
            } => self.bind_binary_expression(left, operator, right, node.span()),
            SyntaxNode::Parenthesis { expression, .. } => self.bind_expression(expression),
            SyntaxNode::ErrorExpression(_) => BoundExpr::Error { span: node.span() },
            // Statement productions never appear in expression position;
            // report rather than crash if one ever does.
            other => {
                self.diagnostics
                    .missing_binding(other.kind_name(), other.span());
                BoundExpr::Error { span: other.span() }
            }
        }
    }

    fn bind_literal(&mut self, token: &Token) -> BoundExpr {
        let span = token.span;
        match token.kind {
            TokenKind::Number => BoundExpr::NumericLiteral {
                value: token.text(self.source).parse().unwrap_or(0.0),
                span,
            },
            kind => {
                // The grammar admits identifier literals; nothing binds
                // them in a numeric-only language.
                self.diagnostics.missing_binding(kind, span);
                BoundExpr::Error { span }
            }
        }
    }

    fn bind_unary_expression(
        &mut self,
        operator: &Token,
        operand: &SyntaxNode,
        span: Span,
    ) -> BoundExpr {
        let operand = self.bind_expression(operand);
        match Self::bind_unary_operator(operator.kind) {
            Some(bound) => BoundExpr::Unary {
                operator: bound,
                operand: Box::new(operand),
                span,
            },
            None => {
                self.diagnostics.missing_binding(operator.kind, operator.span);
                BoundExpr::Error { span }
            }
        }
    }

    fn bind_binary_expression(
        &mut self,
        left: &SyntaxNode,
        operator: &Token,
        right: &SyntaxNode,
        span: Span,
    ) -> BoundExpr {
        let left = self.bind_expression(left);
        let right = self.bind_expression(right);
        match Self::bind_binary_operator(operator.kind) {
            Some(bound) => BoundExpr::Binary {
                operator: bound,
                left: Box::new(left),
                right: Box::new(right),
                span,
            },
            None => {
                self.diagnostics.missing_binding(operator.kind, operator.span);
                BoundExpr::Error { span }
            }
        }
    }

    fn bind_unary_operator(kind: TokenKind) -> Option<BoundUnaryOperator> {
        match kind {
            TokenKind::Plus => Some(BoundUnaryOperator::Identity),
            TokenKind::Minus => Some(BoundUnaryOperator::Negation),
            _ => None,
        }
    }

    fn bind_binary_operator(kind: TokenKind) -> Option<BoundBinaryOperator> {
        match kind {
            TokenKind::Plus => Some(BoundBinaryOperator::Addition),
            TokenKind::Minus => Some(BoundBinaryOperator::Subtraction),
            TokenKind::Star => Some(BoundBinaryOperator::Multiplication),
            TokenKind::Slash => Some(BoundBinaryOperator::Division),
            TokenKind::Hat => Some(BoundBinaryOperator::Exponentiation),
            _ => None,
        }
    }

    /// Resolve `A1`-style tokens to a cell, creating it on first sight.
    /// `declare` is set for assignment targets; `auto_declare` extends
    /// it to plain references.
    fn bind_cell_reference(&mut self, column: &Token, row: &Token, declare: bool) -> CellId {
        let name = format!(
            "{}{}",
            column.text(self.source),
            row.text(self.source)
        );
        let id = self.scope.intern(&name);
        if declare || self.options.auto_declare {
            self.scope.declare(id);
        }
        if !self.scope.cell(id).is_declared() {
            let span = column.span.to(row.span);
            self.diagnostics.undeclared_cell(&name, span);
        }
        id
    }
}
