//! Parser
//!
//! Recursive descent with precedence climbing. Always produces a tree:
//! unparseable fragments become [`SyntaxNode::ErrorExpression`] and a
//! recovering flag keeps one bad token from producing a cascade of
//! mismatch diagnostics.

use crate::syntax::SyntaxNode;
use crate::token::{Token, TokenKind};
use cellscript_core::{DiagnosticsBag, SourceText, Span};

pub struct Parser<'a> {
    source: &'a SourceText,
    tokens: &'a [Token],
    diagnostics: &'a mut DiagnosticsBag,
    position: usize,
    recovering: bool,
}

impl<'a> Parser<'a> {
    /// `tokens` must come from [`tokenize`], so the slice is non-empty
    /// and ends with an end-of-file token.
    ///
    /// [`tokenize`]: crate::lexer::tokenize
    pub fn new(
        source: &'a SourceText,
        tokens: &'a [Token],
        diagnostics: &'a mut DiagnosticsBag,
    ) -> Self {
        debug_assert!(
            tokens.last().map(|t| t.kind) == Some(TokenKind::EndOfFile),
            "token stream must end with end-of-file"
        );
        Self {
            source,
            tokens,
            diagnostics,
            position: 0,
            recovering: false,
        }
    }

    pub fn parse_compilation_unit(mut self) -> SyntaxNode {
        let mut statements = Vec::new();
        while self.has_token() {
            let start = self.position;
            statements.push(self.parse_block());
            // Progress guarantee: a statement that consumed nothing
            // means the current token fits nowhere, skip it.
            if self.position == start {
                self.position += 1;
            }
        }
        let end_of_file = self.expect(TokenKind::EndOfFile);
        SyntaxNode::CompilationUnit {
            statements,
            end_of_file,
        }
    }

    fn parse_block(&mut self) -> SyntaxNode {
        if !self.match_kind(TokenKind::OpenBrace) {
            return self.parse_cell_assignment();
        }
        let open_brace = self.next_token();
        let mut statements = Vec::new();
        while self.has_token() && !self.match_kind(TokenKind::CloseBrace) {
            let start = self.position;
            statements.push(self.parse_block());
            if self.position == start {
                self.position += 1;
            }
        }
        let close_brace = self.expect(TokenKind::CloseBrace);
        // Only report a genuinely closed, genuinely empty block; a
        // synthesized close brace is zero-width.
        if statements.is_empty() && !close_brace.span.is_empty() {
            self.diagnostics
                .empty_block(open_brace.span.to(close_brace.span));
        }
        SyntaxNode::Block {
            open_brace,
            statements,
            close_brace,
        }
    }

    fn parse_cell_assignment(&mut self) -> SyntaxNode {
        let left = self.parse_binary_expression(0);
        if self.peek(0).kind == TokenKind::ColonColon {
            let operator = self.next_token();
            let right = self.parse_binary_expression(0);
            return SyntaxNode::CellAssignment {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }
        left
    }

    fn parse_binary_expression(&mut self, parent_precedence: u8) -> SyntaxNode {
        let mut left = self.parse_unary_expression();
        loop {
            let precedence = self.peek(0).kind.binary_precedence();
            // Same-precedence operators associate left: recurse only
            // past the caller's floor.
            if precedence == 0 || precedence <= parent_precedence {
                break;
            }
            let operator = self.next_token();
            let right = self.parse_binary_expression(precedence);
            left = SyntaxNode::BinaryExpression {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }
        left
    }

    fn parse_unary_expression(&mut self) -> SyntaxNode {
        if self.peek(0).kind.unary_precedence() > 0 {
            let operator = self.next_token();
            let operand = self.parse_unary_expression();
            return SyntaxNode::UnaryExpression {
                operator,
                operand: Box::new(operand),
            };
        }
        self.parse_parenthesis()
    }

    fn parse_parenthesis(&mut self) -> SyntaxNode {
        if !self.match_kind(TokenKind::OpenParen) {
            return self.parse_cell_reference();
        }
        let open_paren = self.next_token();
        let expression = self.parse_binary_expression(0);
        let close_paren = self.expect(TokenKind::CloseParen);
        SyntaxNode::Parenthesis {
            open_paren,
            expression: Box::new(expression),
            close_paren,
        }
    }

    fn parse_cell_reference(&mut self) -> SyntaxNode {
        if self.match_pair(TokenKind::Identifier, TokenKind::Number) {
            let column = self.next_token();
            let row = self.next_token();
            // Trivia between the two halves still forms the reference,
            // but loose spacing is discouraged.
            let compact_name = row
                .has_trivia()
                .then(|| format!("{}{}", column.text(self.source), row.text(self.source)));
            let node = SyntaxNode::CellReference { column, row };
            if let Some(name) = compact_name {
                self.diagnostics
                    .compact_reference_required(&name, node.span());
            }
            return node;
        }
        self.parse_literal()
    }

    fn parse_literal(&mut self) -> SyntaxNode {
        match self.peek(0).kind {
            TokenKind::Identifier | TokenKind::Number => SyntaxNode::Literal(self.next_token()),
            _ => SyntaxNode::ErrorExpression(self.expect_synthesized(TokenKind::Bad, "expression")),
        }
    }

    fn has_token(&mut self) -> bool {
        !self.match_kind(TokenKind::EndOfFile)
    }

    fn peek(&self, offset: usize) -> &Token {
        let index = (self.position + offset).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    /// A successful kind match ends the recovering state.
    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.peek(0).kind == kind {
            self.recovering = false;
            return true;
        }
        false
    }

    fn match_pair(&mut self, first: TokenKind, second: TokenKind) -> bool {
        if self.peek(0).kind == first && self.peek(1).kind == second {
            self.recovering = false;
            return true;
        }
        false
    }

    fn next_token(&mut self) -> Token {
        let token = self.peek(0).clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    /// Consume a token of `kind`, or report a mismatch once and
    /// synthesize a zero-width placeholder so the tree keeps its shape.
    fn expect(&mut self, kind: TokenKind) -> Token {
        if self.match_kind(kind) {
            return self.next_token();
        }
        self.expect_synthesized(kind, kind)
    }

    fn expect_synthesized(&mut self, kind: TokenKind, expecting: impl std::fmt::Display) -> Token {
        let found = self.peek(0).kind;
        let span = self.peek(0).span;
        let placeholder = Token::new(kind, Span::empty(span.start));
        if self.recovering {
            return placeholder;
        }
        self.recovering = true;
        self.diagnostics.unexpected_token(found, expecting, span);
        placeholder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> (SyntaxNode, DiagnosticsBag, SourceText) {
        let source = SourceText::from(text);
        let mut diagnostics = DiagnosticsBag::new();
        let tokens = tokenize(&source, &mut diagnostics);
        let unit = Parser::new(&source, &tokens, &mut diagnostics).parse_compilation_unit();
        (unit, diagnostics, source)
    }

    fn statements(unit: &SyntaxNode) -> &[SyntaxNode] {
        match unit {
            SyntaxNode::CompilationUnit { statements, .. } => statements,
            other => panic!("expected compilation unit, got {}", other.kind_name()),
        }
    }

    /// Every node's span must equal its first child token's start and
    /// last child token's end.
    fn check_span_law(node: &SyntaxNode) {
        let span = node.span();
        assert_eq!(span.start, node.first_token().span.start);
        assert_eq!(span.end, node.last_token().span.end);
        match node {
            SyntaxNode::CompilationUnit { statements, .. }
            | SyntaxNode::Block { statements, .. } => {
                statements.iter().for_each(check_span_law);
            }
            SyntaxNode::CellAssignment { left, right, .. }
            | SyntaxNode::BinaryExpression { left, right, .. } => {
                check_span_law(left);
                check_span_law(right);
            }
            SyntaxNode::UnaryExpression { operand, .. } => check_span_law(operand),
            SyntaxNode::Parenthesis { expression, .. } => check_span_law(expression),
            SyntaxNode::CellReference { .. }
            | SyntaxNode::Literal(_)
            | SyntaxNode::ErrorExpression(_) => {}
        }
    }

    #[test]
    fn test_precedence_shapes_multiplication_tighter() {
        let (unit, diagnostics, source) = parse("A1 :: 2+3*4");
        assert!(diagnostics.is_empty());
        let SyntaxNode::CellAssignment { right, .. } = &statements(&unit)[0] else {
            panic!("expected assignment");
        };
        let SyntaxNode::BinaryExpression {
            left,
            operator,
            right,
        } = right.as_ref()
        else {
            panic!("expected binary expression");
        };
        assert_eq!(operator.kind, TokenKind::Plus);
        assert_eq!(source.slice(left.span()), "2");
        assert_eq!(source.slice(right.span()), "3*4");
    }

    #[test]
    fn test_same_precedence_associates_left() {
        let (unit, _, source) = parse("1-2-3");
        let SyntaxNode::BinaryExpression { left, .. } = &statements(&unit)[0] else {
            panic!("expected binary expression");
        };
        assert_eq!(source.slice(left.span()), "1-2");
    }

    #[test]
    fn test_exponent_binds_tightest() {
        let (unit, _, source) = parse("2*3^4");
        let SyntaxNode::BinaryExpression {
            operator, right, ..
        } = &statements(&unit)[0]
        else {
            panic!("expected binary expression");
        };
        assert_eq!(operator.kind, TokenKind::Star);
        assert_eq!(source.slice(right.span()), "3^4");
    }

    #[test]
    fn test_unary_binds_tighter_than_binary() {
        let (unit, _, source) = parse("-2+3");
        let SyntaxNode::BinaryExpression { left, .. } = &statements(&unit)[0] else {
            panic!("expected binary expression");
        };
        assert_eq!(source.slice(left.span()), "-2");
    }

    #[test]
    fn test_parenthesis_overrides_precedence() {
        let (unit, _, source) = parse("(1+2)*3");
        let SyntaxNode::BinaryExpression { left, operator, .. } = &statements(&unit)[0] else {
            panic!("expected binary expression");
        };
        assert_eq!(operator.kind, TokenKind::Star);
        assert_eq!(source.slice(left.span()), "(1+2)");
    }

    #[test]
    fn test_cell_reference_with_trivia_still_parses() {
        let (unit, diagnostics, _) = parse("A1 :: A 1");
        // The loose reference still parses as a reference.
        let SyntaxNode::CellAssignment { right, .. } = &statements(&unit)[0] else {
            panic!("expected assignment");
        };
        assert!(matches!(right.as_ref(), SyntaxNode::CellReference { .. }));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.diagnostics()[0].message.contains("A1"));
        assert!(diagnostics.can_bind());
    }

    #[test]
    fn test_empty_block_warns() {
        let (unit, diagnostics, _) = parse("{}");
        assert!(matches!(statements(&unit)[0], SyntaxNode::Block { .. }));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.can_bind());
    }

    #[test]
    fn test_unclosed_block_does_not_warn_empty() {
        let (_, diagnostics, _) = parse("{");
        // One mismatch for the missing brace, no empty-block report.
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics.can_bind());
    }

    #[test]
    fn test_recovery_reports_once() {
        let (unit, diagnostics, _) = parse(":: :: ::");
        // A run of junk produces error statements but only one mismatch
        // diagnostic until a successful match resets recovery.
        assert!(!statements(&unit).is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_recovery_resets_after_match() {
        let (_, diagnostics, _) = parse("> A1 >");
        // The reference between the two bad statements parses, so both
        // bad tokens report.
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_assignment_of_expression_target_still_parses() {
        let (unit, diagnostics, _) = parse("1+2 :: 3");
        // Shape is preserved; the binder rejects the target later.
        assert!(matches!(
            statements(&unit)[0],
            SyntaxNode::CellAssignment { .. }
        ));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_span_law_holds() {
        for text in [
            "A1 :: 2+3*4",
            "{ A1 :: 1\nA2 :: A1+1 }",
            "-(A1) * (2^3)",
            "A1 :: )(",
            "{ } :: 5",
        ] {
            let (unit, _, _) = parse(text);
            check_span_law(&unit);
        }
    }
}
