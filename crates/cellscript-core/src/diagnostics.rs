//! Diagnostic reporting
//!
//! Every pipeline phase reports problems into a shared [`DiagnosticsBag`]
//! instead of failing. Severities gate which downstream phases are worth
//! running; no diagnostic is ever dropped or thrown.

use crate::span::Span;
use ahash::AHashSet;
use std::fmt;

/// How much of the pipeline a diagnostic blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Reported but blocks nothing (bad character, divide by zero, ...).
    Warning,
    /// Blocks binding-dependent phases; parsing and other binds continue.
    CantBind,
    /// Blocks evaluation only.
    CantEvaluate,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::CantBind => write!(f, "error"),
            Severity::CantEvaluate => write!(f, "error"),
        }
    }
}

/// A single reported problem with its source location.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
}

/// Ordered, append-only diagnostic sink with severity gating.
#[derive(Debug, Default)]
pub struct DiagnosticsBag {
    diagnostics: Vec<Diagnostic>,
    seen: AHashSet<Severity>,
}

impl DiagnosticsBag {
    pub fn new() -> Self {
        Self::default()
    }

    fn report(&mut self, message: String, severity: Severity, span: Span) {
        self.seen.insert(severity);
        self.diagnostics.push(Diagnostic {
            severity,
            message,
            span,
        });
    }

    /// True while no `CantBind` diagnostic has been reported.
    pub fn can_bind(&self) -> bool {
        !self.seen.contains(&Severity::CantBind)
    }

    /// True while binding is possible and no `CantEvaluate` has been
    /// reported.
    pub fn can_evaluate(&self) -> bool {
        self.can_bind() && !self.seen.contains(&Severity::CantEvaluate)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    // === Lexical ===

    pub fn bad_character(&mut self, character: char, span: Span) {
        self.report(
            format!("Illegal character '{character}' found."),
            Severity::Warning,
            span,
        );
    }

    pub fn bad_floating_point_number(&mut self, span: Span) {
        self.report(
            "Wrong floating number format.".into(),
            Severity::CantBind,
            span,
        );
    }

    pub fn unterminated_multiline_comment(&mut self, span: Span) {
        self.report(
            "Missing closing triple quotes (''') before end of file.".into(),
            Severity::Warning,
            span,
        );
    }

    // === Syntactic ===

    pub fn unexpected_token(&mut self, found: impl fmt::Display, expecting: impl fmt::Display, span: Span) {
        self.report(
            format!("Unexpected token found: '{found}' expecting '{expecting}'."),
            Severity::CantBind,
            span,
        );
    }

    pub fn empty_block(&mut self, span: Span) {
        self.report(
            "Expecting statements in the block.".into(),
            Severity::Warning,
            span,
        );
    }

    pub fn compact_reference_required(&mut self, correct_name: &str, span: Span) {
        self.report(
            format!("Did you mean `{correct_name}`?"),
            Severity::Warning,
            span,
        );
    }

    // === Binding ===

    pub fn undeclared_cell(&mut self, name: &str, span: Span) {
        self.report(
            format!("Cell reference '{name}' is undeclared."),
            Severity::CantBind,
            span,
        );
    }

    pub fn not_assignable(&mut self, unexpected: impl fmt::Display, span: Span) {
        self.report(
            format!("'{unexpected}' is not assignable."),
            Severity::CantBind,
            span,
        );
    }

    pub fn missing_binding(&mut self, kind: impl fmt::Display, span: Span) {
        self.report(
            format!("Binding for '{kind}' is not implemented."),
            Severity::CantBind,
            span,
        );
    }

    // === Evaluation ===

    pub fn division_by_zero(&mut self, span: Span) {
        self.report("Can't divide by zero.".into(), Severity::Warning, span);
    }

    pub fn circular_dependency(&mut self, observer: &str, cell: &str, span: Span) {
        self.report(
            format!("Circular dependency '{observer}' detected while evaluating '{cell}'."),
            Severity::CantEvaluate,
            span,
        );
    }
}
