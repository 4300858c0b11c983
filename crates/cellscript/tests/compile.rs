//! One-shot compilation behavior: values, diagnostics and gating.

use cellscript::prelude::*;
use cellscript::TokenKind;
use pretty_assertions::assert_eq;

fn auto_declare() -> CompilerOptions {
    CompilerOptions { auto_declare: true }
}

#[test]
fn test_basic_evaluation() {
    let result = compile("A1 :: 2+3*4", CompilerOptions::default());
    assert_eq!(result.value(), 14.0);
    assert!(result.is_ok());
}

#[test]
fn test_bare_expression_statement() {
    let result = compile("1+2", CompilerOptions::default());
    assert_eq!(result.value(), 3.0);
    assert!(result.is_ok());
}

#[test]
fn test_value_is_last_statement() {
    let result = compile("A1 :: 1\nA2 :: 2\nA1", CompilerOptions::default());
    assert_eq!(result.value(), 1.0);
}

#[test]
fn test_unary_and_parenthesis() {
    let result = compile("A1 :: -(2+3)*4", CompilerOptions::default());
    assert_eq!(result.value(), -20.0);
}

#[test]
fn test_exponentiation() {
    let result = compile("A1 :: 2^10", CompilerOptions::default());
    assert_eq!(result.value(), 1024.0);
}

#[test]
fn test_auto_declare_off_reports_undeclared() {
    let result = compile("A1 :: A2", CompilerOptions::default());
    assert_eq!(result.value(), 0.0);
    assert_eq!(result.diagnostics().len(), 1);
    let diagnostic = &result.diagnostics()[0];
    assert!(diagnostic.message.contains("A2"));
    assert!(diagnostic.message.contains("undeclared"));
}

#[test]
fn test_auto_declare_on_is_silent() {
    let result = compile("A1 :: A2", auto_declare());
    assert!(result.is_ok());
    assert_eq!(result.value(), 0.0);
}

#[test]
fn test_divide_by_zero_is_ieee_with_warning() {
    let result = compile("A1 :: 5/0", CompilerOptions::default());
    assert_eq!(result.value(), f64::INFINITY);
    assert_eq!(result.diagnostics().len(), 1);
    assert_eq!(result.diagnostics()[0].severity, Severity::Warning);
}

#[test]
fn test_circular_dependency_terminates() {
    let result = compile("A1 :: A2\nA2 :: A1", auto_declare());
    assert!(result
        .diagnostics()
        .iter()
        .any(|d| d.message.contains("Circular dependency")));
    assert!(result
        .diagnostics()
        .iter()
        .all(|d| d.severity == Severity::CantEvaluate));
}

#[test]
fn test_circular_compile_is_idempotent() {
    let first = compile("A1 :: A2\nA2 :: A1", auto_declare());
    let second = compile("A1 :: A2\nA2 :: A1", auto_declare());
    assert_eq!(first.diagnostics(), second.diagnostics());
    assert_eq!(first.value(), second.value());
}

#[test]
fn test_undeclared_forward_reference_gates_evaluation() {
    // Without auto-declare the forward reference blocks binding, so the
    // cycle is never evaluated and only the undeclared cell reports.
    let result = compile("A1 :: A2\nA2 :: A1", CompilerOptions::default());
    assert_eq!(result.value(), 0.0);
    assert_eq!(result.diagnostics().len(), 1);
    assert!(result.diagnostics()[0].message.contains("undeclared"));
}

#[test]
fn test_bad_character_warns_then_parser_reports() {
    let result = compile("A1 :: 1 @", CompilerOptions::default());
    assert_eq!(result.value(), 0.0);
    let severities: Vec<Severity> = result.diagnostics().iter().map(|d| d.severity).collect();
    assert_eq!(severities, vec![Severity::Warning, Severity::CantBind]);
}

#[test]
fn test_malformed_number_blocks_binding() {
    let result = compile("A1 :: 12.", CompilerOptions::default());
    assert_eq!(result.value(), 0.0);
    assert_eq!(result.diagnostics().len(), 1);
    assert_eq!(result.diagnostics()[0].severity, Severity::CantBind);
}

#[test]
fn test_unterminated_comment_still_evaluates() {
    let result = compile("A1 :: 1 '''left open", CompilerOptions::default());
    assert_eq!(result.value(), 1.0);
    assert_eq!(result.diagnostics().len(), 1);
    assert_eq!(result.diagnostics()[0].severity, Severity::Warning);
}

#[test]
fn test_loose_cell_reference_warns_but_evaluates() {
    let result = compile("A1 :: 7\nA2 :: A 1", CompilerOptions::default());
    assert_eq!(result.value(), 7.0);
    assert_eq!(result.diagnostics().len(), 1);
    assert!(result.diagnostics()[0].message.contains("A1"));
    assert_eq!(result.diagnostics()[0].severity, Severity::Warning);
}

#[test]
fn test_empty_block_warns() {
    let result = compile("{}", CompilerOptions::default());
    assert_eq!(result.diagnostics().len(), 1);
    assert_eq!(result.diagnostics()[0].severity, Severity::Warning);
}

#[test]
fn test_comments_are_ignored() {
    let result = compile(
        "# header\nA1 :: 2 # trailing\n'''block\ncomment''' A2 :: A1*3",
        CompilerOptions::default(),
    );
    assert!(result.is_ok());
    assert_eq!(result.value(), 6.0);
}

#[test]
fn test_diagnostic_location() {
    let result = compile("A1 :: A2", CompilerOptions::default());
    let diagnostic = &result.diagnostics()[0];
    assert_eq!(result.location_of(diagnostic), (1, 7));
}

#[test]
fn test_token_lookup() {
    let result = compile("A1 :: 2+3*4", CompilerOptions::default());
    assert_eq!(result.token_at(0).map(|t| t.kind), Some(TokenKind::Identifier));
    assert_eq!(result.token_at(6).map(|t| t.kind), Some(TokenKind::Number));
    // Offsets past the end land on end-of-file.
    assert_eq!(
        result.token_at(999).map(|t| t.kind),
        Some(TokenKind::EndOfFile)
    );
}

#[test]
fn test_malformed_input_never_panics() {
    for text in [
        "",
        "::",
        ")(",
        "{ { { A1 ::",
        "A1 :: :: A2",
        "@#$%",
        "''''",
        "1..2",
        "->->",
    ] {
        let result = compile(text, CompilerOptions::default());
        // Still terminates with a usable result.
        let _ = result.value();
    }
}
