//! Sheet-level compilation engine
//!
//! A [`Sheet`] owns one [`DependencyScope`] and compiles any number of
//! source texts against it, so reassigning a single cell cascades
//! through everything bound earlier. [`compile`] is the one-shot form
//! over a fresh sheet.
//!
//! # Example
//!
//! ```rust
//! use cellscript::Sheet;
//!
//! let mut sheet = Sheet::new();
//! sheet.submit("A1 :: 1");
//! sheet.submit("A2 :: A1+1");
//! sheet.submit("A1 :: 10");
//! assert_eq!(sheet.cell_value("A2").unwrap(), 11.0);
//! ```

use crate::error::{Error, Result};
use cellscript_compiler::{
    token_at, tokenize, Binder, CompilerOptions, DependencyScope, Evaluator, Parser, Token,
};
use cellscript_core::{Diagnostic, DiagnosticsBag, SourceText};

/// The result of compiling one source text.
#[derive(Debug)]
pub struct Compilation {
    source: SourceText,
    tokens: Vec<Token>,
    value: f64,
    diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    /// The last evaluated statement's value, or 0 when diagnostics
    /// gated evaluation.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Every diagnostic of this compilation, in report order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn source(&self) -> &SourceText {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The token covering a byte offset, leading trivia included.
    pub fn token_at(&self, offset: usize) -> Option<&Token> {
        token_at(&self.tokens, offset)
    }

    /// 1-based line/column of a diagnostic's start, for display.
    pub fn location_of(&self, diagnostic: &Diagnostic) -> (usize, usize) {
        (
            self.source.line_of(diagnostic.span.start),
            self.source.column_of(diagnostic.span.start),
        )
    }
}

/// A collection of named cells and the engine that keeps them current.
#[derive(Debug, Default)]
pub struct Sheet {
    scope: DependencyScope,
    options: CompilerOptions,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompilerOptions) -> Self {
        Self {
            scope: DependencyScope::new(),
            options,
        }
    }

    pub fn options(&self) -> CompilerOptions {
        self.options
    }

    /// Compile `text` against this sheet's scope: lex and parse always;
    /// bind and evaluate only while the diagnostics gates allow it.
    /// Binding is cumulative, so later submissions see every cell
    /// earlier ones created.
    pub fn submit(&mut self, text: &str) -> Compilation {
        let source = SourceText::from(text);
        let mut diagnostics = DiagnosticsBag::new();
        let tokens = tokenize(&source, &mut diagnostics);
        let unit = Parser::new(&source, &tokens, &mut diagnostics).parse_compilation_unit();

        let mut value = 0.0;
        if diagnostics.can_bind() {
            let bound = Binder::new(&source, &mut self.scope, &mut diagnostics, self.options)
                .bind_compilation_unit(&unit);
            if diagnostics.can_evaluate() {
                value = Evaluator::new(&mut self.scope, &mut diagnostics).evaluate(&bound);
            }
        }

        tracing::debug!(
            "compiled {} byte(s): value {}, {} diagnostic(s)",
            source.len(),
            value,
            diagnostics.len()
        );
        Compilation {
            source,
            tokens,
            value,
            diagnostics: diagnostics.into_diagnostics(),
        }
    }

    /// Current value of a cell by name.
    pub fn cell_value(&self, name: &str) -> Result<f64> {
        let id = self
            .scope
            .get(name)
            .ok_or_else(|| Error::UnknownCell(name.to_string()))?;
        Ok(self.scope.cell(id).value())
    }

    /// Names of the cells that read `name`, sorted by creation order.
    pub fn dependents(&self, name: &str) -> Result<Vec<String>> {
        let id = self
            .scope
            .get(name)
            .ok_or_else(|| Error::UnknownCell(name.to_string()))?;
        Ok(self
            .scope
            .observers_sorted(id)
            .into_iter()
            .map(|observer| self.scope.cell(observer).name().to_string())
            .collect())
    }

    /// Names of the cells `name` reads, sorted by creation order.
    pub fn precedents(&self, name: &str) -> Result<Vec<String>> {
        let id = self
            .scope
            .get(name)
            .ok_or_else(|| Error::UnknownCell(name.to_string()))?;
        Ok(self
            .scope
            .referencing_sorted(id)
            .into_iter()
            .map(|read| self.scope.cell(read).name().to_string())
            .collect())
    }

    /// Every cell name the scope has seen, in creation order.
    pub fn cell_names(&self) -> Vec<String> {
        self.scope.names().map(str::to_string).collect()
    }
}

/// Compile one source text against a fresh scope.
pub fn compile(text: &str, options: CompilerOptions) -> Compilation {
    Sheet::with_options(options).submit(text)
}
