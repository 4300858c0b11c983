//! Lexical tokens
//!
//! A [`Token`] is a kind plus a span plus the run of trivia (spaces,
//! comments, line breaks) that preceded it. Trivia never reaches the
//! grammar but is preserved so diagnostics and tooling can reconstruct
//! the source exactly.

use cellscript_core::{SourceText, Span};
use std::fmt;

/// Every lexical shape the scanner can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Names and literals
    Identifier,
    Number,

    // Keywords
    TrueKeyword,
    FalseKeyword,

    // Punctuation and operators
    Plus,
    Minus,
    Star,
    Slash,
    Hat,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Colon,
    Greater,
    Dot,

    // Composite operators
    ColonColon,
    Arrow,

    // Trivia
    Space,
    LineBreak,
    LineComment,
    MultilineComment,

    // Everything else
    Bad,
    EndOfFile,
}

impl TokenKind {
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Space
                | TokenKind::LineBreak
                | TokenKind::LineComment
                | TokenKind::MultilineComment
        )
    }

    /// Keyword table, consulted after an identifier run is scanned.
    pub fn keyword_or_identifier(text: &str) -> TokenKind {
        match text {
            "true" => TokenKind::TrueKeyword,
            "false" => TokenKind::FalseKeyword,
            _ => TokenKind::Identifier,
        }
    }

    /// Binding power for binary operators; 0 means "not a binary
    /// operator". Higher binds tighter.
    pub fn binary_precedence(&self) -> u8 {
        match self {
            TokenKind::Hat => 3,
            TokenKind::Star | TokenKind::Slash => 2,
            TokenKind::Plus | TokenKind::Minus => 1,
            _ => 0,
        }
    }

    /// Binding power for prefix operators; tighter than any binary.
    pub fn unary_precedence(&self) -> u8 {
        match self {
            TokenKind::Plus | TokenKind::Minus => 4,
            _ => 0,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::TrueKeyword => "true",
            TokenKind::FalseKeyword => "false",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Hat => "^",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBrace => "{",
            TokenKind::CloseBrace => "}",
            TokenKind::Colon => ":",
            TokenKind::Greater => ">",
            TokenKind::Dot => ".",
            TokenKind::ColonColon => "::",
            TokenKind::Arrow => "->",
            TokenKind::Space => "space",
            TokenKind::LineBreak => "line break",
            TokenKind::LineComment => "comment",
            TokenKind::MultilineComment => "comment",
            TokenKind::Bad => "bad token",
            TokenKind::EndOfFile => "end of file",
        };
        write!(f, "{text}")
    }
}

/// A lexical unit with its leading trivia.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Trivia tokens scanned immediately before this token, in source
    /// order. Trivia tokens themselves carry no nested trivia.
    pub trivia: Vec<Token>,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            trivia: Vec::new(),
        }
    }

    pub fn has_trivia(&self) -> bool {
        !self.trivia.is_empty()
    }

    /// The token's own text, excluding trivia.
    pub fn text<'a>(&self, source: &'a SourceText) -> &'a str {
        source.slice(self.span)
    }

    /// Span including leading trivia, so consecutive tokens tile the
    /// source with no gaps.
    pub fn full_span(&self) -> Span {
        match self.trivia.first() {
            Some(first) => first.span.to(self.span),
            None => self.span,
        }
    }
}

/// Binary search for the token whose full span (leading trivia included)
/// covers `offset`. Offsets at or past the end land on the end-of-file
/// token.
pub fn token_at(tokens: &[Token], offset: usize) -> Option<&Token> {
    if tokens.is_empty() {
        return None;
    }
    let index = tokens.partition_point(|token| token.full_span().end <= offset);
    Some(&tokens[index.min(tokens.len() - 1)])
}
