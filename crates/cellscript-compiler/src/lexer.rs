//! Lexer
//!
//! Single-pass longest-match scanner over a [`SourceText`]. The raw
//! [`Lexer`] is a restartable iterator that always terminates with
//! exactly one end-of-file token; [`tokenize`] drives it and attaches
//! trivia runs to the following significant token.
//!
//! Lexing never fails: unknown characters are reported to the
//! [`DiagnosticsBag`] and emitted as single-character bad tokens so the
//! scan always advances.

use crate::token::{Token, TokenKind};
use cellscript_core::{DiagnosticsBag, SourceText, Span};

pub struct Lexer<'a> {
    source: &'a SourceText,
    diagnostics: &'a mut DiagnosticsBag,
    start: usize,
    position: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a SourceText, diagnostics: &'a mut DiagnosticsBag) -> Self {
        Self {
            source,
            diagnostics,
            start: 0,
            position: 0,
            finished: false,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.source.text()[self.position..].chars().nth(offset)
    }

    fn current(&self) -> Option<char> {
        self.peek(0)
    }

    fn advance(&mut self) {
        if let Some(c) = self.current() {
            self.position += c.len_utf8();
        }
    }

    fn span(&self) -> Span {
        Span::new(self.start, self.position)
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.span())
    }

    fn matches(&self, offset: usize, expected: char) -> bool {
        self.peek(offset) == Some(expected)
    }

    fn at_multiline_comment_delimiter(&self) -> bool {
        self.matches(0, '\'') && self.matches(1, '\'') && self.matches(2, '\'')
    }

    fn next_token(&mut self) -> Token {
        self.start = self.position;

        let Some(c) = self.current() else {
            return self.token(TokenKind::EndOfFile);
        };

        if c.is_ascii_alphabetic() {
            return self.scan_identifier();
        }
        if c.is_ascii_digit() {
            return self.scan_number();
        }
        if c == ' ' || c == '\t' || c == '\r' {
            return self.scan_space();
        }
        if c == '\n' {
            self.advance();
            return self.token(TokenKind::LineBreak);
        }
        if c == '#' {
            return self.scan_line_comment();
        }
        if self.at_multiline_comment_delimiter() {
            return self.scan_multiline_comment();
        }

        // Punctuation table, with lookahead for composite operators.
        let kind = match c {
            '+' => Some(TokenKind::Plus),
            '-' if self.matches(1, '>') => {
                self.advance();
                Some(TokenKind::Arrow)
            }
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '^' => Some(TokenKind::Hat),
            '(' => Some(TokenKind::OpenParen),
            ')' => Some(TokenKind::CloseParen),
            '{' => Some(TokenKind::OpenBrace),
            '}' => Some(TokenKind::CloseBrace),
            ':' if self.matches(1, ':') => {
                self.advance();
                Some(TokenKind::ColonColon)
            }
            ':' => Some(TokenKind::Colon),
            '>' => Some(TokenKind::Greater),
            '.' => Some(TokenKind::Dot),
            _ => None,
        };
        if let Some(kind) = kind {
            self.advance();
            return self.token(kind);
        }

        // Anything else is a single-character bad token.
        self.advance();
        let span = self.span();
        self.diagnostics.bad_character(c, span);
        self.token(TokenKind::Bad)
    }

    fn scan_identifier(&mut self) -> Token {
        while self.current().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.advance();
        }
        let text = self.source.slice(self.span());
        self.token(TokenKind::keyword_or_identifier(text))
    }

    fn scan_number(&mut self) -> Token {
        while self.current().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.current() == Some('.') {
            self.advance();
            if !self.current().is_some_and(|c| c.is_ascii_digit()) {
                // The dot is consumed either way so the token stays whole.
                let span = self.span();
                self.diagnostics.bad_floating_point_number(span);
            }
            while self.current().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        self.token(TokenKind::Number)
    }

    fn scan_space(&mut self) -> Token {
        while self
            .current()
            .is_some_and(|c| c == ' ' || c == '\t' || c == '\r')
        {
            self.advance();
        }
        self.token(TokenKind::Space)
    }

    fn scan_line_comment(&mut self) -> Token {
        // Through the next line break or end of file; the break itself is
        // its own trivia token.
        self.advance();
        while self.current().is_some_and(|c| c != '\n') {
            self.advance();
        }
        self.token(TokenKind::LineComment)
    }

    fn scan_multiline_comment(&mut self) -> Token {
        self.advance();
        self.advance();
        self.advance();
        while self.current().is_some() && !self.at_multiline_comment_delimiter() {
            self.advance();
        }
        if self.at_multiline_comment_delimiter() {
            self.advance();
            self.advance();
            self.advance();
        } else {
            let span = self.span();
            self.diagnostics.unterminated_multiline_comment(span);
        }
        self.token(TokenKind::MultilineComment)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::EndOfFile {
            self.finished = true;
        }
        Some(token)
    }
}

/// Lex the whole source, attaching each trivia run to the significant
/// token that follows it. The result always ends with an end-of-file
/// token carrying any trailing trivia.
pub fn tokenize(source: &SourceText, diagnostics: &mut DiagnosticsBag) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut trivia = Vec::new();
    for token in Lexer::new(source, diagnostics) {
        if token.kind.is_trivia() {
            trivia.push(token);
        } else {
            tokens.push(Token {
                trivia: std::mem::take(&mut trivia),
                ..token
            });
        }
    }
    tokens
}
