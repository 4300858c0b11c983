//! Source text with a precomputed line index.

use crate::span::Span;

/// One line of a [`SourceText`].
///
/// `span` covers the line's content; `full_span` additionally covers the
/// trailing line break, so every byte of the source belongs to exactly one
/// line's `full_span`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    start: usize,
    end: usize,
    break_width: usize,
}

impl Line {
    fn new(start: usize, end: usize, break_width: usize) -> Self {
        Self {
            start,
            end,
            break_width,
        }
    }

    /// Content span, excluding the line break.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end - self.break_width)
    }

    /// Content span including the trailing line break.
    pub fn full_span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Wraps raw input text and answers line/column queries for byte offsets.
///
/// The line index is built once with a single O(n) scan; lookups are
/// O(log lines) binary searches. Lines and columns are 1-based, matching
/// what editors display.
#[derive(Debug, Clone)]
pub struct SourceText {
    text: String,
    lines: Vec<Line>,
}

impl SourceText {
    pub fn from(text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = Self::scan_lines(&text);
        Self { text, lines }
    }

    fn scan_lines(text: &str) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut start = 0;
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                lines.push(Line::new(start, offset + 1, 1));
                start = offset + 1;
            }
        }
        // The final line has no break; empty input still yields one line.
        lines.push(Line::new(start, text.len(), 0));
        lines
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The text a span covers.
    pub fn slice(&self, span: Span) -> &str {
        &self.text[span.start..span.end.min(self.text.len())]
    }

    fn line_index(&self, offset: usize) -> usize {
        let mut left = 0;
        let mut right = self.lines.len() - 1;
        while left < right {
            let middle = left + (right - left) / 2;
            let line = self.lines[middle].full_span();
            if offset >= line.end {
                left = middle + 1;
            } else {
                right = middle;
            }
        }
        left
    }

    /// 1-based line number of a byte offset. Offsets past the end map to
    /// the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_index(offset) + 1
    }

    /// 1-based column of a byte offset within its line.
    pub fn column_of(&self, offset: usize) -> usize {
        let line = self.lines[self.line_index(offset)];
        offset - line.full_span().start + 1
    }

    /// Byte offset of a 1-based line/column pair, clamped to valid
    /// positions within the text.
    pub fn position_at(&self, line: usize, column: usize) -> usize {
        let line = line.clamp(1, self.lines.len()) - 1;
        let span = self.lines[line].span();
        let offset = column.saturating_sub(1).min(span.len());
        span.start + offset
    }
}
