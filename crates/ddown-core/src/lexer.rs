//! Line-based lexer for the block segmenter.
//!
//! The segmenter works on whole lines, so the lexer's job is just to hand
//! them out with spans attached, using `memchr` for fast newline scanning.
//! Underline-style headings need to see the line *after* the one under
//! consideration, so the lexer keeps two peek slots instead of the usual one.

use crate::span::Span;
use memchr::memchr;

/// A single line from the input with its source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The line text (without trailing newline).
    pub text: &'a str,
    /// Byte span in the original input.
    pub span: Span,
}

impl<'a> Line<'a> {
    /// Check if this line contains only whitespace.
    #[inline(always)]
    pub fn is_blank(&self) -> bool {
        self.text.bytes().all(|b| b == b' ' || b == b'\t')
    }

    /// Get the line text with leading/trailing whitespace removed.
    #[inline(always)]
    pub fn trimmed(&self) -> &'a str {
        self.text.trim()
    }
}

/// Hands out input lines with one-or-two line lookahead.
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    /// Current byte offset past the peeked lines.
    offset: usize,
    /// First peek slot (next line to be consumed).
    peeked: Option<Line<'a>>,
    /// Second peek slot (line after that).
    peeked2: Option<Line<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            offset: 0,
            peeked: None,
            peeked2: None,
        }
    }

    /// Check if all input has been consumed.
    #[inline(always)]
    pub fn is_eof(&self) -> bool {
        self.peeked.is_none() && self.peeked2.is_none() && self.offset >= self.bytes.len()
    }

    /// Peek at the next line without consuming it.
    #[inline]
    pub fn peek_line(&mut self) -> Option<&Line<'a>> {
        if self.peeked.is_none() {
            self.peeked = self.read_line();
        }
        self.peeked.as_ref()
    }

    /// Peek at the line after the next one without consuming anything.
    #[inline]
    pub fn peek_second_line(&mut self) -> Option<&Line<'a>> {
        if self.peeked.is_none() {
            self.peeked = self.read_line();
            self.peeked?;
        }
        if self.peeked2.is_none() {
            self.peeked2 = self.read_line();
        }
        self.peeked2.as_ref()
    }

    /// Consume and return the next line.
    #[inline]
    pub fn next_line(&mut self) -> Option<Line<'a>> {
        if let Some(line) = self.peeked.take() {
            self.peeked = self.peeked2.take();
            return Some(line);
        }
        self.read_line()
    }

    /// Skip blank lines and return the count skipped.
    #[inline]
    pub fn skip_blank_lines(&mut self) -> usize {
        let mut count = 0;
        while let Some(line) = self.peek_line() {
            if !line.is_blank() {
                break;
            }
            self.next_line();
            count += 1;
        }
        count
    }

    /// Read the next line from input, advancing past the newline.
    #[inline(always)]
    fn read_line(&mut self) -> Option<Line<'a>> {
        if self.offset >= self.bytes.len() {
            return None;
        }

        let start = self.offset;

        let end = match memchr(b'\n', &self.bytes[start..]) {
            Some(pos) => start + pos,
            None => self.bytes.len(),
        };

        // CRLF: drop the CR before the newline
        let text_end = if end > start && self.bytes[end - 1] == b'\r' {
            end - 1
        } else {
            end
        };

        self.offset = if end < self.bytes.len() { end + 1 } else { end };

        Some(Line {
            text: &self.input[start..text_end],
            span: Span::new(start as u32, text_end as u32),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_and_spans() {
        let mut lexer = Lexer::new("one\ntwo\r\nthree");
        let a = lexer.next_line().unwrap();
        assert_eq!(a.text, "one");
        assert_eq!((a.span.start, a.span.end), (0, 3));
        let b = lexer.next_line().unwrap();
        assert_eq!(b.text, "two");
        let c = lexer.next_line().unwrap();
        assert_eq!(c.text, "three");
        assert!(lexer.next_line().is_none());
        assert!(lexer.is_eof());
    }

    #[test]
    fn two_slot_peek_preserves_order() {
        let mut lexer = Lexer::new("first\nsecond\nthird");
        assert_eq!(lexer.peek_line().unwrap().text, "first");
        assert_eq!(lexer.peek_second_line().unwrap().text, "second");
        assert_eq!(lexer.next_line().unwrap().text, "first");
        assert_eq!(lexer.next_line().unwrap().text, "second");
        assert_eq!(lexer.peek_line().unwrap().text, "third");
    }

    #[test]
    fn skip_blank_lines_counts() {
        let mut lexer = Lexer::new("\n   \n\t\ntext");
        assert_eq!(lexer.skip_blank_lines(), 3);
        assert_eq!(lexer.next_line().unwrap().text, "text");
    }
}
