//! Inline formatter.
//!
//! Scans left-to-right for `![alt](url)` images, `[text](url)` links and
//! single-backtick code spans, accumulating everything else into plain text.
//! Images are checked before links because of the leading `!`. Unmatched
//! opening markers are literal text from that point on; the formatter cannot
//! fail.
//!
//! Nesting is shallow by design: link labels are inline-parsed recursively,
//! code and image contents are taken verbatim.

use crate::ast::Inline;
use memchr::{memchr, memchr3};

/// Parse the inline spans of one line (or joined block text).
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    if text.is_empty() {
        return Vec::new();
    }
    InlineParser::new(text).parse()
}

struct InlineParser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> InlineParser<'a> {
    #[inline]
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn parse(&mut self) -> Vec<Inline> {
        let mut spans = Vec::with_capacity(4);
        let mut text_start = 0;

        while self.pos < self.bytes.len() {
            let next_special = self.find_next_special();
            if next_special >= self.bytes.len() {
                break;
            }
            self.pos = next_special;

            let parsed = match self.bytes[self.pos] {
                b'`' => self.try_parse_code_span(&mut spans, &mut text_start),
                b'!' => self.try_parse_image(&mut spans, &mut text_start),
                b'[' => self.try_parse_link(&mut spans, &mut text_start),
                _ => false,
            };

            if !parsed {
                self.pos += 1;
            }
        }

        if text_start < self.bytes.len() {
            spans.push(Inline::Text(self.text[text_start..].to_string()));
        }

        spans
    }

    #[inline(always)]
    fn find_next_special(&self) -> usize {
        match memchr3(b'`', b'!', b'[', &self.bytes[self.pos..]) {
            Some(offset) => self.pos + offset,
            None => self.bytes.len(),
        }
    }

    #[inline(always)]
    fn flush_text(&self, spans: &mut Vec<Inline>, text_start: &mut usize) {
        if *text_start < self.pos {
            spans.push(Inline::Text(self.text[*text_start..self.pos].to_string()));
        }
        *text_start = self.pos;
    }

    /// `` `code` `` - contents verbatim, no further parsing, no escapes.
    fn try_parse_code_span(&mut self, spans: &mut Vec<Inline>, text_start: &mut usize) -> bool {
        let start = self.pos;
        let Some(close_offset) = memchr(b'`', &self.bytes[start + 1..]) else {
            return false;
        };
        let close = start + 1 + close_offset;

        self.flush_text(spans, text_start);
        spans.push(Inline::Code(self.text[start + 1..close].to_string()));
        self.pos = close + 1;
        *text_start = self.pos;
        true
    }

    /// `![alt](url)` - alt text is verbatim, never inline-parsed.
    fn try_parse_image(&mut self, spans: &mut Vec<Inline>, text_start: &mut usize) -> bool {
        let start = self.pos;
        if start + 1 >= self.bytes.len() || self.bytes[start + 1] != b'[' {
            return false;
        }
        let Some((label_end, url_end)) = self.find_bracket_pair(start + 1) else {
            return false;
        };

        let alt = self.text[start + 2..label_end].to_string();
        let url = self.text[label_end + 2..url_end].to_string();

        self.flush_text(spans, text_start);
        spans.push(Inline::Image { alt, url });
        self.pos = url_end + 1;
        *text_start = self.pos;
        true
    }

    /// `[text](url)` - the label is recursively inline-parsed.
    fn try_parse_link(&mut self, spans: &mut Vec<Inline>, text_start: &mut usize) -> bool {
        let start = self.pos;
        let Some((label_end, url_end)) = self.find_bracket_pair(start) else {
            return false;
        };

        let label = parse_inlines(&self.text[start + 1..label_end]);
        let url = self.text[label_end + 2..url_end].to_string();

        self.flush_text(spans, text_start);
        spans.push(Inline::Link { label, url });
        self.pos = url_end + 1;
        *text_start = self.pos;
        true
    }

    /// From an opening `[` at `open`, locate `](` and the closing `)`.
    /// Returns (index of `]`, index of `)`).
    fn find_bracket_pair(&self, open: usize) -> Option<(usize, usize)> {
        let mut search = open + 1;
        while let Some(offset) = memchr(b']', &self.bytes[search..]) {
            let close = search + offset;
            if close + 1 < self.bytes.len() && self.bytes[close + 1] == b'(' {
                let paren_offset = memchr(b')', &self.bytes[close + 2..])?;
                return Some((close, close + 2 + paren_offset));
            }
            search = close + 1;
        }
        None
    }
}
