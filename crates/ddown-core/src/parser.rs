//! Block parser for Ddown documents.
//!
//! A single pass over the input lines with one line of lookahead. The
//! lookahead is what makes underline headings work: a heading is a text line
//! whose *successor* is a run of the same underline character, so every
//! paragraph- or list-shaped line has to check its successor before being
//! consumed.
//!
//! The parser never fails. Malformed markup degrades to literal text or is
//! dropped, and each such recovery is recorded as a [`ParseWarning`] for
//! callers that want to surface it.

use crate::ast::{
    Attributes, Block, Blockquote, CodeBlock, Document, Flag, Heading, Inline, ListBlock,
    Paragraph, Table,
};
use crate::attr;
use crate::error::{ParseWarning, ParseWarnings};
use crate::inline::parse_inlines;
use crate::lexer::Lexer;
use crate::span::Span;

/// Underline characters in heading-level order: `=` is level 1, `*` level 5.
const UNDERLINE_CHARS: [u8; 5] = [b'=', b'-', b'~', b'^', b'*'];

/// Minimum underline run length for heading detection.
const MIN_UNDERLINE_LEN: usize = 3;

/// Result of parsing: the document plus every recovered problem.
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed document (always complete; worst case best-effort).
    pub document: Document,
    /// Problems recovered during parsing.
    pub warnings: ParseWarnings,
}

/// Ddown parser.
///
/// Stateless between calls apart from the warning accumulator, which is
/// reset on every parse; parsing the same source twice yields structurally
/// identical documents.
#[derive(Debug, Default)]
pub struct Parser {
    warnings: ParseWarnings,
}

impl Parser {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the input. Never fails; recovered problems are discarded.
    #[inline]
    pub fn parse(&mut self, input: &str) -> Document {
        self.parse_with_recovery(input).document
    }

    /// Parse the input and keep the recovered problems alongside.
    pub fn parse_with_recovery(&mut self, input: &str) -> ParseResult {
        self.warnings = ParseWarnings::new();
        let document = self.parse_internal(input);
        ParseResult {
            document,
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn parse_internal(&mut self, input: &str) -> Document {
        let mut lexer = Lexer::new(input);
        let mut global_style = String::new();

        lexer.skip_blank_lines();
        let flags = self.parse_directives(&mut lexer);
        lexer.skip_blank_lines();

        let blocks = self.parse_blocks(&mut lexer, &mut global_style);

        Document {
            flags,
            global_style,
            blocks,
            span: Span::new(0, input.len() as u32),
        }
    }

    /// Consume leading `{@token}` directive lines. Unknown tokens are eaten
    /// and warned about; the `{@global-style}` marker is left for the block
    /// loop.
    fn parse_directives(&mut self, lexer: &mut Lexer) -> Vec<Flag> {
        let mut flags = Vec::new();
        loop {
            let (token, span) = {
                let Some(line) = lexer.peek_line() else { break };
                let Some(token) = directive_token(line.trimmed()) else {
                    break;
                };
                if token == "global-style" {
                    break;
                }
                (token.to_string(), line.span)
            };

            lexer.next_line();
            lexer.skip_blank_lines();

            match token.as_str() {
                "dark-mode" => {
                    if !flags.contains(&Flag::DarkMode) {
                        flags.push(Flag::DarkMode);
                    }
                }
                _ => {
                    self.warnings
                        .push(ParseWarning::unknown_directive(&token, Some(span)));
                }
            }
        }
        flags
    }

    /// Capture a `{@global-style}` block verbatim. The marker line has
    /// already been peeked; a missing end marker extends the block to the
    /// end of the document.
    fn parse_global_style(&mut self, lexer: &mut Lexer, global_style: &mut String) {
        let start_span = match lexer.next_line() {
            Some(line) => line.span,
            None => return,
        };

        let mut captured = String::new();
        let mut closed = false;
        while let Some(line) = lexer.next_line() {
            if line.trimmed() == "{@endglobal-style}" {
                closed = true;
                break;
            }
            captured.push_str(line.text);
            captured.push('\n');
        }
        if !closed {
            self.warnings
                .push(ParseWarning::unclosed_global_style(Some(start_span)));
        }

        let captured = captured.trim();
        if !captured.is_empty() {
            if !global_style.is_empty() {
                global_style.push('\n');
            }
            global_style.push_str(captured);
        }
    }

    fn parse_blocks(&mut self, lexer: &mut Lexer, global_style: &mut String) -> Vec<Block> {
        let mut blocks = Vec::with_capacity(16);

        while !lexer.is_eof() {
            lexer.skip_blank_lines();
            if lexer.is_eof() {
                break;
            }
            if let Some(block) = self.parse_block(lexer, global_style) {
                blocks.push(block);
            }
        }

        blocks
    }

    fn parse_block(&mut self, lexer: &mut Lexer, global_style: &mut String) -> Option<Block> {
        let trimmed = lexer.peek_line()?.trimmed();

        if trimmed == "{@global-style}" {
            self.parse_global_style(lexer, global_style);
            return None;
        }
        if trimmed.starts_with("```") {
            return self.parse_code_block(lexer);
        }
        // Heading lookahead wins over every text-shaped interpretation.
        if self.successor_is_underline(lexer) {
            return self.parse_heading(lexer);
        }
        if unordered_item(trimmed).is_some() {
            return self.parse_list(lexer, ListKind::Unordered);
        }
        if ordered_item(trimmed).is_some() {
            return self.parse_list(lexer, ListKind::Ordered);
        }
        if trimmed.starts_with('>') {
            return self.parse_blockquote(lexer);
        }
        if is_table_row(trimmed) && self.successor_is_table_separator(lexer) {
            return self.parse_table(lexer);
        }
        self.parse_paragraph(lexer)
    }

    #[inline]
    fn successor_is_underline(&mut self, lexer: &mut Lexer) -> bool {
        lexer
            .peek_second_line()
            .is_some_and(|line| underline_level(line.trimmed()).is_some())
    }

    #[inline]
    fn successor_is_table_separator(&mut self, lexer: &mut Lexer) -> bool {
        lexer
            .peek_second_line()
            .is_some_and(|line| is_table_separator(line.trimmed()))
    }

    /// Text line plus underline line. Attribute payloads may trail either
    /// line; both bind to the heading, the underline's winning on conflict.
    fn parse_heading(&mut self, lexer: &mut Lexer) -> Option<Block> {
        let text_line = lexer.next_line()?;
        let underline_line = lexer.next_line()?;
        let (level, underline_rest) = underline_level(underline_line.trimmed())?;

        let mut outcome = attr::strip_trailing(text_line.trimmed());
        self.record_malformed(&outcome.malformed, text_line.span);

        if !underline_rest.is_empty() {
            let underline_outcome = attr::strip_trailing(underline_rest);
            self.record_malformed(&underline_outcome.malformed, underline_line.span);
            outcome.attrs.merge(underline_outcome.attrs);
        }

        Some(Block::Heading(Heading {
            level,
            content: parse_inlines(&outcome.text),
            attrs: outcome.attrs,
            span: text_line.span.merge(underline_line.span),
        }))
    }

    /// Consecutive marker lines collapse into one list block. Attribute
    /// payloads on item lines merge into the block's attributes.
    fn parse_list(&mut self, lexer: &mut Lexer, kind: ListKind) -> Option<Block> {
        let mut items: Vec<Vec<Inline>> = Vec::with_capacity(4);
        let mut attrs = Attributes::default();
        let mut span: Option<Span> = None;

        loop {
            let (item_text, line_span) = {
                let Some(line) = lexer.peek_line() else { break };
                let trimmed = line.trimmed();
                let item = match kind {
                    ListKind::Unordered => unordered_item(trimmed),
                    ListKind::Ordered => ordered_item(trimmed),
                };
                let Some(item) = item else { break };
                (item.to_string(), line.span)
            };
            // A following underline steals this line as a heading.
            if self.successor_is_underline(lexer) {
                break;
            }
            lexer.next_line();

            let outcome = attr::strip_trailing(&item_text);
            self.record_malformed(&outcome.malformed, line_span);
            attrs.merge(outcome.attrs);
            items.push(parse_inlines(&outcome.text));
            span = Some(span.map_or(line_span, |s| s.merge(line_span)));
        }

        if items.is_empty() {
            // The marker line is about to become a heading; nothing consumed.
            return self.parse_heading(lexer);
        }

        let list = ListBlock {
            items,
            attrs,
            span: span.unwrap_or_default(),
        };
        Some(match kind {
            ListKind::Unordered => Block::UnorderedList(list),
            ListKind::Ordered => Block::OrderedList(list),
        })
    }

    /// Fenced code block. Content lines are kept exactly as written, blank
    /// lines and indentation included; line endings are normalized to `\n`
    /// like everywhere else.
    fn parse_code_block(&mut self, lexer: &mut Lexer) -> Option<Block> {
        let open_line = lexer.next_line()?;
        let lang = open_line
            .trimmed()
            .strip_prefix("```")
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        let mut content_lines: Vec<&str> = Vec::new();
        let mut end_span = open_line.span;
        let mut closed = false;

        while let Some(line) = lexer.next_line() {
            if line.trimmed() == "```" {
                end_span = line.span;
                closed = true;
                break;
            }
            content_lines.push(line.text);
            end_span = line.span;
        }
        if !closed {
            self.warnings
                .push(ParseWarning::unclosed_fence(Some(open_line.span)));
        }

        let content = content_lines.join("\n");

        Some(Block::CodeBlock(CodeBlock {
            lang,
            content,
            span: open_line.span.merge(end_span),
        }))
    }

    fn parse_blockquote(&mut self, lexer: &mut Lexer) -> Option<Block> {
        let mut lines: Vec<Vec<Inline>> = Vec::with_capacity(2);
        let mut span: Option<Span> = None;

        loop {
            let (rest, line_span) = {
                let Some(line) = lexer.peek_line() else { break };
                let Some(rest) = line.trimmed().strip_prefix('>') else {
                    break;
                };
                (rest.trim().to_string(), line.span)
            };
            lexer.next_line();
            lines.push(parse_inlines(&rest));
            span = Some(span.map_or(line_span, |s| s.merge(line_span)));
        }

        Some(Block::Blockquote(Blockquote {
            lines,
            span: span?,
        }))
    }

    /// Header row, separator row, then consecutive body rows. The separator
    /// was verified by lookahead before dispatch.
    fn parse_table(&mut self, lexer: &mut Lexer) -> Option<Block> {
        let header_line = lexer.next_line()?;
        let header = split_cells(header_line.trimmed());
        let mut span = header_line.span;

        if let Some(separator) = lexer.next_line() {
            span = span.merge(separator.span);
        }

        let mut rows: Vec<Vec<String>> = Vec::with_capacity(4);
        loop {
            let (cells, line_span) = {
                let Some(line) = lexer.peek_line() else { break };
                let trimmed = line.trimmed();
                if !is_table_row(trimmed) {
                    break;
                }
                (split_cells(trimmed), line.span)
            };
            lexer.next_line();
            rows.push(cells);
            span = span.merge(line_span);
        }

        Some(Block::Table(Table { header, rows, span }))
    }

    /// A run of lines that start no other block, joined with single spaces.
    fn parse_paragraph(&mut self, lexer: &mut Lexer) -> Option<Block> {
        let mut pieces: Vec<String> = Vec::with_capacity(2);
        let mut attrs = Attributes::default();
        let mut span: Option<Span> = None;
        let mut first = true;

        loop {
            let (text, line_span) = {
                let Some(line) = lexer.peek_line() else { break };
                if line.is_blank() {
                    break;
                }
                let trimmed = line.trimmed();
                if !first && starts_other_block(trimmed) {
                    break;
                }
                (trimmed.to_string(), line.span)
            };
            // The successor underline turns this line into a heading - but
            // only if it is not the paragraph's first line, which parse_block
            // already cleared.
            if !first && self.successor_is_underline(lexer) {
                break;
            }
            if !first && self.successor_is_table_separator(lexer) && is_table_row(&text) {
                break;
            }
            lexer.next_line();
            first = false;

            let outcome = attr::strip_trailing(&text);
            self.record_malformed(&outcome.malformed, line_span);
            attrs.merge(outcome.attrs);
            if !outcome.text.is_empty() {
                pieces.push(outcome.text);
            }
            span = Some(span.map_or(line_span, |s| s.merge(line_span)));
        }

        let span = span?;
        // A run of nothing but stripped payloads leaves no paragraph behind.
        if pieces.is_empty() && attrs.is_empty() {
            return None;
        }
        Some(Block::Paragraph(Paragraph {
            content: parse_inlines(&pieces.join(" ")),
            attrs,
            span,
        }))
    }

    fn record_malformed(&mut self, payloads: &[String], span: Span) {
        for payload in payloads {
            self.warnings
                .push(ParseWarning::malformed_attributes(payload, Some(span)));
        }
    }
}

#[derive(Clone, Copy)]
enum ListKind {
    Unordered,
    Ordered,
}

/// `{@token}` on a line of its own; token must be a bare word.
fn directive_token(trimmed: &str) -> Option<&str> {
    let body = trimmed.strip_prefix("{@")?.strip_suffix('}')?;
    if !body.is_empty()
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    {
        Some(body)
    } else {
        None
    }
}

/// Classify an underline line: a run of one repeated character from the
/// heading set, at least three long, optionally followed by a trailing
/// attribute payload. Returns the level and the remainder after the run.
fn underline_level(trimmed: &str) -> Option<(u8, &str)> {
    let bytes = trimmed.as_bytes();
    let first = *bytes.first()?;
    let index = UNDERLINE_CHARS.iter().position(|&c| c == first)?;

    let run = bytes.iter().take_while(|&&b| b == first).count();
    if run < MIN_UNDERLINE_LEN {
        return None;
    }

    let rest = trimmed[run..].trim();
    if rest.is_empty() || (rest.starts_with('{') && rest.ends_with('}')) {
        Some((index as u8 + 1, rest))
    } else {
        None
    }
}

/// `=> item` - the unordered marker with at least one following space.
fn unordered_item(trimmed: &str) -> Option<&str> {
    let rest = trimmed.strip_prefix("=>")?;
    if rest.starts_with(' ') || rest.starts_with('\t') {
        Some(rest.trim())
    } else {
        None
    }
}

/// `<int>. item` - any integer is accepted, numbering is not validated.
fn ordered_item(trimmed: &str) -> Option<&str> {
    let bytes = trimmed.as_bytes();
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || bytes.get(digits) != Some(&b'.') {
        return None;
    }
    let rest = &trimmed[digits + 1..];
    if rest.starts_with(' ') || rest.starts_with('\t') {
        Some(rest.trim())
    } else {
        None
    }
}

#[inline]
fn is_table_row(trimmed: &str) -> bool {
    trimmed.starts_with('|')
}

/// Separator row below a table header: pipes, dashes, colons, whitespace.
fn is_table_separator(trimmed: &str) -> bool {
    trimmed.starts_with('|')
        && trimmed.contains('-')
        && trimmed
            .bytes()
            .all(|b| matches!(b, b'|' | b'-' | b':' | b' ' | b'\t'))
}

/// Split a `| a | b |` row into trimmed cell strings.
fn split_cells(trimmed: &str) -> Vec<String> {
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

/// Lines that terminate a paragraph by starting a different block kind.
fn starts_other_block(trimmed: &str) -> bool {
    trimmed.starts_with("```")
        || trimmed.starts_with('>')
        || trimmed == "{@global-style}"
        || unordered_item(trimmed).is_some()
        || ordered_item(trimmed).is_some()
}
