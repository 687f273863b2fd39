//! Abstract syntax tree for parsed Ddown documents.
//!
//! The tree is a closed sum type: every block kind the language knows about
//! is a `Block` variant, so renderers match exhaustively and a new output
//! target cannot silently skip a block kind.
//!
//! Nodes own their text. Paragraph lines are joined with single spaces and
//! trailing attribute payloads are stripped from the visible text, so the
//! stored strings are not, in general, slices of the input.

use crate::span::Span;

/// Document-level directive flags, declared at the top of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// `{@dark-mode}` - render with the dark base theme.
    DarkMode,
}

/// A parsed Ddown document.
///
/// Root of the tree; immutable once parsing completes. The global style is
/// carried verbatim so the renderer can both embed it and consult it for the
/// per-element style cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Directive flags found in the preamble.
    pub flags: Vec<Flag>,
    /// Raw CSS from `{@global-style}` blocks, empty if none was declared.
    pub global_style: String,
    /// Content blocks in document order.
    pub blocks: Vec<Block>,
    /// Source span covering the entire document.
    pub span: Span,
}

impl Document {
    /// Check whether a directive flag is set.
    #[inline]
    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }
}

/// Block-level nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Underlined heading (levels 1-5).
    Heading(Heading),
    /// Text paragraph with inline formatting.
    Paragraph(Paragraph),
    /// Group of consecutive `=>` items.
    UnorderedList(ListBlock),
    /// Group of consecutive `<int>.` items.
    OrderedList(ListBlock),
    /// Fenced code block, content verbatim.
    CodeBlock(CodeBlock),
    /// Group of consecutive `>` lines.
    Blockquote(Blockquote),
    /// Pipe table with a header row.
    Table(Table),
}

/// Heading produced by a text line plus an underline of `=`, `-`, `~`, `^`
/// or `*` (levels 1 through 5 in that order).
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// Heading level, always in `1..=5`.
    pub level: u8,
    /// Inline content of the heading text.
    pub content: Vec<Inline>,
    /// Attributes bound from a trailing payload on the text or underline line.
    pub attrs: Attributes,
    /// Source span (text line through underline line).
    pub span: Span,
}

/// Text paragraph; source lines are joined with single spaces.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// Inline content.
    pub content: Vec<Inline>,
    /// Attributes bound from a trailing payload.
    pub attrs: Attributes,
    /// Source span.
    pub span: Span,
}

/// Ordered or unordered list group.
#[derive(Debug, Clone, PartialEq)]
pub struct ListBlock {
    /// One inline sequence per item, in source order.
    pub items: Vec<Vec<Inline>>,
    /// Attributes merged from trailing payloads on the item lines.
    pub attrs: Attributes,
    /// Source span of the whole group.
    pub span: Span,
}

/// Fenced code block.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// Language tag written immediately after the opening fence, if any.
    pub lang: Option<String>,
    /// Content between the fences, byte-for-byte.
    pub content: String,
    /// Source span including both fence lines.
    pub span: Span,
}

/// Blockquote; each source line is inline-parsed independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Blockquote {
    /// One inline sequence per quoted line.
    pub lines: Vec<Vec<Inline>>,
    /// Source span.
    pub span: Span,
}

/// Pipe table. Cell text stays raw; it is escaped at render time only.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Header cells from the row above the separator.
    pub header: Vec<String>,
    /// Body rows.
    pub rows: Vec<Vec<String>>,
    /// Source span.
    pub span: Span,
}

/// Per-block decoration parsed from a trailing `{@ ... }` or `{#id .class}`
/// payload. Defaults to empty; at most one payload's worth of attributes
/// binds to any single block, never to its siblings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes {
    /// Inline CSS declarations in insertion order; on conflicting properties
    /// the last one wins when the renderer merges the cascade.
    pub style: Vec<(String, String)>,
    /// Element id; if a payload names several, the last one wins.
    pub id: Option<String>,
    /// Class names in insertion order, duplicates dropped.
    pub classes: Vec<String>,
}

impl Attributes {
    /// Check if no attribute of any kind is set.
    pub fn is_empty(&self) -> bool {
        self.style.is_empty() && self.id.is_none() && self.classes.is_empty()
    }

    /// Fold another attribute set into this one. Later declarations win on
    /// conflicting style properties and ids; classes accumulate.
    pub fn merge(&mut self, other: Attributes) {
        for (prop, value) in other.style {
            if let Some(existing) = self.style.iter_mut().find(|(p, _)| *p == prop) {
                existing.1 = value;
            } else {
                self.style.push((prop, value));
            }
        }
        if other.id.is_some() {
            self.id = other.id;
        }
        for class in other.classes {
            if !self.classes.contains(&class) {
                self.classes.push(class);
            }
        }
    }
}

/// Inline-level nodes within headings, paragraphs, list items and quotes.
///
/// Nesting is shallow: a link's label is itself a span sequence, but images
/// and code spans never nest further.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// Plain text.
    Text(String),
    /// Inline code span, content verbatim.
    Code(String),
    /// `[label](url)` hyperlink with an inline-parsed label.
    Link { label: Vec<Inline>, url: String },
    /// `![alt](url)` image.
    Image { alt: String, url: String },
}

impl Inline {
    /// Concatenate the visible text of a span sequence (markup stripped).
    pub fn plain_text(spans: &[Inline]) -> String {
        let mut out = String::new();
        for span in spans {
            match span {
                Inline::Text(t) | Inline::Code(t) => out.push_str(t),
                Inline::Link { label, .. } => out.push_str(&Inline::plain_text(label)),
                Inline::Image { alt, .. } => out.push_str(alt),
            }
        }
        out
    }
}
