//! HTML renderer.
//!
//! Walks the block tree and emits a complete HTML document. Matching on
//! [`Block`] and [`Inline`] is exhaustive, so a new node kind cannot be
//! silently skipped here.
//!
//! The global stylesheet is embedded verbatim in a `<style>` element and
//! additionally resolved per element: every block gets its effective style
//! (tag rule, then class rules, then id rule, then its own inline style)
//! written out as a `style` attribute, so precedence holds even when the
//! output is consumed without a CSS engine, as the PDF backend may do.

use crate::ast::{Attributes, Block, Document, Flag, Inline};
use crate::style::Stylesheet;
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Base theme injected when the dark-mode directive flag is set. Global
/// style rules are emitted after it and therefore override it.
const DARK_THEME: &str = "\
body { background-color: #1e1e1e; color: #d4d4d4; }
a { color: #6cb6ff; }
pre, code { background-color: #2d2d2d; }
blockquote { border-left: 4px solid #555555; padding-left: 1em; color: #a8a8a8; }
th, td { border: 1px solid #555555; }";

/// Render a document to a complete HTML page.
pub fn render(document: &Document) -> String {
    HtmlRenderer::new(document).render()
}

struct HtmlRenderer<'a> {
    document: &'a Document,
    stylesheet: Stylesheet,
    out: String,
}

impl<'a> HtmlRenderer<'a> {
    fn new(document: &'a Document) -> Self {
        Self {
            document,
            stylesheet: Stylesheet::parse(&document.global_style),
            out: String::with_capacity(1024),
        }
    }

    fn render(mut self) -> String {
        self.out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        self.out.push_str("<meta charset=\"UTF-8\">\n");
        self.out
            .push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        self.out.push_str("<title>Ddown Document</title>\n");
        self.render_style_element();
        self.out.push_str("</head>\n<body>\n");

        for block in &self.document.blocks {
            self.render_block(block);
            self.out.push('\n');
        }

        self.out.push_str("</body>\n</html>\n");
        self.out
    }

    fn render_style_element(&mut self) {
        let dark = self.document.has_flag(Flag::DarkMode);
        if !dark && self.document.global_style.is_empty() {
            return;
        }
        self.out.push_str("<style>\n");
        if dark {
            self.out.push_str(DARK_THEME);
            self.out.push('\n');
        }
        if !self.document.global_style.is_empty() {
            self.out.push_str(&self.document.global_style);
            self.out.push('\n');
        }
        self.out.push_str("</style>\n");
    }

    fn render_block(&mut self, block: &Block) {
        match block {
            Block::Heading(heading) => {
                let tag = ["h1", "h2", "h3", "h4", "h5"]
                    [usize::from(heading.level.clamp(1, 5)) - 1];
                self.open_tag(tag, &heading.attrs);
                self.render_inlines(&heading.content);
                self.close_tag(tag);
            }
            Block::Paragraph(paragraph) => {
                self.open_tag("p", &paragraph.attrs);
                self.render_inlines(&paragraph.content);
                self.close_tag("p");
            }
            Block::UnorderedList(list) => self.render_list("ul", list),
            Block::OrderedList(list) => self.render_list("ol", list),
            Block::CodeBlock(code) => {
                self.open_tag("pre", &Attributes::default());
                match &code.lang {
                    Some(lang) => {
                        self.out.push_str("<code class=\"language-");
                        self.out
                            .push_str(&encode_double_quoted_attribute(lang.as_str()));
                        self.out.push_str("\">");
                    }
                    None => self.out.push_str("<code>"),
                }
                self.out.push_str(&encode_text(&code.content));
                self.out.push_str("</code></pre>");
            }
            Block::Blockquote(quote) => {
                self.open_tag("blockquote", &Attributes::default());
                for (i, line) in quote.lines.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str("<br>");
                    }
                    self.render_inlines(line);
                }
                self.close_tag("blockquote");
            }
            Block::Table(table) => {
                self.open_tag("table", &Attributes::default());
                self.out.push_str("<thead><tr>");
                for cell in &table.header {
                    self.out.push_str("<th>");
                    self.out.push_str(&encode_text(cell));
                    self.out.push_str("</th>");
                }
                self.out.push_str("</tr></thead><tbody>");
                for row in &table.rows {
                    self.out.push_str("<tr>");
                    for cell in row {
                        self.out.push_str("<td>");
                        self.out.push_str(&encode_text(cell));
                        self.out.push_str("</td>");
                    }
                    self.out.push_str("</tr>");
                }
                self.out.push_str("</tbody></table>");
            }
        }
    }

    fn render_list(&mut self, tag: &str, list: &crate::ast::ListBlock) {
        self.open_tag(tag, &list.attrs);
        for item in &list.items {
            self.out.push_str("<li>");
            self.render_inlines(item);
            self.out.push_str("</li>");
        }
        self.close_tag(tag);
    }

    fn render_inlines(&mut self, spans: &[Inline]) {
        for span in spans {
            match span {
                Inline::Text(text) => self.out.push_str(&encode_text(text)),
                Inline::Code(code) => {
                    self.out.push_str("<code>");
                    self.out.push_str(&encode_text(code));
                    self.out.push_str("</code>");
                }
                Inline::Link { label, url } => {
                    self.out.push_str("<a href=\"");
                    self.out
                        .push_str(&encode_double_quoted_attribute(url.as_str()));
                    self.out.push_str("\">");
                    self.render_inlines(label);
                    self.out.push_str("</a>");
                }
                Inline::Image { alt, url } => {
                    self.out.push_str("<img src=\"");
                    self.out
                        .push_str(&encode_double_quoted_attribute(url.as_str()));
                    self.out.push_str("\" alt=\"");
                    self.out
                        .push_str(&encode_double_quoted_attribute(alt.as_str()));
                    self.out.push_str("\">");
                }
            }
        }
    }

    /// Open a tag carrying the element's resolved style, classes and id.
    fn open_tag(&mut self, tag: &str, attrs: &Attributes) {
        self.out.push('<');
        self.out.push_str(tag);

        let style = self.stylesheet.effective_style(tag, attrs);
        if !style.is_empty() {
            self.out.push_str(" style=\"");
            for (i, (prop, value)) in style.iter().enumerate() {
                if i > 0 {
                    self.out.push_str("; ");
                }
                self.out
                    .push_str(&encode_double_quoted_attribute(prop.as_str()));
                self.out.push_str(": ");
                self.out
                    .push_str(&encode_double_quoted_attribute(value.as_str()));
            }
            self.out.push('"');
        }
        if !attrs.classes.is_empty() {
            self.out.push_str(" class=\"");
            for (i, class) in attrs.classes.iter().enumerate() {
                if i > 0 {
                    self.out.push(' ');
                }
                self.out
                    .push_str(&encode_double_quoted_attribute(class.as_str()));
            }
            self.out.push('"');
        }
        if let Some(id) = &attrs.id {
            self.out.push_str(" id=\"");
            self.out
                .push_str(&encode_double_quoted_attribute(id.as_str()));
            self.out.push('"');
        }
        self.out.push('>');
    }

    #[inline]
    fn close_tag(&mut self, tag: &str) {
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }
}
