//! Ddown CLI - convert Ddown documents to HTML or PDF
//!
//! Usage:
//!   ddown convert document.ddown
//!   ddown convert document.ddown --format pdf --output out.pdf
//!   ddown convert document.ddown --css extra.css
//!   ddown convert document.ddown --dump-ast

mod pdf;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use ddown_core::ast;
use ddown_core::convert::{self, OutputFormat};
use ddown_core::{Block, Document, Inline};

use crate::pdf::WeasyPrintBackend;

#[derive(Parser)]
#[command(name = "ddown", version, about = "Ddown document converter")]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a Ddown document to HTML or PDF
    Convert(ConvertArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// Input Ddown file
    input: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "html")]
    format: String,

    /// Output path (defaults to the input path with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extra CSS file appended to the document's global style
    #[arg(long)]
    css: Option<PathBuf>,

    /// Print the parsed document as JSON instead of converting
    #[arg(long)]
    dump_ast: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Convert(args) => cmd_convert(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_convert(args: ConvertArgs) -> Result<()> {
    let input = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read '{}'", args.input.display()))?;

    let result = ddown_core::Parser::new().parse_with_recovery(&input);
    for warning in result.warnings.iter() {
        warn!("{}", warning);
    }
    let mut document = result.document;
    debug!(blocks = document.blocks.len(), "parsed document");

    if let Some(css_path) = &args.css {
        let css = fs::read_to_string(css_path)
            .with_context(|| format!("failed to read '{}'", css_path.display()))?;
        if !document.global_style.is_empty() {
            document.global_style.push('\n');
        }
        document.global_style.push_str(css.trim());
    }

    if args.dump_ast {
        println!("{}", serde_json::to_string_pretty(&JsonDocument::from(&document))?);
        return Ok(());
    }

    let format: OutputFormat = args.format.parse()?;
    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension(format.extension()));

    match format {
        OutputFormat::Html => {
            let html = convert::to_html(&document);
            fs::write(&output, html)
                .with_context(|| format!("failed to write '{}'", output.display()))?;
        }
        OutputFormat::Pdf => {
            let backend = WeasyPrintBackend::default();
            let bytes = convert::to_pdf(&document, &backend)?;
            fs::write(&output, bytes)
                .with_context(|| format!("failed to write '{}'", output.display()))?;
        }
    }

    info!("wrote {}", output.display());
    Ok(())
}

// =============================================================================
// JSON Output
// =============================================================================

#[derive(Serialize)]
struct JsonDocument<'a> {
    flags: Vec<&'a str>,
    global_style: &'a str,
    blocks: Vec<JsonBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum JsonBlock<'a> {
    Heading {
        level: u8,
        content: Vec<JsonInline<'a>>,
        #[serde(skip_serializing_if = "JsonAttributes::is_empty")]
        attrs: JsonAttributes<'a>,
    },
    Paragraph {
        content: Vec<JsonInline<'a>>,
        #[serde(skip_serializing_if = "JsonAttributes::is_empty")]
        attrs: JsonAttributes<'a>,
    },
    UnorderedList {
        items: Vec<Vec<JsonInline<'a>>>,
        #[serde(skip_serializing_if = "JsonAttributes::is_empty")]
        attrs: JsonAttributes<'a>,
    },
    OrderedList {
        items: Vec<Vec<JsonInline<'a>>>,
        #[serde(skip_serializing_if = "JsonAttributes::is_empty")]
        attrs: JsonAttributes<'a>,
    },
    CodeBlock {
        lang: Option<&'a str>,
        content: &'a str,
    },
    Blockquote {
        lines: Vec<Vec<JsonInline<'a>>>,
    },
    Table {
        header: Vec<&'a str>,
        rows: Vec<Vec<&'a str>>,
    },
}

#[derive(Serialize)]
struct JsonAttributes<'a> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    style: Vec<(&'a str, &'a str)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    classes: Vec<&'a str>,
}

impl JsonAttributes<'_> {
    fn is_empty(&self) -> bool {
        self.style.is_empty() && self.id.is_none() && self.classes.is_empty()
    }
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum JsonInline<'a> {
    Text { content: &'a str },
    Code { content: &'a str },
    Link { label: Vec<JsonInline<'a>>, url: &'a str },
    Image { alt: &'a str, url: &'a str },
}

impl<'a> From<&'a Document> for JsonDocument<'a> {
    fn from(doc: &'a Document) -> Self {
        JsonDocument {
            flags: doc
                .flags
                .iter()
                .map(|flag| match flag {
                    ast::Flag::DarkMode => "dark-mode",
                })
                .collect(),
            global_style: &doc.global_style,
            blocks: doc.blocks.iter().map(convert_block).collect(),
        }
    }
}

fn convert_block(block: &Block) -> JsonBlock<'_> {
    match block {
        Block::Heading(h) => JsonBlock::Heading {
            level: h.level,
            content: convert_inlines(&h.content),
            attrs: convert_attrs(&h.attrs),
        },
        Block::Paragraph(p) => JsonBlock::Paragraph {
            content: convert_inlines(&p.content),
            attrs: convert_attrs(&p.attrs),
        },
        Block::UnorderedList(l) => JsonBlock::UnorderedList {
            items: l.items.iter().map(|item| convert_inlines(item)).collect(),
            attrs: convert_attrs(&l.attrs),
        },
        Block::OrderedList(l) => JsonBlock::OrderedList {
            items: l.items.iter().map(|item| convert_inlines(item)).collect(),
            attrs: convert_attrs(&l.attrs),
        },
        Block::CodeBlock(c) => JsonBlock::CodeBlock {
            lang: c.lang.as_deref(),
            content: &c.content,
        },
        Block::Blockquote(q) => JsonBlock::Blockquote {
            lines: q.lines.iter().map(|line| convert_inlines(line)).collect(),
        },
        Block::Table(t) => JsonBlock::Table {
            header: t.header.iter().map(String::as_str).collect(),
            rows: t
                .rows
                .iter()
                .map(|row| row.iter().map(String::as_str).collect())
                .collect(),
        },
    }
}

fn convert_attrs(attrs: &ast::Attributes) -> JsonAttributes<'_> {
    JsonAttributes {
        style: attrs
            .style
            .iter()
            .map(|(p, v)| (p.as_str(), v.as_str()))
            .collect(),
        id: attrs.id.as_deref(),
        classes: attrs.classes.iter().map(String::as_str).collect(),
    }
}

fn convert_inlines(spans: &[Inline]) -> Vec<JsonInline<'_>> {
    spans.iter().map(convert_inline).collect()
}

fn convert_inline(span: &Inline) -> JsonInline<'_> {
    match span {
        Inline::Text(t) => JsonInline::Text { content: t },
        Inline::Code(c) => JsonInline::Code { content: c },
        Inline::Link { label, url } => JsonInline::Link {
            label: convert_inlines(label),
            url,
        },
        Inline::Image { alt, url } => JsonInline::Image { alt, url },
    }
}
