//! # Ddown Core
//!
//! Parser and renderers for the Ddown lightweight markup language.
//!
//! Ddown uses underline headings (`===`, `---`, `~~~`, `^^^`, `***` for
//! levels 1 through 5), `=>` list markers, fenced code blocks, pipe tables
//! and trailing `{...}` attribute payloads for per-block styling.
//!
//! ## Quick Start
//!
//! ```rust
//! use ddown_core::Parser;
//!
//! let input = "Hello World\n===========\n\nA paragraph with `code`.";
//! let mut parser = Parser::new();
//! let doc = parser.parse(input);
//!
//! let html = ddown_core::convert::to_html(&doc);
//! assert!(html.contains("<h1>Hello World</h1>"));
//! ```
//!
//! ## Forgiving parsing
//!
//! Parsing never fails. Malformed markup degrades to literal text or is
//! dropped, and every recovery is reported as a warning:
//!
//! ```rust
//! use ddown_core::Parser;
//!
//! let input = "Title {@ color }\n=====";
//! let result = Parser::new().parse_with_recovery(input);
//!
//! assert_eq!(result.document.blocks.len(), 1);
//! assert_eq!(result.warnings.len(), 1);
//! ```

pub mod ast;
pub mod attr;
pub mod convert;
pub mod error;
pub mod html;
pub mod inline;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod style;

pub use ast::{Attributes, Block, Document, Flag, Inline};
pub use convert::{OutputFormat, PdfBackend};
pub use error::{ConvertError, ParseWarning, ParseWarnings, WarningKind};
pub use parser::{ParseResult, Parser};
