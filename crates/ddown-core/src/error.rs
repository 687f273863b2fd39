//! Warning and error types.
//!
//! The parser is forgiving by policy: malformed markup is dropped or treated
//! as literal text, and parsing always produces a document. What would be
//! syntax errors elsewhere are collected as [`ParseWarning`]s for callers
//! that want to report them (authoring tools, `--verbose` CLI runs).
//!
//! Failures only exist at the collaborator boundary - unreadable input,
//! unknown output formats, a missing PDF backend - and those are
//! [`ConvertError`]s, never parser state.

use crate::span::Span;
use std::fmt;

/// Categories of recovered parse problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A `{@ ... }` or `{# ...}` payload that could not be parsed and was dropped.
    MalformedAttributes,
    /// A fenced code block without a closing fence (extended to end of input).
    UnclosedFence,
    /// A `{@global-style}` block without its end marker (extended to end of input).
    UnclosedGlobalStyle,
    /// An unrecognized `{@...}` directive token (ignored).
    UnknownDirective,
}

/// A recovered parse problem with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// Human-readable message.
    pub message: String,
    /// Where in the source the problem was found.
    pub span: Option<Span>,
    /// Categorization.
    pub kind: WarningKind,
}

impl ParseWarning {
    pub fn malformed_attributes(payload: &str, span: Option<Span>) -> Self {
        Self {
            message: format!("malformed attribute payload: {{{}}}", payload),
            span,
            kind: WarningKind::MalformedAttributes,
        }
    }

    pub fn unclosed_fence(span: Option<Span>) -> Self {
        Self {
            message: "unclosed code fence, block extends to end of input".to_string(),
            span,
            kind: WarningKind::UnclosedFence,
        }
    }

    pub fn unclosed_global_style(span: Option<Span>) -> Self {
        Self {
            message: "unclosed {@global-style} block, extends to end of input".to_string(),
            span,
            kind: WarningKind::UnclosedGlobalStyle,
        }
    }

    pub fn unknown_directive(token: &str, span: Option<Span>) -> Self {
        Self {
            message: format!("unknown directive: {}", token),
            span,
            kind: WarningKind::UnknownDirective,
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(span) = self.span {
            write!(f, " at bytes {}..{}", span.start, span.end)?;
        }
        Ok(())
    }
}

/// Warnings collected during a single parse, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct ParseWarnings {
    warnings: Vec<ParseWarning>,
}

impl ParseWarnings {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    pub fn push(&mut self, warning: ParseWarning) {
        self.warnings.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParseWarning> {
        self.warnings.iter()
    }
}

impl IntoIterator for ParseWarnings {
    type Item = ParseWarning;
    type IntoIter = std::vec::IntoIter<ParseWarning>;

    fn into_iter(self) -> Self::IntoIter {
        self.warnings.into_iter()
    }
}

/// Failures at the conversion boundary.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Output format name the pipeline does not know.
    #[error("unsupported output format: {0} (supported: html, pdf)")]
    UnsupportedFormat(String),
    /// The PDF backend was unavailable or reported a failure.
    #[error("pdf backend failed: {0}")]
    Backend(String),
    /// Reading input or writing output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
