//! Output formats and the conversion boundary.
//!
//! HTML conversion is pure. PDF conversion hands the rendered HTML to a
//! [`PdfBackend`], a black box supplied by the caller; the core never knows
//! which engine sits behind it.

use crate::ast::Document;
use crate::error::ConvertError;
use crate::html;
use std::fmt;
use std::str::FromStr;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Pdf,
}

impl OutputFormat {
    /// Conventional file extension for the format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(ConvertError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A PDF rendering engine consuming final HTML (stylesheet embedded).
pub trait PdfBackend {
    /// Render the HTML page to PDF bytes.
    fn render(&self, html: &str) -> Result<Vec<u8>, ConvertError>;
}

/// Render a parsed document to a complete HTML page.
pub fn to_html(document: &Document) -> String {
    html::render(document)
}

/// Render a parsed document to PDF through the given backend.
pub fn to_pdf(document: &Document, backend: &dyn PdfBackend) -> Result<Vec<u8>, ConvertError> {
    backend.render(&to_html(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names_parse_case_insensitively() {
        assert_eq!("HTML".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert_eq!("pdf".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = "docx".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(name) if name == "docx"));
    }

    #[test]
    fn pdf_goes_through_the_backend() {
        struct Stub;
        impl PdfBackend for Stub {
            fn render(&self, html: &str) -> Result<Vec<u8>, ConvertError> {
                assert!(html.starts_with("<!DOCTYPE html>"));
                Ok(b"%PDF".to_vec())
            }
        }
        let document = crate::parser::Parser::new().parse("hello\n");
        assert_eq!(to_pdf(&document, &Stub).unwrap(), b"%PDF");
    }
}
