//! WeasyPrint subprocess backend for PDF output.
//!
//! The core treats PDF generation as a black box behind [`PdfBackend`]; this
//! implementation shells out to the `weasyprint` executable, feeding HTML on
//! stdin and reading the PDF from stdout.

use std::io::Write;
use std::process::{Command, Stdio};

use ddown_core::{ConvertError, PdfBackend};
use tracing::debug;

pub struct WeasyPrintBackend {
    command: String,
}

impl WeasyPrintBackend {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for WeasyPrintBackend {
    fn default() -> Self {
        Self::new("weasyprint")
    }
}

impl PdfBackend for WeasyPrintBackend {
    fn render(&self, html: &str) -> Result<Vec<u8>, ConvertError> {
        debug!(command = %self.command, bytes = html.len(), "invoking pdf backend");

        let mut child = Command::new(&self.command)
            .arg("-")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ConvertError::Backend(format!("failed to launch '{}': {}", self.command, e))
            })?;

        // stdin must be closed before waiting or weasyprint blocks on it.
        // A backend that exits before draining stdin breaks the pipe; the
        // exit status check below carries its stderr, which is the error
        // worth reporting.
        if let Some(mut stdin) = child.stdin.take() {
            let _ = stdin.write_all(html.as_bytes());
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConvertError::Backend(format!(
                "'{}' exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}
