//! Render Command
//!
//! Convert an existing Markdown report to PDF.
//!
//! Usage:
//!   legacydoc render <markdown> [--output PDF]

use std::path::Path;

use crate::cli::Output;
use crate::render::convert_md_file_to_pdf;
use crate::types::{AgentError, RenderError, Result};

pub fn run(markdown: &Path, output_path: Option<&Path>) -> Result<()> {
    let outcome = convert_md_file_to_pdf(markdown, output_path);

    match (outcome.success, outcome.output_path) {
        (true, Some(pdf)) => {
            Output::new().success(&format!("PDF saved: {}", pdf.display()));
            Ok(())
        }
        _ => Err(AgentError::Render(RenderError::new(
            outcome.error.unwrap_or_else(|| "unknown failure".to_string()),
        ))),
    }
}
