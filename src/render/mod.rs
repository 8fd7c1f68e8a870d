//! Markdown to PDF renderer
//!
//! Converts the LLM's Markdown report into a paginated, styled A4 document.
//! The pipeline is sanitize → classify → layout → decorate → serialize, with
//! every stage a pure function except the final file write.

pub mod classify;
pub mod layout;
pub mod markup;
pub mod metrics;
pub mod pdf;
pub mod sanitize;
pub mod style;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

pub use classify::LineKind;
pub use layout::{LaidOutDocument, LayoutEngine, PageGeometry};

use crate::types::RenderError;

/// Result contract of a render call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOutcome {
    pub success: bool,
    pub output_path: Option<PathBuf>,
    pub error: Option<String>,
}

impl RenderOutcome {
    fn succeeded(path: &Path) -> Self {
        Self {
            success: true,
            output_path: Some(path.to_path_buf()),
            error: None,
        }
    }

    fn failed(path: Option<&Path>, error: String) -> Self {
        Self {
            success: false,
            output_path: path.map(Path::to_path_buf),
            error: Some(error),
        }
    }
}

/// Lay out `markdown` without serializing it
pub fn layout_markdown(markdown: &str) -> LaidOutDocument {
    LayoutEngine::layout(markdown, PageGeometry::a4())
}

/// Render `markdown` to PDF bytes
pub fn markdown_to_pdf_bytes(markdown: &str) -> Result<Vec<u8>, RenderError> {
    let document = layout_markdown(markdown);
    let geometry = document.geometry;
    debug!(pages = document.page_count(), "Layout complete");

    let pages = document.decorate();
    pdf::write_pdf(&pages, &geometry)
}

/// Render `markdown` and write it to `output_path`.
///
/// Never returns an error; failures are reported in the outcome with a
/// `PDF generation error: ` prefix.
pub fn markdown_to_pdf(markdown: &str, output_path: impl AsRef<Path>) -> RenderOutcome {
    let output_path = output_path.as_ref();

    let result = markdown_to_pdf_bytes(markdown)
        .and_then(|bytes| pdf::write_file(output_path, &bytes));

    match result {
        Ok(()) => {
            info!(path = %output_path.display(), "PDF written");
            RenderOutcome::succeeded(output_path)
        }
        Err(e) => {
            warn!(path = %output_path.display(), error = %e, "PDF generation failed");
            RenderOutcome::failed(Some(output_path), format!("PDF generation error: {}", e))
        }
    }
}

/// Default PDF path for a Markdown file: same location, `.pdf` extension
pub fn default_pdf_path(md_path: &Path) -> PathBuf {
    md_path.with_extension("pdf")
}

/// Read a Markdown file and render it to PDF
pub fn convert_md_file_to_pdf(md_path: impl AsRef<Path>, pdf_path: Option<&Path>) -> RenderOutcome {
    let md_path = md_path.as_ref();

    if !md_path.exists() {
        return RenderOutcome::failed(None, format!("File not found: {}", md_path.display()));
    }

    let pdf_path = pdf_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_pdf_path(md_path));

    match fs::read_to_string(md_path) {
        Ok(markdown) => markdown_to_pdf(&markdown, &pdf_path),
        Err(e) => RenderOutcome::failed(Some(&pdf_path), format!("Error reading file: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REPORT: &str = "# Documentation: loans.sql\n\n*Generated: 2024-05-01 10:00:00*\n\n---\n\n## 1. Overview\n\nComputes **monthly** interest.\n\n| Column | Type |\n|---|---|\n| rate | DECIMAL |\n\n- first\n- second\n";

    #[test]
    fn test_markdown_to_pdf_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");

        let outcome = markdown_to_pdf(REPORT, &path);
        assert!(outcome.success, "{:?}", outcome.error);
        assert_eq!(outcome.output_path.as_deref(), Some(path.as_path()));
        assert!(outcome.error.is_none());

        let bytes = fs::read(&path).unwrap();
        assert!(!bytes.is_empty());
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_empty_markdown_still_renders() {
        let bytes = markdown_to_pdf_bytes("").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_unwritable_path_reports_prefixed_error() {
        let dir = TempDir::new().unwrap();
        let outcome = markdown_to_pdf(REPORT, dir.path());
        assert!(!outcome.success);
        let error = outcome.error.unwrap();
        assert!(error.starts_with("PDF generation error: "), "{error}");
    }

    #[test]
    fn test_convert_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.md");
        let outcome = convert_md_file_to_pdf(&missing, None);
        assert!(!outcome.success);
        assert!(outcome.output_path.is_none());
        assert_eq!(
            outcome.error.unwrap(),
            format!("File not found: {}", missing.display())
        );
    }

    #[test]
    fn test_convert_defaults_to_sibling_pdf() {
        let dir = TempDir::new().unwrap();
        let md = dir.path().join("calc_documentation.md");
        fs::write(&md, REPORT).unwrap();

        let outcome = convert_md_file_to_pdf(&md, None);
        let expected = dir.path().join("calc_documentation.pdf");
        assert!(outcome.success, "{:?}", outcome.error);
        assert_eq!(outcome.output_path, Some(expected.clone()));
        assert!(expected.exists());
    }

    #[test]
    fn test_convert_explicit_target() {
        let dir = TempDir::new().unwrap();
        let md = dir.path().join("in.md");
        let pdf = dir.path().join("out").join("custom.pdf");
        fs::write(&md, "Hello").unwrap();

        let outcome = convert_md_file_to_pdf(&md, Some(&pdf));
        assert!(outcome.success);
        assert!(pdf.exists());
    }

    #[test]
    fn test_convert_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let md = dir.path().join("binary.md");
        fs::write(&md, [0xFF, 0xFE, 0x00, 0x80]).unwrap();

        let outcome = convert_md_file_to_pdf(&md, None);
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().starts_with("Error reading file: "));
    }

    #[test]
    fn test_layout_of_report_has_expected_kinds() {
        let doc = layout_markdown(REPORT);
        let kinds: Vec<LineKind> = doc
            .body_runs()
            .filter_map(|run| match run.role {
                layout::Role::Body(kind) => Some(kind),
                _ => None,
            })
            .collect();
        assert_eq!(kinds.first(), Some(&LineKind::Heading1));
        assert!(kinds.contains(&LineKind::Italic));
        assert!(kinds.contains(&LineKind::Heading2));
        assert_eq!(kinds.iter().filter(|k| **k == LineKind::TableRow).count(), 2);
        assert_eq!(kinds.iter().filter(|k| **k == LineKind::Bullet).count(), 2);
    }
}
