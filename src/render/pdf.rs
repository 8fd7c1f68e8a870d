//! PDF Writer
//!
//! Converts decorated pages into printpdf operations using the built-in
//! Helvetica faces, so no font files are embedded.

use std::fs;
use std::path::Path;

use printpdf::graphics::{LinePoint, PaintMode, Point, Polygon, PolygonRing, WindingOrder};
use printpdf::ops::Op;
use printpdf::{BuiltinFont, Mm, PdfDocument, PdfPage, PdfSaveOptions, Pt, Rgb, TextItem, TextMatrix};
use tracing::debug;

use super::layout::{DrawOp, LaidOutPage, PageGeometry, RuleLine, TextRun};
use super::metrics::PT_PER_MM;
use super::style::{Color, FontFace};
use crate::types::RenderError;

/// Document title stored in the PDF metadata
pub const DOCUMENT_TITLE: &str = "Legacy Code Documentation";

fn builtin(face: FontFace) -> BuiltinFont {
    match face {
        FontFace::Regular => BuiltinFont::Helvetica,
        FontFace::Bold => BuiltinFont::HelveticaBold,
        FontFace::Oblique => BuiltinFont::HelveticaOblique,
    }
}

fn to_pdf_color(c: Color) -> printpdf::color::Color {
    printpdf::color::Color::Rgb(Rgb::new(
        c.r as f32 / 255.0,
        c.g as f32 / 255.0,
        c.b as f32 / 255.0,
        None,
    ))
}

fn mm_to_pt(mm: f32) -> Pt {
    Pt(mm * PT_PER_MM)
}

/// Builds the operation list of one page, flipping to PDF's bottom-left origin
struct PageOps {
    height_mm: f32,
    ops: Vec<Op>,
}

impl PageOps {
    fn new(geometry: &PageGeometry) -> Self {
        Self {
            height_mm: geometry.height_mm,
            ops: Vec::new(),
        }
    }

    fn text(&mut self, run: &TextRun) {
        if run.text.is_empty() {
            return;
        }
        let font = builtin(run.style.font);

        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetFillColor {
            col: to_pdf_color(run.style.color),
        });
        self.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(run.style.size_pt),
            font,
        });
        self.ops.push(Op::SetTextMatrix {
            matrix: TextMatrix::Translate(
                mm_to_pt(run.x_mm),
                mm_to_pt(self.height_mm - run.baseline_mm),
            ),
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(run.text.clone())],
            font,
        });
        self.ops.push(Op::EndTextSection);
    }

    fn rule(&mut self, rule: &RuleLine) {
        let y = mm_to_pt(self.height_mm - rule.y_mm);
        let line = Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    LinePoint {
                        p: Point {
                            x: mm_to_pt(rule.x1_mm),
                            y,
                        },
                        bezier: false,
                    },
                    LinePoint {
                        p: Point {
                            x: mm_to_pt(rule.x2_mm),
                            y,
                        },
                        bezier: false,
                    },
                ],
            }],
            mode: PaintMode::Stroke,
            winding_order: WindingOrder::EvenOdd,
        };

        self.ops.push(Op::SetOutlineThickness {
            pt: mm_to_pt(rule.width_mm),
        });
        self.ops.push(Op::SetOutlineColor {
            col: to_pdf_color(rule.color),
        });
        self.ops.push(Op::DrawPolygon { polygon: line });
    }

    fn into_ops(self) -> Vec<Op> {
        self.ops
    }
}

/// Serialize decorated pages into PDF bytes
pub fn write_pdf(pages: &[LaidOutPage], geometry: &PageGeometry) -> Result<Vec<u8>, RenderError> {
    if pages.is_empty() {
        return Err(RenderError::new("document has no pages"));
    }

    let mut doc = PdfDocument::new(DOCUMENT_TITLE);

    for page in pages {
        let mut page_ops = PageOps::new(geometry);
        for op in &page.ops {
            match op {
                DrawOp::Text(run) => page_ops.text(run),
                DrawOp::Rule(rule) => page_ops.rule(rule),
            }
        }
        doc.pages.push(PdfPage::new(
            Mm(geometry.width_mm),
            Mm(geometry.height_mm),
            page_ops.into_ops(),
        ));
    }

    let mut bytes = Vec::new();
    let mut warnings = Vec::new();
    doc.save_writer(&mut bytes, &PdfSaveOptions::default(), &mut warnings);

    if !warnings.is_empty() {
        debug!(count = warnings.len(), "PDF serializer reported warnings");
    }
    if bytes.is_empty() {
        return Err(RenderError::new("PDF serializer produced no output"));
    }

    Ok(bytes)
}

/// Write PDF bytes to `path`, removing any partial file on failure
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| RenderError::new(e.to_string()))?;
    }

    if let Err(e) = fs::write(path, bytes) {
        let _ = fs::remove_file(path);
        return Err(RenderError::new(e.to_string()));
    }
    Ok(())
}
