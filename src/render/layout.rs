//! Page Layout
//!
//! Lays classified lines out onto A4 pages in two passes. The first pass
//! wraps and positions body text, breaking pages as the cursor reaches the
//! bottom margin. The second pass decorates every page with the running
//! header and a `Page n/N` footer once the total page count is known.
//!
//! All coordinates are millimetres measured from the top-left corner of the
//! page. Baselines are absolute, so the PDF writer only has to flip the y
//! axis.

use super::classify::{LineKind, interpret};
use super::metrics::{char_width_mm, pt_to_mm, text_width_mm};
use super::sanitize::sanitize;
use super::style::{
    Color, FOOTER_TEXT, HEADER_TEXT, RULE_WIDTH_MM, RuleStyle, StyleToken, TextStyle, palette,
    style_for,
};

/// Running header label shown on every page
pub const HEADER_LABEL: &str = "Legacy Code Documentation Agent";

/// Fraction of the font size added below the line-box centre to reach the baseline
const BASELINE_FACTOR: f32 = 0.3;

/// Page size and margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_left_mm: f32,
    pub margin_right_mm: f32,
    /// Top of the header cell
    pub margin_top_mm: f32,
    /// Cursor position where body content starts on each page
    pub content_top_mm: f32,
    /// Distance from the page bottom that triggers a page break
    pub margin_bottom_mm: f32,
    /// Horizontal padding inside a text cell
    pub cell_padding_mm: f32,
    /// Vertical position of the header separator
    pub header_rule_mm: f32,
    /// Distance of the footer cell from the page bottom
    pub footer_offset_mm: f32,
    /// Height of the header and footer cells
    pub band_height_mm: f32,
}

impl PageGeometry {
    /// ISO A4 portrait
    pub const fn a4() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_left_mm: 10.0,
            margin_right_mm: 10.0,
            margin_top_mm: 10.0,
            content_top_mm: 25.0,
            margin_bottom_mm: 20.0,
            cell_padding_mm: 1.0,
            header_rule_mm: 18.0,
            footer_offset_mm: 15.0,
            band_height_mm: 10.0,
        }
    }

    /// Width between the left and right margins
    pub fn content_width_mm(&self) -> f32 {
        self.width_mm - self.margin_left_mm - self.margin_right_mm
    }

    /// Width available to wrapped text inside a cell
    pub fn text_width_mm(&self) -> f32 {
        self.content_width_mm() - 2.0 * self.cell_padding_mm
    }

    /// Lowest cursor position a line box may reach
    pub fn break_limit_mm(&self) -> f32 {
        self.height_mm - self.margin_bottom_mm
    }

    fn right_edge_mm(&self) -> f32 {
        self.width_mm - self.margin_right_mm
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// What produced a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Header,
    Footer,
    Body(LineKind),
}

/// A single line of positioned text
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub role: Role,
    pub text: String,
    pub x_mm: f32,
    pub baseline_mm: f32,
    pub style: TextStyle,
}

/// A horizontal separator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleLine {
    pub x1_mm: f32,
    pub x2_mm: f32,
    pub y_mm: f32,
    pub color: Color,
    pub width_mm: f32,
}

/// Drawing operation on a page
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextRun),
    Rule(RuleLine),
}

/// Body content of one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub ops: Vec<DrawOp>,
}

/// Result of the first layout pass
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutDocument {
    pub geometry: PageGeometry,
    pub pages: Vec<LaidOutPage>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Body text runs across all pages, in reading order
    pub fn body_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(|page| {
            page.ops.iter().filter_map(|op| match op {
                DrawOp::Text(run) if matches!(run.role, Role::Body(_)) => Some(run),
                _ => None,
            })
        })
    }

    /// Second pass: wrap each page's body with header and footer.
    pub fn decorate(self) -> Vec<LaidOutPage> {
        let total = self.pages.len();
        let geometry = self.geometry;

        self.pages
            .into_iter()
            .enumerate()
            .map(|(index, page)| {
                let mut ops = header_ops(&geometry);
                ops.extend(page.ops);
                ops.push(footer_op(&geometry, index + 1, total));
                LaidOutPage { ops }
            })
            .collect()
    }
}

fn baseline_mm(top_mm: f32, height_mm: f32, size_pt: f32) -> f32 {
    top_mm + 0.5 * height_mm + BASELINE_FACTOR * pt_to_mm(size_pt)
}

fn header_ops(geometry: &PageGeometry) -> Vec<DrawOp> {
    vec![
        DrawOp::Text(TextRun {
            role: Role::Header,
            text: HEADER_LABEL.to_string(),
            x_mm: geometry.margin_left_mm + geometry.cell_padding_mm,
            baseline_mm: baseline_mm(
                geometry.margin_top_mm,
                geometry.band_height_mm,
                HEADER_TEXT.size_pt,
            ),
            style: HEADER_TEXT,
        }),
        DrawOp::Rule(RuleLine {
            x1_mm: geometry.margin_left_mm,
            x2_mm: geometry.right_edge_mm(),
            y_mm: geometry.header_rule_mm,
            color: palette::ACCENT,
            width_mm: RULE_WIDTH_MM,
        }),
    ]
}

/// Footer text for page `number` of `total`
pub fn footer_text(number: usize, total: usize) -> String {
    format!("Page {}/{}", number, total)
}

fn footer_op(geometry: &PageGeometry, number: usize, total: usize) -> DrawOp {
    let text = footer_text(number, total);
    let width = text_width_mm(&text, FOOTER_TEXT.font, FOOTER_TEXT.size_pt);
    let top = geometry.height_mm - geometry.footer_offset_mm;

    DrawOp::Text(TextRun {
        role: Role::Footer,
        x_mm: geometry.margin_left_mm + (geometry.content_width_mm() - width) / 2.0,
        baseline_mm: baseline_mm(top, geometry.band_height_mm, FOOTER_TEXT.size_pt),
        style: FOOTER_TEXT,
        text,
    })
}

/// Greedy word wrap measured with the font's glyph widths.
///
/// Breaks after the last space that fits, dropping that space. A word wider
/// than the line is broken before the first character that overflows. Always
/// returns at least one line, so empty text still occupies a line box.
pub fn wrap_text(text: &str, style: &TextStyle, max_width_mm: f32) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut last_space: Option<usize> = None;
    let mut width = 0.0;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == ' ' {
            last_space = Some(i);
        }
        width += char_width_mm(c, style.font, style.size_pt);

        if width > max_width_mm && i > start {
            match last_space {
                Some(space) if space > start => {
                    lines.push(chars[start..space].iter().collect());
                    start = space + 1;
                }
                _ => {
                    lines.push(chars[start..i].iter().collect());
                    start = i;
                }
            }
            i = start;
            last_space = None;
            width = 0.0;
            continue;
        }
        i += 1;
    }

    if start < chars.len() || lines.is_empty() {
        lines.push(chars[start..].iter().collect());
    }
    lines
}

/// First-pass layout state
#[derive(Debug)]
pub struct LayoutEngine {
    geometry: PageGeometry,
    pages: Vec<LaidOutPage>,
    cursor_mm: f32,
}

impl LayoutEngine {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![LaidOutPage::default()],
            cursor_mm: geometry.content_top_mm,
        }
    }

    /// Lay out a whole Markdown document
    pub fn layout(markdown: &str, geometry: PageGeometry) -> LaidOutDocument {
        let mut engine = Self::new(geometry);
        for line in markdown.split('\n') {
            engine.push_line(line);
        }
        engine.finish()
    }

    /// Current vertical position
    pub fn cursor_mm(&self) -> f32 {
        self.cursor_mm
    }

    /// Classify one raw Markdown line and emit it
    pub fn push_line(&mut self, raw: &str) {
        let line = sanitize(raw.trim());
        let classified = interpret(&line);

        // Divider rows produce nothing at all
        if classified.kind == LineKind::TableRow && classified.text.is_none() {
            return;
        }

        self.emit(classified.kind, classified.text.as_deref(), style_for(classified.kind));
    }

    fn emit(&mut self, kind: LineKind, text: Option<&str>, token: &StyleToken) {
        self.cursor_mm += token.gap_before_mm;

        if let (Some(text), Some(style)) = (text, token.text.as_ref()) {
            self.emit_text(kind, text, style, token);
        }

        self.cursor_mm += token.gap_after_mm;

        if let Some(rule) = token.rule.as_ref() {
            self.emit_rule(rule);
        }
    }

    fn emit_text(&mut self, kind: LineKind, text: &str, style: &TextStyle, token: &StyleToken) {
        let x = self.geometry.margin_left_mm + self.geometry.cell_padding_mm + token.indent_mm;
        let max_width = self.geometry.text_width_mm() - token.indent_mm;
        let height = token.line_height_mm;

        for line in wrap_text(text, style, max_width) {
            if self.cursor_mm + height > self.geometry.break_limit_mm() {
                self.new_page();
            }

            let run = TextRun {
                role: Role::Body(kind),
                text: line,
                x_mm: x,
                baseline_mm: baseline_mm(self.cursor_mm, height, style.size_pt),
                style: *style,
            };
            self.current_page().ops.push(DrawOp::Text(run));
            self.cursor_mm += height;
        }
    }

    /// Separators stay on the page of the block they follow; only the next
    /// text line may start a new page.
    fn emit_rule(&mut self, rule: &RuleStyle) {
        let line = RuleLine {
            x1_mm: self.geometry.margin_left_mm,
            x2_mm: self.geometry.right_edge_mm(),
            y_mm: self.cursor_mm,
            color: rule.color,
            width_mm: rule.width_mm,
        };
        self.current_page().ops.push(DrawOp::Rule(line));
        self.cursor_mm += rule.gap_after_mm;
    }

    fn new_page(&mut self) {
        self.pages.push(LaidOutPage::default());
        self.cursor_mm = self.geometry.content_top_mm;
    }

    fn current_page(&mut self) -> &mut LaidOutPage {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn finish(self) -> LaidOutDocument {
        LaidOutDocument {
            geometry: self.geometry,
            pages: self.pages,
        }
    }
}
