//! Line Classifier
//!
//! Maps a single Markdown line to exactly one category. Prefix tests run in
//! a fixed priority order, so a line that would match several categories
//! always lands in the first one.

use super::markup::strip_inline_markup;

/// Maximum characters kept per table cell
pub const MAX_CELL_CHARS: usize = 40;

/// Characters kept before the ellipsis when a cell is truncated
const TRUNCATED_CELL_CHARS: usize = 37;

/// Delimiter placed between table cells
pub const CELL_DELIMITER: &str = " | ";

/// Prefix used for bullet items
pub const BULLET_PREFIX: &str = "   - ";

/// Category of one Markdown line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Blank,
    Heading1,
    Heading2,
    Heading3,
    Italic,
    Rule,
    Bullet,
    TableRow,
    Paragraph,
}

impl std::fmt::Display for LineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LineKind::Blank => "blank",
            LineKind::Heading1 => "heading1",
            LineKind::Heading2 => "heading2",
            LineKind::Heading3 => "heading3",
            LineKind::Italic => "italic",
            LineKind::Rule => "rule",
            LineKind::Bullet => "bullet",
            LineKind::TableRow => "table_row",
            LineKind::Paragraph => "paragraph",
        };
        f.write_str(name)
    }
}

/// Classify an already trimmed line
pub fn classify(line: &str) -> LineKind {
    if line.is_empty() {
        LineKind::Blank
    } else if line.starts_with("# ") && !line.starts_with("## ") {
        LineKind::Heading1
    } else if line.starts_with("## ") {
        LineKind::Heading2
    } else if line.starts_with("### ") {
        LineKind::Heading3
    } else if line.starts_with('*') && line.ends_with('*') && !line.starts_with("**") {
        LineKind::Italic
    } else if line.starts_with("---") {
        LineKind::Rule
    } else if line.starts_with("- ") || line.starts_with("* ") {
        LineKind::Bullet
    } else if line.contains('|') {
        LineKind::TableRow
    } else {
        LineKind::Paragraph
    }
}

/// A classified line together with the text it displays
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedLine {
    pub kind: LineKind,
    /// Display text; `None` when the line emits nothing
    pub text: Option<String>,
}

/// Classify a trimmed, sanitized line and build its display text.
///
/// Table divider rows (`|---|:--:|`) classify as [`LineKind::TableRow`]
/// with no text, so they are skipped by the layout driver.
pub fn interpret(line: &str) -> ClassifiedLine {
    let kind = classify(line);
    let text = match kind {
        LineKind::Blank | LineKind::Rule => None,
        LineKind::Heading1 => Some(line[2..].to_string()),
        LineKind::Heading2 => Some(line[3..].to_string()),
        LineKind::Heading3 => Some(line[4..].to_string()),
        LineKind::Italic => Some(line.trim_matches('*').to_string()),
        LineKind::Bullet => Some(format!("{}{}", BULLET_PREFIX, strip_inline_markup(&line[2..]))),
        LineKind::TableRow => table_row_text(line),
        LineKind::Paragraph => Some(strip_inline_markup(line)),
    };
    ClassifiedLine { kind, text }
}

/// Split a table row on pipes, trimming cells and dropping empty ones
pub fn split_cells(row: &str) -> Vec<&str> {
    row.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect()
}

/// Whether every cell is made only of alignment characters (`-`, `:`, space)
pub fn is_divider_row(cells: &[&str]) -> bool {
    !cells.is_empty()
        && cells
            .iter()
            .all(|cell| cell.chars().all(|c| matches!(c, '-' | ':' | ' ')))
}

/// Cap a cell at [`MAX_CELL_CHARS`], ending truncated cells with `...`
pub fn truncate_cell(cell: &str) -> String {
    if cell.chars().count() > MAX_CELL_CHARS {
        let head: String = cell.chars().take(TRUNCATED_CELL_CHARS).collect();
        format!("{}...", head)
    } else {
        cell.to_string()
    }
}

/// Display text of a table row, or `None` for a divider row
pub fn table_row_text(row: &str) -> Option<String> {
    let cells = split_cells(row);
    if is_divider_row(&cells) {
        return None;
    }

    let formatted: Vec<String> = cells
        .iter()
        .map(|cell| truncate_cell(&strip_inline_markup(cell)))
        .collect();
    Some(formatted.join(CELL_DELIMITER))
}
