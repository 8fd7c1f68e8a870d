//! Style Tokens
//!
//! Fixed per-category styling. Every emit operation receives its token
//! explicitly; nothing here is mutated while a document is laid out.

use super::classify::LineKind;

/// Built-in font faces used by the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
    Oblique,
}

impl FontFace {
    /// PostScript name of the standard font
    pub fn postscript_name(&self) -> &'static str {
        match self {
            FontFace::Regular => "Helvetica",
            FontFace::Bold => "Helvetica-Bold",
            FontFace::Oblique => "Helvetica-Oblique",
        }
    }
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Report palette
pub mod palette {
    use super::Color;

    pub const TITLE: Color = Color::rgb(26, 82, 118);
    pub const ACCENT: Color = Color::rgb(40, 116, 166);
    pub const SUBSECTION: Color = Color::rgb(46, 134, 193);
    pub const MUTED: Color = Color::rgb(100, 100, 100);
    pub const BODY: Color = Color::rgb(51, 51, 51);
    pub const RULE: Color = Color::rgb(200, 200, 200);
}

/// Font, size and color of a text run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontFace,
    /// Font size in points
    pub size_pt: f32,
    pub color: Color,
}

impl TextStyle {
    pub const fn new(font: FontFace, size_pt: f32, color: Color) -> Self {
        Self {
            font,
            size_pt,
            color,
        }
    }
}

/// Horizontal separator drawn after a block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleStyle {
    pub color: Color,
    /// Stroke width in millimetres
    pub width_mm: f32,
    /// Space after the separator in millimetres
    pub gap_after_mm: f32,
}

/// Complete styling for one line category. All distances are millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleToken {
    /// `None` for categories that emit no text (horizontal rules)
    pub text: Option<TextStyle>,
    pub indent_mm: f32,
    pub line_height_mm: f32,
    pub gap_before_mm: f32,
    pub gap_after_mm: f32,
    pub rule: Option<RuleStyle>,
}

/// Default stroke width of separators
pub const RULE_WIDTH_MM: f32 = 0.2;

/// Cursor advance for a blank line
pub const BLANK_LINE_GAP_MM: f32 = 3.0;

const BODY_TEXT: TextStyle = TextStyle::new(FontFace::Regular, 11.0, palette::BODY);

const fn text_token(
    text: TextStyle,
    line_height_mm: f32,
    gap_before_mm: f32,
    gap_after_mm: f32,
) -> StyleToken {
    StyleToken {
        text: Some(text),
        indent_mm: 0.0,
        line_height_mm,
        gap_before_mm,
        gap_after_mm,
        rule: None,
    }
}

const HEADING1: StyleToken = StyleToken {
    rule: Some(RuleStyle {
        color: palette::TITLE,
        width_mm: RULE_WIDTH_MM,
        gap_after_mm: 5.0,
    }),
    ..text_token(
        TextStyle::new(FontFace::Bold, 18.0, palette::TITLE),
        10.0,
        0.0,
        2.0,
    )
};

const HEADING2: StyleToken = text_token(
    TextStyle::new(FontFace::Bold, 14.0, palette::ACCENT),
    8.0,
    5.0,
    2.0,
);

const HEADING3: StyleToken = text_token(
    TextStyle::new(FontFace::Bold, 12.0, palette::SUBSECTION),
    7.0,
    3.0,
    1.0,
);

const ITALIC: StyleToken = text_token(
    TextStyle::new(FontFace::Oblique, 10.0, palette::MUTED),
    6.0,
    0.0,
    2.0,
);

const RULE: StyleToken = StyleToken {
    text: None,
    indent_mm: 0.0,
    line_height_mm: 0.0,
    gap_before_mm: 3.0,
    gap_after_mm: 0.0,
    rule: Some(RuleStyle {
        color: palette::RULE,
        width_mm: RULE_WIDTH_MM,
        gap_after_mm: 5.0,
    }),
};

const BULLET: StyleToken = text_token(BODY_TEXT, 6.0, 0.0, 0.0);

const TABLE_ROW: StyleToken = text_token(
    TextStyle::new(FontFace::Regular, 9.0, palette::BODY),
    5.0,
    0.0,
    0.0,
);

const PARAGRAPH: StyleToken = text_token(BODY_TEXT, 6.0, 0.0, 0.0);

const BLANK: StyleToken = StyleToken {
    text: None,
    indent_mm: 0.0,
    line_height_mm: 0.0,
    gap_before_mm: 0.0,
    gap_after_mm: BLANK_LINE_GAP_MM,
    rule: None,
};

/// Page header label style
pub const HEADER_TEXT: TextStyle = TextStyle::new(FontFace::Oblique, 9.0, palette::MUTED);

/// Page footer style
pub const FOOTER_TEXT: TextStyle = TextStyle::new(FontFace::Oblique, 8.0, palette::MUTED);

/// Look up the style token for a line category
pub fn style_for(kind: LineKind) -> &'static StyleToken {
    match kind {
        LineKind::Blank => &BLANK,
        LineKind::Heading1 => &HEADING1,
        LineKind::Heading2 => &HEADING2,
        LineKind::Heading3 => &HEADING3,
        LineKind::Italic => &ITALIC,
        LineKind::Rule => &RULE,
        LineKind::Bullet => &BULLET,
        LineKind::TableRow => &TABLE_ROW,
        LineKind::Paragraph => &PARAGRAPH,
    }
}
