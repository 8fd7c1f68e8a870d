//! Font Metrics
//!
//! Glyph advance widths of the standard Helvetica faces (AFM units per 1000
//! em) for the printable ASCII range. Latin-1 letters above ASCII fall back
//! to the average lowercase width.

use super::style::FontFace;

/// Points per millimetre
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Width used for characters outside the tables
const FALLBACK_WIDTH: u16 = 556;

/// Helvetica, characters 32..=126
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold, characters 32..=126
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn glyph_width(face: FontFace, c: char) -> u16 {
    let table = match face {
        FontFace::Bold => &HELVETICA_BOLD,
        FontFace::Regular | FontFace::Oblique => &HELVETICA,
    };
    let code = c as u32;
    if (32..=126).contains(&code) {
        table[(code - 32) as usize]
    } else if code == 0xA0 {
        table[0]
    } else {
        FALLBACK_WIDTH
    }
}

/// Rendered width of `text` in millimetres
pub fn text_width_mm(text: &str, face: FontFace, size_pt: f32) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_width(face, c) as u32).sum();
    units_to_mm(units, size_pt)
}

/// Rendered width of a single character in millimetres
pub fn char_width_mm(c: char, face: FontFace, size_pt: f32) -> f32 {
    units_to_mm(glyph_width(face, c) as u32, size_pt)
}

fn units_to_mm(units: u32, size_pt: f32) -> f32 {
    units as f32 * size_pt / 1000.0 / PT_PER_MM
}

/// Convert points to millimetres
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / PT_PER_MM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_cover_printable_ascii() {
        assert_eq!(glyph_width(FontFace::Regular, ' '), 278);
        assert_eq!(glyph_width(FontFace::Regular, '~'), 584);
        assert_eq!(glyph_width(FontFace::Bold, 'm'), 889);
        assert_eq!(glyph_width(FontFace::Oblique, 'i'), 222);
    }

    #[test]
    fn test_width_scales_with_size() {
        let small = text_width_mm("Member", FontFace::Regular, 10.0);
        let large = text_width_mm("Member", FontFace::Regular, 20.0);
        assert!((large - 2.0 * small).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = text_width_mm("loan balance", FontFace::Regular, 12.0);
        let bold = text_width_mm("loan balance", FontFace::Bold, 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_known_width() {
        // 1000 units at 72pt is exactly one inch
        let width = text_width_mm("WW", FontFace::Regular, 72.0) * 1000.0 / 1888.0;
        assert!((width - 25.4).abs() < 0.01);
    }
}
