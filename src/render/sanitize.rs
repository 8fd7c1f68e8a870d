//! Text Sanitizer
//!
//! The PDF writer uses the standard Type 1 fonts, which only cover Latin-1.
//! Typographic punctuation is folded to ASCII first; anything else outside
//! the repertoire becomes a `?` placeholder.

/// Placeholder for characters the standard fonts cannot show
pub const PLACEHOLDER: char = '?';

/// Typographic characters with a known ASCII spelling
const SUBSTITUTIONS: &[(char, &str)] = &[
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2026}', "..."),
];

/// Whether the renderer can draw `c` as-is
pub fn is_supported(c: char) -> bool {
    (c as u32) <= 0xFF
}

/// Restrict `text` to the renderer's character repertoire.
///
/// Never fails. Idempotent: the output only contains supported characters,
/// and supported characters are left untouched.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        if let Some((_, replacement)) = SUBSTITUTIONS.iter().find(|(from, _)| *from == c) {
            out.push_str(replacement);
        } else if is_supported(c) {
            out.push(c);
        } else {
            out.push(PLACEHOLDER);
        }
    }

    out
}
